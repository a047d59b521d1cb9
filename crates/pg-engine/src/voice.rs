//! Voice: steps through one sample at a device rate.

use pg_ir::RawSample;

use crate::frame::Frame;
use crate::frequency::{rate_to_increment, FRAC_BITS};

const FRAC_MASK: u64 = (1 << FRAC_BITS) - 1;

/// A single voice playing one sample, looping or once.
///
/// The render path does not allocate; all state is plain integers plus the
/// shared sample data.
#[derive(Clone, Debug)]
pub struct Voice {
    sample: RawSample,
    /// Position in the sample (32.32 fixed point).
    position: u64,
    /// Position increment per device frame (32.32 fixed point).
    increment: u64,
    output_rate: u32,
    looping: bool,
    playing: bool,
}

impl Voice {
    /// Start a voice at the sample's own rate.
    ///
    /// A one-shot voice that would never advance (empty sample or a zero
    /// rate) starts out finished.
    pub fn new(sample: RawSample, output_rate: u32, looping: bool) -> Self {
        let increment = rate_to_increment(sample.sample_rate, output_rate);
        let playing = !sample.is_empty() && (looping || increment > 0);
        Self {
            sample,
            position: 0,
            increment,
            output_rate,
            looping,
            playing,
        }
    }

    /// Change the playback rate without restarting.
    pub fn set_sample_rate(&mut self, sample_rate: u32) {
        self.sample.sample_rate = sample_rate;
        self.increment = rate_to_increment(sample_rate, self.output_rate);
        if !self.looping && self.increment == 0 {
            self.playing = false;
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample.sample_rate
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Current position in whole samples.
    pub fn position(&self) -> usize {
        (self.position >> FRAC_BITS) as usize
    }

    /// Render one mono frame. Silent once the voice has stopped.
    pub fn render_frame(&mut self) -> Frame {
        if !self.playing {
            return Frame::silence();
        }
        let value = self.interpolated();
        self.position += self.increment;
        self.advance_loop();
        Frame::mono(value)
    }

    /// Fill `out` with rendered frames.
    pub fn render(&mut self, out: &mut [Frame]) {
        for frame in out.iter_mut() {
            *frame = self.render_frame();
        }
    }

    /// Linear blend of the two samples around the current position.
    /// A looping voice blends its last sample with the first.
    fn interpolated(&self) -> i16 {
        let idx = self.position();
        let frac = ((self.position & FRAC_MASK) >> 16) as i64;
        let next = if self.looping && idx + 1 >= self.sample.len() {
            0
        } else {
            idx + 1
        };

        let a = self.sample.get_signed(idx) as i64;
        let b = self.sample.get_signed(next) as i64;
        (a + (((b - a) * frac) >> 16)) as i16
    }

    fn advance_loop(&mut self) {
        let end = (self.sample.len() as u64) << FRAC_BITS;
        if self.position < end {
            return;
        }
        if self.looping {
            self.position %= end;
        } else {
            self.playing = false;
        }
    }
}

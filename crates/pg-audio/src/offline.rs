//! Offline output: renders into an in-memory capture instead of a device.
//!
//! One-shot samples are rendered in full as soon as they start. Looping
//! samples are paced by the wall clock, so a tone held for half a second
//! captures half a second of frames.

use pg_engine::{frames_for_duration, Frame, Voice};
use pg_ir::RawSample;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use crate::traits::{AudioBackend, AudioError, AudioOutput};

type Capture = Arc<Mutex<Vec<Frame>>>;

/// Backend whose outputs all append to one shared capture.
#[derive(Clone, Debug)]
pub struct OfflineBackend {
    output_rate: u32,
    capture: Capture,
}

impl OfflineBackend {
    pub fn new(output_rate: u32) -> Self {
        Self {
            output_rate,
            capture: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn output_rate(&self) -> u32 {
        self.output_rate
    }

    /// Take everything captured so far.
    pub fn take_frames(&self) -> Vec<Frame> {
        let mut frames = self.capture.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *frames)
    }
}

impl AudioBackend for OfflineBackend {
    type Output = OfflineOutput;

    fn open(&self) -> Result<OfflineOutput, AudioError> {
        if self.output_rate == 0 {
            return Err(AudioError::DeviceInit("output rate must be non-zero".into()));
        }
        log::debug!("opened offline output at {} Hz", self.output_rate);
        Ok(OfflineOutput {
            voice: None,
            rendered_until: Instant::now(),
            output_rate: self.output_rate,
            capture: self.capture.clone(),
        })
    }
}

pub struct OfflineOutput {
    voice: Option<Voice>,
    rendered_until: Instant,
    output_rate: u32,
    capture: Capture,
}

impl OfflineOutput {
    /// Render a looping voice up to now.
    fn catch_up(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.rendered_until);
        self.rendered_until = now;

        let Some(voice) = self.voice.as_mut() else {
            return;
        };
        let count = frames_for_duration(elapsed, self.output_rate);
        let mut frames = self.capture.lock().unwrap_or_else(PoisonError::into_inner);
        frames.extend((0..count).map(|_| voice.render_frame()));
    }

    fn render_to_end(&mut self, mut voice: Voice) {
        let mut frames = self.capture.lock().unwrap_or_else(PoisonError::into_inner);
        while voice.is_playing() {
            frames.push(voice.render_frame());
        }
    }
}

impl AudioOutput for OfflineOutput {
    fn play(&mut self, sample: &RawSample, looping: bool) -> Result<(), AudioError> {
        self.catch_up();
        let voice = Voice::new(sample.clone(), self.output_rate, looping);
        if looping {
            self.voice = Some(voice);
        } else {
            self.voice = None;
            self.render_to_end(voice);
        }
        Ok(())
    }

    fn set_sample_rate(&mut self, sample_rate: u32) {
        self.catch_up();
        if let Some(voice) = self.voice.as_mut() {
            voice.set_sample_rate(sample_rate);
        }
    }

    fn is_playing(&self) -> bool {
        self.voice.as_ref().is_some_and(|v| v.is_playing())
    }

    fn stop(&mut self) {
        self.catch_up();
        self.voice = None;
    }
}

impl Drop for OfflineOutput {
    fn drop(&mut self) {
        self.catch_up();
    }
}

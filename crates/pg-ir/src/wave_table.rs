//! Single-cycle sine tables for tone playback.

use alloc::vec::Vec;
use core::f64::consts::PI;
use core::num::NonZeroUsize;

use crate::sample::PCM_MIDPOINT;

/// Peak amplitude of a generated tone around the PCM midpoint.
pub const TONE_VOLUME: u16 = (1 << 15) - 1;

/// Table length used for tones whose sample rate stays under the device limit.
pub const DEFAULT_TABLE_LENGTH: usize = 100;

/// Lazy generator for one sine cycle of unsigned 16-bit samples.
///
/// Sample `i` of an `L`-entry cycle is `round(32767 * sin(2π·i/L) + 32768)`,
/// so index 0 sits on the midpoint and every value fits in `u16`.
/// Calling [`sine_samples`] again restarts the cycle.
#[derive(Clone, Debug)]
pub struct SineSamples {
    len: usize,
    index: usize,
}

/// Start a sine cycle of `len` samples.
pub fn sine_samples(len: NonZeroUsize) -> SineSamples {
    SineSamples { len: len.get(), index: 0 }
}

impl SineSamples {
    fn sample_at(&self, i: usize) -> u16 {
        let phase = 2.0 * PI * (i as f64 / self.len as f64);
        let value = TONE_VOLUME as f64 * libm::sin(phase) + PCM_MIDPOINT as f64;
        libm::round(value) as u16
    }
}

impl Iterator for SineSamples {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        if self.index >= self.len {
            return None;
        }
        let value = self.sample_at(self.index);
        self.index += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SineSamples {}

/// One materialized sine cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaveTable {
    samples: Vec<u16>,
}

impl WaveTable {
    /// Generate a table of `len` samples. Returns `None` for an empty table.
    pub fn sine(len: usize) -> Option<Self> {
        NonZeroUsize::new(len).map(Self::with_length)
    }

    pub fn with_length(len: NonZeroUsize) -> Self {
        Self { samples: sine_samples(len).collect() }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.samples
    }

    pub fn into_vec(self) -> Vec<u16> {
        self.samples
    }
}

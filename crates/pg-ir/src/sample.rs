//! Raw PCM sample buffers.

use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::wave_table::WaveTable;

/// Midpoint (silence) of unsigned 16-bit PCM.
pub const PCM_MIDPOINT: u16 = 1 << 15;

/// Single-channel unsigned 16-bit PCM with a playback rate.
///
/// The sample data is shared and immutable, so handing a sample to an
/// output device is a reference-count bump. The rate is what sets the
/// pitch: the same table played at twice the rate sounds an octave higher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawSample {
    data: Arc<[u16]>,
    /// Playback rate in samples per second.
    pub sample_rate: u32,
}

impl RawSample {
    pub fn new(data: Vec<u16>, sample_rate: u32) -> Self {
        Self { data: Arc::from(data), sample_rate }
    }

    /// Wrap a wave table for playback at `sample_rate`.
    pub fn from_table(table: WaveTable, sample_rate: u32) -> Self {
        Self::new(table.into_vec(), sample_rate)
    }

    pub fn data(&self) -> &[u16] {
        &self.data
    }

    /// Shared handle to the sample data.
    pub fn shared_data(&self) -> Arc<[u16]> {
        Arc::clone(&self.data)
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample at `pos` re-centred to signed PCM. Out of range reads are silent.
    pub fn get_signed(&self, pos: usize) -> i16 {
        self.data
            .get(pos)
            .map(|&v| (v as i32 - PCM_MIDPOINT as i32) as i16)
            .unwrap_or(0)
    }

    /// Length of one pass through the sample, in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.data.len() as f64 / self.sample_rate as f64
    }
}

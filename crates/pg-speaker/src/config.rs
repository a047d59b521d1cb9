//! Speaker tuning knobs.

use pg_ir::DEFAULT_TABLE_LENGTH;
use std::time::Duration;

/// Highest sample rate the speaker output accepts, in samples per second.
pub const MAX_SAMPLE_RATE: u32 = 350_000;

#[derive(Clone, Debug, PartialEq)]
pub struct SpeakerConfig {
    /// Sine table length used while `length * frequency` stays under `max_sample_rate`.
    pub default_table_length: usize,
    /// Ceiling on `table length * frequency`; higher tones get shorter tables.
    pub max_sample_rate: u32,
    /// Sleep between completion checks while a file plays.
    pub poll_interval: Duration,
}

impl Default for SpeakerConfig {
    fn default() -> Self {
        Self {
            default_table_length: DEFAULT_TABLE_LENGTH,
            max_sample_rate: MAX_SAMPLE_RATE,
            poll_interval: Duration::from_millis(1),
        }
    }
}

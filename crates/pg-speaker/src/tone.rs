//! Tone parameters and the cached tone player.

use core::num::NonZeroUsize;

use pg_audio::{AudioBackend, AudioOutput};
use pg_ir::{RawSample, WaveTable};

use crate::config::SpeakerConfig;
use crate::error::SpeakerError;

/// Sine table length for a tone at `frequency_hz`.
///
/// Starts from the configured default and shrinks it to
/// `floor(max_sample_rate / frequency_hz)` when the default would push the
/// playback rate past the device ceiling.
pub fn table_length_for(
    frequency_hz: f32,
    config: &SpeakerConfig,
) -> Result<NonZeroUsize, SpeakerError> {
    if !frequency_hz.is_finite() || frequency_hz <= 0.0 {
        return Err(SpeakerError::InvalidFrequency(frequency_hz));
    }
    let freq = frequency_hz as f64;
    let mut length = config.default_table_length;
    if length as f64 * freq > config.max_sample_rate as f64 {
        length = (config.max_sample_rate as f64 / freq).floor() as usize;
    }
    NonZeroUsize::new(length).ok_or(SpeakerError::InvalidFrequency(frequency_hz))
}

/// Playback rate that sounds `frequency_hz` from a table of `table_len` samples.
pub fn tone_sample_rate(table_len: usize, frequency_hz: f32) -> u32 {
    (table_len as f64 * frequency_hz as f64) as u32
}

/// A generated tone and the output it plays on.
pub struct CachedTone<O> {
    pub sample: RawSample,
    pub output: O,
}

/// One-shot cache for the tone table and its player.
///
/// The first [`ensure_sample`](Self::ensure_sample) after the cache is empty
/// decides the table length. Later calls keep that table even when asked for
/// a different length, so a high tone started while a low one is playing
/// reuses the 100-entry table at a rate above the usual ceiling. The cache
/// empties when the tone is stopped, and the next tone regenerates it.
pub struct SampleCache<O> {
    tone: Option<CachedTone<O>>,
}

impl<O: AudioOutput> SampleCache<O> {
    pub fn new() -> Self {
        Self { tone: None }
    }

    /// Generate the table and open its player unless both already exist.
    pub fn ensure_sample<B>(
        &mut self,
        length: NonZeroUsize,
        backend: &B,
    ) -> Result<&mut CachedTone<O>, SpeakerError>
    where
        B: AudioBackend<Output = O>,
    {
        match self.tone {
            Some(ref mut tone) => Ok(tone),
            None => {
                let output = backend
                    .open()
                    .map_err(|e| SpeakerError::DeviceUnavailable(e.to_string()))?;
                let table = WaveTable::with_length(length);
                log::debug!("generated {}-sample tone table", table.len());
                Ok(self.tone.insert(CachedTone {
                    sample: RawSample::from_table(table, 0),
                    output,
                }))
            }
        }
    }

    pub fn is_cached(&self) -> bool {
        self.tone.is_some()
    }

    /// Length of the cached table, if any.
    pub fn table_len(&self) -> Option<usize> {
        self.tone.as_ref().map(|t| t.sample.len())
    }

    pub fn is_playing(&self) -> bool {
        self.tone.as_ref().is_some_and(|t| t.output.is_playing())
    }

    /// Empty the cache, handing back the tone so the caller can stop and drop it.
    pub fn release(&mut self) -> Option<CachedTone<O>> {
        self.tone.take()
    }
}

impl<O: AudioOutput> Default for SampleCache<O> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Event, MockBackend, Recorder};

    fn length(hz: f32) -> usize {
        table_length_for(hz, &SpeakerConfig::default()).unwrap().get()
    }

    #[test]
    fn audible_tones_use_default_length() {
        for hz in [1.0, 20.0, 262.0, 440.0, 1000.0, 3499.0, 3500.0] {
            assert_eq!(length(hz), 100, "{} Hz", hz);
        }
    }

    #[test]
    fn high_tones_shrink_table() {
        assert_eq!(length(4000.0), 87);
        assert_eq!(length(3500.5), 99);
        assert_eq!(length(10_000.0), 35);
        assert_eq!(length(350_000.0), 1);
    }

    #[test]
    fn shrunk_rate_stays_under_ceiling() {
        for hz in [3600.0f32, 4000.0, 7919.0, 12_345.0, 100_000.0] {
            let len = length(hz);
            assert!(tone_sample_rate(len, hz) <= 350_000, "{} Hz", hz);
        }
    }

    #[test]
    fn invalid_frequencies_rejected() {
        let config = SpeakerConfig::default();
        for hz in [0.0, -440.0, f32::NAN, f32::INFINITY, 350_001.0] {
            assert!(
                matches!(table_length_for(hz, &config), Err(SpeakerError::InvalidFrequency(_))),
                "{} Hz",
                hz
            );
        }
    }

    #[test]
    fn rate_truncates() {
        assert_eq!(tone_sample_rate(100, 440.0), 44_000);
        assert_eq!(tone_sample_rate(100, 261.5), 26_150);
        assert_eq!(tone_sample_rate(87, 4000.0), 348_000);
    }

    #[test]
    fn first_length_wins() {
        let log = Recorder::default();
        let backend = MockBackend::new(&log);
        let mut cache = SampleCache::new();

        cache.ensure_sample(NonZeroUsize::new(100).unwrap(), &backend).unwrap();
        cache.ensure_sample(NonZeroUsize::new(87).unwrap(), &backend).unwrap();

        assert_eq!(cache.table_len(), Some(100));
        assert_eq!(log.events(), vec![Event::Open(0)]);
    }

    #[test]
    fn release_drops_player() {
        let log = Recorder::default();
        let backend = MockBackend::new(&log);
        let mut cache = SampleCache::new();
        cache.ensure_sample(NonZeroUsize::new(50).unwrap(), &backend).unwrap();

        drop(cache.release());
        assert!(!cache.is_cached());
        assert_eq!(log.events(), vec![Event::Open(0), Event::Release(0)]);

        cache.ensure_sample(NonZeroUsize::new(87).unwrap(), &backend).unwrap();
        assert_eq!(cache.table_len(), Some(87));
    }

    #[test]
    fn open_failure_leaves_cache_empty() {
        let log = Recorder::default();
        let backend = MockBackend::failing(&log);
        let mut cache = SampleCache::new();
        let result = cache.ensure_sample(NonZeroUsize::new(100).unwrap(), &backend);
        assert!(matches!(result, Err(SpeakerError::DeviceUnavailable(_))));
        assert!(!cache.is_cached());
    }
}

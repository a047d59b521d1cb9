//! The speaker subsystem: tone playback and session bookkeeping.

use std::thread;
use std::time::Duration;

use core::num::NonZeroUsize;

use embedded_hal::digital::OutputPin;
use pg_audio::{AudioBackend, AudioOutput};

use crate::amplifier::SpeakerAmplifier;
use crate::config::SpeakerConfig;
use crate::error::SpeakerError;
use crate::tone::{table_length_for, tone_sample_rate, SampleCache};

/// What the speaker is doing right now.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Idle,
    /// Looping the cached sine table at `sample_rate`.
    Tone { sample_rate: u32 },
    /// Playing a waveform file to completion.
    ///
    /// Only held inside the blocking [`Speaker::play_file`] call, which
    /// always leaves the speaker `Idle`; it never reaches `state()` callers.
    File,
}

/// Speaker playback for one board.
///
/// Owns the amplifier enable pin and the audio backend. Every operation
/// takes `&mut self`; `play_tone` and `play_file` block the calling thread
/// until they finish.
pub struct Speaker<P: OutputPin, B: AudioBackend> {
    pub(crate) amplifier: SpeakerAmplifier<P>,
    pub(crate) backend: B,
    pub(crate) cache: SampleCache<B::Output>,
    pub(crate) config: SpeakerConfig,
    pub(crate) state: PlaybackState,
}

impl<P: OutputPin, B: AudioBackend> Speaker<P, B> {
    pub fn new(pin: P, backend: B) -> Result<Self, SpeakerError> {
        Self::with_config(pin, backend, SpeakerConfig::default())
    }

    /// Take the amplifier pin (driven low) and the backend.
    pub fn with_config(pin: P, backend: B, config: SpeakerConfig) -> Result<Self, SpeakerError> {
        Ok(Self {
            amplifier: SpeakerAmplifier::new(pin)?,
            backend,
            cache: SampleCache::new(),
            config,
            state: PlaybackState::Idle,
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_amplifier_enabled(&self) -> bool {
        self.amplifier.is_enabled()
    }

    /// True while a tone player is cached.
    pub fn has_tone_player(&self) -> bool {
        self.cache.is_cached()
    }

    /// Length of the cached tone table, if a tone player exists.
    pub fn tone_table_len(&self) -> Option<usize> {
        self.cache.table_len()
    }

    pub fn config(&self) -> &SpeakerConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Start (or retune) a looping tone.
    ///
    /// The first call opens a player and loops a sine table on it. Further
    /// calls while the tone runs only change the playback rate, so the pitch
    /// glides without a restart click. The rate is always derived from the
    /// cached table, even if this frequency alone would have picked a
    /// shorter one.
    pub fn start_tone(&mut self, frequency_hz: f32) -> Result<(), SpeakerError> {
        let length = table_length_for(frequency_hz, &self.config)?;
        if tone_sample_rate(length.get(), frequency_hz) == 0 {
            return Err(SpeakerError::InvalidFrequency(frequency_hz));
        }
        self.amplifier.enable()?;
        if let Err(e) = self.drive_tone(frequency_hz, length) {
            self.abandon_tone();
            return Err(e);
        }
        Ok(())
    }

    fn drive_tone(&mut self, frequency_hz: f32, length: NonZeroUsize) -> Result<(), SpeakerError> {
        let tone = self.cache.ensure_sample(length, &self.backend)?;
        let sample_rate = tone_sample_rate(tone.sample.len(), frequency_hz);
        tone.sample.sample_rate = sample_rate;

        if tone.output.is_playing() {
            log::debug!("tone retuned to {} Hz ({} samples/s)", frequency_hz, sample_rate);
            tone.output.set_sample_rate(sample_rate);
        } else {
            log::info!("tone started at {} Hz ({} samples/s)", frequency_hz, sample_rate);
            tone.output
                .play(&tone.sample, true)
                .map_err(SpeakerError::Playback)?;
        }
        self.state = PlaybackState::Tone { sample_rate };
        Ok(())
    }

    /// Drop the tone player and power down after a failed start.
    fn abandon_tone(&mut self) {
        if let Some(mut tone) = self.cache.release() {
            tone.output.stop();
        }
        self.state = PlaybackState::Idle;
        if let Err(e) = self.amplifier.disable() {
            log::warn!("{}", e);
        }
    }

    /// Stop the tone, release its player, and power down the amplifier.
    ///
    /// Safe to call with no tone running.
    pub fn stop_tone(&mut self) -> Result<(), SpeakerError> {
        if self.cache.is_playing() {
            if let Some(mut tone) = self.cache.release() {
                tone.output.stop();
                log::info!("tone stopped");
            }
        }
        if matches!(self.state, PlaybackState::Tone { .. }) {
            self.state = PlaybackState::Idle;
        }
        self.amplifier.disable()
    }

    /// Play a tone for `duration`, blocking the calling thread.
    pub fn play_tone(&mut self, frequency_hz: f32, duration: Duration) -> Result<(), SpeakerError> {
        self.start_tone(frequency_hz)?;
        thread::sleep(duration);
        self.stop_tone()
    }
}

impl<P: OutputPin, B: AudioBackend> Drop for Speaker<P, B> {
    fn drop(&mut self) {
        if let Some(mut tone) = self.cache.release() {
            tone.output.stop();
        }
        if let Err(e) = self.amplifier.disable() {
            log::warn!("{}", e);
        }
    }
}

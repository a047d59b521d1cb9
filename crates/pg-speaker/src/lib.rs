//! Speaker tone and waveform playback control for the playground board.
//!
//! [`Speaker`] owns the amplifier enable pin and an audio backend, and keeps
//! tone and file playback mutually exclusive: a file always silences a
//! running tone first, and the amplifier is only powered while something is
//! rendering.
//!
//! ```no_run
//! # fn demo<P, B>(pin: P, backend: B) -> Result<(), pg_speaker::SpeakerError>
//! # where P: embedded_hal::digital::OutputPin, B: pg_audio::AudioBackend {
//! use pg_speaker::Speaker;
//! use std::time::Duration;
//!
//! let mut speaker = Speaker::new(pin, backend)?;
//! speaker.play_tone(440.0, Duration::from_secs(1))?;
//! speaker.play_file("laugh.wav")?;
//! # Ok(())
//! # }
//! ```

mod amplifier;
mod config;
mod error;
mod file;
mod speaker;
mod tone;

#[cfg(test)]
mod mock;

pub use amplifier::{AmplifierGuard, SpeakerAmplifier};
pub use config::{SpeakerConfig, MAX_SAMPLE_RATE};
pub use error::SpeakerError;
pub use speaker::{PlaybackState, Speaker};
pub use tone::{table_length_for, tone_sample_rate, CachedTone, SampleCache};

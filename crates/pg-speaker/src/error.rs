//! Error type for speaker operations.

use pg_audio::AudioError;
use pg_formats::FormatError;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum SpeakerError {
    /// Frequency is not a positive finite number, or leaves no room for a table
    InvalidFrequency(f32),
    /// Amplifier pin or audio output could not be driven
    DeviceUnavailable(String),
    /// Waveform file does not exist
    FileNotFound(PathBuf),
    /// Waveform file could not be read
    Io(std::io::Error),
    /// Waveform file is not playable PCM
    Decode(FormatError),
    /// Output refused to start playback
    Playback(AudioError),
}

impl fmt::Display for SpeakerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeakerError::InvalidFrequency(hz) => write!(f, "invalid tone frequency: {} Hz", hz),
            SpeakerError::DeviceUnavailable(msg) => write!(f, "speaker device unavailable: {}", msg),
            SpeakerError::FileNotFound(path) => write!(f, "file not found: {}", path.display()),
            SpeakerError::Io(e) => write!(f, "I/O error: {}", e),
            SpeakerError::Decode(e) => write!(f, "cannot decode waveform: {}", e),
            SpeakerError::Playback(e) => write!(f, "playback failed: {}", e),
        }
    }
}

impl std::error::Error for SpeakerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SpeakerError::Io(e) => Some(e),
            SpeakerError::Decode(e) => Some(e),
            SpeakerError::Playback(e) => Some(e),
            _ => None,
        }
    }
}

impl From<FormatError> for SpeakerError {
    fn from(err: FormatError) -> Self {
        SpeakerError::Decode(err)
    }
}

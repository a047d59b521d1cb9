//! Audio output traits and error types.

use pg_ir::RawSample;

/// Error type for audio operations.
#[derive(Debug)]
pub enum AudioError {
    /// Failed to initialize audio device
    DeviceInit(String),
    /// Failed to create audio stream
    StreamCreate(String),
    /// Playback error
    Playback(String),
    /// No audio device available
    NoDevice,
}

impl std::fmt::Display for AudioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AudioError::DeviceInit(msg) => write!(f, "Device init error: {}", msg),
            AudioError::StreamCreate(msg) => write!(f, "Stream create error: {}", msg),
            AudioError::Playback(msg) => write!(f, "Playback error: {}", msg),
            AudioError::NoDevice => write!(f, "No audio device available"),
        }
    }
}

impl std::error::Error for AudioError {}

/// An open sample player on the speaker output.
///
/// Dropping the output releases the underlying device.
pub trait AudioOutput {
    /// Start playing `sample` at its own rate, replacing anything in progress.
    fn play(&mut self, sample: &RawSample, looping: bool) -> Result<(), AudioError>;

    /// Change the rate of the sample in progress without restarting it.
    fn set_sample_rate(&mut self, sample_rate: u32);

    /// True while a sample is being rendered. A looping sample plays until stopped.
    fn is_playing(&self) -> bool;

    /// Stop playback. The output stays open.
    fn stop(&mut self);
}

/// Opens sample players on the speaker output.
pub trait AudioBackend {
    type Output: AudioOutput;

    /// Open a fresh output handle.
    fn open(&self) -> Result<Self::Output, AudioError>;
}

//! Waveform file playback.

use std::fs;
use std::io;
use std::path::Path;
use std::thread;
use std::time::Duration;

use embedded_hal::digital::OutputPin;
use pg_audio::{AudioBackend, AudioOutput};
use pg_ir::RawSample;

use crate::error::SpeakerError;
use crate::speaker::{PlaybackState, Speaker};

impl<P: OutputPin, B: AudioBackend> Speaker<P, B> {
    /// Play a mono PCM `.wav` file once, blocking until it finishes.
    ///
    /// Any running tone is stopped first. The file gets its own output
    /// handle, opened and decoded before the amplifier is powered, so a
    /// missing device or a bad file leaves the speaker off. The output is
    /// released and the amplifier disabled on every exit path.
    pub fn play_file(&mut self, path: impl AsRef<Path>) -> Result<(), SpeakerError> {
        let path = path.as_ref();
        self.stop_tone()?;

        let mut output = self
            .backend
            .open()
            .map_err(|e| SpeakerError::DeviceUnavailable(e.to_string()))?;
        let sample = load_sample(path)?;

        let amp = self.amplifier.enable_scoped()?;
        self.state = PlaybackState::File;
        log::info!(
            "playing {} ({} samples at {} Hz)",
            path.display(),
            sample.len(),
            sample.sample_rate
        );

        let played = play_to_end(&mut output, &sample, self.config.poll_interval);
        drop(output);
        self.state = PlaybackState::Idle;
        let disabled = amp.disable();
        log::info!("finished {}", path.display());
        played.and(disabled)
    }
}

fn load_sample(path: &Path) -> Result<RawSample, SpeakerError> {
    let data = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SpeakerError::FileNotFound(path.to_path_buf()),
        _ => SpeakerError::Io(e),
    })?;
    Ok(pg_formats::load_wav(&data)?)
}

/// Start one-shot playback and sleep between completion checks.
fn play_to_end<O: AudioOutput>(
    output: &mut O,
    sample: &RawSample,
    poll_interval: Duration,
) -> Result<(), SpeakerError> {
    output.play(sample, false).map_err(SpeakerError::Playback)?;
    while output.is_playing() {
        thread::sleep(poll_interval);
    }
    Ok(())
}

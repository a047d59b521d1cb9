//! playground CLI: speaker tones and waveform playback on the host.
//!
//! Usage:
//!   pg-cli tone <hz> <seconds> [--wav output.wav]
//!   pg-cli play <file.wav> [--wav output.wav]
//!
//! Without `--wav` the sound goes to the default output device. With it the
//! session is rendered offline and the capture written to disk.
//! `PG_LOG` takes an `env_logger` filter, e.g. `PG_LOG=debug` or
//! `PG_LOG=pg_audio=trace`.

use anyhow::{bail, Context};
use embedded_hal::digital::{ErrorType, OutputPin};
use pg_audio::{AudioBackend, CpalBackend, OfflineBackend};
use pg_speaker::Speaker;
use std::convert::Infallible;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs};

const USAGE: &str = "Usage: pg-cli tone <hz> <seconds> [--wav output.wav]\n       pg-cli play <file.wav> [--wav output.wav]";

/// Device rate for offline renders.
const RENDER_RATE: u32 = 48_000;

enum Action {
    Tone { frequency_hz: f32, duration: Duration },
    Play(PathBuf),
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let wav_path = args
        .iter()
        .position(|a| a == "--wav")
        .and_then(|i| args.get(i + 1))
        .map(PathBuf::from);

    let action = match parse_action(&args) {
        Ok(action) => action,
        Err(e) => {
            eprintln!("{}\n{}", e, USAGE);
            std::process::exit(1);
        }
    };

    match wav_path {
        Some(path) => render_to_wav(&action, &path),
        None => {
            println!("Playing...");
            run_session(CpalBackend::new(), &action)?;
            println!("Done.");
            Ok(())
        }
    }
}

fn parse_action(args: &[String]) -> anyhow::Result<Action> {
    match args.get(1).map(String::as_str) {
        Some("tone") => {
            let frequency_hz: f32 = args
                .get(2)
                .context("missing frequency")?
                .parse()
                .context("frequency must be a number")?;
            let seconds: f32 = args
                .get(3)
                .context("missing duration")?
                .parse()
                .context("duration must be a number")?;
            let duration = Duration::try_from_secs_f32(seconds)
                .context("duration must be a non-negative number of seconds")?;
            Ok(Action::Tone { frequency_hz, duration })
        }
        Some("play") => {
            let path = args.get(2).context("missing file")?;
            Ok(Action::Play(PathBuf::from(path)))
        }
        Some(other) => bail!("unknown command: {}", other),
        None => bail!("missing command"),
    }
}

fn run_session<B: AudioBackend>(backend: B, action: &Action) -> anyhow::Result<()> {
    let mut speaker = Speaker::new(HostAmplifier, backend)?;
    match action {
        Action::Tone { frequency_hz, duration } => speaker.play_tone(*frequency_hz, *duration)?,
        Action::Play(path) => speaker.play_file(path)?,
    }
    Ok(())
}

fn render_to_wav(action: &Action, path: &Path) -> anyhow::Result<()> {
    println!("Rendering to {} at {} Hz...", path.display(), RENDER_RATE);
    let backend = OfflineBackend::new(RENDER_RATE);
    run_session(backend.clone(), action)?;

    let frames = backend.take_frames();
    let wav = pg_formats::frames_to_wav(&frames, RENDER_RATE);
    fs::write(path, &wav).with_context(|| format!("failed to write {}", path.display()))?;
    println!("Rendered {} frames ({} bytes)", frames.len(), wav.len());
    Ok(())
}

/// Desktop sound cards have no amplifier gate; log the transitions instead.
struct HostAmplifier;

impl ErrorType for HostAmplifier {
    type Error = Infallible;
}

impl OutputPin for HostAmplifier {
    fn set_low(&mut self) -> Result<(), Infallible> {
        log::trace!("amplifier pin low");
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        log::trace!("amplifier pin high");
        Ok(())
    }
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("PG_LOG", "info")).init();
}

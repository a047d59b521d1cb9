//! Waveform file codec for the playground speaker.
//!
//! Decodes uncompressed mono PCM `.wav` files into [`pg_ir::RawSample`]s and
//! encodes rendered frames back to `.wav` for offline capture.

mod wav_format;

pub use wav_format::{frames_to_wav, load_wav, sample_to_wav, write_sample_wav, write_wav};

use std::fmt;

/// Error type for format parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Missing RIFF/WAVE magic or a required chunk
    InvalidHeader,
    /// Unexpected end of file
    UnexpectedEof,
    /// Format tag other than uncompressed PCM
    UnsupportedFormat(u16),
    /// Anything but a single channel
    UnsupportedChannels(u16),
    /// Bit depth other than 8 or 16
    UnsupportedBitDepth(u16),
    /// A `fmt ` chunk declaring zero samples per second
    ZeroSampleRate,
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::InvalidHeader => write!(f, "invalid WAV header"),
            FormatError::UnexpectedEof => write!(f, "unexpected end of WAV data"),
            FormatError::UnsupportedFormat(tag) => {
                write!(f, "unsupported WAV format tag {} (only PCM is supported)", tag)
            }
            FormatError::UnsupportedChannels(n) => {
                write!(f, "unsupported channel count {} (only mono is supported)", n)
            }
            FormatError::UnsupportedBitDepth(n) => {
                write!(f, "unsupported bit depth {} (only 8 and 16 are supported)", n)
            }
            FormatError::ZeroSampleRate => write!(f, "WAV declares a sample rate of 0 Hz"),
        }
    }
}

impl std::error::Error for FormatError {}

impl From<binrw::Error> for FormatError {
    fn from(err: binrw::Error) -> Self {
        match err {
            binrw::Error::Io(ref e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                FormatError::UnexpectedEof
            }
            _ => FormatError::InvalidHeader,
        }
    }
}

//! Audio output devices for the playground speaker.
//!
//! An [`AudioBackend`] opens [`AudioOutput`] handles on the speaker. Boards
//! plug in their DAC or PWM driver here; the host gets a sound-card backend
//! (feature `cpal`) and an offline backend that captures rendered frames.

#[cfg(feature = "cpal")]
mod cpal_backend;
mod offline;
mod traits;

#[cfg(feature = "cpal")]
pub use cpal_backend::{CpalBackend, CpalOutput};
pub use offline::{OfflineBackend, OfflineOutput};
pub use traits::{AudioBackend, AudioError, AudioOutput};

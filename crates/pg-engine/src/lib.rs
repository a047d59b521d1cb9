//! Sample render path for the playground speaker.
//!
//! Steps a [`pg_ir::RawSample`] at its own playback rate against a fixed
//! device rate and produces frames for host output backends.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod frame;
mod frequency;
mod voice;

pub use frame::Frame;
pub use frequency::{frames_for_duration, rate_to_increment, FRAC_BITS};
pub use voice::Voice;

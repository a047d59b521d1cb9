//! Core sample types for the playground speaker.
//!
//! This crate defines the sample data shared by every other crate in the
//! workspace: generated sine tables for tones, and the raw PCM buffers that
//! output devices play, whether they come from a table or a decoded file.
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod sample;
mod wave_table;

pub use sample::{RawSample, PCM_MIDPOINT};
pub use wave_table::{sine_samples, SineSamples, WaveTable, DEFAULT_TABLE_LENGTH, TONE_VOLUME};

//! Playback-rate to position-increment conversion.
//!
//! Voice positions are 32.32 fixed point: the upper half indexes the sample,
//! the lower half is the fraction used for interpolation.

use core::time::Duration;

/// Fractional bits in a voice position.
pub const FRAC_BITS: u32 = 32;

/// Increment per device frame for a sample played at `sample_rate` on a
/// device running at `output_rate`.
///
/// Returns 0 when the device rate is 0.
pub fn rate_to_increment(sample_rate: u32, output_rate: u32) -> u64 {
    if output_rate == 0 {
        return 0;
    }
    ((sample_rate as u64) << FRAC_BITS) / output_rate as u64
}

/// Number of device frames covering `duration` at `output_rate`.
pub fn frames_for_duration(duration: Duration, output_rate: u32) -> usize {
    (duration.as_secs_f64() * output_rate as f64) as usize
}

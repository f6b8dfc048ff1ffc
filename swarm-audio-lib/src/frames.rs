//! Audio length to video frame count.
//!
//! A companion video stage sizes its latent from this count so the rendered
//! clip covers the whole audio track. The conversion never fails: unknown or
//! missing audio always maps to a single frame.

use serde::{Deserialize, Serialize};

use crate::duration::estimate_duration;
use crate::types::AudioBuffer;

/// Lowest accepted frame rate
pub const MIN_FRAME_RATE: u32 = 1;
/// Highest accepted frame rate
pub const MAX_FRAME_RATE: u32 = 120;
/// Frame rate used when the caller does not pick one
pub const DEFAULT_FRAME_RATE: u32 = 24;

/// Target frame rate, always within `[MIN_FRAME_RATE, MAX_FRAME_RATE]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct FrameRate(u32);

impl FrameRate {
    /// Clamp `fps` into the accepted range.
    pub fn new(fps: u32) -> Self {
        Self(fps.clamp(MIN_FRAME_RATE, MAX_FRAME_RATE))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self(DEFAULT_FRAME_RATE)
    }
}

impl From<u32> for FrameRate {
    fn from(fps: u32) -> Self {
        Self::new(fps)
    }
}

impl From<FrameRate> for u32 {
    fn from(rate: FrameRate) -> Self {
        rate.0
    }
}

/// Frame count for `duration_secs` of audio at `frame_rate`.
///
/// `max(1, round(duration * rate) + 1)`. Rounding is half-to-even on the
/// product. Negative or NaN durations are treated as zero-length audio.
pub fn frame_count(duration_secs: f64, frame_rate: FrameRate) -> u32 {
    let product = duration_secs * f64::from(frame_rate.get());
    if !product.is_finite() || product <= 0.0 {
        return 1;
    }

    let rounded = product.round_ties_even();
    if rounded >= f64::from(u32::MAX - 1) {
        return u32::MAX;
    }

    (rounded as u32 + 1).max(1)
}

/// Compute the frame count for `audio` and hand the audio back untouched.
///
/// Missing audio, a missing waveform or sample rate, or a non-positive
/// sample rate all yield exactly one frame.
pub fn audio_length_to_frames(
    audio: Option<AudioBuffer>,
    frame_rate: FrameRate,
) -> (Option<AudioBuffer>, u32) {
    let frames = match estimate_duration(audio.as_ref()) {
        Some(duration) => frame_count(duration, frame_rate),
        None => {
            tracing::debug!("Audio duration unknown, falling back to a single frame");
            1
        }
    };

    (audio, frames)
}

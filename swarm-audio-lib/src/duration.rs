//! Playback duration of an audio buffer.

use crate::types::AudioBuffer;

/// Elapsed playback time of `buffer` in seconds.
///
/// Returns `None` ("unknown") when there is no buffer, no waveform, no sample
/// rate or a non-positive sample rate. The sample count is always taken from
/// the trailing axis, so a leading batch axis of any size is accepted as is.
pub fn estimate_duration(buffer: Option<&AudioBuffer>) -> Option<f64> {
    let buffer = buffer?;
    let waveform = buffer.waveform.as_ref()?;
    let sample_rate = buffer.sample_rate.filter(|&rate| rate > 0)?;
    let num_samples = waveform.shape().last().copied().unwrap_or(0);

    Some(num_samples as f64 / sample_rate as f64)
}

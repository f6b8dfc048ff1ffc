//! Float waveform to interleaved 16-bit PCM.

use ndarray::{ArrayD, ArrayView2, Axis, Ix2};

use crate::error::{AudioError, Result};

/// Full-scale value used when quantizing to signed 16-bit
pub const I16_SCALE: f32 = 32767.0;

/// Interleaved signed 16-bit samples ready for a PCM container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterleavedPcm {
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl InterleavedPcm {
    /// Number of sample frames (one sample per channel each).
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }
}

/// Clip to `[-1.0, 1.0]`, scale by 32767 and truncate toward zero.
pub fn quantize_sample(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * I16_SCALE) as i16
}

/// Reduce a waveform to a `(channels, samples)` view.
///
/// A leading batch axis is resolved by taking item 0; further items are
/// dropped without an error. A 1-D waveform is treated as mono.
pub fn channel_view(waveform: &ArrayD<f32>) -> Result<ArrayView2<'_, f32>> {
    let view = waveform.view();
    let view = match view.ndim() {
        1 => view.insert_axis(Axis(0)),
        2 => view,
        3 => {
            let batch = view.len_of(Axis(0));
            if batch == 0 {
                return Err(AudioError::Input("waveform batch axis is empty".into()));
            }
            view.index_axis_move(Axis(0), 0)
        }
        n => {
            return Err(AudioError::Input(format!(
                "unsupported waveform rank {} (expected 1 to 3 axes)",
                n
            )))
        }
    };

    view.into_dimensionality::<Ix2>()
        .map_err(|e| AudioError::Input(format!("waveform shape error: {}", e)))
}

/// Quantize and interleave a waveform, channel-minor per sample frame.
pub fn interleave(waveform: &ArrayD<f32>) -> Result<InterleavedPcm> {
    let view = channel_view(waveform)?;
    let channels = view.nrows();
    if channels == 0 {
        return Err(AudioError::Input("waveform has no channels".into()));
    }
    let channels = u16::try_from(channels)
        .map_err(|_| AudioError::Input(format!("too many channels: {}", channels)))?;

    // (samples, channels) in logical order yields frame-by-frame interleaving
    let samples = view.t().iter().copied().map(quantize_sample).collect();

    Ok(InterleavedPcm { channels, samples })
}

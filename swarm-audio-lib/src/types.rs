//! Audio buffer model shared by the frame counter and the transcoder.

use ndarray::{ArrayD, Axis, IxDyn};

/// Raw audio handed over by an upstream pipeline stage.
///
/// `waveform` keeps whatever shape the producer used: `(samples)`,
/// `(channels, samples)` or `(batch, channels, samples)`. The trailing axis
/// is always time. Both fields are optional because upstream stages are
/// allowed to hand over partially populated records.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    pub waveform: Option<ArrayD<f32>>,
    pub sample_rate: Option<i64>,
}

impl AudioBuffer {
    /// Build a buffer from a waveform and its sample rate.
    pub fn new(waveform: ArrayD<f32>, sample_rate: i64) -> Self {
        Self {
            waveform: Some(waveform),
            sample_rate: Some(sample_rate),
        }
    }

    /// Build a `(channels, samples)` buffer from per-channel sample vectors.
    ///
    /// Channels shorter than the longest one are padded with silence.
    pub fn from_channels(channels: &[Vec<f32>], sample_rate: i64) -> Self {
        let num_samples = channels.iter().map(Vec::len).max().unwrap_or(0);
        let mut waveform = ArrayD::<f32>::zeros(IxDyn(&[channels.len(), num_samples]));
        for (c, samples) in channels.iter().enumerate() {
            for (s, value) in samples.iter().enumerate() {
                waveform[IxDyn(&[c, s])] = *value;
            }
        }
        Self::new(waveform, sample_rate)
    }

    /// Number of samples along the trailing (time) axis, 0 without a waveform.
    pub fn num_samples(&self) -> usize {
        self.waveform
            .as_ref()
            .and_then(|w| w.shape().last().copied())
            .unwrap_or(0)
    }

    /// Number of channels once any leading batch axis is dropped.
    pub fn num_channels(&self) -> usize {
        match self.waveform.as_ref().map(|w| w.shape().to_vec()) {
            Some(shape) if shape.len() >= 2 => shape[shape.len() - 2],
            Some(shape) if shape.len() == 1 => 1,
            _ => 0,
        }
    }

    /// Number of items along the leading batch axis (1 when there is none).
    pub fn batch_size(&self) -> usize {
        match &self.waveform {
            Some(w) if w.ndim() == 3 => w.len_of(Axis(0)),
            _ => 1,
        }
    }
}

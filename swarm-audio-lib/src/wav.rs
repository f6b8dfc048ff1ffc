//! RIFF/WAVE reading and writing.
//!
//! Writing produces the intermediate linear-PCM container handed to the
//! encoder. Reading is the audio source used by hosts that receive audio as
//! WAV blobs from an upstream stage.

use std::io::Cursor;
use std::path::Path;

use ndarray::Array2;

use crate::error::{AudioError, Result};
use crate::pcm::InterleavedPcm;
use crate::types::AudioBuffer;

/// Write `pcm` as a 16-bit linear PCM WAV file at `path`.
pub fn write_wav(path: &Path, pcm: &InterleavedPcm, sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: pcm.channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in &pcm.samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    tracing::debug!(
        path = %path.display(),
        channels = pcm.channels,
        frames = pcm.frames(),
        sample_rate,
        "Wrote intermediate WAV"
    );

    Ok(())
}

/// Decode a WAV blob into a `(channels, samples)` buffer with values in
/// `[-1.0, 1.0]`.
pub fn read_wav(bytes: &[u8]) -> Result<AudioBuffer> {
    let mut reader = hound::WavReader::new(Cursor::new(bytes))
        .map_err(|e| AudioError::Input(format!("Failed to decode WAV audio: {}", e)))?;

    let spec = reader.spec();
    let channels = spec.channels as usize;
    if channels == 0 {
        return Err(AudioError::Input("WAV header declares zero channels".into()));
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let bits = spec.bits_per_sample;
            if bits == 0 || bits > 32 {
                return Err(AudioError::Input(format!(
                    "Unsupported bits_per_sample: {}",
                    bits
                )));
            }
            let full_scale = (1u64 << (bits - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };

    let frames = interleaved.len() / channels;
    let mut waveform = Array2::<f32>::zeros((channels, frames));
    for (frame, chunk) in interleaved.chunks_exact(channels).enumerate() {
        for (channel, value) in chunk.iter().enumerate() {
            waveform[[channel, frame]] = *value;
        }
    }

    Ok(AudioBuffer::new(
        waveform.into_dyn(),
        i64::from(spec.sample_rate),
    ))
}

/// Convenience wrapper around [`read_wav`] for files on disk.
pub fn read_wav_file(path: &Path) -> Result<AudioBuffer> {
    let bytes = std::fs::read(path)?;
    read_wav(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcm::interleave;
    use ndarray::{array, IxDyn};
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read_stereo() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stereo.wav");

        let waveform = array![[0.5f32, -0.5, 0.0], [1.0, 0.25, -1.0]].into_dyn();
        let pcm = interleave(&waveform).unwrap();
        write_wav(&path, &pcm, 22050).unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 2);
        assert_eq!(spec.sample_rate, 22050);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len(), 6);

        let buffer = read_wav_file(&path).unwrap();
        assert_eq!(buffer.sample_rate, Some(22050));
        assert_eq!(buffer.num_channels(), 2);
        assert_eq!(buffer.num_samples(), 3);
        let decoded = buffer.waveform.unwrap();
        assert!((decoded[IxDyn(&[1, 0])] - 1.0).abs() < 1e-3);
        assert!((decoded[IxDyn(&[0, 1])] + 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_read_float_wav() {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for v in [0.0f32, 0.25, -0.75] {
                writer.write_sample(v).unwrap();
            }
            writer.finalize().unwrap();
        }

        let buffer = read_wav(cursor.get_ref()).unwrap();
        assert_eq!(buffer.num_channels(), 1);
        assert_eq!(buffer.num_samples(), 3);
        assert_eq!(buffer.waveform.unwrap()[IxDyn(&[0, 2])], -0.75);
    }

    #[test]
    fn test_read_garbage_is_input_error() {
        let err = read_wav(b"definitely not a wave file").unwrap_err();
        assert!(matches!(err, AudioError::Input(_)));
    }
}

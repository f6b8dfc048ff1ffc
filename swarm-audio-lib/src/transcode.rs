//! Raw audio to audio-only MP4 (AAC) transcoding.
//!
//! The pipeline for one call:
//! - quantize the waveform to interleaved 16-bit PCM
//! - write it to a temporary WAV file
//! - run ffmpeg to produce a fast-start AAC-in-MP4 file
//! - read the MP4 back and check that it looks like an MP4
//!
//! Both temporary files are removed before the call returns, whatever the
//! outcome.

use std::path::PathBuf;

use bytes::Bytes;
use ndarray::ArrayD;
use tracing::{debug, info, warn};

use crate::artifacts::TempArtifacts;
use crate::container::{is_fast_start, major_brand, validate_mp4};
use crate::encoder::EncoderConfig;
use crate::error::{AudioError, Result};
use crate::pcm::{channel_view, interleave};
use crate::process::{ProcessRunner, TokioProcessRunner};
use crate::types::AudioBuffer;
use crate::wav::write_wav;

/// Encodes audio buffers into in-memory MP4 files via an external encoder.
#[derive(Debug, Clone)]
pub struct AudioTranscoder<R = TokioProcessRunner> {
    config: EncoderConfig,
    runner: R,
    temp_dir: PathBuf,
}

impl AudioTranscoder<TokioProcessRunner> {
    /// Transcoder that spawns real ffmpeg processes.
    pub fn new(config: EncoderConfig) -> Self {
        Self::with_runner(config, TokioProcessRunner)
    }
}

impl<R: ProcessRunner> AudioTranscoder<R> {
    pub fn with_runner(config: EncoderConfig, runner: R) -> Self {
        Self {
            config,
            runner,
            temp_dir: std::env::temp_dir(),
        }
    }

    /// Place transient artifacts in `dir` instead of the platform temp dir.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Encode `audio` and return the complete MP4 file.
    pub async fn transcode(&self, audio: Option<&AudioBuffer>) -> Result<Bytes> {
        let (waveform, sample_rate) = check_encodable(audio)?;
        let batch = audio.map_or(1, AudioBuffer::batch_size);
        if batch > 1 {
            warn!(batch, "Batched waveform, only the first item is encoded");
        }

        let artifacts = TempArtifacts::in_dir(&self.temp_dir);
        let result = self
            .encode(&artifacts, waveform.clone(), sample_rate)
            .await;

        // Removal is blocking filesystem work.
        if let Err(e) = tokio::task::spawn_blocking(move || drop(artifacts)).await {
            warn!("Temp file cleanup task failed: {}", e);
        }

        result
    }

    async fn encode(
        &self,
        artifacts: &TempArtifacts,
        waveform: ArrayD<f32>,
        sample_rate: u32,
    ) -> Result<Bytes> {
        let wav_path = artifacts.wav_path().to_path_buf();
        let (channels, frames) = tokio::task::spawn_blocking(move || -> Result<(u16, usize)> {
            let pcm = interleave(&waveform)?;
            write_wav(&wav_path, &pcm, sample_rate)?;
            Ok((pcm.channels, pcm.frames()))
        })
        .await??;

        let exe = self.config.ffmpeg_exe();
        let args = self.config.args(artifacts.wav_path(), artifacts.mp4_path());
        let output = self.runner.run(&exe, &args, self.config.timeout()).await?;

        if !output.success() {
            let diagnostic = output.diagnostic();
            let diagnostic = if diagnostic.is_empty() {
                "unknown"
            } else {
                diagnostic.as_str()
            };
            return Err(AudioError::Transcode(format!(
                "ffmpeg failed (exit code {}): {}",
                output.exit_code, diagnostic
            )));
        }

        let data = tokio::fs::read(artifacts.mp4_path()).await?;
        validate_mp4(&data)?;

        debug!(
            brand = major_brand(&data).as_deref().unwrap_or("?"),
            fast_start = is_fast_start(&data),
            "Encoded container layout"
        );
        info!(
            channels,
            frames,
            sample_rate,
            bytes = data.len(),
            duration_ms = output.duration_ms,
            "Transcoded audio to MP4"
        );

        Ok(Bytes::from(data))
    }
}

/// Check that `audio` can be encoded, returning its waveform and sample rate.
///
/// Everything [`AudioTranscoder::transcode`] rejects as [`AudioError::Input`]
/// is rejected here, without touching the filesystem.
pub fn check_encodable(audio: Option<&AudioBuffer>) -> Result<(&ArrayD<f32>, u32)> {
    let audio = audio.ok_or_else(|| AudioError::Input("no audio provided".into()))?;
    let waveform = audio
        .waveform
        .as_ref()
        .ok_or_else(|| AudioError::Input("audio has no waveform".into()))?;
    let sample_rate = audio
        .sample_rate
        .ok_or_else(|| AudioError::Input("audio has no sample rate".into()))?;
    let sample_rate = u32::try_from(sample_rate)
        .ok()
        .filter(|&rate| rate > 0)
        .ok_or_else(|| AudioError::Input(format!("invalid sample rate: {}", sample_rate)))?;

    if channel_view(waveform)?.nrows() == 0 {
        return Err(AudioError::Input("waveform has no channels".into()));
    }

    Ok((waveform, sample_rate))
}

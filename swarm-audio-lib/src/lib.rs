//! Audio bridge core
//!
//! Two independent operations on an upstream audio buffer:
//! - [`audio_length_to_frames`]: video frame count matching the audio length
//! - [`AudioBridge::save_audio`]: AAC-in-MP4 transcode and delivery to a
//!   viewer as a final preview output

pub(crate) mod artifacts;
pub(crate) mod bridge;
pub(crate) mod container;
pub(crate) mod duration;
pub(crate) mod encoder;
pub(crate) mod error;
pub(crate) mod frames;
pub(crate) mod pcm;
pub(crate) mod process;
pub(crate) mod transcode;
pub(crate) mod types;
pub(crate) mod wav;
pub(crate) mod wire;

#[cfg(test)]
pub(crate) mod tests;

pub use artifacts::TempArtifacts;
pub use bridge::AudioBridge;
pub use container::{has_ftyp_marker, is_fast_start, major_brand, validate_mp4};
pub use duration::estimate_duration;
pub use encoder::EncoderConfig;
pub use error::{AudioError, Result};
pub use frames::{
    audio_length_to_frames, frame_count, FrameRate, DEFAULT_FRAME_RATE, MAX_FRAME_RATE,
    MIN_FRAME_RATE,
};
pub use pcm::{interleave, quantize_sample, InterleavedPcm};
pub use process::{ProcessOutput, ProcessRunner, TokioProcessRunner};
pub use transcode::{check_encodable, AudioTranscoder};
pub use types::AudioBuffer;
pub use wav::{read_wav, read_wav_file, write_wav};
pub use wire::{
    deliver, frame_payload, BinaryEventType, ProgressUpdate, SocketFrame, Transport, WireMessage,
    PROGRESS_SENTINEL, VIDEO_MP4_TYPE_TAG,
};

/// Re-exported so hosts can build waveforms without a direct dependency
pub use ndarray;

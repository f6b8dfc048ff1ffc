//! Integration testing module
//!
//! End-to-end tests for the audio bridge:
//! - Frame counting from decoded WAV input
//! - Transcoding with a real ffmpeg binary (skipped when none is installed)
//! - Delivery of the encoded container over a recording transport

pub mod e2e;

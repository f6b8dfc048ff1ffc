//! ffmpeg invocation for the WAV to AAC-in-MP4 step.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Environment variable consulted when no encoder path is configured
pub const FFMPEG_ENV: &str = "SWARM_FFMPEG";

/// Encoder settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EncoderConfig {
    /// Path to the ffmpeg binary; `None` means `$SWARM_FFMPEG` or `ffmpeg` on PATH
    pub ffmpeg_path: Option<PathBuf>,

    /// Audio codec passed to `-c:a`
    pub audio_codec: String,

    /// Target bitrate passed to `-b:a`
    pub bitrate: String,

    /// Output container passed to `-f`
    pub container: String,

    /// Wall-clock limit for one encoder run, in seconds
    pub timeout_secs: u64,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: None,
            audio_codec: "aac".to_string(),
            bitrate: "192k".to_string(),
            container: "mp4".to_string(),
            timeout_secs: 60,
        }
    }
}

impl EncoderConfig {
    /// Resolve the encoder binary: configured path, then `$SWARM_FFMPEG`,
    /// then plain `ffmpeg`.
    pub fn ffmpeg_exe(&self) -> PathBuf {
        if let Some(path) = &self.ffmpeg_path {
            return path.clone();
        }
        match std::env::var_os(FFMPEG_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => PathBuf::from("ffmpeg"),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Arguments for an audio-only, fast-start encode of `input` to `output`.
    pub fn args(&self, input: &Path, output: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = Vec::with_capacity(16);
        args.extend(["-v", "error", "-y", "-i"].map(OsString::from));
        args.push(input.as_os_str().to_owned());
        args.push("-vn".into());
        args.extend([
            OsString::from("-c:a"),
            OsString::from(&self.audio_codec),
            OsString::from("-b:a"),
            OsString::from(&self.bitrate),
        ]);
        // moov ahead of mdat
        args.extend(["-movflags", "+faststart"].map(OsString::from));
        args.extend([OsString::from("-f"), OsString::from(&self.container)]);
        args.push(output.as_os_str().to_owned());
        args
    }
}

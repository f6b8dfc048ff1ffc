//! Temporary files owned by a single transcode call.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// File name prefix for transient artifacts
pub const ARTIFACT_PREFIX: &str = "swarm_audio_";

/// Paired intermediate WAV and encoded MP4 paths sharing one random suffix.
///
/// Both files are removed when the value is dropped, on every exit path.
/// Removal failures are logged and otherwise ignored.
#[derive(Debug)]
pub struct TempArtifacts {
    wav_path: PathBuf,
    mp4_path: PathBuf,
}

impl TempArtifacts {
    /// Reserve paths in `dir`: `swarm_audio_<16 hex>.wav` and `.mp4`.
    pub fn in_dir(dir: &Path) -> Self {
        let suffix = random_suffix();
        Self {
            wav_path: dir.join(format!("{}{}.wav", ARTIFACT_PREFIX, suffix)),
            mp4_path: dir.join(format!("{}{}.mp4", ARTIFACT_PREFIX, suffix)),
        }
    }

    pub fn wav_path(&self) -> &Path {
        &self.wav_path
    }

    pub fn mp4_path(&self) -> &Path {
        &self.mp4_path
    }
}

impl Drop for TempArtifacts {
    fn drop(&mut self) {
        for path in [&self.wav_path, &self.mp4_path] {
            if !path.is_file() {
                continue;
            }
            if let Err(e) = std::fs::remove_file(path) {
                tracing::warn!(path = %path.display(), "Failed to remove temp file: {}", e);
            }
        }
    }
}

/// Low half of a v4 UUID as 16 lowercase hex digits.
fn random_suffix() -> String {
    format!("{:016x}", Uuid::new_v4().as_u64_pair().1)
}

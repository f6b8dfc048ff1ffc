//! External process execution with a wall-clock bound.

use std::ffi::OsString;
use std::future::Future;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{AudioError, Result};

/// Captured result of a finished process.
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    /// Exit code, `-1` when the process was terminated by a signal
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub duration_ms: u64,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Diagnostic text: stderr, falling back to stdout, decoded lossily and
    /// trimmed. Empty when the process printed nothing.
    pub fn diagnostic(&self) -> String {
        let raw = if self.stderr.is_empty() {
            &self.stdout
        } else {
            &self.stderr
        };
        String::from_utf8_lossy(raw).trim().to_string()
    }
}

/// Runs an external program to completion.
///
/// A timeout or a failure to spawn is reported as [`AudioError::Transcode`];
/// a non-zero exit is not an error at this level.
pub trait ProcessRunner: Send + Sync {
    fn run(
        &self,
        program: &Path,
        args: &[OsString],
        timeout: Duration,
    ) -> impl Future<Output = Result<ProcessOutput>> + Send;
}

/// Real subprocess execution backed by `tokio::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

impl ProcessRunner for TokioProcessRunner {
    async fn run(
        &self,
        program: &Path,
        args: &[OsString],
        timeout: Duration,
    ) -> Result<ProcessOutput> {
        let start = Instant::now();

        debug!(program = %program.display(), ?args, "spawning process");

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                AudioError::Transcode(format!(
                    "failed to spawn {}: {}",
                    program.display(),
                    e
                ))
            })?;

        // Dropping the wait future on timeout kills the child.
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(program = %program.display(), timeout_secs = timeout.as_secs(), "process timed out");
                return Err(AudioError::Transcode(format!(
                    "{} timed out after {} s",
                    program.display(),
                    timeout.as_secs()
                )));
            }
        };

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        let exit_code = output.status.code().unwrap_or(-1);

        debug!(program = %program.display(), exit_code, duration_ms, "process completed");

        Ok(ProcessOutput {
            exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
            duration_ms,
        })
    }
}

//! Save-audio operation: transcode a buffer and push it to a viewer.

use std::sync::Arc;

use tracing::warn;

use crate::error::{AudioError, Result};
use crate::process::{ProcessRunner, TokioProcessRunner};
use crate::transcode::AudioTranscoder;
use crate::types::AudioBuffer;
use crate::wire::{deliver, Transport};

/// Couples a transcoder with the transport that reaches viewer sessions.
pub struct AudioBridge<R = TokioProcessRunner> {
    transcoder: AudioTranscoder<R>,
    transport: Arc<dyn Transport>,
}

impl<R: ProcessRunner> AudioBridge<R> {
    pub fn new(transcoder: AudioTranscoder<R>, transport: Arc<dyn Transport>) -> Self {
        Self {
            transcoder,
            transport,
        }
    }

    pub fn transcoder(&self) -> &AudioTranscoder<R> {
        &self.transcoder
    }

    /// Encode `audio` as MP4 and deliver it to `session`.
    ///
    /// Missing or malformed audio is logged and skipped: the pipeline carries
    /// on without output. Encoder, validation and transport failures are
    /// returned to the caller.
    pub async fn save_audio(&self, session: &str, audio: Option<&AudioBuffer>) -> Result<()> {
        let media = match self.transcoder.transcode(audio).await {
            Ok(media) => media,
            Err(AudioError::Input(reason)) => {
                warn!(session, "Skipping audio output: {}", reason);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        deliver(self.transport.as_ref(), session, &media)
    }
}

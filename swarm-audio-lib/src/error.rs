use thiserror::Error;

/// Main error type for the audio bridge
#[derive(Error, Debug)]
pub enum AudioError {
    /// Missing or malformed audio buffer, waveform or sample rate
    #[error("Invalid audio input: {0}")]
    Input(String),

    /// The external encoder exited non-zero, could not be spawned or timed out
    #[error("Transcoding error: {0}")]
    Transcode(String),

    /// The encoder reported success but its output is not a usable container
    #[error("Validation error: {0}")]
    Validation(String),

    /// A payload failed the pre-send check or the channel rejected a message
    #[error("Transport error: {0}")]
    Transport(String),

    /// A background task panicked or was cancelled
    #[error("Internal error: {0}")]
    Internal(String),

    /// A standard I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<hound::Error> for AudioError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) => AudioError::Io(e),
            other => AudioError::Input(other.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for AudioError {
    fn from(err: tokio::task::JoinError) -> Self {
        AudioError::Internal(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AudioError>;

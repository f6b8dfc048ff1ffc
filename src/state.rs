//! Application state management
//!
//! This module defines the AppState structure that holds:
//! - Connected viewer sessions
//! - The audio bridge (transcoder + session transport)
//! - Server configuration

use std::sync::Arc;

use swarm_audio_lib::{AudioBridge, AudioTranscoder};

use crate::config::ServerConfig;
use crate::session::SessionRegistry;

/// Application state shared across all handlers
pub struct AppState {
    /// Connected viewer sessions
    pub sessions: Arc<SessionRegistry>,

    /// Transcodes audio and delivers it through `sessions`
    pub bridge: AudioBridge,

    /// Server configuration
    pub config: ServerConfig,
}

impl AppState {
    /// Create a new AppState with the given configuration
    pub fn new(config: ServerConfig) -> Self {
        let sessions = Arc::new(SessionRegistry::new());
        let transcoder = AudioTranscoder::new(config.encoder.clone());
        let bridge = AudioBridge::new(transcoder, sessions.clone());

        Self {
            sessions,
            bridge,
            config,
        }
    }

    /// Create AppState with default configuration
    pub fn with_defaults() -> Self {
        Self::new(ServerConfig::default())
    }
}

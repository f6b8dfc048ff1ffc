//! Configuration file support
//!
//! Loads server configuration from TOML files.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::ServerConfig;
use swarm_audio_lib::{EncoderConfig, FrameRate};

/// Configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Server settings
    pub server: ServerSettings,
    /// Encoder settings
    pub encoder: Option<EncoderSettings>,
    /// Frame counting settings
    pub frames: Option<FrameSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Host address to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS
    pub cors_enabled: Option<bool>,
    /// Largest accepted audio upload in MB
    pub max_upload_mb: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderSettings {
    /// Path to the ffmpeg binary
    pub ffmpeg_path: Option<PathBuf>,
    /// Audio codec (`-c:a`)
    pub audio_codec: Option<String>,
    /// Audio bitrate (`-b:a`), e.g. "192k"
    pub bitrate: Option<String>,
    /// Encoder timeout in seconds
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameSettings {
    /// Default frame rate, clamped to 1..=120
    pub default_frame_rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        Self {
            server: ServerSettings {
                host: "0.0.0.0".to_string(),
                port: 8189,
                cors_enabled: Some(true),
                max_upload_mb: Some(64),
            },
            encoder: Some(EncoderSettings {
                ffmpeg_path: None,
                audio_codec: Some("aac".to_string()),
                bitrate: Some("192k".to_string()),
                timeout_secs: Some(60),
            }),
            frames: Some(FrameSettings {
                default_frame_rate: 24,
            }),
            logging: Some(LoggingSettings {
                level: "info".to_string(),
                format: Some("pretty".to_string()),
            }),
        }
    }

    /// Convert to ServerConfig
    pub fn into_server_config(self) -> ServerConfig {
        let defaults = EncoderConfig::default();
        let encoder = match self.encoder {
            Some(e) => EncoderConfig {
                ffmpeg_path: e.ffmpeg_path,
                audio_codec: e.audio_codec.unwrap_or(defaults.audio_codec),
                bitrate: e.bitrate.unwrap_or(defaults.bitrate),
                timeout_secs: e.timeout_secs.unwrap_or(defaults.timeout_secs),
                ..defaults
            },
            None => defaults,
        };

        let logging = self.logging;
        ServerConfig {
            host: self.server.host,
            port: self.server.port,
            cors_enabled: self.server.cors_enabled.unwrap_or(true),
            log_level: logging
                .as_ref()
                .map(|l| l.level.clone())
                .unwrap_or_else(|| "info".to_string()),
            log_format: logging
                .and_then(|l| l.format)
                .unwrap_or_else(|| "pretty".to_string()),
            max_upload_mb: self.server.max_upload_mb.unwrap_or(64),
            default_frame_rate: self
                .frames
                .map(|f| FrameRate::new(f.default_frame_rate))
                .unwrap_or_default(),
            encoder,
        }
    }
}

/// Generate default configuration file at the specified path
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigFile::default_config();
    config.to_file(path)?;
    Ok(())
}

//! HTTP request handlers
//!
//! Implements handlers for the frame-count and audio-delivery endpoints.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use swarm_audio_lib::{
    audio_length_to_frames, check_encodable, estimate_duration, read_wav, AudioError, FrameRate,
};

use crate::error::{Result, ServerError};
use crate::state::AppState;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

/// Version information endpoint
pub async fn version_check(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "online",
        "version": env!("CARGO_PKG_VERSION"),
        "ffmpeg": state.config.encoder.ffmpeg_exe().to_string_lossy(),
    }))
}

/// Connected viewer sessions
/// GET /sessions
pub async fn list_sessions(State(state): State<Arc<AppState>>) -> Json<Vec<String>> {
    tracing::debug!(count = state.sessions.len(), "Listing sessions");
    Json(state.sessions.ids())
}

#[derive(Debug, Deserialize)]
pub struct FramesQuery {
    pub frame_rate: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct FramesResponse {
    pub frames: u32,
    pub frame_rate: u32,
    /// `None` when the body could not be decoded as audio
    pub duration_secs: Option<f64>,
}

/// Frame count for a WAV body
/// POST /frames?frame_rate=24
///
/// Never fails: an undecodable body yields a single frame.
pub async fn frames(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FramesQuery>,
    body: Bytes,
) -> Json<FramesResponse> {
    let frame_rate = query
        .frame_rate
        .map(FrameRate::new)
        .unwrap_or(state.config.default_frame_rate);

    let audio = match tokio::task::spawn_blocking(move || read_wav(&body)).await {
        Ok(Ok(audio)) => Some(audio),
        Ok(Err(e)) => {
            tracing::warn!("Frame count request without usable audio: {}", e);
            None
        }
        Err(e) => {
            tracing::warn!("WAV decode task failed: {}", e);
            None
        }
    };

    let duration_secs = estimate_duration(audio.as_ref());
    let (_, frames) = audio_length_to_frames(audio, frame_rate);

    Json(FramesResponse {
        frames,
        frame_rate: frame_rate.get(),
        duration_secs,
    })
}

/// Encode a WAV body and deliver it to a connected viewer
/// POST /audio/{client_id}
pub async fn deliver_audio(
    State(state): State<Arc<AppState>>,
    Path(client_id): Path<String>,
    body: Bytes,
) -> Result<StatusCode> {
    if !state.sessions.contains(&client_id) {
        return Err(ServerError::SessionNotFound(client_id));
    }

    let audio = tokio::task::spawn_blocking(move || read_wav(&body))
        .await
        .map_err(AudioError::from)??;

    // save_audio skips unusable audio silently; reject it here instead.
    check_encodable(Some(&audio))?;
    state.bridge.save_audio(&client_id, Some(&audio)).await?;

    Ok(StatusCode::NO_CONTENT)
}

//! Preview-socket framing and delivery of encoded media.
//!
//! A delivery is two messages to the same session, in this order:
//! 1. a progress update carrying the sentinel pair `{12346, 12346}`, which
//!    switches the viewer into "final output incoming" mode;
//! 2. a binary message with the outer event type `PREVIEW_IMAGE` whose
//!    payload is a 4-byte big-endian format tag (`5`, MP4 video) followed by
//!    the MP4 file.
//!
//! Viewers treat format tag 5 the same for audio-only and audio+video MP4.

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::container::has_ftyp_marker;
use crate::error::{AudioError, Result};

/// Progress value and maximum reserved for the final-output handshake
pub const PROGRESS_SENTINEL: u32 = 12346;

/// Inner payload format tag for MP4 video containers
pub const VIDEO_MP4_TYPE_TAG: u32 = 5;

/// Outer binary event discriminator on the preview socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BinaryEventType(pub u32);

impl BinaryEventType {
    /// Preview image/video frame
    pub const PREVIEW_IMAGE: Self = Self(1);
}

/// Progress record sent on the socket's progress channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    pub value: u32,
    pub max: u32,
}

impl ProgressUpdate {
    /// The reserved `{12346, 12346}` pair.
    pub const fn sentinel() -> Self {
        Self {
            value: PROGRESS_SENTINEL,
            max: PROGRESS_SENTINEL,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        *self == Self::sentinel()
    }
}

/// A message addressed to one viewer session.
#[derive(Debug, Clone, PartialEq)]
pub enum WireMessage {
    /// Free-form status record, e.g. the session id on connect
    Status(serde_json::Value),
    Progress(ProgressUpdate),
    Binary {
        event: BinaryEventType,
        payload: Bytes,
    },
}

/// A message encoded for a message-oriented socket.
#[derive(Debug, Clone, PartialEq)]
pub enum SocketFrame {
    Text(String),
    Binary(Bytes),
}

impl WireMessage {
    /// Encode for the socket: JSON text `{"type", "data"}` envelopes for
    /// structured events, `event (u32 BE) ++ payload` for binary ones.
    pub fn encode(&self) -> SocketFrame {
        match self {
            WireMessage::Status(data) => SocketFrame::Text(
                serde_json::json!({ "type": "status", "data": data }).to_string(),
            ),
            WireMessage::Progress(progress) => SocketFrame::Text(
                serde_json::json!({ "type": "progress", "data": progress }).to_string(),
            ),
            WireMessage::Binary { event, payload } => {
                let mut buf = BytesMut::with_capacity(4 + payload.len());
                buf.put_u32(event.0);
                buf.extend_from_slice(payload);
                SocketFrame::Binary(buf.freeze())
            }
        }
    }
}

/// Sends messages to viewer sessions.
///
/// Implementations must deliver messages for one session in call order.
pub trait Transport: Send + Sync {
    fn send(&self, session: &str, message: WireMessage) -> Result<()>;
}

/// Prefix `media` with the 4-byte big-endian MP4 format tag.
pub fn frame_payload(media: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(4 + media.len());
    buf.put_u32(VIDEO_MP4_TYPE_TAG);
    buf.extend_from_slice(media);
    buf.freeze()
}

/// Deliver an encoded MP4 to `session` as a final preview output.
///
/// Empty media is a no-op. Media that does not look like an MP4 is rejected
/// before anything is sent.
pub fn deliver<T>(transport: &T, session: &str, media: &[u8]) -> Result<()>
where
    T: Transport + ?Sized,
{
    if media.is_empty() {
        debug!(session, "Nothing to deliver");
        return Ok(());
    }

    if !has_ftyp_marker(media) {
        return Err(AudioError::Transport(
            "media does not look like an MP4 (missing 'ftyp' header)".into(),
        ));
    }

    let payload = frame_payload(media);
    transport.send(session, WireMessage::Progress(ProgressUpdate::sentinel()))?;
    transport.send(
        session,
        WireMessage::Binary {
            event: BinaryEventType::PREVIEW_IMAGE,
            payload,
        },
    )?;

    info!(session, bytes = media.len(), "Delivered audio preview");
    Ok(())
}

//! Viewer session registry
//!
//! Each connected viewer socket owns an unbounded queue. The registry is the
//! [`Transport`] handed to the audio bridge: sends for one session land in
//! that session's queue in call order and the socket task drains it.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use swarm_audio_lib::{AudioError, Transport, WireMessage};
use tokio::sync::mpsc;

struct SessionEntry {
    connection: u64,
    tx: mpsc::UnboundedSender<WireMessage>,
}

/// Handle returned to the socket task that owns a session.
pub struct SessionHandle {
    pub session_id: String,
    pub connection: u64,
    pub rx: mpsc::UnboundedReceiver<WireMessage>,
}

/// Connected viewer sessions keyed by client id
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, SessionEntry>,
    next_connection: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `session_id`, replacing any previous connection with that id.
    pub fn register(&self, session_id: String) -> SessionHandle {
        let connection = self.next_connection.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();

        if self
            .sessions
            .insert(session_id.clone(), SessionEntry { connection, tx })
            .is_some()
        {
            tracing::info!(session = %session_id, "Session reconnected, replacing previous socket");
        }

        SessionHandle {
            session_id,
            connection,
            rx,
        }
    }

    /// Remove the session if it still belongs to `connection`.
    pub fn unregister(&self, session_id: &str, connection: u64) -> bool {
        self.sessions
            .remove_if(session_id, |_, entry| entry.connection == connection)
            .is_some()
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Sorted ids of connected sessions
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.sessions.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Transport for SessionRegistry {
    fn send(&self, session: &str, message: WireMessage) -> swarm_audio_lib::Result<()> {
        let entry = self
            .sessions
            .get(session)
            .ok_or_else(|| AudioError::Transport(format!("no such session: {}", session)))?;

        entry
            .tx
            .send(message)
            .map_err(|_| AudioError::Transport(format!("session {} is closed", session)))
    }
}

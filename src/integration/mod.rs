//! Integration testing module
//!
//! End-to-end tests for the preview server:
//! - Viewer WebSocket sessions and greeting
//! - Delivery handshake ordering on the wire
//! - Session cleanup on disconnect

#[cfg(test)]
mod e2e;

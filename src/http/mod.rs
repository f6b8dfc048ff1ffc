//! HTTP server module
//!
//! This module handles HTTP request routing and handling:
//! - Axum router with all endpoints
//! - Frame-count and audio-delivery handlers
//! - Viewer WebSocket sessions
//! - CORS middleware

pub mod handlers;
pub mod routes;
pub mod socket;

pub use routes::create_router;

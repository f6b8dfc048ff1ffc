//! End-to-end integration tests

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use swarm_audio_lib::{deliver, ProgressUpdate, Transport, WireMessage};

use crate::config::ServerConfig;
use crate::http::create_router;
use crate::state::AppState;

/// Minimal fast-start MP4 skeleton: ftyp, moov, mdat.
fn tiny_mp4() -> Vec<u8> {
    let mut data = Vec::new();
    for (btype, payload) in [
        (b"ftyp", &b"isom\0\0\x02\0isomiso2mp41"[..]),
        (b"moov", &[0u8; 16][..]),
        (b"mdat", &[0xABu8; 32][..]),
    ] {
        data.extend_from_slice(&((8 + payload.len()) as u32).to_be_bytes());
        data.extend_from_slice(btype);
        data.extend_from_slice(payload);
    }
    data
}

async fn spawn_server() -> (SocketAddr, Arc<AppState>) {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..Default::default()
    };
    let state = Arc::new(AppState::new(config));
    let app = create_router(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, state)
}

async fn next_message<S>(stream: &mut S) -> Message
where
    S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("timed out waiting for a socket message")
        .expect("socket closed")
        .expect("socket error")
}

fn json(message: Message) -> serde_json::Value {
    let text = message.into_text().expect("expected a text frame");
    serde_json::from_str(text.as_str()).unwrap()
}

#[tokio::test]
async fn test_viewer_receives_greeting_and_delivery() {
    let (addr, state) = spawn_server().await;

    let url = format!("ws://{}/ws?clientId=viewer-1", addr);
    let (socket, _) = connect_async(url.as_str()).await.unwrap();
    let (_sink, mut stream) = socket.split();

    let hello = json(next_message(&mut stream).await);
    assert_eq!(hello["type"], "status");
    assert_eq!(hello["data"]["sid"], "viewer-1");
    assert_eq!(state.sessions.ids(), vec!["viewer-1".to_string()]);

    let media = tiny_mp4();
    deliver(state.sessions.as_ref(), "viewer-1", &media).unwrap();

    let progress = json(next_message(&mut stream).await);
    assert_eq!(
        progress,
        serde_json::json!({"type": "progress", "data": {"value": 12346, "max": 12346}})
    );

    let binary = next_message(&mut stream).await;
    assert!(binary.is_binary());
    let data = binary.into_data();
    assert_eq!(&data[..8], &[0, 0, 0, 1, 0, 0, 0, 5]);
    assert_eq!(&data[8..], media.as_slice());
}

#[tokio::test]
async fn test_generated_session_id() {
    let (addr, state) = spawn_server().await;

    let (socket, _) = connect_async(format!("ws://{}/ws", addr).as_str())
        .await
        .unwrap();
    let (_sink, mut stream) = socket.split();

    let hello = json(next_message(&mut stream).await);
    let sid = hello["data"]["sid"].as_str().unwrap().to_string();
    assert_eq!(sid.len(), 32);
    assert!(state.sessions.contains(&sid));
}

#[tokio::test]
async fn test_disconnect_unregisters_session() {
    let (addr, state) = spawn_server().await;

    let url = format!("ws://{}/ws?clientId=short-lived", addr);
    let (socket, _) = connect_async(url.as_str()).await.unwrap();
    let (sink, mut stream) = socket.split();
    let _hello = next_message(&mut stream).await;
    assert!(state.sessions.contains("short-lived"));

    drop(sink);
    drop(stream);

    let mut gone = false;
    for _ in 0..50 {
        if !state.sessions.contains("short-lived") {
            gone = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(gone, "session should be removed after the socket closes");

    let err = state
        .sessions
        .send("short-lived", WireMessage::Progress(ProgressUpdate::sentinel()))
        .unwrap_err();
    assert!(matches!(err, swarm_audio_lib::AudioError::Transport(_)));
}

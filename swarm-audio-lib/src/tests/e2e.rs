//! End-to-end tests against a real ffmpeg binary

use std::io::Cursor;
use std::sync::Arc;

use crate::bridge::AudioBridge;
use crate::container::{has_ftyp_marker, is_fast_start, major_brand};
use crate::encoder::EncoderConfig;
use crate::frames::{audio_length_to_frames, FrameRate};
use crate::tests::fixtures::{silence, stereo_tone, RecordingTransport};
use crate::transcode::AudioTranscoder;
use crate::wav::read_wav;
use crate::wire::{BinaryEventType, WireMessage, VIDEO_MP4_TYPE_TAG};

/// Whether the configured ffmpeg can be executed at all.
fn ffmpeg_available(config: &EncoderConfig) -> bool {
    std::process::Command::new(config.ffmpeg_exe())
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn wav_bytes(channels: u16, sample_rate: u32, samples: &[i16]) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

#[test]
fn test_frames_from_wav_blob() {
    // 3 s of stereo at 16 kHz
    let bytes = wav_bytes(2, 16000, &vec![0i16; 2 * 48000]);
    let audio = read_wav(&bytes).unwrap();

    let (passthrough, frames) = audio_length_to_frames(Some(audio.clone()), FrameRate::new(24));
    assert_eq!(frames, 73);
    assert_eq!(passthrough, Some(audio.clone()));

    let (_, frames) = audio_length_to_frames(Some(audio), FrameRate::new(25));
    assert_eq!(frames, 76);
}

#[tokio::test]
async fn test_real_ffmpeg_tone() {
    let config = EncoderConfig::default();
    if !ffmpeg_available(&config) {
        eprintln!("Skipping test: ffmpeg not found");
        return;
    }

    let dir = tempfile::TempDir::new().unwrap();
    let transcoder = AudioTranscoder::new(config).with_temp_dir(dir.path());
    let media = transcoder
        .transcode(Some(&stereo_tone(24000, 1.0)))
        .await
        .unwrap();

    assert!(has_ftyp_marker(&media));
    assert!(major_brand(&media).is_some());
    assert!(is_fast_start(&media), "expected moov ahead of mdat");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_real_ffmpeg_silence_is_valid() {
    let config = EncoderConfig::default();
    if !ffmpeg_available(&config) {
        eprintln!("Skipping test: ffmpeg not found");
        return;
    }

    let transcoder = AudioTranscoder::new(config);
    let media = transcoder
        .transcode(Some(&silence(1, 24000, 0.5)))
        .await
        .unwrap();

    assert!(!media.is_empty());
    assert!(has_ftyp_marker(&media));
}

#[tokio::test]
async fn test_real_ffmpeg_delivery() {
    let config = EncoderConfig::default();
    if !ffmpeg_available(&config) {
        eprintln!("Skipping test: ffmpeg not found");
        return;
    }

    let transport = Arc::new(RecordingTransport::default());
    let bridge = AudioBridge::new(AudioTranscoder::new(config), transport.clone());
    bridge
        .save_audio("viewer", Some(&stereo_tone(44100, 0.5)))
        .await
        .unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert!(matches!(sent[0].1, WireMessage::Progress(p) if p.is_sentinel()));
    let WireMessage::Binary { event, payload } = &sent[1].1 else {
        panic!("expected binary payload");
    };
    assert_eq!(*event, BinaryEventType::PREVIEW_IMAGE);
    assert_eq!(&payload[..4], &VIDEO_MP4_TYPE_TAG.to_be_bytes());
    assert!(has_ftyp_marker(&payload[4..]));
}

//! ISOBMFF (MP4) structure checks on encoder output.

use crate::error::{AudioError, Result};

/// Type-identification box every MP4 starts with
pub const FTYP: &[u8; 4] = b"ftyp";
/// Bytes searched for the `ftyp` marker
pub const MARKER_WINDOW: usize = 64;

/// Whether the `ftyp` marker appears within the first 64 bytes.
pub fn has_ftyp_marker(data: &[u8]) -> bool {
    let window = &data[..data.len().min(MARKER_WINDOW)];
    window.windows(FTYP.len()).any(|w| w == FTYP)
}

/// Reject bytes that do not look like an MP4 file.
pub fn validate_mp4(data: &[u8]) -> Result<()> {
    if has_ftyp_marker(data) {
        Ok(())
    } else {
        Err(AudioError::Validation(
            "well-formed output check failed: missing 'ftyp' header".into(),
        ))
    }
}

/// Walk top-level boxes, calling `callback` with each box type and payload.
/// Stops at the first box whose size field is truncated or invalid.
pub fn walk_top_level<'a, F>(data: &'a [u8], mut callback: F)
where
    F: FnMut(&[u8; 4], &'a [u8]),
{
    let mut pos = 0;
    while pos + 8 <= data.len() {
        let size =
            u32::from_be_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]]) as usize;
        if size < 8 || pos + size > data.len() {
            break;
        }
        let btype = [data[pos + 4], data[pos + 5], data[pos + 6], data[pos + 7]];
        callback(&btype, &data[pos + 8..pos + size]);
        pos += size;
    }
}

/// Major brand from the leading `ftyp` box, e.g. `isom`.
pub fn major_brand(data: &[u8]) -> Option<String> {
    let mut brand = None;
    walk_top_level(data, |btype, payload| {
        if brand.is_none() && btype == FTYP && payload.len() >= 4 {
            brand = Some(String::from_utf8_lossy(&payload[..4]).into_owned());
        }
    });
    brand
}

/// Whether `moov` precedes `mdat`, so playback can start before the whole
/// file has arrived.
pub fn is_fast_start(data: &[u8]) -> bool {
    let mut order = Vec::new();
    walk_top_level(data, |btype, _| {
        if btype == b"moov" || btype == b"mdat" {
            order.push(*btype);
        }
    });
    matches!(order.first(), Some(b) if b == b"moov")
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Build a box with the given type and payload.
    pub(crate) fn mp4_box(btype: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + payload.len());
        out.extend_from_slice(&((8 + payload.len()) as u32).to_be_bytes());
        out.extend_from_slice(btype);
        out.extend_from_slice(payload);
        out
    }

    /// Minimal fast-start MP4 skeleton: ftyp, moov, mdat.
    pub(crate) fn fake_mp4() -> Vec<u8> {
        let mut data = mp4_box(b"ftyp", b"isom\0\0\x02\0isomiso2mp41");
        data.extend(mp4_box(b"moov", &[0u8; 16]));
        data.extend(mp4_box(b"mdat", &[0xAB; 32]));
        data
    }

    #[test]
    fn test_marker_found() {
        assert!(has_ftyp_marker(&fake_mp4()));
        assert!(validate_mp4(&fake_mp4()).is_ok());
    }

    #[test]
    fn test_marker_outside_window() {
        let mut data = vec![0u8; MARKER_WINDOW];
        data.extend_from_slice(b"ftyp");
        assert!(!has_ftyp_marker(&data));
        assert!(matches!(validate_mp4(&data), Err(AudioError::Validation(_))));
    }

    #[test]
    fn test_marker_at_window_edge() {
        let mut data = vec![0u8; MARKER_WINDOW - 4];
        data.extend_from_slice(b"ftyp");
        assert!(has_ftyp_marker(&data));
    }

    #[test]
    fn test_short_and_empty_input() {
        assert!(!has_ftyp_marker(b""));
        assert!(!has_ftyp_marker(b"fty"));
    }

    #[test]
    fn test_major_brand() {
        assert_eq!(major_brand(&fake_mp4()).as_deref(), Some("isom"));
        assert_eq!(major_brand(b"garbage"), None);
    }

    #[test]
    fn test_fast_start_order() {
        assert!(is_fast_start(&fake_mp4()));

        let mut late_moov = mp4_box(b"ftyp", b"isom\0\0\x02\0");
        late_moov.extend(mp4_box(b"mdat", &[0u8; 8]));
        late_moov.extend(mp4_box(b"moov", &[0u8; 8]));
        assert!(!is_fast_start(&late_moov));
    }
}

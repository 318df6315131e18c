use crate::error::{EnforaError, Result};
use crate::parser::decoder::EnforaDecoder;
use crate::session::InMemorySessions;
use crate::types::{DecodedFrame, FrameCapture};
use log::{debug, info};
use std::net::SocketAddr;
use std::path::Path;

/// Parse a frame file: one hex-encoded frame per line
///
/// Blank lines and lines starting with `#` are skipped, whitespace inside a
/// line is ignored.
pub fn parse_hex_frames(text: &str) -> Result<Vec<Vec<u8>>> {
    let mut frames = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let frame = decode_hex(line).map_err(|err| EnforaError::InvalidFrameFile {
            line: index + 1,
            reason: err.to_string(),
        })?;
        frames.push(frame);
    }
    Ok(frames)
}

fn decode_hex(line: &str) -> std::result::Result<Vec<u8>, hex::FromHexError> {
    let digits: String = line
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    hex::decode(digits)
}

/// Read and parse a frame file
pub fn read_frame_file(file_path: &Path) -> Result<Vec<Vec<u8>>> {
    let data = std::fs::read(file_path)?;
    let text = std::str::from_utf8(&data)?;
    let frames = parse_hex_frames(text)?;
    debug!("Read {} frames from {:?}", frames.len(), file_path);
    Ok(frames)
}

/// Decode a sequence of frames received on one connection
///
/// Every accepted position updates the device's last fix, so a later
/// acknowledgement on the same connection is anchored at it.
pub fn parse_capture(
    sessions: &InMemorySessions,
    remote: &SocketAddr,
    name: String,
    frames: &[Vec<u8>],
) -> FrameCapture {
    let decoder = EnforaDecoder::new(sessions);
    let mut capture = FrameCapture::new(name);

    for frame in frames {
        let decoded = decoder.decode(remote, frame);
        if let Some(DecodedFrame::Position(position)) = &decoded {
            sessions.record_fix(position.device_id, position.to_last_fix());
        }
        capture.push(frame.len(), decoded);
    }

    info!(
        "{}: {} frames, {} positions, {} results, {} discarded",
        capture.name,
        capture.stats.total_frames,
        capture.stats.positions,
        capture.stats.results,
        capture.stats.discarded
    );
    capture
}

/// Read a frame file and decode it as one connection
pub fn parse_frame_file(
    file_path: &Path,
    sessions: &InMemorySessions,
    remote: &SocketAddr,
) -> Result<FrameCapture> {
    let frames = read_frame_file(file_path)?;
    let name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();
    Ok(parse_capture(sessions, remote, name, &frames))
}

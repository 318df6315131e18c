use crate::types::{Attributes, CommandResult, Position};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque device identity handed out by the device resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeviceId(pub u64);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shape of a raw frame, decided before any field is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Position report with an embedded GPRMC sentence
    Telemetry,
    /// Textual command acknowledgement ("OK" / "ERROR")
    Result,
}

/// Record produced by decoding one frame
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum DecodedFrame {
    Position(Position),
    Result(CommandResult),
}

impl DecodedFrame {
    pub fn kind(&self) -> FrameKind {
        match self {
            DecodedFrame::Position(_) => FrameKind::Telemetry,
            DecodedFrame::Result(_) => FrameKind::Result,
        }
    }

    pub fn device_id(&self) -> DeviceId {
        match self {
            DecodedFrame::Position(position) => position.device_id,
            DecodedFrame::Result(result) => result.device_id,
        }
    }

    pub fn attributes(&self) -> &Attributes {
        match self {
            DecodedFrame::Position(position) => &position.attributes,
            DecodedFrame::Result(result) => &result.attributes,
        }
    }

    pub fn as_position(&self) -> Option<&Position> {
        match self {
            DecodedFrame::Position(position) => Some(position),
            DecodedFrame::Result(_) => None,
        }
    }

    pub fn as_result(&self) -> Option<&CommandResult> {
        match self {
            DecodedFrame::Result(result) => Some(result),
            DecodedFrame::Position(_) => None,
        }
    }
}

/// Frame statistics for one capture
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameStats {
    pub total_frames: u32,
    pub positions: u32,
    pub results: u32,
    pub discarded: u32,
    pub total_bytes: u64,
}

impl FrameStats {
    pub fn record(&mut self, frame_len: usize, decoded: Option<&DecodedFrame>) {
        self.total_frames += 1;
        self.total_bytes += frame_len as u64;
        match decoded.map(DecodedFrame::kind) {
            Some(FrameKind::Telemetry) => self.positions += 1,
            Some(FrameKind::Result) => self.results += 1,
            None => self.discarded += 1,
        }
    }
}

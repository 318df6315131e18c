use crate::types::{CommandResult, DecodedFrame, FrameStats, Position};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Records decoded from one connection's worth of frames
#[derive(Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FrameCapture {
    pub name: String,
    pub stats: FrameStats,
    pub records: Vec<DecodedFrame>,
}

impl FrameCapture {
    pub fn new(name: String) -> Self {
        Self {
            name,
            stats: FrameStats::default(),
            records: Vec::new(),
        }
    }

    /// Account for one frame and keep its record, if any
    pub fn push(&mut self, frame_len: usize, decoded: Option<DecodedFrame>) {
        self.stats.record(frame_len, decoded.as_ref());
        if let Some(record) = decoded {
            self.records.push(record);
        }
    }

    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.records.iter().filter_map(DecodedFrame::as_position)
    }

    pub fn results(&self) -> impl Iterator<Item = &CommandResult> {
        self.records.iter().filter_map(DecodedFrame::as_result)
    }

    /// Check if any frame established a valid fix
    pub fn has_valid_fix(&self) -> bool {
        self.positions().any(|position| position.valid)
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

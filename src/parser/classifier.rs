use crate::types::FrameKind;

/// Markers that identify a command acknowledgement frame
pub const RESULT_MARKERS: [&[u8]; 2] = [b"OK", b"ERROR"];

/// Find the first position of `needle` inside `haystack`
pub fn find_marker(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Decide which decoder a raw frame belongs to
///
/// Any occurrence of "OK" or "ERROR" (case-sensitive) makes it an
/// acknowledgement; everything else is telemetry.
pub fn classify(buf: &[u8]) -> FrameKind {
    if RESULT_MARKERS
        .iter()
        .any(|marker| find_marker(buf, marker).is_some())
    {
        FrameKind::Result
    } else {
        FrameKind::Telemetry
    }
}

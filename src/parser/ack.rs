use crate::session::{DeviceResolver, LastFixProvider};
use crate::types::CommandResult;
use log::debug;
use std::net::SocketAddr;

/// Length of the envelope in front of the acknowledgement text
pub const RESULT_HEADER_LENGTH: usize = 9;
/// Length of the trailer after the acknowledgement text
pub const RESULT_TRAILER_LENGTH: usize = 2;

/// Acknowledgement text between envelope and trailer, decoded as ASCII
///
/// Every byte outside the ASCII range becomes U+FFFD on its own, so a
/// multi-byte UTF-8 sequence yields one replacement character per byte.
pub fn result_text(buf: &[u8]) -> Option<String> {
    let end = buf.len().checked_sub(RESULT_TRAILER_LENGTH)?;
    let payload = buf.get(RESULT_HEADER_LENGTH..end)?;
    Some(
        payload
            .iter()
            .map(|&byte| {
                if byte.is_ascii() {
                    char::from(byte)
                } else {
                    char::REPLACEMENT_CHARACTER
                }
            })
            .collect(),
    )
}

/// Decode a command acknowledgement frame
///
/// The device is the one bound to the connection; the record is anchored at
/// its last known fix (or the epoch at 0,0 if it has none).
pub fn decode_result<S>(sessions: &S, remote: &SocketAddr, buf: &[u8]) -> Option<CommandResult>
where
    S: DeviceResolver + LastFixProvider + ?Sized,
{
    let Some(device_id) = sessions.resolve_connection(remote) else {
        debug!("No device bound to {}, discarding acknowledgement", remote);
        return None;
    };

    let fix = sessions.last_fix(device_id).unwrap_or_default();

    let Some(text) = result_text(buf) else {
        debug!("Acknowledgement too short ({} bytes), discarding", buf.len());
        return None;
    };

    Some(CommandResult::new(device_id, fix, text))
}

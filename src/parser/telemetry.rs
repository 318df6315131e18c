//! Telemetry frame decoding
//!
//! A telemetry frame is a 7-byte binary header followed by an ASCII report:
//! event code, IMEI, I/O status and two analog channels, then a truncated
//! GPRMC sentence, then optional battery and odometer fields. Anything after
//! the last recognised field (including the binary trailer) is ignored.

use crate::conversion::{convert_millivolts_to_volts, decode_io_flags};
use crate::parser::alarm::{classify_event, EventKind};
use crate::parser::cursor::CaptureCursor;
use crate::parser::date::assemble_fix_time;
use crate::session::DeviceResolver;
use crate::types::{
    indexed_key, Position, KEY_ALARM, KEY_BATTERY_LEVEL, KEY_IGNITION, KEY_ODOMETER,
    KEY_ODOMETER_TRIP, KEY_POWER, KEY_SATELLITES, PREFIX_ADC, PREFIX_IO,
};
use log::{debug, trace};
use regex::bytes::Regex;
use std::net::SocketAddr;
use std::sync::OnceLock;

/// Length of the binary header in front of the ASCII report
pub const TELEMETRY_HEADER_LENGTH: usize = 7;
/// Length of the binary trailer after the ASCII report
pub const TELEMETRY_TRAILER_LENGTH: usize = 7;
/// Number of digits in a device IMEI
pub const IMEI_LENGTH: usize = 15;

/// Number of analog channels reported in front of the GPRMC sentence
const ANALOG_CHANNELS: usize = 2;

// Unicode is disabled so `\d`/`\s` stay ASCII and `[^*]` can cross binary bytes.
const PATTERN_SOURCE: &str = concat!(
    r"(?-u)^",
    r"\s*(\d+)",                  // event
    r"\s*(\d{15})",               // imei
    r"\s*(\d*)",                  // in outs
    r"\s*(-?\d*)",                // AD1 (mV)
    r"\s*(-?\d*)",                // AD2 (mV)
    r" \$?GPRMC,",
    r"(\d\d)(\d\d)(\d\d)\.?\d*,", // time (hhmmss)
    r"([AV]),",                   // validity
    r"(\d\d)(\d\d\.\d+),",        // latitude
    r"([NS]),",
    r"(\d\d\d)(\d\d\.\d+),",      // longitude
    r"([EW]),",
    r"(\d+\.\d+)?,",              // speed
    r"(\d+\.\d+)?,",              // course
    r"(\d\d)(\d\d)(\d\d),",       // date (ddmmyy)
    r"(?:(-?\d*),)?",             // altitude
    r"(?:(-?\d*),)?",             // satellites
    r"[^*]*\*\d+",                // checksum
    r"(?:\s*(\d{2}))?",           // battery percent
    r"\s*(\d*)",                  // trip odometer
    r"\s*(\d*)",                  // gps odometer
    r"(?:\s*(\d{5}))?",           // battery voltage (mV)
);

static PATTERN: OnceLock<Regex> = OnceLock::new();

fn pattern() -> &'static Regex {
    PATTERN.get_or_init(|| Regex::new(PATTERN_SOURCE).expect("telemetry pattern is valid"))
}

/// ASCII report of a telemetry frame, or `None` if the frame is too short
///
/// The trailer is not cut off here; the grammar stops at the last field it
/// recognises. Trailer bytes that look like the optional battery or odometer
/// fields (digits after the checksum) are read as those fields.
pub fn telemetry_sentence(buf: &[u8]) -> Option<&[u8]> {
    if buf.len() < TELEMETRY_HEADER_LENGTH + TELEMETRY_TRAILER_LENGTH {
        return None;
    }
    buf.get(TELEMETRY_HEADER_LENGTH..)
}

/// Decode a telemetry frame into a position
///
/// Returns `None` when the report does not match the grammar, the device is
/// unknown, or the fix date/time is not a real calendar value.
pub fn decode_position<R>(resolver: &R, remote: &SocketAddr, buf: &[u8]) -> Option<Position>
where
    R: DeviceResolver + ?Sized,
{
    let Some(sentence) = telemetry_sentence(buf) else {
        debug!("Telemetry frame too short ({} bytes), discarding", buf.len());
        return None;
    };

    let Some(captures) = pattern().captures(sentence) else {
        debug!(
            "Telemetry report does not match grammar: {:?}",
            String::from_utf8_lossy(sentence)
        );
        return None;
    };
    trace!("Matched telemetry report: {:?}", String::from_utf8_lossy(sentence));

    let mut parser = CaptureCursor::new(captures);

    let event = parser.next_int().unwrap_or(0);

    let imei = parser.next_str()?;
    let Some(device_id) = resolver.resolve_imei(remote, imei) else {
        debug!("Unknown device {}, discarding report", imei);
        return None;
    };

    // Placeholder time; replaced once the date group has been read
    let mut position = Position::new(device_id, Default::default());

    match classify_event(event) {
        EventKind::Ignition(on) => position.set(KEY_IGNITION, on),
        EventKind::Alarm(Some(alarm)) => position.set(KEY_ALARM, alarm.as_str()),
        EventKind::Alarm(None) | EventKind::Routine => {}
    }

    if let Some(status) = parser.next_int() {
        for (i, flag) in decode_io_flags(status).into_iter().enumerate() {
            position.set(indexed_key(PREFIX_IO, i + 1), flag);
        }
    }

    for channel in 1..=ANALOG_CHANNELS {
        if let Some(raw) = parser.next_int() {
            position.set(
                indexed_key(PREFIX_ADC, channel),
                convert_millivolts_to_volts(raw),
            );
        }
    }

    let hour = parser.next_u32().unwrap_or(0);
    let minute = parser.next_u32().unwrap_or(0);
    let second = parser.next_u32().unwrap_or(0);

    position.valid = parser.next_str() == Some("A");
    position.latitude = parser.next_coordinate()?;
    position.longitude = parser.next_coordinate()?;
    position.speed = parser.next_double().unwrap_or(0.0);
    position.course = parser.next_double().unwrap_or(0.0);

    let day = parser.next_u32().unwrap_or(0);
    let month = parser.next_u32().unwrap_or(0);
    let year = parser.next_u32().unwrap_or(0) as i32;
    let Some(fix_time) = assemble_fix_time(hour, minute, second, day, month, year) else {
        debug!(
            "Invalid fix date {:02}{:02}{:02} {:02}:{:02}:{:02} from {}, discarding",
            day, month, year, hour, minute, second, imei
        );
        return None;
    };
    position.fix_time = fix_time;

    position.altitude = parser.next_double();

    if let Some(satellites) = parser.next_int() {
        position.set(KEY_SATELLITES, satellites);
    }

    if let Some(battery_level) = parser.next_int() {
        position.set(KEY_BATTERY_LEVEL, battery_level);
    }

    if let Some(trip) = parser.next_int() {
        position.set(KEY_ODOMETER_TRIP, trip);
    }

    if let Some(odometer) = parser.next_int() {
        position.set(KEY_ODOMETER, odometer);
    }

    if let Some(power) = parser.next_int() {
        position.set(KEY_POWER, convert_millivolts_to_volts(power));
    }

    Some(position)
}

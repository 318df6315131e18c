//! Data conversion utilities for Enfora frame decoding
//!
//! Contains the unit scaling, coordinate and bitmask helpers applied to raw
//! field values once the sentence grammar has matched.

/// Number of digital I/O flags carried by the status bitmask
pub const IO_FLAG_COUNT: usize = 9;

/// Convert a raw millivolt reading to volts
pub fn convert_millivolts_to_volts(raw_value: i64) -> f64 {
    // Analog channels and battery voltage are sent in millivolts
    raw_value as f64 * 0.001
}

/// Convert NMEA degrees + decimal minutes + hemisphere to signed decimal degrees
pub fn convert_coordinate(degrees: i64, minutes: f64, hemisphere: &str) -> f64 {
    let coordinate = degrees as f64 + minutes / 60.0;
    match hemisphere {
        "S" | "W" => -coordinate,
        _ => coordinate,
    }
}

/// Expand an NMEA two-digit year into the current century
pub fn expand_two_digit_year(year: i32) -> i32 {
    if year < 100 {
        year + 2000
    } else {
        year
    }
}

/// Split the I/O status bitmask into its nine flags
///
/// Flag `i` (1-based) is bit `i - 1`; higher bits are ignored.
pub fn decode_io_flags(status: i64) -> [bool; IO_FLAG_COUNT] {
    let mut flags = [false; IO_FLAG_COUNT];
    for (bit, flag) in flags.iter_mut().enumerate() {
        *flag = (status >> bit) & 1 != 0;
    }
    flags
}

//! Event code interpretation
//!
//! Every telemetry frame starts with a numeric event code saying why the
//! device reported. Two codes carry the ignition state, a fixed set maps to
//! alarm categories, and 0 is a routine report.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Event code reported when the ignition is switched on
pub const EVENT_IGNITION_ON: i64 = 10;
/// Event code reported when the ignition is switched off
pub const EVENT_IGNITION_OFF: i64 = 11;

/// Alarm category raised by a device event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum Alarm {
    Sos,
    PowerCut,
    PowerRestored,
    PowerOff,
    PowerOn,
    GpsAntennaCut,
    Overspeed,
    Braking,
    Acceleration,
}

impl Alarm {
    /// Attribute value stored under the `alarm` key
    pub fn as_str(&self) -> &'static str {
        match self {
            Alarm::Sos => "sos",
            Alarm::PowerCut => "powerCut",
            Alarm::PowerRestored => "powerRestored",
            Alarm::PowerOff => "powerOff",
            Alarm::PowerOn => "powerOn",
            Alarm::GpsAntennaCut => "gpsAntennaCut",
            Alarm::Overspeed => "overspeed",
            Alarm::Braking => "braking",
            Alarm::Acceleration => "acceleration",
        }
    }
}

impl fmt::Display for Alarm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map an event code to its alarm category
///
/// Codes outside the table (including the ignition codes) have no alarm.
pub fn decode_alarm(event: i64) -> Option<Alarm> {
    match event {
        12 => Some(Alarm::Sos),
        14 => Some(Alarm::PowerCut),
        15 => Some(Alarm::PowerRestored),
        17 => Some(Alarm::PowerOff),
        18 => Some(Alarm::PowerOn),
        19 => Some(Alarm::GpsAntennaCut),
        40 => Some(Alarm::Overspeed),
        91 => Some(Alarm::Braking),
        92 => Some(Alarm::Acceleration),
        _ => None,
    }
}

/// What an event code contributes to a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Routine report, nothing to record
    Routine,
    /// Ignition state change
    Ignition(bool),
    /// Alarm-class event; `None` when the code is not in the alarm table
    Alarm(Option<Alarm>),
}

/// Classify a raw event code
pub fn classify_event(event: i64) -> EventKind {
    match event {
        EVENT_IGNITION_ON => EventKind::Ignition(true),
        EVENT_IGNITION_OFF => EventKind::Ignition(false),
        code if code > 0 => EventKind::Alarm(decode_alarm(code)),
        _ => EventKind::Routine,
    }
}

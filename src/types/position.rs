use crate::types::{AttributeValue, Attributes, DeviceId, KEY_RESULT};
use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Protocol name stamped on every decoded record
pub const PROTOCOL_NAME: &str = "enfora";

/// GPS position decoded from a telemetry frame
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub protocol: String,
    pub device_id: DeviceId,
    pub valid: bool,
    pub fix_time: DateTime<Utc>,
    /// Signed decimal degrees (negative = South)
    pub latitude: f64,
    /// Signed decimal degrees (negative = West)
    pub longitude: f64,
    pub altitude: Option<f64>,
    /// Speed as transmitted by the device (knots)
    pub speed: f64,
    pub course: f64,
    pub attributes: Attributes,
}

impl Position {
    pub fn new(device_id: DeviceId, fix_time: DateTime<Utc>) -> Self {
        Self {
            protocol: PROTOCOL_NAME.to_string(),
            device_id,
            valid: false,
            fix_time,
            latitude: 0.0,
            longitude: 0.0,
            altitude: None,
            speed: 0.0,
            course: 0.0,
            attributes: Attributes::new(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// The fix this position establishes, as later seen by the last-fix store
    pub fn to_last_fix(&self) -> LastFix {
        LastFix {
            valid: self.valid,
            fix_time: self.fix_time,
            latitude: self.latitude,
            longitude: self.longitude,
            altitude: self.altitude,
            speed: self.speed,
            course: self.course,
        }
    }
}

/// Last known fix of a device
///
/// The default is the UNIX epoch at (0, 0), used for devices with no history.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LastFix {
    pub valid: bool,
    pub fix_time: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub speed: f64,
    pub course: f64,
}

/// Command acknowledgement anchored at the device's last known fix
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CommandResult {
    pub protocol: String,
    pub device_id: DeviceId,
    /// Always true: the fix is copied, never established by this record
    pub outdated: bool,
    pub fix: LastFix,
    pub attributes: Attributes,
}

impl CommandResult {
    pub fn new(device_id: DeviceId, fix: LastFix, result: String) -> Self {
        let mut attributes = Attributes::new();
        attributes.insert(KEY_RESULT.to_string(), AttributeValue::Text(result));
        Self {
            protocol: PROTOCOL_NAME.to_string(),
            device_id,
            outdated: true,
            fix,
            attributes,
        }
    }

    /// Raw acknowledgement text
    pub fn result(&self) -> &str {
        self.attributes
            .get(KEY_RESULT)
            .and_then(AttributeValue::as_str)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_position_creation() {
        let time = Utc.with_ymd_and_hms(2023, 2, 1, 10, 20, 30).unwrap();
        let mut position = Position::new(DeviceId(7), time);
        position.set("sat", 8i64);

        assert_eq!(position.protocol, "enfora");
        assert!(!position.valid);
        assert_eq!(position.altitude, None);
        assert_eq!(position.attribute("sat"), Some(&AttributeValue::Int(8)));
        assert_eq!(position.attribute("alarm"), None);
    }

    #[test]
    fn test_last_fix_default_is_epoch() {
        let fix = LastFix::default();
        assert_eq!(fix.fix_time.timestamp(), 0);
        assert_eq!(fix.latitude, 0.0);
        assert!(!fix.valid);
    }

    #[test]
    fn test_command_result_text() {
        let result = CommandResult::new(DeviceId(1), LastFix::default(), "OK".to_string());
        assert!(result.outdated);
        assert_eq!(result.result(), "OK");
    }
}

use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const KEY_IGNITION: &str = "ignition";
pub const KEY_ALARM: &str = "alarm";
pub const KEY_SATELLITES: &str = "sat";
pub const KEY_BATTERY_LEVEL: &str = "batteryLevel";
pub const KEY_ODOMETER_TRIP: &str = "tripOdometer";
pub const KEY_ODOMETER: &str = "odometer";
pub const KEY_POWER: &str = "power";
pub const KEY_RESULT: &str = "result";

/// Prefix of the indexed digital I/O flags (`io1` .. `io9`)
pub const PREFIX_IO: &str = "io";
/// Prefix of the indexed analog channel readings (`adc1`, `adc2`)
pub const PREFIX_ADC: &str = "adc";

/// Build an indexed attribute key such as `io3` or `adc1`
pub fn indexed_key(prefix: &str, index: usize) -> String {
    format!("{}{}", prefix, index)
}

/// Value of a named record attribute
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum AttributeValue {
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
}

impl AttributeValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttributeValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Double(value) => Some(*value),
            AttributeValue::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Bool(value) => write!(f, "{}", value),
            AttributeValue::Int(value) => write!(f, "{}", value),
            AttributeValue::Double(value) => write!(f, "{}", value),
            AttributeValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Double(value)
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

/// Named attributes attached to a decoded record, ordered by key
pub type Attributes = BTreeMap<String, AttributeValue>;

//! Typed setting values.
//!
//! The store only understands four value types.  Every schema key declares
//! exactly one of them, and every stored value is a [`SettingValue`] tagged
//! with its type, so a mismatch can be detected with a single comparison.

use std::fmt;

use crate::domain::errors::SchemaError;

/// The declared type of a settings key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Boolean,
    /// 32-bit signed integer.
    Integer,
    /// Finite 64-bit float.
    Double,
}

impl ValueType {
    /// Lower-case type name used in messages and the CLI.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Double => "double",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value stored under a settings key.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
    String(String),
    Boolean(bool),
    Integer(i32),
    Double(f64),
}

impl SettingValue {
    /// Returns the type tag of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            SettingValue::String(_) => ValueType::String,
            SettingValue::Boolean(_) => ValueType::Boolean,
            SettingValue::Integer(_) => ValueType::Integer,
            SettingValue::Double(_) => ValueType::Double,
        }
    }

    /// Parses user-supplied text as a value of type `expected`.
    ///
    /// Strings are taken verbatim.  Booleans accept `true` / `false`.  Doubles
    /// must be finite.  `key` is only used to build the error.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidLiteral`] if `text` is not a valid literal
    /// of the requested type.
    pub fn parse_literal(key: &str, expected: ValueType, text: &str) -> Result<Self, SchemaError> {
        let invalid = || SchemaError::InvalidLiteral {
            key: key.to_string(),
            expected,
            literal: text.to_string(),
        };
        let trimmed = text.trim();
        match expected {
            ValueType::String => Ok(SettingValue::String(text.to_string())),
            ValueType::Boolean => match trimmed {
                "true" => Ok(SettingValue::Boolean(true)),
                "false" => Ok(SettingValue::Boolean(false)),
                _ => Err(invalid()),
            },
            ValueType::Integer => trimmed
                .parse::<i32>()
                .map(SettingValue::Integer)
                .map_err(|_| invalid()),
            ValueType::Double => match trimmed.parse::<f64>() {
                Ok(v) if v.is_finite() => Ok(SettingValue::Double(v)),
                _ => Err(invalid()),
            },
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            SettingValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            SettingValue::Double(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::String(s) => write!(f, "{s:?}"),
            SettingValue::Boolean(b) => write!(f, "{b}"),
            SettingValue::Integer(i) => write!(f, "{i}"),
            // Keep a trailing ".0" so doubles stay distinguishable from integers.
            SettingValue::Double(d) => write!(f, "{d:?}"),
        }
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::String(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::String(value)
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Boolean(value)
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        SettingValue::Integer(value)
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        SettingValue::Double(value)
    }
}

/// Rust types that can be read out of a [`SettingValue`].
///
/// Used by the store's generic typed getter.  `extract` returns `None` when the
/// value has a different type tag.
pub trait FromSettingValue: Sized {
    const VALUE_TYPE: ValueType;

    fn extract(value: &SettingValue) -> Option<Self>;
}

impl FromSettingValue for String {
    const VALUE_TYPE: ValueType = ValueType::String;

    fn extract(value: &SettingValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }
}

impl FromSettingValue for bool {
    const VALUE_TYPE: ValueType = ValueType::Boolean;

    fn extract(value: &SettingValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromSettingValue for i32 {
    const VALUE_TYPE: ValueType = ValueType::Integer;

    fn extract(value: &SettingValue) -> Option<Self> {
        value.as_i32()
    }
}

impl FromSettingValue for f64 {
    const VALUE_TYPE: ValueType = ValueType::Double;

    fn extract(value: &SettingValue) -> Option<Self> {
        value.as_f64()
    }
}

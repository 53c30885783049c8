use thiserror::Error;

use crate::domain::value::ValueType;

/// Errors raised when a caller addresses the schema incorrectly.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SchemaError {
    /// The key name is not declared in the schema.
    #[error("unknown settings key: {0:?}")]
    UnknownKey(String),

    /// The text cannot be parsed as a value of the key's declared type.
    #[error("invalid {expected} literal for key {key}: {literal:?}")]
    InvalidLiteral {
        key: String,
        expected: ValueType,
        literal: String,
    },
}

/// A write whose value does not have the key's declared type.
///
/// The store rejects such writes before anything is persisted, so the prior
/// value is always kept.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("type mismatch for key {key}: expected {expected}, got {actual}")]
pub struct TypeMismatchError {
    pub key: String,
    pub expected: ValueType,
    pub actual: ValueType,
}

//! Read/write access to a target object graph by field path
//!
//! An [`Accessor`] reads, writes, types and converts values addressed by field
//! paths. Two variants exist, selected once per binder:
//!
//! - [`PropertyAccessor`]: full property paths (`a.b`, `list[0]`, `map[key]`)
//!   with auto-growth of absent nested nodes and bounded growth of lists.
//! - [`DirectFieldAccessor`]: named fields only, no indexed or keyed access.
//!
//! Both operate on the serde tree of the target and prove each write by
//! deserializing the updated tree back into the target type, rolling the write
//! back when the target rejects it.
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

mod direct;
mod property;
mod tree;

pub use direct::DirectFieldAccessor;
pub use property::PropertyAccessor;
pub use tree::TreeOptions;

use crate::convert::{ConvertError, TypeConverter};
use crate::value::{FieldType, PropertyValues, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Value could not be converted to the field's type
pub const TYPE_MISMATCH: &str = "type-mismatch";
/// The target rejected a value that had the right shape
pub const METHOD_INVOCATION: &str = "method-invocation";
pub const NOT_READABLE: &str = "not-readable";
pub const NOT_WRITABLE: &str = "not-writable";

/// Default upper bound for list auto-growth
pub const DEFAULT_AUTO_GROW_COLLECTION_LIMIT: usize = 256;

/// How field paths are resolved against the target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMode {
    /// Property paths with nesting, indexes and keys
    #[default]
    Property,
    /// Named fields only
    Direct,
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessMode::Property => write!(f, "property"),
            AccessMode::Direct => write!(f, "direct"),
        }
    }
}

/// Classification of an access failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessErrorKind {
    /// No such field on the target
    UnknownField,
    NotReadable,
    NotWritable,
    /// A null intermediate without auto-growth, a list index beyond its
    /// bounds or growth limit, or a malformed path
    InvalidPath,
    TypeMismatch,
    MethodInvocation,
}

/// Failure to read or write a single field
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct AccessError {
    pub kind: AccessErrorKind,
    /// Canonical path of the field
    pub field: String,
    /// The value that was being written, if any
    pub rejected_value: Option<Value>,
    /// One of [`TYPE_MISMATCH`], [`METHOD_INVOCATION`], [`NOT_READABLE`], [`NOT_WRITABLE`]
    pub error_code: &'static str,
    pub message: String,
}

impl AccessError {
    fn new(
        kind: AccessErrorKind,
        field: &str,
        rejected_value: Option<Value>,
        error_code: &'static str,
        message: String,
    ) -> Self {
        Self {
            kind,
            field: field.to_string(),
            rejected_value,
            error_code,
            message,
        }
    }

    pub fn unknown_field(field: &str, value: Option<Value>) -> Self {
        Self::new(
            AccessErrorKind::UnknownField,
            field,
            value,
            NOT_WRITABLE,
            format!("Field '{}' does not exist on the target", field),
        )
    }

    pub fn not_readable(field: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            AccessErrorKind::NotReadable,
            field,
            None,
            NOT_READABLE,
            format!("Field '{}' is not readable: {}", field, reason),
        )
    }

    pub fn not_writable(field: &str, value: Option<Value>, reason: impl fmt::Display) -> Self {
        Self::new(
            AccessErrorKind::NotWritable,
            field,
            value,
            NOT_WRITABLE,
            format!("Field '{}' is not writable: {}", field, reason),
        )
    }

    /// `writing` selects the error code: `not-writable` for writes, `not-readable` for reads
    pub fn invalid_path(field: &str, value: Option<Value>, reason: impl fmt::Display, writing: bool) -> Self {
        Self::new(
            AccessErrorKind::InvalidPath,
            field,
            value,
            if writing { NOT_WRITABLE } else { NOT_READABLE },
            format!("Invalid field path '{}': {}", field, reason),
        )
    }

    pub fn type_mismatch(field: &str, value: Value, reason: impl fmt::Display) -> Self {
        let message = format!(
            "Failed to convert value '{}' for field '{}': {}",
            crate::value::display_value(&value),
            field,
            reason
        );
        Self::new(AccessErrorKind::TypeMismatch, field, Some(value), TYPE_MISMATCH, message)
    }

    pub fn method_invocation(field: &str, value: Value, reason: impl fmt::Display) -> Self {
        Self::new(
            AccessErrorKind::MethodInvocation,
            field,
            Some(value),
            METHOD_INVOCATION,
            format!("Target rejected value for field '{}': {}", field, reason),
        )
    }

    pub fn from_convert(field: &str, value: Value, error: &ConvertError) -> Self {
        Self::type_mismatch(field, value, error)
    }
}

/// Every per-field failure of one [`Accessor::set_all`] pass
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{} field(s) could not be bound", errors.len())]
pub struct BatchAccessError {
    pub errors: Vec<AccessError>,
}

impl BatchAccessError {
    pub fn into_errors(self) -> Vec<AccessError> {
        self.errors
    }
}

/// Capability set over a target object graph
pub trait Accessor: fmt::Debug {
    /// Read the value at `path`
    fn get(&self, path: &str) -> Result<Value, AccessError>;

    /// Convert and write a value at `path`
    fn set(&mut self, path: &str, value: Value) -> Result<(), AccessError>;

    /// Type of the field at `path`, when it can be determined
    fn type_of(&self, path: &str) -> Option<FieldType>;

    /// Convert a value without writing it anywhere
    fn convert(&self, value: &Value, target: &FieldType) -> Result<Value, ConvertError>;

    fn is_writable(&self, path: &str) -> bool;

    fn is_readable(&self, path: &str) -> bool {
        self.get(path).is_ok()
    }

    /// The whole target as a serde tree
    fn tree(&self) -> &Value;

    fn converter(&self) -> &TypeConverter;

    /// Write every value, continuing past per-field failures.
    ///
    /// Unknown fields are skipped when `ignore_unknown` is set and invalid
    /// paths when `ignore_invalid` is set; every other failure is collected.
    fn set_all(
        &mut self,
        values: &PropertyValues,
        ignore_unknown: bool,
        ignore_invalid: bool,
    ) -> Result<(), BatchAccessError> {
        let mut errors = Vec::new();
        for pv in values {
            match self.set(&pv.name, pv.value.clone()) {
                Ok(()) => {}
                Err(e) if ignore_unknown && e.kind == AccessErrorKind::UnknownField => {
                    tracing::trace!(field = %pv.name, "ignoring unknown field");
                }
                Err(e) if ignore_invalid && e.kind == AccessErrorKind::InvalidPath => {
                    tracing::trace!(field = %pv.name, reason = %e, "ignoring invalid field");
                }
                Err(e) => errors.push(e),
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(BatchAccessError { errors })
        }
    }
}

/// The accessor variant chosen for a binding session
#[derive(Debug, Clone)]
pub enum TargetAccessor {
    Property(PropertyAccessor),
    Direct(DirectFieldAccessor),
}

impl TargetAccessor {
    pub fn mode(&self) -> AccessMode {
        match self {
            TargetAccessor::Property(_) => AccessMode::Property,
            TargetAccessor::Direct(_) => AccessMode::Direct,
        }
    }

    fn inner(&self) -> &dyn Accessor {
        match self {
            TargetAccessor::Property(a) => a,
            TargetAccessor::Direct(a) => a,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Accessor {
        match self {
            TargetAccessor::Property(a) => a,
            TargetAccessor::Direct(a) => a,
        }
    }
}

impl Accessor for TargetAccessor {
    fn get(&self, path: &str) -> Result<Value, AccessError> {
        self.inner().get(path)
    }

    fn set(&mut self, path: &str, value: Value) -> Result<(), AccessError> {
        self.inner_mut().set(path, value)
    }

    fn type_of(&self, path: &str) -> Option<FieldType> {
        self.inner().type_of(path)
    }

    fn convert(&self, value: &Value, target: &FieldType) -> Result<Value, ConvertError> {
        self.inner().convert(value, target)
    }

    fn is_writable(&self, path: &str) -> bool {
        self.inner().is_writable(path)
    }

    fn is_readable(&self, path: &str) -> bool {
        self.inner().is_readable(path)
    }

    fn tree(&self) -> &Value {
        self.inner().tree()
    }

    fn converter(&self) -> &TypeConverter {
        self.inner().converter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Account {
        name: String,
        age: u32,
    }

    fn property_accessor() -> TargetAccessor {
        TargetAccessor::Property(
            PropertyAccessor::for_target(&Account::default(), TreeOptions::default(), TypeConverter::default())
                .unwrap(),
        )
    }

    #[test]
    fn test_set_all_continues_past_failures() {
        let mut accessor = property_accessor();
        let values: PropertyValues = [("age", "old"), ("name", "Ann")].into_iter().collect();

        let err = accessor.set_all(&values, true, false).unwrap_err();

        assert_eq!(err.errors.len(), 1);
        assert_eq!(err.errors[0].field, "age");
        assert_eq!(err.errors[0].error_code, TYPE_MISMATCH);
        assert_eq!(accessor.get("name").unwrap(), json!("Ann"));
    }

    #[test]
    fn test_set_all_unknown_fields() {
        let mut accessor = property_accessor();
        let values: PropertyValues = [("nickname", "x")].into_iter().collect();

        assert!(accessor.set_all(&values, true, false).is_ok());

        let err = accessor.set_all(&values, false, false).unwrap_err();
        assert_eq!(err.errors[0].kind, AccessErrorKind::UnknownField);
        assert_eq!(err.errors[0].error_code, NOT_WRITABLE);
    }

    #[test]
    fn test_mode_reporting() {
        assert_eq!(property_accessor().mode(), AccessMode::Property);
        assert_eq!(AccessMode::Direct.to_string(), "direct");
    }
}

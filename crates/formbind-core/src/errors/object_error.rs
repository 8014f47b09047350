//! Error entries: whole-object errors and field errors
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use crate::value::{display_value, Value};
use serde::Serialize;
use std::fmt;

/// Argument interpolated into an error message
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ErrorArgument {
    /// A literal value
    Value(Value),
    /// A value that is itself looked up by message codes, such as the
    /// display name of a field
    Resolvable {
        codes: Vec<String>,
        default_message: Option<String>,
    },
}

impl From<Value> for ErrorArgument {
    fn from(value: Value) -> Self {
        ErrorArgument::Value(value)
    }
}

impl fmt::Display for ErrorArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorArgument::Value(value) => write!(f, "{}", display_value(value)),
            ErrorArgument::Resolvable {
                codes,
                default_message,
            } => write!(
                f,
                "codes [{}]; default message [{}]",
                codes.join(","),
                default_message.as_deref().unwrap_or_default()
            ),
        }
    }
}

fn join_arguments(arguments: &[ErrorArgument]) -> String {
    arguments
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// An error on the bound object as a whole
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectError {
    pub object_name: String,
    /// Message codes, most specific first
    pub codes: Vec<String>,
    pub arguments: Vec<ErrorArgument>,
    pub default_message: Option<String>,
    /// The error code the entry was raised with, before resolution
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl ObjectError {
    pub fn new(
        object_name: impl Into<String>,
        codes: Vec<String>,
        arguments: Vec<ErrorArgument>,
        default_message: Option<String>,
    ) -> Self {
        Self {
            object_name: object_name.into(),
            codes,
            arguments,
            default_message,
            error_code: None,
        }
    }

    pub fn with_error_code(mut self, error_code: impl Into<String>) -> Self {
        self.error_code = Some(error_code.into());
        self
    }

    /// The raw error code when recorded, else the most general resolved code
    ///
    /// Resolved codes carry the resolver's prefix, so with a prefix the two differ.
    pub fn code(&self) -> Option<&str> {
        self.error_code
            .as_deref()
            .or_else(|| self.codes.last().map(String::as_str))
    }

    pub fn has_code(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    fn describe(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "codes [{}]; arguments [{}]; default message [{}]",
            self.codes.join(","),
            join_arguments(&self.arguments),
            self.default_message.as_deref().unwrap_or_default()
        )
    }
}

impl fmt::Display for ObjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error in object '{}': ", self.object_name)?;
        self.describe(f)
    }
}

/// An error on one field of the bound object
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    #[serde(flatten)]
    pub error: ObjectError,
    /// Canonical path of the field, including any nested path
    pub field: String,
    pub rejected_value: Option<Value>,
    /// Raised while applying a value rather than by a validator
    pub binding_failure: bool,
}

impl FieldError {
    pub fn new(
        object_name: impl Into<String>,
        field: impl Into<String>,
        rejected_value: Option<Value>,
        binding_failure: bool,
        codes: Vec<String>,
        arguments: Vec<ErrorArgument>,
        default_message: Option<String>,
    ) -> Self {
        Self {
            error: ObjectError::new(object_name, codes, arguments, default_message),
            field: field.into(),
            rejected_value,
            binding_failure,
        }
    }

    pub fn with_error_code(mut self, error_code: impl Into<String>) -> Self {
        self.error.error_code = Some(error_code.into());
        self
    }

    pub fn object_name(&self) -> &str {
        &self.error.object_name
    }

    pub fn codes(&self) -> &[String] {
        &self.error.codes
    }

    pub fn code(&self) -> Option<&str> {
        self.error.code()
    }

    pub fn default_message(&self) -> Option<&str> {
        self.error.default_message.as_deref()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Field error in object '{}' on field '{}': rejected value [{}]; ",
            self.error.object_name,
            self.field,
            self.rejected_value.as_ref().map(display_value).unwrap_or_default()
        )?;
        self.error.describe(f)
    }
}

/// One entry of a [`BindingErrors`](super::BindingErrors) model
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BindingError {
    Global(ObjectError),
    Field(FieldError),
}

impl BindingError {
    /// The object-level attributes shared by both kinds
    pub fn as_object_error(&self) -> &ObjectError {
        match self {
            BindingError::Global(error) => error,
            BindingError::Field(error) => &error.error,
        }
    }

    pub fn as_field_error(&self) -> Option<&FieldError> {
        match self {
            BindingError::Field(error) => Some(error),
            BindingError::Global(_) => None,
        }
    }

    pub fn field(&self) -> Option<&str> {
        self.as_field_error().map(|e| e.field.as_str())
    }

    pub fn is_field_error(&self) -> bool {
        matches!(self, BindingError::Field(_))
    }

    pub fn code(&self) -> Option<&str> {
        self.as_object_error().code()
    }
}

impl From<ObjectError> for BindingError {
    fn from(error: ObjectError) -> Self {
        BindingError::Global(error)
    }
}

impl From<FieldError> for BindingError {
    fn from(error: FieldError) -> Self {
        BindingError::Field(error)
    }
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingError::Global(error) => fmt::Display::fmt(error, f),
            BindingError::Field(error) => fmt::Display::fmt(error, f),
        }
    }
}

//! Turning binding failures into error entries
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use crate::access::AccessError;
use crate::errors::{BindingErrors, ErrorArgument, FieldError};
use crate::value::{display_value, Value};
use std::fmt;

/// Error code of a required field that was absent or empty
pub const MISSING_FIELD_ERROR_CODE: &str = "required";

/// Strategy for recording binding failures in the error model
pub trait BindingErrorProcessor: fmt::Debug + Send + Sync {
    /// Record that a required field was absent or empty
    fn process_missing_field_error(&self, missing_field: &str, errors: &mut BindingErrors);

    /// Record a failure to apply a value to the target
    fn process_access_error(&self, error: &AccessError, errors: &mut BindingErrors);
}

/// Records one [`FieldError`] per failure, flagged as a binding failure
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBindingErrorProcessor;

impl DefaultBindingErrorProcessor {
    pub fn new() -> Self {
        Self
    }
}

/// Arguments for a binding failure: the field itself, resolvable by
/// `objectName.field` or `field`
pub fn binding_error_arguments(object_name: &str, field: &str) -> Vec<ErrorArgument> {
    vec![ErrorArgument::Resolvable {
        codes: vec![format!("{}.{}", object_name, field), field.to_string()],
        default_message: Some(field.to_string()),
    }]
}

impl BindingErrorProcessor for DefaultBindingErrorProcessor {
    fn process_missing_field_error(&self, missing_field: &str, errors: &mut BindingErrors) {
        let fixed_field = errors.fixed_field(missing_field);
        let codes = errors.resolve_field_codes(MISSING_FIELD_ERROR_CODE, missing_field);
        let arguments = binding_error_arguments(errors.object_name(), &fixed_field);
        let message = format!("Field '{}' is required", fixed_field);
        let error = FieldError::new(
            errors.object_name(),
            fixed_field,
            Some(Value::String(String::new())),
            true,
            codes,
            arguments,
            Some(message),
        )
        .with_error_code(MISSING_FIELD_ERROR_CODE);
        errors.add_error(error);
    }

    fn process_access_error(&self, error: &AccessError, errors: &mut BindingErrors) {
        let codes = errors.resolve_field_codes(error.error_code, &error.field);
        let arguments = binding_error_arguments(errors.object_name(), &error.field);
        let rejected_value = error.rejected_value.as_ref().map(|value| match value {
            Value::Array(_) => Value::String(display_value(value)),
            other => other.clone(),
        });
        let entry = FieldError::new(
            errors.object_name(),
            error.field.clone(),
            rejected_value,
            true,
            codes,
            arguments,
            Some(error.message.clone()),
        )
        .with_error_code(error.error_code);
        errors.add_error(entry);
    }
}

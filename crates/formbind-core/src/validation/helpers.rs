//! Helpers for writing validators
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use super::{TargetType, ValidationHint, Validator};
use crate::errors::{BindingErrors, ErrorArgument};
use crate::value::{has_text, is_empty_value};
use std::any::Any;

/// Run `validator` against `target`, passing hints when there are any and
/// the validator uses them
///
/// # Panics
///
/// Panics when the validator does not support the target's type.
pub fn invoke_validator<T: Any>(
    validator: &dyn Validator,
    target: &T,
    errors: &mut BindingErrors,
    hints: &[ValidationHint],
) {
    let target_type = TargetType::of::<T>();
    assert!(
        validator.supports(&target_type),
        "Validator [{}] does not support [{}]",
        validator.name(),
        target_type
    );
    tracing::trace!(validator = validator.name(), target = %target_type, "invoking validator");
    if !hints.is_empty() && validator.is_hint_aware() {
        validator.validate_with_hints(target, errors, hints);
    } else {
        validator.validate(target, errors);
    }
}

/// Reject `field` with `error_code` when its value is absent or empty
pub fn reject_if_empty(errors: &mut BindingErrors, field: &str, error_code: &str) {
    reject_if_empty_with(errors, field, error_code, Vec::new(), None);
}

pub fn reject_if_empty_with(
    errors: &mut BindingErrors,
    field: &str,
    error_code: &str,
    arguments: Vec<ErrorArgument>,
    default_message: Option<&str>,
) {
    let empty = errors.field_value(field).map_or(true, |v| is_empty_value(&v));
    if empty {
        errors.reject_value_with(field, error_code, arguments, default_message);
    }
}

/// Reject `field` with `error_code` when its value is absent, empty or only whitespace
pub fn reject_if_empty_or_whitespace(errors: &mut BindingErrors, field: &str, error_code: &str) {
    reject_if_empty_or_whitespace_with(errors, field, error_code, Vec::new(), None);
}

pub fn reject_if_empty_or_whitespace_with(
    errors: &mut BindingErrors,
    field: &str,
    error_code: &str,
    arguments: Vec<ErrorArgument>,
    default_message: Option<&str>,
) {
    let blank = errors.field_value(field).map_or(true, |v| !has_text(&v));
    if blank {
        errors.reject_value_with(field, error_code, arguments, default_message);
    }
}

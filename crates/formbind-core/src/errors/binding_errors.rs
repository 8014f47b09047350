//! The error model of one binding session
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use super::object_error::{BindingError, ErrorArgument, FieldError, ObjectError};
use crate::access::{Accessor, TargetAccessor};
use crate::codes::{DefaultMessageCodesResolver, MessageCodesResolver};
use crate::filter::simple_match;
use crate::path::{canonicalize, NESTED_PATH_SEPARATOR};
use crate::value::{FieldType, Value};
use crate::Result;
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// Prefix of the model key under which the errors of an object are exposed
pub const MODEL_KEY_PREFIX: &str = "errors.";

/// Accumulated binding and validation errors for one target object
///
/// Errors keep their insertion order. Field paths are resolved relative to a
/// nested path that callers push and pop while validating sub-objects, so a
/// validator for an address can reject `city` and the error lands on
/// `address.city`.
///
/// When created by a [`Binder`](crate::Binder) the model also holds the
/// accessor over the target, which lets it report current field values and
/// types.
#[derive(Debug, Clone)]
pub struct BindingErrors {
    object_name: String,
    errors: Vec<BindingError>,
    nested_path: String,
    nested_path_stack: Vec<String>,
    suppressed_fields: BTreeSet<String>,
    codes_resolver: Arc<dyn MessageCodesResolver>,
    accessor: Option<TargetAccessor>,
}

impl BindingErrors {
    /// Create an empty model with the default codes resolver and no target
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            errors: Vec::new(),
            nested_path: String::new(),
            nested_path_stack: Vec::new(),
            suppressed_fields: BTreeSet::new(),
            codes_resolver: Arc::new(DefaultMessageCodesResolver::default()),
            accessor: None,
        }
    }

    pub fn with_accessor(mut self, accessor: TargetAccessor) -> Self {
        self.accessor = Some(accessor);
        self
    }

    pub fn with_codes_resolver(mut self, resolver: Arc<dyn MessageCodesResolver>) -> Self {
        self.codes_resolver = resolver;
        self
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub fn codes_resolver(&self) -> &Arc<dyn MessageCodesResolver> {
        &self.codes_resolver
    }

    pub fn accessor(&self) -> Option<&TargetAccessor> {
        self.accessor.as_ref()
    }

    pub(crate) fn accessor_mut(&mut self) -> Option<&mut TargetAccessor> {
        self.accessor.as_mut()
    }

    /// The target as a serde tree, `None` without a target
    pub fn target_tree(&self) -> Option<&Value> {
        self.accessor.as_ref().map(|a| a.tree())
    }

    // Nested path

    /// Current nested path, empty or ending with `.`
    pub fn nested_path(&self) -> &str {
        &self.nested_path
    }

    /// Replace the nested path and discard every pushed frame
    pub fn set_nested_path(&mut self, path: &str) {
        self.nested_path = normalize_nested_path(path);
        self.nested_path_stack.clear();
    }

    /// Descend into a sub-path, remembering the current one
    pub fn push_nested_path(&mut self, sub_path: &str) {
        let previous = self.nested_path.clone();
        self.nested_path = normalize_nested_path(&format!("{}{}", previous, sub_path));
        self.nested_path_stack.push(previous);
    }

    /// Return to the nested path active before the matching push
    ///
    /// # Panics
    ///
    /// Panics when there is no pushed frame to return to.
    pub fn pop_nested_path(&mut self) {
        match self.nested_path_stack.pop() {
            Some(previous) => self.nested_path = previous,
            None => panic!(
                "Cannot pop nested path of '{}': no nested path on stack",
                self.object_name
            ),
        }
    }

    /// Full canonical path of `field` below the current nested path
    pub fn fixed_field(&self, field: &str) -> String {
        if field.is_empty() {
            self.nested_path
                .strip_suffix(NESTED_PATH_SEPARATOR)
                .unwrap_or(&self.nested_path)
                .to_string()
        } else {
            format!("{}{}", self.nested_path, canonicalize(field))
        }
    }

    // Rejection

    /// Register a global error
    pub fn reject(&mut self, error_code: &str) {
        self.reject_with(error_code, Vec::new(), None);
    }

    pub fn reject_with_message(&mut self, error_code: &str, default_message: &str) {
        self.reject_with(error_code, Vec::new(), Some(default_message));
    }

    pub fn reject_with(
        &mut self,
        error_code: &str,
        arguments: Vec<ErrorArgument>,
        default_message: Option<&str>,
    ) {
        let codes = self.resolve_message_codes(error_code);
        self.add_error(
            ObjectError::new(
                self.object_name.clone(),
                codes,
                arguments,
                default_message.map(str::to_string),
            )
            .with_error_code(error_code),
        );
    }

    /// Register an error on `field`, relative to the nested path
    ///
    /// With an empty field at the top of the object graph there is nothing to
    /// attach to, and the error becomes a global one.
    pub fn reject_value(&mut self, field: &str, error_code: &str) {
        self.reject_value_with(field, error_code, Vec::new(), None);
    }

    pub fn reject_value_with_message(&mut self, field: &str, error_code: &str, default_message: &str) {
        self.reject_value_with(field, error_code, Vec::new(), Some(default_message));
    }

    pub fn reject_value_with(
        &mut self,
        field: &str,
        error_code: &str,
        arguments: Vec<ErrorArgument>,
        default_message: Option<&str>,
    ) {
        if field.is_empty() && self.nested_path.is_empty() {
            self.reject_with(error_code, arguments, default_message);
            return;
        }
        let fixed_field = self.fixed_field(field);
        let rejected_value = self.actual_field_value(&fixed_field);
        let codes = self.resolve_field_codes(error_code, field);
        self.add_error(
            FieldError::new(
                self.object_name.clone(),
                fixed_field,
                rejected_value,
                false,
                codes,
                arguments,
                default_message.map(str::to_string),
            )
            .with_error_code(error_code),
        );
    }

    /// Append an error as is
    pub fn add_error(&mut self, error: impl Into<BindingError>) {
        self.errors.push(error.into());
    }

    /// Append every error of another model for the same object
    ///
    /// # Panics
    ///
    /// Panics when `other` belongs to a different object.
    pub fn add_all_errors(&mut self, other: &BindingErrors) {
        assert!(
            other.object_name == self.object_name,
            "Errors object needs to have same object name: '{}' != '{}'",
            other.object_name,
            self.object_name
        );
        self.errors.extend(other.errors.iter().cloned());
    }

    // Queries

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn all_errors(&self) -> &[BindingError] {
        &self.errors
    }

    pub fn global_errors(&self) -> Vec<&ObjectError> {
        self.errors
            .iter()
            .filter_map(|e| match e {
                BindingError::Global(error) => Some(error),
                BindingError::Field(_) => None,
            })
            .collect()
    }

    pub fn global_error(&self) -> Option<&ObjectError> {
        self.global_errors().into_iter().next()
    }

    pub fn has_global_errors(&self) -> bool {
        self.global_error().is_some()
    }

    pub fn global_error_count(&self) -> usize {
        self.global_errors().len()
    }

    pub fn field_errors(&self) -> Vec<&FieldError> {
        self.errors.iter().filter_map(BindingError::as_field_error).collect()
    }

    pub fn field_error(&self) -> Option<&FieldError> {
        self.field_errors().into_iter().next()
    }

    pub fn has_field_errors(&self) -> bool {
        self.field_error().is_some()
    }

    pub fn field_error_count(&self) -> usize {
        self.field_errors().len()
    }

    /// Errors on `field` relative to the nested path.
    ///
    /// `field` may be a pattern: `prefix*`, `*suffix`, `*part*` or `*` alone.
    /// The nested path is prepended first, so below a nested path only the
    /// trailing wildcard keeps its meaning.
    pub fn field_errors_for(&self, field: &str) -> Vec<&FieldError> {
        let pattern = self.fixed_field(field);
        self.errors
            .iter()
            .filter_map(BindingError::as_field_error)
            .filter(|e| simple_match(&pattern, &e.field))
            .collect()
    }

    pub fn field_error_for(&self, field: &str) -> Option<&FieldError> {
        self.field_errors_for(field).into_iter().next()
    }

    pub fn has_field_errors_for(&self, field: &str) -> bool {
        self.field_error_for(field).is_some()
    }

    pub fn field_error_count_for(&self, field: &str) -> usize {
        self.field_errors_for(field).len()
    }

    /// Value to show for `field`
    ///
    /// When the field has an error its rejected value is returned, formatted
    /// unless the error is a binding failure. Otherwise the current value is
    /// read from the target and formatted.
    pub fn field_value(&self, field: &str) -> Option<Value> {
        if let Some(error) = self.field_error_for(field) {
            let value = error.rejected_value.clone();
            return match (&self.accessor, error.binding_failure) {
                (Some(accessor), false) => {
                    value.map(|v| accessor.converter().format_for_field(&error.field, v))
                }
                _ => value,
            };
        }
        let accessor = self.accessor.as_ref()?;
        let fixed_field = self.fixed_field(field);
        let value = accessor.get(&fixed_field).unwrap_or(Value::Null);
        match accessor.converter().format_for_field(&fixed_field, value) {
            Value::Null => None,
            formatted => Some(formatted),
        }
    }

    /// Current value of `field` on the target, without formatting
    pub fn raw_field_value(&self, field: &str) -> Option<Value> {
        self.actual_field_value(&self.fixed_field(field))
    }

    /// Type of `field`, from the target when there is one, else from its value
    pub fn field_type(&self, field: &str) -> Option<FieldType> {
        let fixed_field = self.fixed_field(field);
        self.accessor
            .as_ref()
            .and_then(|a| a.type_of(&fixed_field))
            .or_else(|| self.field_value(field).as_ref().and_then(FieldType::of))
    }

    fn actual_field_value(&self, fixed_field: &str) -> Option<Value> {
        match self.accessor.as_ref()?.get(fixed_field) {
            Ok(Value::Null) | Err(_) => None,
            Ok(value) => Some(value),
        }
    }

    // Codes

    /// Codes for a global error
    pub fn resolve_message_codes(&self, error_code: &str) -> Vec<String> {
        self.codes_resolver
            .resolve_object_codes(error_code, &self.object_name)
    }

    /// Codes for an error on `field`, relative to the nested path
    pub fn resolve_field_codes(&self, error_code: &str, field: &str) -> Vec<String> {
        let fixed_field = self.fixed_field(field);
        let field_type = self.accessor.as_ref().and_then(|a| a.type_of(&fixed_field));
        self.codes_resolver.resolve_field_codes(
            error_code,
            &self.object_name,
            &fixed_field,
            field_type.as_ref(),
        )
    }

    // Suppressed fields

    /// Note a field the field filter kept from being bound
    pub fn record_suppressed_field(&mut self, field: &str) {
        self.suppressed_fields.insert(field.to_string());
    }

    pub fn suppressed_fields(&self) -> &BTreeSet<String> {
        &self.suppressed_fields
    }

    /// The target and its errors under well-known keys:
    /// `{object_name: target, "errors." + object_name: errors}`
    pub fn model(&self) -> Result<serde_json::Map<String, Value>> {
        let mut model = serde_json::Map::new();
        model.insert(
            self.object_name.clone(),
            self.target_tree().cloned().unwrap_or(Value::Null),
        );
        model.insert(
            format!("{}{}", MODEL_KEY_PREFIX, self.object_name),
            serde_json::to_value(self)?,
        );
        Ok(model)
    }
}

fn normalize_nested_path(path: &str) -> String {
    let path = canonicalize(path);
    if path.is_empty() || path.ends_with(NESTED_PATH_SEPARATOR) {
        path
    } else {
        format!("{}{}", path, NESTED_PATH_SEPARATOR)
    }
}

impl Serialize for BindingErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BindingErrors", 4)?;
        state.serialize_field("object_name", &self.object_name)?;
        state.serialize_field("error_count", &self.errors.len())?;
        state.serialize_field("errors", &self.errors)?;
        state.serialize_field("suppressed_fields", &self.suppressed_fields)?;
        state.end()
    }
}

impl fmt::Display for BindingErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error(s) binding '{}'",
            self.errors.len(),
            self.object_name
        )?;
        for error in &self.errors {
            write!(f, "\n{}", error)?;
        }
        Ok(())
    }
}

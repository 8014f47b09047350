//! Binding sessions
//!
//! A [`Binder`] applies [`PropertyValues`] onto a target, runs validators
//! over it and collects every problem in one [`BindingErrors`] model:
//!
//! ```
//! use formbind_core::{Binder, PropertyValues};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct User {
//!     name: String,
//!     age: u32,
//! }
//!
//! let mut binder = Binder::new(User::default(), "user").unwrap();
//! binder.set_required_fields(["name"]);
//! binder.bind([("name", "Ann"), ("age", "41")].into_iter().collect::<PropertyValues>());
//! binder.close().unwrap();
//! assert_eq!(binder.target().unwrap().age, 41);
//! ```
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

mod bind_exception;
mod config;

pub use bind_exception::BindException;
pub use config::BinderConfig;

use crate::access::{
    AccessMode, Accessor, DirectFieldAccessor, PropertyAccessor, TargetAccessor, TreeOptions,
};
use crate::codes::MessageCodesResolver;
use crate::convert::{ConversionService, ConvertError, FieldFormatter, TypeConverter};
use crate::errors::BindingErrors;
use crate::filter::FieldFilter;
use crate::path::canonicalize;
use crate::processor::{BindingErrorProcessor, DefaultBindingErrorProcessor};
use crate::validation::{invoke_validator, TargetType, ValidationHint, Validator};
use crate::value::{has_text, FieldType, PropertyValues, Value};
use crate::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Binds values onto one target and collects the resulting errors
///
/// Configure the binder before the first bind or validate: settings that
/// shape the error model (access mode, auto-growth, codes resolver,
/// conversion) are fixed once the model exists and changing them afterwards
/// panics.
///
/// Binding works on the serde tree of the target. After each bind the target
/// is rebuilt from the tree, so `T` must round-trip through serde. Nested
/// structs that should grow on demand need `#[serde(default)]`.
pub struct Binder<T> {
    target: Option<T>,
    object_name: String,
    config: BinderConfig,
    /// Serialized target, consumed when the error model is created
    initial_tree: Option<Value>,
    codes_resolver: Option<Arc<dyn MessageCodesResolver>>,
    converter: TypeConverter,
    processor: Arc<dyn BindingErrorProcessor>,
    validators: Vec<Arc<dyn Validator>>,
    errors: Option<BindingErrors>,
    span: tracing::Span,
}

impl<T> Binder<T>
where
    T: Serialize + DeserializeOwned + 'static,
{
    /// Create a binder for `target`, exposed under `object_name`
    pub fn new(target: T, object_name: impl Into<String>) -> Result<Self> {
        let tree = serde_json::to_value(&target)?;
        Ok(Self::create(Some(target), Some(tree), object_name.into()))
    }

    /// Create a binder without a target, usable for value conversion only
    pub fn without_target(object_name: impl Into<String>) -> Self {
        Self::create(None, None, object_name.into())
    }

    fn create(target: Option<T>, initial_tree: Option<Value>, object_name: String) -> Self {
        let span = tracing::debug_span!(
            "bind_session",
            object_name = %object_name,
            access_mode = tracing::field::Empty
        );
        Self {
            target,
            object_name,
            config: BinderConfig::default(),
            initial_tree,
            codes_resolver: None,
            converter: TypeConverter::default(),
            processor: Arc::new(DefaultBindingErrorProcessor),
            validators: Vec::new(),
            errors: None,
            span,
        }
    }

    /// Apply a whole configuration
    ///
    /// # Panics
    ///
    /// Panics when the error model already exists.
    pub fn with_config(mut self, config: BinderConfig) -> Self {
        self.assert_not_initialized("configuration");
        let FieldFilter {
            allowed,
            disallowed,
        } = config.filter.clone();
        let required = config.required_fields.clone();
        self.config = config;
        self.set_allowed_fields(allowed);
        self.set_disallowed_fields(disallowed);
        self.set_required_fields(required);
        self
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    pub fn into_target(self) -> Option<T> {
        self.target
    }

    pub fn config(&self) -> &BinderConfig {
        &self.config
    }

    fn assert_not_initialized(&self, setting: &str) {
        assert!(
            self.errors.is_none(),
            "Cannot change {} of binder '{}': its binding result already exists",
            setting,
            self.object_name
        );
    }

    // Settings fixed once the error model exists

    /// # Panics
    ///
    /// Panics when the error model already exists.
    pub fn set_access_mode(&mut self, mode: AccessMode) {
        self.assert_not_initialized("access mode");
        self.config.access_mode = mode;
    }

    /// # Panics
    ///
    /// Panics when the error model already exists.
    pub fn set_auto_grow_nested_paths(&mut self, auto_grow: bool) {
        self.assert_not_initialized("auto-grow of nested paths");
        self.config.auto_grow_nested_paths = auto_grow;
    }

    /// # Panics
    ///
    /// Panics when the error model already exists.
    pub fn set_auto_grow_collection_limit(&mut self, limit: usize) {
        self.assert_not_initialized("auto-grow collection limit");
        self.config.auto_grow_collection_limit = limit;
    }

    /// Replace the codes resolver built from [`BinderConfig::message_codes`]
    ///
    /// # Panics
    ///
    /// Panics when the error model already exists.
    pub fn set_message_codes_resolver(&mut self, resolver: Arc<dyn MessageCodesResolver>) {
        self.assert_not_initialized("message codes resolver");
        self.codes_resolver = Some(resolver);
    }

    /// # Panics
    ///
    /// Panics when the error model already exists.
    pub fn set_conversion_service(&mut self, service: Arc<dyn ConversionService>) {
        self.assert_not_initialized("conversion service");
        self.converter.set_service(service);
    }

    /// Register a formatter for a field path, or an index-free path covering
    /// every element of a list
    ///
    /// # Panics
    ///
    /// Panics when the error model already exists.
    pub fn register_formatter(&mut self, field: &str, formatter: Arc<dyn FieldFormatter>) {
        self.assert_not_initialized("formatters");
        self.converter.register_formatter(field, formatter);
    }

    // Settings that may change at any time

    pub fn set_ignore_unknown_fields(&mut self, ignore: bool) {
        self.config.ignore_unknown_fields = ignore;
    }

    pub fn set_ignore_invalid_fields(&mut self, ignore: bool) {
        self.config.ignore_invalid_fields = ignore;
    }

    /// Only fields matching one of these patterns are bound
    pub fn set_allowed_fields<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.filter.set_allowed(patterns);
    }

    /// Fields matching one of these patterns are never bound
    pub fn set_disallowed_fields<I, S>(&mut self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.filter.set_disallowed(patterns);
    }

    pub fn set_required_fields<I, S>(&mut self, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.required_fields = canonical_names(fields);
        debug!(parent: &self.span, required = ?self.config.required_fields, "required fields set");
    }

    pub fn set_field_marker_prefix(&mut self, prefix: Option<String>) {
        self.config.field_marker_prefix = prefix;
    }

    pub fn set_field_default_prefix(&mut self, prefix: Option<String>) {
        self.config.field_default_prefix = prefix;
    }

    pub fn set_binding_error_processor(&mut self, processor: Arc<dyn BindingErrorProcessor>) {
        self.processor = processor;
    }

    pub fn binding_error_processor(&self) -> &Arc<dyn BindingErrorProcessor> {
        &self.processor
    }

    // Validators

    /// Replace all validators with `validator`
    ///
    /// # Panics
    ///
    /// Panics when a target is set and the validator does not support its type.
    pub fn set_validator(&mut self, validator: Arc<dyn Validator>) {
        self.assert_supported(validator.as_ref());
        self.validators = vec![validator];
    }

    /// # Panics
    ///
    /// Panics when a target is set and a validator does not support its type.
    pub fn add_validators(&mut self, validators: impl IntoIterator<Item = Arc<dyn Validator>>) {
        for validator in validators {
            self.assert_supported(validator.as_ref());
            self.validators.push(validator);
        }
    }

    /// # Panics
    ///
    /// Panics when a target is set and a validator does not support its type.
    pub fn replace_validators(&mut self, validators: impl IntoIterator<Item = Arc<dyn Validator>>) {
        self.validators.clear();
        self.add_validators(validators);
    }

    /// The first validator, if any
    pub fn validator(&self) -> Option<&Arc<dyn Validator>> {
        self.validators.first()
    }

    pub fn validators(&self) -> &[Arc<dyn Validator>] {
        &self.validators
    }

    fn assert_supported(&self, validator: &dyn Validator) {
        if self.target.is_some() {
            let target_type = TargetType::of::<T>();
            assert!(
                validator.supports(&target_type),
                "Invalid target for Validator [{}]: {}",
                validator.name(),
                target_type
            );
        }
    }

    // Error model

    fn create_errors(&mut self) -> BindingErrors {
        let options = TreeOptions {
            indexed_access: self.config.access_mode == AccessMode::Property,
            auto_grow_nested_paths: self.config.auto_grow_nested_paths,
            auto_grow_collection_limit: self.config.auto_grow_collection_limit,
        };
        let resolver = self
            .codes_resolver
            .clone()
            .unwrap_or_else(|| Arc::new(self.config.message_codes.clone()));
        let mut errors = BindingErrors::new(self.object_name.clone()).with_codes_resolver(resolver);

        if let Some(tree) = self.initial_tree.take() {
            let converter = self.converter.clone();
            let accessor = match self.config.access_mode {
                AccessMode::Property => {
                    TargetAccessor::Property(PropertyAccessor::from_tree::<T>(tree, options, converter))
                }
                AccessMode::Direct => {
                    TargetAccessor::Direct(DirectFieldAccessor::from_tree::<T>(tree, options, converter))
                }
            };
            errors = errors.with_accessor(accessor);
        }

        self.span.record("access_mode", tracing::field::display(self.config.access_mode));
        debug!(parent: &self.span, "binding result created");
        errors
    }

    fn init_errors(&mut self) -> &mut BindingErrors {
        let errors = match self.errors.take() {
            Some(errors) => errors,
            None => self.create_errors(),
        };
        self.errors.insert(errors)
    }

    /// The error model, created on first use
    pub fn binding_result(&mut self) -> &BindingErrors {
        self.init_errors()
    }

    pub fn binding_result_mut(&mut self) -> &mut BindingErrors {
        self.init_errors()
    }

    // Binding

    /// Apply `values` onto the target
    ///
    /// Every failure ends up in the error model; nothing here returns an
    /// error. The steps run in order: field defaults and markers, the field
    /// filter, the required-field check, then the writes themselves. The
    /// target is rebuilt from the bound tree afterwards.
    ///
    /// # Panics
    ///
    /// Panics when the binder has no target.
    pub fn bind(&mut self, values: PropertyValues) {
        assert!(
            self.target.is_some(),
            "Binder '{}' has no target to bind to",
            self.object_name
        );
        let span = self.span.clone();
        let _entered = span.enter();
        debug!(fields = values.len(), "binding values");

        let mut values = values;
        self.init_errors();
        self.check_field_defaults(&mut values);
        self.check_field_markers(&mut values);
        self.check_allowed_fields(&mut values);
        self.check_required_fields(&mut values);
        self.apply_property_values(&values);
        self.sync_target();
    }

    /// Replace `<default>field` entries by `field` when `field` is absent
    fn check_field_defaults(&mut self, values: &mut PropertyValues) {
        let Some(prefix) = self.config.field_default_prefix.clone() else {
            return;
        };
        let errors = self.init_errors();
        let defaults: Vec<(String, String, Value)> = values
            .iter()
            .filter_map(|pv| {
                pv.name
                    .strip_prefix(prefix.as_str())
                    .map(|field| (pv.name.clone(), field.to_string(), pv.value.clone()))
            })
            .collect();
        for (entry, field, value) in defaults {
            let writable = errors.accessor().is_some_and(|a| a.is_writable(&field));
            if writable && !values.contains(&field) {
                values.add(field, value);
            }
            values.remove(&entry);
        }
    }

    /// Replace `<marker>field` entries by an empty value for `field` when
    /// `field` is absent
    fn check_field_markers(&mut self, values: &mut PropertyValues) {
        let Some(prefix) = self.config.field_marker_prefix.clone() else {
            return;
        };
        let errors = self.init_errors();
        let markers: Vec<(String, String)> = values
            .names()
            .filter_map(|name| {
                name.strip_prefix(prefix.as_str())
                    .map(|field| (name.to_string(), field.to_string()))
            })
            .collect();
        for (entry, field) in markers {
            if let Some(accessor) = errors.accessor() {
                if accessor.is_writable(&field) && !values.contains(&field) {
                    values.add(field.clone(), empty_value(accessor.type_of(&field)));
                }
            }
            values.remove(&entry);
        }
    }

    fn check_allowed_fields(&mut self, values: &mut PropertyValues) {
        if self.config.filter.is_open() {
            return;
        }
        let filter = self.config.filter.clone();
        let errors = self.init_errors();
        values.retain(|pv| {
            let field = canonicalize(&pv.name);
            if filter.is_allowed(&field) {
                true
            } else {
                debug!(field = %field, "field not allowed for binding; suppressed");
                errors.record_suppressed_field(&field);
                false
            }
        });
    }

    fn check_required_fields(&mut self, values: &mut PropertyValues) {
        let required = self.config.required_fields.clone();
        let processor = self.processor.clone();
        let errors = self.init_errors();
        for field in &required {
            let entry = values
                .iter()
                .find(|pv| canonicalize(&pv.name) == *field)
                .map(|pv| (pv.name.clone(), pv.value.clone()));
            let missing = match &entry {
                None => true,
                Some((_, value)) => is_missing(value),
            };
            if missing {
                debug!(field = %field, "required field missing");
                processor.process_missing_field_error(field, errors);
                if let Some((name, _)) = entry {
                    values.remove(&name);
                }
            }
        }
    }

    fn apply_property_values(&mut self, values: &PropertyValues) {
        let ignore_unknown = self.config.ignore_unknown_fields;
        let ignore_invalid = self.config.ignore_invalid_fields;
        let processor = self.processor.clone();
        let errors = self.init_errors();
        let Some(accessor) = errors.accessor_mut() else {
            return;
        };
        if let Err(batch) = accessor.set_all(values, ignore_unknown, ignore_invalid) {
            for error in batch.into_errors() {
                debug!(field = %error.field, code = error.error_code, "binding failure: {}", error.message);
                processor.process_access_error(&error, errors);
            }
        }
    }

    /// Rebuild the target from the bound tree
    fn sync_target(&mut self) {
        let Some(tree) = self.errors.as_ref().and_then(BindingErrors::target_tree) else {
            return;
        };
        match T::deserialize(tree) {
            Ok(target) => self.target = Some(target),
            Err(e) => warn!(error = %e, "bound values do not form a valid target; keeping previous target"),
        }
    }

    // Validation

    /// Run every validator over the target
    ///
    /// # Panics
    ///
    /// Panics when the binder has no target.
    pub fn validate(&mut self) {
        self.validate_with_hints(&[]);
    }

    /// Run every validator over the target, passing `hints` to the
    /// validators that use them
    ///
    /// # Panics
    ///
    /// Panics when the binder has no target.
    pub fn validate_with_hints(&mut self, hints: &[ValidationHint]) {
        let span = self.span.clone();
        let _entered = span.enter();
        self.init_errors();

        let (Some(target), Some(errors)) = (self.target.as_ref(), self.errors.as_mut()) else {
            panic!("Binder '{}' has no target to validate", self.object_name);
        };
        for validator in &self.validators {
            invoke_validator(validator.as_ref(), target, errors, hints);
        }
        debug!(validators = self.validators.len(), errors = errors.error_count(), "validation finished");
    }

    /// Succeed when no errors were recorded, else fail with a snapshot of
    /// the error model
    pub fn close(&mut self) -> std::result::Result<(), BindException> {
        let errors = self.init_errors();
        if errors.has_errors() {
            Err(BindException::new(errors.clone()))
        } else {
            Ok(())
        }
    }

    // Conversion

    /// Convert a value to `required` with the binder's conversion service
    pub fn convert_if_necessary(&self, value: &Value, required: &FieldType) -> std::result::Result<Value, ConvertError> {
        self.converter.service().convert(value, required)
    }

    /// Convert a value for `field`, letting the field's formatter parse text
    pub fn convert_for_field(
        &self,
        field: &str,
        value: &Value,
        required: Option<&FieldType>,
    ) -> std::result::Result<Value, ConvertError> {
        self.converter.convert_for_field(Some(&canonicalize(field)), value, required)
    }
}

fn canonical_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names.into_iter().map(|n| canonicalize(n.as_ref())).collect()
}

/// A required field counts as missing when null, blank text, an empty list
/// or a list whose first element is blank
fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(_) => !has_text(value),
        Value::Array(items) => items.first().map_or(true, |first| !has_text(first)),
        _ => false,
    }
}

/// Value a marker supplies for an absent field
fn empty_value(field_type: Option<FieldType>) -> Value {
    match field_type {
        Some(FieldType::Boolean) => Value::Bool(false),
        Some(FieldType::Array(_)) => Value::Array(Vec::new()),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::TYPE_MISMATCH;
    use crate::convert::StringTrimmer;
    use serde::Deserialize;
    use serde_json::json;
    use std::any::Any;

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Address {
        city: String,
    }

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    struct Member {
        name: String,
        age: u32,
        active: bool,
        roles: Vec<String>,
        address: Option<Address>,
    }

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Badge {
        label: String,
        level: u32,
    }

    #[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
    struct Holder {
        badge: Option<Badge>,
    }

    struct AdultValidator;

    impl Validator for AdultValidator {
        fn supports(&self, target: &TargetType) -> bool {
            target.is::<Member>()
        }

        fn validate(&self, target: &dyn Any, errors: &mut BindingErrors) {
            if let Some(member) = target.downcast_ref::<Member>() {
                if member.age < 18 {
                    errors.reject_value("age", "too-young");
                }
            }
        }
    }

    struct StringOnly;

    impl Validator for StringOnly {
        fn supports(&self, target: &TargetType) -> bool {
            target.is::<String>()
        }

        fn validate(&self, _target: &dyn Any, _errors: &mut BindingErrors) {}
    }

    fn binder() -> Binder<Member> {
        Binder::new(Member::default(), "member").unwrap()
    }

    fn values(pairs: &[(&str, Value)]) -> PropertyValues {
        pairs.iter().map(|(k, v)| (*k, v.clone())).collect()
    }

    #[test]
    fn test_bind_updates_target() {
        let mut binder = binder();
        binder.bind(values(&[
            ("name", json!("Ann")),
            ("age", json!("41")),
            ("roles", json!(["admin", "dev"])),
            ("address.city", json!("Oslo")),
        ]));

        assert!(binder.close().is_ok());
        let member = binder.target().unwrap();
        assert_eq!(member.age, 41);
        assert_eq!(member.roles, vec!["admin", "dev"]);
        assert_eq!(member.address.as_ref().unwrap().city, "Oslo");
    }

    #[test]
    fn test_grown_struct_reads_like_bound_target() {
        let mut binder = Binder::new(Holder::default(), "holder").unwrap();
        binder.bind(values(&[("badge.label", json!("gold"))]));
        let target = serde_json::to_value(binder.target().unwrap()).unwrap();
        assert_eq!(target, json!({"badge": {"label": "gold", "level": 0}}));

        let errors = binder.binding_result_mut();
        assert_eq!(errors.target_tree(), Some(&target));
        assert_eq!(errors.field_value("badge.level"), Some(json!(0)));
        assert_eq!(errors.field_type("badge.level"), Some(FieldType::Integer));

        errors.reject_value("badge.level", "too-low");
        let error = errors.field_error_for("badge.level").unwrap();
        assert_eq!(error.rejected_value, Some(json!(0)));
        assert!(error.error.has_code("too-low.Integer"));
        assert_eq!(errors.model().unwrap()["holder"], target);
    }

    #[test]
    fn test_type_mismatch_is_recorded() {
        let mut binder = binder();
        binder.bind(values(&[("age", json!("old")), ("name", json!("Ann"))]));

        let errors = binder.binding_result();
        let error = errors.field_error_for("age").unwrap();
        assert_eq!(error.code(), Some(TYPE_MISMATCH));
        assert_eq!(error.rejected_value, Some(json!("old")));
        assert!(error.binding_failure);
        assert_eq!(binder.target().unwrap().name, "Ann");
    }

    #[test]
    fn test_required_blank_first_element() {
        let mut binder = binder();
        binder.set_required_fields(["roles", "name"]);
        binder.bind(values(&[("roles", json!([" ", "x"])), ("name", json!("Ann"))]));

        let errors = binder.binding_result();
        assert_eq!(errors.error_count(), 1);
        assert_eq!(errors.field_error().unwrap().field, "roles");
        assert!(binder.target().unwrap().roles.is_empty());
    }

    #[test]
    fn test_field_markers_and_defaults() {
        let mut binder = Binder::new(
            Member {
                active: true,
                roles: vec!["x".into()],
                ..Member::default()
            },
            "member",
        )
        .unwrap();
        binder.set_field_marker_prefix(Some("_".into()));
        binder.set_field_default_prefix(Some("!".into()));
        binder.bind(values(&[
            ("_active", json!("visible")),
            ("_roles", json!("visible")),
            ("!name", json!("anonymous")),
            ("!age", json!("7")),
            ("age", json!("9")),
        ]));

        let member = binder.target().unwrap();
        assert!(!member.active);
        assert!(member.roles.is_empty());
        assert_eq!(member.name, "anonymous");
        assert_eq!(member.age, 9);
    }

    #[test]
    fn test_disallowed_fields_are_suppressed() {
        let mut binder = binder();
        binder.set_disallowed_fields(["age", "*.city"]);
        binder.bind(values(&[("age", json!("5")), ("address.city", json!("Oslo")), ("name", json!("B"))]));

        let suppressed: Vec<_> = binder.binding_result().suppressed_fields().iter().cloned().collect();
        assert_eq!(suppressed, vec!["address.city", "age"]);
        assert_eq!(binder.target().unwrap().age, 0);
        assert!(!binder.binding_result().has_errors());
    }

    #[test]
    fn test_validate_and_close() {
        let mut binder = binder();
        binder.set_validator(Arc::new(AdultValidator));
        binder.bind(values(&[("age", json!("12"))]));
        binder.validate();

        let err = binder.close().unwrap_err();
        let error = err.errors().field_error_for("age").unwrap();
        assert_eq!(error.code(), Some("too-young"));
        assert_eq!(error.rejected_value, Some(json!(12)));
        assert!(!error.binding_failure);
    }

    #[test]
    #[should_panic(expected = "Invalid target for Validator")]
    fn test_unsupported_validator_panics() {
        binder().add_validators([Arc::new(StringOnly) as Arc<dyn Validator>]);
    }

    #[test]
    #[should_panic(expected = "already exists")]
    fn test_configuration_after_first_use_panics() {
        let mut binder = binder();
        binder.binding_result();
        binder.set_auto_grow_nested_paths(false);
    }

    #[test]
    #[should_panic(expected = "no target to bind to")]
    fn test_bind_without_target_panics() {
        Binder::<Member>::without_target("member").bind(PropertyValues::new());
    }

    #[test]
    fn test_conversion_without_target() {
        let mut binder = Binder::<Value>::without_target("value");
        binder.register_formatter("code", Arc::new(StringTrimmer::new(true)));

        assert_eq!(
            binder.convert_if_necessary(&json!("12"), &FieldType::Integer).unwrap(),
            json!(12)
        );
        assert_eq!(binder.convert_for_field("code", &json!("  "), None).unwrap(), json!(null));
        assert!(binder.close().is_ok());
        assert!(binder.binding_result().target_tree().is_none());
    }

    #[test]
    fn test_direct_access_mode() {
        let mut binder = binder().with_config(BinderConfig {
            access_mode: AccessMode::Direct,
            ..BinderConfig::default()
        });
        binder.bind(values(&[("roles[0]", json!("x")), ("name", json!("Ann"))]));

        let errors = binder.binding_result();
        assert_eq!(errors.accessor().unwrap().mode(), AccessMode::Direct);
        assert_eq!(errors.field_error().unwrap().field, "roles[0]");
    }
}

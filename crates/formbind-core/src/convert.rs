//! Type conversion for incoming values
//!
//! Form inputs arrive as strings or lists of strings and must be coerced into
//! the shape of the target field. A [`ConversionService`] handles the generic
//! coercions; a [`FieldFormatter`] registered for a specific field path takes
//! precedence when parsing text and is also used to render the field back for
//! display.
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use crate::path::{canonicalize, strip_indexes};
use crate::value::{display_value, FieldType, Value};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Failure to coerce a value into a field type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConvertError {
    #[error("Cannot convert value of type {from} to {to}")]
    Unsupported { from: String, to: FieldType },

    #[error("Failed to convert value '{value}' to {to}: {message}")]
    InvalidValue {
        value: String,
        to: FieldType,
        message: String,
    },

    #[error("Failed to parse '{value}': {message}")]
    Parse { value: String, message: String },
}

impl ConvertError {
    fn invalid(value: &Value, to: &FieldType, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            value: display_value(value),
            to: to.clone(),
            message: message.into(),
        }
    }

    fn unsupported(value: &Value, to: &FieldType) -> Self {
        Self::Unsupported {
            from: value_kind(value).to_string(),
            to: to.clone(),
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Generic value coercion
pub trait ConversionService: fmt::Debug + Send + Sync {
    /// Whether a conversion from this value to the target type is attempted at all
    fn can_convert(&self, source: &Value, target: &FieldType) -> bool;

    /// Convert `source` into a value of shape `target`
    fn convert(&self, source: &Value, target: &FieldType) -> Result<Value, ConvertError>;
}

/// Per-field text parsing and rendering
pub trait FieldFormatter: fmt::Debug + Send + Sync {
    /// Parse submitted text into a field value
    fn parse(&self, text: &str) -> Result<Value, ConvertError>;

    /// Render a field value for display; `None` falls back to the raw value
    fn print(&self, value: &Value) -> Option<String>;
}

/// Coercions between strings, numbers, booleans and lists
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConversionService;

impl DefaultConversionService {
    pub fn new() -> Self {
        Self
    }

    fn to_string_value(&self, source: &Value, target: &FieldType) -> Result<Value, ConvertError> {
        match source {
            Value::String(_) => Ok(source.clone()),
            Value::Bool(_) | Value::Number(_) => Ok(Value::String(source.to_string())),
            Value::Array(_) => Ok(Value::String(display_value(source))),
            _ => Err(ConvertError::unsupported(source, target)),
        }
    }

    fn to_integer(&self, source: &Value, target: &FieldType) -> Result<Value, ConvertError> {
        match source {
            Value::String(s) => {
                let text = s.trim();
                if text.is_empty() {
                    return Ok(Value::Null);
                }
                if let Ok(n) = text.parse::<i64>() {
                    Ok(Value::from(n))
                } else if let Ok(n) = text.parse::<u64>() {
                    Ok(Value::from(n))
                } else {
                    Err(ConvertError::invalid(source, target, "not an integer"))
                }
            }
            Value::Number(n) if n.is_i64() || n.is_u64() => Ok(source.clone()),
            Value::Number(n) => match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 => {
                    Ok(Value::from(f as i64))
                }
                _ => Err(ConvertError::invalid(source, target, "fractional value")),
            },
            _ => Err(ConvertError::unsupported(source, target)),
        }
    }

    fn to_float(&self, source: &Value, target: &FieldType) -> Result<Value, ConvertError> {
        match source {
            Value::String(s) => {
                let text = s.trim();
                if text.is_empty() {
                    return Ok(Value::Null);
                }
                match text.parse::<f64>() {
                    Ok(f) if f.is_finite() => Ok(Value::from(f)),
                    _ => Err(ConvertError::invalid(source, target, "not a number")),
                }
            }
            Value::Number(n) => n
                .as_f64()
                .map(Value::from)
                .ok_or_else(|| ConvertError::invalid(source, target, "not representable")),
            _ => Err(ConvertError::unsupported(source, target)),
        }
    }

    fn to_boolean(&self, source: &Value, target: &FieldType) -> Result<Value, ConvertError> {
        match source {
            Value::Bool(_) => Ok(source.clone()),
            Value::String(s) => {
                let text = s.trim().to_ascii_lowercase();
                match text.as_str() {
                    "" => Ok(Value::Null),
                    "true" | "on" | "yes" | "1" => Ok(Value::Bool(true)),
                    "false" | "off" | "no" | "0" => Ok(Value::Bool(false)),
                    _ => Err(ConvertError::invalid(source, target, "not a boolean")),
                }
            }
            Value::Number(n) => match n.as_i64() {
                Some(0) => Ok(Value::Bool(false)),
                Some(1) => Ok(Value::Bool(true)),
                _ => Err(ConvertError::invalid(source, target, "only 0 and 1 map to booleans")),
            },
            _ => Err(ConvertError::unsupported(source, target)),
        }
    }

    fn to_array(
        &self,
        source: &Value,
        element: Option<&FieldType>,
    ) -> Result<Value, ConvertError> {
        let items: Vec<Value> = match source {
            Value::Array(items) => items.clone(),
            Value::String(s) if s.trim().is_empty() => Vec::new(),
            Value::String(s) => s.split(',').map(|part| Value::String(part.trim().to_string())).collect(),
            other => vec![other.clone()],
        };
        let converted = match element {
            Some(element) => items
                .iter()
                .map(|item| self.convert(item, element))
                .collect::<Result<Vec<_>, _>>()?,
            None => items,
        };
        Ok(Value::Array(converted))
    }
}

impl ConversionService for DefaultConversionService {
    fn can_convert(&self, source: &Value, target: &FieldType) -> bool {
        match (source, target) {
            (Value::Null, _) => true,
            (Value::Object(_), FieldType::Object) => true,
            (Value::Object(_), _) | (_, FieldType::Object) => false,
            _ => true,
        }
    }

    fn convert(&self, source: &Value, target: &FieldType) -> Result<Value, ConvertError> {
        if source.is_null() {
            return Ok(Value::Null);
        }
        if !self.can_convert(source, target) {
            return Err(ConvertError::unsupported(source, target));
        }

        // A scalar target fed from a multi-valued input
        if let (Value::Array(items), true) = (source, target.is_scalar()) {
            if *target == FieldType::String {
                return self.to_string_value(source, target);
            }
            return match items.first() {
                Some(first) => self.convert(first, target),
                None => Ok(Value::Null),
            };
        }

        match target {
            FieldType::String => self.to_string_value(source, target),
            FieldType::Integer => self.to_integer(source, target),
            FieldType::Float => self.to_float(source, target),
            FieldType::Boolean => self.to_boolean(source, target),
            FieldType::Array(element) => self.to_array(source, element.as_deref()),
            FieldType::Object => Ok(source.clone()),
        }
    }
}

/// Trims submitted text, optionally turning blank input into `null`
#[derive(Debug, Clone, Copy, Default)]
pub struct StringTrimmer {
    pub empty_as_null: bool,
}

impl StringTrimmer {
    pub fn new(empty_as_null: bool) -> Self {
        Self { empty_as_null }
    }
}

impl FieldFormatter for StringTrimmer {
    fn parse(&self, text: &str) -> Result<Value, ConvertError> {
        let trimmed = text.trim();
        if trimmed.is_empty() && self.empty_as_null {
            Ok(Value::Null)
        } else {
            Ok(Value::String(trimmed.to_string()))
        }
    }

    fn print(&self, value: &Value) -> Option<String> {
        match value {
            Value::Null => Some(String::new()),
            other => Some(display_value(other)),
        }
    }
}

/// Conversion service plus the per-field formatters of one binder
#[derive(Debug, Clone)]
pub struct TypeConverter {
    service: Arc<dyn ConversionService>,
    formatters: Vec<(String, Arc<dyn FieldFormatter>)>,
}

impl Default for TypeConverter {
    fn default() -> Self {
        Self::new(Arc::new(DefaultConversionService))
    }
}

impl TypeConverter {
    pub fn new(service: Arc<dyn ConversionService>) -> Self {
        Self {
            service,
            formatters: Vec::new(),
        }
    }

    pub fn service(&self) -> &Arc<dyn ConversionService> {
        &self.service
    }

    /// Swap the conversion service, keeping registered formatters
    pub fn set_service(&mut self, service: Arc<dyn ConversionService>) {
        self.service = service;
    }

    /// Register a formatter for a field path.
    ///
    /// The path may carry indexes (`items[0].price`) to target one element or
    /// omit them (`items.price`) to cover every element.
    pub fn register_formatter(&mut self, field: &str, formatter: Arc<dyn FieldFormatter>) {
        let field = canonicalize(field);
        self.formatters.retain(|(existing, _)| *existing != field);
        self.formatters.push((field, formatter));
    }

    /// Formatter for a canonical path, trying the exact path before its index-free form
    pub fn find_formatter(&self, field: &str) -> Option<&Arc<dyn FieldFormatter>> {
        let lookup = |path: &str| {
            self.formatters
                .iter()
                .find(|(registered, _)| registered == path)
                .map(|(_, formatter)| formatter)
        };
        lookup(field).or_else(|| lookup(&strip_indexes(field)))
    }

    /// Convert a value headed for `field`
    ///
    /// A string value goes through the field's formatter when one is
    /// registered; otherwise the conversion service handles known target
    /// types and unknown types pass the value through unchanged.
    pub fn convert_for_field(
        &self,
        field: Option<&str>,
        value: &Value,
        target: Option<&FieldType>,
    ) -> Result<Value, ConvertError> {
        if let (Some(formatter), Value::String(text)) = (field.and_then(|f| self.find_formatter(f)), value) {
            let parsed = formatter.parse(text)?;
            return match target {
                Some(target) if !parsed.is_null() => self.service.convert(&parsed, target),
                _ => Ok(parsed),
            };
        }
        match target {
            Some(target) => self.service.convert(value, target),
            None => Ok(value.clone()),
        }
    }

    /// Render a field value for display through its formatter, if any
    pub fn format_for_field(&self, field: &str, value: Value) -> Value {
        match self.find_formatter(field).and_then(|f| f.print(&value)) {
            Some(text) => Value::String(text),
            None => value,
        }
    }
}

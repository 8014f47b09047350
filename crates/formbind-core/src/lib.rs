//! Formbind Core - data binding and validation engine
//!
//! This crate applies a bag of named, loosely-typed input values (form
//! fields, query parameters, flattened documents) onto a strongly-typed
//! target and collects every binding and validation failure in one
//! queryable error model.
//!
//! # Main Components
//!
//! - **Paths and filtering**: canonical field paths and allow/deny glob patterns
//! - **Accessors**: read, write and auto-grow nested fields of any serde target
//! - **Conversion**: coercion of text input into the shape of each field
//! - **Error model**: global and field errors with resolved message codes
//! - **Binder**: the session driving filtering, required fields, binding and validation
//!
//! # Example
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
//! binder.bind(PropertyValues::from_pairs([("name", "Ann"), ("age", "notanumber")]));
//!
//! let errors = binder.binding_result();
//! assert_eq!(errors.field_error_for("age").unwrap().code(), Some("type-mismatch"));
//! assert!(binder.close().is_err());
//! ```
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

pub mod access;
pub mod binder;
pub mod codes;
pub mod convert;
pub mod error;
pub mod errors;
pub mod filter;
pub mod path;
pub mod processor;
pub mod validation;
pub mod value;

#[cfg(test)]
mod proptest_strategies;

// Re-export main types for convenience
pub use access::{
    AccessError, AccessErrorKind, AccessMode, Accessor, BatchAccessError, DirectFieldAccessor,
    PropertyAccessor, TargetAccessor, TreeOptions,
};
pub use binder::{BindException, Binder, BinderConfig};
pub use codes::{CodeFormat, DefaultMessageCodesResolver, MessageCodesResolver};
pub use convert::{
    ConversionService, ConvertError, DefaultConversionService, FieldFormatter, StringTrimmer,
    TypeConverter,
};
pub use error::{Error, Result};
pub use errors::{BindingError, BindingErrors, ErrorArgument, FieldError, ObjectError};
pub use filter::FieldFilter;
pub use processor::{BindingErrorProcessor, DefaultBindingErrorProcessor, MISSING_FIELD_ERROR_CODE};
pub use validation::{TargetType, ValidationHint, Validator};
pub use value::{FieldType, PropertyValue, PropertyValues, Value};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

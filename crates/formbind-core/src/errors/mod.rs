//! Error model
//!
//! A binding session accumulates two kinds of entries in a
//! [`BindingErrors`] model: [`ObjectError`]s about the object as a whole and
//! [`FieldError`]s about one field. Each carries message codes produced by
//! the session's [`MessageCodesResolver`](crate::MessageCodesResolver), so a
//! rendering layer can pick the most specific text it has.
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

mod binding_errors;
mod object_error;

pub use binding_errors::{BindingErrors, MODEL_KEY_PREFIX};
pub use object_error::{BindingError, ErrorArgument, FieldError, ObjectError};

//! Validators
//!
//! A [`Validator`] inspects a bound target and records problems in the
//! session's [`BindingErrors`]. Validators are registered on a
//! [`Binder`](crate::Binder), which checks up front that each one
//! [supports](Validator::supports) the target type.
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

mod helpers;

pub use helpers::{
    invoke_validator, reject_if_empty, reject_if_empty_or_whitespace,
    reject_if_empty_or_whitespace_with, reject_if_empty_with,
};

use crate::errors::BindingErrors;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::fmt;

/// Runtime identity of a target type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetType {
    pub id: TypeId,
    pub name: &'static str,
}

impl TargetType {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Opaque hint selecting a subset of a validator's rules, such as a
/// validation group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationHint(pub String);

impl ValidationHint {
    pub fn new(hint: impl Into<String>) -> Self {
        Self(hint.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ValidationHint {
    fn from(hint: &str) -> Self {
        Self(hint.to_string())
    }
}

/// Validation rules for a target type
///
/// Implementations must be immutable once constructed; one validator may
/// serve many sessions.
pub trait Validator: Send + Sync {
    /// Whether this validator can validate instances of `target`
    fn supports(&self, target: &TargetType) -> bool;

    /// Validate `target`, recording problems in `errors`
    ///
    /// `target` is always of a type this validator supports.
    fn validate(&self, target: &dyn Any, errors: &mut BindingErrors);

    /// Whether [`validate_with_hints`](Validator::validate_with_hints) makes
    /// use of validation hints
    fn is_hint_aware(&self) -> bool {
        false
    }

    fn validate_with_hints(&self, target: &dyn Any, errors: &mut BindingErrors, hints: &[ValidationHint]) {
        let _ = hints;
        self.validate(target, errors);
    }

    /// Name used in diagnostics
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl fmt::Debug for dyn Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validator({})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl Validator for Noop {
        fn supports(&self, target: &TargetType) -> bool {
            target.is::<String>()
        }

        fn validate(&self, _target: &dyn Any, _errors: &mut BindingErrors) {}
    }

    #[test]
    fn test_target_type() {
        let target = TargetType::of::<String>();
        assert!(target.is::<String>());
        assert!(!target.is::<u32>());
        assert_eq!(target.to_string(), "alloc::string::String");
    }

    #[test]
    fn test_defaults() {
        let validator = Noop;
        assert!(!validator.is_hint_aware());
        assert!(validator.name().ends_with("Noop"));
        let boxed: Box<dyn Validator> = Box::new(Noop);
        assert!(format!("{:?}", boxed).contains("Noop"));
    }
}

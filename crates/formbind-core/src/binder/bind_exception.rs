//! The failure returned by [`Binder::close`](super::Binder::close)
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use crate::errors::BindingErrors;
use thiserror::Error;

/// Binding or validation left errors behind
#[derive(Error, Debug, Clone)]
#[error("{errors}")]
pub struct BindException {
    errors: BindingErrors,
}

impl BindException {
    pub fn new(errors: BindingErrors) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &BindingErrors {
        &self.errors
    }

    pub fn into_errors(self) -> BindingErrors {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_lists_errors() {
        let mut errors = BindingErrors::new("user");
        errors.reject_value("name", "required");
        let exception = BindException::new(errors);

        let message = exception.to_string();
        assert!(message.starts_with("1 error(s) binding 'user'"));
        assert!(message.contains("on field 'name'"));
        assert_eq!(exception.into_errors().error_count(), 1);
    }
}

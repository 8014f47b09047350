//! Message code resolution
//!
//! Errors carry an ordered list of locale-independent message codes, most
//! specific first, that a rendering layer later uses to look up text. The
//! [`MessageCodesResolver`] strategy builds those lists; the
//! [`DefaultMessageCodesResolver`] produces the usual
//! `code.object.field` / `code.field` / `code.Type` / `code` ladder.
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use crate::path::{strip_last_index, NESTED_PATH_SEPARATOR};
use crate::value::FieldType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strategy for building message codes from an error code
///
/// Implementations are shared between binding sessions and must be immutable
/// once constructed. Both methods return at least one code, the raw error
/// code being the last-resort fallback.
pub trait MessageCodesResolver: fmt::Debug + Send + Sync {
    /// Codes for an error on the object as a whole
    fn resolve_object_codes(&self, error_code: &str, object_name: &str) -> Vec<String>;

    /// Codes for an error on a specific field
    fn resolve_field_codes(
        &self,
        error_code: &str,
        object_name: &str,
        field: &str,
        field_type: Option<&FieldType>,
    ) -> Vec<String>;
}

/// Where the error code goes in a generated code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CodeFormat {
    /// `required.user.name`
    #[default]
    PrefixErrorCode,
    /// `user.name.required`
    PostfixErrorCode,
}

impl CodeFormat {
    fn join(&self, error_code: &str, parts: &[&str]) -> String {
        let mut all: Vec<&str> = Vec::with_capacity(parts.len() + 1);
        match self {
            CodeFormat::PrefixErrorCode => {
                all.push(error_code);
                all.extend(parts.iter().copied().filter(|p| !p.is_empty()));
            }
            CodeFormat::PostfixErrorCode => {
                all.extend(parts.iter().copied().filter(|p| !p.is_empty()));
                all.push(error_code);
            }
        }
        all.join(&NESTED_PATH_SEPARATOR.to_string())
    }
}

/// Default resolver
///
/// For an object error `required` on `user`:
/// 1. `required.user`
/// 2. `required`
///
/// For a field error `type-mismatch` on `order.items[2].sku` of type String:
/// 1. `type-mismatch.order.items[2].sku`
/// 2. `type-mismatch.order.items.sku`
/// 3. `type-mismatch.items[2].sku`
/// 4. `type-mismatch.items.sku`
/// 5. `type-mismatch.sku`
/// 6. `type-mismatch.String`
/// 7. `type-mismatch`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultMessageCodesResolver {
    /// Prepended verbatim to every generated code
    pub prefix: String,
    pub format: CodeFormat,
}

impl DefaultMessageCodesResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_format(mut self, format: CodeFormat) -> Self {
        self.format = format;
        self
    }

    fn post_process(&self, code: String) -> String {
        if self.prefix.is_empty() {
            code
        } else {
            format!("{}{}", self.prefix, code)
        }
    }

    fn push_unique(&self, codes: &mut Vec<String>, code: String) {
        let code = self.post_process(code);
        if !codes.contains(&code) {
            codes.push(code);
        }
    }
}

/// The field itself, then each variant with one more bracket removed from the right
fn build_field_list(field: &str, list: &mut Vec<String>) {
    push_distinct(list, field.to_string());
    let mut plain = field.to_string();
    while let Some(stripped) = strip_last_index(&plain) {
        push_distinct(list, stripped.clone());
        plain = stripped;
    }
}

fn push_distinct(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}

impl MessageCodesResolver for DefaultMessageCodesResolver {
    fn resolve_object_codes(&self, error_code: &str, object_name: &str) -> Vec<String> {
        let mut codes = Vec::with_capacity(2);
        self.push_unique(&mut codes, self.format.join(error_code, &[object_name]));
        self.push_unique(&mut codes, self.format.join(error_code, &[]));
        codes
    }

    fn resolve_field_codes(
        &self,
        error_code: &str,
        object_name: &str,
        field: &str,
        field_type: Option<&FieldType>,
    ) -> Vec<String> {
        let mut codes = Vec::new();
        let mut fields = Vec::new();

        build_field_list(field, &mut fields);
        for variant in &fields {
            self.push_unique(&mut codes, self.format.join(error_code, &[object_name, variant]));
        }

        if let Some(dot) = field.rfind(NESTED_PATH_SEPARATOR) {
            build_field_list(&field[dot + 1..], &mut fields);
        }
        for variant in &fields {
            self.push_unique(&mut codes, self.format.join(error_code, &[variant]));
        }

        if let Some(field_type) = field_type {
            self.push_unique(&mut codes, self.format.join(error_code, &[field_type.name()]));
        }
        self.push_unique(&mut codes, self.format.join(error_code, &[]));
        codes
    }
}

//! Property-path accessor
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use super::tree::{TargetTree, TreeOptions};
use super::{AccessError, Accessor};
use crate::convert::{ConvertError, TypeConverter};
use crate::value::{FieldType, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Serde messages that describe a value of the wrong shape rather than a
/// value the target's own deserialization logic refused
const SHAPE_ERRORS: &[&str] = &[
    "invalid type",
    "invalid value",
    "invalid length",
    "unknown variant",
];

/// Accessor resolving full property paths: `address.city`, `lines[2].sku`,
/// `attributes[colour]`
///
/// Absent intermediate nodes are grown when auto-growth is on, and lists grow
/// up to the configured collection limit. A value the target's custom
/// deserialization rejects is reported as `method-invocation`, the analogue
/// of a throwing setter.
#[derive(Debug, Clone)]
pub struct PropertyAccessor {
    tree: TargetTree,
}

impl PropertyAccessor {
    pub fn for_target<T>(
        target: &T,
        options: TreeOptions,
        converter: TypeConverter,
    ) -> Result<Self, serde_json::Error>
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        let options = TreeOptions {
            indexed_access: true,
            ..options
        };
        Ok(Self {
            tree: TargetTree::for_target(target, options, converter)?,
        })
    }

    /// Wrap an already serialized target of type `T`
    pub fn from_tree<T>(root: Value, options: TreeOptions, converter: TypeConverter) -> Self
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        let options = TreeOptions {
            indexed_access: true,
            ..options
        };
        Self {
            tree: TargetTree::from_tree::<T>(root, options, converter),
        }
    }

    pub fn options(&self) -> &TreeOptions {
        self.tree.options()
    }

    fn classify(field: &str, value: Value, error: serde_json::Error) -> AccessError {
        let message = error.to_string();
        if SHAPE_ERRORS.iter().any(|prefix| message.starts_with(prefix)) {
            AccessError::type_mismatch(field, value, message)
        } else {
            AccessError::method_invocation(field, value, message)
        }
    }
}

impl Accessor for PropertyAccessor {
    fn get(&self, path: &str) -> Result<Value, AccessError> {
        self.tree.read_path(path)
    }

    fn set(&mut self, path: &str, value: Value) -> Result<(), AccessError> {
        self.tree.set_path(path, value, Self::classify)
    }

    fn type_of(&self, path: &str) -> Option<FieldType> {
        self.tree.type_of_path(path)
    }

    fn convert(&self, value: &Value, target: &FieldType) -> Result<Value, ConvertError> {
        self.tree.converter().service().convert(value, target)
    }

    fn is_writable(&self, path: &str) -> bool {
        self.tree.writable_path(path)
    }

    fn tree(&self) -> &Value {
        self.tree.root()
    }

    fn converter(&self) -> &TypeConverter {
        self.tree.converter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::{AccessErrorKind, METHOD_INVOCATION, TYPE_MISMATCH};
    use serde::{Deserialize, Deserializer};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn non_blank<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        let text = String::deserialize(deserializer)?;
        if text.trim().is_empty() {
            return Err(serde::de::Error::custom("code must not be blank"));
        }
        Ok(text)
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Coupon {
        #[serde(deserialize_with = "non_blank")]
        code: String,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    struct Address {
        city: String,
        zip: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Customer {
        name: String,
        age: u8,
        address: Option<Address>,
        attributes: BTreeMap<String, String>,
        scores: Vec<i32>,
        coupon: Coupon,
    }

    fn customer() -> Customer {
        Customer {
            name: "Ann".into(),
            age: 30,
            address: None,
            attributes: BTreeMap::new(),
            scores: vec![1],
            coupon: Coupon { code: "WELCOME".into() },
        }
    }

    fn accessor() -> PropertyAccessor {
        PropertyAccessor::for_target(&customer(), TreeOptions::default(), TypeConverter::default()).unwrap()
    }

    #[test]
    fn test_converts_to_existing_type() {
        let mut accessor = accessor();
        accessor.set("age", json!("41")).unwrap();
        assert_eq!(accessor.get("age").unwrap(), json!(41));
    }

    #[test]
    fn test_out_of_range_is_type_mismatch() {
        let mut accessor = accessor();
        let err = accessor.set("age", json!("300")).unwrap_err();
        assert_eq!(err.error_code, TYPE_MISMATCH);
        assert_eq!(err.rejected_value, Some(json!("300")));
        assert_eq!(accessor.get("age").unwrap(), json!(30));
    }

    #[test]
    fn test_custom_rejection_is_method_invocation() {
        let mut accessor = accessor();
        let err = accessor.set("coupon.code", json!("  ")).unwrap_err();
        assert_eq!(err.kind, AccessErrorKind::MethodInvocation);
        assert_eq!(err.error_code, METHOD_INVOCATION);
    }

    #[test]
    fn test_auto_grows_optional_struct() {
        let mut accessor = accessor();
        assert_eq!(accessor.get("address.city").unwrap(), json!(null));
        accessor.set("address.city", json!("Oslo")).unwrap();
        assert_eq!(accessor.get("address").unwrap(), json!({"city": "Oslo", "zip": null}));
        accessor.set("address.zip", json!("0150")).unwrap();
        assert_eq!(accessor.get("address.zip").unwrap(), json!("0150"));
        assert_eq!(accessor.type_of("address.city"), Some(FieldType::String));
    }

    #[test]
    fn test_keyed_map_entries() {
        let mut accessor = accessor();
        accessor.set("attributes['colour']", json!("red")).unwrap();
        assert_eq!(accessor.get("attributes[colour]").unwrap(), json!("red"));

        let err = accessor.set("attributes.size", json!("L")).unwrap_err();
        assert_eq!(err.kind, AccessErrorKind::UnknownField);
    }

    #[test]
    fn test_list_elements_take_list_type() {
        let mut accessor = accessor();
        accessor.set("scores[2]", json!("7")).unwrap();
        assert_eq!(accessor.get("scores").unwrap(), json!([1, 0, 7]));
        assert!(accessor.is_writable("scores[3]"));
        assert!(!accessor.is_writable("name.first"));
    }
}

//! Direct field accessor
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use super::tree::{TargetTree, TreeOptions};
use super::{AccessError, Accessor};
use crate::convert::{ConvertError, TypeConverter};
use crate::value::{FieldType, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Accessor addressing named fields only
///
/// Dotted nesting (`address.city`) is resolved field by field, but indexed
/// and keyed segments are refused. Every value the target rejects is a
/// `type-mismatch`: fields are assigned directly, so there is no setter
/// logic to fail.
#[derive(Debug, Clone)]
pub struct DirectFieldAccessor {
    tree: TargetTree,
}

impl DirectFieldAccessor {
    pub fn for_target<T>(
        target: &T,
        options: TreeOptions,
        converter: TypeConverter,
    ) -> Result<Self, serde_json::Error>
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        let options = TreeOptions {
            indexed_access: false,
            ..options
        };
        Ok(Self {
            tree: TargetTree::for_target(target, options, converter)?,
        })
    }

    pub fn from_tree<T>(root: Value, options: TreeOptions, converter: TypeConverter) -> Self
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        let options = TreeOptions {
            indexed_access: false,
            ..options
        };
        Self {
            tree: TargetTree::from_tree::<T>(root, options, converter),
        }
    }
}

impl Accessor for DirectFieldAccessor {
    fn get(&self, path: &str) -> Result<Value, AccessError> {
        self.tree.read_path(path)
    }

    fn set(&mut self, path: &str, value: Value) -> Result<(), AccessError> {
        self.tree
            .set_path(path, value, |field, value, error| AccessError::type_mismatch(field, value, error))
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

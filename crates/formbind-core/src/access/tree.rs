//! Path traversal over the serde tree of a target
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use super::{AccessError, DEFAULT_AUTO_GROW_COLLECTION_LIMIT};
use crate::convert::TypeConverter;
use crate::path::{canonicalize, join_segments, parse_segments, PathSegment};
use crate::value::{FieldType, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Deserializes a candidate tree into the target type and serializes the
/// accepted target back, so defaults filled by the target type show up in the tree
type Proof = Arc<dyn Fn(&Value) -> Result<Value, serde_json::Error> + Send + Sync>;

/// Traversal behaviour shared by both accessor variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeOptions {
    /// Allow `[n]` and `[key]` segments
    pub indexed_access: bool,
    /// Create absent intermediate nodes instead of failing
    pub auto_grow_nested_paths: bool,
    /// Lists never grow to `limit` elements or beyond
    pub auto_grow_collection_limit: usize,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            indexed_access: true,
            auto_grow_nested_paths: true,
            auto_grow_collection_limit: DEFAULT_AUTO_GROW_COLLECTION_LIMIT,
        }
    }
}

/// Why a candidate tree was rejected by the target type
#[derive(Debug)]
pub(crate) enum Rejection {
    /// A grown node could not be turned into an instance of its type
    Incomplete(serde_json::Error),
    Data(serde_json::Error),
}

/// The target as a mutable serde tree plus the proof that it still
/// deserializes into the target type
#[derive(Clone)]
pub(crate) struct TargetTree {
    root: Value,
    proof: Proof,
    /// Canonical paths of nodes created by auto-growth during this session
    grown: HashSet<String>,
    options: TreeOptions,
    converter: TypeConverter,
}

impl fmt::Debug for TargetTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetTree")
            .field("root", &self.root)
            .field("grown", &self.grown)
            .field("options", &self.options)
            .finish()
    }
}

impl TargetTree {
    pub(crate) fn for_target<T>(
        target: &T,
        options: TreeOptions,
        converter: TypeConverter,
    ) -> Result<Self, serde_json::Error>
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        let root = serde_json::to_value(target)?;
        Ok(Self::from_tree::<T>(root, options, converter))
    }

    pub(crate) fn from_tree<T>(root: Value, options: TreeOptions, converter: TypeConverter) -> Self
    where
        T: Serialize + DeserializeOwned + 'static,
    {
        let proof: Proof = Arc::new(|tree: &Value| -> Result<Value, serde_json::Error> {
            let target = T::deserialize(tree)?;
            serde_json::to_value(&target)
        });
        Self {
            root,
            proof,
            grown: HashSet::new(),
            options,
            converter,
        }
    }

    pub(crate) fn root(&self) -> &Value {
        &self.root
    }

    pub(crate) fn options(&self) -> &TreeOptions {
        &self.options
    }

    pub(crate) fn converter(&self) -> &TypeConverter {
        &self.converter
    }

    /// Parse a path and check it against the indexed-access option
    pub(crate) fn segments(
        &self,
        path: &str,
        value: Option<&Value>,
        writing: bool,
    ) -> Result<Vec<PathSegment>, AccessError> {
        let segments = parse_segments(path)
            .map_err(|e| AccessError::invalid_path(&canonicalize(path), value.cloned(), e, writing))?;
        if !self.options.indexed_access {
            if let Some(segment) = segments.iter().find(|s| !matches!(s, PathSegment::Property(_))) {
                let field = join_segments(&segments);
                let reason = format!("indexed segment '{}' requires property access", segment);
                return Err(if writing {
                    AccessError::not_writable(&field, value.cloned(), reason)
                } else {
                    AccessError::not_readable(&field, reason)
                });
            }
        }
        Ok(segments)
    }

    /// Locate a node without mutating the tree.
    ///
    /// `Ok(None)` means the node is absent but would be created by a write:
    /// under a null intermediate with auto-growth on, a list slot within the
    /// growth limit, a missing map entry or a field of a grown node.
    pub(crate) fn lookup(&self, segments: &[PathSegment]) -> Result<Option<&Value>, AccessError> {
        let mut node = &self.root;
        let mut walked = String::new();

        for segment in segments {
            let child_path = child_path(&walked, segment);
            let next = match (node, segment) {
                (Value::Null, _) => {
                    if self.options.auto_grow_nested_paths {
                        return Ok(None);
                    }
                    return Err(AccessError::invalid_path(
                        &join_segments(segments),
                        None,
                        format!("value of nested path '{}' is null", walked),
                        false,
                    ));
                }
                (Value::Object(map), PathSegment::Property(name)) => match map.get(name) {
                    Some(child) => child,
                    None if self.grown.contains(&walked) => return Ok(None),
                    None => {
                        return Err(AccessError::not_readable(
                            &join_segments(segments),
                            format!("no field '{}'", child_path),
                        ))
                    }
                },
                (Value::Object(map), PathSegment::Key(key)) => match map.get(key) {
                    Some(child) => child,
                    None => return Ok(None),
                },
                (Value::Object(map), PathSegment::Index(index)) => match map.get(&index.to_string()) {
                    Some(child) => child,
                    None => return Ok(None),
                },
                (Value::Array(items), PathSegment::Index(index)) => match items.get(*index) {
                    Some(child) => child,
                    None if self.options.auto_grow_nested_paths
                        && *index < self.options.auto_grow_collection_limit =>
                    {
                        return Ok(None)
                    }
                    None => {
                        return Err(AccessError::invalid_path(
                            &join_segments(segments),
                            None,
                            format!("index {} out of bounds for list of length {}", index, items.len()),
                            false,
                        ))
                    }
                },
                (Value::Array(_), other) => {
                    return Err(AccessError::not_readable(
                        &join_segments(segments),
                        format!("list '{}' cannot be addressed by '{}'", walked, other),
                    ))
                }
                _ => {
                    return Err(AccessError::not_readable(
                        &join_segments(segments),
                        format!("'{}' is not a nested object", walked),
                    ))
                }
            };
            node = next;
            walked = child_path;
        }
        Ok(Some(node))
    }

    /// Type of a node: its own shape, else the element type of its list
    pub(crate) fn type_of(&self, segments: &[PathSegment]) -> Option<FieldType> {
        if let Ok(Some(value)) = self.lookup(segments) {
            if let Some(field_type) = FieldType::of(value) {
                return Some(field_type);
            }
        }
        let (last, parent) = segments.split_last()?;
        if !matches!(last, PathSegment::Index(_)) {
            return None;
        }
        match self.lookup(parent) {
            Ok(Some(list @ Value::Array(_))) => match FieldType::of(list) {
                Some(FieldType::Array(Some(element))) => Some(*element),
                _ => None,
            },
            _ => None,
        }
    }

    /// Write `value` at `segments` into `tree`, growing intermediate nodes.
    ///
    /// Structural problems are reported here; whether the result is still a
    /// valid target is decided by [`TargetTree::prove`].
    pub(crate) fn write_into(
        &self,
        tree: &mut Value,
        grown: &mut HashSet<String>,
        segments: &[PathSegment],
        value: Value,
        rejected: &Value,
    ) -> Result<(), AccessError> {
        let field = join_segments(segments);
        let mut node = tree;
        let mut walked = String::new();

        for (position, segment) in segments.iter().enumerate() {
            if node.is_null() {
                if !self.options.auto_grow_nested_paths {
                    return Err(AccessError::invalid_path(
                        &field,
                        Some(rejected.clone()),
                        format!("value of nested path '{}' is null", walked),
                        true,
                    ));
                }
                *node = empty_container_for(segment);
                grown.insert(walked.clone());
            }

            let parent_grown = grown.contains(&walked);
            let child = child_path(&walked, segment);
            let is_last = position + 1 == segments.len();

            node = match (node, segment) {
                (Value::Object(map), PathSegment::Property(name)) => {
                    if !map.contains_key(name) && !parent_grown {
                        return Err(AccessError::unknown_field(&field, Some(rejected.clone())));
                    }
                    map.entry(name.clone()).or_insert(Value::Null)
                }
                (Value::Object(map), PathSegment::Key(key)) => map.entry(key.clone()).or_insert(Value::Null),
                (Value::Object(map), PathSegment::Index(index)) => {
                    map.entry(index.to_string()).or_insert(Value::Null)
                }
                (Value::Array(items), PathSegment::Index(index)) => {
                    let index = *index;
                    if index >= items.len() {
                        if !self.options.auto_grow_nested_paths {
                            return Err(AccessError::invalid_path(
                                &field,
                                Some(rejected.clone()),
                                format!("index {} out of bounds for list of length {}", index, items.len()),
                                true,
                            ));
                        }
                        if index >= self.options.auto_grow_collection_limit {
                            return Err(AccessError::invalid_path(
                                &field,
                                Some(rejected.clone()),
                                format!(
                                    "index {} exceeds the auto-grow collection limit of {}",
                                    index, self.options.auto_grow_collection_limit
                                ),
                                true,
                            ));
                        }
                        let filler = slot_filler(items, if is_last { Some(&value) } else { None }, segments.get(position + 1));
                        while items.len() < index {
                            if filler.is_object() {
                                grown.insert(format!("{}[{}]", walked, items.len()));
                            }
                            items.push(filler.clone());
                        }
                        items.push(Value::Null);
                    }
                    &mut items[index]
                }
                (Value::Array(_), other) => {
                    return Err(AccessError::not_writable(
                        &field,
                        Some(rejected.clone()),
                        format!("list '{}' cannot be addressed by '{}'", walked, other),
                    ))
                }
                _ => {
                    return Err(AccessError::not_writable(
                        &field,
                        Some(rejected.clone()),
                        format!("'{}' is not a nested object", walked),
                    ))
                }
            };
            walked = child;
        }

        *node = value;
        Ok(())
    }

    /// Check that a candidate tree still deserializes into the target type.
    ///
    /// Returns the tree of the accepted target, which differs from the
    /// candidate where the target type fills defaults.
    pub(crate) fn prove(&self, candidate: &Value) -> Result<Value, Rejection> {
        (self.proof)(candidate).map_err(|e| {
            if e.to_string().starts_with("missing field") {
                Rejection::Incomplete(e)
            } else {
                Rejection::Data(e)
            }
        })
    }

    /// Try each candidate value in order and commit the first one the target accepts.
    ///
    /// Returns the rejection of the first candidate when none is accepted.
    pub(crate) fn write_first_accepted(
        &mut self,
        segments: &[PathSegment],
        candidates: Vec<Value>,
        rejected: &Value,
    ) -> Result<Result<(), Rejection>, AccessError> {
        let mut first_rejection = None;
        for candidate in candidates {
            let mut tree = self.root.clone();
            let mut grown = self.grown.clone();
            self.write_into(&mut tree, &mut grown, segments, candidate, rejected)?;
            match self.prove(&tree) {
                Ok(accepted) => {
                    self.root = accepted;
                    self.grown = grown;
                    return Ok(Ok(()));
                }
                Err(rejection) => {
                    first_rejection.get_or_insert(rejection);
                }
            }
        }
        Ok(Err(first_rejection.unwrap_or_else(|| {
            Rejection::Data(serde::de::Error::custom("no value to write"))
        })))
    }

    /// Read the value at `path`; absent-but-growable nodes read as null
    pub(crate) fn read_path(&self, path: &str) -> Result<Value, AccessError> {
        let segments = self.segments(path, None, false)?;
        Ok(self.lookup(&segments)?.cloned().unwrap_or(Value::Null))
    }

    pub(crate) fn type_of_path(&self, path: &str) -> Option<FieldType> {
        let segments = self.segments(path, None, false).ok()?;
        self.type_of(&segments)
    }

    pub(crate) fn writable_path(&self, path: &str) -> bool {
        match self.segments(path, None, true) {
            Ok(segments) => self.can_write(&segments),
            Err(_) => false,
        }
    }

    /// Convert `raw` for the field at `path` and write it.
    ///
    /// A field of known type gets a single converted candidate; a field of
    /// unknown type gets the inference candidates. `reject` classifies a
    /// value the target type refused.
    pub(crate) fn set_path(
        &mut self,
        path: &str,
        raw: Value,
        reject: impl Fn(&str, Value, serde_json::Error) -> AccessError,
    ) -> Result<(), AccessError> {
        let segments = self.segments(path, Some(&raw), true)?;
        let field = join_segments(&segments);
        let field_type = self.type_of(&segments);

        let converted = self
            .converter
            .convert_for_field(Some(&field), &raw, field_type.as_ref())
            .map_err(|e| AccessError::from_convert(&field, raw.clone(), &e))?;
        let candidates = match field_type {
            Some(_) => vec![converted],
            None => inference_candidates(converted),
        };

        match self.write_first_accepted(&segments, candidates, &raw)? {
            Ok(()) => {
                tracing::trace!(field = %field, "field written");
                Ok(())
            }
            Err(Rejection::Incomplete(e)) => Err(AccessError::invalid_path(
                &field,
                Some(raw),
                format!("cannot create nested value: {}", e),
                true,
            )),
            Err(Rejection::Data(e)) => Err(reject(&field, raw, e)),
        }
    }

    /// Dry-run a write to see whether the path is structurally writable
    pub(crate) fn can_write(&self, segments: &[PathSegment]) -> bool {
        let mut tree = self.root.clone();
        let mut grown = self.grown.clone();
        self.write_into(&mut tree, &mut grown, segments, Value::Null, &Value::Null)
            .is_ok()
    }
}

fn child_path(walked: &str, segment: &PathSegment) -> String {
    match segment {
        PathSegment::Property(name) if walked.is_empty() => name.clone(),
        PathSegment::Property(name) => format!("{}.{}", walked, name),
        other => format!("{}{}", walked, other),
    }
}

fn empty_container_for(segment: &PathSegment) -> Value {
    match segment {
        PathSegment::Index(_) => Value::Array(Vec::new()),
        _ => Value::Object(serde_json::Map::new()),
    }
}

/// Neutral value for list slots skipped over by growth
fn slot_filler(items: &[Value], written: Option<&Value>, next: Option<&PathSegment>) -> Value {
    let template = items
        .iter()
        .find_map(FieldType::of)
        .or_else(|| written.and_then(FieldType::of));
    match (template, next) {
        (Some(field_type), _) => field_type.zero(),
        (None, Some(next)) => empty_container_for(next),
        (None, None) => Value::Null,
    }
}

/// Values to try when the field's type is unknown: the value itself, then
/// its numeric and boolean readings
pub(crate) fn inference_candidates(value: Value) -> Vec<Value> {
    let mut candidates = vec![value.clone()];
    if let Value::String(text) = &value {
        let text = text.trim();
        if text.is_empty() {
            candidates.push(Value::Null);
        } else {
            if let Ok(n) = text.parse::<i64>() {
                candidates.push(Value::from(n));
            } else if let Ok(n) = text.parse::<u64>() {
                candidates.push(Value::from(n));
            }
            if let Ok(f) = text.parse::<f64>() {
                if f.is_finite() {
                    candidates.push(Value::from(f));
                }
            }
            match text.to_ascii_lowercase().as_str() {
                "true" | "on" | "yes" => candidates.push(Value::Bool(true)),
                "false" | "off" | "no" => candidates.push(Value::Bool(false)),
                _ => {}
            }
        }
    }
    candidates
}

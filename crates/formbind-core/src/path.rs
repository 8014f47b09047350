//! Field path handling
//!
//! A field path addresses a node in the target object graph using dotted
//! property names, `[n]` list indexes and `[key]` map keys, for example
//! `items[2].sku` or `attributes['colour']`. Paths are canonicalized before
//! they are compared, filtered or stored on a field error.
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use thiserror::Error;

/// Separator between nested property names
pub const NESTED_PATH_SEPARATOR: char = '.';

const KEY_PREFIX: char = '[';
const KEY_SUFFIX: char = ']';

/// One step of a parsed field path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Named property, `address` in `address.city`
    Property(String),
    /// Numeric bracket, `2` in `items[2]`
    Index(usize),
    /// Non-numeric bracket, `colour` in `attributes[colour]`
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Property(name) => write!(f, "{}", name),
            PathSegment::Index(index) => write!(f, "[{}]", index),
            PathSegment::Key(key) => write!(f, "[{}]", key),
        }
    }
}

/// Malformed field path
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("Empty field path")]
    Empty,

    #[error("Unclosed '[' at position {position} in '{path}'")]
    UnclosedBracket { path: String, position: usize },

    #[error("Empty segment at position {position} in '{path}'")]
    EmptySegment { path: String, position: usize },

    #[error("Unexpected character '{found}' at position {position} in '{path}'")]
    UnexpectedCharacter {
        path: String,
        position: usize,
        found: char,
    },
}

/// Normalize bracketed segments of a path.
///
/// Whitespace inside brackets is trimmed and a single pair of surrounding
/// quotes is removed, so `list[ 0 ]` becomes `list[0]` and `map['k']` becomes
/// `map[k]`. Text outside brackets is left untouched.
pub fn canonicalize(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    let mut rest = path;

    while let Some(start) = rest.find(KEY_PREFIX) {
        result.push_str(&rest[..=start]);
        let after = &rest[start + 1..];
        match after.find(KEY_SUFFIX) {
            Some(end) => {
                result.push_str(strip_quotes(after[..end].trim()));
                result.push(KEY_SUFFIX);
                rest = &after[end + 1..];
            }
            None => {
                result.push_str(after);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}

fn strip_quotes(key: &str) -> &str {
    let quoted = key.len() >= 2
        && ((key.starts_with('\'') && key.ends_with('\''))
            || (key.starts_with('"') && key.ends_with('"')));
    if quoted {
        &key[1..key.len() - 1]
    } else {
        key
    }
}

/// Split a path into its segments.
///
/// The path is canonicalized first. Bracket contents made only of ASCII digits
/// become [`PathSegment::Index`], anything else a [`PathSegment::Key`].
pub fn parse_segments(path: &str) -> Result<Vec<PathSegment>, PathError> {
    let canonical = canonicalize(path);
    if canonical.is_empty() {
        return Err(PathError::Empty);
    }

    let mut segments = Vec::new();
    let mut chars = canonical.char_indices().peekable();
    let mut name = String::new();
    let mut name_start = 0;
    // true right after a '.', where a property name must follow
    let mut expect_name = true;

    while let Some((position, ch)) = chars.next() {
        match ch {
            NESTED_PATH_SEPARATOR => {
                if name.is_empty() {
                    if expect_name || segments.is_empty() {
                        return Err(PathError::EmptySegment {
                            path: canonical.clone(),
                            position,
                        });
                    }
                } else {
                    segments.push(PathSegment::Property(std::mem::take(&mut name)));
                }
                expect_name = true;
                name_start = position + 1;
            }
            KEY_PREFIX => {
                if !name.is_empty() {
                    segments.push(PathSegment::Property(std::mem::take(&mut name)));
                } else if expect_name && !segments.is_empty() {
                    return Err(PathError::EmptySegment {
                        path: canonical.clone(),
                        position: name_start,
                    });
                } else if segments.is_empty() {
                    return Err(PathError::UnexpectedCharacter {
                        path: canonical.clone(),
                        position,
                        found: ch,
                    });
                }

                let mut key = String::new();
                let mut closed = false;
                for (_, inner) in chars.by_ref() {
                    if inner == KEY_SUFFIX {
                        closed = true;
                        break;
                    }
                    key.push(inner);
                }
                if !closed {
                    return Err(PathError::UnclosedBracket {
                        path: canonical.clone(),
                        position,
                    });
                }
                if key.is_empty() {
                    return Err(PathError::EmptySegment {
                        path: canonical.clone(),
                        position: position + 1,
                    });
                }
                segments.push(bracket_segment(key));
                expect_name = false;
                if let Some(&(next_pos, next)) = chars.peek() {
                    if next != NESTED_PATH_SEPARATOR && next != KEY_PREFIX {
                        return Err(PathError::UnexpectedCharacter {
                            path: canonical.clone(),
                            position: next_pos,
                            found: next,
                        });
                    }
                }
            }
            KEY_SUFFIX => {
                return Err(PathError::UnexpectedCharacter {
                    path: canonical.clone(),
                    position,
                    found: ch,
                });
            }
            other => {
                name.push(other);
                expect_name = false;
            }
        }
    }

    if !name.is_empty() {
        segments.push(PathSegment::Property(name));
    } else if expect_name {
        return Err(PathError::EmptySegment {
            path: canonical.clone(),
            position: canonical.len(),
        });
    }

    Ok(segments)
}

fn bracket_segment(key: String) -> PathSegment {
    if key.bytes().all(|b| b.is_ascii_digit()) {
        match key.parse::<usize>() {
            Ok(index) => PathSegment::Index(index),
            Err(_) => PathSegment::Key(key),
        }
    } else {
        PathSegment::Key(key)
    }
}

/// Render segments back into a canonical path
pub fn join_segments(segments: &[PathSegment]) -> String {
    let mut path = String::new();
    for segment in segments {
        if let PathSegment::Property(name) = segment {
            if !path.is_empty() {
                path.push(NESTED_PATH_SEPARATOR);
            }
            path.push_str(name);
        } else {
            path.push_str(&segment.to_string());
        }
    }
    path
}

/// Remove every bracketed segment: `items[2].sku` -> `items.sku`
pub fn strip_indexes(path: &str) -> String {
    let mut result = String::with_capacity(path.len());
    let mut depth = 0usize;
    for ch in path.chars() {
        match ch {
            KEY_PREFIX => depth += 1,
            KEY_SUFFIX if depth > 0 => depth -= 1,
            _ if depth == 0 => result.push(ch),
            _ => {}
        }
    }
    result
}

/// Remove the right-most bracketed segment, `None` when there is none left
pub fn strip_last_index(path: &str) -> Option<String> {
    let start = path.rfind(KEY_PREFIX)?;
    let end = start + path[start..].find(KEY_SUFFIX)?;
    Some(format!("{}{}", &path[..start], &path[end + 1..]))
}

/// Whether `path` addresses more than a single top-level name
pub fn is_nested(path: &str) -> bool {
    path.contains(NESTED_PATH_SEPARATOR) || path.contains(KEY_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_trims_brackets() {
        assert_eq!(canonicalize("list[ 0 ]"), "list[0]");
        assert_eq!(canonicalize("map['key']"), "map[key]");
        assert_eq!(canonicalize("map[\"a b\"].x"), "map[a b].x");
        assert_eq!(canonicalize("plain.name"), "plain.name");
        assert_eq!(canonicalize("broken[ 1"), "broken[ 1");
    }

    #[test]
    fn test_parse_segments() {
        let segments = parse_segments("items[ 2 ].sku").unwrap();
        assert_eq!(
            segments,
            vec![
                PathSegment::Property("items".into()),
                PathSegment::Index(2),
                PathSegment::Property("sku".into()),
            ]
        );

        let segments = parse_segments("attrs['colour'][0]").unwrap();
        assert_eq!(
            segments,
            vec![
                PathSegment::Property("attrs".into()),
                PathSegment::Key("colour".into()),
                PathSegment::Index(0),
            ]
        );
    }

    #[test]
    fn test_parse_rejects_malformed_paths() {
        assert_eq!(parse_segments(""), Err(PathError::Empty));
        assert!(matches!(parse_segments("a..b"), Err(PathError::EmptySegment { .. })));
        assert!(matches!(parse_segments("a."), Err(PathError::EmptySegment { .. })));
        assert!(matches!(parse_segments("a[1"), Err(PathError::UnclosedBracket { .. })));
        assert!(matches!(parse_segments("a[]"), Err(PathError::EmptySegment { .. })));
        assert!(matches!(parse_segments("a[1]b"), Err(PathError::UnexpectedCharacter { .. })));
        assert!(matches!(parse_segments("[1]"), Err(PathError::UnexpectedCharacter { .. })));
    }

    #[test]
    fn test_join_round_trips_canonical_paths() {
        for path in ["a", "a.b", "items[3].sku", "m[k].v[0]"] {
            assert_eq!(join_segments(&parse_segments(path).unwrap()), path);
        }
    }

    #[test]
    fn test_strip_indexes() {
        assert_eq!(strip_indexes("items[2].sku"), "items.sku");
        assert_eq!(strip_indexes("a[1][2]"), "a");
        assert_eq!(strip_indexes("plain"), "plain");
    }

    #[test]
    fn test_strip_last_index() {
        assert_eq!(strip_last_index("a[1].b[2]").as_deref(), Some("a[1].b"));
        assert_eq!(strip_last_index("a[1].b").as_deref(), Some("a.b"));
        assert_eq!(strip_last_index("a.b"), None);
    }
}

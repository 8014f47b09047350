//! Property-based testing strategies for field paths and patterns
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

#![cfg(test)]

use crate::filter::{is_allowed, simple_match};
use crate::path::{canonicalize, join_segments, parse_segments};
use proptest::prelude::*;

/// Strategy for a property name
pub fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9_]{0,8}"
}

/// Strategy for one path segment as written by a client, with optional
/// bracket padding and quoting
pub fn segment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        name_strategy().prop_map(|n| format!(".{}", n)),
        (0usize..300, " {0,2}").prop_map(|(i, pad)| format!("[{}{}{}]", pad, i, pad)),
        ("[a-z]{1,6}", prop_oneof![Just(""), Just("'"), Just("\"")])
            .prop_map(|(k, q)| format!("[{}{}{}]", q, k, q)),
    ]
}

/// Strategy for a well-formed field path
pub fn field_path_strategy() -> impl Strategy<Value = String> {
    (name_strategy(), proptest::collection::vec(segment_strategy(), 0..4))
        .prop_map(|(head, rest)| format!("{}{}", head, rest.concat()))
}

/// Strategy for a glob pattern in one of the four supported forms
pub fn pattern_strategy() -> impl Strategy<Value = String> {
    ("[a-z.]{1,6}", 0u8..4).prop_map(|(core, form)| match form {
        0 => core,
        1 => format!("{}*", core),
        2 => format!("*{}", core),
        _ => format!("*{}*", core),
    })
}

proptest! {
    #[test]
    fn prop_canonicalize_is_idempotent(path in field_path_strategy()) {
        let once = canonicalize(&path);
        prop_assert_eq!(canonicalize(&once), once.clone());
    }

    #[test]
    fn prop_canonical_paths_round_trip(path in field_path_strategy()) {
        let canonical = canonicalize(&path);
        let segments = parse_segments(&canonical).unwrap();
        prop_assert_eq!(join_segments(&segments), canonical);
    }

    #[test]
    fn prop_deny_wins(
        field in field_path_strategy(),
        allow in proptest::collection::vec(pattern_strategy(), 0..3),
        deny in pattern_strategy(),
    ) {
        let field = canonicalize(&field);
        let allowed = is_allowed(&field, &allow, &[deny.clone()]);
        if simple_match(&deny, &field) {
            prop_assert!(!allowed);
        }
    }

    #[test]
    fn prop_open_filter_allows_everything(field in field_path_strategy()) {
        let none: [&str; 0] = [];
        prop_assert!(is_allowed(&canonicalize(&field), &none, &none));
    }
}

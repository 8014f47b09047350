//! Property-based tests for the binder and the error model
//!
//! These tests verify invariants that should hold for every input: filtered
//! fields never reach the target, the nested path stack is balanced, errors
//! partition into global and field errors, and `close` fails exactly when
//! errors were recorded.


use formbind_core::{Binder, BindingErrors, MISSING_FIELD_ERROR_CODE};
use proptest::prelude::*;
use std::collections::BTreeMap;
use test_support::*;

// Strategy functions for property testing

/// Strategy for a nested path segment
fn segment_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z]{1,8}",
        ("[a-z]{1,8}", 0usize..10).prop_map(|(name, i)| format!("{}[{}]", name, i)),
    ]
}

/// Strategy for one recorded error: a global code or a field rejection
fn rejection_strategy() -> impl Strategy<Value = (Option<String>, String)> {
    (proptest::option::of("[a-z]{1,6}(\\.[a-z]{1,6})?"), "[a-z-]{1,10}")
}

#[derive(Debug, Clone)]
enum Field {
    Name,
    Age,
}

fn field_strategy() -> impl Strategy<Value = Field> {
    prop_oneof![Just(Field::Name), Just(Field::Age)]
}

proptest! {
    #[test]
    fn prop_nested_path_round_trip(
        start in proptest::option::of("[a-z]{1,6}"),
        pushes in proptest::collection::vec(segment_strategy(), 0..5),
    ) {
        let mut errors = BindingErrors::new("target");
        errors.set_nested_path(start.as_deref().unwrap_or(""));
        let original = errors.nested_path().to_string();

        for segment in &pushes {
            errors.push_nested_path(segment);
            prop_assert!(errors.nested_path().ends_with('.'));
        }
        for _ in &pushes {
            errors.pop_nested_path();
        }
        prop_assert_eq!(errors.nested_path(), original.as_str());
    }

    #[test]
    fn prop_errors_partition(rejections in proptest::collection::vec(rejection_strategy(), 0..12)) {
        let mut errors = BindingErrors::new("target");
        for (field, code) in &rejections {
            match field {
                Some(field) => errors.reject_value(field, code),
                None => errors.reject(code),
            }
        }

        let globals = errors.global_errors().len();
        let fields = errors.field_errors().len();
        prop_assert_eq!(globals + fields, errors.all_errors().len());
        prop_assert_eq!(fields, rejections.iter().filter(|(f, _)| f.is_some()).count());
        prop_assert!(errors.all_errors().iter().all(|e| e.is_field_error() != e.field().is_none()));
    }

    #[test]
    fn prop_close_fails_iff_errors(rejections in proptest::collection::vec(rejection_strategy(), 0..4)) {
        let mut binder = Binder::new(Person::default(), "person").unwrap();
        for (field, code) in &rejections {
            match field {
                Some(field) => binder.binding_result_mut().reject_value(field, code),
                None => binder.binding_result_mut().reject(code),
            }
        }
        let has_errors = binder.binding_result().has_errors();
        prop_assert_eq!(binder.close().is_err(), has_errors);
        prop_assert_eq!(has_errors, !rejections.is_empty());
    }

    #[test]
    fn prop_filtered_fields_never_bound(
        name in "[a-zA-Z]{1,10}",
        age in 0u32..150,
        denied in proptest::collection::vec(field_strategy(), 0..3),
    ) {
        let deny: Vec<&str> = denied
            .iter()
            .map(|f| match f {
                Field::Name => "name",
                Field::Age => "age",
            })
            .collect();
        let mut binder = Binder::new(Person::default(), "person").unwrap();
        binder.set_disallowed_fields(deny.clone());
        binder.bind(values(&[("name", name.clone()), ("age", age.to_string())]));

        let suppressed = binder.binding_result().suppressed_fields().clone();
        let person = binder.target().unwrap();
        if deny.contains(&"name") {
            prop_assert!(suppressed.contains("name"));
            prop_assert_eq!(person.name.as_str(), "");
        } else {
            prop_assert_eq!(&person.name, &name);
        }
        if deny.contains(&"age") {
            prop_assert!(suppressed.contains("age"));
            prop_assert_eq!(person.age, 0);
        } else {
            prop_assert_eq!(person.age, age);
        }
    }

    #[test]
    fn prop_required_field_reported_once(
        extra in proptest::collection::btree_map("[a-z]{3,8}", "[a-z]{0,4}", 0..4),
    ) {
        let extra: BTreeMap<String, String> = extra.into_iter().filter(|(k, _)| k != "name").collect();
        let pairs: Vec<(&str, String)> = extra.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();

        let mut binder = Binder::new(Person::default(), "person").unwrap();
        binder.set_required_fields(["name"]);
        binder.bind(values(&pairs));

        let errors = binder.binding_result();
        let name_errors = errors.field_errors_for("name");
        prop_assert_eq!(name_errors.len(), 1);
        prop_assert_eq!(name_errors[0].code(), Some(MISSING_FIELD_ERROR_CODE));
    }
}

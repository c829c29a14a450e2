//! Tests for shape pruning.

#[cfg(test)]
mod tests {
    use crate::prune::{prune, prune_map};
    use crate::value::{Map, Opaque, Value};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    /// Helper to build a map from (key, value) pairs.
    fn map_of(pairs: Vec<(&str, Value)>) -> Value {
        Value::Map(pairs.into_iter().collect())
    }

    #[test]
    fn test_drops_keys_not_in_shape() {
        let source = v(json!({"a": 1, "b": 2, "c": 3}));
        let shape = v(json!({"a": 0, "c": 0}));

        assert_eq!(prune(&source, &shape), v(json!({"a": 1, "c": 3})));
    }

    #[test]
    fn test_prunes_deeply_nested_maps() {
        let source = v(json!({"a": {"b": {"c": 1, "d": 2}, "e": 3}, "f": 9}));
        let shape = v(json!({"a": {"b": {"c": 0}}}));

        assert_eq!(prune(&source, &shape), v(json!({"a": {"b": {"c": 1}}})));
    }

    #[test]
    fn test_missing_source_keys_become_absent() {
        let source = v(json!({"a": 1}));
        let shape = v(json!({"a": 0, "b": 0}));

        assert_eq!(
            prune(&source, &shape),
            map_of(vec![("a", Value::Int(1)), ("b", Value::Absent)])
        );
    }

    #[test]
    fn test_list_shape_prunes_each_element_with_first_template() {
        let source = v(json!({
            "items": [{"x": 1, "y": 2, "z": 3}, {"x": 4, "y": 5, "extra": true}],
            "extra": "drop"
        }));
        let shape = v(json!({"items": [{"x": 0, "y": 0}]}));

        assert_eq!(
            prune(&source, &shape),
            v(json!({"items": [{"x": 1, "y": 2}, {"x": 4, "y": 5}]}))
        );
    }

    #[test]
    fn test_later_template_elements_are_ignored() {
        let source = v(json!([{"x": 1, "y": 2}, {"x": 3, "y": 4}]));
        let shape = v(json!([{"x": 0}, {"y": 0}]));

        assert_eq!(prune(&source, &shape), v(json!([{"x": 1}, {"x": 3}])));
    }

    #[test]
    fn test_empty_list_shape_drops_all_elements() {
        let source = v(json!({"items": [{"x": 1}, {"x": 2}]}));
        let shape = v(json!({"items": []}));

        assert_eq!(prune(&source, &shape), v(json!({"items": []})));
    }

    #[test]
    fn test_non_list_source_for_list_shape_gives_empty_list() {
        let source = v(json!({"items": {"x": 1}}));
        let shape = v(json!({"items": [{"x": 0}]}));

        assert_eq!(prune(&source, &shape), v(json!({"items": []})));
    }

    #[test]
    fn test_non_map_source_for_map_shape_gives_absent_leaves() {
        let source = v(json!({"a": 123}));
        let shape = v(json!({"a": {"b": 0, "c": {"d": 0}}}));

        let expected = map_of(vec![(
            "a",
            map_of(vec![
                ("b", Value::Absent),
                ("c", map_of(vec![("d", Value::Absent)])),
            ]),
        )]);
        assert_eq!(prune(&source, &shape), expected);
    }

    #[test]
    fn test_leaf_values_are_copied_without_coercion() {
        let source = v(json!({"a": "1", "b": {"c": "2"}}));
        let shape = v(json!({"a": 0, "b": {"c": 0}}));

        assert_eq!(prune(&source, &shape), v(json!({"a": "1", "b": {"c": "2"}})));
    }

    #[test]
    fn test_leaf_shape_keeps_source_container_whole() {
        let source = v(json!({"a": {"b": 1, "c": 2}, "l": [1, {"x": 1}]}));
        let shape = v(json!({"a": true, "l": null}));

        assert_eq!(prune(&source, &shape), source);
    }

    #[test]
    fn test_opaque_shape_is_a_leaf() {
        let source = v(json!({"a": {"b": 1, "c": 2}}));
        let shape = map_of(vec![("a", Value::Opaque(Opaque::new("Date")))]);

        assert_eq!(prune(&source, &shape), v(json!({"a": {"b": 1, "c": 2}})));
    }

    #[test]
    fn test_opaque_source_is_incompatible_with_map_shape() {
        let foo = Opaque::with_fields(
            "Foo",
            [("x", Value::Int(1)), ("y", Value::Int(2))].into_iter().collect(),
        );
        let source = map_of(vec![("a", Value::Opaque(foo))]);
        let shape = v(json!({"a": {"x": 0}}));

        assert_eq!(
            prune(&source, &shape),
            map_of(vec![("a", map_of(vec![("x", Value::Absent)]))])
        );
    }

    #[test]
    fn test_mixed_nesting() {
        let source = v(json!({"a": [{"b": {"c": 1, "d": 2}, "drop": true}], "dropTop": 1}));
        let shape = v(json!({"a": [{"b": {"c": 0}}]}));

        assert_eq!(prune(&source, &shape), v(json!({"a": [{"b": {"c": 1}}]})));
    }

    #[test]
    fn test_absent_list_holes_are_kept() {
        let source = Value::List(vec![Value::Absent, v(json!({"x": 1, "y": 2}))]);
        let shape = v(json!([{"x": 0}]));

        assert_eq!(
            prune(&source, &shape),
            Value::List(vec![Value::Absent, v(json!({"x": 1}))])
        );
    }

    #[test]
    fn test_prune_does_not_mutate_inputs() {
        let source = v(json!({"a": {"b": 1, "drop": 2}, "arr": [{"x": 1, "y": 2}]}));
        let shape = v(json!({"a": {"b": 0}, "arr": [{"x": 0}]}));
        let (source_before, shape_before) = (source.clone(), shape.clone());

        prune(&source, &shape);

        assert_eq!(source, source_before);
        assert_eq!(shape, shape_before);
    }

    #[test]
    fn test_prune_map() {
        let source = v(json!({"a": 1, "b": 2})).into_map().unwrap();
        let shape = v(json!({"b": 0})).into_map().unwrap();

        assert_eq!(prune_map(&source, &shape), v(json!({"b": 2})).into_map().unwrap());
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            (-5i64..5).prop_map(Value::Int),
            "[a-c]{0,2}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..3).prop_map(Value::List),
                prop::collection::btree_map("[a-d]", inner, 0..4)
                    .prop_map(|fields| Value::Map(Map { fields })),
            ]
        })
    }

    /// Checks that `result` has exactly the keys of `shape` at every level.
    fn echoes_shape(result: &Value, shape: &Value) -> bool {
        match shape {
            Value::Map(shape) => match result {
                Value::Map(result) => {
                    result.keys().eq(shape.keys())
                        && shape.iter().all(|(k, sub)| match sub {
                            Value::Map(_) | Value::List(_) => result.get(k).is_some_and(|r| echoes_shape(r, sub)),
                            _ => true,
                        })
                }
                _ => false,
            },
            Value::List(template) => match (result, template.first()) {
                (Value::List(elements), Some(first)) => elements.iter().all(|el| echoes_shape(el, first)),
                (Value::List(elements), None) => elements.is_empty(),
                _ => false,
            },
            _ => true,
        }
    }

    proptest! {
        #[test]
        fn prop_prune_is_idempotent(source in arb_value(), shape in arb_value()) {
            let once = prune(&source, &shape);
            prop_assert_eq!(prune(&once, &shape), once);
        }

        #[test]
        fn prop_result_echoes_shape_keys(source in arb_value(), shape in arb_value()) {
            prop_assert!(echoes_shape(&prune(&source, &shape), &shape));
        }
    }
}

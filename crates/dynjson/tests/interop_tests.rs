use dynjson::interop::to_json_value_with_limits;
use dynjson::{
    deserialize, from_json_value, serialize, to_json_value, Array, DynamicValue, JsonError, Limits,
    Table, ValueType,
};
use serde_json::json;

// ============================================================================
// DynamicValue -> serde_json
// ============================================================================

#[test]
fn scalars_convert() {
    assert_eq!(to_json_value(&DynamicValue::Nil).unwrap(), json!(null));
    assert_eq!(to_json_value(&true.into()).unwrap(), json!(true));
    assert_eq!(to_json_value(&"s".into()).unwrap(), json!("s"));
    assert_eq!(to_json_value(&ValueType::Array.into()).unwrap(), json!(5));
}

#[test]
fn integral_numbers_become_integers() {
    assert_eq!(to_json_value(&DynamicValue::Number(1500.0)).unwrap(), json!(1500));
    assert_eq!(to_json_value(&DynamicValue::Number(-3.0)).unwrap(), json!(-3));
    assert_eq!(to_json_value(&DynamicValue::Number(2.5)).unwrap(), json!(2.5));
    assert_eq!(to_json_value(&f64::NAN.into()).unwrap(), json!(null));
    assert_eq!(to_json_value(&f64::INFINITY.into()).unwrap(), json!(null));
}

#[test]
fn tables_convert_in_order_with_coerced_keys() {
    let t = Table::new();
    t.set("b", 1);
    t.set(2, "two");
    t.set("a", [true, false].into_iter().collect::<Array>());

    let value = to_json_value(&t.into()).unwrap();
    assert_eq!(value, json!({"b": 1, "2": "two", "a": [true, false]}));

    let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["b", "2", "a"]);
}

#[test]
fn coerced_key_collisions_keep_the_last_value() {
    let t = Table::new();
    t.set("1", "string key");
    t.set(1, "number key");
    assert_eq!(to_json_value(&t.into()).unwrap(), json!({"1": "number key"}));
}

#[test]
fn shared_references_are_rejected() {
    let shared = Table::new();
    let root = Table::new();
    root.set("a", &shared);
    root.set("b", &shared);
    assert!(matches!(
        to_json_value(&root.into()),
        Err(JsonError::CircularReference { .. })
    ));
}

#[test]
fn depth_limit_applies() {
    let inner: Array = [1].into_iter().collect();
    let outer: Array = [inner].into_iter().collect();
    let value = DynamicValue::Array(outer);
    assert!(to_json_value_with_limits(&value, Limits::new(2)).is_ok());
    assert!(matches!(
        to_json_value_with_limits(&value, Limits::new(1)),
        Err(JsonError::SerializeTooDeep { max_depth: 1 })
    ));
}

// ============================================================================
// serde_json -> DynamicValue
// ============================================================================

#[test]
fn from_json_value_builds_fresh_tree() {
    let value = from_json_value(&json!({
        "name": "gadget",
        "sizes": [1, 2.5],
        "meta": {"ok": true, "note": null}
    }));

    let t = value.as_table().unwrap();
    assert_eq!(t.get("name"), Some("gadget".into()));
    let sizes = t.get("sizes").unwrap();
    assert_eq!(
        sizes.as_array().unwrap().iter().collect::<Vec<_>>(),
        vec![DynamicValue::Number(1.0), DynamicValue::Number(2.5)]
    );
    let meta = t.get("meta").unwrap();
    assert_eq!(meta.as_table().unwrap().get("note"), Some(DynamicValue::Nil));
}

// ============================================================================
// Agreement with serde_json
// ============================================================================

#[test]
fn serializer_output_is_valid_json_for_serde() {
    let t = Table::new();
    t.set("quote", "say \"hi\"");
    t.set("path", "C:\\temp");
    t.set("n", 21.37);
    t.set("list", [1, 2, 3].into_iter().collect::<Array>());
    let value = DynamicValue::Table(t);

    let text = serialize(&value).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, to_json_value(&value).unwrap());
}

#[test]
fn serde_output_parses_to_the_same_value() {
    let original = json!({"a": [1, {"b": "c\n"}], "d": -0.125, "e": null});
    let text = serde_json::to_string(&original).unwrap();
    let parsed = deserialize(&text).unwrap();
    assert_eq!(parsed, from_json_value(&original));
}

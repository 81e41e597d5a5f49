use dynjson::{deserialize, serialize, Array, DynamicValue, Table, ValueType};

/// Helper: serialize, parse back, and compare structurally.
fn assert_roundtrip(value: DynamicValue) {
    let json = serialize(&value).unwrap_or_else(|e| panic!("serialize failed: {e}"));
    let back = deserialize(&json).unwrap_or_else(|e| panic!("deserialize of {json:?} failed: {e}"));
    assert_eq!(back, value, "round trip through {json:?}");
}

/// Helper: parse, serialize, and expect the text unchanged.
fn assert_stable(json: &str) {
    let value = deserialize(json).unwrap();
    assert_eq!(serialize(&value).unwrap(), json);
}

// ============================================================================
// Value -> text -> value
// ============================================================================

#[test]
fn roundtrip_scalars() {
    assert_roundtrip(DynamicValue::Nil);
    assert_roundtrip(true.into());
    assert_roundtrip(DynamicValue::Number(0.1));
    assert_roundtrip(DynamicValue::Number(-1.5e-7));
    assert_roundtrip(DynamicValue::Number(1e300));
    assert_roundtrip("quote \" backslash \\ newline \n tab \t".into());
    assert_roundtrip("unicode é 😀".into());
}

#[test]
fn roundtrip_nested_structure() {
    let inner = Table::new();
    inner.set("deep", [1, 2].into_iter().collect::<Array>());
    inner.set("empty", Table::new());

    let root = Table::new();
    root.set("inner", inner);
    root.set("list", ["a", "b", "c"].into_iter().collect::<Array>());
    root.set("none", DynamicValue::Nil);
    root.set("flag", false);

    assert_roundtrip(root.into());
}

#[test]
fn roundtrip_array_root() {
    let arr = Array::new();
    arr.push(Table::new());
    arr.push(Array::new());
    arr.push("x");
    assert_roundtrip(arr.into());
}

#[test]
fn roundtrip_deep_clone_passes_sharing_check() {
    let shared = Table::new();
    shared.set("v", 1);
    let root = Table::new();
    root.set("a", &shared);
    root.set("b", shared.deep_clone());

    assert!(serialize(&root.clone().into()).is_ok());
    assert_roundtrip(root.into());
}

// ============================================================================
// Lossy conversions
// ============================================================================

#[test]
fn type_codes_come_back_as_numbers() {
    let json = serialize(&ValueType::Boolean.into()).unwrap();
    assert_eq!(deserialize(&json).unwrap(), DynamicValue::Number(3.0));
}

#[test]
fn non_string_keys_come_back_as_strings() {
    let t = Table::new();
    t.set(7, "seven");
    let back = deserialize(&serialize(&t.into()).unwrap()).unwrap();
    let back = back.as_table().unwrap();
    assert_eq!(back.get("7"), Some("seven".into()));
    assert_eq!(back.get(7), None);
}

#[test]
fn nan_comes_back_as_nil() {
    let arr: Array = [f64::NAN].into_iter().collect();
    let back = deserialize(&serialize(&arr.into()).unwrap()).unwrap();
    assert_eq!(back.as_array().unwrap().get(0), Some(DynamicValue::Nil));
}

// ============================================================================
// Text -> value -> text
// ============================================================================

#[test]
fn pretty_output_is_stable() {
    assert_stable("{\n  \"a\": [\n    1,\n    {\n      \"b\": null\n    }\n  ],\n  \"c\": \"d\"\n}");
    assert_stable("[\n]");
    assert_stable("{\n}");
    assert_stable("\"s\"");
}

#[test]
fn exponent_input_is_written_in_plain_form() {
    let value = deserialize("1.5e3").unwrap();
    let json = serialize(&value).unwrap();
    assert_eq!(json, "1500");
    assert_eq!(deserialize(&json).unwrap(), DynamicValue::Number(1500.0));
}

#[test]
fn compact_input_is_reindented() {
    let value = deserialize(r#"{"a":[1,2],"b":{"c":true}}"#).unwrap();
    assert_eq!(
        serialize(&value).unwrap(),
        "{\n  \"a\": [\n    1,\n    2\n  ],\n  \"b\": {\n    \"c\": true\n  }\n}"
    );
}

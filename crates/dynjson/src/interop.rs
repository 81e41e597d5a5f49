//! Conversions between [`DynamicValue`] and `serde_json::Value`.
//!
//! `to_json_value` applies the same rules as the pretty serializer: the
//! shared-reference check before every table, non-string keys coerced to
//! strings, non-finite numbers as `null`, type codes as integers. Keys that
//! coerce to the same string collapse into one entry, last one winning.

use serde_json::{Map, Number, Value};

use crate::error::{JsonError, Result};
use crate::limits::Limits;
use crate::serializer::ensure_no_shared_references;
use crate::value::{Array, DynamicValue, Table};

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Convert a dynamic value into a `serde_json::Value` under default limits.
pub fn to_json_value(value: &DynamicValue) -> Result<Value> {
    to_json_value_with_limits(value, Limits::default())
}

pub fn to_json_value_with_limits(value: &DynamicValue, limits: Limits) -> Result<Value> {
    convert(value, limits, 0)
}

fn convert(value: &DynamicValue, limits: Limits, depth: usize) -> Result<Value> {
    match value {
        DynamicValue::Nil => Ok(Value::Null),
        DynamicValue::Number(n) => Ok(number(*n)),
        DynamicValue::String(s) => Ok(Value::String(s.clone())),
        DynamicValue::Boolean(b) => Ok(Value::Bool(*b)),
        DynamicValue::TypeCode(t) => Ok(Value::Number(Number::from(t.code()))),
        DynamicValue::Table(table) => {
            ensure_no_shared_references(table)?;
            check_depth(limits, depth)?;
            let mut map = Map::new();
            for (key, item) in table.iter() {
                let key = match key {
                    DynamicValue::String(s) => s,
                    other => other.to_key_string(),
                };
                map.insert(key, convert(&item, limits, depth + 1)?);
            }
            Ok(Value::Object(map))
        }
        DynamicValue::Array(array) => {
            check_depth(limits, depth)?;
            let items = array
                .iter()
                .map(|item| convert(&item, limits, depth + 1))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Array(items))
        }
    }
}

/// Integral values within the exact range become JSON integers so that
/// `1500.0` prints as `1500`, matching the pretty serializer.
fn number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < MAX_EXACT_INTEGER && !(n == 0.0 && n.is_sign_negative()) {
        return Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(Value::Null, Value::Number)
}

fn check_depth(limits: Limits, depth: usize) -> Result<()> {
    if limits.allows(depth) {
        Ok(())
    } else {
        Err(JsonError::SerializeTooDeep {
            max_depth: limits.max_depth.unwrap_or(depth),
        })
    }
}

/// Build a fresh dynamic value tree from a `serde_json::Value`. Objects keep
/// their key order.
pub fn from_json_value(value: &Value) -> DynamicValue {
    match value {
        Value::Null => DynamicValue::Nil,
        Value::Bool(b) => DynamicValue::Boolean(*b),
        Value::Number(n) => n.as_f64().map_or(DynamicValue::Nil, DynamicValue::Number),
        Value::String(s) => DynamicValue::String(s.clone()),
        Value::Array(items) => {
            DynamicValue::Array(items.iter().map(from_json_value).collect::<Array>())
        }
        Value::Object(map) => DynamicValue::Table(
            map.iter()
                .map(|(k, v)| (k.as_str(), from_json_value(v)))
                .collect::<Table>(),
        ),
    }
}

//! # dynjson
//!
//! Bidirectional JSON codec for a dynamic value model: nil, numbers, strings,
//! booleans, type codes, and shared, insertion-ordered tables and arrays.
//!
//! Deserializing runs a hand-written lexer and a one-token-lookahead
//! recursive-descent parser. Serializing pretty-prints with two-space
//! indentation after checking that no table or array is reachable twice.
//!
//! ## Quick start
//!
//! ```rust
//! use dynjson::{deserialize, serialize, DynamicValue, Table};
//!
//! let table = Table::new();
//! table.set("name", "Alice");
//! table.set("score", 95);
//!
//! let json = serialize(&DynamicValue::Table(table.clone())).unwrap();
//! assert_eq!(json, "{\n  \"name\": \"Alice\",\n  \"score\": 95\n}");
//!
//! let back = deserialize(&json).unwrap();
//! assert_eq!(back, DynamicValue::Table(table));
//! ```
//!
//! ## Modules
//!
//! - [`value`]: `DynamicValue`, `Table`, `Array`, `ValueType`
//! - [`lexer`]: JSON text → tokens with line/column
//! - [`parser`]: tokens → `DynamicValue`
//! - [`emitter`]: JSON punctuation, literals and indentation over a text sink
//! - [`serializer`]: `DynamicValue` → JSON text, plus the shared-reference check
//! - [`limits`]: nesting caps for both directions
//! - [`interop`]: conversions to and from `serde_json::Value`
//! - [`runtime`]: the script-facing `json.stringify` / `json.parse` module
//! - [`error`]: error types

pub mod emitter;
pub mod error;
pub mod interop;
pub mod lexer;
pub mod limits;
pub mod parser;
pub mod runtime;
pub mod serializer;
pub mod value;

use std::io::Write;

use tracing::trace;

pub use error::{Composite, ErrorCategory, JsonError, Result};
pub use interop::{from_json_value, to_json_value};
pub use limits::Limits;
pub use parser::Parser;
pub use serializer::{ensure_no_shared_references, Serializer};
pub use value::{Array, DynamicValue, Table, ValueType};

/// Serialize a value to pretty-printed JSON under default limits.
pub fn serialize(value: &DynamicValue) -> Result<String> {
    serialize_with_limits(value, Limits::default())
}

pub fn serialize_with_limits(value: &DynamicValue, limits: Limits) -> Result<String> {
    trace!(value_type = %value.value_type(), "serialize");
    let mut serializer = Serializer::with_limits(limits);
    serializer.serialize_value(value)?;
    Ok(serializer.into_inner())
}

/// Serialize into an `io::Write` sink. Nothing is written if serialization
/// fails.
pub fn serialize_to_writer<W: Write>(mut writer: W, value: &DynamicValue) -> Result<()> {
    let json = serialize(value)?;
    writer.write_all(json.as_bytes())?;
    Ok(())
}

/// Parse a complete JSON document under default limits.
pub fn deserialize(json: &str) -> Result<DynamicValue> {
    deserialize_with_limits(json, Limits::default())
}

pub fn deserialize_with_limits(json: &str, limits: Limits) -> Result<DynamicValue> {
    trace!(len = json.len(), "deserialize");
    Parser::with_limits(limits).parse(json)
}

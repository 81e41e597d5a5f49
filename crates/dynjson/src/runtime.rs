//! Script-facing `json` module: `stringify` and `parse` with an
//! `ignore_errors` switch.
//!
//! With `ignore_errors` set (the default for script calls), a codec failure is
//! swallowed and the function returns its fallback value: an empty string for
//! `stringify`, nil for `parse`. Otherwise the failure is wrapped in a
//! [`RuntimeError`] that keeps the codec error as its source.

use thiserror::Error;
use tracing::debug;

use crate::error::JsonError;
use crate::value::{DynamicValue, ValueType};

/// Errors raised to scripts by the `json` module.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Unable to serialize the provided object.")]
    Serialize(#[source] JsonError),

    #[error("Unable to deserialize the provided JSON string.")]
    Deserialize(#[source] JsonError),

    #[error("{function}() expects between {min} and {max} arguments, got {got}")]
    ArgumentCount {
        function: &'static str,
        min: usize,
        max: usize,
        got: usize,
    },

    #[error("{function}() expects argument {index} to be {expected}, got {found}")]
    ArgumentType {
        function: &'static str,
        index: usize,
        expected: ValueType,
        found: ValueType,
    },

    #[error("module 'json' has no function '{0}'")]
    UnknownFunction(String),
}

/// Serialize `value`; on failure return `""` if `ignore_errors`, else an error.
pub fn stringify(value: &DynamicValue, ignore_errors: bool) -> Result<DynamicValue, RuntimeError> {
    match crate::serialize(value) {
        Ok(json) => Ok(DynamicValue::String(json)),
        Err(e) if ignore_errors => {
            debug!(error = %e, "json.stringify failed, returning empty string");
            Ok(DynamicValue::String(String::new()))
        }
        Err(e) => Err(RuntimeError::Serialize(e)),
    }
}

/// Deserialize `json`; on failure return nil if `ignore_errors`, else an error.
pub fn parse(json: &str, ignore_errors: bool) -> Result<DynamicValue, RuntimeError> {
    match crate::deserialize(json) {
        Ok(value) => Ok(value),
        Err(e) if ignore_errors => {
            debug!(error = %e, "json.parse failed, returning nil");
            Ok(DynamicValue::Nil)
        }
        Err(e) => Err(RuntimeError::Deserialize(e)),
    }
}

/// Documentation entry for one module function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionDoc {
    pub name: &'static str,
    pub description: &'static str,
    pub returns: &'static str,
}

const FUNCTIONS: &[FunctionDoc] = &[
    FunctionDoc {
        name: "stringify",
        description: "Attempts to serialize the provided value into JSON.",
        returns: "JSON representation of the provided value.",
    },
    FunctionDoc {
        name: "parse",
        description: "Attempts to deserialize the provided string back into a usable dynamic value.",
        returns: "Object represented by the provided JSON string.",
    },
];

/// The `json` module as a host runtime sees it: a name and a dispatcher over
/// untyped argument lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonModule;

impl JsonModule {
    pub const NAME: &'static str = "json";

    pub fn functions() -> &'static [FunctionDoc] {
        FUNCTIONS
    }

    /// Call `function` with script arguments.
    ///
    /// - `stringify(value, ignore_errors = true)`: `value` may be anything.
    /// - `parse(json, ignore_errors = true)`: `json` must be a string.
    pub fn call(&self, function: &str, args: &[DynamicValue]) -> Result<DynamicValue, RuntimeError> {
        match function {
            "stringify" => {
                expect_count("stringify", args)?;
                let ignore_errors = optional_boolean("stringify", args, 1, true)?;
                stringify(&args[0], ignore_errors)
            }
            "parse" => {
                expect_count("parse", args)?;
                let json = match &args[0] {
                    DynamicValue::String(s) => s.as_str(),
                    other => {
                        return Err(RuntimeError::ArgumentType {
                            function: "parse",
                            index: 0,
                            expected: ValueType::String,
                            found: other.value_type(),
                        })
                    }
                };
                let ignore_errors = optional_boolean("parse", args, 1, true)?;
                parse(json, ignore_errors)
            }
            other => Err(RuntimeError::UnknownFunction(other.to_string())),
        }
    }
}

fn expect_count(function: &'static str, args: &[DynamicValue]) -> Result<(), RuntimeError> {
    if (1..=2).contains(&args.len()) {
        Ok(())
    } else {
        Err(RuntimeError::ArgumentCount {
            function,
            min: 1,
            max: 2,
            got: args.len(),
        })
    }
}

fn optional_boolean(
    function: &'static str,
    args: &[DynamicValue],
    index: usize,
    default: bool,
) -> Result<bool, RuntimeError> {
    match args.get(index) {
        None => Ok(default),
        Some(DynamicValue::Boolean(b)) => Ok(*b),
        Some(other) => Err(RuntimeError::ArgumentType {
            function,
            index,
            expected: ValueType::Boolean,
            found: other.value_type(),
        }),
    }
}

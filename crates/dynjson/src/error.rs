//! Error types for JSON serialization and deserialization.
//!
//! Every failure the codec can raise is a variant of [`JsonError`]. Lexical and
//! syntax errors carry the 1-based line and column of the offending position;
//! graph errors name the kind of composite that was reached twice.

use std::fmt;

use thiserror::Error;

use crate::lexer::TokenType;

/// Which kind of composite object a graph or EOF error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composite {
    Table,
    Array,
}

impl fmt::Display for Composite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Composite::Table => f.write_str("table"),
            Composite::Array => f.write_str("array"),
        }
    }
}

/// Coarse classification of a [`JsonError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Raised by the lexer while scanning characters.
    Lexical,
    /// Raised by the parser on a token that does not fit the grammar.
    Syntax,
    /// Token text that the lexer accepted but could not be converted.
    Conversion,
    /// Shared or circular composite references found while serializing.
    Graph,
    /// A configured nesting limit was exceeded.
    Limit,
    /// The output sink refused a write.
    Output,
}

/// Errors that can occur during JSON serialization or deserialization.
#[derive(Error, Debug)]
pub enum JsonError {
    #[error("unexpected character '{found}' at line {line}, column {column}")]
    UnexpectedCharacter {
        found: char,
        line: usize,
        column: usize,
    },

    /// Reported at the position of the opening quote.
    #[error("unterminated string starting at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },

    #[error("unrecognized escape sequence '\\{found}' at line {line}, column {column}")]
    InvalidEscape {
        found: char,
        line: usize,
        column: usize,
    },

    #[error(
        "invalid universal character code: expected a hex digit, found {} at line {line}, column {column}",
        describe(.found)
    )]
    InvalidUnicodeEscape {
        found: Option<char>,
        line: usize,
        column: usize,
    },

    #[error("expected {expected}, found {} at line {line}, column {column}", describe(.found))]
    MalformedNumber {
        expected: &'static str,
        found: Option<char>,
        line: usize,
        column: usize,
    },

    #[error("unexpected constant '{constant}' at line {line}, column {column}")]
    UnexpectedConstant {
        constant: String,
        line: usize,
        column: usize,
    },

    #[error(
        "expected an object, an array, a string, a number, a boolean or 'null', found '{found}' at line {line}, column {column}"
    )]
    ExpectedValue {
        found: String,
        line: usize,
        column: usize,
    },

    #[error(
        "expected a token of type(s) [{}], found '{found}' at line {line}, column {column}",
        join(.expected)
    )]
    UnexpectedToken {
        expected: Vec<TokenType>,
        found: TokenType,
        line: usize,
        column: usize,
    },

    #[error("unexpected EOF in {context} at line {line}, column {column}")]
    UnexpectedEof {
        context: Composite,
        line: usize,
        column: usize,
    },

    #[error("the number '{text}' is invalid or malformed (line {line}, column {column})")]
    InvalidNumber {
        text: String,
        line: usize,
        column: usize,
    },

    #[error("the boolean value '{text}' is invalid or malformed (line {line}, column {column})")]
    InvalidBoolean {
        text: String,
        line: usize,
        column: usize,
    },

    #[error("circular reference in collection graph ({kind})")]
    CircularReference { kind: Composite },

    #[error("nesting exceeds the maximum depth of {max_depth} at line {line}, column {column}")]
    NestingTooDeep {
        max_depth: usize,
        line: usize,
        column: usize,
    },

    #[error("value nesting exceeds the maximum depth of {max_depth}")]
    SerializeTooDeep { max_depth: usize },

    #[error("failed to write to the output sink")]
    Format(#[from] fmt::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl JsonError {
    /// The category this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            JsonError::UnexpectedCharacter { .. }
            | JsonError::UnterminatedString { .. }
            | JsonError::InvalidEscape { .. }
            | JsonError::InvalidUnicodeEscape { .. }
            | JsonError::MalformedNumber { .. }
            | JsonError::UnexpectedConstant { .. } => ErrorCategory::Lexical,
            JsonError::ExpectedValue { .. }
            | JsonError::UnexpectedToken { .. }
            | JsonError::UnexpectedEof { .. } => ErrorCategory::Syntax,
            JsonError::InvalidNumber { .. } | JsonError::InvalidBoolean { .. } => {
                ErrorCategory::Conversion
            }
            JsonError::CircularReference { .. } => ErrorCategory::Graph,
            JsonError::NestingTooDeep { .. } | JsonError::SerializeTooDeep { .. } => {
                ErrorCategory::Limit
            }
            JsonError::Format(_) | JsonError::Io(_) => ErrorCategory::Output,
        }
    }

    /// The `(line, column)` the error was detected at, when it has one.
    pub fn position(&self) -> Option<(usize, usize)> {
        match *self {
            JsonError::UnexpectedCharacter { line, column, .. }
            | JsonError::UnterminatedString { line, column }
            | JsonError::InvalidEscape { line, column, .. }
            | JsonError::InvalidUnicodeEscape { line, column, .. }
            | JsonError::MalformedNumber { line, column, .. }
            | JsonError::UnexpectedConstant { line, column, .. }
            | JsonError::ExpectedValue { line, column, .. }
            | JsonError::UnexpectedToken { line, column, .. }
            | JsonError::UnexpectedEof { line, column, .. }
            | JsonError::InvalidNumber { line, column, .. }
            | JsonError::InvalidBoolean { line, column, .. }
            | JsonError::NestingTooDeep { line, column, .. } => Some((line, column)),
            JsonError::CircularReference { .. }
            | JsonError::SerializeTooDeep { .. }
            | JsonError::Format(_)
            | JsonError::Io(_) => None,
        }
    }
}

fn describe(found: &Option<char>) -> String {
    match found {
        Some(c) => format!("'{c}'"),
        None => "end of input".to_string(),
    }
}

fn join(types: &[TokenType]) -> String {
    types
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Convenience alias used throughout dynjson.
pub type Result<T> = std::result::Result<T, JsonError>;

//! Low-level JSON text writer.
//!
//! The emitter knows JSON punctuation, literal encodings and indentation, and
//! nothing about value trees; [`crate::serializer`] drives it.
//!
//! String output escapes only `\` and `"`. Control characters such as newlines
//! and tabs are written through verbatim.

use std::fmt::Write;

use crate::error::Result;

/// Spaces written per indentation level.
pub const INDENT_WIDTH: usize = 2;

/// Format a number the way the emitter writes it.
///
/// Finite values use the shortest text that parses back to the same `f64`
/// (`1500`, `21.37`, `0.1`). NaN and infinities have no JSON spelling and
/// become `null`.
pub fn format_number(n: f64) -> String {
    if n.is_finite() {
        format!("{}", n)
    } else {
        "null".to_string()
    }
}

/// Writes JSON tokens to any [`std::fmt::Write`] sink.
pub struct Emitter<W: Write = String> {
    writer: W,
    indent_level: usize,
}

impl Emitter<String> {
    pub fn new() -> Self {
        Self::with_writer(String::new())
    }
}

impl Default for Emitter<String> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Emitter<W> {
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            indent_level: 0,
        }
    }

    /// Consume the emitter and hand back the sink.
    pub fn into_inner(self) -> W {
        self.writer
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    pub fn emit_number(&mut self, n: f64) -> Result<()> {
        self.writer.write_str(&format_number(n))?;
        Ok(())
    }

    pub fn emit_string(&mut self, s: &str) -> Result<()> {
        self.writer.write_char('"')?;
        for ch in s.chars() {
            match ch {
                '\\' => self.writer.write_str("\\\\")?,
                '"' => self.writer.write_str("\\\"")?,
                _ => self.writer.write_char(ch)?,
            }
        }
        self.writer.write_char('"')?;
        Ok(())
    }

    pub fn emit_boolean(&mut self, b: bool) -> Result<()> {
        self.writer.write_str(if b { "true" } else { "false" })?;
        Ok(())
    }

    pub fn emit_null(&mut self) -> Result<()> {
        self.writer.write_str("null")?;
        Ok(())
    }

    pub fn emit_space(&mut self) -> Result<()> {
        self.writer.write_char(' ')?;
        Ok(())
    }

    pub fn emit_newline(&mut self) -> Result<()> {
        self.writer.write_char('\n')?;
        Ok(())
    }

    pub fn emit_left_brace(&mut self) -> Result<()> {
        self.writer.write_char('{')?;
        Ok(())
    }

    pub fn emit_right_brace(&mut self) -> Result<()> {
        self.writer.write_char('}')?;
        Ok(())
    }

    pub fn emit_left_bracket(&mut self) -> Result<()> {
        self.writer.write_char('[')?;
        Ok(())
    }

    pub fn emit_right_bracket(&mut self) -> Result<()> {
        self.writer.write_char(']')?;
        Ok(())
    }

    pub fn emit_comma(&mut self) -> Result<()> {
        self.writer.write_char(',')?;
        Ok(())
    }

    pub fn emit_colon(&mut self) -> Result<()> {
        self.writer.write_char(':')?;
        Ok(())
    }

    /// Write `INDENT_WIDTH` spaces per current indentation level.
    pub fn emit_indentation(&mut self) -> Result<()> {
        for _ in 0..self.indent_level * INDENT_WIDTH {
            self.writer.write_char(' ')?;
        }
        Ok(())
    }

    pub fn indent(&mut self) {
        self.indent_level += 1;
    }

    /// Drop one indentation level, never going below zero.
    pub fn unindent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// A quoted key followed by a colon.
    pub fn emit_key(&mut self, key: &str) -> Result<()> {
        self.emit_string(key)?;
        self.emit_colon()
    }
}

//! Recursive-descent JSON parser producing [`DynamicValue`] trees.
//!
//! One token of lookahead, taken from the [`Lexer`]'s current token. Each
//! production consumes its tokens and leaves the lookahead on the first token
//! after it. Objects become [`Table`]s (string keys, insertion order kept,
//! later duplicates overwrite earlier ones), arrays become [`Array`]s.
//!
//! Trailing commas are rejected: after a `,` the loop requires another member
//! and never accepts the closing bracket.

use crate::error::{Composite, JsonError, Result};
use crate::lexer::{Lexer, Token, TokenType};
use crate::limits::Limits;
use crate::value::{Array, DynamicValue, Table};

/// Parser state for one document at a time. [`Parser::parse`] reloads the
/// lexer, so a parser can be reused sequentially but never shared between
/// two documents in flight.
#[derive(Debug)]
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    limits: Limits,
    depth: usize,
}

impl Default for Parser<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Parser<'a> {
    pub fn new() -> Self {
        Self::with_limits(Limits::default())
    }

    pub fn with_limits(limits: Limits) -> Self {
        Self {
            lexer: Lexer::new(""),
            limits,
            depth: 0,
        }
    }

    /// Parse one complete JSON document. Anything other than whitespace after
    /// the value is an error.
    pub fn parse(&mut self, source: &'a str) -> Result<DynamicValue> {
        self.lexer.load(source);
        self.depth = 0;
        self.lexer.next_token()?;

        let value = self.value()?;
        self.expect(&[TokenType::Eof])?;

        Ok(value)
    }

    fn value(&mut self) -> Result<DynamicValue> {
        match self.lookahead() {
            TokenType::LBrace => self.object(),
            TokenType::LBracket => self.array(),
            TokenType::String => self.string(),
            TokenType::Number => self.number(),
            TokenType::True | TokenType::False => self.boolean(),
            TokenType::Null => self.null(),
            _ => {
                let token = self.lexer.token();
                Err(JsonError::ExpectedValue {
                    found: token.text.clone(),
                    line: token.line,
                    column: token.column,
                })
            }
        }
    }

    fn object(&mut self) -> Result<DynamicValue> {
        let open = self.expect(&[TokenType::LBrace])?;
        self.enter(&open)?;

        let table = Table::new();
        if self.lookahead() != TokenType::RBrace {
            loop {
                self.reject_eof(Composite::Table)?;

                let key = self.string()?;
                self.expect(&[TokenType::Colon])?;
                let value = self.value()?;
                table.set(key, value);

                if self.lookahead() == TokenType::RBrace {
                    break;
                }
                self.expect(&[TokenType::Comma])?;
            }
        }
        self.expect(&[TokenType::RBrace])?;

        self.depth -= 1;
        Ok(DynamicValue::Table(table))
    }

    fn array(&mut self) -> Result<DynamicValue> {
        let open = self.expect(&[TokenType::LBracket])?;
        self.enter(&open)?;

        let array = Array::new();
        if self.lookahead() != TokenType::RBracket {
            loop {
                self.reject_eof(Composite::Array)?;

                array.push(self.value()?);

                if self.lookahead() == TokenType::RBracket {
                    break;
                }
                self.expect(&[TokenType::Comma])?;
            }
        }
        self.expect(&[TokenType::RBracket])?;

        self.depth -= 1;
        Ok(DynamicValue::Array(array))
    }

    fn string(&mut self) -> Result<DynamicValue> {
        let token = self.expect(&[TokenType::String])?;
        Ok(DynamicValue::String(token.text))
    }

    /// Numbers that overflow `f64` are rejected rather than becoming infinity,
    /// which has no JSON spelling to write back.
    fn number(&mut self) -> Result<DynamicValue> {
        let token = self.expect(&[TokenType::Number])?;
        match token.text.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(DynamicValue::Number(n)),
            _ => Err(JsonError::InvalidNumber {
                text: token.text,
                line: token.line,
                column: token.column,
            }),
        }
    }

    fn boolean(&mut self) -> Result<DynamicValue> {
        let token = self.expect(&[TokenType::True, TokenType::False])?;
        match token.text.as_str() {
            "true" => Ok(DynamicValue::Boolean(true)),
            "false" => Ok(DynamicValue::Boolean(false)),
            _ => Err(JsonError::InvalidBoolean {
                text: token.text,
                line: token.line,
                column: token.column,
            }),
        }
    }

    fn null(&mut self) -> Result<DynamicValue> {
        self.expect(&[TokenType::Null])?;
        Ok(DynamicValue::Nil)
    }

    /// Check the lookahead against `allowed`, return it and advance.
    fn expect(&mut self, allowed: &[TokenType]) -> Result<Token> {
        let current = self.lexer.token();
        if !allowed.contains(&current.token_type) {
            return Err(JsonError::UnexpectedToken {
                expected: allowed.to_vec(),
                found: current.token_type,
                line: current.line,
                column: current.column,
            });
        }

        let token = current.clone();
        self.lexer.next_token()?;
        Ok(token)
    }

    fn lookahead(&self) -> TokenType {
        self.lexer.token().token_type
    }

    fn reject_eof(&self, context: Composite) -> Result<()> {
        let token = self.lexer.token();
        if token.token_type == TokenType::Eof {
            return Err(JsonError::UnexpectedEof {
                context,
                line: token.line,
                column: token.column,
            });
        }
        Ok(())
    }

    fn enter(&mut self, open: &Token) -> Result<()> {
        if !self.limits.allows(self.depth) {
            return Err(JsonError::NestingTooDeep {
                max_depth: self.limits.max_depth.unwrap_or(self.depth),
                line: open.line,
                column: open.column,
            });
        }
        self.depth += 1;
        Ok(())
    }
}

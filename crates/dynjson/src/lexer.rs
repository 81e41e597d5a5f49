//! JSON lexer with line/column tracking.
//!
//! [`Lexer::next_token`] skips whitespace, recognizes one token, stamps it with
//! the position of its first character and keeps it as the current token.
//! All lexer state lives in the `Lexer` value, so each document gets its own
//! instance (or an explicit [`Lexer::load`]).
//!
//! Grammar notes:
//!
//! - Numbers: optional `-`, then `0` or a `1-9` digit run, optional `.digits`,
//!   optional `e`/`E` with optional sign and digits. `01` is rejected here
//!   rather than in the parser. The raw text is kept; conversion happens in
//!   the parser.
//! - Strings: `\" \\ \/ \b \f \n \r \t \uXXXX`. UTF-16 surrogate pairs written
//!   as two `\u` escapes combine; a lone surrogate decodes to U+FFFD.
//! - Constants: a run of letters that must spell `true`, `false` or `null`.
//! - Whitespace: space, tab, `\n`, `\r`.

use std::fmt;

use crate::error::{JsonError, Result};

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
    True,
    False,
    Null,
    String,
    Number,
    Eof,
}

impl TokenType {
    /// Fixed text of punctuation, constant and EOF tokens.
    pub fn canonical_text(self) -> Option<&'static str> {
        match self {
            TokenType::LBrace => Some("{"),
            TokenType::RBrace => Some("}"),
            TokenType::LBracket => Some("["),
            TokenType::RBracket => Some("]"),
            TokenType::Colon => Some(":"),
            TokenType::Comma => Some(","),
            TokenType::True => Some("true"),
            TokenType::False => Some("false"),
            TokenType::Null => Some("null"),
            TokenType::Eof => Some("<EOF>"),
            TokenType::String | TokenType::Number => None,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenType::LBrace => "LBrace",
            TokenType::RBrace => "RBrace",
            TokenType::LBracket => "LBracket",
            TokenType::RBracket => "RBracket",
            TokenType::Colon => "Colon",
            TokenType::Comma => "Comma",
            TokenType::True => "True",
            TokenType::False => "False",
            TokenType::Null => "Null",
            TokenType::String => "String",
            TokenType::Number => "Number",
            TokenType::Eof => "EOF",
        };
        f.write_str(name)
    }
}

/// A lexical unit and the position of its first character.
///
/// For strings, `text` is the decoded content without quotes; for numbers it
/// is the raw source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub line: usize,
    pub column: usize,
    pub text: String,
    pub token_type: TokenType,
}

impl Token {
    pub fn new(line: usize, column: usize, text: impl Into<String>, token_type: TokenType) -> Self {
        Self {
            line,
            column,
            text: text.into(),
            token_type,
        }
    }

    /// The canonical token of a fixed-text type, at the placeholder position
    /// `(0, 0)`. Returns `None` for `String` and `Number`.
    pub fn sentinel(token_type: TokenType) -> Option<Self> {
        token_type
            .canonical_text()
            .map(|text| Self::new(0, 0, text, token_type))
    }

    /// Copy of this token stamped with a real position.
    pub fn at(&self, line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            ..self.clone()
        }
    }

    fn fixed(token_type: TokenType, line: usize, column: usize) -> Self {
        Self::new(
            line,
            column,
            token_type.canonical_text().unwrap_or_default(),
            token_type,
        )
    }
}

/// Tokenizer over an in-memory document.
#[derive(Debug)]
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
    line: usize,
    column: usize,
    token: Token,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            line: 1,
            column: 1,
            token: Token::fixed(TokenType::Eof, 0, 0),
            finished: false,
        }
    }

    /// Reset to the start of `input`, line 1, column 1.
    pub fn load(&mut self, input: &'a str) {
        *self = Self::new(input);
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// The most recently recognized token (EOF at the placeholder position
    /// before the first call to `next_token`).
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Scan the next token, store it as current and return it.
    pub fn next_token(&mut self) -> Result<&Token> {
        self.skip_whitespace();

        let (line, column) = (self.line, self.column);
        let token = match self.peek() {
            None => Token::fixed(TokenType::Eof, line, column),
            Some(ch) => match ch {
                '{' => self.punctuation(TokenType::LBrace),
                '}' => self.punctuation(TokenType::RBrace),
                '[' => self.punctuation(TokenType::LBracket),
                ']' => self.punctuation(TokenType::RBracket),
                ',' => self.punctuation(TokenType::Comma),
                ':' => self.punctuation(TokenType::Colon),
                '-' | '0'..='9' => self.read_number()?,
                '"' => self.read_string()?,
                c if c.is_alphabetic() => self.read_constant()?,
                found => {
                    return Err(JsonError::UnexpectedCharacter {
                        found,
                        line,
                        column,
                    })
                }
            },
        };

        self.token = token;
        Ok(&self.token)
    }

    fn punctuation(&mut self, token_type: TokenType) -> Token {
        let token = Token::fixed(token_type, self.line, self.column);
        self.advance();
        token
    }

    fn read_number(&mut self) -> Result<Token> {
        let (line, column) = (self.line, self.column);
        let start = self.position;

        if self.peek() == Some('-') {
            self.advance();
        }

        match self.peek() {
            Some('0') => {
                self.advance();
                if matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                    return Err(self.malformed_number(
                        "'.', 'e' or the end of the number after a leading zero",
                    ));
                }
            }
            Some(c) if c.is_ascii_digit() => self.skip_digits(),
            _ => return Err(self.malformed_number("a digit [0-9]")),
        }

        if self.peek() == Some('.') {
            self.advance();
            if !matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                return Err(self.malformed_number("a digit [0-9]"));
            }
            self.skip_digits();
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            if !matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                return Err(self.malformed_number("'+', '-', or a digit [0-9]"));
            }
            self.skip_digits();
        }

        let text = &self.input[start..self.position];
        Ok(Token::new(line, column, text, TokenType::Number))
    }

    fn skip_digits(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn malformed_number(&self, expected: &'static str) -> JsonError {
        JsonError::MalformedNumber {
            expected,
            found: self.peek(),
            line: self.line,
            column: self.column,
        }
    }

    fn read_string(&mut self) -> Result<Token> {
        let (line, column) = (self.line, self.column);
        let unterminated = JsonError::UnterminatedString { line, column };

        // opening quote
        self.advance();

        let mut text = String::new();
        loop {
            match self.peek() {
                None => return Err(unterminated),
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    let escaped = match self.peek() {
                        None => return Err(unterminated),
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('/') => '/',
                        Some('b') => '\u{8}',
                        Some('f') => '\u{c}',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('u') => {
                            self.advance();
                            text.push(self.read_unicode_escape()?);
                            continue;
                        }
                        Some(found) => {
                            return Err(JsonError::InvalidEscape {
                                found,
                                line: self.line,
                                column: self.column,
                            })
                        }
                    };
                    text.push(escaped);
                    self.advance();
                }
                Some(ch) => {
                    text.push(ch);
                    self.advance();
                }
            }
        }

        Ok(Token::new(line, column, text, TokenType::String))
    }

    /// Decode the four hex digits after `\u`, pairing a high surrogate with an
    /// immediately following `\u` low surrogate.
    fn read_unicode_escape(&mut self) -> Result<char> {
        let unit = self.read_hex4()?;

        if (0xD800..=0xDBFF).contains(&unit) {
            if let Some(low) = self.peek_low_surrogate() {
                for _ in 0..6 {
                    self.advance();
                }
                let scalar =
                    0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                return Ok(char::from_u32(scalar).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
        }

        Ok(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn read_hex4(&mut self) -> Result<u16> {
        let mut unit: u16 = 0;
        for _ in 0..4 {
            let digit = self
                .peek()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| JsonError::InvalidUnicodeEscape {
                    found: self.peek(),
                    line: self.line,
                    column: self.column,
                })?;
            unit = (unit << 4) | digit as u16;
            self.advance();
        }
        Ok(unit)
    }

    fn peek_low_surrogate(&self) -> Option<u16> {
        let rest = self.input[self.position..].strip_prefix("\\u")?;
        let hex = rest.get(..4)?;
        let unit = u16::from_str_radix(hex, 16).ok()?;
        (0xDC00..=0xDFFF).contains(&unit).then_some(unit)
    }

    fn read_constant(&mut self) -> Result<Token> {
        let (line, column) = (self.line, self.column);
        let start = self.position;

        while matches!(self.peek(), Some(c) if c.is_alphabetic()) {
            self.advance();
        }

        let constant = &self.input[start..self.position];
        let token_type = match constant {
            "true" => TokenType::True,
            "false" => TokenType::False,
            "null" => TokenType::Null,
            _ => {
                return Err(JsonError::UnexpectedConstant {
                    constant: constant.to_string(),
                    line,
                    column,
                })
            }
        };
        Ok(Token::fixed(token_type, line, column))
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\n' | '\r')) {
            self.advance();
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek() {
            self.position += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }
}

/// Yields tokens up to and including `Eof`, or up to the first error.
impl Iterator for Lexer<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(token) => {
                let token = token.clone();
                if token.token_type == TokenType::Eof {
                    self.finished = true;
                }
                Some(Ok(token))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

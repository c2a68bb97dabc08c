//! Reader for the compressed JavaScript object literals emitted by Sphinx.
//!
//! `searchindex.js` payloads are not JSON: the generator writes bare
//! identifier keys wherever that is legal JavaScript (`docnames:`,
//! `envversion:`) and only quotes keys that need it (`"default":`,
//! `"biovida.images":`). Strings are double-quoted with `\uXXXX` escapes.
//! This module parses that dialect into a `serde_json::Value`; plain JSON
//! is accepted as a subset.

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Parse failure with the byte offset where it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JsDumpError {
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEof(usize),
    #[error("unexpected character {found:?} at byte {offset}")]
    UnexpectedChar { found: char, offset: usize },
    #[error("invalid escape sequence at byte {0}")]
    InvalidEscape(usize),
    #[error("invalid number at byte {0}")]
    InvalidNumber(usize),
    #[error("duplicate key {key:?} at byte {offset}")]
    DuplicateKey { key: String, offset: usize },
    #[error("trailing data at byte {0}")]
    TrailingData(usize),
}

/// Parse a single value. The whole input must be consumed.
pub fn parse(src: &str) -> Result<Value, JsDumpError> {
    let mut reader = Reader { src, pos: 0 };
    reader.skip_ws();
    let value = reader.parse_value()?;
    reader.skip_ws();
    if reader.pos < reader.src.len() {
        return Err(JsDumpError::TrailingData(reader.pos));
    }
    Ok(value)
}

struct Reader<'a> {
    src: &'a str,
    pos: usize,
}

impl Reader<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\n' | '\r')) {
            self.pos += 1;
        }
    }

    fn expect_char(&mut self, expected: char) -> Result<(), JsDumpError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(c) => Err(JsDumpError::UnexpectedChar {
                found: c,
                offset: self.pos,
            }),
            None => Err(JsDumpError::UnexpectedEof(self.pos)),
        }
    }

    fn parse_value(&mut self) -> Result<Value, JsDumpError> {
        match self.peek() {
            Some('{') => self.parse_object(),
            Some('[') => self.parse_array(),
            Some('"') => Ok(Value::String(self.parse_string()?)),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(c) if is_ident_start(c) => self.parse_word(),
            Some(c) => Err(JsDumpError::UnexpectedChar {
                found: c,
                offset: self.pos,
            }),
            None => Err(JsDumpError::UnexpectedEof(self.pos)),
        }
    }

    fn parse_object(&mut self) -> Result<Value, JsDumpError> {
        self.expect_char('{')?;
        let mut map = Map::new();
        self.skip_ws();
        if self.peek() == Some('}') {
            self.pos += 1;
            return Ok(Value::Object(map));
        }
        loop {
            self.skip_ws();
            let key_offset = self.pos;
            let key = self.parse_key()?;
            self.skip_ws();
            self.expect_char(':')?;
            self.skip_ws();
            let value = self.parse_value()?;
            if map.insert(key.clone(), value).is_some() {
                return Err(JsDumpError::DuplicateKey {
                    key,
                    offset: key_offset,
                });
            }
            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some('}') => return Ok(Value::Object(map)),
                Some(c) => {
                    return Err(JsDumpError::UnexpectedChar {
                        found: c,
                        offset: self.pos - c.len_utf8(),
                    });
                }
                None => return Err(JsDumpError::UnexpectedEof(self.pos)),
            }
        }
    }

    /// Object keys may be quoted strings or bare JavaScript identifiers.
    fn parse_key(&mut self) -> Result<String, JsDumpError> {
        match self.peek() {
            Some('"') => self.parse_string(),
            Some(c) if is_ident_start(c) => Ok(self.parse_ident()),
            Some(c) => Err(JsDumpError::UnexpectedChar {
                found: c,
                offset: self.pos,
            }),
            None => Err(JsDumpError::UnexpectedEof(self.pos)),
        }
    }

    fn parse_array(&mut self) -> Result<Value, JsDumpError> {
        self.expect_char('[')?;
        let mut items = Vec::new();
        self.skip_ws();
        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(Value::Array(items));
        }
        loop {
            self.skip_ws();
            items.push(self.parse_value()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some(']') => return Ok(Value::Array(items)),
                Some(c) => {
                    return Err(JsDumpError::UnexpectedChar {
                        found: c,
                        offset: self.pos - c.len_utf8(),
                    });
                }
                None => return Err(JsDumpError::UnexpectedEof(self.pos)),
            }
        }
    }

    fn parse_string(&mut self) -> Result<String, JsDumpError> {
        self.expect_char('"')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(out),
                Some('\\') => out.push(self.parse_escape()?),
                Some(c) => out.push(c),
                None => return Err(JsDumpError::UnexpectedEof(self.pos)),
            }
        }
    }

    fn parse_escape(&mut self) -> Result<char, JsDumpError> {
        let offset = self.pos - 1;
        match self.bump() {
            Some('"') => Ok('"'),
            Some('\\') => Ok('\\'),
            Some('/') => Ok('/'),
            Some('b') => Ok('\u{0008}'),
            Some('f') => Ok('\u{000c}'),
            Some('n') => Ok('\n'),
            Some('r') => Ok('\r'),
            Some('t') => Ok('\t'),
            Some('u') => {
                let unit = self.parse_hex4(offset)?;
                // Combine UTF-16 surrogate pairs.
                if (0xD800..=0xDBFF).contains(&unit) {
                    if self.bump() != Some('\\') || self.bump() != Some('u') {
                        return Err(JsDumpError::InvalidEscape(offset));
                    }
                    let low = self.parse_hex4(offset)?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(JsDumpError::InvalidEscape(offset));
                    }
                    let code = 0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00);
                    char::from_u32(code).ok_or(JsDumpError::InvalidEscape(offset))
                } else {
                    char::from_u32(unit).ok_or(JsDumpError::InvalidEscape(offset))
                }
            }
            Some(_) => Err(JsDumpError::InvalidEscape(offset)),
            None => Err(JsDumpError::UnexpectedEof(self.pos)),
        }
    }

    fn parse_hex4(&mut self, offset: usize) -> Result<u32, JsDumpError> {
        let mut value = 0u32;
        for _ in 0..4 {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or(JsDumpError::InvalidEscape(offset))?;
            value = value * 16 + digit;
        }
        Ok(value)
    }

    fn parse_number(&mut self) -> Result<Value, JsDumpError> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'))
        {
            self.pos += 1;
        }
        let text = &self.src[start..self.pos];
        if let Ok(int) = text.parse::<i64>() {
            return Ok(Value::Number(Number::from(int)));
        }
        text.parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or(JsDumpError::InvalidNumber(start))
    }

    fn parse_ident(&mut self) -> String {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if is_ident_continue(c)) {
            self.pos += 1;
        }
        self.src[start..self.pos].to_string()
    }

    /// Bare words in value position: only the JSON literals are accepted.
    fn parse_word(&mut self) -> Result<Value, JsDumpError> {
        let start = self.pos;
        let word = self.parse_ident();
        match word.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            "null" => Ok(Value::Null),
            _ => Err(JsDumpError::UnexpectedChar {
                found: self.src[start..].chars().next().unwrap_or('\0'),
                offset: start,
            }),
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

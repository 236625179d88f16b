/*
** This file is a part of Chunkxml (incremental XML reader/writer)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Chunkxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::fmt::Write;

use crate::Arena;
use crate::Span;

use super::error::DocumentError;
use super::error::description;

const VALUE_BUFFER_SIZE: usize = 64;

/// Text or number to store in an element or attribute.
///
/// Numbers are formatted on the stack before being copied into the
/// arena. Floats are written with six fractional digits.
///
/// ```
/// use chunkxml::Value;
///
/// assert_eq!(Value::from(42), Value::Int(42));
/// assert_eq!(Value::from("on"), Value::Text("on"));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value<'a> {
    Text(&'a str),
    Int(i64),
    Float(f64),
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(s: &'a str) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value<'_> {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value<'_> {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value<'_> {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<f32> for Value<'_> {
    fn from(x: f32) -> Self {
        Value::Float(x.into())
    }
}

struct FixedBuf {
    bytes: [u8; VALUE_BUFFER_SIZE],
    len: usize,
}

impl FixedBuf {
    fn new() -> FixedBuf {
        FixedBuf {
            bytes: [0; VALUE_BUFFER_SIZE],
            len: 0,
        }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl Write for FixedBuf {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        let end = self.len + s.len();
        if end > VALUE_BUFFER_SIZE {
            return Err(std::fmt::Error);
        }
        self.bytes[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

impl Value<'_> {
    /// Copies the textual form of the value into the arena.
    pub(super) fn push_into(&self, arena: &mut Arena) -> Result<Span, DocumentError> {
        let mut buf = FixedBuf::new();
        let written = match self {
            Value::Text(s) => return Ok(arena.push_str(s.as_bytes())?),
            Value::Int(n) => write!(buf, "{}", n),
            Value::Float(x) => write!(buf, "{:.6}", x),
        };
        if written.is_err() {
            return Err(DocumentError::Fault(description::VALUE_TOO_WIDE));
        }

        Ok(arena.push_str(buf.as_bytes())?)
    }
}

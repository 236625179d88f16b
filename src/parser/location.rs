/*
** This file is a part of Chunkxml (incremental XML reader/writer)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Chunkxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::fmt::Display;

use memchr::memchr_iter;
use memchr::memrchr;

/// A position in the parser input byte stream.
///
/// This struct is returned from the
/// [location()](crate::Tokenizer::location) method and gives you
/// the position after the last consumed delimiter or chunk.
///
/// Line breaks are skipped by the tokenizer but still counted here,
/// so the position refers to the raw input.
///
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Location {
    /// Byte position in the input stream.
    pub bytes: usize,
    /// How many lines have been parsed. Lines are separated by the newline character.
    pub lines: usize,
    /// How many bytes after the last newline character.
    pub column: usize,
}

impl Location {
    /// Creates a new location at the beginning of the input stream.
    pub fn new() -> Self {
        Location {
            bytes: 0,
            lines: 0,
            column: 0,
        }
    }

    pub(super) fn advance(&mut self, input: &[u8]) {
        self.bytes += input.len();
        match memrchr(b'\n', input) {
            Some(last) => {
                self.lines += memchr_iter(b'\n', input).count();
                self.column = input.len() - last - 1;
            }
            None => self.column += input.len(),
        }
    }
}

impl Default for Location {
    fn default() -> Self {
        Location::new()
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "byte: {}, line: {}, column: {}",
            self.bytes, self.lines, self.column
        )
    }
}

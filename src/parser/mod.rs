/*
** This file is a part of Chunkxml (incremental XML reader/writer)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Chunkxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

macro_rules! whitespace {
    () => {
        b' ' | b'\t' | b'\r' | b'\n' | 0x0b | 0x0c
    };
}

macro_rules! xml_error {
    ($a:ident) => {
        return Err(ParseError::Syntax(description::$a))
    };
}

mod error;
mod location;
pub(crate) mod tag;
mod token;

use memchr::memchr2;
use tracing::trace;

use crate::Arena;
use crate::Span;
pub(crate) use error::description;
pub use error::ParseError;
pub use location::Location;
pub use token::TokenKind;
pub use token::classify;

/// Receiver of the complete tokens.
///
/// The token bytes live in the arena, and the handler gets mutable
/// access to the same arena so that it can build structures around
/// the token without copying it.
pub trait TokenHandler {
    fn handle_token(
        &mut self,
        arena: &mut Arena,
        kind: TokenKind,
        token: Span,
    ) -> Result<(), ParseError>;
}

/// Incremental XML tokenizer.
///
/// This struct splits the incoming bytes into tokens, classifies each
/// one with [classify()], and passes them to a [TokenHandler]. Input
/// can be given in chunks of any size, tags split between the chunks
/// are reassembled inside the arena. Feeding a document in pieces
/// gives exactly the same tokens as feeding it at once.
///
/// Carriage return and newline bytes are dropped from the input.
///
/// # Examples
///
/// ```
/// use chunkxml::{Arena, ParseError, Span, TokenHandler, TokenKind, Tokenizer};
///
/// // Example handler which just prints the tokens
/// struct Printer {}
/// impl TokenHandler for Printer {
///     fn handle_token(
///         &mut self,
///         arena: &mut Arena,
///         kind: TokenKind,
///         token: Span,
///     ) -> Result<(), ParseError> {
///         println!("{:?}: {}", kind, arena.str(token));
///         Ok(())
///     }
/// }
///
/// let mut arena = Arena::with_capacity(256).unwrap();
/// let mut tokenizer = Tokenizer::new();
/// tokenizer.parse_bytes(&mut arena, &mut Printer {}, b"<doc>exam").unwrap();
/// tokenizer.parse_bytes(&mut arena, &mut Printer {}, b"ple</doc>").unwrap();
/// assert_eq!(tokenizer.location().bytes, 18);
/// ```
pub struct Tokenizer {
    token: Span,
    location: Location,
}

impl Tokenizer {
    pub fn new() -> Tokenizer {
        Tokenizer {
            token: Span::EMPTY,
            location: Location::new(),
        }
    }

    /// Resets the tokenizer into a clean state.
    ///
    /// Any pending partial token is forgotten.
    pub fn reset(&mut self) {
        self.token = Span::EMPTY;
        self.location = Location::new();
    }

    /// Position after the last consumed input.
    pub fn location(&self) -> Location {
        self.location
    }

    /// The partial token waiting for more input.
    pub fn pending(&self) -> Span {
        self.token
    }

    fn push_run(&mut self, arena: &mut Arena, run: &[u8]) -> Result<(), ParseError> {
        let mut rest = run;
        while let Some(i) = memchr2(b'\r', b'\n', rest) {
            self.token = arena.extend_str(self.token, &rest[..i])?;
            rest = &rest[i + 1..];
        }
        self.token = arena.extend_str(self.token, rest)?;
        Ok(())
    }

    fn dispatch(
        &mut self,
        arena: &mut Arena,
        handler: &mut impl TokenHandler,
    ) -> Result<(), ParseError> {
        let token = self.token;
        self.token = Span::EMPTY;

        let bytes = arena.bytes(token);
        if std::str::from_utf8(bytes).is_err() {
            xml_error!(INVALID_UTF8);
        }
        let kind = classify(bytes);
        trace!(?kind, len = token.len(), "token");

        handler.handle_token(arena, kind, token)
    }

    /// Parses given XML bytes.
    pub fn parse_bytes(
        &mut self,
        arena: &mut Arena,
        handler: &mut impl TokenHandler,
        bytes: &[u8],
    ) -> Result<(), ParseError> {
        let mut pos: usize = 0;

        while pos < bytes.len() {
            let rest = &bytes[pos..];
            let Some(offset) = memchr2(b'<', b'>', rest) else {
                self.location.advance(rest);
                self.push_run(arena, rest)?;
                break;
            };
            self.location.advance(&rest[..=offset]);
            self.push_run(arena, &rest[..offset])?;

            if rest[offset] == b'<' {
                if !self.token.is_empty() {
                    self.dispatch(arena, handler)?;
                }
                self.token = arena.push_byte(self.token, b'<')?;
            } else {
                self.token = arena.push_byte(self.token, b'>')?;
                self.dispatch(arena, handler)?;
            }
            pos += offset + 1;
        }

        Ok(())
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;

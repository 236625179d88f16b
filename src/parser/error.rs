/*
** This file is a part of Chunkxml (incremental XML reader/writer)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Chunkxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use crate::NoMemory;

/// Type of the error which happened during tokenizing.
///
/// These categories are designed to be as few as possible and correspond to the distinct
/// actions the caller might take based on the problem.
///
/// Location of the error is available via the [location()](super::Tokenizer::location)
/// method of the tokenizer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The arena has no room for the pending token or the structures built from it.
    ///
    /// The arena never grows, so the document should be parsed again with a larger capacity.
    NoMemory,

    /// A syntax error is encountered in the XML input.
    ///
    /// Typical action is telling the description to the user so they can fix the document.
    Syntax(&'static str),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::NoMemory => write!(f, "not enough memory"),
            ParseError::Syntax(msg) => write!(f, "invalid xml syntax: {}", msg),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<NoMemory> for ParseError {
    fn from(_: NoMemory) -> Self {
        ParseError::NoMemory
    }
}

pub(crate) mod description {
    pub(crate) const INVALID_UTF8: &str = "invalid UTF-8 sequence";
    pub(crate) const ATTRIBUTE_WITHOUT_NAME: &str = "attribute value without a name";
}

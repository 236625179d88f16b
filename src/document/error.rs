/*
** This file is a part of Chunkxml (incremental XML reader/writer)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Chunkxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::error::Error;
use std::fmt::Display;

use crate::NoMemory;
use crate::ParseError;

/// Type of the error returned from the [Document](super::Document) methods.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum DocumentError {
    /// The arena or one of the fixed structures is full.
    ///
    /// The document keeps rejecting changes after this error until it is
    /// [reset](super::Document::reset). Parsing again with a larger
    /// [capacity](super::DocumentOptions::capacity) is the usual remedy.
    NoMemory,

    /// The XML input is malformed.
    Syntax(&'static str),

    /// An invalid argument is given, like an empty name or a stale element id.
    Fault(&'static str),
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::NoMemory => write!(f, "not enough memory"),
            DocumentError::Syntax(msg) => write!(f, "invalid xml syntax: {}", msg),
            DocumentError::Fault(msg) => write!(f, "invalid argument: {}", msg),
        }
    }
}

impl Error for DocumentError {}

impl From<ParseError> for DocumentError {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::NoMemory => DocumentError::NoMemory,
            ParseError::Syntax(msg) => DocumentError::Syntax(msg),
        }
    }
}

impl From<NoMemory> for DocumentError {
    fn from(_: NoMemory) -> Self {
        DocumentError::NoMemory
    }
}

pub(super) mod description {
    pub(in super::super) const TAG_MISMATCH: &str = "start and end tags have different names";
    pub(in super::super) const CLOSE_WITHOUT_OPEN: &str = "end tag without a start tag";
    pub(in super::super) const EMPTY_CLOSE_NAME: &str = "end tag closes an element without a name";
    pub(in super::super) const TEXT_OUTSIDE_ROOT: &str = "text outside of any element";
    pub(in super::super) const DUPLICATE_HEADER: &str = "document already has a header";
    pub(in super::super) const UNKNOWN_TOKEN: &str = "unrecognized markup";
    pub(in super::super) const NESTING_TOO_DEEP: &str = "elements are nested too deeply";
    pub(in super::super) const EMPTY_NAME: &str = "name cannot be empty";
    pub(in super::super) const EMPTY_ATTRIBUTE: &str = "attribute name and value cannot be empty";
    pub(in super::super) const STALE_ELEMENT: &str = "element does not belong to this document";
    pub(in super::super) const VALUE_TOO_WIDE: &str = "formatted value does not fit";
}

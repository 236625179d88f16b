/*
** This file is a part of Chunkxml (incremental XML reader/writer)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Chunkxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

//! Incremental XML reader and writer working inside a fixed size arena.
//!
//! Input is fed in chunks of any size, and an element tree is built
//! in a single buffer which is reserved once. The tree can be queried,
//! extended, and serialized back into the same buffer.

mod arena;
mod document;
mod parser;

pub use arena::Arena;
pub use arena::ArenaStats;
pub use arena::MAX_CAPACITY;
pub use arena::NoMemory;
pub use arena::Span;

pub use parser::Location;
pub use parser::ParseError;
pub use parser::TokenHandler;
pub use parser::TokenKind;
pub use parser::Tokenizer;
pub use parser::classify;

pub use document::Attributes;
pub use document::Children;
pub use document::DEFAULT_CAPACITY;
pub use document::DEFAULT_MAX_DEPTH;
pub use document::DescendantOrSelf;
pub use document::Document;
pub use document::DocumentError;
pub use document::DocumentOptions;
pub use document::Element;
pub use document::ElementId;
pub use document::Value;

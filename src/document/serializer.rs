/*
** This file is a part of Chunkxml (incremental XML reader/writer)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Chunkxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use std::fmt::Formatter;

use crate::Arena;
use crate::NoMemory;
use crate::Span;

use super::tree::ArenaExt;
use super::tree::Field;
use super::tree::Link;
use super::tree::NIL;
use super::tree::Step;
use super::tree::Tree;
use super::tree::Visitor;

pub(super) const DEFAULT_HEADER: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// Output target of the serializer.
///
/// Strings from the document are given as spans, so a sink writing into
/// the same arena can copy them without holding a borrow.
pub(super) trait Sink {
    type Error;

    fn arena(&self) -> &Arena;
    fn put_str(&mut self, s: &'static str) -> Result<(), Self::Error>;
    fn put_span(&mut self, span: Span) -> Result<(), Self::Error>;
}

/// Appends the output to the end of the arena.
pub(super) struct ArenaSink<'a> {
    arena: &'a mut Arena,
    output: Span,
}

impl<'a> ArenaSink<'a> {
    pub(super) fn new(arena: &'a mut Arena) -> ArenaSink<'a> {
        ArenaSink {
            arena,
            output: Span::EMPTY,
        }
    }

    pub(super) fn output(&self) -> Span {
        self.output
    }
}

impl Sink for ArenaSink<'_> {
    type Error = NoMemory;

    fn arena(&self) -> &Arena {
        &*self.arena
    }

    fn put_str(&mut self, s: &'static str) -> Result<(), NoMemory> {
        self.output = self.arena.extend_str(self.output, s.as_bytes())?;
        Ok(())
    }

    fn put_span(&mut self, span: Span) -> Result<(), NoMemory> {
        self.output = self.arena.extend_within(self.output, span)?;
        Ok(())
    }
}

/// Writes the output into a formatter for the `Display` implementations.
pub(super) struct FmtSink<'a, 'b> {
    arena: &'a Arena,
    f: &'a mut Formatter<'b>,
}

impl<'a, 'b> FmtSink<'a, 'b> {
    pub(super) fn new(arena: &'a Arena, f: &'a mut Formatter<'b>) -> FmtSink<'a, 'b> {
        FmtSink { arena, f }
    }
}

impl Sink for FmtSink<'_, '_> {
    type Error = std::fmt::Error;

    fn arena(&self) -> &Arena {
        self.arena
    }

    fn put_str(&mut self, s: &'static str) -> std::fmt::Result {
        self.f.write_str(s)
    }

    fn put_span(&mut self, span: Span) -> std::fmt::Result {
        self.f.write_str(self.arena.str(span))
    }
}

fn write_pairs<S: Sink>(sink: &mut S, first: u32) -> Result<(), S::Error> {
    let mut attr = first;
    while attr != NIL {
        let name = sink.arena().attribute_name(attr);
        let value = sink.arena().attribute_value(attr);
        sink.put_str(" ")?;
        sink.put_span(name)?;
        sink.put_str("=\"")?;
        sink.put_span(value)?;
        sink.put_str("\"")?;
        attr = sink.arena().attribute_next(attr);
    }
    Ok(())
}

fn write_name<S: Sink>(sink: &mut S, node: u32) -> Result<(), S::Error> {
    let namespace = sink.arena().field(node, Field::Namespace);
    let name = sink.arena().field(node, Field::Name);
    if !namespace.is_empty() {
        sink.put_span(namespace)?;
        sink.put_str(":")?;
    }
    sink.put_span(name)
}

fn write_end_tag<S: Sink>(sink: &mut S, node: u32) -> Result<(), S::Error> {
    sink.put_str("</")?;
    write_name(sink, node)?;
    sink.put_str(">")
}

/// Writes an element and its descendants, and its following siblings
/// too if `siblings` is set.
pub(super) fn write_elements<S: Sink>(sink: &mut S, start: u32, siblings: bool) -> Result<(), S::Error> {
    let mut visitor = Visitor::new(start, siblings);
    while let Some(step) = visitor.next(sink.arena()) {
        match step {
            Step::Start(node) => {
                sink.put_str("<")?;
                write_name(sink, node)?;
                let attributes = sink.arena().link(node, Link::FirstAttribute);
                write_pairs(sink, attributes)?;
                sink.put_str(">")?;
                let text = sink.arena().field(node, Field::Text);
                if !text.is_empty() {
                    sink.put_span(text)?;
                }
                if sink.arena().link(node, Link::FirstChild) == NIL {
                    write_end_tag(sink, node)?;
                }
            }
            Step::End(node) => write_end_tag(sink, node)?,
        }
    }
    Ok(())
}

/// Writes the header followed by all top level elements.
pub(super) fn write_document<S: Sink>(sink: &mut S, tree: &Tree) -> Result<(), S::Error> {
    if tree.has_header {
        sink.put_str("<?xml")?;
        write_pairs(sink, tree.header)?;
        sink.put_str("?>")?;
    } else {
        sink.put_str(DEFAULT_HEADER)?;
    }
    write_elements(sink, tree.root, true)
}

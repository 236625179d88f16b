/*
** This file is a part of Chunkxml (incremental XML reader/writer)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Chunkxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use crate::Arena;

use super::Document;
use super::Element;
use super::tree::ArenaExt;
use super::tree::Link;
use super::tree::NIL;
use super::tree::Step;
use super::tree::Visitor;

/// Iterator over name and value pairs, in insertion order.
///
/// Returned for both element attributes and the header pairs.
pub struct Attributes<'a> {
    arena: &'a Arena,
    current: u32,
}

impl<'a> Attributes<'a> {
    pub(super) fn new(arena: &'a Arena, first: u32) -> Self {
        Attributes {
            arena,
            current: first,
        }
    }
}

impl<'a> Iterator for Attributes<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == NIL {
            return None;
        }
        let name = self.arena.str(self.arena.attribute_name(self.current));
        let value = self.arena.str(self.arena.attribute_value(self.current));
        self.current = self.arena.attribute_next(self.current);
        Some((name, value))
    }
}

/// Iterator over an element and its following siblings.
pub struct Children<'a> {
    doc: &'a Document,
    current: u32,
}

impl<'a> Children<'a> {
    pub(super) fn new(doc: &'a Document, first: u32) -> Self {
        Children {
            doc,
            current: first,
        }
    }
}

impl<'a> Iterator for Children<'a> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current == NIL {
            return None;
        }
        let result = Element::new(self.doc, self.current);
        self.current = self.doc.arena.link(self.current, Link::NextSibling);
        Some(result)
    }
}

/// Pre-order iterator over a subtree.
pub struct DescendantOrSelf<'a> {
    doc: &'a Document,
    visitor: Visitor,
}

impl<'a> DescendantOrSelf<'a> {
    pub(super) fn new(doc: &'a Document, start: u32, siblings: bool) -> Self {
        DescendantOrSelf {
            doc,
            visitor: Visitor::new(start, siblings),
        }
    }
}

impl<'a> Iterator for DescendantOrSelf<'a> {
    type Item = Element<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.visitor.next(&self.doc.arena)? {
                Step::Start(node) => return Some(Element::new(self.doc, node)),
                Step::End(_) => continue,
            }
        }
    }
}

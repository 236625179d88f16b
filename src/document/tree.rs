/*
** This file is a part of Chunkxml (incremental XML reader/writer)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Chunkxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

//! Element and attribute records stored inside the arena.
//!
//! Records are fixed size byte blocks with little endian `u32` fields.
//! Links between records are arena offsets, [NIL] marks a missing link.
//!
//! Element record layout:
//!
//! | offset | field            |
//! |--------|------------------|
//! | 0      | namespace span   |
//! | 8      | name span        |
//! | 16     | text span        |
//! | 24     | parent           |
//! | 28     | first child      |
//! | 32     | last child       |
//! | 36     | next sibling     |
//! | 40     | first attribute  |
//! | 44     | last attribute   |
//!
//! Attribute record layout (also used for the header pairs):
//!
//! | offset | field       |
//! |--------|-------------|
//! | 0      | name span   |
//! | 8      | value span  |
//! | 16     | next        |

use crate::Arena;
use crate::NoMemory;
use crate::Span;

pub(super) const NIL: u32 = u32::MAX;

pub(super) const ELEMENT_SIZE: usize = 48;
const ATTRIBUTE_SIZE: usize = 20;

#[derive(Clone, Copy)]
pub(super) enum Field {
    Namespace = 0,
    Name = 8,
    Text = 16,
}

#[derive(Clone, Copy)]
pub(super) enum Link {
    Parent = 24,
    FirstChild = 28,
    LastChild = 32,
    NextSibling = 36,
    FirstAttribute = 40,
    LastAttribute = 44,
}

const ATTRIBUTE_NAME: usize = 0;
const ATTRIBUTE_VALUE: usize = 8;
const ATTRIBUTE_NEXT: usize = 16;

pub(super) trait ArenaExt {
    fn alloc_element(&mut self, namespace: Span, name: Span) -> Result<u32, NoMemory>;
    fn alloc_attribute(&mut self, name: Span, value: Span) -> Result<u32, NoMemory>;

    fn field(&self, node: u32, field: Field) -> Span;
    fn set_field(&mut self, node: u32, field: Field, span: Span);
    fn link(&self, node: u32, link: Link) -> u32;
    fn set_link(&mut self, node: u32, link: Link, target: u32);

    fn attribute_name(&self, attr: u32) -> Span;
    fn attribute_value(&self, attr: u32) -> Span;
    fn attribute_next(&self, attr: u32) -> u32;

    fn append_child(&mut self, parent: u32, child: u32);
    fn append_attribute(&mut self, node: u32, attr: u32);
}

fn offset(node: u32, at: usize) -> usize {
    (node as usize).saturating_add(at)
}

impl ArenaExt for Arena {
    fn alloc_element(&mut self, namespace: Span, name: Span) -> Result<u32, NoMemory> {
        let record = self.alloc(ELEMENT_SIZE)?;
        let node = record.start() as u32;
        self.set_field(node, Field::Namespace, namespace);
        self.set_field(node, Field::Name, name);
        for link in [
            Link::Parent,
            Link::FirstChild,
            Link::LastChild,
            Link::NextSibling,
            Link::FirstAttribute,
            Link::LastAttribute,
        ] {
            self.set_link(node, link, NIL);
        }

        Ok(node)
    }

    fn alloc_attribute(&mut self, name: Span, value: Span) -> Result<u32, NoMemory> {
        let record = self.alloc(ATTRIBUTE_SIZE)?;
        let attr = record.start() as u32;
        self.write_span(offset(attr, ATTRIBUTE_NAME), name);
        self.write_span(offset(attr, ATTRIBUTE_VALUE), value);
        self.write_u32(offset(attr, ATTRIBUTE_NEXT), NIL);

        Ok(attr)
    }

    fn field(&self, node: u32, field: Field) -> Span {
        self.read_span(offset(node, field as usize))
    }

    fn set_field(&mut self, node: u32, field: Field, span: Span) {
        self.write_span(offset(node, field as usize), span);
    }

    fn link(&self, node: u32, link: Link) -> u32 {
        if node == NIL {
            return NIL;
        }
        self.read_u32(offset(node, link as usize))
    }

    fn set_link(&mut self, node: u32, link: Link, target: u32) {
        self.write_u32(offset(node, link as usize), target);
    }

    fn attribute_name(&self, attr: u32) -> Span {
        self.read_span(offset(attr, ATTRIBUTE_NAME))
    }

    fn attribute_value(&self, attr: u32) -> Span {
        self.read_span(offset(attr, ATTRIBUTE_VALUE))
    }

    fn attribute_next(&self, attr: u32) -> u32 {
        if attr == NIL {
            return NIL;
        }
        self.read_u32(offset(attr, ATTRIBUTE_NEXT))
    }

    fn append_child(&mut self, parent: u32, child: u32) {
        self.set_link(child, Link::Parent, parent);
        let last = self.link(parent, Link::LastChild);
        if last == NIL {
            self.set_link(parent, Link::FirstChild, child);
        } else {
            self.set_link(last, Link::NextSibling, child);
        }
        self.set_link(parent, Link::LastChild, child);
    }

    fn append_attribute(&mut self, node: u32, attr: u32) {
        let last = self.link(node, Link::LastAttribute);
        if last == NIL {
            self.set_link(node, Link::FirstAttribute, attr);
        } else {
            self.write_u32(offset(last, ATTRIBUTE_NEXT), attr);
        }
        self.set_link(node, Link::LastAttribute, attr);
    }
}

/// Document level links: the top level element chain and the header list.
pub(super) struct Tree {
    pub(super) root: u32,
    last_top: u32,
    pub(super) header: u32,
    last_header: u32,
    pub(super) has_header: bool,
}

impl Tree {
    pub(super) fn new() -> Tree {
        Tree {
            root: NIL,
            last_top: NIL,
            header: NIL,
            last_header: NIL,
            has_header: false,
        }
    }

    pub(super) fn clear(&mut self) {
        *self = Tree::new();
    }

    /// Adds a parentless element, the first one becomes the root.
    pub(super) fn attach_top(&mut self, arena: &mut Arena, node: u32) {
        if self.root == NIL {
            self.root = node;
        } else {
            arena.set_link(self.last_top, Link::NextSibling, node);
        }
        self.last_top = node;
    }

    pub(super) fn append_header(&mut self, arena: &mut Arena, attr: u32) {
        if self.header == NIL {
            self.header = attr;
        } else {
            arena.write_u32(offset(self.last_header, ATTRIBUTE_NEXT), attr);
        }
        self.last_header = attr;
        self.has_header = true;
    }
}

pub(super) enum Step {
    Start(u32),
    End(u32),
}

/// Iterative depth first walk over the element records.
///
/// Elements with children produce a [Start](Step::Start) step before
/// and an [End](Step::End) step after their children. Leaf elements
/// only produce a start step. When `siblings` is set, the walk continues
/// with the following siblings of the starting element.
pub(super) struct Visitor {
    current: u32,
    going_down: bool,
    level: usize,
    siblings: bool,
}

impl Visitor {
    pub(super) fn new(start: u32, siblings: bool) -> Visitor {
        Visitor {
            current: start,
            going_down: true,
            level: 0,
            siblings,
        }
    }

    fn step(&mut self, arena: &Arena) {
        if self.going_down {
            let child = arena.link(self.current, Link::FirstChild);
            if child != NIL {
                self.current = child;
                self.level += 1;
                return;
            }
        }
        if self.level == 0 && !self.siblings {
            self.current = NIL;
            return;
        }
        let next = arena.link(self.current, Link::NextSibling);
        if next != NIL {
            self.current = next;
            self.going_down = true;
        } else if self.level == 0 {
            self.current = NIL;
        } else {
            self.level -= 1;
            self.current = arena.link(self.current, Link::Parent);
            self.going_down = false;
        }
    }

    pub(super) fn next(&mut self, arena: &Arena) -> Option<Step> {
        if self.current == NIL {
            return None;
        }
        let node = self.current;
        let going_down = self.going_down;
        self.step(arena);
        if going_down {
            Some(Step::Start(node))
        } else {
            Some(Step::End(node))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(arena: &mut Arena, name: &str) -> u32 {
        let name = arena.push_str(name.as_bytes()).unwrap();
        arena.alloc_element(Span::EMPTY, name).unwrap()
    }

    fn walk(arena: &Arena, start: u32, siblings: bool) -> String {
        let mut visitor = Visitor::new(start, siblings);
        let mut result = String::new();
        while let Some(step) = visitor.next(arena) {
            match step {
                Step::Start(node) => result.push_str(arena.str(arena.field(node, Field::Name))),
                Step::End(node) => {
                    result.push('/');
                    result.push_str(arena.str(arena.field(node, Field::Name)));
                }
            }
            result.push(' ');
        }
        result
    }

    #[test]
    fn records() {
        let mut arena = Arena::with_capacity(1024).unwrap();
        let a = element(&mut arena, "a");
        assert_eq!(arena.str(arena.field(a, Field::Name)), "a");
        assert!(arena.field(a, Field::Namespace).is_empty());
        assert!(arena.field(a, Field::Text).is_empty());
        assert_eq!(arena.link(a, Link::Parent), NIL);
        assert_eq!(arena.link(a, Link::FirstChild), NIL);
        assert_eq!(arena.link(NIL, Link::FirstChild), NIL);

        let b = element(&mut arena, "b");
        let c = element(&mut arena, "c");
        arena.append_child(a, b);
        arena.append_child(a, c);
        assert_eq!(arena.link(a, Link::FirstChild), b);
        assert_eq!(arena.link(a, Link::LastChild), c);
        assert_eq!(arena.link(b, Link::NextSibling), c);
        assert_eq!(arena.link(c, Link::Parent), a);

        let name = arena.push_str(b"x").unwrap();
        let value = arena.push_str(b"1").unwrap();
        let x = arena.alloc_attribute(name, value).unwrap();
        let y = arena.alloc_attribute(value, name).unwrap();
        arena.append_attribute(a, x);
        arena.append_attribute(a, y);
        assert_eq!(arena.link(a, Link::FirstAttribute), x);
        assert_eq!(arena.attribute_next(x), y);
        assert_eq!(arena.attribute_next(y), NIL);
        assert_eq!(arena.str(arena.attribute_name(y)), "1");
        assert_eq!(arena.str(arena.attribute_value(y)), "x");
    }

    #[test]
    fn visits() {
        let mut arena = Arena::with_capacity(1024).unwrap();
        let mut tree = Tree::new();
        let a = element(&mut arena, "a");
        let b = element(&mut arena, "b");
        let c = element(&mut arena, "c");
        let d = element(&mut arena, "d");
        let e = element(&mut arena, "e");
        tree.attach_top(&mut arena, a);
        arena.append_child(a, b);
        arena.append_child(b, c);
        arena.append_child(a, d);
        tree.attach_top(&mut arena, e);
        assert_eq!(tree.root, a);

        assert_eq!(walk(&arena, a, false), "a b c /b d /a ");
        assert_eq!(walk(&arena, a, true), "a b c /b d /a e ");
        assert_eq!(walk(&arena, b, false), "b c /b ");
        assert_eq!(walk(&arena, d, false), "d ");
        assert_eq!(walk(&arena, NIL, true), "");
    }
}

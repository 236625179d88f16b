/*
** This file is a part of Chunkxml (incremental XML reader/writer)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Chunkxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod builder;
mod error;
mod iterators;
mod serializer;
mod stack;
mod tree;
mod value;

use std::fmt::Debug;
use std::fmt::Display;
use std::str::FromStr;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;

use tracing::debug;

use crate::Arena;
use crate::ArenaStats;
use crate::Location;
use crate::Span;
use crate::Tokenizer;

use builder::TreeBuilder;
use error::description;
pub use error::DocumentError;
pub use iterators::Attributes;
pub use iterators::Children;
pub use iterators::DescendantOrSelf;
use serializer::ArenaSink;
use serializer::FmtSink;
use tree::ArenaExt;
use tree::ELEMENT_SIZE;
use tree::Field;
use tree::Link;
use tree::NIL;
pub use value::Value;

/// Default arena size in bytes.
pub const DEFAULT_CAPACITY: usize = 10 * 1024;

/// Default limit for the number of simultaneously open elements.
pub const DEFAULT_MAX_DEPTH: usize = 10;

static GENERATIONS: AtomicU32 = AtomicU32::new(0);

fn next_generation() -> u32 {
    GENERATIONS.fetch_add(1, Ordering::Relaxed)
}

/// Memory limits of a [Document].
///
/// ```
/// use chunkxml::{Document, DocumentOptions};
///
/// let options = DocumentOptions::new().capacity(512).max_depth(4);
/// let doc = Document::with_options(options).unwrap();
/// assert_eq!(doc.arena_stats().capacity, 512);
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DocumentOptions {
    /// Size of the arena holding everything, including the serializer output.
    pub capacity: usize,
    /// Maximum element nesting accepted by the parser.
    pub max_depth: usize,
}

impl DocumentOptions {
    pub fn new() -> Self {
        DocumentOptions {
            capacity: DEFAULT_CAPACITY,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle of an element which does not borrow the document.
///
/// Handles are used for adding content under an element. They become
/// invalid when the document is [reset](Document::reset), and a handle
/// from another document is never valid.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct ElementId {
    offset: u32,
    generation: u32,
}

/// An XML document built incrementally inside a fixed size arena.
///
/// Input can be given in chunks of any size with
/// [parse_bytes()](Document::parse_bytes), and elements can also be
/// added programmatically. Both can be mixed.
///
/// Once the arena is full, all further changes are rejected with
/// [DocumentError::NoMemory] until [reset()](Document::reset) is called.
///
/// # Examples
///
/// ```
/// use chunkxml::Document;
///
/// let mut doc = Document::new()?;
/// doc.parse_bytes(b"<?xml version=\"1.0\"?><root><item id=")?;
/// doc.parse_bytes(b"\"1\">hello</item></root>")?;
///
/// let item = doc.find_element(None, "item").unwrap();
/// assert_eq!(item.text(), Some("hello"));
/// assert_eq!(item.attribute_int("id"), 1);
/// assert_eq!(doc.header_value("version"), Some("1.0"));
/// # Ok::<(), chunkxml::DocumentError>(())
/// ```
pub struct Document {
    arena: Arena,
    tokenizer: Tokenizer,
    builder: TreeBuilder,
    generation: u32,
    failure: Option<DocumentError>,
}

fn parse_int(s: Option<&str>) -> i64 {
    s.and_then(|s| s.trim().parse().ok()).unwrap_or(-1)
}

fn parse_float(s: Option<&str>) -> f64 {
    s.and_then(|s| s.trim().parse().ok()).unwrap_or(0.0)
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

impl Document {
    /// Creates an empty document with the default options.
    pub fn new() -> Result<Document, DocumentError> {
        Document::with_options(DocumentOptions::default())
    }

    pub fn with_options(options: DocumentOptions) -> Result<Document, DocumentError> {
        Ok(Document {
            arena: Arena::with_capacity(options.capacity)?,
            tokenizer: Tokenizer::new(),
            builder: TreeBuilder::new(options.max_depth)?,
            generation: next_generation(),
            failure: None,
        })
    }

    /// Empties the document for reuse, keeping the reserved memory.
    ///
    /// All [ElementId] handles of the old content become invalid.
    pub fn reset(&mut self) {
        self.arena.reset();
        self.tokenizer.reset();
        self.builder.reset();
        self.generation = next_generation();
        self.failure = None;
    }

    /// Parses a chunk of XML input.
    ///
    /// Chunks can be split at any byte, including the middle of a tag
    /// or a multi byte character. Once an error is returned, the same
    /// error is returned for all further chunks.
    pub fn parse_bytes(&mut self, bytes: &[u8]) -> Result<(), DocumentError> {
        if let Some(err) = self.failure {
            return Err(err);
        }
        if let Err(err) = self
            .tokenizer
            .parse_bytes(&mut self.arena, &mut self.builder, bytes)
        {
            let err = DocumentError::from(err);
            debug!(location = %self.tokenizer.location(), error = %err, "parse failed");
            self.failure = Some(err);
            return Err(err);
        }
        Ok(())
    }

    /// Position of the parser in the input stream.
    pub fn location(&self) -> Location {
        self.tokenizer.location()
    }

    /// Returns true if there is a root element and all parsed elements are closed.
    pub fn is_complete(&self) -> bool {
        self.builder.tree.root != NIL && self.builder.depth() == 0
    }

    /// The error which stopped the parser, if any.
    pub fn failure(&self) -> Option<DocumentError> {
        self.failure
    }

    pub fn arena_stats(&self) -> ArenaStats {
        self.arena.stats()
    }

    fn node_of(&self, id: ElementId) -> Option<u32> {
        let end = (id.offset as usize).checked_add(ELEMENT_SIZE)?;
        if id.generation != self.generation || end > self.arena.used() {
            return None;
        }
        Some(id.offset)
    }

    //
    // Query methods
    //

    /// The first top level element.
    pub fn root(&self) -> Option<Element<'_>> {
        let root = self.builder.tree.root;
        if root == NIL {
            return None;
        }
        Some(Element::new(self, root))
    }

    /// The root element followed by any other top level elements.
    pub fn top_level(&self) -> Children<'_> {
        Children::new(self, self.builder.tree.root)
    }

    /// All elements in document order.
    pub fn elements(&self) -> DescendantOrSelf<'_> {
        DescendantOrSelf::new(self, self.builder.tree.root, true)
    }

    pub fn element(&self, id: ElementId) -> Option<Element<'_>> {
        self.node_of(id).map(|node| Element::new(self, node))
    }

    /// Finds the first element with the given name in document order.
    ///
    /// See [Element::matches()] for how the namespace is compared.
    pub fn find_element(&self, namespace: Option<&str>, name: &str) -> Option<Element<'_>> {
        self.elements().find(|element| element.matches(namespace, name))
    }

    pub fn text(&self, namespace: Option<&str>, name: &str) -> Option<&str> {
        self.find_element(namespace, name)?.text()
    }

    /// Text of the first matching element as an integer, or `-1`.
    pub fn int(&self, namespace: Option<&str>, name: &str) -> i64 {
        parse_int(self.text(namespace, name))
    }

    /// Text of the first matching element as a float, or `0.0`.
    pub fn float(&self, namespace: Option<&str>, name: &str) -> f64 {
        parse_float(self.text(namespace, name))
    }

    /// Attribute of the first matching element.
    pub fn attribute(&self, namespace: Option<&str>, name: &str, attribute: &str) -> Option<&str> {
        self.find_element(namespace, name)?.attribute(attribute)
    }

    pub fn attribute_int(&self, namespace: Option<&str>, name: &str, attribute: &str) -> i64 {
        parse_int(self.attribute(namespace, name, attribute))
    }

    pub fn attribute_float(&self, namespace: Option<&str>, name: &str, attribute: &str) -> f64 {
        parse_float(self.attribute(namespace, name, attribute))
    }

    /// Returns true if a header was parsed or added.
    pub fn has_header(&self) -> bool {
        self.builder.tree.has_header
    }

    /// Pseudo attributes of the `<?xml ...?>` declaration.
    pub fn header(&self) -> Attributes<'_> {
        Attributes::new(&self.arena, self.builder.tree.header)
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.header()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    //
    // Edit methods
    //

    fn writable(&self) -> Result<(), DocumentError> {
        match self.failure {
            Some(DocumentError::NoMemory) => Err(DocumentError::NoMemory),
            _ => Ok(()),
        }
    }

    fn latch<T>(&mut self, result: Result<T, DocumentError>) -> Result<T, DocumentError> {
        if let Err(DocumentError::NoMemory) = result {
            self.failure = Some(DocumentError::NoMemory);
        }
        result
    }

    fn insert_element(
        &mut self,
        parent: Option<u32>,
        namespace: Option<&str>,
        name: &str,
        value: Option<Value<'_>>,
    ) -> Result<u32, DocumentError> {
        let namespace = match non_empty(namespace) {
            Some(ns) => self.arena.push_str(ns.as_bytes())?,
            None => Span::EMPTY,
        };
        let name = self.arena.push_str(name.as_bytes())?;
        let text = match value {
            Some(value) => value.push_into(&mut self.arena)?,
            None => Span::EMPTY,
        };
        let node = self.arena.alloc_element(namespace, name)?;
        self.arena.set_field(node, Field::Text, text);
        match parent {
            Some(parent) => self.arena.append_child(parent, node),
            None => self.builder.tree.attach_top(&mut self.arena, node),
        }
        Ok(node)
    }

    /// Adds a new element as the last child of `parent`.
    ///
    /// Without a parent, the element becomes the root, or the next top
    /// level element if there is already a root. An empty text value
    /// means no text.
    pub fn add_element(
        &mut self,
        parent: Option<ElementId>,
        namespace: Option<&str>,
        name: &str,
        value: Option<Value<'_>>,
    ) -> Result<ElementId, DocumentError> {
        self.writable()?;
        if name.is_empty() {
            return Err(DocumentError::Fault(description::EMPTY_NAME));
        }
        let parent = match parent {
            Some(id) => Some(
                self.node_of(id)
                    .ok_or(DocumentError::Fault(description::STALE_ELEMENT))?,
            ),
            None => None,
        };
        let result = self.insert_element(parent, namespace, name, value);
        let offset = self.latch(result)?;

        Ok(ElementId {
            offset,
            generation: self.generation,
        })
    }

    fn insert_attribute(&mut self, node: u32, name: &str, value: Value<'_>) -> Result<(), DocumentError> {
        let name = self.arena.push_str(name.as_bytes())?;
        let value = value.push_into(&mut self.arena)?;
        let attr = self.arena.alloc_attribute(name, value)?;
        self.arena.append_attribute(node, attr);
        Ok(())
    }

    /// Adds an attribute after the existing attributes of the element.
    ///
    /// Names are not checked for duplicates.
    pub fn add_attribute<'v>(
        &mut self,
        element: ElementId,
        name: &str,
        value: impl Into<Value<'v>>,
    ) -> Result<(), DocumentError> {
        self.writable()?;
        let node = self
            .node_of(element)
            .ok_or(DocumentError::Fault(description::STALE_ELEMENT))?;
        let value = value.into();
        if name.is_empty() || value == Value::Text("") {
            return Err(DocumentError::Fault(description::EMPTY_ATTRIBUTE));
        }
        let result = self.insert_attribute(node, name, value);
        self.latch(result)
    }

    fn insert_header(&mut self, name: &str, value: Value<'_>) -> Result<(), DocumentError> {
        let name = self.arena.push_str(name.as_bytes())?;
        let value = value.push_into(&mut self.arena)?;
        let attr = self.arena.alloc_attribute(name, value)?;
        self.builder.tree.append_header(&mut self.arena, attr);
        Ok(())
    }

    /// Adds a pseudo attribute to the `<?xml ...?>` declaration.
    ///
    /// The document then has a header, and parsing another one is an error.
    pub fn add_header<'v>(&mut self, name: &str, value: impl Into<Value<'v>>) -> Result<(), DocumentError> {
        self.writable()?;
        if name.is_empty() {
            return Err(DocumentError::Fault(description::EMPTY_NAME));
        }
        let result = self.insert_header(name, value.into());
        self.latch(result)
    }

    /// Serializes the document into the arena.
    ///
    /// The output is written after the existing content, so every call
    /// uses more of the arena. Without a parsed or added header, a
    /// default `<?xml version="1.0" encoding="UTF-8"?>` is written.
    /// Text and attribute values are written as is, without escaping.
    ///
    /// Use the [Display] implementation to serialize without touching
    /// the arena.
    pub fn serialize(&mut self) -> Result<&str, DocumentError> {
        self.writable()?;
        let mut sink = ArenaSink::new(&mut self.arena);
        let result = serializer::write_document(&mut sink, &self.builder.tree);
        let output = sink.output();
        match result {
            Ok(()) => Ok(self.arena.str(output)),
            Err(err) => {
                self.failure = Some(DocumentError::NoMemory);
                Err(err.into())
            }
        }
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        serializer::write_document(&mut FmtSink::new(&self.arena, f), &self.builder.tree)
    }
}

impl FromStr for Document {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut doc = Document::new()?;
        doc.parse_bytes(s.as_bytes())?;
        Ok(doc)
    }
}

/// A read only view of an element.
///
/// Elements borrow the document, use [id()](Element::id) to get a handle
/// for adding content under it.
#[derive(Clone, Copy)]
pub struct Element<'a> {
    doc: &'a Document,
    node: u32,
}

impl<'a> Element<'a> {
    fn new(doc: &'a Document, node: u32) -> Element<'a> {
        Element { doc, node }
    }

    fn field(&self, field: Field) -> &'a str {
        let arena = &self.doc.arena;
        arena.str(arena.field(self.node, field))
    }

    fn linked(&self, link: Link) -> Option<Element<'a>> {
        let node = self.doc.arena.link(self.node, link);
        if node == NIL {
            return None;
        }
        Some(Element::new(self.doc, node))
    }

    pub fn id(&self) -> ElementId {
        ElementId {
            offset: self.node,
            generation: self.doc.generation,
        }
    }

    /// Local name of the element, without the namespace prefix.
    pub fn name(&self) -> &'a str {
        self.field(Field::Name)
    }

    /// Namespace prefix of the element, if it has one.
    pub fn namespace(&self) -> Option<&'a str> {
        non_empty(Some(self.field(Field::Namespace)))
    }

    pub fn text(&self) -> Option<&'a str> {
        non_empty(Some(self.field(Field::Text)))
    }

    /// Text as an integer, or `-1` if there is no text or it is not a number.
    pub fn int(&self) -> i64 {
        parse_int(self.text())
    }

    /// Text as a float, or `0.0` if there is no text or it is not a number.
    pub fn float(&self) -> f64 {
        parse_float(self.text())
    }

    /// Checks the name and the namespace of the element.
    ///
    /// An empty or missing `namespace` matches any namespace. Otherwise
    /// the element must have exactly that namespace prefix.
    pub fn matches(&self, namespace: Option<&str>, name: &str) -> bool {
        if self.name() != name {
            return false;
        }
        match non_empty(namespace) {
            Some(ns) => self.namespace() == Some(ns),
            None => true,
        }
    }

    //
    // Navigation methods
    //

    pub fn parent(&self) -> Option<Element<'a>> {
        self.linked(Link::Parent)
    }

    pub fn first_child(&self) -> Option<Element<'a>> {
        self.linked(Link::FirstChild)
    }

    pub fn next_sibling(&self) -> Option<Element<'a>> {
        self.linked(Link::NextSibling)
    }

    pub fn children(&self) -> Children<'a> {
        Children::new(self.doc, self.doc.arena.link(self.node, Link::FirstChild))
    }

    pub fn attributes(&self) -> Attributes<'a> {
        Attributes::new(
            &self.doc.arena,
            self.doc.arena.link(self.node, Link::FirstAttribute),
        )
    }

    /// The element itself and all its descendants in document order.
    pub fn descendant_or_self(&self) -> DescendantOrSelf<'a> {
        DescendantOrSelf::new(self.doc, self.node, false)
    }

    /// Finds the first matching element in this subtree, including itself.
    pub fn find_element(&self, namespace: Option<&str>, name: &str) -> Option<Element<'a>> {
        self.descendant_or_self()
            .find(|element| element.matches(namespace, name))
    }

    /// Finds the first matching direct child.
    pub fn find_child(&self, namespace: Option<&str>, name: &str) -> Option<Element<'a>> {
        self.children().find(|child| child.matches(namespace, name))
    }

    //
    // Value methods
    //

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attributes()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    pub fn attribute_int(&self, name: &str) -> i64 {
        parse_int(self.attribute(name))
    }

    pub fn attribute_float(&self, name: &str) -> f64 {
        parse_float(self.attribute(name))
    }

    pub fn child_text(&self, namespace: Option<&str>, name: &str) -> Option<&'a str> {
        self.find_child(namespace, name)?.text()
    }

    pub fn child_int(&self, namespace: Option<&str>, name: &str) -> i64 {
        parse_int(self.child_text(namespace, name))
    }

    pub fn child_float(&self, namespace: Option<&str>, name: &str) -> f64 {
        parse_float(self.child_text(namespace, name))
    }
}

impl Display for Element<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        serializer::write_elements(&mut FmtSink::new(&self.doc.arena, f), self.node, false)
    }
}

impl Debug for Element<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("namespace", &self.namespace())
            .field("name", &self.name())
            .field("text", &self.text())
            .finish()
    }
}


mod nocompile;

/*
** This file is a part of Chunkxml (incremental XML reader/writer)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Chunkxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

mod error;

use std::ops::Range;

use tracing::debug;

pub use error::NoMemory;

/// Largest capacity an arena can have.
///
/// Offsets into the arena are stored as `u32` values inside the
/// element records, and `u32::MAX` is reserved as the null link.
pub const MAX_CAPACITY: usize = (u32::MAX - 1) as usize;

/// A byte range inside an [Arena].
///
/// Spans are plain values, they do not borrow the arena. Their
/// content can only be reached through the arena (or the document
/// owning it), therefore a view of the bytes can never outlive
/// the memory.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Span {
    start: u32,
    len: u32,
}

impl Span {
    /// An empty span, used for absent strings.
    pub const EMPTY: Span = Span { start: 0, len: 0 };

    pub(crate) fn new(start: usize, len: usize) -> Span {
        // Arena capacity is capped at MAX_CAPACITY so these fit.
        Span {
            start: start as u32,
            len: len as u32,
        }
    }

    pub fn start(&self) -> usize {
        self.start as usize
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn end(&self) -> usize {
        self.start() + self.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }
}

/// Memory usage numbers of an [Arena].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ArenaStats {
    /// Fixed capacity in bytes.
    pub capacity: usize,
    /// Bytes handed out so far.
    pub used: usize,
}

impl ArenaStats {
    pub fn remaining(&self) -> usize {
        self.capacity - self.used
    }
}

/// A fixed capacity bump allocator for the XML structures and character data.
///
/// All element records, attribute records, parsed strings, the pending
/// parser token, and the serializer output share a single buffer which
/// is reserved once at creation time. Allocations only move the cursor
/// forward, there is no way to release an individual allocation. The
/// whole arena is released when it is dropped, or emptied with
/// [reset()](Arena::reset) for reuse.
///
/// An allocation which does not fit fails with [NoMemory] and leaves
/// the arena untouched.
///
pub struct Arena {
    buffer: Vec<u8>,
    capacity: usize,
}

impl Arena {
    /// Creates a new arena which can hold exactly `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Result<Arena, NoMemory> {
        if capacity > MAX_CAPACITY {
            return Err(NoMemory);
        }
        let mut buffer = Vec::new();
        buffer.try_reserve_exact(capacity)?;

        Ok(Arena { buffer, capacity })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn used(&self) -> usize {
        self.buffer.len()
    }

    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            capacity: self.capacity,
            used: self.buffer.len(),
        }
    }

    /// Forgets all allocations while keeping the reserved memory.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    fn make_space(&self, size: usize) -> Result<(), NoMemory> {
        match self.buffer.len().checked_add(size) {
            Some(end) if end <= self.capacity => Ok(()),
            _ => {
                debug!(
                    requested = size,
                    used = self.buffer.len(),
                    capacity = self.capacity,
                    "arena exhausted"
                );
                Err(NoMemory)
            }
        }
    }

    /// Reserves `size` zeroed bytes at the cursor.
    pub fn alloc(&mut self, size: usize) -> Result<Span, NoMemory> {
        self.make_space(size)?;
        let start = self.buffer.len();
        self.buffer.resize(start + size, 0);

        Ok(Span::new(start, size))
    }

    /// Returns an empty span at the cursor.
    ///
    /// The span can be grown byte by byte with [push_byte()](Arena::push_byte)
    /// or [extend_str()](Arena::extend_str) without any copying as long as no
    /// other allocation happens in between.
    pub fn start_str(&self) -> Span {
        Span::new(self.buffer.len(), 0)
    }

    /// Copies the bytes into the arena.
    pub fn push_str(&mut self, bytes: &[u8]) -> Result<Span, NoMemory> {
        self.make_space(bytes.len())?;
        let start = self.buffer.len();
        self.buffer.extend_from_slice(bytes);

        Ok(Span::new(start, bytes.len()))
    }

    /// Appends a single byte to the span.
    pub fn push_byte(&mut self, span: Span, c: u8) -> Result<Span, NoMemory> {
        self.extend_str(span, &[c])
    }

    // Returns a span with the same content which ends at the cursor,
    // and checks that `extra` more bytes fit after it.
    fn tail_for(&mut self, span: Span, extra: usize) -> Result<Span, NoMemory> {
        if span.is_empty() {
            self.make_space(extra)?;
            return Ok(self.start_str());
        }
        if span.end() == self.buffer.len() {
            self.make_space(extra)?;
            return Ok(span);
        }
        // Something else was allocated after the span, move it to the end
        self.make_space(span.len().saturating_add(extra))?;
        let start = self.buffer.len();
        self.buffer.extend_from_within(span.range());

        Ok(Span::new(start, span.len()))
    }

    /// Appends bytes to the span.
    ///
    /// If the span is at the end of the arena, it is extended in place.
    /// Otherwise the old content is copied to the end first, and the
    /// returned span refers to the copy.
    pub fn extend_str(&mut self, span: Span, bytes: &[u8]) -> Result<Span, NoMemory> {
        let span = self.tail_for(span, bytes.len())?;
        self.buffer.extend_from_slice(bytes);

        Ok(Span::new(span.start(), span.len() + bytes.len()))
    }

    /// Appends the content of another span in this arena to the span.
    ///
    /// Same as [extend_str()](Arena::extend_str) but the source bytes
    /// come from the arena itself.
    pub fn extend_within(&mut self, span: Span, source: Span) -> Result<Span, NoMemory> {
        if source.end() > self.buffer.len() {
            return Ok(span);
        }
        let span = self.tail_for(span, source.len())?;
        self.buffer.extend_from_within(source.range());

        Ok(Span::new(span.start(), span.len() + source.len()))
    }

    /// Returns the bytes of the span.
    ///
    /// A span which is not inside the used area returns no bytes.
    pub fn bytes(&self, span: Span) -> &[u8] {
        self.buffer.get(span.range()).unwrap_or(&[])
    }

    /// Returns the span as a string slice.
    ///
    /// The parser only stores validated UTF-8 text, so this returns an
    /// empty string only for spans which do not hold text.
    pub fn str(&self, span: Span) -> &str {
        std::str::from_utf8(self.bytes(span)).unwrap_or("")
    }

    /// The whole used area.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub(crate) fn read_u32(&self, pos: usize) -> u32 {
        pos.checked_add(4)
            .and_then(|end| self.buffer.get(pos..end))
            .and_then(|b| b.try_into().ok())
            .map(u32::from_le_bytes)
            .unwrap_or(u32::MAX)
    }

    pub(crate) fn write_u32(&mut self, pos: usize, value: u32) {
        if let Some(end) = pos.checked_add(4)
            && let Some(b) = self.buffer.get_mut(pos..end)
        {
            b.copy_from_slice(&value.to_le_bytes());
        }
    }

    pub(crate) fn read_span(&self, pos: usize) -> Span {
        let start = self.read_u32(pos);
        let len = self.read_u32(pos + 4);
        if start == u32::MAX || len == u32::MAX {
            return Span::EMPTY;
        }
        Span { start, len }
    }

    pub(crate) fn write_span(&mut self, pos: usize, span: Span) {
        self.write_u32(pos, span.start);
        self.write_u32(pos + 4, span.len);
    }
}


/// # Must not compile tests
///
/// Returned &str cannot outlive the arena:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use chunkxml::Arena;
/// let s: &str;
/// {
///     let mut arena = Arena::with_capacity(64)?;
///     let span = arena.push_str(b"will dangle")?;
///     s = arena.str(span);
/// }
/// println!("{}", s);
/// # Ok(())
/// # }
/// ```
///
/// Arena cannot be modified while a &str is borrowed:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use chunkxml::Arena;
/// let mut arena = Arena::with_capacity(64)?;
/// let span = arena.push_str(b"text")?;
/// let s = arena.str(span);
/// arena.reset();
/// println!("{}", s);
/// # Ok(())
/// # }
/// ```
#[cfg(doctest)]
struct MustNotCompileTests;

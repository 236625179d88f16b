/*
** This file is a part of Chunkxml (incremental XML reader/writer)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Chunkxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use tracing::debug;

use crate::NoMemory;
use crate::ParseError;

use super::error::description;

/// Open elements of the parser, innermost at the top.
///
/// The storage is reserved once, pushing never allocates.
pub(super) struct NestingStack {
    items: Vec<u32>,
    max_depth: usize,
}

impl NestingStack {
    pub(super) fn new(max_depth: usize) -> Result<NestingStack, NoMemory> {
        let mut items = Vec::new();
        items.try_reserve_exact(max_depth)?;

        Ok(NestingStack { items, max_depth })
    }

    pub(super) fn push(&mut self, node: u32) -> Result<(), ParseError> {
        if self.items.len() >= self.max_depth {
            debug!(max_depth = self.max_depth, "nesting limit reached");
            return Err(ParseError::Syntax(description::NESTING_TOO_DEEP));
        }
        self.items.push(node);
        Ok(())
    }

    pub(super) fn pop(&mut self) -> Option<u32> {
        self.items.pop()
    }

    pub(super) fn peek(&self) -> Option<u32> {
        self.items.last().copied()
    }

    pub(super) fn depth(&self) -> usize {
        self.items.len()
    }

    pub(super) fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded() {
        let mut stack = NestingStack::new(2).unwrap();
        assert_eq!(stack.peek(), None);
        stack.push(10).unwrap();
        stack.push(20).unwrap();
        assert_eq!(
            stack.push(30),
            Err(ParseError::Syntax(description::NESTING_TOO_DEEP))
        );
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.peek(), Some(20));
        assert_eq!(stack.pop(), Some(20));
        assert_eq!(stack.pop(), Some(10));
        assert_eq!(stack.pop(), None);

        stack.push(40).unwrap();
        stack.clear();
        assert_eq!(stack.depth(), 0);
    }

    #[test]
    fn zero_depth() {
        let mut stack = NestingStack::new(0).unwrap();
        assert!(stack.push(1).is_err());
    }
}

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

use crate::Arena;
use crate::NoMemory;
use crate::ParseError;
use crate::Span;
use crate::TokenHandler;
use crate::TokenKind;
use crate::parser::tag::AttributeScanner;
use crate::parser::tag::header_region;
use crate::parser::tag::split_tag;

use super::error::description;
use super::stack::NestingStack;
use super::tree::ArenaExt;
use super::tree::Field;
use super::tree::Tree;

/// Builds the element tree from the tokens.
pub(super) struct TreeBuilder {
    pub(super) tree: Tree,
    stack: NestingStack,
}

fn close_tag_matches(token: &[u8], namespace: &[u8], name: &[u8]) -> bool {
    let Some(body) = token
        .strip_prefix(b"</")
        .and_then(|body| body.strip_suffix(b">"))
    else {
        return false;
    };
    if namespace.is_empty() {
        return body == name;
    }
    body.strip_prefix(namespace)
        .and_then(|rest| rest.strip_prefix(b":"))
        .is_some_and(|rest| rest == name)
}

impl TreeBuilder {
    pub(super) fn new(max_depth: usize) -> Result<TreeBuilder, NoMemory> {
        Ok(TreeBuilder {
            tree: Tree::new(),
            stack: NestingStack::new(max_depth)?,
        })
    }

    pub(super) fn reset(&mut self) {
        self.tree.clear();
        self.stack.clear();
    }

    /// Number of currently open elements.
    pub(super) fn depth(&self) -> usize {
        self.stack.depth()
    }

    fn header(&mut self, arena: &mut Arena, token: Span) -> Result<(), ParseError> {
        if self.tree.has_header {
            debug!("second xml declaration");
            return Err(ParseError::Syntax(description::DUPLICATE_HEADER));
        }
        self.tree.has_header = true;

        let mut scanner = AttributeScanner::new(header_region(arena.as_bytes(), token));
        while let Some((name, value)) = scanner.next(arena.as_bytes())? {
            let attr = arena.alloc_attribute(name, value)?;
            self.tree.append_header(arena, attr);
        }
        Ok(())
    }

    fn element(&mut self, arena: &mut Arena, kind: TokenKind, token: Span) -> Result<(), ParseError> {
        let (tag, region) = split_tag(arena.as_bytes(), token, kind);
        let node = arena.alloc_element(tag.namespace, tag.name)?;
        match self.stack.peek() {
            Some(parent) => arena.append_child(parent, node),
            None => self.tree.attach_top(arena, node),
        }

        let mut scanner = AttributeScanner::new(region);
        while let Some((name, value)) = scanner.next(arena.as_bytes())? {
            let attr = arena.alloc_attribute(name, value)?;
            arena.append_attribute(node, attr);
        }

        if kind == TokenKind::OpenTag {
            self.stack.push(node)?;
        }
        Ok(())
    }

    fn close(&mut self, arena: &mut Arena, token: Span) -> Result<(), ParseError> {
        let Some(top) = self.stack.peek() else {
            return Err(ParseError::Syntax(description::CLOSE_WITHOUT_OPEN));
        };
        let name = arena.field(top, Field::Name);
        if name.is_empty() {
            return Err(ParseError::Syntax(description::EMPTY_CLOSE_NAME));
        }
        let namespace = arena.field(top, Field::Namespace);
        if !close_tag_matches(arena.bytes(token), arena.bytes(namespace), arena.bytes(name)) {
            debug!(
                expected = arena.str(name),
                found = arena.str(token),
                "tag mismatch"
            );
            return Err(ParseError::Syntax(description::TAG_MISMATCH));
        }
        self.stack.pop();
        Ok(())
    }
}

impl TokenHandler for TreeBuilder {
    fn handle_token(
        &mut self,
        arena: &mut Arena,
        kind: TokenKind,
        token: Span,
    ) -> Result<(), ParseError> {
        match kind {
            TokenKind::Header => self.header(arena, token),
            TokenKind::OpenTag | TokenKind::EmptyElementTag => self.element(arena, kind, token),
            TokenKind::CloseTag => self.close(arena, token),
            TokenKind::Text => match self.stack.peek() {
                Some(top) => {
                    arena.set_field(top, Field::Text, token);
                    Ok(())
                }
                None => Err(ParseError::Syntax(description::TEXT_OUTSIDE_ROOT)),
            },
            TokenKind::Blank => Ok(()),
            TokenKind::Unknown => Err(ParseError::Syntax(description::UNKNOWN_TOKEN)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_tags() {
        assert!(close_tag_matches(b"</a>", b"", b"a"));
        assert!(close_tag_matches(b"</ns:a>", b"ns", b"a"));
        assert!(!close_tag_matches(b"</a>", b"ns", b"a"));
        assert!(!close_tag_matches(b"</ns:a>", b"", b"a"));
        assert!(!close_tag_matches(b"</x:a>", b"ns", b"a"));
        assert!(!close_tag_matches(b"</ab>", b"", b"a"));
        assert!(!close_tag_matches(b"</a >", b"", b"a"));
        assert!(!close_tag_matches(b"</a", b"", b"a"));
    }
}

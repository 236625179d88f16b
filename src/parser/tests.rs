/*
** This file is a part of Chunkxml (incremental XML reader/writer)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Chunkxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use super::*;

#[derive(Default)]
struct Tester {
    tokens: Vec<(TokenKind, String)>,
}

impl TokenHandler for Tester {
    fn handle_token(
        &mut self,
        arena: &mut Arena,
        kind: TokenKind,
        token: Span,
    ) -> Result<(), ParseError> {
        self.tokens.push((kind, arena.str(token).to_string()));
        Ok(())
    }
}

fn tokens_of_chunks(chunks: &[&[u8]]) -> Vec<(TokenKind, String)> {
    let mut arena = Arena::with_capacity(4096).unwrap();
    let mut tokenizer = Tokenizer::new();
    let mut tester = Tester::default();
    for chunk in chunks {
        tokenizer.parse_bytes(&mut arena, &mut tester, chunk).unwrap();
    }
    tester.tokens
}

fn check(s: &str, expected: &[(TokenKind, &str)]) {
    let expected: Vec<(TokenKind, String)> = expected
        .iter()
        .map(|(kind, text)| (*kind, text.to_string()))
        .collect();
    let bytes = s.as_bytes();

    assert_eq!(tokens_of_chunks(&[bytes]), expected);

    // every possible split point
    for i in 0..=bytes.len() {
        assert_eq!(tokens_of_chunks(&[&bytes[..i], &bytes[i..]]), expected);
    }

    // now try byte by byte
    let chunks: Vec<&[u8]> = bytes.chunks(1).collect();
    assert_eq!(tokens_of_chunks(&chunks), expected);
}

#[test]
fn tags() {
    check("<lonely/>", &[(TokenKind::EmptyElementTag, "<lonely/>")]);

    check(
        "<a><b>text</b></a>",
        &[
            (TokenKind::OpenTag, "<a>"),
            (TokenKind::OpenTag, "<b>"),
            (TokenKind::Text, "text"),
            (TokenKind::CloseTag, "</b>"),
            (TokenKind::CloseTag, "</a>"),
        ],
    );

    check(
        "<?xml version=\"1.0\"?><ns:a x='1'/>",
        &[
            (TokenKind::Header, "<?xml version=\"1.0\"?>"),
            (TokenKind::EmptyElementTag, "<ns:a x='1'/>"),
        ],
    );
}

#[test]
fn blanks_and_texts() {
    check(
        "<a>  <b/>  x y </a>",
        &[
            (TokenKind::OpenTag, "<a>"),
            (TokenKind::Blank, "  "),
            (TokenKind::EmptyElementTag, "<b/>"),
            (TokenKind::Text, "  x y "),
            (TokenKind::CloseTag, "</a>"),
        ],
    );

    // Stray delimiters
    check(
        "<a>x>y</a>",
        &[
            (TokenKind::OpenTag, "<a>"),
            (TokenKind::Text, "x>"),
            (TokenKind::Text, "y"),
            (TokenKind::CloseTag, "</a>"),
        ],
    );
    check(
        "<a</b>",
        &[(TokenKind::Text, "<a"), (TokenKind::CloseTag, "</b>")],
    );
    check("<>", &[(TokenKind::Unknown, "<>")]);
}

#[test]
fn line_breaks_are_skipped() {
    check(
        "<a\r\n  b='1'>\nline one\r\nline two\n</a>\n",
        &[
            (TokenKind::OpenTag, "<a  b='1'>"),
            (TokenKind::Text, "line oneline two"),
            (TokenKind::CloseTag, "</a>"),
        ],
    );

    check(
        "<a>\n\n<b/>\r\n</a>",
        &[
            (TokenKind::OpenTag, "<a>"),
            (TokenKind::EmptyElementTag, "<b/>"),
            (TokenKind::CloseTag, "</a>"),
        ],
    );
}

#[test]
fn utf8_split_between_chunks() {
    let s = "<ağaç>çiçek</ağaç>".as_bytes();
    let expected = vec![
        (TokenKind::OpenTag, "<ağaç>".to_string()),
        (TokenKind::Text, "çiçek".to_string()),
        (TokenKind::CloseTag, "</ağaç>".to_string()),
    ];
    for i in 0..=s.len() {
        assert_eq!(tokens_of_chunks(&[&s[..i], &s[i..]]), expected);
    }
}

#[test]
fn invalid_utf8() {
    let mut arena = Arena::with_capacity(256).unwrap();
    let mut tokenizer = Tokenizer::new();
    let mut tester = Tester::default();
    assert_eq!(
        tokenizer.parse_bytes(&mut arena, &mut tester, b"<a>\xff\xfe</a>"),
        Err(ParseError::Syntax(description::INVALID_UTF8))
    );
    assert_eq!(tester.tokens, vec![(TokenKind::OpenTag, "<a>".to_string())]);
    assert_eq!(tokenizer.location().bytes, 6);
}

#[test]
fn trailing_text_stays_pending() {
    let mut arena = Arena::with_capacity(256).unwrap();
    let mut tokenizer = Tokenizer::new();
    let mut tester = Tester::default();
    tokenizer
        .parse_bytes(&mut arena, &mut tester, b"<a/>tail")
        .unwrap();
    assert_eq!(tester.tokens.len(), 1);
    assert_eq!(arena.str(tokenizer.pending()), "tail");

    tokenizer.reset();
    assert!(tokenizer.pending().is_empty());
    assert_eq!(tokenizer.location(), Location::new());
}

#[test]
fn pending_token_survives_allocations() {
    let mut arena = Arena::with_capacity(256).unwrap();
    let mut tokenizer = Tokenizer::new();
    let mut tester = Tester::default();
    tokenizer
        .parse_bytes(&mut arena, &mut tester, b"<a>hel")
        .unwrap();
    arena.push_str(b"unrelated").unwrap();
    tokenizer
        .parse_bytes(&mut arena, &mut tester, b"lo</a>")
        .unwrap();
    assert_eq!(
        tester.tokens,
        vec![
            (TokenKind::OpenTag, "<a>".to_string()),
            (TokenKind::Text, "hello".to_string()),
            (TokenKind::CloseTag, "</a>".to_string()),
        ]
    );
}

#[test]
fn location() {
    let s = "<a>\n  <b>x</b>\n  <c/>\n</a>";
    let mut arena = Arena::with_capacity(256).unwrap();
    let mut tokenizer = Tokenizer::new();
    let mut tester = Tester::default();
    tokenizer
        .parse_bytes(&mut arena, &mut tester, s.as_bytes())
        .unwrap();
    let loc = tokenizer.location();
    assert_eq!(loc.bytes, s.len());
    assert_eq!(loc.lines, 3);
    assert_eq!(loc.column, 4);
}

#[test]
fn no_memory() {
    let mut arena = Arena::with_capacity(8).unwrap();
    let mut tokenizer = Tokenizer::new();
    let mut tester = Tester::default();
    assert_eq!(
        tokenizer.parse_bytes(&mut arena, &mut tester, b"<abcdefghij>"),
        Err(ParseError::NoMemory)
    );
    assert!(tester.tokens.is_empty());
}

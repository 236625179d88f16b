/*
** This file is a part of Chunkxml (incremental XML reader/writer)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Chunkxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

/// Syntactic kind of a complete token.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TokenKind {
    /// The `<?xml ...?>` declaration.
    Header,
    /// A start tag like `<a x="1">`.
    OpenTag,
    /// An end tag like `</a>`.
    CloseTag,
    /// A self closing tag like `<a x="1"/>`.
    EmptyElementTag,
    /// Character data between tags, or a malformed tag tolerated as text.
    Text,
    /// Character data consisting only of whitespace.
    Blank,
    /// Anything else, like `<>`.
    Unknown,
}

/// Decides the kind of a token.
///
/// A token is either everything from a `<` up to and including the next
/// `>`, or the text between two tags. The rules are checked in order:
///
/// 1. An empty token or one starting with `<>` is [Unknown](TokenKind::Unknown).
/// 2. `</...>` is a [CloseTag](TokenKind::CloseTag), `</...` without the `>` is
///    [Text](TokenKind::Text).
/// 3. `<?...?>` is the [Header](TokenKind::Header).
/// 4. `<.../>` is an [EmptyElementTag](TokenKind::EmptyElementTag), other `<...>`
///    is an [OpenTag](TokenKind::OpenTag).
/// 5. Other tokens starting with `<` are [Text](TokenKind::Text).
/// 6. Tokens not starting with `<` are [Blank](TokenKind::Blank) if they only
///    have whitespace, [Text](TokenKind::Text) otherwise.
///
/// ```
/// use chunkxml::{classify, TokenKind};
///
/// assert_eq!(classify(b"<item id=\"1\">"), TokenKind::OpenTag);
/// assert_eq!(classify(b" \t "), TokenKind::Blank);
/// ```
pub fn classify(token: &[u8]) -> TokenKind {
    let Some((&first, rest)) = token.split_first() else {
        return TokenKind::Unknown;
    };

    if first != b'<' {
        if token.iter().all(|&c| matches!(c, whitespace!())) {
            return TokenKind::Blank;
        }
        return TokenKind::Text;
    }

    let last = token[token.len() - 1];
    let before_last = token.len().checked_sub(2).map(|i| token[i]);
    match rest.first() {
        Some(b'>') => TokenKind::Unknown,
        Some(b'/') => {
            if last == b'>' {
                TokenKind::CloseTag
            } else {
                TokenKind::Text
            }
        }
        Some(b'?') if last == b'>' && before_last == Some(b'?') => TokenKind::Header,
        Some(_) if last == b'>' => {
            if before_last == Some(b'/') {
                TokenKind::EmptyElementTag
            } else {
                TokenKind::OpenTag
            }
        }
        _ => TokenKind::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknowns() {
        assert_eq!(classify(b""), TokenKind::Unknown);
        assert_eq!(classify(b"<>"), TokenKind::Unknown);
    }

    #[test]
    fn tags() {
        assert_eq!(classify(b"<a>"), TokenKind::OpenTag);
        assert_eq!(classify(b"<ns:a b=\"1\">"), TokenKind::OpenTag);
        assert_eq!(classify(b"<a/>"), TokenKind::EmptyElementTag);
        assert_eq!(classify(b"<a b=\"1\" />"), TokenKind::EmptyElementTag);
        assert_eq!(classify(b"</a>"), TokenKind::CloseTag);
        assert_eq!(classify(b"</>"), TokenKind::CloseTag);
        assert_eq!(classify(b"<a href=\"x/y\">"), TokenKind::OpenTag);
    }

    #[test]
    fn headers() {
        assert_eq!(classify(b"<?xml version=\"1.0\"?>"), TokenKind::Header);
        assert_eq!(classify(b"<?>"), TokenKind::Header);
        // Not ending with ?> makes it a plain tag
        assert_eq!(classify(b"<?xml>"), TokenKind::OpenTag);
    }

    #[test]
    fn texts() {
        assert_eq!(classify(b"hello"), TokenKind::Text);
        assert_eq!(classify(b"  hello "), TokenKind::Text);
        assert_eq!(classify(b"a>"), TokenKind::Text);
        assert_eq!(classify(b">"), TokenKind::Text);
        // Malformed tags are tolerated as text
        assert_eq!(classify(b"</a"), TokenKind::Text);
        assert_eq!(classify(b"</"), TokenKind::Text);
        assert_eq!(classify(b"<a"), TokenKind::Text);
        assert_eq!(classify(b"<"), TokenKind::Text);
    }

    #[test]
    fn blanks() {
        assert_eq!(classify(b" "), TokenKind::Blank);
        assert_eq!(classify(b" \t\r\n\x0b\x0c"), TokenKind::Blank);
        assert_eq!(classify(b" \t.\t"), TokenKind::Text);
    }
}

/*
** This file is a part of Chunkxml (incremental XML reader/writer)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Chunkxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

use memchr::memchr;

use super::ParseError;
use super::TokenKind;
use super::error::description;
use crate::Span;

/// Namespace prefix and local name of a tag.
///
/// An empty namespace span means the tag has no prefix.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TagName {
    pub namespace: Span,
    pub name: Span,
}

fn find_whitespace(bytes: &[u8], start: usize, end: usize) -> usize {
    bytes[start..end]
        .iter()
        .position(|&c| matches!(c, whitespace!()))
        .map_or(end, |i| start + i)
}

/// Splits an open or empty element tag into its name and attribute region.
///
/// `bytes` is the whole buffer the `token` span points into. The returned
/// spans point into the same buffer. Only the first `:` of the name
/// separates the namespace prefix.
pub fn split_tag(bytes: &[u8], token: Span, kind: TokenKind) -> (TagName, Span) {
    let start = (token.start() + 1).min(bytes.len());
    let mut end = token.end().saturating_sub(1);
    if kind == TokenKind::EmptyElementTag {
        end = end.saturating_sub(1);
    }
    let end = end.clamp(start, bytes.len());

    let name_end = find_whitespace(bytes, start, end);
    let tag_name = match memchr(b':', &bytes[start..name_end]) {
        Some(i) => TagName {
            namespace: Span::new(start, i),
            name: Span::new(start + i + 1, name_end - start - i - 1),
        },
        None => TagName {
            namespace: Span::EMPTY,
            name: Span::new(start, name_end - start),
        },
    };

    (tag_name, Span::new(name_end, end - name_end))
}

/// Returns the pseudo attribute region of a header token.
///
/// The `<?`, the target name (usually `xml`), and the `?>` are left out.
pub fn header_region(bytes: &[u8], token: Span) -> Span {
    let start = (token.start() + 2).min(bytes.len());
    let end = token.end().saturating_sub(2).clamp(start, bytes.len());
    let target_end = find_whitespace(bytes, start, end);

    Span::new(target_end, end - target_end)
}

/// Scans `name="value"` pairs from an attribute region.
///
/// The scanner keeps only positions, the bytes are passed to each
/// [next()](AttributeScanner::next) call so that the caller can allocate
/// into the same arena between the calls.
///
/// Values can be quoted with `"` or `'` and extend up to the matching
/// quote, or the end of the region if the quote is never closed.
/// Unquoted values extend up to the next whitespace. A name without
/// a `=` has an empty value.
pub struct AttributeScanner {
    pos: usize,
    end: usize,
}

impl AttributeScanner {
    pub fn new(region: Span) -> AttributeScanner {
        AttributeScanner {
            pos: region.start(),
            end: region.end(),
        }
    }

    fn skip_whitespace(&mut self, bytes: &[u8], end: usize) {
        while self.pos < end && matches!(bytes[self.pos], whitespace!()) {
            self.pos += 1;
        }
    }

    /// Returns the name and value spans of the next attribute.
    pub fn next(&mut self, bytes: &[u8]) -> Result<Option<(Span, Span)>, ParseError> {
        let end = self.end.min(bytes.len());
        self.skip_whitespace(bytes, end);
        if self.pos >= end {
            return Ok(None);
        }

        let name_start = self.pos;
        while self.pos < end && !matches!(bytes[self.pos], whitespace!() | b'=') {
            self.pos += 1;
        }
        let name = Span::new(name_start, self.pos - name_start);

        self.skip_whitespace(bytes, end);
        if self.pos >= end || bytes[self.pos] != b'=' {
            return Ok(Some((name, Span::EMPTY)));
        }
        if name.is_empty() {
            xml_error!(ATTRIBUTE_WITHOUT_NAME);
        }
        self.pos += 1;

        self.skip_whitespace(bytes, end);
        if self.pos >= end {
            return Ok(Some((name, Span::EMPTY)));
        }
        let value = match bytes[self.pos] {
            quote @ (b'"' | b'\'') => {
                let value_start = self.pos + 1;
                let value_end =
                    memchr(quote, &bytes[value_start..end]).map_or(end, |i| value_start + i);
                self.pos = (value_end + 1).min(end);
                Span::new(value_start, value_end - value_start)
            }
            _ => {
                let value_start = self.pos;
                self.pos = find_whitespace(bytes, value_start, end);
                Span::new(value_start, self.pos - value_start)
            }
        };

        Ok(Some((name, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span_of(bytes: &[u8], kind: TokenKind) -> (TagName, Span) {
        split_tag(bytes, Span::new(0, bytes.len()), kind)
    }

    fn text(bytes: &[u8], span: Span) -> &str {
        std::str::from_utf8(&bytes[span.start()..span.end()]).unwrap()
    }

    fn attributes(bytes: &[u8], region: Span) -> Vec<(&str, &str)> {
        let mut scanner = AttributeScanner::new(region);
        let mut result = Vec::new();
        while let Some((name, value)) = scanner.next(bytes).unwrap() {
            result.push((text(bytes, name), text(bytes, value)));
        }
        result
    }

    #[test]
    fn names() {
        let tag = b"<item>";
        let (name, attrs) = span_of(tag, TokenKind::OpenTag);
        assert!(name.namespace.is_empty());
        assert_eq!(text(tag, name.name), "item");
        assert!(attrs.is_empty());

        let tag = b"<soap:Body/>";
        let (name, attrs) = span_of(tag, TokenKind::EmptyElementTag);
        assert_eq!(text(tag, name.namespace), "soap");
        assert_eq!(text(tag, name.name), "Body");
        assert!(attrs.is_empty());

        let tag = b"<a:b:c x='1'>";
        let (name, attrs) = span_of(tag, TokenKind::OpenTag);
        assert_eq!(text(tag, name.namespace), "a");
        assert_eq!(text(tag, name.name), "b:c");
        assert_eq!(attributes(tag, attrs), vec![("x", "1")]);

        let tag = b"< a>";
        let (name, _) = span_of(tag, TokenKind::OpenTag);
        assert!(name.name.is_empty());
    }

    #[test]
    fn attribute_values() {
        let tag = b"<item id=\"1\" name=\"two words\" eq=\"a=b\"/>";
        let (_, attrs) = span_of(tag, TokenKind::EmptyElementTag);
        assert_eq!(
            attributes(tag, attrs),
            vec![("id", "1"), ("name", "two words"), ("eq", "a=b")]
        );

        let tag = b"<tag a='12\"34' b=\"123'456\" >";
        let (_, attrs) = span_of(tag, TokenKind::OpenTag);
        assert_eq!(attributes(tag, attrs), vec![("a", "12\"34"), ("b", "123'456")]);

        let tag = b"<tag a  =  '1' b  ='2' c=  '3'\td='4'>";
        let (_, attrs) = span_of(tag, TokenKind::OpenTag);
        assert_eq!(
            attributes(tag, attrs),
            vec![("a", "1"), ("b", "2"), ("c", "3"), ("d", "4")]
        );

        let tag = b"<a href=\"x/y\"/>";
        let (_, attrs) = span_of(tag, TokenKind::EmptyElementTag);
        assert_eq!(attributes(tag, attrs), vec![("href", "x/y")]);
    }

    #[test]
    fn tolerated_attributes() {
        let tag = b"<a flag other=x empty= last=\"open>";
        let (_, attrs) = span_of(tag, TokenKind::OpenTag);
        assert_eq!(
            attributes(tag, attrs),
            vec![("flag", ""), ("other", "x"), ("empty", "last=\"open")]
        );

        let tag = b"<a b=\"\">";
        let (_, attrs) = span_of(tag, TokenKind::OpenTag);
        assert_eq!(attributes(tag, attrs), vec![("b", "")]);
    }

    #[test]
    fn attribute_without_name() {
        let tag = b"<a =\"1\">";
        let (_, attrs) = span_of(tag, TokenKind::OpenTag);
        let mut scanner = AttributeScanner::new(attrs);
        assert_eq!(
            scanner.next(tag),
            Err(ParseError::Syntax(description::ATTRIBUTE_WITHOUT_NAME))
        );
    }

    #[test]
    fn headers() {
        let token = b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>";
        let region = header_region(token, Span::new(0, token.len()));
        assert_eq!(
            attributes(token, region),
            vec![("version", "1.0"), ("encoding", "UTF-8")]
        );

        let token = b"<?xml version=\"1.0\" ?>";
        let region = header_region(token, Span::new(0, token.len()));
        assert_eq!(attributes(token, region), vec![("version", "1.0")]);

        let token = b"<?>";
        let region = header_region(token, Span::new(0, token.len()));
        assert!(region.is_empty());

        let token = b"<?xml?>";
        let region = header_region(token, Span::new(0, token.len()));
        assert!(region.is_empty());
    }

    #[test]
    fn spans_are_absolute() {
        let buffer = b"junk<p:q r=\"s\">";
        let (name, attrs) = split_tag(buffer, Span::new(4, 11), TokenKind::OpenTag);
        assert_eq!(text(buffer, name.namespace), "p");
        assert_eq!(text(buffer, name.name), "q");
        assert_eq!(attributes(buffer, attrs), vec![("r", "s")]);
    }
}

/*
** This file is a part of Chunkxml (incremental XML reader/writer)
** Copyright (C) 2000-2025 Gurer Ozen
**
** Chunkxml is free software: you can redistribute it and/or modify it
** under the terms of the GNU Lesser General Public License as
** published by the Free Software Foundation, either version 3 of
** the License, or (at your option) any later version.
*/

/// # Must not compile tests
///
/// Returned Element cannot outlive the Document:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use chunkxml::Document;
/// use chunkxml::Element;
/// let e: Element;
/// {
///     let doc: Document = "<a><b/></a>".parse()?;
///     e = doc.root().unwrap();
/// }
/// println!("{}", e);
/// # Ok(())
/// # }
/// ```
///
/// Text cannot outlive the Document:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use chunkxml::Document;
/// let s: &str;
/// {
///     let doc: Document = "<a>text</a>".parse()?;
///     s = doc.text(None, "a").unwrap();
/// }
/// println!("{}", s);
/// # Ok(())
/// # }
/// ```
///
/// Document cannot be reset while an Element is borrowed:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use chunkxml::Document;
/// let mut doc: Document = "<a><b/></a>".parse()?;
/// let b = doc.find_element(None, "b").unwrap();
/// doc.reset();
/// println!("{}", b);
/// # Ok(())
/// # }
/// ```
///
/// Document cannot be changed while the serialized text is borrowed:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use chunkxml::Document;
/// let mut doc: Document = "<a/>".parse()?;
/// let xml = doc.serialize()?;
/// doc.parse_bytes(b"<b/>")?;
/// println!("{}", xml);
/// # Ok(())
/// # }
/// ```
///
/// Iterators cannot outlive the Document:
/// ```compile_fail
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use chunkxml::Document;
/// use chunkxml::Attributes;
/// let attrs: Attributes;
/// {
///     let doc: Document = "<a x='1'/>".parse()?;
///     attrs = doc.root().unwrap().attributes();
/// }
/// println!("{}", attrs.count());
/// # Ok(())
/// # }
/// ```
#[cfg(doctest)]
struct MustNotCompileTests;

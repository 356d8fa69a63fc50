//! Thin helpers over `quick_xml::Writer` for emitting package parts.

use crate::error::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::borrow::Cow;
use unicode_normalization::{is_nfc, UnicodeNormalization};

/// WordprocessingML main namespace.
pub(crate) const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Office document relationships namespace.
pub(crate) const NS_R: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Streaming XML writer for a single part.
pub(crate) struct XmlWriter {
    writer: quick_xml::Writer<Vec<u8>>,
}

impl XmlWriter {
    /// Create a writer, optionally indenting nested elements.
    pub fn new(pretty: bool) -> Self {
        let writer = if pretty {
            quick_xml::Writer::new_with_indent(Vec::new(), b' ', 2)
        } else {
            quick_xml::Writer::new(Vec::new())
        };
        Self { writer }
    }

    /// Write the standalone UTF-8 XML declaration.
    pub fn declaration(&mut self) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(())
    }

    /// Open an element.
    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.writer.write_event(Event::Start(element(name, attrs)))?;
        Ok(())
    }

    /// Write a self-closing element.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.writer.write_event(Event::Empty(element(name, attrs)))?;
        Ok(())
    }

    /// Write `<name w:val="value"/>`.
    pub fn val(&mut self, name: &str, value: &str) -> Result<()> {
        self.empty(name, &[("w:val", value)])
    }

    /// Close an element.
    pub fn end(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Write escaped character data.
    pub fn text(&mut self, text: &str) -> Result<()> {
        let clean = xml_safe(text);
        self.writer.write_event(Event::Text(BytesText::new(&clean)))?;
        Ok(())
    }

    /// Write `<name attrs>text</name>`.
    pub fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    /// Consume the writer and return the part bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

/// Start tag with every attribute value made XML-safe.
fn element<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut elem = BytesStart::new(name);
    for &(key, value) in attrs {
        elem.push_attribute((key, xml_safe(value).as_ref()));
    }
    elem
}

/// Normalize run text to NFC and drop characters that XML 1.0 forbids.
pub(crate) fn sanitize_text(text: &str) -> String {
    text.nfc().filter(|&c| is_xml_char(c)).collect()
}

/// [`sanitize_text`], borrowing when the input is already clean.
fn xml_safe(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) && is_nfc(text) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(sanitize_text(text))
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

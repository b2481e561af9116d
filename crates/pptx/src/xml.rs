//! Small helpers over quick-xml shared by the writer and the parser.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use slide_tables_core::{Error, Result};

/// Buffered XML writer producing one package part.
pub(crate) struct XmlBuilder {
    writer: Writer<Vec<u8>>,
}

impl XmlBuilder {
    /// Start a part with the standard standalone XML declaration.
    pub fn new() -> Result<Self> {
        let mut writer = Writer::new(Vec::with_capacity(4096));
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_error)?;
        Ok(Self { writer })
    }

    /// Write a start tag.
    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Start(elem)).map_err(xml_error)
    }

    /// Write a self-closing element.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let elem = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Empty(elem)).map_err(xml_error)
    }

    /// Write an end tag.
    pub fn end(&mut self, name: &str) -> Result<()> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_error)
    }

    /// Write escaped text content.
    pub fn text(&mut self, content: &str) -> Result<()> {
        self.writer
            .write_event(Event::Text(BytesText::new(content)))
            .map_err(xml_error)
    }

    /// Write `<name attrs>text</name>`.
    pub fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], content: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.text(content)?;
        self.end(name)
    }

    /// Finish the part and return its bytes.
    pub fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}

pub(crate) fn xml_error(e: quick_xml::Error) -> Error {
    Error::XmlError(e.to_string())
}

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_escapes_text_and_attributes() {
        let mut xml = XmlBuilder::new().unwrap();
        xml.start("a:p", &[("algn", "ctr")]).unwrap();
        xml.empty("a:rPr", &[("lang", "en-US"), ("alt", "<&>")]).unwrap();
        xml.text_element("a:t", &[], "R&D <x>").unwrap();
        xml.end("a:p").unwrap();

        let out = String::from_utf8(xml.finish()).unwrap();
        assert!(out.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
        assert!(out.ends_with(
            r#"<a:p algn="ctr"><a:rPr lang="en-US" alt="&lt;&amp;&gt;"/><a:t>R&amp;D &lt;x&gt;</a:t></a:p>"#
        ));
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }
}

//! Shared XML/HTML reader and writer helpers.

use anyhow::Result;
use quick_xml::{
    Reader, Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};
use std::io::{Cursor, Write};

pub type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// Create a writer over a fresh in-memory buffer.
#[inline]
pub fn create_xml_writer(capacity: usize) -> XmlWriter {
    Writer::new(Cursor::new(Vec::with_capacity(capacity)))
}

#[inline]
pub fn create_xml_reader(content: &[u8]) -> Reader<&[u8]> {
    let mut reader = Reader::from_reader(content);
    reader.config_mut().trim_text(false);
    reader.config_mut().enable_all_checks(false);
    reader
}

/// Consume the writer and return the produced bytes.
#[inline]
pub fn into_bytes(writer: XmlWriter) -> Vec<u8> {
    writer.into_inner().into_inner()
}

/// Write a start tag with attributes: `<tag attr="val" ...>`.
#[inline]
pub fn write_start(writer: &mut XmlWriter, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut elem = BytesStart::new(tag);
    for (k, v) in attrs {
        elem.push_attribute((*k, *v));
    }
    writer.write_event(Event::Start(elem))?;
    Ok(())
}

/// Write a closing tag: `</tag>`.
#[inline]
pub fn write_end(writer: &mut XmlWriter, tag: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Write a text element: `<tag>text</tag>`.
#[inline]
pub fn write_text_element(writer: &mut XmlWriter, tag: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(tag)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Write a text element with attributes: `<tag attr="val">text</tag>`.
pub fn write_text_element_with(
    writer: &mut XmlWriter,
    tag: &str,
    attrs: &[(&str, &str)],
    text: &str,
) -> Result<()> {
    let mut elem = BytesStart::new(tag);
    for (k, v) in attrs {
        elem.push_attribute((*k, *v));
    }
    writer.write_event(Event::Start(elem))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

/// Write an empty element with attributes: `<tag attr1="val1" ... />`.
#[inline]
pub fn write_empty_elem(writer: &mut XmlWriter, tag: &str, attrs: &[(&str, &str)]) -> Result<()> {
    let mut elem = BytesStart::new(tag);
    for (k, v) in attrs {
        elem.push_attribute((*k, *v));
    }
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

/// Write a script element whose body must not be entity-escaped
/// (JSON-LD payloads break if quotes become `&quot;`).
pub fn write_inline_script(
    writer: &mut XmlWriter,
    attrs: &[(&str, &str)],
    body: &str,
) -> Result<()> {
    let mut elem = BytesStart::new("script");
    for (k, v) in attrs {
        elem.push_attribute((*k, *v));
    }
    writer.write_event(Event::Start(elem))?;
    writer.write_event(Event::Text(BytesText::from_escaped(body)))?;
    writer.write_event(Event::End(BytesEnd::new("script")))?;
    Ok(())
}

/// Write pre-serialized markup verbatim (trusted input).
#[inline]
pub fn write_raw(writer: &mut XmlWriter, raw: &str) -> Result<()> {
    writer.get_mut().write_all(raw.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render<F: FnOnce(&mut XmlWriter) -> Result<()>>(f: F) -> String {
        let mut writer = create_xml_writer(64);
        f(&mut writer).unwrap();
        String::from_utf8(into_bytes(writer)).unwrap()
    }

    #[test]
    fn test_write_text_element() {
        let out = render(|w| write_text_element(w, "title", "Contact - Agency"));
        assert_eq!(out, "<title>Contact - Agency</title>");
    }

    #[test]
    fn test_write_text_element_escapes() {
        let out = render(|w| write_text_element(w, "title", "Vins & Domaines"));
        assert_eq!(out, "<title>Vins &amp; Domaines</title>");
    }

    #[test]
    fn test_write_empty_elem() {
        let out = render(|w| {
            write_empty_elem(w, "meta", &[("name", "description"), ("content", "Reach us")])
        });
        assert_eq!(out, r#"<meta name="description" content="Reach us"/>"#);
    }

    #[test]
    fn test_write_inline_script_keeps_body_raw() {
        let out = render(|w| {
            write_inline_script(
                w,
                &[("type", "application/ld+json")],
                r#"{"@type":"Organization","name":"A & B"}"#,
            )
        });
        assert!(out.contains(r#"{"@type":"Organization","name":"A & B"}"#));
        assert!(!out.contains("&quot;"));
    }

    #[test]
    fn test_write_raw_passthrough() {
        let out = render(|w| write_raw(w, "<!-- keep me -->"));
        assert_eq!(out, "<!-- keep me -->");
    }
}

//! HTML document model backing the head store.
//!
//! A page is parsed once into prologue / head / epilogue. Inside the head,
//! tags the synchronizer can address (`meta[name]`, `meta[property]`,
//! `link[rel=canonical]`, managed JSON-LD) become keyed nodes; everything
//! else (charset meta, styles, comments, static JSON-LD, whitespace) is
//! carried through verbatim, in order. Serialization writes keyed nodes
//! back in their original positions and appends newly created ones before
//! `</head>`.
//!
//! A document without a `<head>` element parses successfully with no head
//! section; synchronizing it is a no-op.

use super::MANAGED_DATA_ATTR;
use super::store::HeadStore;
use super::tags::{MetaIdent, TagKey, TagSpec};
use crate::utils::xml::{
    create_xml_reader, create_xml_writer, into_bytes, write_empty_elem, write_inline_script,
    write_raw, write_text_element,
};
use anyhow::{Context, Result, bail};
use compact_str::CompactString;
use quick_xml::events::{BytesStart, Event};

const JSON_LD_TYPE: &str = "application/ld+json";

/// One node of the head section, in document order.
#[derive(Debug, Clone)]
enum HeadNode {
    Title(String),
    Tag { key: TagKey, spec: TagSpec },
    /// Body of a dynamically managed JSON-LD block.
    Data(String),
    /// Verbatim markup this module does not manage.
    Raw(String),
}

/// The mutable head of a parsed document.
#[derive(Debug, Clone, Default)]
pub struct HeadSection {
    nodes: Vec<HeadNode>,
}

/// A parsed HTML document: raw prologue, keyed head, raw epilogue.
#[derive(Debug, Clone)]
pub struct Document {
    prologue: String,
    head: Option<HeadSection>,
    epilogue: String,
}

impl Document {
    /// Parse an HTML document.
    ///
    /// The parse is lossless for everything outside the keyed tags: a
    /// document that is never synchronized serializes back byte-for-byte
    /// (modulo self-closing normalization of keyed tags).
    pub fn parse(content: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(content).context("Document is not valid UTF-8")?;
        let mut reader = create_xml_reader(content);
        let mut pos = 0usize;

        // Everything up to and including the <head> start tag.
        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => bail!(
                    "HTML parse error at position {}: {:?}",
                    reader.error_position(),
                    e
                ),
            };
            let end = reader.buffer_position() as usize;

            match event {
                Event::Start(ref e) if e.name().as_ref() == b"head" => {
                    let prologue = text[..end].to_owned();
                    let (head, epilogue) = parse_head(&mut reader, text, end)?;
                    return Ok(Self {
                        prologue,
                        head: Some(head),
                        epilogue,
                    });
                }
                // `<head/>`: normalize to an empty open/close pair so tags
                // can still be appended into it.
                Event::Empty(ref e) if e.name().as_ref() == b"head" => {
                    return Ok(Self {
                        prologue: format!("{}<head>", &text[..pos]),
                        head: Some(HeadSection::default()),
                        epilogue: format!("</head>{}", &text[end..]),
                    });
                }
                Event::Eof => {
                    return Ok(Self {
                        prologue: text.to_owned(),
                        head: None,
                        epilogue: String::new(),
                    });
                }
                _ => {}
            }
            pos = end;
        }
    }

    pub fn head(&self) -> Option<&HeadSection> {
        self.head.as_ref()
    }

    pub fn head_mut(&mut self) -> Option<&mut HeadSection> {
        self.head.as_mut()
    }

    /// Write the document back out.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let capacity = self.prologue.len() + self.epilogue.len() + 1024;
        let mut writer = create_xml_writer(capacity);

        write_raw(&mut writer, &self.prologue)?;
        if let Some(head) = &self.head {
            for node in &head.nodes {
                match node {
                    HeadNode::Title(title) => write_text_element(&mut writer, "title", title)?,
                    HeadNode::Tag { key, spec } => match key {
                        TagKey::Meta { ident, value } => write_empty_elem(
                            &mut writer,
                            "meta",
                            &[(ident.attr(), value.as_str()), ("content", &spec.value)],
                        )?,
                        TagKey::Link { rel } => write_empty_elem(
                            &mut writer,
                            "link",
                            &[("rel", rel.as_str()), ("href", &spec.value)],
                        )?,
                    },
                    HeadNode::Data(json) => write_inline_script(
                        &mut writer,
                        &[("type", JSON_LD_TYPE), (MANAGED_DATA_ATTR, "true")],
                        json,
                    )?,
                    HeadNode::Raw(raw) => write_raw(&mut writer, raw)?,
                }
            }
        }
        write_raw(&mut writer, &self.epilogue)?;

        Ok(into_bytes(writer))
    }
}

/// Parse head content; returns the section and the epilogue starting at
/// `</head>`.
fn parse_head(
    reader: &mut quick_xml::Reader<&[u8]>,
    text: &str,
    mut pos: usize,
) -> Result<(HeadSection, String)> {
    let mut section = HeadSection::default();

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => bail!(
                "HTML parse error at position {}: {:?}",
                reader.error_position(),
                e
            ),
        };
        let end = reader.buffer_position() as usize;

        match event {
            Event::End(ref e) if e.name().as_ref() == b"head" => {
                return Ok((section, text[pos..].to_owned()));
            }
            Event::Start(ref e) | Event::Empty(ref e) if e.name().as_ref() == b"meta" => {
                match parse_keyed_meta(e) {
                    Some((key, spec)) if section.get(&key).is_none() => {
                        section.nodes.push(HeadNode::Tag { key, spec });
                    }
                    // charset/http-equiv metas, or a duplicate key:
                    // carried through untouched.
                    _ => section.nodes.push(HeadNode::Raw(text[pos..end].to_owned())),
                }
            }
            Event::Start(ref e) | Event::Empty(ref e) if e.name().as_ref() == b"link" => {
                match parse_canonical_link(e) {
                    Some((key, spec)) if section.get(&key).is_none() => {
                        section.nodes.push(HeadNode::Tag { key, spec });
                    }
                    _ => section.nodes.push(HeadNode::Raw(text[pos..end].to_owned())),
                }
            }
            Event::Start(ref e) if e.name().as_ref() == b"title" => {
                let title = read_title_text(reader)?;
                section.nodes.push(HeadNode::Title(title));
            }
            Event::Empty(ref e) if e.name().as_ref() == b"title" => {
                section.nodes.push(HeadNode::Title(String::new()));
            }
            Event::Start(ref e) if e.name().as_ref() == b"script" && is_managed_data(e) => {
                let body = read_script_body(reader)?;
                section.nodes.push(HeadNode::Data(body));
            }
            Event::Start(ref e) => {
                // Unmanaged element with content (style, plain script,
                // static JSON-LD): skip to its end tag and keep the whole
                // span verbatim.
                reader
                    .read_to_end(e.name())
                    .context("Unclosed element in head")?;
                let span_end = reader.buffer_position() as usize;
                section.nodes.push(HeadNode::Raw(text[pos..span_end].to_owned()));
            }
            Event::Eof => {
                // Head never closed; treat the remainder as head content.
                return Ok((section, String::new()));
            }
            _ => section.nodes.push(HeadNode::Raw(text[pos..end].to_owned())),
        }
        pos = reader.buffer_position() as usize;
    }
}

fn read_title_text(reader: &mut quick_xml::Reader<&[u8]>) -> Result<String> {
    let mut title = String::new();
    loop {
        match reader.read_event() {
            Ok(Event::Text(text)) => {
                title.push_str(&unescape_entities(&String::from_utf8_lossy(text.as_ref())));
            }
            // Entity references come through as separate events.
            Ok(Event::GeneralRef(entity)) => {
                let name = String::from_utf8_lossy(entity.as_ref()).into_owned();
                title.push_str(&unescape_entities(&format!("&{name};")));
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"title" => return Ok(title),
            Ok(Event::Eof) => bail!("Unclosed <title> element"),
            Ok(_) => {}
            Err(e) => bail!("HTML parse error in <title>: {e:?}"),
        }
    }
}

fn read_script_body(reader: &mut quick_xml::Reader<&[u8]>) -> Result<String> {
    let mut body = String::new();
    loop {
        match reader.read_event() {
            Ok(Event::Text(text)) => body.push_str(&String::from_utf8_lossy(text.as_ref())),
            Ok(Event::CData(cdata)) => body.push_str(&String::from_utf8_lossy(cdata.as_ref())),
            Ok(Event::GeneralRef(entity)) => {
                body.push('&');
                body.push_str(&String::from_utf8_lossy(entity.as_ref()));
                body.push(';');
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"script" => {
                return Ok(body.trim().to_owned());
            }
            Ok(Event::Eof) => bail!("Unclosed <script> element"),
            Ok(_) => {}
            Err(e) => bail!("HTML parse error in <script>: {e:?}"),
        }
    }
}

/// Extract the lookup key from a `meta` tag carrying `name` or `property`.
fn parse_keyed_meta(elem: &BytesStart<'_>) -> Option<(TagKey, TagSpec)> {
    let mut ident = None;
    let mut content = CompactString::default();

    for attr in elem.attributes().flatten() {
        let value = attr_value(&attr);
        match attr.key.as_ref() {
            b"name" if ident.is_none() => ident = Some((MetaIdent::Name, value)),
            b"property" if ident.is_none() => ident = Some((MetaIdent::Property, value)),
            b"content" => content = value,
            _ => {}
        }
    }

    let (ident, value) = ident?;
    Some((TagKey::Meta { ident, value }, TagSpec { value: content }))
}

/// Only `rel="canonical"` links are keyed; stylesheets, icons and
/// preloads may repeat their `rel` and stay untouched.
fn parse_canonical_link(elem: &BytesStart<'_>) -> Option<(TagKey, TagSpec)> {
    let mut is_canonical = false;
    let mut href = CompactString::default();

    for attr in elem.attributes().flatten() {
        match attr.key.as_ref() {
            b"rel" => is_canonical = attr_value(&attr) == "canonical",
            b"href" => href = attr_value(&attr),
            _ => {}
        }
    }

    is_canonical.then(|| (TagKey::canonical(), TagSpec { value: href }))
}

fn is_managed_data(elem: &BytesStart<'_>) -> bool {
    let mut is_json_ld = false;
    let mut is_managed = false;

    for attr in elem.attributes().flatten() {
        match attr.key.as_ref() {
            b"type" => is_json_ld = attr_value(&attr) == JSON_LD_TYPE,
            key if key == MANAGED_DATA_ATTR.as_bytes() => {
                is_managed = attr_value(&attr) == "true";
            }
            _ => {}
        }
    }

    is_json_ld && is_managed
}

fn attr_value(attr: &quick_xml::events::attributes::Attribute<'_>) -> CompactString {
    unescape_entities(&String::from_utf8_lossy(&attr.value)).into()
}

/// Resolve the five predefined entities plus numeric references.
fn unescape_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_owned();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(i) = rest.find('&') {
        out.push_str(&rest[..i]);
        rest = &rest[i..];

        let Some(end) = rest.find(';') else {
            out.push_str(rest);
            rest = "";
            break;
        };
        let entity = &rest[1..end];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                u32::from_str_radix(&entity[2..], 16)
                    .ok()
                    .and_then(char::from_u32)
            }
            _ if entity.starts_with('#') => entity[1..].parse().ok().and_then(char::from_u32),
            _ => None,
        };
        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

impl HeadStore for HeadSection {
    fn title(&self) -> Option<&str> {
        self.nodes.iter().find_map(|node| match node {
            HeadNode::Title(title) => Some(title.as_str()),
            _ => None,
        })
    }

    fn set_title(&mut self, title: &str) {
        for node in &mut self.nodes {
            if let HeadNode::Title(existing) = node {
                *existing = title.to_owned();
                return;
            }
        }
        self.nodes.push(HeadNode::Title(title.to_owned()));
    }

    fn get(&self, key: &TagKey) -> Option<&TagSpec> {
        self.nodes.iter().find_map(|node| match node {
            HeadNode::Tag { key: k, spec } if k == key => Some(spec),
            _ => None,
        })
    }

    fn upsert(&mut self, key: TagKey, spec: TagSpec) {
        for node in &mut self.nodes {
            if let HeadNode::Tag { key: k, spec: existing } = node
                && *k == key
            {
                *existing = spec;
                return;
            }
        }
        self.nodes.push(HeadNode::Tag { key, spec });
    }

    fn remove(&mut self, key: &TagKey) -> bool {
        let before = self.nodes.len();
        self.nodes
            .retain(|node| !matches!(node, HeadNode::Tag { key: k, .. } if k == key));
        self.nodes.len() != before
    }

    fn keys(&self) -> Vec<TagKey> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                HeadNode::Tag { key, .. } => Some(key.clone()),
                _ => None,
            })
            .collect()
    }

    fn data_blocks(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                HeadNode::Data(json) => Some(json.as_str()),
                _ => None,
            })
            .collect()
    }

    fn replace_data_blocks(&mut self, json: Option<&str>) {
        self.nodes.retain(|node| !matches!(node, HeadNode::Data(_)));
        if let Some(json) = json {
            self.nodes.push(HeadNode::Data(json.to_owned()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::head::reconcile::SyncPolicy;
    use crate::head::sync::{Outcome, SyncEngine};
    use crate::seo::SeoData;

    const SHELL: &str = "<!DOCTYPE html>\n<html lang=\"fr\">\n<head>\n\
        <meta charset=\"utf-8\"/>\n\
        <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\"/>\n\
        <title>Agency</title>\n\
        <meta name=\"description\" content=\"Old description\"/>\n\
        <!-- hand-written -->\n\
        </head>\n<body><p>Hello</p></body>\n</html>";

    fn parse(content: &str) -> Document {
        Document::parse(content.as_bytes()).unwrap()
    }

    fn html_of(doc: &Document) -> String {
        String::from_utf8(doc.serialize().unwrap()).unwrap()
    }

    #[test]
    fn test_round_trip_preserves_unmanaged_content() {
        let doc = parse(SHELL);
        let out = html_of(&doc);

        assert!(out.contains("<!DOCTYPE html>"));
        assert!(out.contains(r#"<meta charset="utf-8"/>"#));
        assert!(out.contains("<!-- hand-written -->"));
        assert!(out.contains("<p>Hello</p>"));
        assert!(out.contains("<title>Agency</title>"));
    }

    #[test]
    fn test_parse_indexes_keyed_tags() {
        let doc = parse(SHELL);
        let head = doc.head().unwrap();

        assert_eq!(head.title(), Some("Agency"));
        assert_eq!(
            head.get(&TagKey::name("description")).unwrap().value,
            "Old description"
        );
        assert_eq!(
            head.get(&TagKey::name("viewport")).unwrap().value,
            "width=device-width, initial-scale=1.0"
        );
    }

    #[test]
    fn test_upsert_updates_existing_tag_in_place() {
        let mut doc = parse(SHELL);
        let head = doc.head_mut().unwrap();
        head.upsert(TagKey::name("description"), TagSpec::new("New description"));

        let out = html_of(&doc);
        assert_eq!(out.matches("name=\"description\"").count(), 1);
        assert!(out.contains(r#"content="New description""#));
        // Updated in place: still before the hand-written comment.
        assert!(
            out.find("New description").unwrap() < out.find("hand-written").unwrap()
        );
    }

    #[test]
    fn test_new_tags_append_before_head_close() {
        let mut doc = parse(SHELL);
        doc.head_mut()
            .unwrap()
            .upsert(TagKey::canonical(), TagSpec::new("https://example.com/"));

        let out = html_of(&doc);
        let canonical = out.find(r#"rel="canonical""#).unwrap();
        assert!(canonical > out.find("hand-written").unwrap());
        assert!(canonical < out.find("</head>").unwrap());
    }

    #[test]
    fn test_document_without_head_is_detached() {
        let content = "<p>fragment without head</p>";
        let mut doc = parse(content);
        assert!(doc.head().is_none());

        let engine = SyncEngine::new(SyncPolicy::Upsert);
        let seo = SeoData {
            title: Some("T".to_owned()),
            ..Default::default()
        };
        let outcome = engine.synchronize_document(&mut doc, &seo).unwrap();

        assert_eq!(outcome, Outcome::Detached);
        assert_eq!(html_of(&doc), content);
    }

    #[test]
    fn test_static_json_ld_is_never_touched() {
        let content = "<html><head>\
            <script type=\"application/ld+json\">{\"static\":true}</script>\
            <script type=\"application/ld+json\" data-dynamic=\"true\">{\"old\":1}</script>\
            </head><body></body></html>";
        let mut doc = parse(content);

        let head = doc.head_mut().unwrap();
        assert_eq!(head.data_blocks(), vec![r#"{"old":1}"#]);

        head.replace_data_blocks(Some(r#"{"new":2}"#));
        let out = html_of(&doc);

        assert!(out.contains(r#"{"static":true}"#));
        assert!(out.contains(r#"{"new":2}"#));
        assert!(!out.contains(r#"{"old":1}"#));
        assert_eq!(out.matches("data-dynamic").count(), 1);
    }

    #[test]
    fn test_empty_head_element() {
        let mut doc = parse("<html><head/><body></body></html>");
        doc.head_mut().unwrap().set_title("T");

        let out = html_of(&doc);
        assert!(out.contains("<head><title>T</title></head>"));
    }

    #[test]
    fn test_attribute_entities_round_trip() {
        let content = "<html><head>\
            <meta name=\"description\" content=\"Vins &amp; Domaines\"/>\
            </head><body></body></html>";
        let doc = parse(content);

        assert_eq!(
            doc.head().unwrap().get(&TagKey::name("description")).unwrap().value,
            "Vins & Domaines"
        );
        assert!(html_of(&doc).contains("Vins &amp; Domaines"));
    }

    #[test]
    fn test_engine_synchronize_document_end_to_end() {
        let mut doc = parse(SHELL);
        let engine = SyncEngine::new(SyncPolicy::Upsert);
        let seo = SeoData {
            title: Some("Contact - Agency".to_owned()),
            description: Some("Reach us".to_owned()),
            keywords: vec!["contact".to_owned(), "agency".to_owned()],
            canonical: Some("https://example.com/contact".to_owned()),
            ..Default::default()
        };

        engine.synchronize_document(&mut doc, &seo).unwrap();
        let once = html_of(&doc);
        engine.synchronize_document(&mut doc, &seo).unwrap();
        let twice = html_of(&doc);

        assert_eq!(once, twice);
        assert!(once.contains("<title>Contact - Agency</title>"));
        assert!(once.contains(r#"content="Reach us""#));
        assert!(once.contains(r#"content="contact, agency""#));
        assert!(once.contains(r#"href="https://example.com/contact""#));
        assert_eq!(once.matches("name=\"description\"").count(), 1);
    }

    #[test]
    fn test_unescape_entities() {
        assert_eq!(unescape_entities("plain"), "plain");
        assert_eq!(unescape_entities("a &amp; b"), "a & b");
        assert_eq!(unescape_entities("&lt;x&gt;"), "<x>");
        assert_eq!(unescape_entities("&#233;"), "é");
        assert_eq!(unescape_entities("&#xE9;"), "é");
        assert_eq!(unescape_entities("&unknown;"), "&unknown;");
        assert_eq!(unescape_entities("dangling &"), "dangling &");
    }
}

//! Page rendering.
//!
//! Every route renders through the same pipeline: a shell document with
//! the static base head (charset, viewport, robots, author) and the full
//! body, then exactly one head-synchronization pass stamps the route's
//! SEO metadata into it. Duplicate-free heads across rebuilds are the
//! synchronizer's invariant, not the renderer's.

pub mod pages;

use crate::config::SiteConfig;
use crate::content::SiteContent;
use crate::head::{Document, SyncEngine};
use crate::seo::routes::{Route, seo_for};
use crate::utils::xml::{
    create_xml_writer, into_bytes, write_empty_elem, write_end, write_raw, write_start,
    write_text_element,
};
use anyhow::Result;

/// Render the complete HTML document for one route.
pub fn render_route(
    route: &Route,
    config: &SiteConfig,
    content: &SiteContent,
    engine: &SyncEngine,
) -> Result<Vec<u8>> {
    let shell = render_shell(route, config, content)?;
    let mut doc = Document::parse(&shell)?;

    let seo = seo_for(route, config, content);
    engine.synchronize_document(&mut doc, &seo)?;

    doc.serialize()
}

/// The document shell: base head plus the rendered body.
fn render_shell(route: &Route, config: &SiteConfig, content: &SiteContent) -> Result<Vec<u8>> {
    let mut writer = create_xml_writer(4096);

    write_raw(&mut writer, "<!DOCTYPE html>\n")?;
    write_start(&mut writer, "html", &[("lang", &config.base.language)])?;

    write_start(&mut writer, "head", &[])?;
    write_empty_elem(&mut writer, "meta", &[("charset", "utf-8")])?;
    write_empty_elem(
        &mut writer,
        "meta",
        &[
            ("name", "viewport"),
            ("content", "width=device-width, initial-scale=1.0"),
        ],
    )?;
    write_empty_elem(
        &mut writer,
        "meta",
        &[("name", "robots"), ("content", &config.seo.robots)],
    )?;
    write_empty_elem(
        &mut writer,
        "meta",
        &[("name", "author"), ("content", &config.base.author)],
    )?;
    write_end(&mut writer, "head")?;

    write_start(&mut writer, "body", &[])?;
    pages::write_header(&mut writer, config, content)?;
    write_start(&mut writer, "main", &[])?;
    pages::write_body(&mut writer, route, config, content)?;
    write_end(&mut writer, "main")?;
    write_footer(&mut writer, config, content)?;
    write_end(&mut writer, "body")?;

    write_end(&mut writer, "html")?;

    Ok(into_bytes(writer))
}

fn write_footer(
    writer: &mut crate::utils::xml::XmlWriter,
    config: &SiteConfig,
    content: &SiteContent,
) -> Result<()> {
    write_start(writer, "footer", &[])?;

    if !config.base.copyright.is_empty() {
        write_text_element(writer, "p", &config.base.copyright)?;
    }

    if !content.legal.is_empty() {
        write_start(writer, "nav", &[("aria-label", "legal")])?;
        write_start(writer, "ul", &[])?;
        for page in &content.legal {
            let href = crate::seo::routes::url_path(config, &format!("/{}/", page.slug));
            write_start(writer, "li", &[])?;
            crate::utils::xml::write_text_element_with(
                writer,
                "a",
                &[("href", &href)],
                &page.title,
            )?;
            write_end(writer, "li")?;
        }
        write_end(writer, "ul")?;
        write_end(writer, "nav")?;
    }

    write_end(writer, "footer")?;
    Ok(())
}

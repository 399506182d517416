//! Sitemap generation.
//!
//! Generates a sitemap.xml file listing all pages for search engine
//! indexing.
//!
//! # Sitemap Format
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/</loc>
//!     <lastmod>2026-01-01</lastmod>
//!   </url>
//! </urlset>
//! ```

use crate::config::SiteConfig;
use crate::content::store::{PageRecord, SITE_PAGES};
use crate::log;
use crate::utils::minify;
use anyhow::{Context, Result};
use std::fs;

/// XML namespace for sitemap
const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Build sitemap if enabled in config.
///
/// Uses the page records collected during the build instead of
/// re-scanning the output directory.
pub fn build_sitemap(config: &SiteConfig) -> Result<()> {
    if config.build.sitemap.enable {
        let sitemap = Sitemap::from_records(&SITE_PAGES.all());
        sitemap.write(config)?;
    }
    Ok(())
}

/// Sitemap data structure
struct Sitemap {
    /// List of URL entries
    urls: Vec<UrlEntry>,
}

/// Single URL entry in the sitemap
struct UrlEntry {
    /// Full URL location
    loc: String,
    /// Last modification date (optional, YYYY-MM-DD format)
    lastmod: Option<String>,
}

impl Sitemap {
    /// Build sitemap from collected page records.
    fn from_records(records: &[PageRecord]) -> Self {
        let urls = records
            .iter()
            .map(|record| UrlEntry {
                loc: record.full_url.clone(),
                lastmod: record.lastmod.clone(),
            })
            .collect();

        Self { urls }
    }

    /// Generate sitemap XML string.
    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
        xml.push('\n');

        for entry in self.urls {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
            if let Some(lastmod) = entry.lastmod {
                xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
            }
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    /// Write sitemap to the output directory.
    fn write(self, config: &SiteConfig) -> Result<()> {
        let sitemap_path = config.output_root().join(&config.build.sitemap.path);
        let xml = self.into_xml();
        let xml = minify::xml(xml.as_bytes(), config);

        if let Some(parent) = sitemap_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&sitemap_path, &*xml)
            .with_context(|| format!("Failed to write sitemap to {}", sitemap_path.display()))?;

        log!("sitemap"; "{}", config.build.sitemap.path.display());
        Ok(())
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(full_url: &str, lastmod: Option<&str>) -> PageRecord {
        PageRecord {
            url_path: "/".to_string(),
            full_url: full_url.to_string(),
            title: "Test".to_string(),
            lastmod: lastmod.map(str::to_owned),
        }
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("hello"), "hello");
        assert_eq!(escape_xml("<test>"), "&lt;test&gt;");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml(r#"say "hi""#), "say &quot;hi&quot;");
        assert_eq!(escape_xml("it's"), "it&apos;s");
    }

    #[test]
    fn test_sitemap_empty() {
        let sitemap = Sitemap::from_records(&[]);
        let xml = sitemap.into_xml();

        assert!(xml.contains(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#)));
        assert!(xml.contains("</urlset>"));
        assert!(!xml.contains("<url>"));
    }

    #[test]
    fn test_sitemap_single_page() {
        let sitemap =
            Sitemap::from_records(&[record("https://example.com/", Some("2026-08-06"))]);
        let xml = sitemap.into_xml();

        assert!(xml.contains("<url>"));
        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert!(xml.contains("<lastmod>2026-08-06</lastmod>"));
        assert!(xml.contains("</url>"));
    }

    #[test]
    fn test_sitemap_multiple_pages() {
        let sitemap = Sitemap::from_records(&[
            record("https://example.com/", Some("2026-08-06")),
            record("https://example.com/services/", Some("2026-08-06")),
            record("https://example.com/contact/", None),
        ]);
        let xml = sitemap.into_xml();

        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert!(xml.contains("<loc>https://example.com/services/</loc>"));
        assert!(xml.contains("<loc>https://example.com/contact/</loc>"));
        assert_eq!(xml.matches("<url>").count(), 3);
        assert_eq!(xml.matches("</url>").count(), 3);
    }

    #[test]
    fn test_sitemap_without_lastmod() {
        let sitemap = Sitemap::from_records(&[record("https://example.com/", None)]);
        let xml = sitemap.into_xml();

        assert!(xml.contains("<loc>https://example.com/</loc>"));
        assert!(!xml.contains("<lastmod>"));
    }

    #[test]
    fn test_sitemap_escapes_special_chars() {
        let sitemap =
            Sitemap::from_records(&[record("https://example.com/search?q=a&b=c", None)]);
        let xml = sitemap.into_xml();

        assert!(xml.contains("<loc>https://example.com/search?q=a&amp;b=c</loc>"));
    }

    #[test]
    fn test_sitemap_xml_structure() {
        let sitemap =
            Sitemap::from_records(&[record("https://example.com/", Some("2026-08-06"))]);
        let xml = sitemap.into_xml();

        let lines: Vec<&str> = xml.lines().collect();
        assert_eq!(lines[0], r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        assert!(lines[1].starts_with("<urlset"));
        assert!(lines.last().unwrap().trim() == "</urlset>");
    }
}

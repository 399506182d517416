//! Per-page SEO metadata.
//!
//! A [`SeoData`] value is produced fresh for every page render, handed to
//! the head synchronizer, and discarded; the head tags it produced belong
//! to the document afterwards. No field is required — an empty value is a
//! valid (no-op) input.

pub mod routes;

use anyhow::Result;
use serde_json::Value;

/// Separator used when joining `keywords` into one tag value.
pub const KEYWORD_SEPARATOR: &str = ", ";

/// Structured description of one page's SEO intent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeoData {
    /// Document title. Absent leaves the current title untouched.
    pub title: Option<String>,
    pub description: Option<String>,
    /// Joined with [`KEYWORD_SEPARATOR`]; empty emits no tag.
    pub keywords: Vec<String>,
    /// Absolute canonical URL.
    pub canonical: Option<String>,
    pub open_graph: Option<OpenGraphData>,
    pub twitter: Option<TwitterData>,
    /// One logical JSON-LD block.
    pub structured_data: Option<Value>,
}

impl SeoData {
    /// Attach structured data from any serializable value.
    ///
    /// This is where a non-serializable payload fails — a programming
    /// error in the calling page, surfaced before synchronization runs.
    pub fn set_structured_data<T: serde::Serialize>(&mut self, data: &T) -> Result<()> {
        self.structured_data = Some(serde_json::to_value(data)?);
        Ok(())
    }

    /// True when synchronizing this value would touch nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.keywords.is_empty()
            && self.canonical.is_none()
            && self.open_graph.is_none()
            && self.twitter.is_none()
            && self.structured_data.is_none()
    }
}

/// Open Graph record. `title`/`description` fall back to the top-level
/// fields; `url` and `image` never fall back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OpenGraphData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    /// `og:type` (`website`, `article`, …).
    pub kind: Option<String>,
    pub image: Option<String>,
    /// Emitted only alongside `image`; falls back to the top-level title.
    pub image_alt: Option<String>,
    pub site_name: Option<String>,
    pub locale: Option<String>,
}

/// Twitter Card record, same fallback rule as Open Graph for
/// `title`/`description`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TwitterData {
    /// Defaults to `summary_large_image` when the record is present.
    pub card: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub image_alt: Option<String>,
    /// `@handle` of the site account.
    pub site: Option<String>,
}

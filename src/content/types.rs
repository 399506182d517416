//! Site content data model.
//!
//! The brochure content lives in TOML files under the content directory;
//! these types mirror their tables. Everything is plain data consumed by
//! the page renderers and the SEO factories.

use crate::utils::slug::{is_slug, slugify};
use serde::Deserialize;

/// One service offered by the agency, rendered as a card on the services
/// page and as its own detail page under `/services/{slug}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Service {
    pub title: String,
    pub description: String,
    /// Icon name rendered by the stylesheet (decorative only).
    #[serde(default)]
    pub icon: String,
    /// Route segment. Derived from the title when missing.
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub features: Vec<String>,
    /// Social preview image URL for the detail page.
    #[serde(default)]
    pub image: Option<String>,
}

/// A portfolio entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub client: Option<String>,
    /// Display date, free-form ("2025", "mars 2025").
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// A team member shown on the about page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamMember {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub social: SocialLinks,
}

/// Optional social profile links.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SocialLinks {
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Contact details for the contact page and the Organization block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactInfo {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
}

/// A legal page (mentions légales, confidentialité, CGV, …).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegalPage {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Route segment under the site root. Derived from the title when
    /// missing.
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub sections: Vec<LegalSection>,
}

/// One heading + body block of a legal page.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegalSection {
    pub heading: String,
    pub text: String,
}

/// All site content, loaded once per build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteContent {
    pub services: Vec<Service>,
    pub projects: Vec<Project>,
    pub team: Vec<TeamMember>,
    pub contact: ContactInfo,
    pub legal: Vec<LegalPage>,
}

impl SiteContent {
    /// Fill in missing slugs and normalize hand-written ones.
    pub fn normalize(&mut self) {
        for service in &mut self.services {
            if !is_slug(&service.slug) {
                let source = if service.slug.is_empty() {
                    &service.title
                } else {
                    &service.slug
                };
                service.slug = slugify(source);
            }
        }
        for page in &mut self.legal {
            if !is_slug(&page.slug) {
                let source = if page.slug.is_empty() {
                    &page.title
                } else {
                    &page.slug
                };
                page.slug = slugify(source);
            }
        }
    }

    pub fn service_by_slug(&self, slug: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.slug == slug)
    }
}

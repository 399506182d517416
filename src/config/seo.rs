//! `[seo]` section configuration.
//!
//! Site-wide defaults consumed by the per-route metadata factories and
//! the head synchronizer policy.

use super::defaults;
use crate::head::SyncPolicy;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[seo]` section in vitrine.toml.
///
/// # Example
/// ```toml
/// [seo]
/// site_name = "Agence Lumen"
/// locale = "fr_FR"
/// twitter_site = "@agencelumen"
/// policy = "upsert"
///
/// [seo.organization]
/// logo = "/images/logo.png"
/// same_as = ["https://www.linkedin.com/company/agence-lumen"]
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SeoConfig {
    /// `og:site_name` value. Falls back to `base.title` when empty.
    #[serde(default)]
    pub site_name: String,

    /// `og:locale` value.
    #[serde(default = "defaults::seo::locale")]
    #[educe(Default = defaults::seo::locale())]
    pub locale: String,

    /// `twitter:site` handle (`@…`). Empty emits no tag.
    #[serde(default)]
    pub twitter_site: String,

    /// Site-wide keyword list, used on the home page and merged into
    /// per-service keyword sets.
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Default social preview image URL (`og:image` / `twitter:image`)
    /// for pages without one of their own. Empty emits no tag.
    #[serde(default)]
    pub image: String,

    /// Default twitter card type for pages that carry an image.
    #[serde(default = "defaults::seo::twitter_card")]
    #[educe(Default = defaults::seo::twitter_card())]
    pub twitter_card: String,

    /// `robots` meta tag content for the page shell.
    #[serde(default = "defaults::seo::robots")]
    #[educe(Default = defaults::seo::robots())]
    pub robots: String,

    /// Stale-tag policy of the head synchronizer. `upsert` (default)
    /// leaves tags from a previous pass in place when the current pass
    /// does not set them; `prune` removes them.
    #[serde(default)]
    pub policy: SyncPolicy,

    /// Organization block emitted as JSON-LD on the home page.
    #[serde(default)]
    pub organization: OrganizationConfig,
}

impl SeoConfig {
    /// `og:site_name`, falling back to the site title.
    pub fn site_name_or<'a>(&'a self, title: &'a str) -> &'a str {
        if self.site_name.is_empty() {
            title
        } else {
            &self.site_name
        }
    }
}

/// `[seo.organization]` subsection - schema.org Organization fields.
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct OrganizationConfig {
    /// Logo URL, absolute or site-relative.
    #[serde(default)]
    pub logo: String,

    /// Contact phone number.
    #[serde(default)]
    pub phone: String,

    #[serde(default = "defaults::seo::organization::contact_type")]
    #[educe(Default = defaults::seo::organization::contact_type())]
    pub contact_type: String,

    /// `sameAs` social profile URLs.
    #[serde(default)]
    pub same_as: Vec<String>,

    /// Postal address locality.
    #[serde(default)]
    pub locality: String,

    /// ISO country code for the postal address.
    #[serde(default)]
    pub country: String,
}

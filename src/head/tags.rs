//! The stable key space for head tags.
//!
//! A tag is located by what identifies it, never by position: a `meta` tag
//! by its `name` or `property` attribute, a `link` tag by its `rel`. The
//! payload (`content` / `href`) is the [`TagSpec`].

use compact_str::CompactString;

/// Which attribute identifies a `meta` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MetaIdent {
    /// `meta[name="…"]` — standard metadata and Twitter Card tags.
    Name,
    /// `meta[property="…"]` — Open Graph tags.
    Property,
}

impl MetaIdent {
    pub const fn attr(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Property => "property",
        }
    }
}

/// Lookup key of a head tag: tag kind plus identifying attribute value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TagKey {
    Meta {
        ident: MetaIdent,
        value: CompactString,
    },
    Link {
        rel: CompactString,
    },
}

impl TagKey {
    /// `meta[name="…"]`
    pub fn name(value: impl Into<CompactString>) -> Self {
        Self::Meta {
            ident: MetaIdent::Name,
            value: value.into(),
        }
    }

    /// `meta[property="…"]`
    pub fn property(value: impl Into<CompactString>) -> Self {
        Self::Meta {
            ident: MetaIdent::Property,
            value: value.into(),
        }
    }

    /// `link[rel="…"]`
    pub fn link(rel: impl Into<CompactString>) -> Self {
        Self::Link { rel: rel.into() }
    }

    pub fn canonical() -> Self {
        Self::link("canonical")
    }

    /// True for keys owned by the SEO synchronizer.
    ///
    /// The prune policy only ever removes keys in this namespace, so
    /// unrelated keyed tags (`viewport`, `author`, …) survive it.
    pub fn is_seo_managed(&self) -> bool {
        match self {
            Self::Meta {
                ident: MetaIdent::Name,
                value,
            } => {
                matches!(value.as_str(), "description" | "keywords")
                    || value.starts_with("twitter:")
            }
            Self::Meta {
                ident: MetaIdent::Property,
                value,
            } => value.starts_with("og:"),
            Self::Link { rel } => rel == "canonical",
        }
    }
}

/// Payload of a keyed tag: `content` for `meta`, `href` for `link`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSpec {
    pub value: CompactString,
}

impl TagSpec {
    pub fn new(value: impl Into<CompactString>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_equality_is_by_attribute() {
        assert_eq!(TagKey::name("description"), TagKey::name("description"));
        assert_ne!(TagKey::name("description"), TagKey::property("description"));
        assert_ne!(TagKey::name("description"), TagKey::name("keywords"));
    }

    #[test]
    fn test_seo_managed_namespace() {
        assert!(TagKey::name("description").is_seo_managed());
        assert!(TagKey::name("keywords").is_seo_managed());
        assert!(TagKey::name("twitter:card").is_seo_managed());
        assert!(TagKey::property("og:title").is_seo_managed());
        assert!(TagKey::canonical().is_seo_managed());
    }

    #[test]
    fn test_unmanaged_keys() {
        assert!(!TagKey::name("viewport").is_seo_managed());
        assert!(!TagKey::name("author").is_seo_managed());
        assert!(!TagKey::name("robots").is_seo_managed());
        assert!(!TagKey::property("fb:app_id").is_seo_managed());
        assert!(!TagKey::link("stylesheet").is_seo_managed());
    }

    #[test]
    fn test_meta_ident_attr() {
        assert_eq!(MetaIdent::Name.attr(), "name");
        assert_eq!(MetaIdent::Property.attr(), "property");
    }
}

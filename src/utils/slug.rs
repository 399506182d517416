//! URL slug generation for route segments.
//!
//! Service routes are derived from titles when the content file does not
//! pin a slug explicitly, so accented agency vocabulary
//! ("Organisation d'Événements") must fold down to plain ASCII segments.

use deunicode::deunicode;

/// Convert arbitrary text to a lowercase ASCII slug.
///
/// Unicode is transliterated, anything non-alphanumeric becomes a single
/// hyphen, and leading/trailing hyphens are dropped.
pub fn slugify(text: &str) -> String {
    let ascii = deunicode(text);
    let mut slug = String::with_capacity(ascii.len());
    let mut pending_sep = false;

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('-');
            }
            pending_sep = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    slug
}

/// True when `text` is already a valid slug (what `slugify` would produce).
pub fn is_slug(text: &str) -> bool {
    !text.is_empty() && slugify(text) == text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_simple() {
        assert_eq!(slugify("Portfolio"), "portfolio");
    }

    #[test]
    fn test_slugify_spaces_and_case() {
        assert_eq!(slugify("Diffusion Multi-Stream"), "diffusion-multi-stream");
    }

    #[test]
    fn test_slugify_accents() {
        assert_eq!(
            slugify("Organisation d'Événements"),
            "organisation-d-evenements"
        );
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("a  --  b"), "a-b");
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("  réseaux sociaux  "), "reseaux-sociaux");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("---"), "");
    }

    #[test]
    fn test_is_slug() {
        assert!(is_slug("films-institutionnels"));
        assert!(!is_slug("Films Institutionnels"));
        assert!(!is_slug(""));
    }
}

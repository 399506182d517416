//! Output minification for generated HTML and sitemap XML.

use crate::config::SiteConfig;
use std::borrow::Cow;

/// Minify an HTML document if enabled in config.
///
/// Returns `Cow::Borrowed` untouched content when minify is disabled.
pub fn html<'a>(content: &'a [u8], config: &SiteConfig) -> Cow<'a, [u8]> {
    if !config.build.minify {
        return Cow::Borrowed(content);
    }

    let mut cfg = minify_html::Cfg::new();
    cfg.keep_closing_tags = true;
    cfg.keep_html_and_head_opening_tags = true;
    cfg.keep_comments = false;
    cfg.minify_css = true;
    cfg.minify_js = false;
    cfg.remove_bangs = true;
    cfg.remove_processing_instructions = true;
    Cow::Owned(minify_html::minify(content, &cfg))
}

/// Minify XML by stripping indentation and blank lines.
pub fn xml<'a>(content: &'a [u8], config: &SiteConfig) -> Cow<'a, [u8]> {
    if !config.build.minify {
        return Cow::Borrowed(content);
    }

    let text = std::str::from_utf8(content).unwrap_or("");
    let compact = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("");
    Cow::Owned(compact.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    fn config_with_minify(enabled: bool) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.build.minify = enabled;
        config
    }

    #[test]
    fn test_html_minify_strips_whitespace() {
        let input = b"<html>\n  <head>\n  </head>\n  <body>\n    <p>Hello</p>\n  </body>\n</html>";
        let out = html(input, &config_with_minify(true));
        let out = String::from_utf8_lossy(&out);

        assert!(!out.contains("\n  "));
        assert!(out.contains("<p>Hello</p>"));
    }

    #[test]
    fn test_html_minify_disabled_is_borrowed() {
        let input = b"<html>\n  <body>\n  </body>\n</html>";
        let out = html(input, &config_with_minify(false));

        assert!(matches!(out, Cow::Borrowed(_)));
        assert_eq!(&*out, input);
    }

    #[test]
    fn test_html_minify_shrinks() {
        let input = b"<html>\n  <body>\n  </body>\n</html>";
        let minified = html(input, &config_with_minify(true));
        let untouched = html(input, &config_with_minify(false));

        assert!(minified.len() < untouched.len());
    }

    #[test]
    fn test_xml_minify_joins_lines() {
        let input = br#"<?xml version="1.0"?>
<urlset>
  <url>
    <loc>https://example.com/</loc>
  </url>
</urlset>"#;
        let out = xml(input, &config_with_minify(true));

        assert_eq!(
            &*out,
            br#"<?xml version="1.0"?><urlset><url><loc>https://example.com/</loc></url></urlset>"#
        );
    }

    #[test]
    fn test_xml_minify_disabled() {
        let input = b"<root>\n  <item/>\n</root>";
        let out = xml(input, &config_with_minify(false));
        assert_eq!(&*out, input);
    }
}

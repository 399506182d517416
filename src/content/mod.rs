//! Site content loading.
//!
//! Content lives in four TOML files under the content directory, all
//! optional so a freshly scaffolded site builds immediately:
//!
//! | File             | Table(s)                  |
//! |------------------|---------------------------|
//! | `services.toml`  | `[[services]]`            |
//! | `portfolio.toml` | `[[projects]]`            |
//! | `team.toml`      | `[[members]]`             |
//! | `site.toml`      | `[contact]`, `[[legal]]`  |

pub mod store;
pub mod types;

pub use types::{
    ContactInfo, LegalPage, LegalSection, Project, Service, SiteContent, SocialLinks, TeamMember,
};

use crate::config::SiteConfig;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::{fs, path::Path};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServicesFile {
    #[serde(default)]
    services: Vec<Service>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PortfolioFile {
    #[serde(default)]
    projects: Vec<Project>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TeamFile {
    #[serde(default)]
    members: Vec<TeamMember>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SiteFile {
    #[serde(default)]
    contact: ContactInfo,
    #[serde(default)]
    legal: Vec<LegalPage>,
}

/// Load and normalize all site content.
pub fn load(config: &SiteConfig) -> Result<SiteContent> {
    let dir = &config.build.content;

    let services: ServicesFile = read_toml(&dir.join("services.toml"))?.unwrap_or_default();
    let portfolio: PortfolioFile = read_toml(&dir.join("portfolio.toml"))?.unwrap_or_default();
    let team: TeamFile = read_toml(&dir.join("team.toml"))?.unwrap_or_default();
    let site: SiteFile = read_toml(&dir.join("site.toml"))?.unwrap_or_default();

    let mut content = SiteContent {
        services: services.services,
        projects: portfolio.projects,
        team: team.members,
        contact: site.contact,
        legal: site.legal,
    };
    content.normalize();

    Ok(content)
}

/// Parse one TOML file; a missing file is `None`, a malformed one is an
/// error.
fn read_toml<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let parsed = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(Some(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn config_with_content(dir: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.build.content = dir.to_path_buf();
        config
    }

    #[test]
    fn test_load_missing_files_gives_empty_content() {
        let tmp = tempfile::tempdir().unwrap();
        let content = load(&config_with_content(tmp.path())).unwrap();

        assert!(content.services.is_empty());
        assert!(content.projects.is_empty());
        assert!(content.legal.is_empty());
    }

    #[test]
    fn test_load_services_and_site() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(
            tmp.path().join("services.toml"),
            r#"
            [[services]]
            title = "Création de Sites Web"
            description = "Sites modernes et optimisés."
            features = ["Design responsive", "SEO avancé"]
        "#,
        )
        .unwrap();
        fs::write(
            tmp.path().join("site.toml"),
            r#"
            [contact]
            email = "contact@agence-lumen.example"
            phone = "+33 1 23 45 67 89"

            [[legal]]
            title = "Mentions Légales"
            description = "Informations légales du site."

            [[legal.sections]]
            heading = "Éditeur"
            text = "Agence Lumen SARL"
        "#,
        )
        .unwrap();

        let content = load(&config_with_content(tmp.path())).unwrap();

        assert_eq!(content.services.len(), 1);
        assert_eq!(content.services[0].slug, "creation-de-sites-web");
        assert_eq!(content.contact.email, "contact@agence-lumen.example");
        assert_eq!(content.legal[0].slug, "mentions-legales");
        assert_eq!(content.legal[0].sections.len(), 1);
    }

    #[test]
    fn test_load_rejects_malformed_toml() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("services.toml"), "not [ valid").unwrap();

        assert!(load(&config_with_content(tmp.path())).is_err());
    }
}

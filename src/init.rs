//! Site initialization.
//!
//! Scaffolds a starter agency site: config, content TOML files and the
//! directory structure, ready to `vitrine build`.

use crate::config::SiteConfig;
use anyhow::{Context, Result, bail};
use std::{fs, path::Path};

/// Files to write ignore patterns to
const IGNORE_FILES: &[&str] = &[".gitignore", ".ignore"];

/// Default config filename
const CONFIG_FILE: &str = "vitrine.toml";

/// Default site directory structure
const SITE_DIRS: &[&str] = &["content", "assets/images", "assets/styles"];

const CONFIG_TEMPLATE: &str = r#"[base]
title = "Agence Lumen"
description = "Agence de communication"
author = "Agence Lumen"
url = "https://example.com"
language = "fr"
copyright = "© 2026 Agence Lumen"

[build]
content = "content"
output = "public"
assets = "assets"
minify = true

[serve]
port = 4173

[seo]
locale = "fr_FR"
keywords = ["agence communication", "événements", "digital"]

[seo.organization]
locality = "Paris"
country = "FR"
"#;

const SERVICES_TEMPLATE: &str = r#"[[services]]
title = "Diffusion Multi-Stream"
description = "Diffusion simultanée sur plusieurs plateformes pour maximiser votre portée."
icon = "radio"
features = [
    "Streaming en direct haute qualité",
    "Support multi-caméras",
    "Enregistrement automatique",
]

[[services]]
title = "Création de Sites Web"
description = "Sites web modernes, optimisés et adaptés à vos besoins."
icon = "globe"
features = [
    "Design moderne et responsive",
    "Optimisation SEO avancée",
]
"#;

const PORTFOLIO_TEMPLATE: &str = r#"[[projects]]
title = "Lancement de chaîne"
description = "Mise en place d'une chaîne de diffusion en direct."
category = "Diffusion"
date = "2026"
tags = ["streaming", "direct"]
"#;

const TEAM_TEMPLATE: &str = r#"[[members]]
name = "Camille Durand"
role = "Direction de projet"
bio = "Coordonne les projets de diffusion et d'événementiel."
"#;

const SITE_TEMPLATE: &str = r#"[contact]
email = "contact@example.com"
phone = "+33 1 23 45 67 89"
address = "Paris, France"

[[legal]]
title = "Mentions Légales"
description = "Informations légales du site."

[[legal.sections]]
heading = "Éditeur"
text = "Ce site est édité par l'agence."
"#;

/// Create a new site with the default structure.
pub fn new_site(config: &SiteConfig, has_name: bool) -> Result<()> {
    let root = config.get_root();

    // Safety check: if no name was provided (init in current dir),
    // the directory must be completely empty
    if !has_name && !is_dir_empty(root)? {
        bail!(
            "Current directory is not empty. Use `vitrine init <SITE_NAME>` to create in a subdirectory."
        );
    }

    init_site_structure(root)?;
    init_config_file(root)?;
    init_content_files(root)?;
    init_ignored_files(root, &["public"])?;

    crate::log!("init"; "site created at {}", root.display());
    Ok(())
}

/// Check if a directory is completely empty
fn is_dir_empty(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(fs::read_dir(path)?.next().is_none())
}

/// Create site directory structure
fn init_site_structure(root: &Path) -> Result<()> {
    for dir in SITE_DIRS {
        let path = root.join(dir);
        if path.exists() {
            bail!(
                "Path `{}` already exists. Try `vitrine init <SITE_NAME>` instead.",
                path.display()
            );
        }
        fs::create_dir_all(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
    }
    Ok(())
}

fn init_config_file(root: &Path) -> Result<()> {
    fs::write(root.join(CONFIG_FILE), CONFIG_TEMPLATE)?;
    Ok(())
}

fn init_content_files(root: &Path) -> Result<()> {
    let content = root.join("content");
    for (name, body) in [
        ("services.toml", SERVICES_TEMPLATE),
        ("portfolio.toml", PORTFOLIO_TEMPLATE),
        ("team.toml", TEAM_TEMPLATE),
        ("site.toml", SITE_TEMPLATE),
    ] {
        fs::write(content.join(name), body)?;
    }
    Ok(())
}

/// Initialize .gitignore and .ignore files with specified patterns
fn init_ignored_files(root: &Path, patterns: &[&str]) -> Result<()> {
    let content = patterns.join("\n");

    for filename in IGNORE_FILES {
        let path = root.join(filename);
        if !path.exists() {
            fs::write(&path, &content)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_root(root: &Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.set_root(root);
        config
    }

    #[test]
    fn test_scaffold_produces_a_loadable_site() {
        let tmp = tempfile::tempdir().unwrap();
        let config = config_with_root(tmp.path());

        new_site(&config, true).unwrap();

        // The written config parses and validates.
        let loaded = SiteConfig::from_path(&tmp.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(loaded.base.title, "Agence Lumen");
        loaded.validate().unwrap();

        // The written content loads and normalizes.
        let mut content_config = SiteConfig::default();
        content_config.build.content = tmp.path().join("content");
        let content = crate::content::load(&content_config).unwrap();
        assert_eq!(content.services.len(), 2);
        assert_eq!(content.services[0].slug, "diffusion-multi-stream");
        assert_eq!(content.legal.len(), 1);
    }

    #[test]
    fn test_init_refuses_non_empty_dir_without_name() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("existing.txt"), "x").unwrap();
        let config = config_with_root(tmp.path());

        assert!(new_site(&config, false).is_err());
    }

    #[test]
    fn test_init_refuses_existing_structure() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("content")).unwrap();
        let config = config_with_root(tmp.path());

        assert!(new_site(&config, true).is_err());
    }

    #[test]
    fn test_ignore_files_not_overwritten() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(".gitignore"), "custom").unwrap();

        init_ignored_files(tmp.path(), &["public"]).unwrap();

        let gitignore = fs::read_to_string(tmp.path().join(".gitignore")).unwrap();
        assert_eq!(gitignore, "custom");
        let ignore = fs::read_to_string(tmp.path().join(".ignore")).unwrap();
        assert_eq!(ignore, "public");
    }
}

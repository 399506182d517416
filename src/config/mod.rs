//! Site configuration management for `vitrine.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                      |
//! |-------------|----------------------------------------------|
//! | `[base]`    | Site metadata (title, author, url)           |
//! | `[build]`   | Build paths, minify, sitemap                 |
//! | `[serve]`   | Development server (port, interface, watch)  |
//! | `[seo]`     | Site-wide SEO defaults and sync policy       |
//! | `[extra]`   | User-defined custom fields                   |
//!
//! # Example
//!
//! ```toml
//! [base]
//! title = "Agence Lumen"
//! description = "Agence de communication"
//! url = "https://agence-lumen.example"
//!
//! [build]
//! content = "content"
//! output = "public"
//! minify = true
//!
//! [seo]
//! twitter_site = "@agencelumen"
//!
//! [extra]
//! analytics_id = "UA-12345"
//! ```

mod base;
mod build;
pub mod defaults;
mod error;
mod handle;
mod seo;
mod serve;

// Re-export public types used by other modules
pub use base::BaseConfig;
pub use build::{BuildConfig, SitemapConfig};
pub use handle::{cfg, init_config, reload_config};
pub use seo::{OrganizationConfig, SeoConfig};
pub use serve::ServeConfig;

use crate::cli::{Cli, Commands};
use anyhow::{Result, bail};
use educe::Educe;
use error::ConfigError;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing vitrine.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// CLI arguments reference
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// Build settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// SEO defaults and synchronizer policy
    #[serde(default)]
    pub seo: SeoConfig,

    /// User-defined extra fields
    #[serde(default)]
    pub extra: HashMap<String, toml::Value>,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        let mut config = Self::from_str(&content)?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.build.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.build.root = Some(path.to_path_buf())
    }

    /// Get CLI arguments reference
    pub fn get_cli(&self) -> &'static Cli {
        self.cli.unwrap()
    }

    /// Output directory including the URL path prefix.
    pub fn output_root(&self) -> PathBuf {
        self.build.output.join(&self.build.path_prefix)
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &'static Cli) {
        self.cli = Some(cli);

        // Determine the final root path based on command
        let root = match &cli.command {
            Commands::Init { name: Some(name) } => {
                let base = cli
                    .root
                    .as_ref()
                    .cloned()
                    .unwrap_or_else(|| self.get_root().to_owned());
                base.join(name)
            }
            _ => cli
                .root
                .as_ref()
                .cloned()
                .unwrap_or_else(|| self.get_root().to_owned()),
        };
        let root = PathBuf::from(shellexpand::tilde(&root.to_string_lossy()).into_owned());
        self.set_root(&root);

        if let Some(content) = &cli.content {
            self.build.content = content.clone();
        }
        if let Some(output) = &cli.output {
            self.build.output = output.clone();
        }
        if let Some(assets) = &cli.assets {
            self.build.assets = assets.clone();
        }

        if let Some(args) = cli.build_args() {
            if args.clean {
                self.build.clean = true;
            }
            if let Some(minify) = args.minify {
                self.build.minify = minify;
            }
            if let Some(sitemap) = args.sitemap {
                self.build.sitemap.enable = sitemap;
            }
            if let Some(base_url) = &args.base_url {
                self.base.url = Some(base_url.clone());
            }
        }

        if let Commands::Serve {
            interface,
            port,
            watch,
            ..
        } = &cli.command
        {
            if let Some(interface) = interface {
                self.serve.interface = interface.clone();
            }
            if let Some(port) = port {
                self.serve.port = *port;
            }
            if let Some(watch) = watch {
                self.serve.watch = *watch;
            }
        }

        self.resolve_paths();
    }

    /// Join configured directories to the project root.
    fn resolve_paths(&mut self) {
        let root = self.get_root().to_owned();
        for path in [
            &mut self.build.content,
            &mut self.build.output,
            &mut self.build.assets,
        ] {
            if path.is_relative() {
                let joined = root.join(path.as_path());
                *path = joined;
            }
        }
    }

    /// Validate the loaded configuration.
    pub fn validate(&self) -> Result<()> {
        if let Some(url) = self.base.url_trimmed()
            && !url.starts_with("http://")
            && !url.starts_with("https://")
        {
            bail!(ConfigError::Validation(format!(
                "base.url must be an absolute http(s) URL, got `{url}`"
            )));
        }

        if self.build.sitemap.enable && self.base.url_trimmed().is_none() {
            bail!(ConfigError::Validation(
                "base.url is required when [build.sitemap].enable = true".into()
            ));
        }

        Ok(())
    }
}

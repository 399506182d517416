//! Vitrine - a static site generator for agency showcase sites.

mod build;
mod cli;
mod config;
mod content;
mod generator;
mod head;
mod init;
mod logger;
mod render;
mod seo;
mod serve;
mod utils;
mod watch;

use anyhow::{Result, bail};
use build::build_site;
use clap::Parser;
use cli::{Cli, Commands};
use config::SiteConfig;
use init::new_site;
use serve::serve_site;
use std::path::Path;

fn main() -> Result<()> {
    let cli: &'static Cli = Box::leak(Box::new(Cli::parse()));
    config::init_config(load_config(cli)?);
    let config = config::cfg();

    match &cli.command {
        Commands::Init { name } => new_site(&config, name.is_some()),
        Commands::Build { .. } => build_site(&config),
        Commands::Serve { .. } => {
            build_site(&config)?;
            serve_site()
        }
    }
}

/// Load and validate configuration from CLI arguments
fn load_config(cli: &'static Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SiteConfig::from_path(&config_path)?
    } else {
        SiteConfig::default()
    };
    config.update_with_cli(cli);

    // Point at the file init would write; the final root may differ from
    // the initial one (init with a name).
    if config.config_path.as_os_str().is_empty() {
        config.config_path = config.get_root().join(&cli.config);
    }

    // Validate config state based on command
    match (cli.is_init(), config.config_path.exists()) {
        (true, true) => {
            bail!("Config file already exists. Remove it manually or init in a different path.")
        }
        (false, false) => bail!("Config file not found."),
        _ => {}
    }

    if !cli.is_init() {
        config.validate()?;
    }

    Ok(config)
}

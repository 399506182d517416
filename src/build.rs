//! Build pipeline.
//!
//! Clean or create the output directory, load content, render every
//! route in parallel (one head-synchronization pass each), copy assets,
//! then generate the sitemap from the collected page records.

use crate::config::SiteConfig;
use crate::content::store::{PageRecord, SITE_PAGES};
use crate::generator::sitemap::build_sitemap;
use crate::head::SyncEngine;
use crate::log;
use crate::render::render_route;
use crate::seo::routes::{Route, full_url, routes, url_path};
use crate::utils::minify;
use crate::{content, content::SiteContent};
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::{
    fs,
    path::PathBuf,
    time::Instant,
};
use walkdir::WalkDir;

/// Build the whole site with a fresh sync engine.
pub fn build_site(config: &SiteConfig) -> Result<()> {
    let engine = SyncEngine::new(config.seo.policy);
    build_site_with(config, &engine)
}

/// Build the whole site, synchronizing heads through `engine`.
///
/// Watch mode passes a long-lived engine so it can supersede a build
/// that newer changes have overtaken.
pub fn build_site_with(config: &SiteConfig, engine: &SyncEngine) -> Result<()> {
    let started = Instant::now();

    prepare_output(config)?;
    SITE_PAGES.clear();

    let content = content::load(config)?;
    let table = routes(&content);
    let lastmod = chrono::Local::now().format("%Y-%m-%d").to_string();

    table
        .par_iter()
        .try_for_each(|route| build_page(route, config, &content, engine, &lastmod))?;

    copy_assets(config)?;
    build_sitemap(config)?;

    log!("build"; "{} pages in {:.0?}", table.len(), started.elapsed());
    Ok(())
}

/// Render one route and write it to its output location.
fn build_page(
    route: &Route,
    config: &SiteConfig,
    content: &SiteContent,
    engine: &SyncEngine,
    lastmod: &str,
) -> Result<()> {
    let html = render_route(route, config, content, engine)
        .with_context(|| format!("Failed to render {}", route.path))?;
    let html = minify::html(&html, config);

    let out = output_path(config, &route.path);
    if let Some(parent) = out.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&out, &*html).with_context(|| format!("Failed to write {}", out.display()))?;

    let page_url = url_path(config, &route.path);
    SITE_PAGES.insert(PageRecord {
        full_url: full_url(config, &route.path).unwrap_or_else(|| page_url.clone()),
        url_path: page_url,
        title: route.label.clone(),
        lastmod: Some(lastmod.to_owned()),
    });

    log!("page"; "{}", route.path);
    Ok(())
}

/// `/` -> `index.html`, `/services/x/` -> `services/x/index.html`.
fn output_path(config: &SiteConfig, route_path: &str) -> PathBuf {
    let root = config.output_root();
    let relative = route_path.trim_matches('/');
    if relative.is_empty() {
        root.join("index.html")
    } else {
        root.join(relative).join("index.html")
    }
}

fn prepare_output(config: &SiteConfig) -> Result<()> {
    let output = &config.build.output;
    if config.build.clean && output.exists() {
        fs::remove_dir_all(output)
            .with_context(|| format!("Failed to clean {}", output.display()))?;
    }
    fs::create_dir_all(config.output_root())?;
    Ok(())
}

/// Copy the assets directory into the output as-is.
fn copy_assets(config: &SiteConfig) -> Result<()> {
    let assets = &config.build.assets;
    if !assets.exists() {
        return Ok(());
    }

    let output_root = config.output_root();
    let mut copied = 0usize;
    for entry in WalkDir::new(assets).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(assets)
            .with_context(|| format!("Asset outside assets dir: {}", entry.path().display()))?;
        let dest = output_root.join(relative);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &dest)
            .with_context(|| format!("Failed to copy {}", entry.path().display()))?;
        copied += 1;
    }

    if copied > 0 {
        log!("assets"; "{copied} files");
    }
    Ok(())
}

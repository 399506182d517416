//! Global config with atomic reload support.
//!
//! Uses `arc-swap` for lock-free reads and atomic config replacement,
//! which enables hot-reloading of `vitrine.toml` during watch mode:
//! readers (the rayon build workers, the dev server) call [`cfg`] and
//! never block a writer replacing the config.

use super::SiteConfig;
use arc_swap::ArcSwap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

/// Global config storage with atomic replacement support.
///
/// Initialized with default config, then replaced with the loaded config
/// in main. During watch mode it is atomically replaced when
/// vitrine.toml changes.
pub static CONFIG: LazyLock<ArcSwap<SiteConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(SiteConfig::default()));

/// Hash of the config file content at the last (re)load.
static CONFIG_HASH: AtomicU64 = AtomicU64::new(0);

/// Get current config as `Arc<SiteConfig>`.
///
/// Lock-free atomic load; the `Arc` auto-derefs to `&SiteConfig`.
#[inline]
pub fn cfg() -> Arc<SiteConfig> {
    CONFIG.load_full()
}

/// Initialize global config (called once at startup).
pub fn init_config(config: SiteConfig) {
    if config.config_path.exists()
        && let Ok(content) = std::fs::read_to_string(&config.config_path)
    {
        CONFIG_HASH.store(content_hash(&content), Ordering::Relaxed);
    }

    CONFIG.store(Arc::new(config));
}

/// Replace config atomically (called when vitrine.toml changes).
///
/// The old config stays valid for readers that loaded it before this
/// call; new readers see the updated one.
///
/// Returns `true` if the config was actually updated, `false` if the
/// file content matches the last load.
pub fn reload_config() -> anyhow::Result<bool> {
    let current = cfg();
    let cli = current.get_cli();

    let content = std::fs::read_to_string(&current.config_path)?;
    let new_hash = content_hash(&content);
    if new_hash == CONFIG_HASH.load(Ordering::Relaxed) {
        return Ok(false);
    }

    let mut config = SiteConfig::from_str(&content)?;
    config.config_path = current.config_path.clone();
    config.update_with_cli(cli);
    config.validate()?;

    CONFIG.store(Arc::new(config));
    CONFIG_HASH.store(new_hash, Ordering::Relaxed);

    Ok(true)
}

fn content_hash(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

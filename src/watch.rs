//! File system watcher for rebuild on change.
//!
//! Monitors the content and assets directories plus the config file,
//! batches rapid events with debouncing, and triggers a rebuild per
//! batch. A config change is hot-swapped through the global handle
//! before rebuilding.
//!
//! Each new batch invalidates the shared sync engine first, so a head
//! synchronization pass left over from an overtaken build applies
//! nothing instead of stamping stale metadata.

use crate::build::build_site_with;
use crate::config::{cfg, reload_config};
use crate::head::SyncEngine;
use crate::log;
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use rustc_hash::FxHashSet;
use std::{
    path::{Path, PathBuf},
    sync::mpsc,
    time::{Duration, Instant},
};

const DEBOUNCE_MS: u64 = 300;
const REBUILD_COOLDOWN_MS: u64 = 800;

/// Check if path is a temp/backup file (editor artifacts).
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

fn is_relevant(event: &Event) -> bool {
    matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    )
}

/// Batches rapid file events with debouncing and rebuild cooldown.
struct Debouncer {
    pending: FxHashSet<PathBuf>,
    last_event: Option<Instant>,
    last_rebuild: Option<Instant>,
}

impl Debouncer {
    fn new() -> Self {
        Self {
            pending: FxHashSet::default(),
            last_event: None,
            last_rebuild: None,
        }
    }

    fn in_cooldown(&self) -> bool {
        self.last_rebuild
            .is_some_and(|t| t.elapsed() < Duration::from_millis(REBUILD_COOLDOWN_MS))
    }

    fn add(&mut self, event: Event) {
        for path in event.paths {
            if !is_temp_file(&path) {
                self.pending.insert(path);
            }
        }
        self.last_event = Some(Instant::now());
    }

    /// The batch is ready once events stopped arriving for the debounce
    /// window and the rebuild cooldown has passed.
    fn ready(&self) -> bool {
        !self.pending.is_empty()
            && !self.in_cooldown()
            && self
                .last_event
                .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn take(&mut self) -> FxHashSet<PathBuf> {
        self.last_rebuild = Some(Instant::now());
        std::mem::take(&mut self.pending)
    }
}

/// Watch for changes and rebuild until the channel closes.
///
/// Runs on its own thread; blocks forever in normal operation.
pub fn watch_for_changes_blocking(engine: &SyncEngine) -> Result<()> {
    let c = cfg();
    let (tx, rx) = mpsc::channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        tx.send(res).ok();
    })
    .context("Failed to create file watcher")?;

    for dir in [&c.build.content, &c.build.assets] {
        if dir.exists() {
            watcher
                .watch(dir, RecursiveMode::Recursive)
                .with_context(|| format!("Failed to watch {}", dir.display()))?;
        }
    }
    if c.config_path.exists() {
        watcher
            .watch(&c.config_path, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch {}", c.config_path.display()))?;
    }
    log!("watch"; "watching for changes");

    let mut debouncer = Debouncer::new();
    loop {
        match rx.recv_timeout(Duration::from_millis(DEBOUNCE_MS)) {
            Ok(Ok(event)) if is_relevant(&event) => debouncer.add(event),
            Ok(Ok(_)) => {}
            Ok(Err(err)) => log!("watch"; "{err}"),
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => return Ok(()),
        }

        if debouncer.ready() {
            let changed = debouncer.take();
            handle_changes(engine, &changed);
        }
    }
}

/// Rebuild after a batch of changes.
fn handle_changes(engine: &SyncEngine, changed: &FxHashSet<PathBuf>) {
    // Supersede any pass still pending from the overtaken build.
    engine.invalidate();

    let config_changed = changed.iter().any(|p| *p == cfg().config_path);
    if config_changed {
        match reload_config() {
            Ok(true) => log!("watch"; "config reloaded"),
            Ok(false) => {}
            Err(err) => {
                log!("watch"; "config reload failed: {err}");
                return;
            }
        }
    }

    let c = cfg();
    match build_site_with(&c, engine) {
        Ok(()) => log!("watch"; "rebuilt ({} changed)", changed.len()),
        Err(err) => log!("watch"; "build failed: {err}"),
    }
}

//! Global built-page store.
//!
//! The build renders pages in parallel; each worker records the page it
//! produced here, and the sitemap generator reads the collected set
//! afterwards. Reset at the start of every build so watch-mode rebuilds
//! start fresh.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Global page store, shared between the build workers and the sitemap
/// generator.
pub static SITE_PAGES: LazyLock<PageStore> = LazyLock::new(PageStore::new);

/// What the sitemap needs to know about one built page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord {
    /// URL path including the path prefix (`/services/diffusion/`).
    pub url_path: String,
    /// Complete URL including the base (`https://…/services/diffusion/`).
    pub full_url: String,
    pub title: String,
    /// Build date in `YYYY-MM-DD`.
    pub lastmod: Option<String>,
}

/// Thread-safe storage for built-page records.
///
/// `RwLock` because inserts come from rayon workers while watch-mode
/// readers may list concurrently.
#[derive(Debug, Default)]
pub struct PageStore {
    pages: RwLock<BTreeMap<String, PageRecord>>,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all records. Call at the start of each build.
    pub fn clear(&self) {
        self.pages.write().clear();
    }

    /// Insert or update a record, keyed by URL path.
    pub fn insert(&self, record: PageRecord) {
        self.pages.write().insert(record.url_path.clone(), record);
    }

    /// All records, ordered by URL path.
    pub fn all(&self) -> Vec<PageRecord> {
        self.pages.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.pages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.read().is_empty()
    }
}

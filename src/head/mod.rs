//! Document-head metadata synchronization.
//!
//! The head of a generated page is shared mutable state addressed by a
//! stable key space (tag kind + identifying attribute). This module keeps
//! that state in sync with one [`SeoData`](crate::seo::SeoData) value per
//! page:
//!
//! - [`tags`] — the key space (`meta[name=…]`, `meta[property=…]`,
//!   `link[rel=…]`) and tag payloads.
//! - [`store`] — the key-value contract over a head, with an in-memory
//!   fake for tests.
//! - [`reconcile`] — pure diffing of a desired tag set against the current
//!   one, producing a plan.
//! - [`sync`] — the effectful shell: derives the desired set from
//!   `SeoData`, reconciles, applies, and tracks pass generations so a
//!   superseded pass never writes.
//! - [`document`] — the HTML document model the real head lives in.

pub mod document;
pub mod reconcile;
pub mod store;
pub mod sync;
pub mod tags;

pub use document::{Document, HeadSection};
pub use reconcile::{DataBlockOp, DesiredHead, ReconcilePlan, SyncPolicy, reconcile};
pub use store::{HeadStore, MemoryHead};
pub use sync::{Outcome, SyncEngine, SyncPass};
pub use tags::{MetaIdent, TagKey, TagSpec};

/// Attribute marking a JSON-LD block as dynamically managed.
///
/// Blocks without this marker are build-time data and are never touched.
pub const MANAGED_DATA_ATTR: &str = "data-dynamic";

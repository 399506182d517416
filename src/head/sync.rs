//! The effectful synchronization shell.
//!
//! [`SyncEngine::synchronize`] derives the desired tag set from one
//! [`SeoData`] value, diffs it against the head through
//! [`reconcile`](super::reconcile::reconcile), and applies the plan. One
//! pass runs per page activation; repeating a pass with the same input
//! leaves the head unchanged.
//!
//! Passes carry a generation: [`SyncEngine::invalidate`] supersedes every
//! pass begun earlier, and a superseded pass skips its writes entirely.
//! This is what prevents a rebuild batch that has been overtaken by a
//! newer change from stamping stale metadata into the output.

use super::document::Document;
use super::reconcile::{DataBlockOp, DesiredHead, ReconcilePlan, SyncPolicy, reconcile};
use super::store::HeadStore;
use super::tags::{TagKey, TagSpec};
use crate::seo::{KEYWORD_SEPARATOR, SeoData};
use anyhow::Result;
use std::sync::atomic::{AtomicU64, Ordering};

/// Card type used when a twitter record does not name one.
const DEFAULT_TWITTER_CARD: &str = "summary_large_image";

/// Result of one synchronization pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The head was mutated.
    Applied { upserts: usize, removals: usize },
    /// The head already matched the desired state.
    Clean,
    /// The pass was superseded before applying; nothing was written.
    Superseded,
    /// The document has no head to write to; nothing was written.
    Detached,
}

/// Shared synchronizer: policy plus the pass generation counter.
#[derive(Debug)]
pub struct SyncEngine {
    policy: SyncPolicy,
    generation: AtomicU64,
}

impl SyncEngine {
    pub fn new(policy: SyncPolicy) -> Self {
        Self {
            policy,
            generation: AtomicU64::new(0),
        }
    }

    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    /// Start a pass pinned to the current generation.
    pub fn begin(&self) -> SyncPass<'_> {
        SyncPass {
            engine: self,
            generation: self.generation.load(Ordering::SeqCst),
        }
    }

    /// Supersede every pass begun before this call.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }

    /// Begin and immediately apply one pass against `store`.
    pub fn synchronize(&self, store: &mut dyn HeadStore, seo: &SeoData) -> Result<Outcome> {
        self.begin().apply(store, seo)
    }

    /// Synchronize a parsed document; a document without a `<head>` is a
    /// safe no-op rather than an error.
    pub fn synchronize_document(&self, doc: &mut Document, seo: &SeoData) -> Result<Outcome> {
        match doc.head_mut() {
            Some(head) => self.synchronize(head, seo),
            None => Ok(Outcome::Detached),
        }
    }
}

/// One synchronization pass, valid for the generation it was begun in.
#[derive(Debug)]
pub struct SyncPass<'a> {
    engine: &'a SyncEngine,
    generation: u64,
}

impl SyncPass<'_> {
    pub fn is_current(&self) -> bool {
        self.engine.generation.load(Ordering::SeqCst) == self.generation
    }

    /// Apply this pass. A pass superseded by
    /// [`SyncEngine::invalidate`] returns [`Outcome::Superseded`] and
    /// writes nothing.
    pub fn apply(self, store: &mut dyn HeadStore, seo: &SeoData) -> Result<Outcome> {
        let desired = desired_head(seo)?;
        if !self.is_current() {
            return Ok(Outcome::Superseded);
        }

        let plan = reconcile(&desired, store, self.engine.policy);
        if plan.is_clean() {
            return Ok(Outcome::Clean);
        }
        Ok(apply_plan(plan, store))
    }
}

/// Expand one `SeoData` value into the concrete tag set it asks for.
///
/// Field order matches the order tags are created in on a fresh head:
/// description, keywords, canonical, Open Graph, Twitter Card.
pub(crate) fn desired_head(seo: &SeoData) -> Result<DesiredHead> {
    let mut tags: Vec<(TagKey, TagSpec)> = Vec::new();
    let mut push = |key: TagKey, value: &str| tags.push((key, TagSpec::new(value)));

    if let Some(description) = &seo.description {
        push(TagKey::name("description"), description);
    }

    if !seo.keywords.is_empty() {
        push(TagKey::name("keywords"), &seo.keywords.join(KEYWORD_SEPARATOR));
    }

    if let Some(canonical) = &seo.canonical {
        push(TagKey::canonical(), canonical);
    }

    if let Some(og) = &seo.open_graph {
        if let Some(title) = og.title.as_deref().or(seo.title.as_deref()) {
            push(TagKey::property("og:title"), title);
        }
        if let Some(description) = og.description.as_deref().or(seo.description.as_deref()) {
            push(TagKey::property("og:description"), description);
        }
        if let Some(url) = &og.url {
            push(TagKey::property("og:url"), url);
        }
        if let Some(image) = &og.image {
            push(TagKey::property("og:image"), image);
            if let Some(alt) = og.image_alt.as_deref().or(seo.title.as_deref()) {
                push(TagKey::property("og:image:alt"), alt);
            }
        }
        if let Some(kind) = &og.kind {
            push(TagKey::property("og:type"), kind);
        }
        if let Some(site_name) = &og.site_name {
            push(TagKey::property("og:site_name"), site_name);
        }
        if let Some(locale) = &og.locale {
            push(TagKey::property("og:locale"), locale);
        }
    }

    if let Some(tw) = &seo.twitter {
        push(
            TagKey::name("twitter:card"),
            tw.card.as_deref().unwrap_or(DEFAULT_TWITTER_CARD),
        );
        if let Some(title) = tw.title.as_deref().or(seo.title.as_deref()) {
            push(TagKey::name("twitter:title"), title);
        }
        if let Some(description) = tw.description.as_deref().or(seo.description.as_deref()) {
            push(TagKey::name("twitter:description"), description);
        }
        if let Some(image) = &tw.image {
            push(TagKey::name("twitter:image"), image);
            if let Some(alt) = tw.image_alt.as_deref().or(seo.title.as_deref()) {
                push(TagKey::name("twitter:image:alt"), alt);
            }
        }
        if let Some(site) = &tw.site {
            push(TagKey::name("twitter:site"), site);
        }
    }

    let data_block = seo
        .structured_data
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    Ok(DesiredHead {
        title: seo.title.clone(),
        tags,
        data_block,
    })
}

fn apply_plan(plan: ReconcilePlan, store: &mut dyn HeadStore) -> Outcome {
    if let Some(title) = &plan.title {
        store.set_title(title);
    }

    let upserts = plan.upserts.len();
    for (key, spec) in plan.upserts {
        store.upsert(key, spec);
    }

    let removals = plan.removals.len();
    for key in &plan.removals {
        store.remove(key);
    }

    match plan.data_block {
        DataBlockOp::Keep => {}
        DataBlockOp::Replace(json) => store.replace_data_blocks(Some(&json)),
        DataBlockOp::Clear => store.replace_data_blocks(None),
    }

    Outcome::Applied { upserts, removals }
}

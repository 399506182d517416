//! Pure reconciliation of a desired tag set against the current head.
//!
//! The diffing here is the only non-trivial logic in the subsystem, so it
//! is kept free of side effects: input is the desired state plus read-only
//! access to the current one, output is a [`ReconcilePlan`] for the
//! applier in [`sync`](super::sync).

use super::store::HeadStore;
use super::tags::{TagKey, TagSpec};
use serde::{Deserialize, Serialize};

/// What to do about tags present in a previous pass but absent now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncPolicy {
    /// Minimal-diff upsert: absent fields leave their old tags in place.
    /// Metadata from the previous page can bleed into the next one; this
    /// matches how per-field upserts behave on a live document.
    #[default]
    Upsert,
    /// Additionally remove SEO-namespace tags the current pass does not
    /// set. Opt-in alternative to the faithful default.
    Prune,
}

/// Desired head state derived from one `SeoData` value.
///
/// Tag order is the creation order for keys that do not exist yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DesiredHead {
    pub title: Option<String>,
    pub tags: Vec<(TagKey, TagSpec)>,
    /// Serialized JSON-LD. `None` means the pass does not touch data
    /// blocks (under [`SyncPolicy::Upsert`]).
    pub data_block: Option<String>,
}

/// Planned operation on the managed JSON-LD blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataBlockOp {
    Keep,
    /// Remove all managed blocks, insert exactly this one.
    Replace(String),
    /// Remove all managed blocks, insert nothing.
    Clear,
}

/// The diff between desired and current head state.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconcilePlan {
    pub title: Option<String>,
    pub upserts: Vec<(TagKey, TagSpec)>,
    pub removals: Vec<TagKey>,
    pub data_block: DataBlockOp,
}

impl ReconcilePlan {
    /// True when applying the plan would not change the head at all.
    pub fn is_clean(&self) -> bool {
        self.title.is_none()
            && self.upserts.is_empty()
            && self.removals.is_empty()
            && self.data_block == DataBlockOp::Keep
    }
}

/// Diff `desired` against the current contents of `current`.
///
/// Upserts whose current value already equals the desired one are dropped,
/// which is what makes repeated synchronization with the same input a
/// no-op by construction.
pub fn reconcile(
    desired: &DesiredHead,
    current: &dyn HeadStore,
    policy: SyncPolicy,
) -> ReconcilePlan {
    let title = desired
        .title
        .as_ref()
        .filter(|t| current.title() != Some(t.as_str()))
        .cloned();

    let upserts: Vec<_> = desired
        .tags
        .iter()
        .filter(|(key, spec)| current.get(key) != Some(spec))
        .cloned()
        .collect();

    let removals = match policy {
        SyncPolicy::Upsert => Vec::new(),
        SyncPolicy::Prune => current
            .keys()
            .into_iter()
            .filter(|key| key.is_seo_managed())
            .filter(|key| !desired.tags.iter().any(|(k, _)| k == key))
            .collect(),
    };

    let data_block = match &desired.data_block {
        Some(json) => {
            if current.data_blocks() == [json.as_str()] {
                DataBlockOp::Keep
            } else {
                DataBlockOp::Replace(json.clone())
            }
        }
        None if policy == SyncPolicy::Prune && !current.data_blocks().is_empty() => {
            DataBlockOp::Clear
        }
        None => DataBlockOp::Keep,
    };

    ReconcilePlan {
        title,
        upserts,
        removals,
        data_block,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::head::store::MemoryHead;

    fn desired(tags: Vec<(TagKey, TagSpec)>) -> DesiredHead {
        DesiredHead {
            tags,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_desired_against_empty_head_is_clean() {
        let plan = reconcile(
            &DesiredHead::default(),
            &MemoryHead::new(),
            SyncPolicy::Upsert,
        );
        assert!(plan.is_clean());
    }

    #[test]
    fn test_missing_tags_become_upserts() {
        let d = desired(vec![(TagKey::name("description"), TagSpec::new("Reach us"))]);
        let plan = reconcile(&d, &MemoryHead::new(), SyncPolicy::Upsert);

        assert_eq!(plan.upserts.len(), 1);
        assert!(plan.removals.is_empty());
    }

    #[test]
    fn test_equal_values_drop_out_of_plan() {
        let mut head = MemoryHead::new();
        head.upsert(TagKey::name("description"), TagSpec::new("Reach us"));

        let d = desired(vec![(TagKey::name("description"), TagSpec::new("Reach us"))]);
        let plan = reconcile(&d, &head, SyncPolicy::Upsert);

        assert!(plan.is_clean());
    }

    #[test]
    fn test_changed_value_is_upserted() {
        let mut head = MemoryHead::new();
        head.upsert(TagKey::canonical(), TagSpec::new("https://x/a"));

        let d = desired(vec![(TagKey::canonical(), TagSpec::new("https://x/b"))]);
        let plan = reconcile(&d, &head, SyncPolicy::Upsert);

        assert_eq!(
            plan.upserts,
            vec![(TagKey::canonical(), TagSpec::new("https://x/b"))]
        );
    }

    #[test]
    fn test_upsert_policy_never_removes() {
        let mut head = MemoryHead::new();
        head.upsert(TagKey::name("twitter:card"), TagSpec::new("summary"));

        let plan = reconcile(&DesiredHead::default(), &head, SyncPolicy::Upsert);
        assert!(plan.removals.is_empty());
    }

    #[test]
    fn test_prune_removes_stale_seo_keys_only() {
        let mut head = MemoryHead::new();
        head.upsert(TagKey::name("twitter:card"), TagSpec::new("summary"));
        head.upsert(TagKey::name("viewport"), TagSpec::new("width=device-width"));

        let d = desired(vec![(TagKey::name("description"), TagSpec::new("d"))]);
        let plan = reconcile(&d, &head, SyncPolicy::Prune);

        assert_eq!(plan.removals, vec![TagKey::name("twitter:card")]);
    }

    #[test]
    fn test_prune_keeps_keys_still_desired() {
        let mut head = MemoryHead::new();
        head.upsert(TagKey::name("description"), TagSpec::new("old"));

        let d = desired(vec![(TagKey::name("description"), TagSpec::new("new"))]);
        let plan = reconcile(&d, &head, SyncPolicy::Prune);

        assert!(plan.removals.is_empty());
        assert_eq!(plan.upserts.len(), 1);
    }

    #[test]
    fn test_data_block_replace_and_keep() {
        let mut head = MemoryHead::new();
        head.replace_data_blocks(Some(r#"{"a":1}"#));

        let mut d = DesiredHead::default();
        d.data_block = Some(r#"{"a":1}"#.to_owned());
        let plan = reconcile(&d, &head, SyncPolicy::Upsert);
        assert_eq!(plan.data_block, DataBlockOp::Keep);

        d.data_block = Some(r#"{"b":2}"#.to_owned());
        let plan = reconcile(&d, &head, SyncPolicy::Upsert);
        assert_eq!(plan.data_block, DataBlockOp::Replace(r#"{"b":2}"#.to_owned()));
    }

    #[test]
    fn test_data_block_absent_kept_under_upsert_cleared_under_prune() {
        let mut head = MemoryHead::new();
        head.replace_data_blocks(Some(r#"{"a":1}"#));

        let d = DesiredHead::default();
        assert_eq!(
            reconcile(&d, &head, SyncPolicy::Upsert).data_block,
            DataBlockOp::Keep
        );
        assert_eq!(
            reconcile(&d, &head, SyncPolicy::Prune).data_block,
            DataBlockOp::Clear
        );
    }

    #[test]
    fn test_title_diffing() {
        let mut head = MemoryHead::new();
        head.set_title("Old");

        let mut d = DesiredHead::default();
        d.title = Some("New".to_owned());
        assert_eq!(
            reconcile(&d, &head, SyncPolicy::Upsert).title,
            Some("New".to_owned())
        );

        d.title = Some("Old".to_owned());
        assert_eq!(reconcile(&d, &head, SyncPolicy::Upsert).title, None);
    }
}

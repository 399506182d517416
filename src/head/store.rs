//! The key-value contract over a document head.
//!
//! Synchronization logic only ever talks to this trait, so it can be
//! exercised against [`MemoryHead`] without building a document.

use super::tags::{TagKey, TagSpec};

/// Keyed access to the mutable head of one document.
///
/// Implementations must keep at most one tag per key and must append newly
/// created tags after all existing ones.
pub trait HeadStore {
    /// Current document title, if any.
    fn title(&self) -> Option<&str>;

    /// Overwrite the document title (creates it when missing).
    fn set_title(&mut self, title: &str);

    fn get(&self, key: &TagKey) -> Option<&TagSpec>;

    /// Update the tag for `key` in place, or append a new one.
    fn upsert(&mut self, key: TagKey, spec: TagSpec);

    /// Remove the tag for `key`. Returns whether one existed.
    fn remove(&mut self, key: &TagKey) -> bool;

    /// All keyed tags currently present, in document order.
    fn keys(&self) -> Vec<TagKey>;

    /// Bodies of the dynamically managed JSON-LD blocks, in document order.
    fn data_blocks(&self) -> Vec<&str>;

    /// Full-replace of managed JSON-LD: drop every managed block, then
    /// insert `json` as the single new one when present.
    fn replace_data_blocks(&mut self, json: Option<&str>);
}

/// In-memory head fake for unit tests.
#[derive(Debug, Default)]
pub struct MemoryHead {
    title: Option<String>,
    tags: Vec<(TagKey, TagSpec)>,
    data: Vec<String>,
}

impl MemoryHead {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keyed tags (duplicates would inflate this, which is what
    /// the invariant tests look for).
    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// How many tags currently match `key`.
    pub fn count(&self, key: &TagKey) -> usize {
        self.tags.iter().filter(|(k, _)| k == key).count()
    }
}

impl HeadStore for MemoryHead {
    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_owned());
    }

    fn get(&self, key: &TagKey) -> Option<&TagSpec> {
        self.tags.iter().find(|(k, _)| k == key).map(|(_, s)| s)
    }

    fn upsert(&mut self, key: TagKey, spec: TagSpec) {
        match self.tags.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = spec,
            None => self.tags.push((key, spec)),
        }
    }

    fn remove(&mut self, key: &TagKey) -> bool {
        let before = self.tags.len();
        self.tags.retain(|(k, _)| k != key);
        self.tags.len() != before
    }

    fn keys(&self) -> Vec<TagKey> {
        self.tags.iter().map(|(k, _)| k.clone()).collect()
    }

    fn data_blocks(&self) -> Vec<&str> {
        self.data.iter().map(String::as_str).collect()
    }

    fn replace_data_blocks(&mut self, json: Option<&str>) {
        self.data.clear();
        if let Some(json) = json {
            self.data.push(json.to_owned());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_updates_in_place() {
        let mut head = MemoryHead::new();
        head.upsert(TagKey::name("description"), TagSpec::new("first"));
        head.upsert(TagKey::name("description"), TagSpec::new("second"));

        assert_eq!(head.tag_count(), 1);
        assert_eq!(
            head.get(&TagKey::name("description")).unwrap().value,
            "second"
        );
    }

    #[test]
    fn test_upsert_appends_new_keys_in_order() {
        let mut head = MemoryHead::new();
        head.upsert(TagKey::name("description"), TagSpec::new("d"));
        head.upsert(TagKey::property("og:title"), TagSpec::new("t"));

        assert_eq!(
            head.keys(),
            vec![TagKey::name("description"), TagKey::property("og:title")]
        );
    }

    #[test]
    fn test_remove() {
        let mut head = MemoryHead::new();
        head.upsert(TagKey::canonical(), TagSpec::new("https://x/a"));

        assert!(head.remove(&TagKey::canonical()));
        assert!(!head.remove(&TagKey::canonical()));
        assert_eq!(head.tag_count(), 0);
    }

    #[test]
    fn test_replace_data_blocks() {
        let mut head = MemoryHead::new();
        head.replace_data_blocks(Some(r#"{"a":1}"#));
        head.replace_data_blocks(Some(r#"{"b":2}"#));

        assert_eq!(head.data_blocks(), vec![r#"{"b":2}"#]);

        head.replace_data_blocks(None);
        assert!(head.data_blocks().is_empty());
    }

    #[test]
    fn test_set_title_overwrites() {
        let mut head = MemoryHead::new();
        assert_eq!(head.title(), None);

        head.set_title("One");
        head.set_title("Two");
        assert_eq!(head.title(), Some("Two"));
    }
}

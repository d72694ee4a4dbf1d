use std::collections::HashSet;
use std::sync::Mutex;

use moka::sync::Cache;
use tracing::debug;

/// Authoritative in-memory document content, keyed by document id, with a
/// dirty set tracking which entries still await durable persistence.
///
/// Once a document id is present here its entry supersedes durable storage
/// until the next flush. Entries are only removed by [`ContentCache::invalidate`].
pub struct ContentCache {
    entries: Cache<String, String>,
    dirty: Mutex<HashSet<String>>,
}

impl ContentCache {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder().build(),
            dirty: Mutex::new(HashSet::new()),
        }
    }

    /// Cached text for `doc_id`, if present.
    pub fn get(&self, doc_id: &str) -> Option<String> {
        self.entries.get(doc_id)
    }

    /// Overwrite the cached text and mark the document dirty.
    ///
    /// The write path for live edits: the new text is authoritative
    /// immediately, ahead of durable storage.
    pub fn set(&self, doc_id: &str, text: impl Into<String>) {
        self.entries.insert(doc_id.to_string(), text.into());
        self.dirty.lock().unwrap().insert(doc_id.to_string());
    }

    /// Populate the cache from durable storage without marking dirty.
    ///
    /// Seeded content was just read from the store; there is nothing new to
    /// persist.
    pub fn seed(&self, doc_id: &str, text: impl Into<String>) {
        self.entries.insert(doc_id.to_string(), text.into());
    }

    /// Drop the dirty marker for `doc_id` after a successful flush.
    pub fn clear_dirty(&self, doc_id: &str) {
        self.dirty.lock().unwrap().remove(doc_id);
    }

    /// Remove the cached entry and any dirty marker. Used on document deletion.
    pub fn invalidate(&self, doc_id: &str) {
        self.entries.invalidate(doc_id);
        self.dirty.lock().unwrap().remove(doc_id);
        debug!("Invalidated cache entry for document {}", doc_id);
    }

    /// Snapshot of the document ids currently awaiting persistence.
    pub fn dirty_snapshot(&self) -> Vec<String> {
        self.dirty.lock().unwrap().iter().cloned().collect()
    }

    pub fn is_dirty(&self, doc_id: &str) -> bool {
        self.dirty.lock().unwrap().contains(doc_id)
    }

    pub fn dirty_count(&self) -> usize {
        self.dirty.lock().unwrap().len()
    }

    /// Number of cached documents.
    pub fn entry_count(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }
}

impl Default for ContentCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_latest_write() {
        let cache = ContentCache::new();
        assert_eq!(cache.get("d1"), None);

        cache.set("d1", "v1");
        assert_eq!(cache.get("d1").as_deref(), Some("v1"));

        cache.set("d1", "v2");
        assert_eq!(cache.get("d1").as_deref(), Some("v2"));
    }

    #[test]
    fn set_marks_dirty_and_seed_does_not() {
        let cache = ContentCache::new();

        cache.seed("d1", "from storage");
        assert!(!cache.is_dirty("d1"));
        assert_eq!(cache.get("d1").as_deref(), Some("from storage"));

        cache.set("d1", "edited");
        assert!(cache.is_dirty("d1"));
    }

    #[test]
    fn dirty_membership_is_idempotent() {
        let cache = ContentCache::new();
        cache.set("d1", "v1");
        cache.set("d1", "v2");
        cache.set("d1", "v3");
        assert_eq!(cache.dirty_snapshot(), vec!["d1".to_string()]);
    }

    #[test]
    fn clear_dirty_keeps_content() {
        let cache = ContentCache::new();
        cache.set("d1", "v1");
        cache.clear_dirty("d1");
        assert!(!cache.is_dirty("d1"));
        assert_eq!(cache.get("d1").as_deref(), Some("v1"));
    }

    #[test]
    fn invalidate_removes_entry_and_marker() {
        let cache = ContentCache::new();
        cache.set("d1", "v1");
        cache.invalidate("d1");
        assert_eq!(cache.get("d1"), None);
        assert!(!cache.is_dirty("d1"));
        assert_eq!(cache.entry_count(), 0);
    }
}

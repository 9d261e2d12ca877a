use mediadash_models::MediaKind;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::client::JikanEntry;

/// In-memory metadata cache keyed by media kind and MyAnimeList id. Lives as
/// long as its owner; clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MetadataCache {
    entries: Arc<RwLock<HashMap<(MediaKind, String), JikanEntry>>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: MediaKind, mal_id: &str) -> Option<JikanEntry> {
        self.entries
            .read()
            .ok()?
            .get(&(kind, mal_id.to_string()))
            .cloned()
    }

    pub fn insert(&self, kind: MediaKind, mal_id: &str, entry: JikanEntry) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert((kind, mal_id.to_string()), entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_by_kind_and_id() {
        let cache = MetadataCache::new();
        let entry = JikanEntry {
            synopsis: Some("Space bounty hunters".to_string()),
            ..JikanEntry::default()
        };
        cache.insert(MediaKind::Anime, "1", entry.clone());

        assert_eq!(cache.get(MediaKind::Anime, "1"), Some(entry));
        assert_eq!(cache.get(MediaKind::Manga, "1"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_clones_share_entries() {
        let cache = MetadataCache::new();
        let shared = cache.clone();
        shared.insert(MediaKind::Manga, "2", JikanEntry::default());
        assert!(!cache.is_empty());
    }
}

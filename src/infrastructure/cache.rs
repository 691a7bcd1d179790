use crate::application::ports::cache::{RenderCache, RenderCacheKey};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::trace;

/// Process-local store of rendered placeholder fragments.
#[derive(Default)]
pub struct InMemoryRenderCache {
    entries: Mutex<HashMap<RenderCacheKey, String>>,
}

impl InMemoryRenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self, key: RenderCacheKey, fragment: impl Into<String>) {
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        guard.insert(key, fragment.into());
    }

    pub fn get(&self, key: &RenderCacheKey) -> Option<String> {
        let guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        guard.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RenderCache for InMemoryRenderCache {
    fn invalidate(&self, key: &RenderCacheKey) {
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.remove(key).is_some() {
            trace!(
                placeholder_id = %key.placeholder_id,
                language = %key.language,
                site_id = %key.site_id,
                "render cache entry dropped"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::article::{LanguageCode, PlaceholderId, SiteId};

    fn key(language: &str) -> RenderCacheKey {
        RenderCacheKey {
            placeholder_id: PlaceholderId::new(3).unwrap(),
            language: LanguageCode::new(language).unwrap(),
            site_id: SiteId::new(1).unwrap(),
        }
    }

    #[test]
    fn invalidate_drops_only_the_matching_language() {
        let cache = InMemoryRenderCache::new();
        cache.store(key("en"), "<p>hello</p>");
        cache.store(key("de"), "<p>hallo</p>");

        cache.invalidate(&key("en"));

        assert_eq!(cache.get(&key("en")), None);
        assert_eq!(cache.get(&key("de")).as_deref(), Some("<p>hallo</p>"));
        assert_eq!(cache.len(), 1);
    }
}

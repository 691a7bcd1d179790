use crate::domain::article::{LanguageCode, PlaceholderId, SiteId};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RenderCacheKey {
    pub placeholder_id: PlaceholderId,
    pub language: LanguageCode,
    pub site_id: SiteId,
}

/// Rendered-placeholder cache owned by the rendering side. The revision
/// engine only ever invalidates entries.
pub trait RenderCache: Send + Sync {
    fn invalidate(&self, key: &RenderCacheKey);
}

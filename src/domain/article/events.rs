use crate::domain::article::value_objects::{ArticleId, LanguageCode};
use chrono::{DateTime, Utc};

/// Notifications for collaborators outside the revision engine (search
/// indexing, redirects, caches). Emitted after the transaction commits.
#[derive(Debug, Clone, PartialEq)]
pub enum ArticleEvent {
    Published {
        draft_id: ArticleId,
        public_id: ArticleId,
        language: LanguageCode,
        at: DateTime<Utc>,
    },
    Unpublished {
        draft_id: ArticleId,
        public_id: ArticleId,
        language: LanguageCode,
        at: DateTime<Utc>,
    },
    Reverted {
        draft_id: ArticleId,
        language: LanguageCode,
        at: DateTime<Utc>,
    },
    Deleted {
        draft_id: ArticleId,
        public_id: Option<ArticleId>,
        at: DateTime<Utc>,
    },
}

impl ArticleEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ArticleEvent::Published { .. } => "published",
            ArticleEvent::Unpublished { .. } => "unpublished",
            ArticleEvent::Reverted { .. } => "reverted",
            ArticleEvent::Deleted { .. } => "deleted",
        }
    }

    pub fn draft_id(&self) -> ArticleId {
        match self {
            ArticleEvent::Published { draft_id, .. }
            | ArticleEvent::Unpublished { draft_id, .. }
            | ArticleEvent::Reverted { draft_id, .. }
            | ArticleEvent::Deleted { draft_id, .. } => *draft_id,
        }
    }
}

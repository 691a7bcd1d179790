// src/domain/article/services/mod.rs
//! The draft/public revision engine. Every function here works against an
//! open [`ArticleUnitOfWork`](crate::domain::article::ArticleUnitOfWork) and
//! never commits it; the caller owns the transaction boundary.
pub mod dirty;
pub mod ledger;
pub mod pair;
pub mod replicator;
pub mod slug;

pub use dirty::{DirtyTracker, StateTracking};
pub use pair::{DeletedPair, RevisionPair};
pub use replicator::ContentCopy;
pub use slug::ArticleSlugService;

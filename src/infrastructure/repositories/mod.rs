// src/infrastructure/repositories/mod.rs
mod articles;
mod error;
mod sqlite_taxonomy;

pub use articles::{SqliteArticleReadRepository, SqliteArticleStore, SqliteUnitOfWork};
pub use error::map_sqlx;
pub use sqlite_taxonomy::SqliteTaxonomyRepository;

mod read;
mod rows;
mod store;

pub use read::SqliteArticleReadRepository;
pub use store::{SqliteArticleStore, SqliteUnitOfWork};

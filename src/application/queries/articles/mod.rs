mod archive;
mod get_by_id;
mod get_by_slug;
mod list;
mod service;

pub use archive::ArchiveQuery;
pub use get_by_id::GetArticleByIdQuery;
pub use get_by_slug::GetArticleBySlugQuery;
pub use list::{ListArticlesQuery, ListFilterQuery};
pub use service::ArticleQueryService;

pub mod articles;
pub mod auth;
pub mod serde_time;
pub mod taxonomy;

pub use articles::{
    ArchiveMonthDto, ArticleDto, ArticleSummaryDto, ContentBlockDto, LanguageColumns,
    LanguageStatus, LedgerRepairDto, PlaceholderDto, TitleDto,
};
pub use auth::Actor;
pub use taxonomy::{AttributeDto, CategoryDto};

pub mod entity;
pub mod events;
pub mod ledger;
pub mod listing;
pub mod placeholder;
pub mod repository;
pub mod services;
pub mod specifications;
pub mod taxonomy;
pub mod title;
pub mod value_objects;

pub use entity::{Article, NewArticle};
pub use events::ArticleEvent;
pub use ledger::LanguageLedger;
pub use listing::{ArchiveDate, ArchiveMonth, ArticleListFilter, PublishedArticleQuery, SlugLookup};
pub use placeholder::{ContentBlock, NewContentBlock, Placeholder};
pub use repository::{ArticleReadRepository, ArticleStore, ArticleUnitOfWork, TaxonomyRepository};
pub use taxonomy::{Attribute, Category};
pub use title::{NewTitle, Title};
pub use value_objects::{
    ArticleId, ArticleSlug, AttributeId, CategoryId, ChangedBy, ContentBlockId, ImageId,
    LanguageCode, PlaceholderId, PlaceholderSlot, PluginType, PublisherState, RevisionState,
    SiteId, TemplateName, TitleId, TitleText, TreeId,
};

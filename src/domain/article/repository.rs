use crate::domain::article::entity::{Article, NewArticle};
use crate::domain::article::ledger::LanguageLedger;
use crate::domain::article::listing::{ArchiveMonth, PublishedArticleQuery, SlugLookup};
use crate::domain::article::placeholder::{ContentBlock, NewContentBlock, Placeholder};
use crate::domain::article::taxonomy::{Attribute, Category};
use crate::domain::article::title::{NewTitle, Title};
use crate::domain::article::value_objects::{
    ArticleId, ArticleSlug, AttributeId, CategoryId, ContentBlockId, LanguageCode,
    PlaceholderId, PlaceholderSlot, TitleId, TreeId,
};
use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use std::collections::BTreeSet;

/// Entry point for writes: every command runs inside one unit of work.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    async fn begin(&self) -> DomainResult<Box<dyn ArticleUnitOfWork>>;
}

/// One storage transaction. Dropping it without `commit` rolls back every
/// write made through it.
#[async_trait]
pub trait ArticleUnitOfWork: Send {
    async fn find_article(&mut self, id: ArticleId) -> DomainResult<Option<Article>>;
    async fn insert_article(&mut self, article: NewArticle) -> DomainResult<Article>;
    /// Persists scalar fields, taxonomy and pairing of `article`. The ledger
    /// is written only through `update_languages`.
    async fn update_article(&mut self, article: &Article) -> DomainResult<()>;
    async fn update_languages(
        &mut self,
        id: ArticleId,
        languages: &LanguageLedger,
    ) -> DomainResult<()>;
    /// Removes the rows; owned titles, placeholders and blocks must be gone.
    async fn delete_articles(&mut self, ids: &[ArticleId]) -> DomainResult<()>;

    async fn find_title(
        &mut self,
        article_id: ArticleId,
        language: &LanguageCode,
    ) -> DomainResult<Option<Title>>;
    async fn find_title_by_id(&mut self, id: TitleId) -> DomainResult<Option<Title>>;
    async fn list_titles(&mut self, article_id: ArticleId) -> DomainResult<Vec<Title>>;
    async fn insert_title(&mut self, title: NewTitle) -> DomainResult<Title>;
    async fn update_title(&mut self, title: &Title) -> DomainResult<()>;
    async fn delete_titles(&mut self, ids: &[TitleId]) -> DomainResult<()>;
    /// Slugs already used by titles in `language` that start with `prefix`,
    /// ignoring titles owned by `exclude`.
    async fn slugs_in_use(
        &mut self,
        language: &LanguageCode,
        prefix: &str,
        exclude: &[ArticleId],
    ) -> DomainResult<Vec<String>>;

    async fn list_placeholders(&mut self, article_id: ArticleId) -> DomainResult<Vec<Placeholder>>;
    async fn find_placeholder(&mut self, id: PlaceholderId) -> DomainResult<Option<Placeholder>>;
    async fn insert_placeholder(
        &mut self,
        article_id: ArticleId,
        slot: &PlaceholderSlot,
    ) -> DomainResult<Placeholder>;
    async fn delete_placeholders(&mut self, ids: &[PlaceholderId]) -> DomainResult<()>;

    /// Blocks of a placeholder, all languages when `language` is `None`.
    async fn list_blocks(
        &mut self,
        placeholder_id: PlaceholderId,
        language: Option<&LanguageCode>,
    ) -> DomainResult<Vec<ContentBlock>>;
    async fn find_block(&mut self, id: ContentBlockId) -> DomainResult<Option<ContentBlock>>;
    async fn insert_block(&mut self, block: NewContentBlock) -> DomainResult<ContentBlock>;
    async fn update_block(&mut self, block: &ContentBlock) -> DomainResult<()>;
    /// Deletes in the given order.
    async fn delete_blocks(&mut self, ids: &[ContentBlockId]) -> DomainResult<()>;

    async fn missing_categories(
        &mut self,
        ids: &BTreeSet<CategoryId>,
    ) -> DomainResult<Vec<CategoryId>>;
    async fn missing_attributes(
        &mut self,
        ids: &BTreeSet<AttributeId>,
    ) -> DomainResult<Vec<AttributeId>>;

    async fn commit(self: Box<Self>) -> DomainResult<()>;
}

#[async_trait]
pub trait ArticleReadRepository: Send + Sync {
    async fn find_article(&self, id: ArticleId) -> DomainResult<Option<Article>>;
    async fn list_titles(&self, article_id: ArticleId) -> DomainResult<Vec<Title>>;
    async fn list_placeholders(&self, article_id: ArticleId) -> DomainResult<Vec<Placeholder>>;
    async fn list_blocks(
        &self,
        placeholder_id: PlaceholderId,
        language: Option<&LanguageCode>,
    ) -> DomainResult<Vec<ContentBlock>>;
    async fn find_titles_by_slug(
        &self,
        slug: &ArticleSlug,
        language: Option<&LanguageCode>,
        lookup: SlugLookup,
    ) -> DomainResult<Vec<Title>>;
    /// Draft articles, newest first, optionally restricted to a tree.
    async fn list_drafts(&self, tree_id: Option<TreeId>, limit: u32) -> DomainResult<Vec<Article>>;
    /// Public articles visible at `query.now`, newest `order_date` first.
    async fn list_published(&self, query: &PublishedArticleQuery) -> DomainResult<Vec<Article>>;
    async fn archive_months(&self, query: &PublishedArticleQuery)
    -> DomainResult<Vec<ArchiveMonth>>;
}

#[async_trait]
pub trait TaxonomyRepository: Send + Sync {
    async fn insert_category(
        &self,
        name: String,
        parent_id: Option<CategoryId>,
    ) -> DomainResult<Category>;
    async fn list_categories(&self) -> DomainResult<Vec<Category>>;
    async fn insert_attribute(&self, name: String) -> DomainResult<Attribute>;
    async fn list_attributes(&self) -> DomainResult<Vec<Attribute>>;
}

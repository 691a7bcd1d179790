// src/infrastructure/repositories/articles/rows.rs
//! Row types and the lookups shared by the unit of work and the read side.
//! Every helper takes a plain connection so it runs the same inside or
//! outside a transaction.
use super::super::map_sqlx;
use crate::domain::article::{
    Article, ArticleId, ArticleSlug, AttributeId, CategoryId, ChangedBy, ContentBlock,
    ContentBlockId, ImageId, LanguageCode, LanguageLedger, Placeholder, PlaceholderId,
    PlaceholderSlot, PluginType, PublisherState, TemplateName, Title, TitleId, TitleText, TreeId,
};
use crate::domain::errors::{DomainError, DomainResult};
use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqliteConnection};
use std::collections::BTreeSet;

macro_rules! article_columns {
    () => {
        "id, tree_id, template, created_by, changed_by, creation_date, changed_date, \
         publication_date, publication_end_date, order_date, login_required, is_draft, \
         public_id, languages"
    };
}

macro_rules! title_columns {
    () => {
        "id, article_id, language, title, slug, description, page_title, menu_title, \
         meta_description, image_id, creation_date, published, is_draft, public_id, \
         publisher_state"
    };
}

macro_rules! block_columns {
    () => {
        "id, placeholder_id, parent_id, language, plugin_type, position, depth, payload"
    };
}

pub(crate) use {article_columns, block_columns, title_columns};

#[derive(Debug, FromRow)]
pub(crate) struct ArticleRow {
    id: i64,
    tree_id: i64,
    template: String,
    created_by: String,
    changed_by: String,
    creation_date: DateTime<Utc>,
    changed_date: DateTime<Utc>,
    publication_date: Option<DateTime<Utc>>,
    publication_end_date: Option<DateTime<Utc>>,
    order_date: DateTime<Utc>,
    login_required: bool,
    is_draft: bool,
    public_id: Option<i64>,
    languages: Option<String>,
}

impl ArticleRow {
    fn into_article(
        self,
        categories: BTreeSet<CategoryId>,
        attributes: BTreeSet<AttributeId>,
    ) -> DomainResult<Article> {
        Ok(Article {
            id: ArticleId::new(self.id)?,
            tree_id: TreeId::new(self.tree_id)?,
            template: TemplateName::new(self.template)?,
            categories,
            attributes,
            created_by: ChangedBy::from_stored(self.created_by),
            changed_by: ChangedBy::from_stored(self.changed_by),
            creation_date: self.creation_date,
            changed_date: self.changed_date,
            publication_date: self.publication_date,
            publication_end_date: self.publication_end_date,
            order_date: self.order_date,
            login_required: self.login_required,
            is_draft: self.is_draft,
            public_id: self.public_id.map(ArticleId::new).transpose()?,
            languages: LanguageLedger::parse(self.languages.as_deref())?,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct TitleRow {
    id: i64,
    article_id: i64,
    language: String,
    title: String,
    slug: String,
    description: String,
    page_title: Option<String>,
    menu_title: Option<String>,
    meta_description: Option<String>,
    image_id: Option<i64>,
    creation_date: DateTime<Utc>,
    published: bool,
    is_draft: bool,
    public_id: Option<i64>,
    publisher_state: i64,
}

impl TryFrom<TitleRow> for Title {
    type Error = DomainError;

    fn try_from(row: TitleRow) -> Result<Self, Self::Error> {
        Ok(Title {
            id: TitleId::new(row.id)?,
            article_id: ArticleId::new(row.article_id)?,
            language: LanguageCode::new(row.language)?,
            title: TitleText::new(row.title)?,
            slug: ArticleSlug::new(row.slug)?,
            description: row.description,
            page_title: row.page_title,
            menu_title: row.menu_title,
            meta_description: row.meta_description,
            image_id: row.image_id.map(ImageId::new).transpose()?,
            creation_date: row.creation_date,
            published: row.published,
            is_draft: row.is_draft,
            public_id: row.public_id.map(TitleId::new).transpose()?,
            publisher_state: PublisherState::from_code(row.publisher_state)?,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct PlaceholderRow {
    id: i64,
    article_id: i64,
    slot: String,
}

impl TryFrom<PlaceholderRow> for Placeholder {
    type Error = DomainError;

    fn try_from(row: PlaceholderRow) -> Result<Self, Self::Error> {
        Ok(Placeholder {
            id: PlaceholderId::new(row.id)?,
            article_id: ArticleId::new(row.article_id)?,
            slot: PlaceholderSlot::new(row.slot)?,
        })
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct BlockRow {
    id: i64,
    placeholder_id: i64,
    parent_id: Option<i64>,
    language: String,
    plugin_type: String,
    position: i64,
    depth: i64,
    payload: String,
}

impl TryFrom<BlockRow> for ContentBlock {
    type Error = DomainError;

    fn try_from(row: BlockRow) -> Result<Self, Self::Error> {
        let payload = serde_json::from_str(&row.payload).map_err(|err| {
            DomainError::Persistence(format!("block {} has a corrupt payload: {err}", row.id))
        })?;
        Ok(ContentBlock {
            id: ContentBlockId::new(row.id)?,
            placeholder_id: PlaceholderId::new(row.placeholder_id)?,
            parent_id: row.parent_id.map(ContentBlockId::new).transpose()?,
            language: LanguageCode::new(row.language)?,
            plugin_type: PluginType::new(row.plugin_type)?,
            position: row.position,
            depth: row.depth,
            payload,
        })
    }
}

pub(crate) async fn hydrate_article(
    conn: &mut SqliteConnection,
    row: ArticleRow,
) -> DomainResult<Article> {
    let categories: Vec<i64> = sqlx::query_scalar(
        "SELECT category_id FROM article_categories WHERE article_id = ? ORDER BY category_id",
    )
    .bind(row.id)
    .fetch_all(&mut *conn)
    .await
    .map_err(map_sqlx)?;
    let attributes: Vec<i64> = sqlx::query_scalar(
        "SELECT attribute_id FROM article_attributes WHERE article_id = ? ORDER BY attribute_id",
    )
    .bind(row.id)
    .fetch_all(&mut *conn)
    .await
    .map_err(map_sqlx)?;

    row.into_article(
        categories
            .into_iter()
            .map(CategoryId::new)
            .collect::<Result<_, _>>()?,
        attributes
            .into_iter()
            .map(AttributeId::new)
            .collect::<Result<_, _>>()?,
    )
}

pub(crate) async fn hydrate_articles(
    conn: &mut SqliteConnection,
    rows: Vec<ArticleRow>,
) -> DomainResult<Vec<Article>> {
    let mut articles = Vec::with_capacity(rows.len());
    for row in rows {
        articles.push(hydrate_article(conn, row).await?);
    }
    Ok(articles)
}

pub(crate) async fn fetch_article(
    conn: &mut SqliteConnection,
    id: ArticleId,
) -> DomainResult<Option<Article>> {
    let row = sqlx::query_as::<_, ArticleRow>(concat!(
        "SELECT ",
        article_columns!(),
        " FROM articles WHERE id = ?"
    ))
    .bind(i64::from(id))
    .fetch_optional(&mut *conn)
    .await
    .map_err(map_sqlx)?;

    match row {
        Some(row) => Ok(Some(hydrate_article(conn, row).await?)),
        None => Ok(None),
    }
}

/// Titles of an article in creation order.
pub(crate) async fn fetch_titles(
    conn: &mut SqliteConnection,
    article_id: ArticleId,
) -> DomainResult<Vec<Title>> {
    let rows = sqlx::query_as::<_, TitleRow>(concat!(
        "SELECT ",
        title_columns!(),
        " FROM article_titles WHERE article_id = ? ORDER BY id"
    ))
    .bind(i64::from(article_id))
    .fetch_all(&mut *conn)
    .await
    .map_err(map_sqlx)?;

    rows.into_iter().map(Title::try_from).collect()
}

pub(crate) async fn fetch_placeholders(
    conn: &mut SqliteConnection,
    article_id: ArticleId,
) -> DomainResult<Vec<Placeholder>> {
    let rows = sqlx::query_as::<_, PlaceholderRow>(
        "SELECT id, article_id, slot FROM placeholders WHERE article_id = ? ORDER BY id",
    )
    .bind(i64::from(article_id))
    .fetch_all(&mut *conn)
    .await
    .map_err(map_sqlx)?;

    rows.into_iter().map(Placeholder::try_from).collect()
}

pub(crate) async fn fetch_blocks(
    conn: &mut SqliteConnection,
    placeholder_id: PlaceholderId,
    language: Option<&LanguageCode>,
) -> DomainResult<Vec<ContentBlock>> {
    let rows = match language {
        Some(language) => {
            sqlx::query_as::<_, BlockRow>(concat!(
                "SELECT ",
                block_columns!(),
                " FROM content_blocks WHERE placeholder_id = ? AND language = ? \
                 ORDER BY depth, position, id"
            ))
            .bind(i64::from(placeholder_id))
            .bind(language.as_str())
            .fetch_all(&mut *conn)
            .await
        }
        None => {
            sqlx::query_as::<_, BlockRow>(concat!(
                "SELECT ",
                block_columns!(),
                " FROM content_blocks WHERE placeholder_id = ? \
                 ORDER BY language, depth, position, id"
            ))
            .bind(i64::from(placeholder_id))
            .fetch_all(&mut *conn)
            .await
        }
    }
    .map_err(map_sqlx)?;

    rows.into_iter().map(ContentBlock::try_from).collect()
}

// src/infrastructure/repositories/articles/store.rs
use super::super::map_sqlx;
use super::rows::{
    BlockRow, PlaceholderRow, TitleRow, block_columns, fetch_article, fetch_blocks,
    fetch_placeholders, fetch_titles, title_columns,
};
use crate::domain::article::{
    Article, ArticleId, ArticleStore, ArticleUnitOfWork, AttributeId, CategoryId, ContentBlock,
    ContentBlockId, LanguageCode, LanguageLedger, NewArticle, NewContentBlock, NewTitle,
    Placeholder, PlaceholderId, PlaceholderSlot, Title, TitleId,
};
use crate::domain::errors::{DomainError, DomainResult};
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::collections::BTreeSet;

#[derive(Clone)]
pub struct SqliteArticleStore {
    pool: SqlitePool,
}

impl SqliteArticleStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ArticleStore for SqliteArticleStore {
    /// Takes the write lock up front. A deferred transaction would read
    /// first and then fail to upgrade when another writer got in between.
    async fn begin(&self) -> DomainResult<Box<dyn ArticleUnitOfWork>> {
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(map_sqlx)?;
        Ok(Box::new(SqliteUnitOfWork { tx }))
    }
}

/// One SQLite transaction. Dropping it rolls back.
pub struct SqliteUnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl SqliteUnitOfWork {
    fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.tx
    }
}

async fn replace_taxonomy(
    conn: &mut SqliteConnection,
    id: i64,
    categories: &BTreeSet<CategoryId>,
    attributes: &BTreeSet<AttributeId>,
) -> DomainResult<()> {
    sqlx::query("DELETE FROM article_categories WHERE article_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx)?;
    for category in categories {
        sqlx::query("INSERT INTO article_categories (article_id, category_id) VALUES (?, ?)")
            .bind(id)
            .bind(i64::from(*category))
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx)?;
    }

    sqlx::query("DELETE FROM article_attributes WHERE article_id = ?")
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx)?;
    for attribute in attributes {
        sqlx::query("INSERT INTO article_attributes (article_id, attribute_id) VALUES (?, ?)")
            .bind(id)
            .bind(i64::from(*attribute))
            .execute(&mut *conn)
            .await
            .map_err(map_sqlx)?;
    }
    Ok(())
}

/// Ids among `wanted` that `table` does not contain.
async fn missing_ids(
    conn: &mut SqliteConnection,
    table: &str,
    wanted: impl Iterator<Item = i64>,
) -> DomainResult<Vec<i64>> {
    let wanted: Vec<i64> = wanted.collect();
    if wanted.is_empty() {
        return Ok(Vec::new());
    }
    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT id FROM ");
    builder.push(table);
    builder.push(" WHERE id IN (");
    let mut separated = builder.separated(", ");
    for id in &wanted {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let found: BTreeSet<i64> = builder
        .build_query_scalar::<i64>()
        .fetch_all(&mut *conn)
        .await
        .map_err(map_sqlx)?
        .into_iter()
        .collect();
    Ok(wanted.into_iter().filter(|id| !found.contains(id)).collect())
}

fn ensure_affected(rows: u64, what: impl FnOnce() -> String) -> DomainResult<()> {
    if rows == 0 {
        Err(DomainError::NotFound(what()))
    } else {
        Ok(())
    }
}

#[async_trait]
impl ArticleUnitOfWork for SqliteUnitOfWork {
    async fn find_article(&mut self, id: ArticleId) -> DomainResult<Option<Article>> {
        fetch_article(self.conn(), id).await
    }

    async fn insert_article(&mut self, article: NewArticle) -> DomainResult<Article> {
        let order_date = article.order_date();
        let conn = self.conn();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO articles (tree_id, template, created_by, changed_by, creation_date, \
             changed_date, publication_date, publication_end_date, order_date, login_required, \
             is_draft, public_id) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(i64::from(article.tree_id))
        .bind(article.template.as_str())
        .bind(article.created_by.as_str())
        .bind(article.changed_by.as_str())
        .bind(article.creation_date)
        .bind(article.creation_date)
        .bind(article.publication_date)
        .bind(article.publication_end_date)
        .bind(order_date)
        .bind(article.login_required)
        .bind(article.is_draft)
        .bind(article.public_id.map(i64::from))
        .fetch_one(&mut *conn)
        .await
        .map_err(map_sqlx)?;

        replace_taxonomy(conn, id, &article.categories, &article.attributes).await?;
        let id = ArticleId::new(id)?;
        fetch_article(conn, id)
            .await?
            .ok_or_else(|| DomainError::Persistence(format!("article {id} vanished after insert")))
    }

    async fn update_article(&mut self, article: &Article) -> DomainResult<()> {
        let conn = self.conn();
        let result = sqlx::query(
            "UPDATE articles SET tree_id = ?, template = ?, created_by = ?, changed_by = ?, \
             changed_date = ?, publication_date = ?, publication_end_date = ?, order_date = ?, \
             login_required = ?, is_draft = ?, public_id = ? WHERE id = ?",
        )
        .bind(i64::from(article.tree_id))
        .bind(article.template.as_str())
        .bind(article.created_by.as_str())
        .bind(article.changed_by.as_str())
        .bind(article.changed_date)
        .bind(article.publication_date)
        .bind(article.publication_end_date)
        .bind(article.order_date)
        .bind(article.login_required)
        .bind(article.is_draft)
        .bind(article.public_id.map(i64::from))
        .bind(i64::from(article.id))
        .execute(&mut *conn)
        .await
        .map_err(map_sqlx)?;
        ensure_affected(result.rows_affected(), || {
            format!("article {} not found", article.id)
        })?;

        replace_taxonomy(
            conn,
            article.id.into(),
            &article.categories,
            &article.attributes,
        )
        .await
    }

    async fn update_languages(
        &mut self,
        id: ArticleId,
        languages: &LanguageLedger,
    ) -> DomainResult<()> {
        let result = sqlx::query("UPDATE articles SET languages = ? WHERE id = ?")
            .bind(languages.to_stored())
            .bind(i64::from(id))
            .execute(self.conn())
            .await
            .map_err(map_sqlx)?;
        ensure_affected(result.rows_affected(), || format!("article {id} not found"))
    }

    async fn delete_articles(&mut self, ids: &[ArticleId]) -> DomainResult<()> {
        let conn = self.conn();
        for id in ids {
            sqlx::query("DELETE FROM articles WHERE id = ?")
                .bind(i64::from(*id))
                .execute(&mut *conn)
                .await
                .map_err(map_sqlx)?;
        }
        Ok(())
    }

    async fn find_title(
        &mut self,
        article_id: ArticleId,
        language: &LanguageCode,
    ) -> DomainResult<Option<Title>> {
        let row = sqlx::query_as::<_, TitleRow>(concat!(
            "SELECT ",
            title_columns!(),
            " FROM article_titles WHERE article_id = ? AND language = ?"
        ))
        .bind(i64::from(article_id))
        .bind(language.as_str())
        .fetch_optional(self.conn())
        .await
        .map_err(map_sqlx)?;

        row.map(Title::try_from).transpose()
    }

    async fn find_title_by_id(&mut self, id: TitleId) -> DomainResult<Option<Title>> {
        let row = sqlx::query_as::<_, TitleRow>(concat!(
            "SELECT ",
            title_columns!(),
            " FROM article_titles WHERE id = ?"
        ))
        .bind(i64::from(id))
        .fetch_optional(self.conn())
        .await
        .map_err(map_sqlx)?;

        row.map(Title::try_from).transpose()
    }

    async fn list_titles(&mut self, article_id: ArticleId) -> DomainResult<Vec<Title>> {
        fetch_titles(self.conn(), article_id).await
    }

    async fn insert_title(&mut self, title: NewTitle) -> DomainResult<Title> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO article_titles (article_id, language, title, slug, description, \
             page_title, menu_title, meta_description, image_id, creation_date, published, \
             is_draft, public_id, publisher_state) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(i64::from(title.article_id))
        .bind(title.language.as_str())
        .bind(title.title.as_str())
        .bind(title.slug.as_str())
        .bind(title.description.as_str())
        .bind(title.page_title.as_deref())
        .bind(title.menu_title.as_deref())
        .bind(title.meta_description.as_deref())
        .bind(title.image_id.map(i64::from))
        .bind(title.creation_date)
        .bind(title.published)
        .bind(title.is_draft)
        .bind(title.public_id.map(i64::from))
        .bind(title.publisher_state.code())
        .fetch_one(self.conn())
        .await
        .map_err(map_sqlx)?;

        Ok(Title {
            id: TitleId::new(id)?,
            article_id: title.article_id,
            language: title.language,
            title: title.title,
            slug: title.slug,
            description: title.description,
            page_title: title.page_title,
            menu_title: title.menu_title,
            meta_description: title.meta_description,
            image_id: title.image_id,
            creation_date: title.creation_date,
            published: title.published,
            is_draft: title.is_draft,
            public_id: title.public_id,
            publisher_state: title.publisher_state,
        })
    }

    async fn update_title(&mut self, title: &Title) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE article_titles SET language = ?, title = ?, slug = ?, description = ?, \
             page_title = ?, menu_title = ?, meta_description = ?, image_id = ?, \
             creation_date = ?, published = ?, is_draft = ?, public_id = ?, \
             publisher_state = ? WHERE id = ?",
        )
        .bind(title.language.as_str())
        .bind(title.title.as_str())
        .bind(title.slug.as_str())
        .bind(title.description.as_str())
        .bind(title.page_title.as_deref())
        .bind(title.menu_title.as_deref())
        .bind(title.meta_description.as_deref())
        .bind(title.image_id.map(i64::from))
        .bind(title.creation_date)
        .bind(title.published)
        .bind(title.is_draft)
        .bind(title.public_id.map(i64::from))
        .bind(title.publisher_state.code())
        .bind(i64::from(title.id))
        .execute(self.conn())
        .await
        .map_err(map_sqlx)?;
        ensure_affected(result.rows_affected(), || {
            format!("title {} not found", title.id)
        })
    }

    async fn delete_titles(&mut self, ids: &[TitleId]) -> DomainResult<()> {
        let conn = self.conn();
        for id in ids {
            sqlx::query("DELETE FROM article_titles WHERE id = ?")
                .bind(i64::from(*id))
                .execute(&mut *conn)
                .await
                .map_err(map_sqlx)?;
        }
        Ok(())
    }

    async fn slugs_in_use(
        &mut self,
        language: &LanguageCode,
        prefix: &str,
        exclude: &[ArticleId],
    ) -> DomainResult<Vec<String>> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT slug FROM article_titles WHERE language = ");
        builder.push_bind(language.as_str());
        builder.push(" AND substr(slug, 1, length(");
        builder.push_bind(prefix);
        builder.push(")) = ");
        builder.push_bind(prefix);
        if !exclude.is_empty() {
            builder.push(" AND article_id NOT IN (");
            let mut separated = builder.separated(", ");
            for id in exclude {
                separated.push_bind(i64::from(*id));
            }
            separated.push_unseparated(")");
        }

        builder
            .build_query_scalar::<String>()
            .fetch_all(self.conn())
            .await
            .map_err(map_sqlx)
    }

    async fn list_placeholders(&mut self, article_id: ArticleId) -> DomainResult<Vec<Placeholder>> {
        fetch_placeholders(self.conn(), article_id).await
    }

    async fn find_placeholder(&mut self, id: PlaceholderId) -> DomainResult<Option<Placeholder>> {
        let row = sqlx::query_as::<_, PlaceholderRow>(
            "SELECT id, article_id, slot FROM placeholders WHERE id = ?",
        )
        .bind(i64::from(id))
        .fetch_optional(self.conn())
        .await
        .map_err(map_sqlx)?;

        row.map(Placeholder::try_from).transpose()
    }

    async fn insert_placeholder(
        &mut self,
        article_id: ArticleId,
        slot: &PlaceholderSlot,
    ) -> DomainResult<Placeholder> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO placeholders (article_id, slot) VALUES (?, ?) RETURNING id",
        )
        .bind(i64::from(article_id))
        .bind(slot.as_str())
        .fetch_one(self.conn())
        .await
        .map_err(map_sqlx)?;

        Ok(Placeholder {
            id: PlaceholderId::new(id)?,
            article_id,
            slot: slot.clone(),
        })
    }

    async fn delete_placeholders(&mut self, ids: &[PlaceholderId]) -> DomainResult<()> {
        let conn = self.conn();
        for id in ids {
            sqlx::query("DELETE FROM placeholders WHERE id = ?")
                .bind(i64::from(*id))
                .execute(&mut *conn)
                .await
                .map_err(map_sqlx)?;
        }
        Ok(())
    }

    async fn list_blocks(
        &mut self,
        placeholder_id: PlaceholderId,
        language: Option<&LanguageCode>,
    ) -> DomainResult<Vec<ContentBlock>> {
        fetch_blocks(self.conn(), placeholder_id, language).await
    }

    async fn find_block(&mut self, id: ContentBlockId) -> DomainResult<Option<ContentBlock>> {
        let row = sqlx::query_as::<_, BlockRow>(concat!(
            "SELECT ",
            block_columns!(),
            " FROM content_blocks WHERE id = ?"
        ))
        .bind(i64::from(id))
        .fetch_optional(self.conn())
        .await
        .map_err(map_sqlx)?;

        row.map(ContentBlock::try_from).transpose()
    }

    async fn insert_block(&mut self, block: NewContentBlock) -> DomainResult<ContentBlock> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO content_blocks (placeholder_id, parent_id, language, plugin_type, \
             position, depth, payload) VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(i64::from(block.placeholder_id))
        .bind(block.parent_id.map(i64::from))
        .bind(block.language.as_str())
        .bind(block.plugin_type.as_str())
        .bind(block.position)
        .bind(block.depth)
        .bind(block.payload.to_string())
        .fetch_one(self.conn())
        .await
        .map_err(map_sqlx)?;

        Ok(ContentBlock {
            id: ContentBlockId::new(id)?,
            placeholder_id: block.placeholder_id,
            parent_id: block.parent_id,
            language: block.language,
            plugin_type: block.plugin_type,
            position: block.position,
            depth: block.depth,
            payload: block.payload,
        })
    }

    async fn update_block(&mut self, block: &ContentBlock) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE content_blocks SET placeholder_id = ?, parent_id = ?, language = ?, \
             plugin_type = ?, position = ?, depth = ?, payload = ? WHERE id = ?",
        )
        .bind(i64::from(block.placeholder_id))
        .bind(block.parent_id.map(i64::from))
        .bind(block.language.as_str())
        .bind(block.plugin_type.as_str())
        .bind(block.position)
        .bind(block.depth)
        .bind(block.payload.to_string())
        .bind(i64::from(block.id))
        .execute(self.conn())
        .await
        .map_err(map_sqlx)?;
        ensure_affected(result.rows_affected(), || {
            format!("block {} not found", block.id)
        })
    }

    async fn delete_blocks(&mut self, ids: &[ContentBlockId]) -> DomainResult<()> {
        let conn = self.conn();
        for id in ids {
            sqlx::query("DELETE FROM content_blocks WHERE id = ?")
                .bind(i64::from(*id))
                .execute(&mut *conn)
                .await
                .map_err(map_sqlx)?;
        }
        Ok(())
    }

    async fn missing_categories(
        &mut self,
        ids: &BTreeSet<CategoryId>,
    ) -> DomainResult<Vec<CategoryId>> {
        missing_ids(self.conn(), "categories", ids.iter().map(|id| i64::from(*id)))
            .await?
            .into_iter()
            .map(CategoryId::new)
            .collect()
    }

    async fn missing_attributes(
        &mut self,
        ids: &BTreeSet<AttributeId>,
    ) -> DomainResult<Vec<AttributeId>> {
        missing_ids(self.conn(), "attributes", ids.iter().map(|id| i64::from(*id)))
            .await?
            .into_iter()
            .map(AttributeId::new)
            .collect()
    }

    async fn commit(self: Box<Self>) -> DomainResult<()> {
        self.tx.commit().await.map_err(map_sqlx)
    }
}

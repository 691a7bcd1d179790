// src/infrastructure/repositories/articles/read.rs
use super::super::map_sqlx;
use super::rows::{
    ArticleRow, TitleRow, article_columns, fetch_article, fetch_blocks, fetch_placeholders,
    fetch_titles, hydrate_articles, title_columns,
};
use crate::domain::article::{
    ArchiveMonth, Article, ArticleId, ArticleListFilter, ArticleReadRepository, ArticleSlug,
    ContentBlock, LanguageCode, Placeholder, PlaceholderId, PublishedArticleQuery, SlugLookup,
    Title, TreeId,
};
use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use sqlx::pool::PoolConnection;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

#[derive(Clone)]
pub struct SqliteArticleReadRepository {
    pool: SqlitePool,
}

impl SqliteArticleReadRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn acquire(&self) -> DomainResult<PoolConnection<Sqlite>> {
        self.pool.acquire().await.map_err(map_sqlx)
    }
}

#[derive(Debug, FromRow)]
struct ArchiveRow {
    year: i64,
    month: i64,
    count: i64,
}

/// Opens the statement, adding the recursive category walk when the filter
/// needs it. Leaves the builder right after `FROM articles a WHERE`.
fn published_prelude(
    builder: &mut QueryBuilder<'_, Sqlite>,
    query: &PublishedArticleQuery,
    select: &str,
) {
    if let Some(ArticleListFilter::ByCategoryWithSubcategories { category_id }) = &query.filter {
        builder.push("WITH RECURSIVE subtree(id) AS (SELECT ");
        builder.push_bind(i64::from(*category_id));
        builder.push(
            " UNION SELECT c.id FROM categories c JOIN subtree s ON c.parent_id = s.id) ",
        );
    }
    builder.push(select);
    builder.push(" FROM articles a WHERE ");
}

/// Public articles visible at `query.now` with a published title in the
/// requested language, or in any language.
fn published_conditions(builder: &mut QueryBuilder<'_, Sqlite>, query: &PublishedArticleQuery) {
    builder.push("a.is_draft = 0 AND (a.publication_date IS NULL OR a.publication_date <= ");
    builder.push_bind(query.now);
    builder.push(") AND (a.publication_end_date IS NULL OR a.publication_end_date > ");
    builder.push_bind(query.now);
    builder.push(
        ") AND EXISTS (SELECT 1 FROM article_titles t WHERE t.article_id = a.id AND t.published = 1",
    );
    if let Some(language) = &query.language {
        builder.push(" AND t.language = ");
        builder.push_bind(language.as_str().to_owned());
    }
    builder.push(")");

    match &query.filter {
        Some(ArticleListFilter::ByTreeAndCategory {
            tree_id,
            category_id,
        }) => {
            builder.push(" AND a.tree_id = ");
            builder.push_bind(i64::from(*tree_id));
            if let Some(category_id) = category_id {
                builder.push(
                    " AND EXISTS (SELECT 1 FROM article_categories ac \
                     WHERE ac.article_id = a.id AND ac.category_id = ",
                );
                builder.push_bind(i64::from(*category_id));
                builder.push(")");
            }
        }
        Some(ArticleListFilter::ByCategoryWithSubcategories { .. }) => {
            builder.push(
                " AND EXISTS (SELECT 1 FROM article_categories ac \
                 WHERE ac.article_id = a.id AND ac.category_id IN (SELECT id FROM subtree))",
            );
        }
        None => {}
    }

    if let Some(archive) = &query.archive {
        builder.push(" AND CAST(strftime('%Y', a.order_date) AS INTEGER) = ");
        builder.push_bind(i64::from(archive.year));
        if let Some(month) = archive.month {
            builder.push(" AND CAST(strftime('%m', a.order_date) AS INTEGER) = ");
            builder.push_bind(i64::from(month));
        }
        if let Some(day) = archive.day {
            builder.push(" AND CAST(strftime('%d', a.order_date) AS INTEGER) = ");
            builder.push_bind(i64::from(day));
        }
    }
}

#[async_trait]
impl ArticleReadRepository for SqliteArticleReadRepository {
    async fn find_article(&self, id: ArticleId) -> DomainResult<Option<Article>> {
        let mut conn = self.acquire().await?;
        fetch_article(&mut conn, id).await
    }

    async fn list_titles(&self, article_id: ArticleId) -> DomainResult<Vec<Title>> {
        let mut conn = self.acquire().await?;
        fetch_titles(&mut conn, article_id).await
    }

    async fn list_placeholders(&self, article_id: ArticleId) -> DomainResult<Vec<Placeholder>> {
        let mut conn = self.acquire().await?;
        fetch_placeholders(&mut conn, article_id).await
    }

    async fn list_blocks(
        &self,
        placeholder_id: PlaceholderId,
        language: Option<&LanguageCode>,
    ) -> DomainResult<Vec<ContentBlock>> {
        let mut conn = self.acquire().await?;
        fetch_blocks(&mut conn, placeholder_id, language).await
    }

    async fn find_titles_by_slug(
        &self,
        slug: &ArticleSlug,
        language: Option<&LanguageCode>,
        lookup: SlugLookup,
    ) -> DomainResult<Vec<Title>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(concat!(
            "SELECT ",
            title_columns!(),
            " FROM article_titles WHERE slug = "
        ));
        builder.push_bind(slug.as_str());
        builder.push(match lookup {
            SlugLookup::Draft => " AND is_draft = 1",
            SlugLookup::Preview => " AND is_draft = 0",
            SlugLookup::Public => " AND is_draft = 0 AND published = 1",
        });
        if let Some(language) = language {
            builder.push(" AND language = ");
            builder.push_bind(language.as_str());
        }
        builder.push(" ORDER BY id");

        let rows = builder
            .build_query_as::<TitleRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        rows.into_iter().map(Title::try_from).collect()
    }

    async fn list_drafts(&self, tree_id: Option<TreeId>, limit: u32) -> DomainResult<Vec<Article>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(concat!(
            "SELECT ",
            article_columns!(),
            " FROM articles WHERE is_draft = 1"
        ));
        if let Some(tree_id) = tree_id {
            builder.push(" AND tree_id = ");
            builder.push_bind(i64::from(tree_id));
        }
        builder.push(" ORDER BY changed_date DESC, id DESC LIMIT ");
        builder.push_bind(i64::from(limit));

        let mut conn = self.acquire().await?;
        let rows = builder
            .build_query_as::<ArticleRow>()
            .fetch_all(&mut *conn)
            .await
            .map_err(map_sqlx)?;
        hydrate_articles(&mut conn, rows).await
    }

    async fn list_published(&self, query: &PublishedArticleQuery) -> DomainResult<Vec<Article>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("");
        published_prelude(
            &mut builder,
            query,
            concat!("SELECT ", article_columns!()),
        );
        published_conditions(&mut builder, query);
        builder.push(" ORDER BY a.order_date DESC, a.id DESC LIMIT ");
        builder.push_bind(i64::from(query.limit));

        let mut conn = self.acquire().await?;
        let rows = builder
            .build_query_as::<ArticleRow>()
            .fetch_all(&mut *conn)
            .await
            .map_err(map_sqlx)?;
        hydrate_articles(&mut conn, rows).await
    }

    async fn archive_months(
        &self,
        query: &PublishedArticleQuery,
    ) -> DomainResult<Vec<ArchiveMonth>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("");
        published_prelude(
            &mut builder,
            query,
            "SELECT CAST(strftime('%Y', a.order_date) AS INTEGER) AS year, \
             CAST(strftime('%m', a.order_date) AS INTEGER) AS month, COUNT(*) AS count",
        );
        published_conditions(&mut builder, query);
        builder.push(" GROUP BY year, month ORDER BY year DESC, month DESC");

        let rows = builder
            .build_query_as::<ArchiveRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(rows
            .into_iter()
            .map(|row| ArchiveMonth {
                year: row.year as i32,
                month: row.month as u32,
                count: row.count as u64,
            })
            .collect())
    }
}

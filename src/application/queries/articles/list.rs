use super::ArticleQueryService;
use crate::{
    application::{
        dto::{Actor, ArticleSummaryDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::article::{
        ArchiveDate, Article, ArticleListFilter, CategoryId, LanguageCode,
        PublishedArticleQuery, TreeId,
    },
};

/// Tree/category selection shared by listings and the archive.
#[derive(Debug, Clone, Default)]
pub struct ListFilterQuery {
    pub tree_id: Option<i64>,
    pub category_id: Option<i64>,
    pub with_subcategories: bool,
}

impl ListFilterQuery {
    pub(super) fn parse(&self) -> ApplicationResult<Option<ArticleListFilter>> {
        let category_id = self.category_id.map(CategoryId::new).transpose()?;
        match (self.tree_id, category_id, self.with_subcategories) {
            (_, Some(category_id), true) => Ok(Some(
                ArticleListFilter::ByCategoryWithSubcategories { category_id },
            )),
            (None, None, true) => Err(ApplicationError::validation(
                "with_subcategories requires a category",
            )),
            (Some(tree_id), category_id, _) => Ok(Some(ArticleListFilter::ByTreeAndCategory {
                tree_id: TreeId::new(tree_id)?,
                category_id,
            })),
            (None, Some(_), false) => Err(ApplicationError::validation(
                "a category filter needs a tree or with_subcategories",
            )),
            (None, None, false) => Ok(None),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ListArticlesQuery {
    pub include_drafts: bool,
    pub filter: ListFilterQuery,
    pub language: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub limit: u32,
}

impl ArticleQueryService {
    /// Published listings show what an anonymous visitor would see at the
    /// current instant. Drafts are an editor view ordered by change date.
    pub async fn list_articles(
        &self,
        actor: Option<&Actor>,
        query: ListArticlesQuery,
    ) -> ApplicationResult<Vec<ArticleSummaryDto>> {
        let (include_drafts, limit) =
            self.normalize_listing(actor, query.include_drafts, query.limit)?;
        let language = query.language.map(LanguageCode::new).transpose()?;

        let articles = if include_drafts {
            let tree_id = query.filter.tree_id.map(TreeId::new).transpose()?;
            self.read_repo.list_drafts(tree_id, limit).await?
        } else {
            let archive = match query.year {
                Some(year) => Some(ArchiveDate::new(year, query.month, query.day)?),
                None if query.month.is_some() || query.day.is_some() => {
                    return Err(ApplicationError::validation("archive month requires a year"));
                }
                None => None,
            };
            let published = PublishedArticleQuery {
                filter: query.filter.parse()?,
                language: language.clone(),
                archive,
                now: self.clock.now(),
                limit,
            };
            self.read_repo.list_published(&published).await?
        };

        self.summarize(articles, language.as_ref()).await
    }

    async fn summarize(
        &self,
        articles: Vec<Article>,
        language: Option<&LanguageCode>,
    ) -> ApplicationResult<Vec<ArticleSummaryDto>> {
        let mut summaries = Vec::with_capacity(articles.len());
        for article in articles {
            let titles = self.read_repo.list_titles(article.id).await?;
            summaries.push(ArticleSummaryDto::assemble(
                &article,
                &titles,
                language,
                &self.columns,
            ));
        }
        Ok(summaries)
    }

    pub(super) fn normalize_listing(
        &self,
        actor: Option<&Actor>,
        include_drafts: bool,
        limit: u32,
    ) -> ApplicationResult<(bool, u32)> {
        if include_drafts {
            self.ensure_can_view_drafts(actor)?;
        }

        const DEFAULT_LIMIT: u32 = 20;
        const MAX_LIMIT: u32 = 100;

        let limit = if limit == 0 {
            DEFAULT_LIMIT
        } else {
            limit.min(MAX_LIMIT)
        };

        Ok((include_drafts, limit))
    }
}

use std::sync::Arc;

use crate::{
    application::{
        dto::{Actor, ArticleDto, LanguageColumns, PlaceholderDto},
        error::{ApplicationError, ApplicationResult},
        ports::time::Clock,
    },
    domain::article::{Article, ArticleReadRepository, placeholder::tree_order},
};

pub struct ArticleQueryService {
    pub(super) read_repo: Arc<dyn ArticleReadRepository>,
    pub(super) columns: Arc<LanguageColumns>,
    pub(super) clock: Arc<dyn Clock>,
}

impl ArticleQueryService {
    pub fn new(
        read_repo: Arc<dyn ArticleReadRepository>,
        columns: Arc<LanguageColumns>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            read_repo,
            columns,
            clock,
        }
    }

    pub(super) async fn detail(&self, article: Article) -> ApplicationResult<ArticleDto> {
        let titles = self.read_repo.list_titles(article.id).await?;
        let mut placeholders = Vec::new();
        for placeholder in self.read_repo.list_placeholders(article.id).await? {
            let blocks = tree_order(self.read_repo.list_blocks(placeholder.id, None).await?);
            placeholders.push(PlaceholderDto::new(placeholder, blocks));
        }
        Ok(ArticleDto::assemble(
            article,
            &titles,
            placeholders,
            &self.columns,
        ))
    }

    /// Drafts and unpublished public rows are only shown to editors.
    pub(super) fn ensure_can_view_drafts(&self, actor: Option<&Actor>) -> ApplicationResult<()> {
        let actor = actor.ok_or_else(|| {
            ApplicationError::unauthorized("authentication required for draft access")
        })?;
        if actor.has_capability("articles", "change") {
            Ok(())
        } else {
            Err(ApplicationError::forbidden(
                "missing capability articles:change",
            ))
        }
    }
}

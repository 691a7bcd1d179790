use super::ArticleQueryService;
use crate::{
    application::{
        dto::{Actor, ArticleDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::article::ArticleId,
};

pub struct GetArticleByIdQuery {
    pub id: i64,
}

impl ArticleQueryService {
    /// Either flavor by id. Callers without `articles:change` only see public
    /// rows with a published title inside their window, and login-only rows
    /// need some actor.
    pub async fn get_article_by_id(
        &self,
        actor: Option<&Actor>,
        query: GetArticleByIdQuery,
    ) -> ApplicationResult<ArticleDto> {
        let id = ArticleId::new(query.id)?;
        let article = self
            .read_repo
            .find_article(id)
            .await?
            .ok_or_else(|| ApplicationError::article_not_found(id))?;

        let visible = !article.is_draft
            && (!article.login_required || actor.is_some())
            && article.is_within_window(self.clock.now())
            && self
                .read_repo
                .list_titles(article.id)
                .await?
                .iter()
                .any(|title| title.published);
        if !visible && self.ensure_can_view_drafts(actor).is_err() {
            return Err(ApplicationError::article_not_found(id));
        }
        self.detail(article).await
    }
}

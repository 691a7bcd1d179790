use super::ArticleQueryService;
use crate::{
    application::{
        dto::{Actor, ArticleDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::article::{ArticleSlug, LanguageCode, SlugLookup},
};

pub struct GetArticleBySlugQuery {
    pub slug: String,
    pub language: Option<String>,
    pub lookup: SlugLookup,
}

impl ArticleQueryService {
    /// Resolves a slug to one article. `Draft` and `Preview` need an editor;
    /// `Public` only matches published titles of visible articles.
    pub async fn get_article_by_slug(
        &self,
        actor: Option<&Actor>,
        query: GetArticleBySlugQuery,
    ) -> ApplicationResult<ArticleDto> {
        let slug = ArticleSlug::new(query.slug)?;
        let language = query.language.map(LanguageCode::new).transpose()?;
        if query.lookup != SlugLookup::Public {
            self.ensure_can_view_drafts(actor)?;
        }

        let titles = self
            .read_repo
            .find_titles_by_slug(&slug, language.as_ref(), query.lookup)
            .await?;
        let now = self.clock.now();
        for title in titles {
            let Some(article) = self.read_repo.find_article(title.article_id).await? else {
                continue;
            };
            if query.lookup == SlugLookup::Public
                && (!article.is_within_window(now) || (article.login_required && actor.is_none()))
            {
                continue;
            }
            return self.detail(article).await;
        }
        Err(ApplicationError::not_found(format!(
            "no article with slug {slug}"
        )))
    }
}

// src/application/commands/articles/update.rs
use super::{
    ArticleCommandService,
    create::{parse_attributes, parse_categories},
    permission::ensure_permitted,
};
use crate::{
    application::{
        dto::{Actor, ArticleDto},
        error::ApplicationResult,
    },
    domain::article::{
        ArticleId, TemplateName, TreeId,
        services::{StateTracking, pair},
    },
};
use chrono::{DateTime, Utc};

/// Partial update of the edit-tracked scalar fields. `Some(None)` clears a
/// publication date.
#[derive(Debug, Clone, Default)]
pub struct UpdateArticleCommand {
    pub id: i64,
    pub tree_id: Option<i64>,
    pub template: Option<String>,
    pub publication_date: Option<Option<DateTime<Utc>>>,
    pub publication_end_date: Option<Option<DateTime<Utc>>>,
    pub login_required: Option<bool>,
    pub categories: Option<Vec<i64>>,
    pub attributes: Option<Vec<i64>>,
}

impl ArticleCommandService {
    #[tracing::instrument(name = "article.update", skip_all, fields(article_id = command.id))]
    pub async fn update_article(
        &self,
        actor: &Actor,
        command: UpdateArticleCommand,
    ) -> ApplicationResult<ArticleDto> {
        let id = ArticleId::new(command.id)?;
        let mut uow = self.store.begin().await?;
        let mut article = self.find_draft(uow.as_mut(), id, "edited").await?;
        ensure_permitted(
            self.permissions.has_change_permission(actor, &article),
            "change",
        )?;

        if let Some(tree_id) = command.tree_id {
            article.tree_id = TreeId::new(tree_id)?;
        }
        let mut slots = None;
        if let Some(template) = command.template {
            let template = TemplateName::new(template)?;
            slots = Some(self.declared_slots(&template)?);
            article.template = template;
        }
        let start = command
            .publication_date
            .unwrap_or(article.publication_date);
        let end = command
            .publication_end_date
            .unwrap_or(article.publication_end_date);
        article.set_publication_window(start, end)?;
        if let Some(login_required) = command.login_required {
            article.login_required = login_required;
        }
        if let Some(categories) = command.categories {
            article.categories = parse_categories(&categories)?;
        }
        if let Some(attributes) = command.attributes {
            article.attributes = parse_attributes(&attributes)?;
        }
        self.ensure_taxonomy(uow.as_mut(), &article.categories, &article.attributes)
            .await?;

        article.touch(actor.changed_by(), self.clock.now());
        let dirty = self
            .tracker
            .save_article(uow.as_mut(), &article, StateTracking::Track)
            .await?;
        if let Some(slots) = slots {
            pair::rescan_placeholders(uow.as_mut(), id, &slots).await?;
        }

        let dto = self.snapshot(uow.as_mut(), id).await?;
        uow.commit().await?;
        tracing::debug!(article_id = %id, dirty, "updated article");
        Ok(dto)
    }
}

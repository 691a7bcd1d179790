// src/application/commands/articles/service.rs
use std::sync::Arc;

use crate::{
    application::{
        dto::LanguageColumns,
        error::{ApplicationError, ApplicationResult},
        ports::{
            events::ArticleEventPublisher, permissions::PermissionOracle,
            templates::TemplateRegistry, time::Clock,
        },
    },
    domain::article::{
        Article, ArticleEvent, ArticleId, ArticleStore, ArticleUnitOfWork, LanguageCode,
        PlaceholderSlot, TemplateName,
        services::{ArticleSlugService, DirtyTracker},
    },
};

/// Engine components shared by every command.
pub struct ArticleEngine {
    pub tracker: Arc<DirtyTracker>,
    pub slug_service: Arc<ArticleSlugService>,
    pub templates: Arc<dyn TemplateRegistry>,
    pub columns: Arc<LanguageColumns>,
}

pub struct ArticleCommandService {
    pub(super) store: Arc<dyn ArticleStore>,
    pub(super) tracker: Arc<DirtyTracker>,
    pub(super) slug_service: Arc<ArticleSlugService>,
    pub(super) templates: Arc<dyn TemplateRegistry>,
    pub(super) columns: Arc<LanguageColumns>,
    pub(super) permissions: Arc<dyn PermissionOracle>,
    pub(super) events: Arc<dyn ArticleEventPublisher>,
    pub(super) clock: Arc<dyn Clock>,
}

impl ArticleCommandService {
    pub fn new(
        store: Arc<dyn ArticleStore>,
        engine: ArticleEngine,
        permissions: Arc<dyn PermissionOracle>,
        events: Arc<dyn ArticleEventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            tracker: engine.tracker,
            slug_service: engine.slug_service,
            templates: engine.templates,
            columns: engine.columns,
            permissions,
            events,
            clock,
        }
    }

    pub(super) async fn find_article(
        &self,
        uow: &mut dyn ArticleUnitOfWork,
        id: ArticleId,
    ) -> ApplicationResult<Article> {
        uow.find_article(id)
            .await?
            .ok_or_else(|| ApplicationError::article_not_found(id))
    }

    /// Loads `id` and rejects the public flavor for `action`.
    pub(super) async fn find_draft(
        &self,
        uow: &mut dyn ArticleUnitOfWork,
        id: ArticleId,
        action: &str,
    ) -> ApplicationResult<Article> {
        let article = self.find_article(uow, id).await?;
        article.ensure_draft(action)?;
        Ok(article)
    }

    pub(super) fn site_language(&self, raw: &str) -> ApplicationResult<LanguageCode> {
        let language = LanguageCode::new(raw)?;
        if self.columns.languages().contains(&language) {
            Ok(language)
        } else {
            Err(ApplicationError::validation(format!(
                "language {language} is not enabled for this site"
            )))
        }
    }

    pub(super) fn declared_slots(
        &self,
        template: &TemplateName,
    ) -> ApplicationResult<Vec<PlaceholderSlot>> {
        self.templates.declared_slots(template).ok_or_else(|| {
            ApplicationError::validation(format!("unknown template {template}"))
        })
    }

    /// Called only after the unit of work committed.
    pub(super) fn emit(&self, events: Vec<ArticleEvent>) {
        for event in events {
            self.events.publish(event);
        }
    }
}

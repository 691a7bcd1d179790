// src/application/services/mod.rs
use std::sync::Arc;

use crate::{
    application::{
        commands::{
            articles::{ArticleCommandService, ArticleEngine},
            taxonomy::TaxonomyService,
        },
        dto::{Actor, LanguageColumns},
        error::ApplicationResult,
        ports::{
            cache::RenderCache, events::ArticleEventPublisher, permissions::PermissionOracle,
            security::ActorAuthenticator, templates::TemplateRegistry, time::Clock,
            util::SlugGenerator,
        },
        queries::articles::ArticleQueryService,
    },
    domain::article::{
        ArticleReadRepository, ArticleStore, LanguageCode, SiteId, TaxonomyRepository,
        services::{ArticleSlugService, DirtyTracker},
    },
};

/// Site-wide settings the engine needs at construction time.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub site_id: SiteId,
    pub languages: Vec<LanguageCode>,
    pub slug_date_format: String,
}

pub struct ApplicationServices {
    pub article_commands: Arc<ArticleCommandService>,
    pub article_queries: Arc<ArticleQueryService>,
    pub taxonomy: Arc<TaxonomyService>,
    authenticator: Arc<dyn ActorAuthenticator>,
}

impl ApplicationServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        settings: EngineSettings,
        store: Arc<dyn ArticleStore>,
        read_repo: Arc<dyn ArticleReadRepository>,
        taxonomy_repo: Arc<dyn TaxonomyRepository>,
        templates: Arc<dyn TemplateRegistry>,
        cache: Arc<dyn RenderCache>,
        permissions: Arc<dyn PermissionOracle>,
        events: Arc<dyn ArticleEventPublisher>,
        authenticator: Arc<dyn ActorAuthenticator>,
        clock: Arc<dyn Clock>,
        slugger: Arc<dyn SlugGenerator>,
    ) -> Self {
        let columns = Arc::new(LanguageColumns::new(settings.languages));
        let engine = ArticleEngine {
            tracker: Arc::new(DirtyTracker::new(cache, settings.site_id)),
            slug_service: Arc::new(ArticleSlugService::new(
                slugger,
                settings.slug_date_format,
            )),
            templates,
            columns: Arc::clone(&columns),
        };

        let article_commands = Arc::new(ArticleCommandService::new(
            store,
            engine,
            permissions,
            events,
            Arc::clone(&clock),
        ));
        let article_queries = Arc::new(ArticleQueryService::new(read_repo, columns, clock));
        let taxonomy = Arc::new(TaxonomyService::new(taxonomy_repo));

        Self {
            article_commands,
            article_queries,
            taxonomy,
            authenticator,
        }
    }

    pub async fn authenticate(&self, token: &str) -> ApplicationResult<Actor> {
        self.authenticator.authenticate(token).await
    }
}

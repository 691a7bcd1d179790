// src/application/commands/articles/publish.rs
use super::{ArticleCommandService, permission::ensure_permitted};
use crate::{
    application::{
        dto::{Actor, ArticleDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::{
        article::{
            Article, ArticleEvent, ArticleId, ArticleUnitOfWork, LanguageCode, PublisherState,
            services::{StateTracking, pair, replicator},
        },
        errors::DomainError,
    },
};
use tracing::info;

pub struct PublishCommand {
    pub article_id: i64,
    pub language: String,
}

pub struct UnpublishCommand {
    pub article_id: i64,
    pub language: String,
}

pub struct RevertCommand {
    pub article_id: i64,
    pub language: String,
}

impl ArticleCommandService {
    #[tracing::instrument(
        name = "article.publish",
        skip_all,
        fields(article_id = command.article_id, language = %command.language)
    )]
    pub async fn publish(
        &self,
        actor: &Actor,
        command: PublishCommand,
    ) -> ApplicationResult<ArticleDto> {
        let id = ArticleId::new(command.article_id)?;
        let mut uow = self.store.begin().await?;
        let draft = self.find_draft(uow.as_mut(), id, "published").await?;
        ensure_permitted(
            self.permissions.has_publish_permission(actor, &draft),
            "publish",
        )?;
        let language = self.site_language(&command.language)?;

        let event = self.publish_in(uow.as_mut(), draft, &language).await?;
        let dto = self.snapshot(uow.as_mut(), id).await?;
        uow.commit().await?;
        self.emit(vec![event]);
        Ok(dto)
    }

    /// Publish steps inside an open unit of work. Everything that can be
    /// rejected is checked before the first write.
    pub(super) async fn publish_in(
        &self,
        uow: &mut dyn ArticleUnitOfWork,
        mut draft: Article,
        language: &LanguageCode,
    ) -> ApplicationResult<ArticleEvent> {
        draft.ensure_draft("published")?;
        self.declared_slots(&draft.template)?;
        self.ensure_taxonomy(uow, &draft.categories, &draft.attributes)
            .await?;
        if uow.find_title(draft.id, language).await?.is_none() {
            return Err(ApplicationError::validation(format!(
                "article {} has no {language} title to publish",
                draft.id
            )));
        }

        let now = self.clock.now();
        if draft.publication_date.is_none() {
            draft.publication_date = Some(now);
            draft.refresh_order_date();
        }

        let mut public = pair::get_or_create_public_counterpart(uow, &mut draft, now).await?;
        draft.copy_scalars_to(&mut public);
        public.changed_by = draft.changed_by.clone();
        public.changed_date = now;
        self.tracker
            .save_article(uow, &public, StateTracking::Keep)
            .await?;

        replicator::copy_titles(uow, &self.tracker, &draft, &public, language, true).await?;
        let copy = replicator::copy_contents(uow, &self.tracker, &draft, &public, language).await?;

        let mut title = uow.find_title(draft.id, language).await?.ok_or_else(|| {
            DomainError::Integrity(format!("draft title {language} vanished while publishing"))
        })?;
        title.publisher_state = PublisherState::Default;
        title.published = true;
        self.tracker
            .save_title(uow, &mut title, StateTracking::Keep)
            .await?;
        self.tracker
            .save_article(uow, &draft, StateTracking::Keep)
            .await?;

        info!(
            article_id = %draft.id,
            public_id = %public.id,
            language = %language,
            copied_blocks = copy.copied_blocks,
            "published article"
        );
        Ok(ArticleEvent::Published {
            draft_id: draft.id,
            public_id: public.id,
            language: language.clone(),
            at: now,
        })
    }

    #[tracing::instrument(
        name = "article.unpublish",
        skip_all,
        fields(article_id = command.article_id, language = %command.language)
    )]
    pub async fn unpublish(
        &self,
        actor: &Actor,
        command: UnpublishCommand,
    ) -> ApplicationResult<ArticleDto> {
        let id = ArticleId::new(command.article_id)?;
        let language = LanguageCode::new(command.language)?;
        let mut uow = self.store.begin().await?;
        let draft = self.find_draft(uow.as_mut(), id, "unpublished").await?;
        ensure_permitted(
            self.permissions.has_publish_permission(actor, &draft),
            "unpublish",
        )?;

        let event = self.unpublish_in(uow.as_mut(), draft, &language).await?;
        let dto = self.snapshot(uow.as_mut(), id).await?;
        uow.commit().await?;
        self.emit(vec![event]);
        Ok(dto)
    }

    async fn unpublish_in(
        &self,
        uow: &mut dyn ArticleUnitOfWork,
        draft: Article,
        language: &LanguageCode,
    ) -> ApplicationResult<ArticleEvent> {
        let public = self.public_of(uow, &draft).await?;
        let mut title = uow.find_title(draft.id, language).await?.ok_or_else(|| {
            ApplicationError::not_found(format!("article {} has no {language} title", draft.id))
        })?;
        let mut public_title = uow
            .find_title(public.id, language)
            .await?
            .ok_or_else(|| never_published(&draft, language))?;

        let now = self.clock.now();
        // Going offline is itself a change that needs a republish to undo.
        title.published = false;
        title.publisher_state = PublisherState::Dirty;
        self.tracker
            .save_title(uow, &mut title, StateTracking::Track)
            .await?;

        public_title.published = false;
        self.tracker
            .save_title(uow, &mut public_title, StateTracking::Keep)
            .await?;
        let removed = replicator::purge_language(uow, &self.tracker, public.id, language).await?;

        info!(
            article_id = %draft.id,
            public_id = %public.id,
            language = %language,
            removed_blocks = removed,
            "unpublished article"
        );
        Ok(ArticleEvent::Unpublished {
            draft_id: draft.id,
            public_id: public.id,
            language: language.clone(),
            at: now,
        })
    }

    #[tracing::instrument(
        name = "article.revert",
        skip_all,
        fields(article_id = command.article_id, language = %command.language)
    )]
    pub async fn revert_to_live(
        &self,
        actor: &Actor,
        command: RevertCommand,
    ) -> ApplicationResult<ArticleDto> {
        let id = ArticleId::new(command.article_id)?;
        let language = LanguageCode::new(command.language)?;
        let mut uow = self.store.begin().await?;
        let mut draft = self.find_draft(uow.as_mut(), id, "reverted").await?;
        ensure_permitted(
            self.permissions.has_change_permission(actor, &draft),
            "revert",
        )?;

        let public = self.public_of(uow.as_mut(), &draft).await?;
        // An unpublished live title stays offline; the draft mirrors it.
        let live = uow
            .find_title(public.id, &language)
            .await?
            .ok_or_else(|| never_published(&draft, &language))?;

        let now = self.clock.now();
        replicator::copy_titles(
            uow.as_mut(),
            &self.tracker,
            &public,
            &draft,
            &language,
            live.published,
        )
        .await?;
        replicator::copy_contents(uow.as_mut(), &self.tracker, &public, &draft, &language)
            .await?;
        public.copy_scalars_to(&mut draft);

        let mut title = uow
            .find_title(draft.id, &language)
            .await?
            .ok_or_else(|| never_published(&draft, &language))?;
        title.publisher_state = PublisherState::Default;
        title.published = live.published;
        self.tracker
            .save_title(uow.as_mut(), &mut title, StateTracking::Keep)
            .await?;
        self.tracker
            .save_article(uow.as_mut(), &draft, StateTracking::Keep)
            .await?;

        let dto = self.snapshot(uow.as_mut(), id).await?;
        uow.commit().await?;
        info!(
            article_id = %id,
            language = %language,
            live = live.published,
            "reverted article to live"
        );
        self.emit(vec![ArticleEvent::Reverted {
            draft_id: id,
            language,
            at: now,
        }]);
        Ok(dto)
    }

    /// The verified public counterpart of `draft`.
    async fn public_of(
        &self,
        uow: &mut dyn ArticleUnitOfWork,
        draft: &Article,
    ) -> ApplicationResult<Article> {
        let pair = pair::load_pair(uow, draft.clone()).await?;
        pair.public.ok_or_else(|| {
            DomainError::PublicVersionNeeded(format!(
                "article {} has never been published",
                draft.id
            ))
            .into()
        })
    }
}

fn never_published(draft: &Article, language: &LanguageCode) -> ApplicationError {
    DomainError::PublicVersionNeeded(format!(
        "article {} has no public {language} version",
        draft.id
    ))
    .into()
}

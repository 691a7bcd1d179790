// src/application/commands/articles/titles.rs
use super::{ArticleCommandService, permission::ensure_permitted};
use crate::{
    application::{
        dto::{Actor, ArticleDto},
        error::{ApplicationError, ApplicationResult},
    },
    domain::article::{
        Article, ArticleEvent, ArticleId, ArticleSlug, ArticleUnitOfWork, ImageId, LanguageCode,
        NewTitle, PublisherState, Title, TitleText,
        services::{StateTracking, pair, replicator},
        title::validate_meta_description,
    },
};
use tracing::info;

/// Full replacement of a title's editable fields. A missing slug keeps the
/// current one, or generates `{date}-{title}` for a new title.
#[derive(Debug, Clone, Default)]
pub struct SetTitleCommand {
    pub article_id: i64,
    pub language: String,
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub page_title: Option<String>,
    pub menu_title: Option<String>,
    pub meta_description: Option<String>,
    pub image_id: Option<i64>,
}

pub struct DeleteTitleCommand {
    pub article_id: i64,
    pub language: String,
}

/// Validated title input shared by creation and editing.
pub(super) struct TitleInput {
    pub title: TitleText,
    pub slug: Option<ArticleSlug>,
    pub description: String,
    pub page_title: Option<String>,
    pub menu_title: Option<String>,
    pub meta_description: Option<String>,
    pub image_id: Option<ImageId>,
}

impl TitleInput {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn parse(
        title: String,
        slug: Option<String>,
        description: Option<String>,
        page_title: Option<String>,
        menu_title: Option<String>,
        meta_description: Option<String>,
        image_id: Option<i64>,
    ) -> ApplicationResult<Self> {
        validate_meta_description(meta_description.as_deref())?;
        Ok(Self {
            title: TitleText::new(title)?,
            slug: slug
                .filter(|s| !s.trim().is_empty())
                .map(ArticleSlug::new)
                .transpose()?,
            description: description.unwrap_or_default(),
            page_title: non_blank(page_title),
            menu_title: non_blank(menu_title),
            meta_description: non_blank(meta_description),
            image_id: image_id.map(ImageId::new).transpose()?,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ArticleCommandService {
    #[tracing::instrument(
        name = "article.set_title",
        skip_all,
        fields(article_id = command.article_id, language = %command.language)
    )]
    pub async fn set_title(
        &self,
        actor: &Actor,
        command: SetTitleCommand,
    ) -> ApplicationResult<ArticleDto> {
        let id = ArticleId::new(command.article_id)?;
        let language = self.site_language(&command.language)?;
        let input = TitleInput::parse(
            command.title,
            command.slug,
            command.description,
            command.page_title,
            command.menu_title,
            command.meta_description,
            command.image_id,
        )?;

        let mut uow = self.store.begin().await?;
        let mut article = self.find_draft(uow.as_mut(), id, "edited").await?;
        ensure_permitted(
            self.permissions.has_change_permission(actor, &article),
            "change",
        )?;

        self.write_title(uow.as_mut(), &article, &language, input)
            .await?;
        article.touch(actor.changed_by(), self.clock.now());
        self.tracker
            .save_article(uow.as_mut(), &article, StateTracking::Track)
            .await?;

        let dto = self.snapshot(uow.as_mut(), id).await?;
        uow.commit().await?;
        Ok(dto)
    }

    /// Creates or overwrites the draft title for `language` through the
    /// dirty tracker.
    pub(super) async fn write_title(
        &self,
        uow: &mut dyn ArticleUnitOfWork,
        article: &Article,
        language: &LanguageCode,
        input: TitleInput,
    ) -> ApplicationResult<Title> {
        let own_pair: Vec<ArticleId> = std::iter::once(article.id)
            .chain(article.public_id)
            .collect();
        let existing = uow.find_title(article.id, language).await?;

        let slug = match (&input.slug, &existing) {
            (Some(requested), _) => {
                let taken = uow
                    .slugs_in_use(language, requested.as_str(), &own_pair)
                    .await?;
                if taken.iter().any(|s| s == requested.as_str()) {
                    return Err(ApplicationError::conflict(format!(
                        "slug {requested} is already used in {language}"
                    )));
                }
                requested.clone()
            }
            (None, Some(current)) => current.slug.clone(),
            (None, None) => {
                let base = self
                    .slug_service
                    .default_slug(&input.title, self.clock.now());
                self.slug_service
                    .generate_unique_slug(uow, &base, language, &own_pair)
                    .await?
            }
        };

        match existing {
            Some(mut title) => {
                title.title = input.title;
                title.slug = slug;
                title.description = input.description;
                title.page_title = input.page_title;
                title.menu_title = input.menu_title;
                title.meta_description = input.meta_description;
                title.image_id = input.image_id;
                self.tracker
                    .save_title(uow, &mut title, StateTracking::Track)
                    .await?;
                Ok(title)
            }
            None => {
                let new_title = NewTitle {
                    article_id: article.id,
                    language: language.clone(),
                    title: input.title,
                    slug,
                    description: input.description,
                    page_title: input.page_title,
                    menu_title: input.menu_title,
                    meta_description: input.meta_description,
                    image_id: input.image_id,
                    creation_date: self.clock.now(),
                    published: false,
                    is_draft: true,
                    public_id: None,
                    publisher_state: PublisherState::Default,
                };
                Ok(self
                    .tracker
                    .insert_title(uow, new_title, StateTracking::Track)
                    .await?)
            }
        }
    }

    /// Removes one translation from both sides of the pair. The last
    /// remaining translation cannot be deleted.
    #[tracing::instrument(
        name = "article.delete_title",
        skip_all,
        fields(article_id = command.article_id, language = %command.language)
    )]
    pub async fn delete_title(
        &self,
        actor: &Actor,
        command: DeleteTitleCommand,
    ) -> ApplicationResult<ArticleDto> {
        let id = ArticleId::new(command.article_id)?;
        let language = LanguageCode::new(command.language)?;
        let mut uow = self.store.begin().await?;
        let draft = self.find_draft(uow.as_mut(), id, "edited").await?;
        ensure_permitted(
            self.permissions.has_delete_permission(actor, &draft),
            "delete",
        )?;

        let title = uow.find_title(id, &language).await?.ok_or_else(|| {
            ApplicationError::not_found(format!("article {id} has no {language} title"))
        })?;
        if uow.list_titles(id).await?.len() <= 1 {
            return Err(ApplicationError::validation(
                "the only translation of an article cannot be deleted",
            ));
        }

        let pair = pair::load_pair(uow.as_mut(), draft).await?;
        replicator::purge_language(uow.as_mut(), &self.tracker, id, &language).await?;
        self.tracker.delete_title(uow.as_mut(), &title).await?;

        let mut events = Vec::new();
        if let Some(public) = &pair.public {
            replicator::purge_language(uow.as_mut(), &self.tracker, public.id, &language)
                .await?;
            if let Some(public_title) = uow.find_title(public.id, &language).await? {
                self.tracker
                    .delete_title(uow.as_mut(), &public_title)
                    .await?;
                if public_title.published {
                    events.push(ArticleEvent::Unpublished {
                        draft_id: id,
                        public_id: public.id,
                        language: language.clone(),
                        at: self.clock.now(),
                    });
                }
            }
        }

        let dto = self.snapshot(uow.as_mut(), id).await?;
        uow.commit().await?;
        info!(article_id = %id, language = %language, "deleted translation");
        self.emit(events);
        Ok(dto)
    }
}

// src/application/commands/articles/create.rs
use super::{ArticleCommandService, permission::ensure_permitted, titles::TitleInput};
use crate::{
    application::{
        dto::{Actor, ArticleDto},
        error::ApplicationResult,
    },
    domain::article::{
        AttributeId, CategoryId, NewArticle, TemplateName, TreeId,
        entity::validate_publication_window,
        services::pair,
    },
};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use tracing::info;

pub struct CreateArticleCommand {
    pub tree_id: i64,
    pub template: Option<String>,
    pub language: String,
    pub title: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub page_title: Option<String>,
    pub menu_title: Option<String>,
    pub meta_description: Option<String>,
    pub image_id: Option<i64>,
    pub publication_date: Option<DateTime<Utc>>,
    pub publication_end_date: Option<DateTime<Utc>>,
    pub login_required: bool,
    pub categories: Vec<i64>,
    pub attributes: Vec<i64>,
    pub publish: bool,
}

impl CreateArticleCommand {
    pub fn builder() -> CreateArticleCommandBuilder {
        CreateArticleCommandBuilder::default()
    }
}

#[derive(Default)]
pub struct CreateArticleCommandBuilder {
    tree_id: Option<i64>,
    template: Option<String>,
    language: Option<String>,
    title: Option<String>,
    slug: Option<String>,
    description: Option<String>,
    publication_date: Option<DateTime<Utc>>,
    publication_end_date: Option<DateTime<Utc>>,
    login_required: bool,
    categories: Vec<i64>,
    attributes: Vec<i64>,
    publish: bool,
}

impl CreateArticleCommandBuilder {
    pub fn tree_id(mut self, tree_id: i64) -> Self {
        self.tree_id = Some(tree_id);
        self
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn publication_window(
        mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.publication_date = start;
        self.publication_end_date = end;
        self
    }

    pub fn login_required(mut self, login_required: bool) -> Self {
        self.login_required = login_required;
        self
    }

    pub fn categories(mut self, categories: Vec<i64>) -> Self {
        self.categories = categories;
        self
    }

    pub fn attributes(mut self, attributes: Vec<i64>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn publish(mut self, publish: bool) -> Self {
        self.publish = publish;
        self
    }

    pub fn build(self) -> Result<CreateArticleCommand, &'static str> {
        Ok(CreateArticleCommand {
            tree_id: self.tree_id.ok_or("tree is required")?,
            template: self.template,
            language: self.language.ok_or("language is required")?,
            title: self.title.ok_or("title is required")?,
            slug: self.slug,
            description: self.description,
            page_title: None,
            menu_title: None,
            meta_description: None,
            image_id: None,
            publication_date: self.publication_date,
            publication_end_date: self.publication_end_date,
            login_required: self.login_required,
            categories: self.categories,
            attributes: self.attributes,
            publish: self.publish,
        })
    }
}

pub(super) fn parse_categories(ids: &[i64]) -> ApplicationResult<BTreeSet<CategoryId>> {
    Ok(ids
        .iter()
        .map(|id| CategoryId::new(*id))
        .collect::<Result<_, _>>()?)
}

pub(super) fn parse_attributes(ids: &[i64]) -> ApplicationResult<BTreeSet<AttributeId>> {
    Ok(ids
        .iter()
        .map(|id| AttributeId::new(*id))
        .collect::<Result<_, _>>()?)
}

impl ArticleCommandService {
    #[tracing::instrument(name = "article.create", skip_all, fields(language = %command.language))]
    pub async fn create_article(
        &self,
        actor: &Actor,
        command: CreateArticleCommand,
    ) -> ApplicationResult<ArticleDto> {
        ensure_permitted(self.permissions.has_add_permission(actor), "add")?;

        let tree_id = TreeId::new(command.tree_id)?;
        let template = match command.template {
            Some(name) => TemplateName::new(name)?,
            None => self.templates.default_template(),
        };
        let slots = self.declared_slots(&template)?;
        let language = self.site_language(&command.language)?;
        let categories = parse_categories(&command.categories)?;
        let attributes = parse_attributes(&command.attributes)?;
        validate_publication_window(command.publication_date, command.publication_end_date)?;
        let input = TitleInput::parse(
            command.title,
            command.slug,
            command.description,
            command.page_title,
            command.menu_title,
            command.meta_description,
            command.image_id,
        )?;

        let now = self.clock.now();
        let changed_by = actor.changed_by();
        let new_article = NewArticle {
            tree_id,
            template,
            categories,
            attributes,
            created_by: changed_by.clone(),
            changed_by,
            creation_date: now,
            publication_date: command.publication_date,
            publication_end_date: command.publication_end_date,
            login_required: command.login_required,
            is_draft: true,
            public_id: None,
        };

        let mut uow = self.store.begin().await?;
        self.ensure_taxonomy(uow.as_mut(), &new_article.categories, &new_article.attributes)
            .await?;
        let article = uow.insert_article(new_article).await?;
        pair::rescan_placeholders(uow.as_mut(), article.id, &slots).await?;
        self.write_title(uow.as_mut(), &article, &language, input)
            .await?;

        let mut events = Vec::new();
        if command.publish {
            ensure_permitted(
                self.permissions.has_publish_permission(actor, &article),
                "publish",
            )?;
            let draft = self.find_article(uow.as_mut(), article.id).await?;
            events.push(self.publish_in(uow.as_mut(), draft, &language).await?);
        }

        let dto = self.snapshot(uow.as_mut(), article.id).await?;
        uow.commit().await?;
        info!(article_id = %article.id, published = command.publish, "created article");
        self.emit(events);
        Ok(dto)
    }
}

// src/presentation/http/controllers/articles.rs
use super::double_option;
use crate::application::{
    commands::articles::{
        CreateArticleCommand, DeleteArticleCommand, RebuildLedgerCommand, UpdateArticleCommand,
    },
    dto::{ArchiveMonthDto, ArticleDto, ArticleSummaryDto, LedgerRepairDto},
    queries::articles::{
        ArchiveQuery, GetArticleByIdQuery, GetArticleBySlugQuery, ListArticlesQuery,
        ListFilterQuery,
    },
};
use crate::domain::article::SlugLookup;
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::{Authenticated, MaybeAuthenticated};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json,
    extract::{Path, Query},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;

fn default_limit() -> u32 {
    20
}

#[derive(Debug, Deserialize)]
pub struct ArticleListParams {
    #[serde(default)]
    pub include_drafts: bool,
    #[serde(default)]
    pub tree_id: Option<i64>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub with_subcategories: bool,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub day: Option<u32>,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct ArchiveParams {
    #[serde(default)]
    pub tree_id: Option<i64>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub with_subcategories: bool,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugMode {
    Draft,
    Preview,
    #[default]
    Public,
}

impl From<SlugMode> for SlugLookup {
    fn from(value: SlugMode) -> Self {
        match value {
            SlugMode::Draft => SlugLookup::Draft,
            SlugMode::Preview => SlugLookup::Preview,
            SlugMode::Public => SlugLookup::Public,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SlugParams {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub mode: SlugMode,
}

#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub tree_id: i64,
    #[serde(default)]
    pub template: Option<String>,
    pub language: String,
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub page_title: Option<String>,
    #[serde(default)]
    pub menu_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub image_id: Option<i64>,
    #[serde(default)]
    pub publication_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub publication_end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub login_required: bool,
    #[serde(default)]
    pub categories: Vec<i64>,
    #[serde(default)]
    pub attributes: Vec<i64>,
    #[serde(default)]
    pub publish: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateArticleRequest {
    #[serde(default)]
    pub tree_id: Option<i64>,
    #[serde(default)]
    pub template: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub publication_date: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option")]
    pub publication_end_date: Option<Option<DateTime<Utc>>>,
    #[serde(default)]
    pub login_required: Option<bool>,
    #[serde(default)]
    pub categories: Option<Vec<i64>>,
    #[serde(default)]
    pub attributes: Option<Vec<i64>>,
}

pub async fn list_articles(
    Extension(state): Extension<HttpState>,
    actor: MaybeAuthenticated,
    Query(params): Query<ArticleListParams>,
) -> HttpResult<Json<Vec<ArticleSummaryDto>>> {
    let query = ListArticlesQuery {
        include_drafts: params.include_drafts,
        filter: ListFilterQuery {
            tree_id: params.tree_id,
            category_id: params.category_id,
            with_subcategories: params.with_subcategories,
        },
        language: params.language,
        year: params.year,
        month: params.month,
        day: params.day,
        limit: params.limit,
    };

    state
        .services
        .article_queries
        .list_articles(actor.0.as_ref(), query)
        .await
        .into_http()
        .map(Json)
}

pub async fn archive(
    Extension(state): Extension<HttpState>,
    Query(params): Query<ArchiveParams>,
) -> HttpResult<Json<Vec<ArchiveMonthDto>>> {
    let query = ArchiveQuery {
        filter: ListFilterQuery {
            tree_id: params.tree_id,
            category_id: params.category_id,
            with_subcategories: params.with_subcategories,
        },
        language: params.language,
    };

    state
        .services
        .article_queries
        .archive_months(query)
        .await
        .into_http()
        .map(Json)
}

pub async fn get_article_by_slug(
    Extension(state): Extension<HttpState>,
    actor: MaybeAuthenticated,
    Path(slug): Path<String>,
    Query(params): Query<SlugParams>,
) -> HttpResult<Json<ArticleDto>> {
    let query = GetArticleBySlugQuery {
        slug,
        language: params.language,
        lookup: params.mode.into(),
    };

    state
        .services
        .article_queries
        .get_article_by_slug(actor.0.as_ref(), query)
        .await
        .into_http()
        .map(Json)
}

pub async fn get_article(
    Extension(state): Extension<HttpState>,
    actor: MaybeAuthenticated,
    Path(id): Path<i64>,
) -> HttpResult<Json<ArticleDto>> {
    state
        .services
        .article_queries
        .get_article_by_id(actor.0.as_ref(), GetArticleByIdQuery { id })
        .await
        .into_http()
        .map(Json)
}

pub async fn create_article(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Json(payload): Json<CreateArticleRequest>,
) -> HttpResult<(StatusCode, Json<ArticleDto>)> {
    let command = CreateArticleCommand {
        tree_id: payload.tree_id,
        template: payload.template,
        language: payload.language,
        title: payload.title,
        slug: payload.slug,
        description: payload.description,
        page_title: payload.page_title,
        menu_title: payload.menu_title,
        meta_description: payload.meta_description,
        image_id: payload.image_id,
        publication_date: payload.publication_date,
        publication_end_date: payload.publication_end_date,
        login_required: payload.login_required,
        categories: payload.categories,
        attributes: payload.attributes,
        publish: payload.publish,
    };

    let article = state
        .services
        .article_commands
        .create_article(&actor, command)
        .await
        .into_http()?;
    Ok((StatusCode::CREATED, Json(article)))
}

pub async fn update_article(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateArticleRequest>,
) -> HttpResult<Json<ArticleDto>> {
    let command = UpdateArticleCommand {
        id,
        tree_id: payload.tree_id,
        template: payload.template,
        publication_date: payload.publication_date,
        publication_end_date: payload.publication_end_date,
        login_required: payload.login_required,
        categories: payload.categories,
        attributes: payload.attributes,
    };

    state
        .services
        .article_commands
        .update_article(&actor, command)
        .await
        .into_http()
        .map(Json)
}

pub async fn delete_article(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Path(id): Path<i64>,
) -> HttpResult<StatusCode> {
    state
        .services
        .article_commands
        .delete_article(&actor, DeleteArticleCommand { id })
        .await
        .into_http()?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn rebuild_ledger(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Path(id): Path<i64>,
) -> HttpResult<Json<LedgerRepairDto>> {
    state
        .services
        .article_commands
        .rebuild_ledger(&actor, RebuildLedgerCommand { id })
        .await
        .into_http()
        .map(Json)
}

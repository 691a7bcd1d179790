// src/presentation/http/controllers/titles.rs
use crate::application::{
    commands::articles::{
        DeleteTitleCommand, PublishCommand, RevertCommand, SetTitleCommand, UnpublishCommand,
    },
    dto::ArticleDto,
};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, extract::Path};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SetTitleRequest {
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
}

pub async fn set_title(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Path((article_id, language)): Path<(i64, String)>,
    Json(payload): Json<SetTitleRequest>,
) -> HttpResult<Json<ArticleDto>> {
    let command = SetTitleCommand {
        article_id,
        language,
        title: payload.title,
        slug: payload.slug,
        description: payload.description,
        page_title: payload.page_title,
        menu_title: payload.menu_title,
        meta_description: payload.meta_description,
        image_id: payload.image_id,
    };

    state
        .services
        .article_commands
        .set_title(&actor, command)
        .await
        .into_http()
        .map(Json)
}

pub async fn delete_title(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Path((article_id, language)): Path<(i64, String)>,
) -> HttpResult<Json<ArticleDto>> {
    state
        .services
        .article_commands
        .delete_title(
            &actor,
            DeleteTitleCommand {
                article_id,
                language,
            },
        )
        .await
        .into_http()
        .map(Json)
}

pub async fn publish(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Path((article_id, language)): Path<(i64, String)>,
) -> HttpResult<Json<ArticleDto>> {
    state
        .services
        .article_commands
        .publish(
            &actor,
            PublishCommand {
                article_id,
                language,
            },
        )
        .await
        .into_http()
        .map(Json)
}

pub async fn unpublish(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Path((article_id, language)): Path<(i64, String)>,
) -> HttpResult<Json<ArticleDto>> {
    state
        .services
        .article_commands
        .unpublish(
            &actor,
            UnpublishCommand {
                article_id,
                language,
            },
        )
        .await
        .into_http()
        .map(Json)
}

pub async fn revert(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Path((article_id, language)): Path<(i64, String)>,
) -> HttpResult<Json<ArticleDto>> {
    state
        .services
        .article_commands
        .revert_to_live(
            &actor,
            RevertCommand {
                article_id,
                language,
            },
        )
        .await
        .into_http()
        .map(Json)
}

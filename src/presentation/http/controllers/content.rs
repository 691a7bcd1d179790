// src/presentation/http/controllers/content.rs
use crate::application::{
    commands::articles::{AddContentCommand, DeleteContentCommand, UpdateContentCommand},
    dto::ContentBlockDto,
};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, extract::Path, http::StatusCode};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct AddContentRequest {
    pub slot: String,
    pub language: String,
    pub plugin_type: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Deserialize)]
pub struct UpdateContentRequest {
    pub payload: Value,
}

pub async fn add_content(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Path(article_id): Path<i64>,
    Json(payload): Json<AddContentRequest>,
) -> HttpResult<(StatusCode, Json<ContentBlockDto>)> {
    let command = AddContentCommand {
        article_id,
        slot: payload.slot,
        language: payload.language,
        plugin_type: payload.plugin_type,
        parent_id: payload.parent_id,
        payload: payload.payload,
    };

    let block = state
        .services
        .article_commands
        .add_content(&actor, command)
        .await
        .into_http()?;
    Ok((StatusCode::CREATED, Json(block)))
}

pub async fn update_content(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Path(block_id): Path<i64>,
    Json(payload): Json<UpdateContentRequest>,
) -> HttpResult<Json<ContentBlockDto>> {
    state
        .services
        .article_commands
        .update_content(
            &actor,
            UpdateContentCommand {
                block_id,
                payload: payload.payload,
            },
        )
        .await
        .into_http()
        .map(Json)
}

pub async fn delete_content(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Path(block_id): Path<i64>,
) -> HttpResult<StatusCode> {
    state
        .services
        .article_commands
        .delete_content(&actor, DeleteContentCommand { block_id })
        .await
        .into_http()?;
    Ok(StatusCode::NO_CONTENT)
}

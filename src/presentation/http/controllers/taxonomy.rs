// src/presentation/http/controllers/taxonomy.rs
use crate::application::{
    commands::taxonomy::{CreateAttributeCommand, CreateCategoryCommand},
    dto::{AttributeDto, CategoryDto},
};
use crate::presentation::http::error::{HttpResult, IntoHttpResult};
use crate::presentation::http::extractors::Authenticated;
use crate::presentation::http::state::HttpState;
use axum::{Extension, Json, http::StatusCode};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAttributeRequest {
    pub name: String,
}

pub async fn list_categories(
    Extension(state): Extension<HttpState>,
) -> HttpResult<Json<Vec<CategoryDto>>> {
    state
        .services
        .taxonomy
        .list_categories()
        .await
        .into_http()
        .map(Json)
}

pub async fn create_category(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Json(payload): Json<CreateCategoryRequest>,
) -> HttpResult<(StatusCode, Json<CategoryDto>)> {
    let category = state
        .services
        .taxonomy
        .create_category(
            &actor,
            CreateCategoryCommand {
                name: payload.name,
                parent_id: payload.parent_id,
            },
        )
        .await
        .into_http()?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn list_attributes(
    Extension(state): Extension<HttpState>,
) -> HttpResult<Json<Vec<AttributeDto>>> {
    state
        .services
        .taxonomy
        .list_attributes()
        .await
        .into_http()
        .map(Json)
}

pub async fn create_attribute(
    Extension(state): Extension<HttpState>,
    Authenticated(actor): Authenticated,
    Json(payload): Json<CreateAttributeRequest>,
) -> HttpResult<(StatusCode, Json<AttributeDto>)> {
    let attribute = state
        .services
        .taxonomy
        .create_attribute(&actor, CreateAttributeCommand { name: payload.name })
        .await
        .into_http()?;
    Ok((StatusCode::CREATED, Json(attribute)))
}

// src/presentation/http/routes.rs
use crate::presentation::http::controllers::{articles, content, taxonomy, titles};
use crate::presentation::http::state::HttpState;
use axum::{
    Extension, Json, Router,
    http::{HeaderValue, Method},
    routing::{get, patch, post, put},
};
use serde::Serialize;
use std::time::Duration;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub fn build_router(state: HttpState) -> Router {
    let origins: Vec<HeaderValue> = state
        .allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(tower_http::cors::Any)
        .max_age(Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health))
        .route(
            "/api/v1/articles",
            get(articles::list_articles).post(articles::create_article),
        )
        .route("/api/v1/articles/archive", get(articles::archive))
        .route(
            "/api/v1/articles/by-slug/{slug}",
            get(articles::get_article_by_slug),
        )
        .route(
            "/api/v1/articles/{id}",
            get(articles::get_article)
                .patch(articles::update_article)
                .delete(articles::delete_article),
        )
        .route(
            "/api/v1/articles/{id}/ledger/rebuild",
            post(articles::rebuild_ledger),
        )
        .route(
            "/api/v1/articles/{id}/titles/{language}",
            put(titles::set_title).delete(titles::delete_title),
        )
        .route(
            "/api/v1/articles/{id}/titles/{language}/publish",
            post(titles::publish),
        )
        .route(
            "/api/v1/articles/{id}/titles/{language}/unpublish",
            post(titles::unpublish),
        )
        .route(
            "/api/v1/articles/{id}/titles/{language}/revert",
            post(titles::revert),
        )
        .route("/api/v1/articles/{id}/content", post(content::add_content))
        .route(
            "/api/v1/content/{block_id}",
            patch(content::update_content).delete(content::delete_content),
        )
        .route(
            "/api/v1/categories",
            get(taxonomy::list_categories).post(taxonomy::create_category),
        )
        .route(
            "/api/v1/attributes",
            get(taxonomy::list_attributes).post(taxonomy::create_attribute),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(Extension(state))
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}

pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".into(),
    })
}

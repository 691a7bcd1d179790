// tests/support/helpers.rs
use super::fakes::{FixedClock, RecordingPublisher};
use axum::body::{self, Body};
use axum::http::{Request, StatusCode, header::AUTHORIZATION, header::CONTENT_TYPE};
use cms_articles::application::{
    ApplicationServices, EngineSettings,
    commands::articles::{
        AddContentCommand, CreateArticleCommand, PublishCommand, SetTitleCommand,
    },
    dto::{Actor, ArticleDto, ContentBlockDto, PlaceholderDto, TitleDto},
    queries::articles::GetArticleByIdQuery,
};
use cms_articles::domain::actor::{Role, UserId};
use cms_articles::domain::article::{LanguageCode, PlaceholderSlot, SiteId, TemplateName};
use cms_articles::infrastructure::{
    cache::InMemoryRenderCache,
    database::{init_pool, run_migrations},
    permissions::CapabilityPermissionOracle,
    repositories::{SqliteArticleReadRepository, SqliteArticleStore, SqliteTaxonomyRepository},
    security::ApiKeyAuthenticator,
    templates::ConfiguredTemplateRegistry,
    util::DefaultSlugGenerator,
};
use cms_articles::presentation::http::{routes::build_router, state::HttpState};
use serde_json::Value;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

pub const DEFAULT_TEMPLATE: &str = "cms_articles/default.html";
pub const WIDE_TEMPLATE: &str = "cms_articles/wide.html";

pub const ADMIN_KEY: &str = "admin-key";
pub const EDITOR_KEY: &str = "editor-key";
pub const AUTHOR_KEY: &str = "author-key";

pub fn admin() -> Actor {
    Actor::new(UserId::new(1).unwrap(), "alice", Role::Admin)
}

pub fn editor() -> Actor {
    Actor::new(UserId::new(2).unwrap(), "eddie", Role::Editor)
}

pub fn author() -> Actor {
    Actor::new(UserId::new(3).unwrap(), "ana", Role::Author)
}

/// Services over a fresh database with `en` and `de` enabled.
pub struct TestApp {
    pub services: Arc<ApplicationServices>,
    pub pool: SqlitePool,
    pub clock: Arc<FixedClock>,
    pub events: Arc<RecordingPublisher>,
    pub cache: Arc<InMemoryRenderCache>,
    _dir: Option<TempDir>,
}

pub async fn test_app() -> TestApp {
    let pool = init_pool("sqlite::memory:").await.expect("in-memory pool");
    build_app(pool, None).await
}

/// Same services over a database file with a real connection pool, for
/// tests that need several connections at once.
pub async fn file_test_app() -> TestApp {
    let dir = tempfile::tempdir().expect("temp dir");
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("articles.db").display()
    );
    let pool = init_pool(&url).await.expect("file pool");
    build_app(pool, Some(dir)).await
}

async fn build_app(pool: SqlitePool, dir: Option<TempDir>) -> TestApp {
    run_migrations(&pool).await.expect("migrations");

    let clock = Arc::new(FixedClock::default());
    let events = Arc::new(RecordingPublisher::default());
    let cache = Arc::new(InMemoryRenderCache::new());
    let templates = ConfiguredTemplateRegistry::new(vec![
        (
            TemplateName::new(DEFAULT_TEMPLATE).unwrap(),
            vec![PlaceholderSlot::new("content").unwrap()],
        ),
        (
            TemplateName::new(WIDE_TEMPLATE).unwrap(),
            vec![
                PlaceholderSlot::new("content").unwrap(),
                PlaceholderSlot::new("sidebar").unwrap(),
            ],
        ),
    ])
    .expect("templates");
    let authenticator = ApiKeyAuthenticator::new(HashMap::from([
        (ADMIN_KEY.to_string(), admin()),
        (EDITOR_KEY.to_string(), editor()),
        (AUTHOR_KEY.to_string(), author()),
    ]));

    let services = Arc::new(ApplicationServices::new(
        EngineSettings {
            site_id: SiteId::new(1).unwrap(),
            languages: vec![
                LanguageCode::new("en").unwrap(),
                LanguageCode::new("de").unwrap(),
            ],
            slug_date_format: "%Y-%m".into(),
        },
        Arc::new(SqliteArticleStore::new(pool.clone())),
        Arc::new(SqliteArticleReadRepository::new(pool.clone())),
        Arc::new(SqliteTaxonomyRepository::new(pool.clone())),
        Arc::new(templates),
        cache.clone(),
        Arc::new(CapabilityPermissionOracle),
        events.clone(),
        Arc::new(authenticator),
        clock.clone(),
        Arc::new(DefaultSlugGenerator),
    ));

    TestApp {
        services,
        pool,
        clock,
        events,
        cache,
        _dir: dir,
    }
}

impl TestApp {
    pub fn router(&self) -> axum::Router {
        build_router(HttpState {
            services: Arc::clone(&self.services),
            allowed_origins: Arc::from(Vec::<String>::new()),
        })
    }

    /// Draft in tree 1 with a single `en` title.
    pub async fn create_draft(&self, title: &str) -> ArticleDto {
        let command = CreateArticleCommand::builder()
            .tree_id(1)
            .language("en")
            .title(title)
            .build()
            .unwrap();
        self.services
            .article_commands
            .create_article(&editor(), command)
            .await
            .expect("create article")
    }

    pub async fn set_title(&self, article_id: i64, language: &str, title: &str) -> ArticleDto {
        self.services
            .article_commands
            .set_title(
                &editor(),
                SetTitleCommand {
                    article_id,
                    language: language.into(),
                    title: title.into(),
                    ..SetTitleCommand::default()
                },
            )
            .await
            .expect("set title")
    }

    pub async fn add_block(
        &self,
        article_id: i64,
        slot: &str,
        language: &str,
        plugin_type: &str,
        parent_id: Option<i64>,
        payload: Value,
    ) -> ContentBlockDto {
        self.services
            .article_commands
            .add_content(
                &editor(),
                AddContentCommand {
                    article_id,
                    slot: slot.into(),
                    language: language.into(),
                    plugin_type: plugin_type.into(),
                    parent_id,
                    payload,
                },
            )
            .await
            .expect("add content")
    }

    pub async fn publish(&self, article_id: i64, language: &str) -> ArticleDto {
        self.services
            .article_commands
            .publish(
                &editor(),
                PublishCommand {
                    article_id,
                    language: language.into(),
                },
            )
            .await
            .expect("publish")
    }

    /// Either flavor as an editor sees it.
    pub async fn load(&self, id: i64) -> ArticleDto {
        self.services
            .article_queries
            .get_article_by_id(Some(&editor()), GetArticleByIdQuery { id })
            .await
            .expect("load article")
    }

    pub async fn load_public(&self, draft: &ArticleDto) -> ArticleDto {
        let public_id = draft.public_id.expect("draft has a public counterpart");
        self.load(public_id).await
    }
}

pub fn title_in<'a>(article: &'a ArticleDto, language: &str) -> &'a TitleDto {
    article
        .titles
        .iter()
        .find(|t| t.language == language)
        .unwrap_or_else(|| panic!("article {} has no {language} title", article.id))
}

pub fn placeholder<'a>(article: &'a ArticleDto, slot: &str) -> &'a PlaceholderDto {
    article
        .placeholders
        .iter()
        .find(|p| p.slot == slot)
        .unwrap_or_else(|| panic!("article {} has no placeholder {slot}", article.id))
}

/// (plugin type, payload, depth, position) of the blocks in `slot` for
/// `language`, in tree order. Ids are left out since copies get new ones.
pub fn content_shape(article: &ArticleDto, slot: &str, language: &str) -> Vec<(String, Value, i64, i64)> {
    article
        .placeholders
        .iter()
        .filter(|p| p.slot == slot)
        .flat_map(|p| p.blocks.iter())
        .filter(|b| b.language == language)
        .map(|b| (b.plugin_type.clone(), b.payload.clone(), b.depth, b.position))
        .collect()
}

pub fn json_request(method: &str, uri: &str, key: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(key) = key {
        builder = builder.header(AUTHORIZATION, format!("Bearer {key}"));
    }
    match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn read_json(resp: axum::response::Response) -> (StatusCode, Value) {
    let status = resp.status();
    let body_bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    let json = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).expect("json body")
    };
    (status, json)
}

/// Assert that a response is an error JSON with the expected status and
/// error string.
pub async fn assert_error_response(
    resp: axum::response::Response,
    expected_status: StatusCode,
    expected_error: &str,
) {
    assert_eq!(resp.status(), expected_status);
    let (parts, body_stream) = resp.into_parts();
    let body_bytes = body::to_bytes(body_stream, 1024 * 1024)
        .await
        .expect("read body");
    let ct = parts
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    assert!(ct.starts_with("application/json"), "unexpected content-type: {ct}");
    let json: Value = serde_json::from_slice(&body_bytes).expect("expected json error body");
    let err_field = json.get("error").and_then(|v| v.as_str()).unwrap_or("");
    let msg_field = json.get("message").and_then(|v| v.as_str()).unwrap_or("");
    assert_eq!(err_field, expected_error, "unexpected error field: {err_field}");
    assert!(!msg_field.is_empty(), "expected non-empty message field");
}

use anyhow::{Result, anyhow};
use cms_articles::application::{
    ApplicationServices, EngineSettings,
    ports::{
        cache::RenderCache, events::ArticleEventPublisher, permissions::PermissionOracle,
        security::ActorAuthenticator, templates::TemplateRegistry, time::Clock,
        util::SlugGenerator,
    },
};
use cms_articles::config::AppConfig;
use cms_articles::domain::article::{ArticleReadRepository, ArticleStore, TaxonomyRepository};
use cms_articles::infrastructure::{
    cache::InMemoryRenderCache,
    database,
    events::BroadcastEventPublisher,
    permissions::CapabilityPermissionOracle,
    repositories::{SqliteArticleReadRepository, SqliteArticleStore, SqliteTaxonomyRepository},
    security::ApiKeyAuthenticator,
    templates::ConfiguredTemplateRegistry,
    time::SystemClock,
    util::DefaultSlugGenerator,
};
use cms_articles::presentation::http::{routes::build_router, state::HttpState};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;

    let pool = database::init_pool(config.database_url()).await?;
    database::run_migrations(&pool).await?;

    let store: Arc<dyn ArticleStore> = Arc::new(SqliteArticleStore::new(pool.clone()));
    let read_repo: Arc<dyn ArticleReadRepository> =
        Arc::new(SqliteArticleReadRepository::new(pool.clone()));
    let taxonomy_repo: Arc<dyn TaxonomyRepository> =
        Arc::new(SqliteTaxonomyRepository::new(pool.clone()));

    let templates: Arc<dyn TemplateRegistry> = Arc::new(
        ConfiguredTemplateRegistry::new(config.templates().clone())
            .ok_or_else(|| anyhow!("no article templates configured"))?,
    );
    let cache: Arc<dyn RenderCache> = Arc::new(InMemoryRenderCache::new());
    let permissions: Arc<dyn PermissionOracle> = Arc::new(CapabilityPermissionOracle);
    let events: Arc<dyn ArticleEventPublisher> = Arc::new(BroadcastEventPublisher::default());
    let authenticator = ApiKeyAuthenticator::new(config.api_keys().clone());
    if authenticator.is_empty() {
        tracing::warn!("API_KEYS is empty, every write endpoint will answer 401");
    }
    let authenticator: Arc<dyn ActorAuthenticator> = Arc::new(authenticator);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let slugger: Arc<dyn SlugGenerator> = Arc::new(DefaultSlugGenerator);

    let settings = EngineSettings {
        site_id: config.site_id(),
        languages: config.languages().to_vec(),
        slug_date_format: config.slug_date_format().to_string(),
    };

    let services = Arc::new(ApplicationServices::new(
        settings,
        store,
        read_repo,
        taxonomy_repo,
        templates,
        cache,
        permissions,
        events,
        authenticator,
        clock,
        slugger,
    ));

    let state = HttpState {
        services,
        allowed_origins: config.allowed_origins().into(),
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for CTRL+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}

use std::sync::Arc;
use std::time::Duration;

use salvo::conn::TcpListener;
use salvo::{Listener, Router};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};
use vellum_app::app::api::routes;
use vellum_app::config::ConfigHandler;
use vellum_app::store_handler::StoreHandler;
use vellum_core::config::load_config;
use vellum_db::assetstore::{AssetStore, FsAssetStore};
use vellum_db::db::connection::create_pool;
use vellum_db::db::migrate::run_pending_migrations;
use vellum_db::store::RepositoryStore;
use vellum_db::store::pg::PgStore;
use vellum_service::auth::casbin::{CasbinEnforcerHandler, init_casbin};
use vellum_service::search::{SearchRegistry, SearchRegistryHandler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting Vellum content delivery server");

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    run_pending_migrations(&config.database.url).await?;

    let pool = create_pool(
        &config.database.url,
        u32::from(config.database.max_connections),
        Duration::from_secs(config.database.connect_timeout_secs),
    )
    .await?;

    tracing::info!("Database connection pool created.");

    let enforcer = init_casbin(pool.clone()).await?;

    let store: Arc<dyn RepositoryStore> = Arc::new(PgStore::new(pool));
    let assets: Arc<dyn AssetStore> = Arc::new(FsAssetStore::new(&config.delivery.assetstore_dir));
    let search = SearchRegistry::default().resolve(&config.search.processor);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let acceptor = TcpListener::new(bind_addr.clone()).bind().await;

    let router = Router::new()
        .hoop(StoreHandler { store, assets })
        .hoop(ConfigHandler {
            settings: Arc::new(config),
        })
        .hoop(CasbinEnforcerHandler {
            enforcer: Arc::new(enforcer),
        })
        .hoop(SearchRegistryHandler {
            registry: Arc::new(search),
        })
        .push(routes()?);

    tracing::info!("Server listening on {bind_addr}");

    salvo::Server::new(acceptor).serve(router).await;

    Ok(())
}

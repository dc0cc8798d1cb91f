use std::net::SocketAddr;
use std::sync::Arc;

use sitesearch::app::{router, AppState};
use sitesearch::config::AppConfig;
use sitesearch::db::content_repository::{ContentRepository, MongoContentRepository};
use sitesearch::db::query_log_repository::{MongoQueryLogRepository, QueryLogRepository};
use sitesearch::search::client::{MeilisearchIndex, SearchIndex};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sitesearch=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting sitesearch server...");

    let config = AppConfig::load()?;

    // Connect to MongoDB
    let mongo_client = mongodb::Client::with_uri_str(&config.mongodb_uri).await?;
    let mongo_db = mongo_client.database(&config.mongodb_database);
    let content_repo: Arc<dyn ContentRepository> =
        Arc::new(MongoContentRepository::new(&mongo_db));
    let query_log: Arc<dyn QueryLogRepository> =
        Arc::new(MongoQueryLogRepository::new(&mongo_db));

    tracing::info!("Connected to MongoDB at {}", config.mongodb_uri);

    // Connect to Meilisearch
    let index = MeilisearchIndex::new(
        &config.meilisearch_url,
        config.meilisearch_api_key.clone(),
        config.index_prefix.clone(),
    )?;
    if let Err(e) = index.configure_indexes().await {
        tracing::warn!("Failed to configure search indexes: {e}");
    }
    let search_index: Arc<dyn SearchIndex> = Arc::new(index);

    tracing::info!("Meilisearch client initialized for {}", config.meilisearch_url);

    let addr = config.listen_addr.clone();
    let app = router(AppState::new(config, content_repo, query_log, search_index));

    // Start the server
    tracing::info!("Listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

use std::sync::Arc;

use axum::Router;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::meilisearch::Meilisearch;
use testcontainers_modules::mongo::Mongo;

use sitesearch::app::{router, AppState};
use sitesearch::config::AppConfig;
use sitesearch::db::content_repository::{ContentRepository, MongoContentRepository};
use sitesearch::db::query_log_repository::{MongoQueryLogRepository, QueryLogRepository};
use sitesearch::search::client::{MeilisearchIndex, SearchIndex};

pub const SERVICE_TOKEN: &str = "test-token";

/// Holds running containers and provides the Axum router for integration tests.
///
/// Containers are kept alive for as long as this struct lives. When dropped,
/// containers are stopped and cleaned up automatically.
pub struct TestEnv {
    _mongo: ContainerAsync<Mongo>,
    _meili: ContainerAsync<Meilisearch>,
    pub router: Router,
    pub content_repo: Arc<dyn ContentRepository>,
    pub query_log: Arc<dyn QueryLogRepository>,
    pub search_index: Arc<dyn SearchIndex>,
}

impl TestEnv {
    /// Spin up all containers and build an Axum router wired to real services.
    pub async fn start() -> Self {
        // Start containers concurrently
        let (mongo_container, meili_container) =
            tokio::join!(Mongo::default().start(), Meilisearch::default().start());
        let mongo_container = mongo_container.expect("Failed to start MongoDB container");
        let meili_container = meili_container.expect("Failed to start Meilisearch container");

        // --- MongoDB ---
        let mongo_port = mongo_container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");
        let mongo_uri = format!("mongodb://127.0.0.1:{}", mongo_port);
        let mongo_client = mongodb::Client::with_uri_str(&mongo_uri)
            .await
            .expect("Failed to connect to MongoDB");
        let mongo_db = mongo_client.database("sitesearch_test");
        let content_repo: Arc<dyn ContentRepository> =
            Arc::new(MongoContentRepository::new(&mongo_db));
        let query_log: Arc<dyn QueryLogRepository> =
            Arc::new(MongoQueryLogRepository::new(&mongo_db));

        // --- Meilisearch ---
        let meili_port = meili_container
            .get_host_port_ipv4(7700)
            .await
            .expect("Failed to get Meilisearch port");
        let meili_url = format!("http://127.0.0.1:{}", meili_port);

        let index = MeilisearchIndex::new(&meili_url, None, "test_")
            .expect("Failed to create MeilisearchIndex");
        index
            .configure_indexes()
            .await
            .expect("Failed to configure Meilisearch indexes");
        let search_index: Arc<dyn SearchIndex> = Arc::new(index);

        // --- Build AppState and Router ---
        let config = AppConfig {
            mongodb_uri: mongo_uri,
            meilisearch_url: meili_url,
            index_prefix: "test_".to_string(),
            service_token: SERVICE_TOKEN.to_string(),
            provider_timeout_ms: 10_000,
            ..AppConfig::default()
        };
        let state = AppState::new(
            config,
            content_repo.clone(),
            query_log.clone(),
            search_index.clone(),
        );

        Self {
            _mongo: mongo_container,
            _meili: meili_container,
            router: router(state),
            content_repo,
            query_log,
            search_index,
        }
    }

    /// Build an `axum_test::TestServer` from this environment's router.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .try_build(self.router.clone())
            .expect("Failed to build TestServer")
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .try_build(self.router.clone())
            .expect("Failed to build TestServer")
    }

    /// Helper: ingest a record via the API. `fields` must carry `kind`.
    pub async fn ingest(
        &self,
        server: &axum_test::TestServer,
        fields: serde_json::Value,
    ) -> axum_test::TestResponse {
        let mut body = fields;
        body["service_token"] = serde_json::json!(SERVICE_TOKEN);
        server.post("/content").json(&body).await
    }

    /// Helper: wait for Meilisearch to process pending tasks (async indexing).
    pub async fn wait_for_search_indexing(&self) {
        tokio::time::sleep(std::time::Duration::from_secs(2)).await;
    }
}

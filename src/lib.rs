pub mod app;
pub mod config;
pub mod error;
pub mod models {
    pub mod content;
    pub mod search;
}
pub mod db {
    pub mod content_repository;
    pub mod models;
    pub mod query_log_repository;
}
pub mod search {
    pub mod client;
    pub mod engine;
    pub mod normalizer;
    pub mod pagination;
    pub mod provider;
}
pub mod api {
    pub mod errors;
    pub mod ingest;
    pub mod params;
    pub mod response;
    pub mod search;
}

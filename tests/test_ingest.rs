mod common;

use serde_json::json;
use sitesearch::db::content_repository::ContentRepository;
use sitesearch::models::content::ContentKind;

#[tokio::test]
async fn ingest_stores_record_with_generated_id() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    let response = env
        .ingest(
            &server,
            json!({
                "kind": "article",
                "title": "Release notes",
                "body": "Everything that changed.",
                "tags": ["news"]
            }),
        )
        .await;

    let body: serde_json::Value = response.json();
    assert_eq!(body["kind"], "article");
    let id = body["id"].as_str().unwrap();
    assert_eq!(body["link"], format!("/blog/{id}"));

    let articles = env.content_repo.list_all(ContentKind::Article).await.unwrap();
    let stored = articles
        .iter()
        .find(|r| r.id() == id)
        .expect("Record should be stored");
    assert_eq!(stored.label(), "Release notes");
}

#[tokio::test]
async fn ingest_rejects_invalid_token() {
    let env = common::TestEnv::start().await;
    let server = env.server_permissive();

    let response = server
        .post("/content")
        .json(&json!({
            "service_token": "wrong",
            "kind": "faq",
            "question": "Why?",
            "answer": "Because."
        }))
        .await;

    response.assert_status_unauthorized();
}

#[tokio::test]
async fn ingest_rejects_empty_label() {
    let env = common::TestEnv::start().await;
    let server = env.server_permissive();

    let response = env
        .ingest(
            &server,
            json!({ "kind": "product", "name": "  ", "description": "Nameless." }),
        )
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("name"));
}

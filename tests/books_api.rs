//! End-to-end tests for the `/books` resource over real HTTP.

mod common;

use bookshelf_service::Book;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn create(client: &reqwest::Client, base: &str, body: Value) -> reqwest::Response {
    client
        .post(format!("{}/books", base))
        .json(&body)
        .send()
        .await
        .unwrap()
}

async fn create_raw(client: &reqwest::Client, base: &str, body: &'static str) -> reqwest::Response {
    client
        .post(format!("{}/books", base))
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .unwrap()
}

fn assert_error_envelope(body: &Value) {
    let obj = body.as_object().expect("error body must be an object");
    assert_eq!(obj.len(), 1, "envelope has exactly one field: {body}");
    assert!(obj["error"].is_string());
}

#[tokio::test]
async fn create_returns_201_with_assigned_id() {
    let (base, _store) = common::spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = create(
        &client,
        &base,
        json!({"title": "Go入門", "author": "田中", "price": 1980}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["id"], 1);
    assert_eq!(body["title"], "Go入門");
    assert_eq!(body["author"], "田中");
    assert_eq!(body["price"], 1980);
    assert!(body["created_at"].is_string());
}

#[tokio::test]
async fn create_rejects_bad_payloads_with_400() {
    let (base, _store) = common::spawn_test_server().await;
    let client = reqwest::Client::new();

    let cases = [
        (r#"{bad"#, "invalid JSON body"),
        (r#"[1, 2, 3]"#, "invalid JSON body"),
        (r#"{"title":"Go入門","author":"田中","price":"free"}"#, "invalid JSON body"),
        (r#"{"title":"","author":"田中","price":1980}"#, "title and author are required"),
        (r#"{"title":"Go入門","author":"","price":1980}"#, "title and author are required"),
        (r#"{"author":"田中","price":1980}"#, "title and author are required"),
        (r#"{"title":"Go入門","author":"田中","price":-1}"#, "price must be zero or greater"),
    ];

    for (body, message) in cases {
        let resp = create_raw(&client, &base, body).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let err: Value = resp.json().await.unwrap();
        assert_error_envelope(&err);
        assert_eq!(err["error"], message, "body: {body}");
    }

    // Nothing invalid was persisted.
    let list: Vec<Book> = client
        .get(format!("{}/books", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn create_without_json_content_type_is_accepted() {
    let (base, _store) = common::spawn_test_server().await;
    let resp = reqwest::Client::new()
        .post(format!("{}/books", base))
        .body(r#"{"title":"Go入門","author":"田中","price":1980}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["title"], "Go入門");
}

#[tokio::test]
async fn null_fields_reach_the_validator() {
    let (base, _store) = common::spawn_test_server().await;
    let client = reqwest::Client::new();

    let resp = create_raw(&client, &base, r#"{"title":null,"author":"田中","price":1980}"#).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: Value = resp.json().await.unwrap();
    assert_eq!(err["error"], "title and author are required");

    let resp = create_raw(&client, &base, r#"{"title":"Go入門","author":"田中","price":null}"#).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["price"], 0);
}

#[tokio::test]
async fn zero_price_is_accepted() {
    let (base, _store) = common::spawn_test_server().await;
    let resp = create(
        &reqwest::Client::new(),
        &base,
        json!({"title": "無料本", "author": "佐藤", "price": 0}),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn list_on_empty_store_is_empty_array() {
    let (base, _store) = common::spawn_test_server().await;
    let resp = reqwest::get(format!("{}/books", base)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.contains("application/json"));
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn list_returns_books_in_id_order_and_is_stable() {
    let (base, _store) = common::spawn_test_server().await;
    let client = reqwest::Client::new();

    for (title, price) in [("Go入門", 1980), ("実践Go", 2480), ("Rust入門", 3200)] {
        let resp = create(
            &client,
            &base,
            json!({"title": title, "author": "田中", "price": price}),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let first: Vec<Book> = reqwest::get(format!("{}/books", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let ids: Vec<i64> = first.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(first[1].title, "実践Go");

    let second: Vec<Book> = reqwest::get(format!("{}/books", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn get_returns_the_created_book() {
    let (base, _store) = common::spawn_test_server().await;
    let client = reqwest::Client::new();

    let created: Book = create(
        &client,
        &base,
        json!({"title": "Go入門", "author": "田中", "price": 1980}),
    )
    .await
    .json()
    .await
    .unwrap();

    let resp = reqwest::get(format!("{}/books/{}", base, created.id))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Book = resp.json().await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn get_unknown_id_is_404() {
    let (base, _store) = common::spawn_test_server().await;
    let resp = reqwest::get(format!("{}/books/999", base)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: Value = resp.json().await.unwrap();
    assert_error_envelope(&err);
    assert_eq!(err["error"], "book not found");
}

#[tokio::test]
async fn non_numeric_id_is_400() {
    let (base, _store) = common::spawn_test_server().await;
    let client = reqwest::Client::new();

    for path in [
        "/books/abc",
        "/books/1.5",
        "/books/99999999999999999999",
        "/books/%FF",
    ] {
        let resp = client.get(format!("{}{}", base, path)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "GET {path}");
        let err: Value = resp.json().await.unwrap();
        assert_eq!(err["error"], "invalid id");

        let resp = client
            .delete(format!("{}{}", base, path))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "DELETE {path}");
        let err: Value = resp.json().await.unwrap();
        assert_error_envelope(&err);
        assert_eq!(err["error"], "invalid id");
    }
}

#[tokio::test]
async fn delete_twice_is_204_then_404() {
    let (base, _store) = common::spawn_test_server().await;
    let client = reqwest::Client::new();

    let created: Book = create(
        &client,
        &base,
        json!({"title": "Go入門", "author": "田中", "price": 1980}),
    )
    .await
    .json()
    .await
    .unwrap();
    let url = format!("{}/books/{}", base, created.id);

    let first = client.delete(&url).send().await.unwrap();
    assert_eq!(first.status(), StatusCode::NO_CONTENT);
    assert!(first.bytes().await.unwrap().is_empty());

    let second = client.delete(&url).send().await.unwrap();
    assert_eq!(second.status(), StatusCode::NOT_FOUND);

    let lookup = client.get(&url).send().await.unwrap();
    assert_eq!(lookup.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleted_ids_are_not_reused() {
    let (base, _store) = common::spawn_test_server().await;
    let client = reqwest::Client::new();
    let payload = json!({"title": "Go入門", "author": "田中", "price": 1980});

    let first: Book = create(&client, &base, payload.clone()).await.json().await.unwrap();
    let resp = client
        .delete(format!("{}/books/{}", base, first.id))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let second: Book = create(&client, &base, payload).await.json().await.unwrap();
    assert!(second.id > first.id);
}

#[tokio::test]
async fn health_reports_ok_while_store_is_open() {
    let (base, _store) = common::spawn_test_server().await;
    let resp = reqwest::get(format!("{}/health", base)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn store_failures_are_500_with_generic_message() {
    let (base, store) = common::spawn_test_server().await;
    store.close().await;

    let resp = reqwest::get(format!("{}/books", base)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let err: Value = resp.json().await.unwrap();
    assert_error_envelope(&err);
    assert_eq!(err["error"], "failed to list books");

    let resp = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let (base, _store) = common::spawn_test_server().await;
    let resp = reqwest::get(format!("{}/authors", base)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let err: Value = resp.json().await.unwrap();
    assert_error_envelope(&err);
    assert_eq!(err["error"], "no such route");
}

#[tokio::test]
async fn unsupported_verb_returns_405_envelope() {
    let (base, _store) = common::spawn_test_server().await;
    let client = reqwest::Client::new();

    for (method, path) in [
        (reqwest::Method::PUT, "/books/1"),
        (reqwest::Method::PATCH, "/books"),
        (reqwest::Method::DELETE, "/books"),
    ] {
        let resp = client
            .request(method.clone(), format!("{}{}", base, path))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{method} {path}");
        let err: Value = resp.json().await.unwrap();
        assert_error_envelope(&err);
        assert_eq!(err["error"], "method not allowed");
    }
}

//! Integration tests driving the router end to end against a temporary
//! SQLite database, using in-memory request bodies.

use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Request, Response};
use tempfile::TempDir;

use quotes_api::router::Router;
use quotes_store::{Store, StoreConfig};

async fn test_router() -> (Router, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = StoreConfig {
        database_url: format!("sqlite://{}", dir.path().join("test.db").display()),
        max_connections: 2,
    };
    let store = Store::connect(&config).await.unwrap();
    store.migrate().await.unwrap();
    (Router::new(Arc::new(store)), dir)
}

async fn send(router: &Router, req: Request<Full<Bytes>>) -> Response<Bytes> {
    match router.route(req).await {
        Ok(resp) => resp,
        Err(err) => err.into(),
    }
}

fn request(method: &str, path: &str) -> Request<Full<Bytes>> {
    Request::builder()
        .method(method)
        .uri(path)
        .body(Full::new(Bytes::new()))
        .unwrap()
}

fn json_request(method: &str, path: &str, body: serde_json::Value) -> Request<Full<Bytes>> {
    Request::builder()
        .method(method)
        .uri(path)
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

fn body_json(resp: &Response<Bytes>) -> serde_json::Value {
    serde_json::from_slice(resp.body()).unwrap()
}

async fn create_author(router: &Router, name: &str) -> i64 {
    let resp = send(
        router,
        json_request("POST", "/authors", serde_json::json!({"name": name})),
    )
    .await;
    assert_eq!(resp.status(), 201);
    body_json(&resp)["id"].as_i64().unwrap()
}

async fn create_quote(router: &Router, author_id: i64, text: &str) -> i64 {
    let resp = send(
        router,
        json_request(
            "POST",
            &format!("/authors/{}/quotes", author_id),
            serde_json::json!({"text": text}),
        ),
    )
    .await;
    assert_eq!(resp.status(), 201);
    body_json(&resp)["id"].as_i64().unwrap()
}

#[tokio::test]
async fn end_to_end_author_and_quote_flow() {
    let (router, _dir) = test_router().await;

    let resp = send(
        &router,
        json_request("POST", "/authors", serde_json::json!({"name": "Pushkin"})),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let author = body_json(&resp);
    assert_eq!(author["name"], "Pushkin");
    assert_eq!(author["surname"], "Иванов");
    let author_id = author["id"].as_i64().unwrap();

    let resp = send(
        &router,
        json_request(
            "POST",
            &format!("/authors/{}/quotes", author_id),
            serde_json::json!({"text": "Мороз и солнце"}),
        ),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let quote = body_json(&resp);
    assert_eq!(quote["text"], "Мороз и солнце");
    assert_eq!(quote["author"], author);

    let resp = send(&router, request("GET", "/quotes")).await;
    assert_eq!(resp.status(), 200);
    let listed = body_json(&resp);
    assert_eq!(listed, serde_json::json!([quote]));
}

#[tokio::test]
async fn get_quote_returns_created_state() {
    let (router, _dir) = test_router().await;
    let author_id = create_author(&router, "Пушкин").await;
    let quote_id = create_quote(&router, author_id, "Мороз и солнце").await;

    let resp = send(&router, request("GET", &format!("/quotes/{}", quote_id))).await;
    assert_eq!(resp.status(), 200);
    let quote = body_json(&resp);
    assert_eq!(quote["text"], "Мороз и солнце");
    assert_eq!(quote["author"]["id"].as_i64(), Some(author_id));
    assert_eq!(quote["author"]["name"], "Пушкин");
}

#[tokio::test]
async fn missing_quote_returns_404_for_all_methods() {
    let (router, _dir) = test_router().await;

    let resp = send(&router, request("GET", "/quotes/999")).await;
    assert_eq!(resp.status(), 404);

    let resp = send(
        &router,
        json_request("PUT", "/quotes/999", serde_json::json!({"text": "x"})),
    )
    .await;
    assert_eq!(resp.status(), 404);

    let resp = send(&router, request("DELETE", "/quotes/999")).await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn duplicate_author_name_returns_409() {
    let (router, _dir) = test_router().await;
    create_author(&router, "Пушкин").await;

    let resp = send(
        &router,
        json_request("POST", "/authors", serde_json::json!({"name": "Пушкин"})),
    )
    .await;
    assert_eq!(resp.status(), 409);
    let body = body_json(&resp);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "409");
}

#[tokio::test]
async fn same_text_under_different_authors_succeeds() {
    let (router, _dir) = test_router().await;
    let a = create_author(&router, "Первый").await;
    let b = create_author(&router, "Второй").await;

    create_quote(&router, a, "same text").await;
    create_quote(&router, b, "same text").await;

    let resp = send(&router, request("GET", "/quotes")).await;
    assert_eq!(body_json(&resp).as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn delete_confirms_and_subsequent_get_is_404() {
    let (router, _dir) = test_router().await;
    let author_id = create_author(&router, "Пушкин").await;
    let quote_id = create_quote(&router, author_id, "text").await;

    let resp = send(&router, request("DELETE", &format!("/quotes/{}", quote_id))).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["Content-Type"],
        "text/plain; charset=utf-8"
    );
    assert_eq!(
        std::str::from_utf8(resp.body()).unwrap(),
        format!("Quote with id={} is deleted.", quote_id)
    );

    let resp = send(&router, request("GET", &format!("/quotes/{}", quote_id))).await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn put_text_only_keeps_author() {
    let (router, _dir) = test_router().await;
    let author_id = create_author(&router, "Пушкин").await;
    let quote_id = create_quote(&router, author_id, "old text").await;

    let resp = send(
        &router,
        json_request(
            "PUT",
            &format!("/quotes/{}", quote_id),
            serde_json::json!({"text": "new text"}),
        ),
    )
    .await;
    assert_eq!(resp.status(), 200);
    let quote = body_json(&resp);
    assert_eq!(quote["text"], "new text");
    assert_eq!(quote["author"]["id"].as_i64(), Some(author_id));
}

#[tokio::test]
async fn put_unknown_field_returns_400_and_mutates_nothing() {
    let (router, _dir) = test_router().await;
    let author_id = create_author(&router, "Пушкин").await;
    let quote_id = create_quote(&router, author_id, "original").await;

    let resp = send(
        &router,
        json_request(
            "PUT",
            &format!("/quotes/{}", quote_id),
            serde_json::json!({"text": "changed", "created": "2024-01-01"}),
        ),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let resp = send(&router, request("GET", &format!("/quotes/{}", quote_id))).await;
    assert_eq!(body_json(&resp)["text"], "original");
}

#[tokio::test]
async fn put_author_id_to_missing_author_returns_404() {
    let (router, _dir) = test_router().await;
    let author_id = create_author(&router, "Пушкин").await;
    let quote_id = create_quote(&router, author_id, "text").await;

    let resp = send(
        &router,
        json_request(
            "PUT",
            &format!("/quotes/{}", quote_id),
            serde_json::json!({"author_id": 777}),
        ),
    )
    .await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn quote_for_missing_author_returns_404() {
    let (router, _dir) = test_router().await;

    let resp = send(
        &router,
        json_request("POST", "/authors/42/quotes", serde_json::json!({"text": "x"})),
    )
    .await;
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn flat_quote_creation_is_not_supported() {
    let (router, _dir) = test_router().await;

    // Quote creation is path-scoped only; the flat form answers 405.
    let resp = send(
        &router,
        json_request(
            "POST",
            "/quotes",
            serde_json::json!({"author": {"id": 1}, "text": "x"}),
        ),
    )
    .await;
    assert_eq!(resp.status(), 405);
}

#[tokio::test]
async fn validation_rejects_bad_payloads() {
    let (router, _dir) = test_router().await;
    let author_id = create_author(&router, "Пушкин").await;

    let resp = send(
        &router,
        json_request(
            "POST",
            &format!("/authors/{}/quotes", author_id),
            serde_json::json!({"text": ""}),
        ),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let resp = send(
        &router,
        json_request(
            "POST",
            &format!("/authors/{}/quotes", author_id),
            serde_json::json!({"text": "x".repeat(256)}),
        ),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let resp = send(
        &router,
        json_request(
            "POST",
            "/authors",
            serde_json::json!({"name": "x".repeat(33)}),
        ),
    )
    .await;
    assert_eq!(resp.status(), 400);

    let resp = send(&router, request("GET", "/quotes/abc")).await;
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn explicit_surname_is_stored() {
    let (router, _dir) = test_router().await;

    let resp = send(
        &router,
        json_request(
            "POST",
            "/authors",
            serde_json::json!({"name": "Alexander", "surname": "Pushkin"}),
        ),
    )
    .await;
    assert_eq!(resp.status(), 201);
    assert_eq!(body_json(&resp)["surname"], "Pushkin");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let (router, _dir) = test_router().await;

    let resp = send(&router, request("GET", "/nope")).await;
    assert_eq!(resp.status(), 404);
    assert_eq!(body_json(&resp)["success"], false);
}

#[tokio::test]
async fn list_quotes_empty_is_ok() {
    let (router, _dir) = test_router().await;

    let resp = send(&router, request("GET", "/quotes")).await;
    assert_eq!(resp.status(), 200);
    assert_eq!(body_json(&resp), serde_json::json!([]));
}

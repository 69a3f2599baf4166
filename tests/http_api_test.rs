//! HTTP API Integration Tests
//! Tests for the GraphQL endpoint and health route

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use minigql::{create_app, SchemaStyle, ServerConfig};
use serde_json::{json, Value};
use tower::util::ServiceExt;

/// Helper to create a test app
fn create_test_app(style: SchemaStyle) -> axum::Router {
    let config = ServerConfig::new("127.0.0.1", 0, "/graphqlAPI", style);
    create_app(config).expect("Failed to build app")
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// Helper to POST a raw body to the GraphQL route
async fn post_raw(app: &axum::Router, path: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, text) = send(app, request).await;
    (status, serde_json::from_str(&text).unwrap_or(json!(null)))
}

async fn post_query(app: &axum::Router, query: &str) -> (StatusCode, Value) {
    post_raw(app, "/graphqlAPI", &json!({ "query": query }).to_string()).await
}

/// Helper to make a GET request
async fn get(app: &axum::Router, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("GET")
        .uri(path)
        .body(Body::empty())
        .unwrap();
    let (status, text) = send(app, request).await;
    (status, serde_json::from_str(&text).unwrap_or(json!(null)))
}

// ============================================================================
// Lookup scenarios
// ============================================================================

#[tokio::test]
async fn test_user_lookup_exact_body() {
    let app = create_test_app(SchemaStyle::Sdl);
    let request = Request::builder()
        .method("POST")
        .uri("/graphqlAPI")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"query": r#"{ user(id: "1002") { username age } }"#}).to_string(),
        ))
        .unwrap();
    let (status, text) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, r#"{"data":{"user":{"username":"列队猫","age":90}}}"#);
}

#[tokio::test]
async fn test_unknown_user_is_null() {
    let app = create_test_app(SchemaStyle::Sdl);
    let (status, body) = post_query(&app, r#"{ user(id: "9999") { username } }"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": {"user": null}}));
}

#[tokio::test]
async fn test_default_argument_and_id() {
    let app = create_test_app(SchemaStyle::Programmatic);
    let (status, body) = post_query(&app, "{ user { id username age } }").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"data": {"user": {"id": "1001", "username": "高厉害", "age": 21}}})
    );
}

#[tokio::test]
async fn test_now_field() {
    let app = create_test_app(SchemaStyle::Sdl);
    let (status, body) = post_query(&app, "{ now }").await;
    assert_eq!(status, StatusCode::OK);
    let now = body["data"]["now"].as_str().expect("now is a string");
    assert!(now.contains(", "));
    assert!(now.ends_with("AM") || now.ends_with("PM"));
}

#[tokio::test]
async fn test_now_changes_between_requests() {
    let app = create_test_app(SchemaStyle::Programmatic);
    let (_, first) = post_query(&app, "{ now }").await;
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    let (_, second) = post_query(&app, "{ now }").await;

    let first = first["data"]["now"].as_str().expect("now is a string");
    let second = second["data"]["now"].as_str().expect("now is a string");
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_bare_selection_without_braces() {
    let app = create_test_app(SchemaStyle::Sdl);
    let (status, body) = post_query(&app, r#"user(id: "1003") { username }"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": {"user": {"username": "小明"}}}));
}

// ============================================================================
// Partial results and errors
// ============================================================================

#[tokio::test]
async fn test_partial_result_with_unknown_field() {
    let app = create_test_app(SchemaStyle::Sdl);
    let (status, body) = post_query(&app, r#"{ user(id: "1004") { username email } }"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!({"user": {"username": "小红", "email": null}}));
    assert_eq!(body["errors"][0]["extensions"]["code"], "UNKNOWN_FIELD");
    assert_eq!(body["errors"][0]["path"], json!(["user", "email"]));
}

#[tokio::test]
async fn test_object_without_selection() {
    let app = create_test_app(SchemaStyle::Sdl);
    let (status, body) = post_query(&app, "{ user now }").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"], Value::Null);
    assert!(body["data"]["now"].is_string());
    assert_eq!(body["errors"][0]["extensions"]["code"], "SELECTION_REQUIRED");
}

#[tokio::test]
async fn test_syntax_error_is_graphql_error() {
    let app = create_test_app(SchemaStyle::Sdl);
    let (status, body) = post_query(&app, "{ user(id: ").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("data").is_none());
    assert_eq!(body["errors"][0]["extensions"]["code"], "GRAPHQL_PARSE_FAILED");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = create_test_app(SchemaStyle::Sdl);

    let (status, body) = post_raw(&app, "/graphqlAPI", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"][0]["message"].is_string());

    let (status, _) = post_raw(&app, "/graphqlAPI", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_raw(&app, "/graphqlAPI", r#"{"query": 42}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_raw(&app, "/graphqlAPI", "{}").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_body_read_regardless_of_content_type() {
    let app = create_test_app(SchemaStyle::Sdl);
    let request = Request::builder()
        .method("POST")
        .uri("/graphqlAPI")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(r#"{"query": "{ user(id: \"1001\") { age } }"}"#))
        .unwrap();
    let (status, text) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(text, r#"{"data":{"user":{"age":21}}}"#);
}

// ============================================================================
// Variables, GET and routes
// ============================================================================

#[tokio::test]
async fn test_variables_in_post_body() {
    let app = create_test_app(SchemaStyle::Sdl);
    let body = json!({
        "query": "query Lookup($id: String) { user(id: $id) { username } }",
        "operationName": "Lookup",
        "variables": {"id": "1002"}
    });
    let (status, body) = post_raw(&app, "/graphqlAPI", &body.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": {"user": {"username": "列队猫"}}}));
}

#[tokio::test]
async fn test_get_query_string() {
    let app = create_test_app(SchemaStyle::Sdl);
    let (status, body) = get(
        &app,
        "/graphqlAPI?query=%7B%20user(id%3A%20%221003%22)%20%7B%20age%20%7D%20%7D",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": {"user": {"age": 15}}}));

    let (status, body) = get(
        &app,
        "/graphqlAPI?query=query%20Q(%24id%3A%20String)%20%7B%20user(id%3A%20%24id)%20%7B%20age%20%7D%20%7D&variables=%7B%22id%22%3A%221004%22%7D",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": {"user": {"age": 16}}}));

    let (status, _) = get(&app, "/graphqlAPI").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&app, "/graphqlAPI?query=%7B%20now%20%7D&variables=nope").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_custom_route() {
    let config = ServerConfig::new("127.0.0.1", 0, "api/gql", SchemaStyle::Sdl);
    let app = create_app(config).unwrap();

    let (status, body) = post_raw(&app, "/api/gql", r#"{"query": "{ user { age } }"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": {"user": {"age": 21}}}));

    let (status, _) = post_raw(&app, "/graphqlAPI", r#"{"query": "{ now }"}"#).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app(SchemaStyle::Programmatic);
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["schemaStyle"], "programmatic");
}

#[tokio::test]
async fn test_concurrent_requests() {
    let app = create_test_app(SchemaStyle::Sdl);
    let ids = ["1001", "1002", "1003", "1004", "9999"];
    let pending = ids.iter().map(|id| {
        let app = app.clone();
        let query = format!(r#"{{ user(id: "{}") {{ id }} }}"#, id);
        async move { post_query(&app, &query).await }
    });
    let results = futures::future::join_all(pending).await;

    for (id, (status, body)) in ids.iter().zip(results) {
        assert_eq!(status, StatusCode::OK);
        if *id == "9999" {
            assert_eq!(body["data"]["user"], Value::Null);
        } else {
            assert_eq!(body["data"]["user"]["id"], *id);
        }
    }
}

//! Integration tests for the GraphQL adapter
//!
//! Most tests execute against the schema directly; one goes through the axum router.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use streamcat_common::Store;
use streamcat_server::graphql::{build_router, build_schema, CatalogSchema};
use streamcat_server::AppState;
use tower::util::ServiceExt;

fn schema() -> CatalogSchema {
    build_schema(AppState::from_store(Store::default()))
}

async fn execute(schema: &CatalogSchema, query: &str) -> Value {
    let response = schema.execute(query).await;
    serde_json::to_value(&response).unwrap()
}

async fn create_user(schema: &CatalogSchema, name: &str) -> String {
    let result = execute(
        schema,
        &format!(r#"mutation {{ createUser(name: "{}", age: 28) {{ id }} }}"#, name),
    )
    .await;
    result["data"]["createUser"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_create_and_query_user() {
    let schema = schema();
    let id = create_user(&schema, "Ana").await;

    let result = execute(
        &schema,
        &format!(r#"{{ user(id: "{}") {{ id name age }} }}"#, id),
    )
    .await;
    assert!(result["errors"].as_array().map_or(true, |e| e.is_empty()), "{}", result);
    assert_eq!(result["data"]["user"], json!({"id": id, "name": "Ana", "age": 28}));
}

#[tokio::test]
async fn test_fields_are_camel_case() {
    let schema = schema();
    let result = execute(
        &schema,
        r#"mutation { createSong(name: "Intro", artist: "Band", durationSeconds: 95) { durationSeconds } }"#,
    )
    .await;
    assert_eq!(result["data"]["createSong"]["durationSeconds"], 95);

    let result = execute(&schema, "{ statistics { totalSongs avgSongsPerPlaylist } }").await;
    assert_eq!(result["data"]["statistics"]["totalSongs"], 1);
    assert_eq!(result["data"]["statistics"]["avgSongsPerPlaylist"], 0.0);
}

#[tokio::test]
async fn test_not_found_error_code() {
    let schema = schema();
    let result = execute(&schema, r#"{ user(id: "ghost") { id } }"#).await;

    let error = &result["errors"][0];
    assert_eq!(error["extensions"]["code"], "NOT_FOUND");
    assert_eq!(error["extensions"]["field"], "id");
}

#[tokio::test]
async fn test_validation_error_code() {
    let schema = schema();
    let result = execute(&schema, r#"mutation { createUser(name: "Ana", age: 0) { id } }"#).await;

    let error = &result["errors"][0];
    assert_eq!(error["extensions"]["code"], "VALIDATION_ERROR");
    assert_eq!(error["extensions"]["field"], "age");

    let result = execute(&schema, "{ users { id } }").await;
    assert_eq!(result["data"]["users"], json!([]));
}

#[tokio::test]
async fn test_referential_error_code() {
    let schema = schema();
    let result = execute(
        &schema,
        r#"mutation { createPlaylist(name: "Mix", ownerId: "ghost") { id } }"#,
    )
    .await;

    let error = &result["errors"][0];
    assert_eq!(error["extensions"]["code"], "REFERENTIAL_ERROR");
    assert_eq!(error["extensions"]["field"], "owner_id");
}

#[tokio::test]
async fn test_nested_relationships() {
    let schema = schema();
    let owner = create_user(&schema, "Ana").await;
    let song = execute(
        &schema,
        r#"mutation { createSong(name: "One", artist: "Band", durationSeconds: 60) { id } }"#,
    )
    .await["data"]["createSong"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let created = execute(
        &schema,
        &format!(
            r#"mutation {{ createPlaylist(name: "Mix", ownerId: "{}", songIds: ["{}", "gone"]) {{ id songIds }} }}"#,
            owner, song
        ),
    )
    .await;
    let pid = created["data"]["createPlaylist"]["id"].as_str().unwrap().to_string();
    assert_eq!(
        created["data"]["createPlaylist"]["songIds"],
        json!([song, "gone"])
    );

    let result = execute(
        &schema,
        &format!(
            r#"{{ playlist(id: "{}") {{ owner {{ name playlists {{ id }} }} songs {{ name playlists {{ id }} }} }} }}"#,
            pid
        ),
    )
    .await;
    let playlist = &result["data"]["playlist"];
    assert_eq!(playlist["owner"]["name"], "Ana");
    assert_eq!(playlist["owner"]["playlists"][0]["id"], pid.as_str());
    assert_eq!(playlist["songs"].as_array().unwrap().len(), 1);
    assert_eq!(playlist["songs"][0]["playlists"][0]["id"], pid.as_str());

    execute(&schema, &format!(r#"mutation {{ deleteUser(id: "{}") }}"#, owner)).await;
    let result = execute(
        &schema,
        &format!(r#"{{ playlistDetails(id: "{}") {{ owner {{ id }} songs {{ id }} }} }}"#, pid),
    )
    .await;
    assert_eq!(result["data"]["playlistDetails"]["owner"], Value::Null);
}

#[tokio::test]
async fn test_update_and_delete_mutations() {
    let schema = schema();
    let id = create_user(&schema, "Ana").await;

    let result = execute(
        &schema,
        &format!(r#"mutation {{ updateUser(id: "{}", name: "Bia") {{ name age }} }}"#, id),
    )
    .await;
    assert_eq!(result["data"]["updateUser"], json!({"name": "Bia", "age": 28}));

    let result = execute(&schema, &format!(r#"mutation {{ deleteUser(id: "{}") }}"#, id)).await;
    assert_eq!(result["data"]["deleteUser"], true);
    let result = execute(&schema, &format!(r#"mutation {{ deleteUser(id: "{}") }}"#, id)).await;
    assert_eq!(result["data"]["deleteUser"], false);
}

#[tokio::test]
async fn test_http_endpoint() {
    let app = build_router(AppState::from_store(Store::default()));
    let body = json!({"query": "{ users { id } }"});

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/graphql")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["data"]["users"], json!([]));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

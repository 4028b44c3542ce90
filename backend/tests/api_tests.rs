//! HTTP surface tests that need no network

mod common;

use axum::body::Body;
use axum::http::{
    header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    Request, StatusCode,
};
use serde_json::Value;
use spatialgpt_backend::create_app;
use tower::ServiceExt;

use common::{body_text, scripted_state, ScriptedModel};

const BOUNDARY: &str = "spatialgpt-boundary";

fn app() -> axum::Router {
    create_app(scripted_state(ScriptedModel::new(vec![])))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn multipart(field: &str, file_name: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: text/plain\r\n\r\n{content}\r\n--{b}--\r\n",
        b = BOUNDARY,
    );
    Request::builder()
        .method("POST")
        .uri("/api/files/upload")
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].as_str().is_some());
}

#[tokio::test]
async fn test_upload_returns_blob_metadata() {
    let state = scripted_state(ScriptedModel::new(vec![]));
    let upload_dir = state.config.storage.upload_dir.clone();
    let app = create_app(state);

    let response = app
        .oneshot(multipart("file", "notes.txt", "hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let blob: Value = serde_json::from_str(&body_text(response).await).unwrap();
    let pathname = blob["pathname"].as_str().unwrap();
    assert!(pathname.starts_with("notes-") && pathname.ends_with(".txt"));
    assert_eq!(blob["contentType"], "text/plain");
    assert_eq!(blob["size"], 5);
    assert!(blob["url"].as_str().unwrap().ends_with(pathname));
    assert!(blob["downloadUrl"].as_str().is_some());
    assert!(blob["contentDisposition"].as_str().is_some());

    let _ = std::fs::remove_dir_all(upload_dir);
}

#[tokio::test]
async fn test_download_url_serves_attachment() {
    let state = scripted_state(ScriptedModel::new(vec![]));
    let upload_dir = state.config.storage.upload_dir.clone();
    let app = create_app(state);

    let response = app
        .clone()
        .oneshot(multipart("file", "notes.txt", "hello"))
        .await
        .unwrap();
    let blob: Value = serde_json::from_str(&body_text(response).await).unwrap();
    let pathname = blob["pathname"].as_str().unwrap().to_string();
    assert!(blob["downloadUrl"]
        .as_str()
        .unwrap()
        .ends_with(&format!("/{}?download=1", pathname)));

    let download = app
        .clone()
        .oneshot(get(&format!("/files/{}?download=1", pathname)))
        .await
        .unwrap();
    assert_eq!(download.status(), StatusCode::OK);
    assert_eq!(
        download.headers()[CONTENT_DISPOSITION],
        format!("attachment; filename=\"{}\"", pathname).as_str()
    );
    assert_eq!(body_text(download).await, "hello");

    let inline = app
        .oneshot(get(&format!("/files/{}", pathname)))
        .await
        .unwrap();
    assert_eq!(inline.status(), StatusCode::OK);
    assert!(inline.headers().get(CONTENT_DISPOSITION).is_none());

    let _ = std::fs::remove_dir_all(upload_dir);
}

#[tokio::test]
async fn test_upload_without_file_field_is_rejected() {
    let response = app()
        .oneshot(multipart("attachment", "notes.txt", "hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["field"], "file");
}

#[tokio::test]
async fn test_unknown_visualization_type() {
    let response = app()
        .oneshot(get("/api/visualizations/tides?latitude=1&longitude=2"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reversed_visualization_range_rejected() {
    let response = app()
        .oneshot(get(
            "/api/visualizations/weather-history?latitude=1&longitude=2&from=2025-06-02&to=2025-06-01",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_poi_categories() {
    let response = app().oneshot(get("/api/poi/categories")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
    let categories = body.as_array().unwrap();
    assert_eq!(categories.len(), 10);
    assert_eq!(categories[0]["id"], "restaurant");
    assert_eq!(categories[9]["value"], "shop=supermarket");
}

#[tokio::test]
async fn test_short_place_query_is_empty() {
    let response = app().oneshot(get("/api/places/search?q=a")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "[]");
}

#[tokio::test]
async fn test_unknown_poi_category_is_empty() {
    let response = app()
        .oneshot(get("/api/poi?category=casino&latitude=51.5&longitude=-0.12"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "[]");
}

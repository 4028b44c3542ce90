//! Chat endpoint
//!
//! Streams the assistant's reply in the data stream line protocol. Failures
//! before the stream starts answer 500 with a generic JSON body; failures
//! after that are reported in-stream.

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures::StreamExt;
use serde_json::json;
use shared::ChatRequest;
use std::convert::Infallible;

use crate::error::{AppError, AppResult};
use crate::services::stream::{DATA_STREAM_HEADER, DATA_STREAM_VERSION};
use crate::AppState;

/// Handle a chat request
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Response {
    match start_chat(&state, &body) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("Error in chat API: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal Server Error" })),
            )
                .into_response()
        }
    }
}

fn start_chat(state: &AppState, body: &[u8]) -> AppResult<Response> {
    let request: ChatRequest = serde_json::from_slice(body)
        .map_err(|e| AppError::ValidationError(format!("Invalid chat request: {}", e)))?;
    let prepared = state.chat.prepare(request)?;

    let lines = state
        .chat
        .spawn(prepared)
        .map(|line| Ok::<_, Infallible>(Bytes::from(line)));

    Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "text/plain; charset=utf-8")
        .header(DATA_STREAM_HEADER, DATA_STREAM_VERSION)
        .body(Body::from_stream(lines))
        .map_err(|e| AppError::Internal(format!("Failed to build chat response: {}", e)))
}

//! Gemini `generateContent` provider
//!
//! API reference: https://ai.google.dev/api/generate-content

use async_trait::async_trait;
use reqwest::{Client, Request};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::config::LlmConfig;
use crate::error::{AppError, AppResult};
use crate::services::llm::{
    FinishReason, LanguageModel, ModelMessage, ModelRequest, ModelResponse, ToolCall, ToolSpec,
    Usage,
};

/// Gemini model bound to one model id
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

impl GeminiClient {
    pub fn new(client: Client, config: &LlmConfig, model: &str) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: model.to_string(),
        }
    }

    /// Build the POST without sending it
    pub fn build_request(&self, request: &ModelRequest) -> AppResult<Request> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        self.client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body(request))
            .build()
            .map_err(|e| AppError::Internal(format!("Invalid Gemini request: {}", e)))
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: &ModelRequest) -> AppResult<ModelResponse> {
        if self.api_key.is_empty() {
            return Err(AppError::Configuration("llm.api_key is not set".to_string()));
        }

        let http_request = self.build_request(request)?;
        let response = self
            .client
            .execute(http_request)
            .await
            .map_err(|e| AppError::LanguageModel(format!("Gemini request failed: {}", e)))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::LanguageModel(format!("Failed to parse Gemini response: {}", e)))?;

        if !status.is_success() {
            let message = body["error"]["message"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string();
            return Err(AppError::LanguageModel(format!(
                "Gemini returned {}: {}",
                status.as_u16(),
                message
            )));
        }

        parse_response(body)
    }
}

/// Translate a provider-neutral request into a `generateContent` body
pub fn request_body(request: &ModelRequest) -> Value {
    let contents: Vec<Value> = request.messages.iter().map(content_for).collect();

    let mut body = json!({
        "systemInstruction": { "parts": [{ "text": request.system }] },
        "contents": contents,
    });

    if !request.tools.is_empty() {
        let declarations: Vec<Value> = request.tools.iter().map(function_declaration).collect();
        body["tools"] = json!([{ "functionDeclarations": declarations }]);
    }

    body
}

fn content_for(message: &ModelMessage) -> Value {
    match message {
        ModelMessage::User(segments) => {
            let parts: Vec<Value> = segments.iter().map(|text| json!({ "text": text })).collect();
            json!({ "role": "user", "parts": parts })
        }
        ModelMessage::Assistant { text, tool_calls } => {
            let mut parts = Vec::new();
            if !text.is_empty() {
                parts.push(json!({ "text": text }));
            }
            parts.extend(tool_calls.iter().map(|call| {
                json!({ "functionCall": { "name": call.name, "args": call.args } })
            }));
            json!({ "role": "model", "parts": parts })
        }
        ModelMessage::ToolResults(results) => {
            let parts: Vec<Value> = results
                .iter()
                .map(|result| {
                    json!({
                        "functionResponse": {
                            "name": result.name,
                            "response": response_object(&result.result),
                        }
                    })
                })
                .collect();
            json!({ "role": "user", "parts": parts })
        }
    }
}

/// `functionResponse.response` must be an object
fn response_object(result: &Value) -> Value {
    match result {
        Value::Object(_) => result.clone(),
        other => json!({ "result": other }),
    }
}

fn function_declaration(tool: &ToolSpec) -> Value {
    json!({
        "name": tool.name,
        "description": tool.description,
        "parameters": strip_unsupported_keywords(&tool.parameters),
    })
}

/// Gemini's OpenAPI subset rejects `default` and `additionalProperties`
fn strip_unsupported_keywords(schema: &Value) -> Value {
    match schema {
        Value::Object(map) => {
            let cleaned: Map<String, Value> = map
                .iter()
                .filter(|(key, _)| key.as_str() != "default" && key.as_str() != "additionalProperties")
                .map(|(key, value)| (key.clone(), strip_unsupported_keywords(value)))
                .collect();
            Value::Object(cleaned)
        }
        Value::Array(items) => Value::Array(items.iter().map(strip_unsupported_keywords).collect()),
        other => other.clone(),
    }
}

/// Read the first candidate of a `generateContent` response
pub fn parse_response(body: Value) -> AppResult<ModelResponse> {
    let parsed: GenerateContentResponse = serde_json::from_value(body)
        .map_err(|e| AppError::LanguageModel(format!("Unexpected Gemini response: {}", e)))?;

    let usage = parsed
        .usage_metadata
        .map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
        })
        .unwrap_or_default();

    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| AppError::LanguageModel("Gemini returned no candidates".to_string()))?;

    let mut text = String::new();
    let mut tool_calls = Vec::new();
    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if let Some(t) = part.get("text").and_then(Value::as_str) {
            text.push_str(t);
        }
        if let Some(call) = part.get("functionCall") {
            let name = call["name"].as_str().unwrap_or_default().to_string();
            let args = call.get("args").cloned().unwrap_or_else(|| json!({}));
            tool_calls.push(ToolCall {
                id: Uuid::new_v4().to_string(),
                name,
                args,
            });
        }
    }

    let finish_reason = if !tool_calls.is_empty() {
        FinishReason::ToolCalls
    } else {
        match candidate.finish_reason.as_deref() {
            Some("STOP") | None => FinishReason::Stop,
            Some("MAX_TOKENS") => FinishReason::Length,
            Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") => FinishReason::ContentFilter,
            Some(_) => FinishReason::Other,
        }
    };

    Ok(ModelResponse {
        text,
        tool_calls,
        finish_reason,
        usage,
    })
}

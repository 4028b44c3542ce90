//! Language model abstraction
//!
//! The chat orchestrator talks to a [`LanguageModel`]; providers translate
//! [`ModelRequest`] into their own wire format. Models are looked up by alias
//! in a [`ModelRegistry`].

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::config::LlmConfig;
use crate::error::{AppError, AppResult};
use crate::external::GeminiClient;

pub const CHAT_MODEL_SMALL: &str = "chat-model-small";
pub const CHAT_MODEL_LARGE: &str = "chat-model-large";
pub const TITLE_MODEL: &str = "title-model";
pub const ARTIFACT_MODEL: &str = "artifact-model";

/// Tool declaration handed to the model
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object
    pub parameters: Value,
}

/// A tool invocation requested by the model
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    #[serde(rename = "toolCallId")]
    pub id: String,
    #[serde(rename = "toolName")]
    pub name: String,
    pub args: Value,
}

/// Outcome of a tool invocation, fed back to the model
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    pub call_id: String,
    pub name: String,
    pub result: Value,
}

/// Provider-neutral conversation entry
#[derive(Debug, Clone, PartialEq)]
pub enum ModelMessage {
    /// One text part per segment
    User(Vec<String>),
    Assistant {
        text: String,
        tool_calls: Vec<ToolCall>,
    },
    ToolResults(Vec<ToolResult>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    pub system: String,
    pub messages: Vec<ModelMessage>,
    pub tools: Vec<ToolSpec>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FinishReason {
    #[default]
    Stop,
    ToolCalls,
    Length,
    ContentFilter,
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
}

/// One model step
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModelResponse {
    pub text: String,
    pub tool_calls: Vec<ToolCall>,
    pub finish_reason: FinishReason,
    pub usage: Usage,
}

impl ModelResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            finish_reason: FinishReason::ToolCalls,
            ..Self::default()
        }
    }
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    fn model_id(&self) -> &str;

    async fn generate(&self, request: &ModelRequest) -> AppResult<ModelResponse>;
}

/// Alias to model lookup
#[derive(Clone, Default)]
pub struct ModelRegistry {
    models: HashMap<String, Arc<dyn LanguageModel>>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gemini models for every alias
    pub fn from_config(config: &LlmConfig, client: reqwest::Client) -> Self {
        let small: Arc<dyn LanguageModel> =
            Arc::new(GeminiClient::new(client.clone(), config, &config.chat_model));
        let large: Arc<dyn LanguageModel> =
            Arc::new(GeminiClient::new(client, config, &config.large_model));

        Self::new()
            .with(CHAT_MODEL_SMALL, small.clone())
            .with(CHAT_MODEL_LARGE, large)
            .with(TITLE_MODEL, small.clone())
            .with(ARTIFACT_MODEL, small)
    }

    pub fn with(mut self, alias: &str, model: Arc<dyn LanguageModel>) -> Self {
        self.register(alias, model);
        self
    }

    pub fn register(&mut self, alias: &str, model: Arc<dyn LanguageModel>) {
        self.models.insert(alias.to_string(), model);
    }

    pub fn get(&self, alias: &str) -> AppResult<Arc<dyn LanguageModel>> {
        self.models.get(alias).cloned().ok_or_else(|| {
            AppError::Configuration(format!("No language model registered as {}", alias))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_registry_aliases() {
        let config = Config::defaults().unwrap();
        let registry = ModelRegistry::from_config(&config.llm, reqwest::Client::new());
        assert_eq!(
            registry.get(CHAT_MODEL_SMALL).unwrap().model_id(),
            "gemini-1.5-flash-002"
        );
        assert_eq!(
            registry.get(CHAT_MODEL_LARGE).unwrap().model_id(),
            "gemini-1.5-pro-002"
        );
        assert_eq!(
            registry.get(TITLE_MODEL).unwrap().model_id(),
            "gemini-1.5-flash-002"
        );
        assert!(registry.get("missing").is_err());
    }

    #[test]
    fn test_tool_call_wire_names() {
        let call = ToolCall {
            id: "call-1".into(),
            name: "getPOI".into(),
            args: serde_json::json!({"latitude": 1.0}),
        };
        let value = serde_json::to_value(&call).unwrap();
        assert_eq!(value["toolCallId"], "call-1");
        assert_eq!(value["toolName"], "getPOI");
    }

    #[test]
    fn test_finish_reason_wire() {
        assert_eq!(
            serde_json::to_value(FinishReason::ToolCalls).unwrap(),
            "tool-calls"
        );
    }
}

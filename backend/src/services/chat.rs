//! Chat orchestration
//!
//! A chat run alternates model steps and tool execution until the model
//! answers without tool calls or the step cap is reached. Every event is
//! encoded as a data stream line and pushed into a bounded channel; when the
//! client goes away the channel closes and the run stops.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use shared::{ChatMessage, ChatRequest, ChatRole, MessagePart};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

use super::llm::{
    FinishReason, LanguageModel, ModelMessage, ModelRegistry, ModelRequest, ToolCall, ToolResult,
    Usage, CHAT_MODEL_SMALL,
};
use super::prompts::system_prompt;
use super::stream::{split_words, StreamPart, STREAM_ERROR_MESSAGE};
use crate::error::AppResult;
use crate::tools::ToolRegistry;

const CHANNEL_CAPACITY: usize = 64;

/// Chat orchestration service
#[derive(Clone)]
pub struct ChatService {
    models: ModelRegistry,
    tools: ToolRegistry,
    max_steps: usize,
}

/// A validated chat run, ready to stream
pub struct PreparedChat {
    model: Arc<dyn LanguageModel>,
    request: ModelRequest,
}

impl PreparedChat {
    pub fn system_prompt(&self) -> &str {
        &self.request.system
    }

    pub fn messages(&self) -> &[ModelMessage] {
        &self.request.messages
    }
}

/// The receiving side hung up
#[derive(Debug)]
struct Disconnected;

impl ChatService {
    pub fn new(models: ModelRegistry, tools: ToolRegistry, max_steps: usize) -> Self {
        Self {
            models,
            tools,
            max_steps: max_steps.max(1),
        }
    }

    /// Resolve the model and assemble the prompt and history
    pub fn prepare(&self, request: ChatRequest) -> AppResult<PreparedChat> {
        let model = self.models.get(CHAT_MODEL_SMALL)?;
        let system = system_prompt(Utc::now(), request.user_position);
        tracing::debug!("System Prompt: {}", system);

        Ok(PreparedChat {
            model,
            request: ModelRequest {
                system,
                messages: to_model_messages(&request.messages),
                tools: self.tools.specs(),
            },
        })
    }

    /// Run the chat in a background task and return its encoded lines
    pub fn spawn(&self, prepared: PreparedChat) -> ReceiverStream<String> {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let tools = self.tools.clone();
        let max_steps = self.max_steps;

        tokio::spawn(async move {
            if run(prepared, tools, max_steps, &tx).await.is_err() {
                tracing::info!("Chat stream closed by client");
            }
        });

        ReceiverStream::new(rx)
    }
}

async fn send(tx: &mpsc::Sender<String>, part: StreamPart) -> Result<(), Disconnected> {
    tx.send(part.encode()).await.map_err(|_| Disconnected)
}

async fn run(
    prepared: PreparedChat,
    tools: ToolRegistry,
    max_steps: usize,
    tx: &mpsc::Sender<String>,
) -> Result<(), Disconnected> {
    let PreparedChat { model, mut request } = prepared;

    send(
        tx,
        StreamPart::Start {
            message_id: Uuid::new_v4().to_string(),
        },
    )
    .await?;

    let mut final_text = String::new();
    let mut finish_reason = FinishReason::Stop;
    let mut total = Usage::default();

    for step in 0..max_steps {
        if tx.is_closed() {
            return Err(Disconnected);
        }

        let response = match model.generate(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Error in chat stream: {}", e);
                return send(tx, StreamPart::Error(STREAM_ERROR_MESSAGE.to_string())).await;
            }
        };

        for chunk in split_words(&response.text) {
            send(tx, StreamPart::Text(chunk.to_string())).await?;
        }

        let has_tool_calls = !response.tool_calls.is_empty();
        let is_continued = has_tool_calls && step + 1 < max_steps;

        if has_tool_calls {
            let results = execute_tools(&tools, &response.tool_calls, tx).await?;
            request.messages.push(ModelMessage::Assistant {
                text: response.text.clone(),
                tool_calls: response.tool_calls.clone(),
            });
            request.messages.push(ModelMessage::ToolResults(results));
        }

        send(
            tx,
            StreamPart::StepFinish {
                finish_reason: response.finish_reason,
                usage: response.usage,
                is_continued,
            },
        )
        .await?;

        total.prompt_tokens += response.usage.prompt_tokens;
        total.completion_tokens += response.usage.completion_tokens;
        finish_reason = response.finish_reason;
        if !response.text.is_empty() {
            final_text = response.text;
        }

        if !is_continued {
            break;
        }
    }

    tracing::info!("Response: {}", final_text);
    send(
        tx,
        StreamPart::Finish {
            finish_reason,
            usage: total,
        },
    )
    .await
}

/// Run each call in order; failures become `{"error": ...}` results
async fn execute_tools(
    tools: &ToolRegistry,
    calls: &[ToolCall],
    tx: &mpsc::Sender<String>,
) -> Result<Vec<ToolResult>, Disconnected> {
    let mut results = Vec::with_capacity(calls.len());

    for call in calls {
        send(tx, StreamPart::ToolCall(call.clone())).await?;

        let result = match tools.execute(&call.name, call.args.clone()).await {
            Ok(value) => value,
            Err(e) => json!({ "error": e.to_string() }),
        };

        send(
            tx,
            StreamPart::ToolResult {
                tool_call_id: call.id.clone(),
                result: result.clone(),
            },
        )
        .await?;

        results.push(ToolResult {
            call_id: call.id.clone(),
            name: call.name.clone(),
            result,
        });
    }

    Ok(results)
}

/// Convert client history into provider-neutral messages.
///
/// User messages carry their coordinate attachments as an extra text part.
/// Completed tool invocations on assistant messages are replayed as a call
/// followed by its result.
pub fn to_model_messages(messages: &[ChatMessage]) -> Vec<ModelMessage> {
    let mut out = Vec::with_capacity(messages.len());

    for message in messages {
        match message.role {
            ChatRole::User => {
                let segments = message.text_segments();
                if !segments.is_empty() {
                    out.push(ModelMessage::User(segments));
                }
            }
            ChatRole::Assistant => out.extend(assistant_messages(message)),
            ChatRole::System | ChatRole::Tool => {
                tracing::debug!(role = ?message.role, "Skipping message with unsupported role");
            }
        }
    }

    out
}

fn assistant_messages(message: &ChatMessage) -> Vec<ModelMessage> {
    let mut calls = Vec::new();
    let mut results = Vec::new();

    for part in message.parts.iter().flatten() {
        let MessagePart::ToolInvocation { tool_invocation } = part else {
            continue;
        };
        let (Some(id), Some(name), Some(result)) = (
            tool_invocation.get("toolCallId").and_then(Value::as_str),
            tool_invocation.get("toolName").and_then(Value::as_str),
            tool_invocation.get("result"),
        ) else {
            continue;
        };
        calls.push(ToolCall {
            id: id.to_string(),
            name: name.to_string(),
            args: tool_invocation.get("args").cloned().unwrap_or_else(|| json!({})),
        });
        results.push(ToolResult {
            call_id: id.to_string(),
            name: name.to_string(),
            result: result.clone(),
        });
    }

    let mut out = Vec::new();
    if !calls.is_empty() {
        out.push(ModelMessage::Assistant {
            text: String::new(),
            tool_calls: calls,
        });
        out.push(ModelMessage::ToolResults(results));
    }

    let text = message.text_segments().join("\n");
    if !text.is_empty() {
        out.push(ModelMessage::Assistant {
            text,
            tool_calls: Vec::new(),
        });
    }
    out
}

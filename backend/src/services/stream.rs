//! Data stream line protocol
//!
//! Each part is one line: a type code, a colon and a JSON value. Clients
//! that understand the `x-vercel-ai-data-stream: v1` header render text
//! deltas, tool calls and tool results as they arrive.

use serde_json::{json, Value};

use super::llm::{FinishReason, ToolCall, Usage};

pub const DATA_STREAM_HEADER: &str = "x-vercel-ai-data-stream";
pub const DATA_STREAM_VERSION: &str = "v1";

/// Text sent when a chat run fails after streaming started
pub const STREAM_ERROR_MESSAGE: &str =
    "Sorry, there was an error processing your request. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum StreamPart {
    Start {
        message_id: String,
    },
    Text(String),
    ToolCall(ToolCall),
    ToolResult {
        tool_call_id: String,
        result: Value,
    },
    StepFinish {
        finish_reason: FinishReason,
        usage: Usage,
        is_continued: bool,
    },
    Finish {
        finish_reason: FinishReason,
        usage: Usage,
    },
    Error(String),
}

impl StreamPart {
    pub fn code(&self) -> char {
        match self {
            StreamPart::Start { .. } => 'f',
            StreamPart::Text(_) => '0',
            StreamPart::ToolCall(_) => '9',
            StreamPart::ToolResult { .. } => 'a',
            StreamPart::StepFinish { .. } => 'e',
            StreamPart::Finish { .. } => 'd',
            StreamPart::Error(_) => '3',
        }
    }

    fn payload(&self) -> Value {
        match self {
            StreamPart::Start { message_id } => json!({ "messageId": message_id }),
            StreamPart::Text(text) => json!(text),
            StreamPart::ToolCall(call) => json!(call),
            StreamPart::ToolResult {
                tool_call_id,
                result,
            } => json!({ "toolCallId": tool_call_id, "result": result }),
            StreamPart::StepFinish {
                finish_reason,
                usage,
                is_continued,
            } => json!({
                "finishReason": finish_reason,
                "usage": usage,
                "isContinued": is_continued,
            }),
            StreamPart::Finish {
                finish_reason,
                usage,
            } => json!({ "finishReason": finish_reason, "usage": usage }),
            StreamPart::Error(message) => json!(message),
        }
    }

    /// `{code}:{json}\n`
    pub fn encode(&self) -> String {
        format!("{}:{}\n", self.code(), self.payload())
    }
}

/// Split text into word chunks, each word keeping its trailing whitespace.
///
/// Leading whitespace stays with the first chunk; concatenating the chunks
/// yields the input.
pub fn split_words(text: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut start = 0;
    let mut seen_word = false;
    let mut in_space = false;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            in_space = seen_word;
        } else {
            if in_space {
                chunks.push(&text[start..i]);
                start = i;
                in_space = false;
            }
            seen_word = true;
        }
    }
    if start < text.len() {
        chunks.push(&text[start..]);
    }
    chunks
}

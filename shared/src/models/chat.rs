//! Chat message models

use serde::{Deserialize, Serialize};

use crate::types::Coordinate;

/// Author of a chat message
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    System,
    Tool,
}

/// A structured fragment of a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MessagePart {
    Text {
        text: String,
    },
    Reasoning {
        reasoning: String,
    },
    ToolInvocation {
        #[serde(rename = "toolInvocation")]
        tool_invocation: serde_json::Value,
    },
    /// Any other part type. Its payload is dropped on deserialization.
    #[serde(other)]
    Unsupported,
}

/// A message in the conversation history.
///
/// Coordinate attachments travel as their own field; they are only rendered
/// into text when the message is handed to the language model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub role: ChatRole,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parts: Option<Vec<MessagePart>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub coordinate_attachments: Vec<Coordinate>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: None,
            role: ChatRole::User,
            content: content.into(),
            parts: None,
            coordinate_attachments: Vec::new(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            ..Self::user(content)
        }
    }

    pub fn with_attachments(mut self, attachments: Vec<Coordinate>) -> Self {
        self.coordinate_attachments = attachments;
        self
    }

    /// One line per attachment: `Coordinate {n}: Latitude {lat}, Longitude {lon}`
    pub fn attachment_text(&self) -> Option<String> {
        if self.coordinate_attachments.is_empty() {
            return None;
        }
        let lines: Vec<String> = self
            .coordinate_attachments
            .iter()
            .enumerate()
            .map(|(index, coordinate)| format!("Coordinate {}: {}", index + 1, coordinate))
            .collect();
        Some(lines.join("\n"))
    }

    /// Text segments handed to the model for this message, attachments last
    pub fn text_segments(&self) -> Vec<String> {
        let mut segments = Vec::new();
        if !self.content.is_empty() {
            segments.push(self.content.clone());
        } else if let Some(parts) = &self.parts {
            segments.extend(parts.iter().filter_map(|part| match part {
                MessagePart::Text { text } if !text.is_empty() => Some(text.clone()),
                _ => None,
            }));
        }
        if self.role == ChatRole::User {
            if let Some(text) = self.attachment_text() {
                segments.push(text);
            }
        }
        segments
    }
}

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub user_position: Option<Coordinate>,
}

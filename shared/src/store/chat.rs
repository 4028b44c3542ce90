use super::{Observable, SubscriptionId};
use crate::models::chat::{ChatMessage, ChatRequest};
use crate::types::Coordinate;

/// Coordinates waiting to go out with the next chat message
#[derive(Debug, Default)]
pub struct ChatStore {
    inner: Observable<Vec<Coordinate>>,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn coordinate_attachments(&self) -> &[Coordinate] {
        self.inner.get()
    }

    pub fn subscribe(&mut self, listener: impl Fn(&Vec<Coordinate>) + 'static) -> SubscriptionId {
        self.inner.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.inner.unsubscribe(id)
    }

    pub fn add_coordinate_attachment(&mut self, coordinate: Coordinate) {
        self.inner.update(|list| list.push(coordinate));
    }

    /// Out-of-range indices are ignored
    pub fn remove_coordinate_attachment(&mut self, index: usize) {
        if index < self.inner.get().len() {
            self.inner.update(|list| {
                list.remove(index);
            });
        }
    }

    pub fn clear_coordinate_attachments(&mut self) {
        self.inner.update(|list| list.clear());
    }

    /// Build the next user message, moving pending attachments onto it
    pub fn compose_message(&mut self, content: impl Into<String>) -> ChatMessage {
        let attachments = self.inner.get().clone();
        if !attachments.is_empty() {
            self.clear_coordinate_attachments();
        }
        ChatMessage::user(content).with_attachments(attachments)
    }

    /// Append a composed message to the history and wrap it for `POST /api/chat`
    pub fn build_request(
        &mut self,
        history: &[ChatMessage],
        content: impl Into<String>,
        user_position: Option<Coordinate>,
    ) -> ChatRequest {
        let mut messages = history.to_vec();
        messages.push(self.compose_message(content));
        ChatRequest {
            messages,
            user_position,
        }
    }
}

//! Hosted chat model collaborator.

use std::collections::VecDeque;
use std::future::Future;

use interlink_core::types::ContentPart;

use crate::error::ModelError;

/// A stateful multi-turn conversation with the model.
///
/// Implementations keep their own context; callers only append messages.
pub trait ChatModel: Send {
    /// Send one user message and wait for the complete reply text.
    fn send_message(
        &mut self,
        parts: Vec<ContentPart>,
    ) -> impl Future<Output = Result<String, ModelError>> + Send;
}

/// Scripted model for tests. Replies are served in order, then the default.
#[derive(Debug)]
pub struct MockChatModel {
    scripted: VecDeque<Result<String, ModelError>>,
    default_reply: String,
    received: Vec<Vec<ContentPart>>,
}

impl MockChatModel {
    /// Replies `[mock reply]` to everything.
    pub fn new() -> Self {
        Self::with_reply("[mock reply]")
    }

    pub fn with_reply(reply: &str) -> Self {
        Self {
            scripted: VecDeque::new(),
            default_reply: reply.to_string(),
            received: Vec::new(),
        }
    }

    pub fn push_reply(&mut self, reply: &str) -> &mut Self {
        self.scripted.push_back(Ok(reply.to_string()));
        self
    }

    pub fn push_error(&mut self, error: ModelError) -> &mut Self {
        self.scripted.push_back(Err(error));
        self
    }

    /// Part lists received so far, one entry per call.
    pub fn received(&self) -> &[Vec<ContentPart>] {
        &self.received
    }

    pub fn calls(&self) -> usize {
        self.received.len()
    }
}

impl Default for MockChatModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatModel for MockChatModel {
    async fn send_message(&mut self, parts: Vec<ContentPart>) -> Result<String, ModelError> {
        tracing::debug!(parts = parts.len(), "Mock model received message");
        self.received.push(parts);
        match self.scripted.pop_front() {
            Some(outcome) => outcome,
            None => Ok(self.default_reply.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_default_reply() {
        let mut model = MockChatModel::new();
        let reply = model
            .send_message(vec![ContentPart::text("hi")])
            .await
            .unwrap();
        assert_eq!(reply, "[mock reply]");
        assert_eq!(model.calls(), 1);
        assert_eq!(model.received()[0], vec![ContentPart::text("hi")]);
    }

    #[tokio::test]
    async fn test_mock_scripted_then_default() {
        let mut model = MockChatModel::with_reply("fallback");
        model
            .push_reply("first")
            .push_error(ModelError::RateLimited("quota".into()));

        assert_eq!(model.send_message(vec![]).await.unwrap(), "first");
        assert_eq!(
            model.send_message(vec![]).await.unwrap_err(),
            ModelError::RateLimited("quota".into())
        );
        assert_eq!(model.send_message(vec![]).await.unwrap(), "fallback");
        assert_eq!(model.calls(), 3);
    }
}

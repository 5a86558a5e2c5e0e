//! Scripted brain implementation - replays canned outputs in order.

use std::collections::VecDeque;

use async_trait::async_trait;
use brain_core::{Brain, BrainError, GenerationRequest};
use tokio::sync::Mutex;

/// A brain that returns queued outputs in order.
///
/// Every request is recorded so tests can assert on the prompts that were
/// sent. Once the queue is empty the brain answers with its exhausted
/// response, or fails when none is configured.
#[derive(Debug, Default)]
pub struct ScriptedBrain {
    queue: Mutex<VecDeque<Result<String, String>>>,
    exhausted: Option<String>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedBrain {
    /// Create a brain that replays the given outputs.
    pub fn new<I, S>(outputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: Mutex::new(outputs.into_iter().map(|s| Ok(s.into())).collect()),
            exhausted: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer with `text` once the queue runs dry.
    pub fn repeat_when_exhausted(mut self, text: impl Into<String>) -> Self {
        self.exhausted = Some(text.into());
        self
    }

    /// Queue an additional output.
    pub async fn push(&self, text: impl Into<String>) {
        self.queue.lock().await.push_back(Ok(text.into()));
    }

    /// Queue a provider failure.
    pub async fn push_error(&self, message: impl Into<String>) {
        self.queue.lock().await.push_back(Err(message.into()));
    }

    /// Requests received so far.
    pub async fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of generate calls so far.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

#[async_trait]
impl Brain for ScriptedBrain {
    async fn generate(&self, request: GenerationRequest) -> Result<String, BrainError> {
        self.requests.lock().await.push(request);

        match self.queue.lock().await.pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(BrainError::ProcessingFailed(message)),
            None => self
                .exhausted
                .clone()
                .ok_or_else(|| BrainError::Unavailable("script exhausted".to_string())),
        }
    }

    fn name(&self) -> &str {
        "ScriptedBrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order() {
        let brain = ScriptedBrain::new(["a", "b"]);

        assert_eq!(brain.generate(GenerationRequest::new("1")).await.unwrap(), "a");
        assert_eq!(brain.generate(GenerationRequest::new("2")).await.unwrap(), "b");
        assert!(matches!(
            brain.generate(GenerationRequest::new("3")).await,
            Err(BrainError::Unavailable(_))
        ));

        let prompts: Vec<String> = brain
            .requests()
            .await
            .into_iter()
            .map(|r| r.instruction)
            .collect();
        assert_eq!(prompts, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_repeat_when_exhausted() {
        let brain = ScriptedBrain::new(Vec::<String>::new()).repeat_when_exhausted("again");

        assert_eq!(brain.generate(GenerationRequest::new("x")).await.unwrap(), "again");
        assert_eq!(brain.generate(GenerationRequest::new("y")).await.unwrap(), "again");
        assert_eq!(brain.call_count().await, 2);
    }

    #[tokio::test]
    async fn test_queued_error() {
        let brain = ScriptedBrain::new(["ok"]);
        brain.push_error("quota exceeded").await;

        assert!(brain.generate(GenerationRequest::new("1")).await.is_ok());
        assert!(matches!(
            brain.generate(GenerationRequest::new("2")).await,
            Err(BrainError::ProcessingFailed(msg)) if msg == "quota exceeded"
        ));
    }
}

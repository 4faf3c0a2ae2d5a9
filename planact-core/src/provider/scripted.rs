//! Scripted provider - a deterministic offline stand-in for the oracle
//!
//! Replays a fixed sequence of canned responses: the first call gets the
//! first response, the second call the second, and so on; once the script
//! is exhausted the last response repeats. Useful for demos without an API
//! key and as the oracle mock in tests - note that plan filtering still
//! applies to scripted output, exactly as it does to real model output.

use super::*;
use std::sync::Mutex;

/// Deterministic provider replaying canned responses
pub struct ScriptedProvider {
    responses: Vec<String>,
    cursor: Mutex<usize>,
    fail_with: Option<String>,
}

impl ScriptedProvider {
    /// Create a provider replaying `responses` in order, repeating the last
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses,
            cursor: Mutex::new(0),
            fail_with: None,
        }
    }

    /// Convenience constructor from string slices
    pub fn from_lines(responses: &[&str]) -> Self {
        Self::new(responses.iter().map(|s| s.to_string()).collect())
    }

    /// A provider whose every call fails with a network error.
    ///
    /// Exercises the fail-soft path without touching the network.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            responses: Vec::new(),
            cursor: Mutex::new(0),
            fail_with: Some(message.into()),
        }
    }

    /// How many completions have been served so far
    pub fn calls(&self) -> usize {
        *self.cursor.lock().expect("cursor lock poisoned")
    }
}

impl LlmProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    fn models(&self) -> Vec<String> {
        vec!["scripted-echo".into()]
    }

    fn default_model(&self) -> &str {
        "scripted-echo"
    }

    async fn complete(
        &self,
        _request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let mut cursor = self.cursor.lock().expect("cursor lock poisoned");
        let call = *cursor;
        *cursor += 1;
        drop(cursor);

        if let Some(message) = &self.fail_with {
            return Err(ProviderError::Network(message.clone()));
        }

        let content = match self.responses.get(call).or_else(|| self.responses.last()) {
            Some(response) => response.clone(),
            None => return Err(ProviderError::Other("script is empty".into())),
        };

        Ok(CompletionResponse {
            id: format!("scripted-{}", call),
            model: "scripted-echo".into(),
            content: Some(content),
            finish_reason: FinishReason::Stop,
            usage: Usage::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CompletionRequest {
        CompletionRequest::new(vec![ChatMessage::user("plan")])
    }

    #[tokio::test]
    async fn test_replays_in_order_then_repeats_last() {
        let provider =
            ScriptedProvider::from_lines(&["1. clean the room", "1. do nothing"]);

        let first = provider.complete(request()).await.unwrap();
        assert_eq!(first.content.as_deref(), Some("1. clean the room"));

        let second = provider.complete(request()).await.unwrap();
        assert_eq!(second.content.as_deref(), Some("1. do nothing"));

        let third = provider.complete(request()).await.unwrap();
        assert_eq!(third.content.as_deref(), Some("1. do nothing"));

        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_failing_provider_always_errors() {
        let provider = ScriptedProvider::failing("connection refused");
        let err = provider.complete(request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)));
    }

    #[tokio::test]
    async fn test_empty_script_errors() {
        let provider = ScriptedProvider::new(Vec::new());
        let err = provider.complete(request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Other(_)));
    }

    #[tokio::test]
    async fn test_prompt_helper() {
        let provider = ScriptedProvider::from_lines(&["do nothing"]);
        let text = provider.prompt("what now?").await.unwrap();
        assert_eq!(text, "do nothing");
    }
}

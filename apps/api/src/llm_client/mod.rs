/// LLM Client: the single point of entry for all inference endpoint calls.
///
/// ARCHITECTURAL RULE: No other module may call the inference endpoint directly.
/// All LLM interactions MUST go through `InferenceClient`.
///
/// Calls are unary request/response with no retry; the only timeout is the
/// HTTP client's.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

pub mod json_recovery;
pub mod prompts;

const MAX_TOKENS: u32 = 1024;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// A single role-tagged message sent to the inference endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system",
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user",
            content: content.into(),
        }
    }
}

/// The inference endpoint seen as an opaque black box: messages in, text out.
///
/// Carried in `AppState` as `Arc<dyn InferenceClient>` so tests can swap in a
/// scripted backend.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn run(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct RunRequest<'a> {
    messages: &'a [ChatMessage],
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct RunResponse {
    #[serde(default)]
    result: Value,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    #[serde(default)]
    errors: Vec<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Workers AI REST client: `POST {base}/accounts/{account}/ai/run/{model}`.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    account_id: String,
    api_token: String,
    model: String,
}

impl LlmClient {
    pub fn new(
        base_url: String,
        account_id: String,
        api_token: String,
        model: String,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            account_id,
            api_token,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn run_url(&self) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.base_url, self.account_id, self.model
        )
    }
}

#[async_trait]
impl InferenceClient for LlmClient {
    async fn run(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let request_body = RunRequest {
            messages,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .client
            .post(self.run_url())
            .bearer_auth(&self.api_token)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .ok()
                .and_then(|e| e.errors.into_iter().next())
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: RunResponse = response.json().await?;
        let text = extract_generated_text(&body.result).ok_or(LlmError::EmptyContent)?;

        debug!(
            "LLM call succeeded: model={}, output_chars={}",
            self.model,
            text.len()
        );

        Ok(text)
    }
}

/// Reads the generated text out of an inference result, which is either a bare
/// string or an object exposing it under `response`, `text` or `content`.
/// Any other non-null shape is returned serialized so JSON recovery can still
/// have a go at it.
pub fn extract_generated_text(result: &Value) -> Option<String> {
    match result {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => ["response", "text", "content"]
            .iter()
            .find_map(|field| map.get(*field).and_then(Value::as_str))
            .map(str::to_string)
            .or_else(|| Some(result.to_string())),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_text_from_bare_string() {
        let result = json!("{\"rating\": \"good\"}");
        assert_eq!(
            extract_generated_text(&result).as_deref(),
            Some("{\"rating\": \"good\"}")
        );
    }

    #[test]
    fn test_extract_text_prefers_response_field() {
        let result = json!({"response": "hello", "text": "ignored"});
        assert_eq!(extract_generated_text(&result).as_deref(), Some("hello"));
    }

    #[test]
    fn test_extract_text_falls_back_to_text_then_content() {
        assert_eq!(
            extract_generated_text(&json!({"text": "a"})).as_deref(),
            Some("a")
        );
        assert_eq!(
            extract_generated_text(&json!({"content": "b"})).as_deref(),
            Some("b")
        );
    }

    #[test]
    fn test_extract_text_serializes_unknown_object() {
        let result = json!({"usage": {"prompt_tokens": 3}});
        let text = extract_generated_text(&result).unwrap();
        assert!(text.contains("prompt_tokens"));
    }

    #[test]
    fn test_extract_text_null_is_empty_content() {
        assert!(extract_generated_text(&Value::Null).is_none());
    }

    #[test]
    fn test_run_url_strips_trailing_slash() {
        let client = LlmClient::new(
            "https://api.example.com/client/v4/".to_string(),
            "acct".to_string(),
            "token".to_string(),
            "@cf/meta/llama-3.1-8b-instruct".to_string(),
        )
        .unwrap();
        assert_eq!(
            client.run_url(),
            "https://api.example.com/client/v4/accounts/acct/ai/run/@cf/meta/llama-3.1-8b-instruct"
        );
    }

    #[test]
    fn test_chat_message_serializes_role_and_content() {
        let value = serde_json::to_value(ChatMessage::user("hi")).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "hi"}));
    }
}

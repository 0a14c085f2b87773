// src/services/completion.rs
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 512;
// Provider error bodies can be large; keep operator logs bounded.
const MAX_LOGGED_BODY: usize = 512;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion API key is not configured")]
    MissingCredential,
    #[error("completion request timed out")]
    Timeout,
    #[error("failed to reach completion provider: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("completion provider returned status {status}: {body}")]
    Provider { status: StatusCode, body: String },
    #[error("malformed completion response: {0}")]
    Malformed(String),
}

/// The single outbound operation the rest of the app knows about. Implementors
/// own transport, serialization and provider details.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, CompletionError>;
}

/// Chat-completion client for an OpenAI-compatible API, built once at startup
/// and reused across requests.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: Option<String>,
    api_base: String,
    model: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<OutboundMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct OutboundMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            api_base: config.api_base.clone(),
            model: config.model.clone(),
        })
    }

    fn endpoint_url(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }

    async fn send_request(
        &self,
        api_key: &str,
        payload: &ChatCompletionRequest<'_>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        self.http
            .post(self.endpoint_url())
            .bearer_auth(api_key)
            .json(payload)
            .send()
            .await
    }
}

fn truncate_on_char_boundary(s: &mut String, max: usize) {
    if s.len() <= max {
        return;
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    s.truncate(cut);
}

fn map_transport_error(err: reqwest::Error) -> CompletionError {
    if err.is_timeout() {
        CompletionError::Timeout
    } else {
        CompletionError::Transport(err)
    }
}

fn extract_reply(completion: ChatCompletion) -> Result<String, CompletionError> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| CompletionError::Malformed("response contained no reply text".to_string()))
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<String, CompletionError> {
        // Checked before any network I/O.
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CompletionError::MissingCredential)?;

        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                OutboundMessage { role: "system", content: system_prompt },
                OutboundMessage { role: "user", content: user_message },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        // One bounded retry, and only for connect failures. Timeouts and
        // HTTP-level errors (auth included) are never retried.
        let response = match self.send_request(api_key, &payload).await {
            Ok(response) => response,
            Err(err) if err.is_connect() => {
                debug!("connect failure, retrying once");
                self.send_request(api_key, &payload)
                    .await
                    .map_err(map_transport_error)?
            }
            Err(err) => return Err(map_transport_error(err)),
        };

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            truncate_on_char_boundary(&mut body, MAX_LOGGED_BODY);
            return Err(CompletionError::Provider { status, body });
        }

        let completion = response
            .json::<ChatCompletion>()
            .await
            .map_err(|err| CompletionError::Malformed(err.to_string()))?;

        extract_reply(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with(api_key: Option<&str>, api_base: &str) -> OpenAiClient {
        let config = Config {
            api_key: api_key.map(String::from),
            api_base: api_base.to_string(),
            ..Config::default()
        };
        OpenAiClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_network_io() {
        // Unroutable base URL: reaching it would fail loudly, proving the
        // credential check comes first.
        let client = client_with(None, "http://127.0.0.1:0");
        let err = client.complete("system", "user").await.unwrap_err();
        assert!(matches!(err, CompletionError::MissingCredential));
    }

    #[test]
    fn endpoint_url_handles_trailing_slash() {
        let client = client_with(Some("k"), "https://api.example.com/v1/");
        assert_eq!(client.endpoint_url(), "https://api.example.com/v1/chat/completions");

        let client = client_with(Some("k"), "https://api.example.com/v1");
        assert_eq!(client.endpoint_url(), "https://api.example.com/v1/chat/completions");
    }

    #[test]
    fn extracts_reply_from_first_choice() {
        let completion: ChatCompletion = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "  AI is like a smart helper...  "}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_reply(completion).unwrap(), "AI is like a smart helper...");
    }

    #[test]
    fn empty_choices_is_malformed() {
        let completion: ChatCompletion = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(
            extract_reply(completion),
            Err(CompletionError::Malformed(_))
        ));
    }

    #[test]
    fn null_content_is_malformed() {
        let completion: ChatCompletion =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(matches!(
            extract_reply(completion),
            Err(CompletionError::Malformed(_))
        ));
    }

    #[test]
    fn error_messages_never_contain_the_key() {
        let err = CompletionError::Provider {
            status: StatusCode::UNAUTHORIZED,
            body: "invalid api key".to_string(),
        };
        assert!(!err.to_string().contains("sk-"));
    }
}

//! Chat-completion model gateway.
//!
//! `ChatModel` is the port the pipeline calls; `OpenAiClient` adapts it
//! to an OpenAI-compatible `/chat/completions` endpoint, and
//! `MockChatModel` scripts replies for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config;

/// Errors from model invocation.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Cannot reach model API at {0}")]
    Connection(String),
    #[error("Model request timed out after {0}s")]
    Timeout(u64),
    #[error("Model API returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Invalid model response: {0}")]
    InvalidResponse(String),
}

/// One model invocation: a system instruction, an optional user turn,
/// and a sampling temperature. A JSON-object reply is requested on
/// every call.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub system: String,
    pub user: Option<String>,
    pub temperature: f32,
}

/// Port for the external chat-completion model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Run one completion and return the raw reply text.
    async fn generate(&self, request: &ModelRequest) -> Result<String, ModelError>;
}

/// OpenAI-compatible chat-completions client.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
    timeout_secs: u64,
}

impl OpenAiClient {
    pub fn new(base_url: &str, api_key: &str, model: &str, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
            timeout_secs,
        }
    }

    /// Client configured from the environment (see `config`).
    pub fn from_config() -> Self {
        Self::new(
            &config::model_base_url(),
            &config::model_api_key(),
            &config::model_name(),
            config::model_timeout_secs(),
        )
    }
}

/// Request body for `/chat/completions`
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatTurn<'a>>,
    response_format: ResponseFormat,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatTurn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

/// Response body from `/chat/completions`
#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn generate(&self, request: &ModelRequest) -> Result<String, ModelError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut messages = vec![ChatTurn {
            role: "system",
            content: &request.system,
        }];
        if let Some(user) = &request.user {
            messages.push(ChatTurn {
                role: "user",
                content: user,
            });
        }

        let body = ChatCompletionRequest {
            model: &self.model,
            messages,
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ModelError::Connection(self.base_url.clone())
                } else if e.is_timeout() {
                    ModelError::Timeout(self.timeout_secs)
                } else {
                    ModelError::InvalidResponse(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ModelError::InvalidResponse("Completion contained no choices".into()))
    }
}

/// Scripted model for tests.
///
/// Replies are popped in order; once the script is drained the fallback
/// behavior repeats. Every request is recorded for assertions.
pub struct MockChatModel {
    script: Mutex<VecDeque<Result<String, String>>>,
    fallback: Result<String, String>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl MockChatModel {
    /// Always reply with the same text.
    pub fn fixed(reply: &str) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Ok(reply.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always fail.
    pub fn failing() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Err("scripted failure".to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Reply (or fail) per the given script, in order, then fail.
    pub fn with_script(steps: Vec<Result<String, String>>) -> Self {
        Self {
            script: Mutex::new(steps.into()),
            fallback: Err("script exhausted".to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().expect("mock lock").clone()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn generate(&self, request: &ModelRequest) -> Result<String, ModelError> {
        self.requests.lock().expect("mock lock").push(request.clone());
        let step = self
            .script
            .lock()
            .expect("mock lock")
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        step.map_err(ModelError::Connection)
    }
}

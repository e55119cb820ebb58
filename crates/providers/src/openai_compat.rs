//! Chat completions and embeddings over the OpenAI wire format.
//!
//! Any backend exposing `/chat/completions`, `/embeddings` and `/models`
//! under a base URL works: OpenAI itself, OpenRouter, Ollama, vLLM, Groq.

use std::time::Duration;

use async_trait::async_trait;
use readpal_core::error::ProviderError;
use readpal_core::message::Message;
use readpal_core::provider::{
    EmbeddingRequest, EmbeddingResponse, Provider, ProviderRequest, ProviderResponse, Usage,
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Seconds to wait when a 429 carries no usable `retry-after`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client: http_client(DEFAULT_TIMEOUT),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = http_client(timeout);
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    async fn post<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, ProviderError> {
        let response = self
            .client
            .post(self.endpoint(path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let response = error_for_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| malformed(format!("could not decode /{path} response: {e}")))
    }
}

fn http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

fn malformed(message: String) -> ProviderError {
    ProviderError::ApiError {
        status_code: StatusCode::OK.as_u16(),
        message,
    }
}

async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            Err(ProviderError::RateLimited { retry_after_secs })
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ProviderError::AuthenticationFailed(
            format!("{status}: check the configured API key"),
        )),
        _ => {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %body, "Provider returned error");
            Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: body,
            })
        }
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        debug!(
            provider = %self.name,
            model = %request.model,
            messages = request.messages.len(),
            "Sending completion request"
        );

        let reply: ChatReply = self
            .post("chat/completions", &ChatBody::from(&request))
            .await?;
        let choice = reply
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| malformed("completion had no choices".into()))?;

        Ok(ProviderResponse {
            message: Message::assistant(choice.message.content.unwrap_or_default()),
            usage: reply.usage,
            model: reply.model,
        })
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, ProviderError> {
        debug!(
            provider = %self.name,
            model = %request.model,
            count = request.inputs.len(),
            "Sending embedding request"
        );

        let reply: EmbeddingReply = self
            .post(
                "embeddings",
                &EmbeddingBody {
                    model: &request.model,
                    input: &request.inputs,
                    encoding_format: "float",
                },
            )
            .await?;

        let embeddings = reply.into_ordered(request.inputs.len())?;
        Ok(EmbeddingResponse {
            embeddings,
            model: request.model,
        })
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        let response = self
            .client
            .get(self.endpoint("models"))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(
                ProviderError::AuthenticationFailed(format!("{}: API key rejected", response.status())),
            ),
            status => Ok(status.is_success()),
        }
    }
}

// --- Wire types ---

#[derive(Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
}

impl<'a> From<&'a ProviderRequest> for ChatBody<'a> {
    fn from(request: &'a ProviderRequest) -> Self {
        Self {
            model: &request.model,
            messages: &request.messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
        }
    }
}

#[derive(Deserialize)]
struct ChatReply {
    model: String,
    choices: Vec<ChatChoice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingBody<'a> {
    model: &'a str,
    input: &'a [String],
    encoding_format: &'static str,
}

#[derive(Deserialize)]
struct EmbeddingReply {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

impl EmbeddingReply {
    /// Vectors in input order; the count must match the inputs.
    fn into_ordered(mut self, expected: usize) -> Result<Vec<Vec<f32>>, ProviderError> {
        if self.data.len() != expected {
            return Err(malformed(format!(
                "expected {expected} embeddings, got {}",
                self.data.len()
            )));
        }
        self.data.sort_by_key(|item| item.index);
        Ok(self.data.into_iter().map(|item| item.embedding).collect())
    }
}

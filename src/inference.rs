//! Remote text generation.
//!
//! The hosted endpoint answers in several JSON shapes depending on the model
//! and deployment. `CompletionShape::decode` tries one decoder per known shape
//! in a fixed priority order and collapses everything else to `Unrecognized`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::constants;

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("failed to reach inference endpoint: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("inference endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("inference response was not valid JSON: {0}")]
    Body(#[source] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompletionShape {
    /// `{"generated_text": "..."}`
    GeneratedText(String),
    /// `["...", ...]`
    TextList(String),
    /// `[{"generated_text": "..."}, ...]`
    GeneratedTextList(String),
    /// `{"text": "..."}`
    Text(String),
    /// `{"output": "..."}`
    Output(String),
    Unrecognized(Value),
}

#[derive(Deserialize)]
struct GeneratedTextBody {
    generated_text: String,
}

#[derive(Deserialize)]
struct TextBody {
    text: String,
}

#[derive(Deserialize)]
struct OutputBody {
    output: String,
}

fn object_field<T: for<'de> Deserialize<'de>>(body: &Value) -> Option<T> {
    if !body.is_object() {
        return None;
    }
    T::deserialize(body).ok()
}

impl CompletionShape {
    pub fn decode(body: Value) -> Self {
        if let Some(b) = object_field::<GeneratedTextBody>(&body) {
            return CompletionShape::GeneratedText(b.generated_text);
        }
        if let Some(first) = body.as_array().and_then(|items| items.first()) {
            if let Some(s) = first.as_str() {
                return CompletionShape::TextList(s.to_string());
            }
            if let Some(b) = object_field::<GeneratedTextBody>(first) {
                return CompletionShape::GeneratedTextList(b.generated_text);
            }
        }
        if let Some(b) = object_field::<TextBody>(&body) {
            return CompletionShape::Text(b.text);
        }
        if let Some(b) = object_field::<OutputBody>(&body) {
            return CompletionShape::Output(b.output);
        }
        CompletionShape::Unrecognized(body)
    }

    /// The generated text, or `None` for an unrecognized body.
    pub fn into_text(self) -> Option<String> {
        match self {
            CompletionShape::GeneratedText(t)
            | CompletionShape::TextList(t)
            | CompletionShape::GeneratedTextList(t)
            | CompletionShape::Text(t)
            | CompletionShape::Output(t) => Some(t),
            CompletionShape::Unrecognized(_) => None,
        }
    }
}

/// A text-generation backend. One request, one response.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<CompletionShape, InferenceError>;
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Client for a Hugging Face style inference endpoint.
///
/// No retry, no streaming and no timeout: the underlying `reqwest::Client` is
/// built without one, so a request that never completes keeps the caller
/// pending. Dropping the future is the only cancellation.
pub struct HttpInferenceClient {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl HttpInferenceClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            api_key: None,
        }
    }

    /// Uses a fixed key instead of reading the environment on each call.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpInferenceClient {
    fn default() -> Self {
        Self::new(constants::INFERENCE_URL.clone())
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    #[instrument(skip(self, prompt), fields(url = %self.url))]
    async fn complete(&self, prompt: &str) -> Result<CompletionShape, InferenceError> {
        let api_key = self.api_key.clone().unwrap_or_else(constants::api_key);

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(api_key)
            .json(&InferenceRequest { inputs: prompt })
            .send()
            .await
            .map_err(InferenceError::Transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(%status, %body, "Inference request failed");
            return Err(InferenceError::Status { status: status.as_u16(), body });
        }

        let body = response.json::<Value>().await.map_err(InferenceError::Body)?;
        debug!(?body, "Received inference response");

        Ok(CompletionShape::decode(body))
    }
}

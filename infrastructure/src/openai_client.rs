use crate::config::Config;
use domain::error::ProviderError;
use domain::models::{ChatRequest, EmbeddingRequest};
use domain::provider::{ChatProvider, EmbeddingProvider};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// HTTP client for an OpenAI-compatible `/v1` API.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &Config) -> Self {
        Self {
            client: Arc::new(client),
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// POST a JSON body and return the raw success body.
    async fn post_json<B>(&self, path: &str, body: &B) -> Result<String, ProviderError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        if !status.is_success() {
            tracing::warn!(%url, status = status.as_u16(), "provider rejected request");
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        Ok(text)
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::MalformedResponse(e.to_string()))
}

fn first_embedding(body: &str) -> Result<Vec<f32>, ProviderError> {
    let response: EmbeddingResponse = decode(body)?;
    response
        .data
        .into_iter()
        .next()
        .map(|d| d.embedding)
        .ok_or_else(|| ProviderError::MalformedResponse("embedding response has no data".into()))
}

fn first_choice(body: &str) -> Result<String, ProviderError> {
    let response: ChatResponse = decode(body)?;
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::MalformedResponse("chat response has no choices".into()))?;
    choice
        .message
        .content
        .ok_or_else(|| ProviderError::MalformedResponse("chat choice has no content".into()))
}

impl EmbeddingProvider for OpenAiClient {
    async fn create_embedding(&self, request: EmbeddingRequest) -> Result<Vec<f32>, ProviderError> {
        let body = self.post_json("embeddings", &request).await?;
        first_embedding(&body)
    }
}

impl ChatProvider for OpenAiClient {
    async fn create_chat_completion(&self, request: ChatRequest) -> Result<String, ProviderError> {
        let body = self.post_json("chat/completions", &request).await?;
        first_choice(&body)
    }
}

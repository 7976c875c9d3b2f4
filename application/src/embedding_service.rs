use domain::error::ProviderError;
use domain::models::EmbeddingRequest;
use domain::provider::EmbeddingProvider;
use futures::stream::{self, StreamExt, TryStreamExt};
use shared::telemetry::Telemetry;

const MAX_IN_FLIGHT: usize = 8;

/// Embedding models treat literal newlines as signal; submit them as spaces.
/// Unlike a bare `\n` replacement, `\r\n` collapses to a single space and a
/// lone `\r` counts as a newline too, so CRLF input embeds like LF input.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

pub struct EmbeddingService<P> {
    provider: P,
    model: String,
}

impl<P: EmbeddingProvider> EmbeddingService<P> {
    pub fn new(provider: P, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One provider call; the vector comes back exactly as returned.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let request = EmbeddingRequest {
            model: self.model.clone(),
            input: normalize_newlines(text),
        };
        let timer = Telemetry::new();
        let vector = self.provider.create_embedding(request).await?;
        tracing::debug!(
            model = %self.model,
            chars = text.len(),
            dims = vector.len(),
            elapsed_ms = timer.elapsed_ms() as u64,
            "embedded text"
        );
        Ok(vector)
    }

    /// Embed many texts with bounded concurrency. Output order follows
    /// input order; the first failure is returned and the rest abandoned.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ProviderError> {
        stream::iter(texts.iter().map(|text| self.embed(text)))
            .buffered(MAX_IN_FLIGHT)
            .try_collect()
            .await
    }
}

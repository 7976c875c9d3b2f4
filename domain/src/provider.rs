use crate::error::ProviderError;
use crate::models::{ChatRequest, EmbeddingRequest};
use std::future::Future;

/// Remote service turning text into a dense vector.
pub trait EmbeddingProvider: Send + Sync {
    fn create_embedding(
        &self,
        request: EmbeddingRequest,
    ) -> impl Future<Output = Result<Vec<f32>, ProviderError>> + Send;
}

/// Remote service producing one chat completion.
pub trait ChatProvider: Send + Sync {
    fn create_chat_completion(
        &self,
        request: ChatRequest,
    ) -> impl Future<Output = Result<String, ProviderError>> + Send;
}

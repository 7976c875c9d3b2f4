use crate::answer_service::AnswerService;
use crate::embedding_service::EmbeddingService;
use domain::error::{ProviderError, RagError};
use domain::provider::{ChatProvider, EmbeddingProvider};
use infrastructure::{config::Config, openai_client::OpenAiClient};

/// Both operations over one shared provider handle.
pub struct RagService<P = OpenAiClient> {
    embedder: EmbeddingService<P>,
    answerer: AnswerService<P>,
}

impl RagService<OpenAiClient> {
    /// Load configuration and build the HTTP client. A missing credential
    /// fails here, before any request can be made.
    pub fn from_env() -> Result<Self, RagError> {
        let config = Config::load()?;
        Ok(Self::from_config(&config))
    }

    pub fn from_config(config: &Config) -> Self {
        tracing::info!(
            embedding_model = %config.embedding_model,
            chat_model = %config.chat_model,
            base_url = %config.base_url,
            "configuration loaded"
        );
        Self::new(OpenAiClient::new(config), config)
    }
}

impl<P> RagService<P>
where
    P: EmbeddingProvider + ChatProvider + Clone,
{
    pub fn new(provider: P, config: &Config) -> Self {
        Self {
            embedder: EmbeddingService::new(provider.clone(), config.embedding_model.clone()),
            answerer: AnswerService::new(provider, config.chat_model.clone()),
        }
    }

    pub fn embedder(&self) -> &EmbeddingService<P> {
        &self.embedder
    }

    pub fn answerer(&self) -> &AnswerService<P> {
        &self.answerer
    }

    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        self.embedder.embed(text).await
    }

    pub async fn answer(&self, context: &str, question: &str) -> Result<String, ProviderError> {
        self.answerer.answer(context, question).await
    }
}

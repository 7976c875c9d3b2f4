use domain::error::ProviderError;
use domain::models::ChatRequest;
use domain::prompt::{self, ANSWER_MAX_TOKENS, ANSWER_TEMPERATURE};
use domain::provider::ChatProvider;
use shared::telemetry::Telemetry;

/// Answers a question from a caller-supplied context only.
///
/// The context is taken as is: retrieval, relevance and length are the
/// caller's concern. Sampling is pinned to a low temperature and a fixed
/// token budget on every call.
pub struct AnswerService<P> {
    provider: P,
    model: String,
}

impl<P: ChatProvider> AnswerService<P> {
    pub fn new(provider: P, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn build_request(&self, context: &str, question: &str) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: prompt::grounded_messages(context, question),
            temperature: ANSWER_TEMPERATURE,
            max_tokens: ANSWER_MAX_TOKENS,
        }
    }

    pub async fn answer(&self, context: &str, question: &str) -> Result<String, ProviderError> {
        let request = self.build_request(context, question);
        let timer = Telemetry::new();
        let answer = self.provider.create_chat_completion(request).await?;
        tracing::debug!(
            model = %self.model,
            context_chars = context.len(),
            answer_chars = answer.len(),
            elapsed_ms = timer.elapsed_ms() as u64,
            "answered question"
        );
        if prompt::is_fallback(&answer) {
            tracing::info!("context did not contain the answer");
        }
        Ok(answer)
    }

    /// See [`prompt::is_fallback`]; the model is not bound to this wording.
    pub fn is_fallback(answer: &str) -> bool {
        prompt::is_fallback(answer)
    }
}

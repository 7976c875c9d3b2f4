use anyhow::Context;
use application::answer_service::AnswerService;
use application::rag_service::RagService;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use domain::error::ProviderError;
use domain::provider::{ChatProvider, EmbeddingProvider};
use shared::types::Result;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

/// Context-grounded question answering over an OpenAI-compatible API.
#[derive(Parser, Debug)]
#[command(name = "grounded_rag", version)]
#[command(about = "Embed text or answer questions from a supplied context", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the embedding vector of a text
    Embed {
        /// Print the vector as a JSON array only
        #[arg(long)]
        json: bool,

        /// Text to embed (joined with spaces)
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Answer a question using only the given context
    Answer {
        #[command(flatten)]
        context: ContextSource,

        /// The question (joined with spaces)
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ContextSource {
    /// Context text, as produced by the retrieval step
    #[arg(long)]
    pub context: Option<String>,

    /// Read the context from a file, or from stdin with `-`
    #[arg(long, value_name = "PATH")]
    pub context_file: Option<PathBuf>,
}

impl ContextSource {
    pub async fn read(&self) -> Result<String> {
        if let Some(text) = &self.context {
            return Ok(text.clone());
        }
        match &self.context_file {
            Some(path) if path.as_os_str() == "-" => {
                let mut buf = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut buf)
                    .await
                    .context("Failed to read context from stdin")?;
                Ok(buf)
            }
            Some(path) => tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read context file {}", path.display())),
            None => Err(anyhow::anyhow!("No context supplied")),
        }
    }
}

/// Headline shown above a provider error, pointing at the usual fix.
fn failure_hint(err: &ProviderError, action: &str) -> String {
    if err.is_unauthorized() {
        format!("{action}: the provider rejected the credential, check OPENAI_API_KEY")
    } else if err.is_rate_limited() {
        format!("{action}: the provider is rate limiting requests, retry later")
    } else {
        action.to_string()
    }
}

pub struct CliApp<P = infrastructure::openai_client::OpenAiClient> {
    service: RagService<P>,
}

impl CliApp {
    /// Fails on a missing credential before anything touches the network.
    pub fn from_env() -> Result<Self> {
        let service = RagService::from_env().context("Failed to start")?;
        Ok(Self { service })
    }
}

impl<P> CliApp<P>
where
    P: EmbeddingProvider + ChatProvider + Clone,
{
    pub fn with_service(service: RagService<P>) -> Self {
        Self { service }
    }

    pub async fn run(&self, cli: Cli) -> Result<()> {
        let output = self.render(cli.command).await?;
        println!("{output}");
        Ok(())
    }

    /// Execute a command and return what would be printed to stdout.
    pub async fn render(&self, command: Command) -> Result<String> {
        match command {
            Command::Embed { json, text } => self.handle_embed(&text.join(" "), json).await,
            Command::Answer { context, question } => {
                let context = context.read().await?;
                self.handle_answer(&context, &question.join(" ")).await
            }
        }
    }

    async fn handle_embed(&self, text: &str, json: bool) -> Result<String> {
        let vector = self
            .service
            .embed(text)
            .await
            .map_err(|e| {
                let hint = failure_hint(&e, "Embedding request failed");
                anyhow::Error::new(e).context(hint)
            })?;
        let array = serde_json::to_string(&vector)?;
        if json {
            return Ok(array);
        }
        Ok(format!(
            "{} {}\n{}",
            "Dimensions:".green().bold(),
            vector.len(),
            array
        ))
    }

    async fn handle_answer(&self, context: &str, question: &str) -> Result<String> {
        if context.trim().is_empty() {
            tracing::warn!("answering with an empty context");
        }
        let answer = self
            .service
            .answer(context, question)
            .await
            .map_err(|e| {
                let hint = failure_hint(&e, "Chat completion request failed");
                anyhow::Error::new(e).context(hint)
            })?;
        if AnswerService::<P>::is_fallback(&answer) {
            return Ok(answer.yellow().to_string());
        }
        Ok(answer)
    }
}

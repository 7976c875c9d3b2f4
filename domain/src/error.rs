use thiserror::Error;

/// Startup failure: the environment does not describe a usable provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} is not set (checked the environment and .env)")]
    MissingVar { var: &'static str },
    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Any failure of a remote embedding or chat call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The request never produced an HTTP response.
    #[error("provider request failed: {0}")]
    Transport(String),
    /// Non-success status: bad credential, rate limit, unknown model, ...
    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed provider response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

#[derive(Debug, Error)]
pub enum RagError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

use std::env;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod http;

pub use http::OpenAiCompatibleReasoner;

#[derive(Debug, Clone, PartialEq)]
pub struct ReasoningRequest {
    pub request_id: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReasoningError {
    #[error("missing credential: {0}")]
    MissingCredential(String),
    #[error("authentication failed (status {status}): {body}")]
    Authentication { status: u16, body: String },
    #[error("authorization failed (status {status}): {body}")]
    Authorization { status: u16, body: String },
    #[error("rate limited (status {status}): {body}")]
    RateLimited { status: u16, body: String },
    #[error("invalid request (status {status}): {body}")]
    InvalidRequest { status: u16, body: String },
    #[error("transient backend failure: {0}")]
    Transient(String),
    #[error("protocol violation: {0}")]
    Protocol(String),
}

impl ReasoningError {
    /// Maps a non-success HTTP status onto the error taxonomy. Bodies are truncated.
    pub fn from_status(status: u16, body: &str) -> Self {
        let body = body.chars().take(240).collect::<String>();
        match status {
            401 => Self::Authentication { status, body },
            403 => Self::Authorization { status, body },
            408 | 429 => Self::RateLimited { status, body },
            400..=499 => Self::InvalidRequest { status, body },
            _ => Self::Transient(format!("backend returned status {status}: {body}")),
        }
    }
}

/// Where the bearer token for the reasoning service comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CredentialRef {
    Env {
        var: String,
    },
    InlineToken {
        token: String,
    },
    #[default]
    None,
}

impl CredentialRef {
    /// Resolves to an `Authorization` header value, if any.
    pub fn resolve(&self) -> Result<Option<String>, ReasoningError> {
        match self {
            Self::Env { var } => {
                let token = env::var(var).map_err(|_| {
                    ReasoningError::MissingCredential(format!(
                        "environment variable {var} is not set"
                    ))
                })?;
                Ok(Some(format!("Bearer {token}")))
            }
            Self::InlineToken { token } => {
                if token.trim().is_empty() {
                    return Err(ReasoningError::MissingCredential(
                        "inline credential token cannot be empty".to_string(),
                    ));
                }
                Ok(Some(format!("Bearer {token}")))
            }
            Self::None => Ok(None),
        }
    }
}

/// Seam to the external reasoning service. One call, one completion text.
#[async_trait]
pub trait ReasoningPort: Send + Sync {
    async fn complete(&self, request: ReasoningRequest) -> Result<String, ReasoningError>;
}

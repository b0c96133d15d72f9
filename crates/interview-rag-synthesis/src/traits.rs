use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Errors that can occur while synthesizing an answer
#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("Synthesis is not configured: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Gemini API error ({status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Request was cancelled")]
    Cancelled,
}

/// Coarse classification of a [`SynthesisError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SynthesisErrorKind {
    Configuration,
    Network,
    Upstream,
    MalformedResponse,
    Timeout,
    Cancelled,
}

impl std::fmt::Display for SynthesisErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SynthesisErrorKind::Configuration => write!(f, "configuration"),
            SynthesisErrorKind::Network => write!(f, "network"),
            SynthesisErrorKind::Upstream => write!(f, "upstream"),
            SynthesisErrorKind::MalformedResponse => write!(f, "malformed-response"),
            SynthesisErrorKind::Timeout => write!(f, "timeout"),
            SynthesisErrorKind::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl SynthesisError {
    pub fn kind(&self) -> SynthesisErrorKind {
        match self {
            SynthesisError::Configuration(_) => SynthesisErrorKind::Configuration,
            SynthesisError::Network(_) => SynthesisErrorKind::Network,
            SynthesisError::Upstream { .. } => SynthesisErrorKind::Upstream,
            SynthesisError::MalformedResponse(_) => SynthesisErrorKind::MalformedResponse,
            SynthesisError::Timeout(_) => SynthesisErrorKind::Timeout,
            SynthesisError::Cancelled => SynthesisErrorKind::Cancelled,
        }
    }
}

/// Inputs for one synthesis call
#[derive(Debug, Clone, Copy)]
pub struct SynthesisInput<'a> {
    pub user_query: &'a str,
    pub formatted_context: &'a str,
    /// False when retrieval found nothing; the model is then asked for a
    /// general answer instead
    pub has_context: bool,
}

/// A text-generation backend that turns a query plus retrieved context into
/// an answer
#[async_trait]
pub trait Synthesizer: Send + Sync {
    /// Human-readable backend name (e.g., "Gemini")
    fn name(&self) -> &str;

    /// Whether the credentials needed to call the backend are present
    fn is_configured(&self) -> bool;

    /// Produce an answer. Makes at most one outbound call and never retries.
    async fn synthesize(
        &self,
        input: SynthesisInput<'_>,
        cancel: &CancellationToken,
    ) -> Result<String, SynthesisError>;
}

mod gemini;
mod prompts;
mod traits;

pub use gemini::{GeminiClient, GeminiConfig, API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use prompts::{SynthesisPrompts, EMPTY_RESPONSE_FALLBACK};
pub use traits::{SynthesisError, SynthesisErrorKind, SynthesisInput, Synthesizer};

pub use tokio_util::sync::CancellationToken;

//! Configuration file support for interview-rag.
//!
//! Tuning knobs are read from `interview-rag.toml`; the API key is only ever
//! taken from the environment.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use interview_rag_catalog::DEFAULT_MAX_MATCHES_PER_COMPANY;
use interview_rag_synthesis::GeminiConfig;

/// The config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "interview-rag.toml";

/// Configuration loaded from `interview-rag.toml`
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AssistantConfig {
    #[serde(default)]
    pub synthesis: SynthesisSection,
    #[serde(default)]
    pub retrieval: RetrievalSection,
}

/// `[synthesis]` table
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SynthesisSection {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub max_output_tokens: Option<u32>,
    pub timeout_secs: Option<u64>,
}

/// `[retrieval]` table
#[derive(Debug, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RetrievalSection {
    pub max_matches_per_company: Option<usize>,
}

impl AssistantConfig {
    /// Load and parse a config file. A file that exists but fails to parse
    /// is a hard error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Find the config file to use.
    ///
    /// Priority: explicit path > `./interview-rag.toml` > user config dir.
    /// Returns `Ok(None)` when no file exists.
    pub fn discover(explicit: Option<&Path>, working_dir: &Path) -> Result<Option<(PathBuf, Self)>> {
        let user_file = dirs::config_dir().map(|dir| dir.join("interview-rag").join("config.toml"));
        Self::discover_in(explicit, working_dir, user_file)
    }

    fn discover_in(
        explicit: Option<&Path>,
        working_dir: &Path,
        user_file: Option<PathBuf>,
    ) -> Result<Option<(PathBuf, Self)>> {
        if let Some(path) = explicit {
            let config = Self::load(path)?;
            return Ok(Some((path.to_path_buf(), config)));
        }

        let candidates = std::iter::once(working_dir.join(CONFIG_FILE_NAME)).chain(user_file);
        for path in candidates {
            if path.exists() {
                let config = Self::load(&path)?;
                return Ok(Some((path, config)));
            }
        }

        Ok(None)
    }
}

/// Values given on the command line, which win over the file
#[derive(Debug, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub max_matches: Option<usize>,
    pub timeout_secs: Option<u64>,
}

/// Effective settings after merging CLI, file and defaults
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub max_output_tokens: Option<u32>,
    pub timeout: Option<Duration>,
    pub max_matches: usize,
}

impl Settings {
    pub fn resolve(overrides: &Overrides, file: Option<&AssistantConfig>) -> Self {
        let synthesis = file.map(|c| &c.synthesis);
        let retrieval = file.map(|c| &c.retrieval);

        Self {
            model: overrides
                .model
                .clone()
                .or_else(|| synthesis.and_then(|s| s.model.clone())),
            base_url: synthesis.and_then(|s| s.base_url.clone()),
            max_output_tokens: synthesis.and_then(|s| s.max_output_tokens),
            timeout: overrides
                .timeout_secs
                .or_else(|| synthesis.and_then(|s| s.timeout_secs))
                .map(Duration::from_secs),
            max_matches: overrides
                .max_matches
                .or_else(|| retrieval.and_then(|r| r.max_matches_per_company))
                .unwrap_or(DEFAULT_MAX_MATCHES_PER_COMPANY)
                .max(1),
        }
    }

    /// Apply these settings on top of a client config
    pub fn apply(&self, mut config: GeminiConfig) -> GeminiConfig {
        if let Some(ref model) = self.model {
            config = config.with_model(model.clone());
        }
        if let Some(ref base_url) = self.base_url {
            config = config.with_base_url(base_url.clone());
        }
        if let Some(tokens) = self.max_output_tokens {
            config = config.with_max_output_tokens(tokens);
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        config
    }
}

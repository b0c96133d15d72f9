use chrono::{DateTime, Utc};
use interview_rag_catalog::MatchGroup;
use serde::Serialize;

/// The role of a conversation participant
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A single message in the session transcript
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    /// Catalog groups the answer was grounded on; always empty for user
    /// turns and failed answers
    pub citations: Vec<MatchGroup>,
    /// True while the assistant's answer is still being produced
    pub loading: bool,
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            citations: Vec::new(),
            loading: false,
            timestamp: Utc::now(),
        }
    }

    /// Placeholder assistant turn shown while a request is in flight
    pub fn provisional() -> Self {
        Self {
            role: Role::Assistant,
            content: String::new(),
            citations: Vec::new(),
            loading: true,
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>, citations: Vec<MatchGroup>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            citations,
            loading: false,
            timestamp: Utc::now(),
        }
    }
}

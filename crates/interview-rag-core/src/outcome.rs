use interview_rag_synthesis::SynthesisErrorKind;

/// Why a submission was dropped without touching the transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The query was empty or whitespace only
    EmptyQuery,
    /// Another turn is still awaiting its response
    TurnInFlight,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::EmptyQuery => write!(f, "empty query"),
            SkipReason::TurnInFlight => write!(f, "a turn is already in flight"),
        }
    }
}

/// What happened to a single `submit` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Nothing was appended
    Skipped { reason: SkipReason },
    /// The assistant turn holds the model's answer
    Resolved { citations: usize },
    /// The assistant turn holds a fixed error message
    Failed { kind: SynthesisErrorKind },
}

impl TurnOutcome {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Resolved { .. } => 0,
            Self::Skipped { .. } => 1,
            Self::Failed {
                kind: SynthesisErrorKind::Cancelled,
            } => 130,
            Self::Failed { .. } => 2,
        }
    }
}

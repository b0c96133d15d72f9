use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use interview_rag_catalog::{format_context, search, CatalogStore, DEFAULT_MAX_MATCHES_PER_COMPANY};
use interview_rag_logging::{LogEvent, Logger};
use interview_rag_synthesis::{SynthesisErrorKind, SynthesisInput, Synthesizer};

use crate::messages::failure_message;
use crate::outcome::{SkipReason, TurnOutcome};
use crate::turn::ConversationTurn;

/// Lifecycle of the current turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    AwaitingResponse,
}

struct SessionState {
    phase: TurnPhase,
    turns: Vec<ConversationTurn>,
    /// Number of turns started so far, used to label log events
    started: usize,
}

/// Runs retrieval and synthesis for each user query and owns the transcript.
///
/// At most one turn is in flight; submissions made meanwhile are dropped.
/// Every change to the transcript is published to subscribers.
pub struct ConversationController {
    store: Arc<CatalogStore>,
    synthesizer: Arc<dyn Synthesizer>,
    logger: Arc<Logger>,
    max_matches: usize,
    state: Mutex<SessionState>,
    transcript: watch::Sender<Vec<ConversationTurn>>,
    shutdown: CancellationToken,
}

impl ConversationController {
    pub fn new(store: Arc<CatalogStore>, synthesizer: Arc<dyn Synthesizer>, logger: Arc<Logger>) -> Self {
        let (transcript, _) = watch::channel(Vec::new());
        Self {
            store,
            synthesizer,
            logger,
            max_matches: DEFAULT_MAX_MATCHES_PER_COMPANY,
            state: Mutex::new(SessionState {
                phase: TurnPhase::Idle,
                turns: Vec::new(),
                started: 0,
            }),
            transcript,
            shutdown: CancellationToken::new(),
        }
    }

    /// Cap on keyword matches per company; values below 1 count as 1
    pub fn with_max_matches(mut self, max_matches: usize) -> Self {
        self.max_matches = max_matches.max(1);
        self
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    /// Cancelling this token aborts the in-flight request, if any, and every
    /// later one
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Watch the transcript; a new snapshot is sent after every change
    pub fn subscribe(&self) -> watch::Receiver<Vec<ConversationTurn>> {
        self.transcript.subscribe()
    }

    pub fn turns(&self) -> Vec<ConversationTurn> {
        self.lock_state().turns.clone()
    }

    pub fn phase(&self) -> TurnPhase {
        self.lock_state().phase
    }

    /// Run one query through retrieval and synthesis.
    ///
    /// Appends the user turn and a loading assistant turn, then replaces the
    /// latter with the answer or a fixed error message. Synthesis failures
    /// are reported through the outcome, never as an error.
    pub async fn submit(&self, query: &str) -> TurnOutcome {
        let query = query.trim();
        if query.is_empty() {
            return self.skip(SkipReason::EmptyQuery);
        }

        let Some(mut pending) = self.begin_turn(query) else {
            return self.skip(SkipReason::TurnInFlight);
        };
        let turn = pending.turn;

        let groups = search(query, &self.store, self.max_matches);
        self.logger.log(&LogEvent::RetrievalCompleted {
            turn,
            companies: groups.iter().map(|g| g.company.clone()).collect(),
            matches: groups.iter().map(|g| g.matches.len()).sum(),
        });

        let context = format_context(&groups);
        let has_context = !groups.is_empty();
        self.logger.log(&LogEvent::SynthesisStarted {
            turn,
            has_context,
            context_chars: context.chars().count(),
        });

        let cancel = self.shutdown.child_token();
        let start = Instant::now();
        let result = self
            .synthesizer
            .synthesize(
                SynthesisInput {
                    user_query: query,
                    formatted_context: &context,
                    has_context,
                },
                &cancel,
            )
            .await;
        let duration_secs = start.elapsed().as_secs_f64();

        match result {
            Ok(answer) => {
                self.logger.log(&LogEvent::SynthesisCompleted {
                    turn,
                    response_chars: answer.chars().count(),
                    duration_secs,
                });
                let citations = groups.len();
                pending.settle(ConversationTurn::assistant(answer, groups));
                TurnOutcome::Resolved { citations }
            }
            Err(err) => {
                let kind = err.kind();
                warn!(turn, kind = %kind, error = %err, "Synthesis failed");
                self.logger.log(&LogEvent::SynthesisFailed {
                    turn,
                    kind: kind.to_string(),
                    error: err.to_string(),
                    duration_secs,
                });
                pending.settle(ConversationTurn::assistant(failure_message(kind), Vec::new()));
                TurnOutcome::Failed { kind }
            }
        }
    }

    fn skip(&self, reason: SkipReason) -> TurnOutcome {
        debug!(%reason, "Submission skipped");
        self.logger.log(&LogEvent::TurnSkipped {
            reason: reason.to_string(),
        });
        TurnOutcome::Skipped { reason }
    }

    /// Append the user and provisional turns if no turn is in flight
    fn begin_turn(&self, query: &str) -> Option<PendingTurn<'_>> {
        let mut state = self.lock_state();
        if state.phase == TurnPhase::AwaitingResponse {
            return None;
        }

        state.phase = TurnPhase::AwaitingResponse;
        state.started += 1;
        state.turns.push(ConversationTurn::user(query));
        state.turns.push(ConversationTurn::provisional());
        let slot = state.turns.len() - 1;
        let turn = state.started;
        self.transcript.send_replace(state.turns.clone());
        drop(state);

        info!(turn, "Turn started");
        self.logger.log(&LogEvent::TurnSubmitted {
            turn,
            query: query.to_string(),
        });

        Some(PendingTurn {
            controller: self,
            slot,
            turn,
            settled: false,
        })
    }

    /// Replace the provisional turn and return to idle
    fn finish_turn(&self, slot: usize, replacement: ConversationTurn) {
        let mut state = self.lock_state();
        state.turns[slot] = replacement;
        state.phase = TurnPhase::Idle;
        self.transcript.send_replace(state.turns.clone());
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// The provisional slot of an in-flight turn.
///
/// If the `submit` future is dropped before the turn settles, the slot is
/// filled with the cancellation message so the session can continue.
struct PendingTurn<'a> {
    controller: &'a ConversationController,
    slot: usize,
    turn: usize,
    settled: bool,
}

impl PendingTurn<'_> {
    fn settle(&mut self, replacement: ConversationTurn) {
        self.settled = true;
        self.controller.finish_turn(self.slot, replacement);
    }
}

impl Drop for PendingTurn<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.controller.finish_turn(
                self.slot,
                ConversationTurn::assistant(failure_message(SynthesisErrorKind::Cancelled), Vec::new()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use interview_rag_catalog::{CompanyCatalog, QuestionEntry};
    use interview_rag_synthesis::SynthesisError;

    struct EchoSynthesizer;

    #[async_trait]
    impl Synthesizer for EchoSynthesizer {
        fn name(&self) -> &str {
            "echo"
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn synthesize(
            &self,
            input: SynthesisInput<'_>,
            _cancel: &CancellationToken,
        ) -> Result<String, SynthesisError> {
            Ok(format!("{}|{}", input.has_context, input.formatted_context))
        }
    }

    fn controller() -> ConversationController {
        let store = CatalogStore::from_companies(vec![CompanyCatalog::new("Acme", "#000000", "A")
            .with_question(QuestionEntry::new("Explain consistent hashing", &["distributed"]))])
        .unwrap();
        ConversationController::new(Arc::new(store), Arc::new(EchoSynthesizer), Arc::new(Logger::silent()))
    }

    #[tokio::test]
    async fn test_query_is_trimmed_before_recording() {
        let controller = controller();
        controller.submit("  hashing questions  ").await;

        let turns = controller.turns();
        assert_eq!(turns[0].content, "hashing questions");
    }

    #[tokio::test]
    async fn test_formatted_context_reaches_synthesizer() {
        let controller = controller();
        controller.submit("consistent hashing").await;

        let turns = controller.turns();
        assert_eq!(
            turns[1].content,
            "true|[Acme]:\n• Explain consistent hashing (tags: distributed)"
        );
    }

    #[tokio::test]
    async fn test_dropped_submit_leaves_session_usable() {
        struct Never;

        #[async_trait]
        impl Synthesizer for Never {
            fn name(&self) -> &str {
                "never"
            }

            fn is_configured(&self) -> bool {
                true
            }

            async fn synthesize(
                &self,
                _input: SynthesisInput<'_>,
                _cancel: &CancellationToken,
            ) -> Result<String, SynthesisError> {
                std::future::pending().await
            }
        }

        let store = CatalogStore::from_companies(Vec::new()).unwrap();
        let controller = ConversationController::new(Arc::new(store), Arc::new(Never), Arc::new(Logger::silent()));

        let result =
            tokio::time::timeout(std::time::Duration::from_millis(20), controller.submit("hello")).await;
        assert!(result.is_err());

        assert_eq!(controller.phase(), TurnPhase::Idle);
        let turns = controller.turns();
        assert_eq!(turns.len(), 2);
        assert!(!turns[1].loading);
        assert_eq!(turns[1].content, failure_message(SynthesisErrorKind::Cancelled));
    }
}

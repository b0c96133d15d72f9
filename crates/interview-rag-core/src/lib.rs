mod controller;
mod messages;
mod outcome;
mod turn;

pub use controller::{ConversationController, TurnPhase};
pub use messages::failure_message;
pub use outcome::{SkipReason, TurnOutcome};
pub use turn::{ConversationTurn, Role};

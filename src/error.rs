//! Error types for the match engine.
//!
//! Every variant is a local, recoverable rejection: a call that returns an
//! error leaves the engine exactly as it was before the call.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Operation attempted in a state that forbids it
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Non-positive round or clock duration
    #[error("invalid duration: {0}s (must be positive)")]
    InvalidDuration(i64),

    /// Out-of-range numeric or structural input
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("unknown participant: {0}")]
    UnknownParticipant(String),

    /// The first answer for a round is authoritative
    #[error("participant {participant_id} already answered round {round}")]
    DuplicateAnswer { participant_id: String, round: u32 },

    /// `RoundClock::start` while a countdown is active
    #[error("round clock is already running")]
    AlreadyRunning,
}

pub type Result<T> = std::result::Result<T, EngineError>;

//! Events emitted by the match engine.
//!
//! The engine queues events as it advances; the caller drains them and fans
//! them out to remote clients however it likes.

use serde::Serialize;

use crate::types::CloseReason;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum MatchEvent {
    MatchStarted {
        match_id: String,
        participants: usize,
        rounds: u32,
    },
    RoundOpened {
        round: u32,
        duration_secs: u32,
    },
    AnswerAccepted {
        participant_id: String,
        round: u32,
        correct: bool,
        points: u32,
        /// Cumulative score after this answer
        total: u64,
    },
    RoundClosed {
        round: u32,
        reason: CloseReason,
    },
    MatchCompleted {
        /// Ids sharing rank 1
        winners: Vec<String>,
    },
}

impl MatchEvent {
    /// Round the event belongs to, if any
    pub fn round(&self) -> Option<u32> {
        match self {
            MatchEvent::RoundOpened { round, .. }
            | MatchEvent::AnswerAccepted { round, .. }
            | MatchEvent::RoundClosed { round, .. } => Some(*round),
            MatchEvent::MatchStarted { .. } | MatchEvent::MatchCompleted { .. } => None,
        }
    }
}

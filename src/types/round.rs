//! Round types: puzzle content, answers and the per-round state machine.

use serde::{Deserialize, Serialize};

// ============================================================================
// Answer
// ============================================================================

/// An answer submitted by a participant.
///
/// The engine never interprets puzzle content. A `Text` answer is checked
/// against the round's answer key after normalisation; a `Graded` answer
/// carries a verdict computed by whoever owns the puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    Text(String),
    Graded(bool),
}

impl Answer {
    /// Decide correctness against an answer key.
    pub fn is_correct(&self, answer_key: &str) -> bool {
        match self {
            Answer::Text(text) => normalize(text) == normalize(answer_key),
            Answer::Graded(verdict) => *verdict,
        }
    }
}

/// Trim, collapse internal whitespace and lowercase.
pub fn normalize(s: &str) -> String {
    s.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

// ============================================================================
// RoundContent
// ============================================================================

/// Prompt and answer key for one round, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoundContent {
    pub prompt: String,
    pub answer_key: String,
}

impl RoundContent {
    pub fn new(prompt: impl Into<String>, answer_key: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            answer_key: answer_key.into(),
        }
    }
}

// ============================================================================
// RoundState / CloseReason
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoundState {
    #[default]
    Pending,
    Open,
    Closed,
}

/// Why a round closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CloseReason {
    /// The full duration elapsed
    Expired,
    /// Every roster member answered before the clock ran out
    AllAnswered,
}

// ============================================================================
// Round
// ============================================================================

/// One timed question/answer cycle within a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round {
    /// 1-based round index
    pub index: u32,
    pub content: RoundContent,
    pub duration_secs: u32,
    pub state: RoundState,
    /// Set once the round is closed
    pub close_reason: Option<CloseReason>,
    /// Number of accepted answers
    pub answers: usize,
}

impl Round {
    pub fn new(index: u32, content: RoundContent, duration_secs: u32) -> Self {
        Self {
            index,
            content,
            duration_secs,
            state: RoundState::Pending,
            close_reason: None,
            answers: 0,
        }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.state == RoundState::Open
    }

    #[inline]
    pub fn duration_ms(&self) -> u64 {
        u64::from(self.duration_secs) * 1_000
    }

    pub(crate) fn open(&mut self) {
        self.state = RoundState::Open;
    }

    pub(crate) fn close(&mut self, reason: CloseReason) {
        self.state = RoundState::Closed;
        self.close_reason = Some(reason);
    }
}

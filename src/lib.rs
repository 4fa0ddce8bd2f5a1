//! # Puzzle Arena
//!
//! Round-based scoring and prize-distribution engine for timed puzzle
//! matches with entry fees.
//!
//! ## Architecture
//!
//! The engine consists of:
//! - **Clock**: fixed-duration round countdown with latched expiry
//! - **Scoring**: pure time-decayed points policy
//! - **Roster**: fixed participant table
//! - **Engine**: match state machine, ranking and prize split
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical inputs produce identical standings and payouts
//! 2. **No Floating Point Money**: all amounts are integer cents
//! 3. **Library Only**: no I/O, no globals; one `MatchEngine` per match
//! 4. **Collaborators Outside**: identity, storage, payments, realtime fan-out
//!    and puzzle content are the embedding application's job

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Participant, Round, Standing, SettlementReceipt
pub mod types;

/// Round timing: TimeSource, RoundClock
pub mod clock;

/// Points for answers
pub mod scoring;

/// Participant table
pub mod roster;

/// Match state machine, ranking, prize split
pub mod engine;

/// Seeded practice opponents
pub mod practice;

/// Match configuration and `ARENA_*` environment loading
pub mod config;

/// Engine error type
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use clock::{ManualTimeSource, RoundClock, SystemTimeSource, TimeSource};
pub use config::MatchConfig;
pub use engine::{MatchEngine, MatchEvent, MatchState, SharedEngine, Submission};
pub use error::{EngineError, Result};
pub use scoring::ScoringPolicy;
pub use types::{Answer, MatchResults, ParticipantInfo, RoundContent, Standing};

//! Core data types for the match engine.
//!
//! ## Types
//!
//! - [`Participant`]: A player with cumulative score and per-round records
//! - [`Round`]: One timed question/answer cycle
//! - [`Answer`]: Free-text or externally graded answer
//! - [`Standing`] / [`MatchResults`]: Final ranking and payouts
//! - [`SettlementReceipt`]: Fixed-size, hashable payout summary
//!
//! ## Money
//!
//! All amounts are integer cents internally; see [`money`].

mod participant;
mod round;
mod standing;
mod receipt;
pub mod money;

pub use participant::{Participant, ParticipantInfo, RoundRecord};
pub use round::{normalize, Answer, CloseReason, Round, RoundContent, RoundState};
pub use standing::{MatchResults, Standing};
pub use receipt::SettlementReceipt;

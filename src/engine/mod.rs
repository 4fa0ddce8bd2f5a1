//! Match engine.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: the same roster, answers and timings always produce
//!    the same standings, payouts and results root
//! 2. **Fixed-Point Money**: prize arithmetic is integer cents
//! 3. **Synchronous Execution**: no operation blocks; waiting for answers or
//!    for time to pass is the caller's job
//! 4. **One Owner**: each match is one `MatchEngine` value with no globals
//!
//! ## Components
//!
//! - [`MatchEngine`]: state machine over rounds, answers and scores
//! - [`ranking`]: standard competition ranking (1, 1, 3)
//! - [`prize`]: fee deduction and winner-take-all split with even ties
//! - [`MatchEvent`]: round/match lifecycle notifications
//! - [`SharedEngine`]: mutex-guarded handle plus background ticker
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use puzzle_arena::engine::{MatchEngine, MatchEvent};
//! use puzzle_arena::clock::ManualTimeSource;
//! use puzzle_arena::config::MatchConfig;
//! use puzzle_arena::types::{Answer, CloseReason, ParticipantInfo, RoundContent};
//!
//! let time = Arc::new(ManualTimeSource::new());
//! let mut engine = MatchEngine::with_time_source(
//!     MatchConfig::default(),
//!     vec![ParticipantInfo::new("a", "Ada")],
//!     vec![RoundContent::new("2+2", "4"), RoundContent::new("3+3", "6")],
//!     time.clone(),
//! ).unwrap();
//!
//! engine.start().unwrap();
//! time.advance_secs(30);
//! assert!(engine.tick().unwrap()); // round 1 expired
//!
//! let events = engine.drain_events();
//! assert!(events.contains(&MatchEvent::RoundClosed { round: 1, reason: CloseReason::Expired }));
//! assert_eq!(engine.current_round().unwrap().index, 2);
//! ```

pub mod events;
pub mod machine;
pub mod prize;
pub mod ranking;
pub mod shared;

pub use events::MatchEvent;
pub use machine::{MatchEngine, MatchState, Submission};
pub use prize::{split_prize, Payout};
pub use ranking::{rank, Ranked};
pub use shared::{SharedEngine, Ticker};

//! Scoring.
//!
//! [`ScoringPolicy`] is a pure function of (correctness, time remaining,
//! round duration). It holds no state and is safe to share freely.

pub mod policy;

pub use policy::{
    ScoringPolicy, DEFAULT_BASE_AWARD, DEFAULT_MINIMUM_AWARD, DEFAULT_PENALTY_PER_SECOND,
};

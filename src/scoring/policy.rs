//! Time-decayed scoring policy.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Points for a correct answer submitted instantly.
pub const DEFAULT_BASE_AWARD: u32 = 1_000;

/// Floor for any correct answer.
pub const DEFAULT_MINIMUM_AWARD: u32 = 100;

/// Points lost per second elapsed.
pub const DEFAULT_PENALTY_PER_SECOND: u32 = 10;

/// Pure mapping from a round outcome to points.
///
/// A correct answer earns `base_award` minus a penalty that grows linearly
/// with elapsed time, floored at `minimum_award`. Incorrect answers earn 0.
///
/// ## Example
///
/// ```
/// use puzzle_arena::scoring::ScoringPolicy;
///
/// let policy = ScoringPolicy::default();
///
/// // 5s elapsed out of 30s: 1000 - 5 * 10
/// assert_eq!(policy.score(true, 25_000, 30_000).unwrap(), 950);
/// assert_eq!(policy.score(false, 25_000, 30_000).unwrap(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringPolicy {
    pub base_award: u32,
    pub minimum_award: u32,
    pub penalty_per_second: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            base_award: DEFAULT_BASE_AWARD,
            minimum_award: DEFAULT_MINIMUM_AWARD,
            penalty_per_second: DEFAULT_PENALTY_PER_SECOND,
        }
    }
}

impl ScoringPolicy {
    pub fn new(base_award: u32, minimum_award: u32, penalty_per_second: u32) -> Result<Self> {
        let policy = Self {
            base_award,
            minimum_award,
            penalty_per_second,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// A correct answer must always score positively, and a faster one
    /// must outscore a slower one until the floor is reached.
    pub fn validate(&self) -> Result<()> {
        if self.minimum_award == 0 {
            return Err(EngineError::InvalidInput(
                "minimum_award must be at least 1".to_string(),
            ));
        }
        if self.minimum_award >= self.base_award {
            return Err(EngineError::InvalidInput(format!(
                "minimum_award {} must be below base_award {}",
                self.minimum_award, self.base_award
            )));
        }
        if self.penalty_per_second == 0 {
            return Err(EngineError::InvalidInput(
                "penalty_per_second must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Points for one submission.
    ///
    /// `remaining_ms` is the clock reading at submission and must lie in
    /// `0..=duration_ms`; `duration_ms` must be positive.
    pub fn score(&self, is_correct: bool, remaining_ms: i64, duration_ms: i64) -> Result<u32> {
        if duration_ms <= 0 {
            return Err(EngineError::InvalidInput(format!(
                "round duration {duration_ms}ms must be positive"
            )));
        }
        if remaining_ms < 0 || remaining_ms > duration_ms {
            return Err(EngineError::InvalidInput(format!(
                "remaining {remaining_ms}ms outside 0..={duration_ms}ms"
            )));
        }
        if !is_correct {
            return Ok(0);
        }

        // u128 keeps elapsed * penalty exact for any i64 duration
        let elapsed_ms = (duration_ms - remaining_ms) as u128;
        let penalty = elapsed_ms * u128::from(self.penalty_per_second) / 1_000;
        let decayed = u128::from(self.base_award).saturating_sub(penalty);

        Ok(decayed.max(u128::from(self.minimum_award)) as u32)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

//! Match configuration.
//!
//! A `MatchConfig` is plain data: it can be built in code, deserialized from
//! whatever format the host stores match templates in, or loaded from
//! `ARENA_*` environment variables.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::scoring::ScoringPolicy;
use crate::types::money::exact_cents;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Opaque identifier echoed into results
    pub match_id: String,
    /// Per-participant entry fee, at most 2 decimal places
    pub entry_fee: Decimal,
    /// Operator's cut of the pool, in [0, 1)
    pub platform_fee_rate: Decimal,
    pub round_duration_secs: u32,
    #[serde(default)]
    pub scoring: ScoringPolicy,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            match_id: "practice".to_string(),
            entry_fee: Decimal::new(1_000, 2),
            platform_fee_rate: Decimal::new(6, 2),
            round_duration_secs: 30,
            scoring: ScoringPolicy::default(),
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.entry_fee <= Decimal::ZERO {
            return Err(EngineError::InvalidInput(format!(
                "entry fee {} must be positive",
                self.entry_fee
            )));
        }
        if exact_cents(self.entry_fee).is_none() {
            return Err(EngineError::InvalidInput(format!(
                "entry fee {} has sub-cent precision",
                self.entry_fee
            )));
        }
        if self.platform_fee_rate < Decimal::ZERO || self.platform_fee_rate >= Decimal::ONE {
            return Err(EngineError::InvalidInput(format!(
                "platform fee rate {} outside [0, 1)",
                self.platform_fee_rate
            )));
        }
        if self.round_duration_secs == 0 {
            return Err(EngineError::InvalidDuration(0));
        }
        self.scoring.validate()
    }

    /// Load from `ARENA_*` environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let scoring = ScoringPolicy {
            base_award: parse_or(&lookup, "ARENA_BASE_AWARD", defaults.scoring.base_award)?,
            minimum_award: parse_or(
                &lookup,
                "ARENA_MINIMUM_AWARD",
                defaults.scoring.minimum_award,
            )?,
            penalty_per_second: parse_or(
                &lookup,
                "ARENA_PENALTY_PER_SECOND",
                defaults.scoring.penalty_per_second,
            )?,
        };

        let config = Self {
            match_id: lookup("ARENA_MATCH_ID").unwrap_or(defaults.match_id),
            entry_fee: parse_or(&lookup, "ARENA_ENTRY_FEE", defaults.entry_fee)?,
            platform_fee_rate: parse_or(
                &lookup,
                "ARENA_PLATFORM_FEE_RATE",
                defaults.platform_fee_rate,
            )?,
            round_duration_secs: parse_or(
                &lookup,
                "ARENA_ROUND_DURATION_SECS",
                defaults.round_duration_secs,
            )?,
            scoring,
        };
        config.validate()?;
        Ok(config)
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| EngineError::InvalidInput(format!("invalid {key}: {raw:?}"))),
        None => Ok(default),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

//! Fee-and-split prize policy.
//!
//! ```text
//! pool          = entry_fee * participants
//! platform_fee  = round(pool * rate, 2dp)
//! distributable = pool - platform_fee
//! ```
//!
//! Winner takes all. Leaders tied at rank 1 split `distributable` evenly; the
//! cents that do not divide evenly go one each to the lexicographically
//! first tied ids. Everyone else receives 0. All arithmetic is in integer
//! cents, so `platform_fee + sum(prizes) == pool` exactly.

use rust_decimal::Decimal;

use crate::engine::ranking::Ranked;
use crate::error::{EngineError, Result};
use crate::types::money::{apply_rate, checked_total};

/// Amounts for one match, in cents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    pub pool_cents: u64,
    pub platform_fee_cents: u64,
    pub distributable_cents: u64,
    /// Prize per ranked row, aligned with the input slice
    pub prizes: Vec<u64>,
}

impl Payout {
    pub fn total_prizes(&self) -> u64 {
        self.prizes.iter().sum()
    }
}

/// Pool, fee and distributable for a match of `participants`.
pub fn pool_amounts(
    entry_fee_cents: u64,
    participants: usize,
    platform_fee_rate: Decimal,
) -> Result<(u64, u64, u64)> {
    let pool = checked_total(entry_fee_cents, participants)
        .ok_or_else(|| EngineError::InvalidInput("prize pool overflows".to_string()))?;
    let fee = apply_rate(pool, platform_fee_rate).ok_or_else(|| {
        EngineError::InvalidInput(format!("invalid platform fee rate {platform_fee_rate}"))
    })?;
    let distributable = pool.checked_sub(fee).ok_or_else(|| {
        EngineError::InvalidInput(format!("platform fee {fee} exceeds pool {pool}"))
    })?;
    Ok((pool, fee, distributable))
}

/// Split the pool across ranked standings.
///
/// `ranked` must come from [`rank`](crate::engine::ranking::rank): sorted by
/// descending score, ties ordered by id.
pub fn split_prize(
    entry_fee_cents: u64,
    platform_fee_rate: Decimal,
    ranked: &[Ranked],
) -> Result<Payout> {
    if ranked.is_empty() {
        return Err(EngineError::InvalidInput(
            "cannot split a prize with no participants".to_string(),
        ));
    }

    let (pool_cents, platform_fee_cents, distributable_cents) =
        pool_amounts(entry_fee_cents, ranked.len(), platform_fee_rate)?;

    let leaders = ranked.iter().take_while(|r| r.rank == 1).count() as u64;
    let share = distributable_cents / leaders;
    let remainder = distributable_cents % leaders;

    let prizes = ranked
        .iter()
        .enumerate()
        .map(|(i, row)| match row.rank {
            1 if (i as u64) < remainder => share + 1,
            1 => share,
            _ => 0,
        })
        .collect();

    Ok(Payout {
        pool_cents,
        platform_fee_cents,
        distributable_cents,
        prizes,
    })
}

// ============================================================================
// Unit Tests
// ============================================================================

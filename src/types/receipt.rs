//! Settlement receipt for a completed match.
//!
//! The receipt is a fixed-size summary of the payout: amounts in cents plus a
//! SHA-256 root over the final standings, so stored results can be checked
//! against what the engine produced.

use serde::ser::SerializeStruct;
use ssz_rs::prelude::*;
use sha2::{Digest, Sha256};

use crate::types::Standing;
use crate::types::money::decimal_to_cents;

/// Settlement receipt summarizing a completed match.
///
/// ## Results Root
///
/// `results_root` hashes every standing in ranking order (id, rank, score,
/// prize in cents). Two engines fed the same roster and answers produce the
/// same root.
///
/// ## Example
///
/// ```
/// use puzzle_arena::types::SettlementReceipt;
///
/// let receipt = SettlementReceipt::new(
///     3,              // participant_count
///     2,              // rounds_played
///     3_000,          // pool_cents
///     180,            // platform_fee_cents
///     2_820,          // distributable_cents
///     [0u8; 32],      // results_root
///     60_000,         // completed_after_ms
/// );
/// assert!(receipt.is_balanced());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct SettlementReceipt {
    pub participant_count: u64,

    pub rounds_played: u64,

    /// Entry fee times participant count
    pub pool_cents: u64,

    pub platform_fee_cents: u64,

    /// Pool minus platform fee; the sum of all prizes
    pub distributable_cents: u64,

    /// SHA-256 over the canonical standings encoding
    pub results_root: [u8; 32],

    /// Milliseconds from the engine's time source origin to completion.
    /// Not a wall-clock timestamp: `SystemTimeSource` counts from its own
    /// creation, `ManualTimeSource` from zero.
    pub completed_after_ms: u64,
}

impl SettlementReceipt {
    pub fn new(
        participant_count: u64,
        rounds_played: u64,
        pool_cents: u64,
        platform_fee_cents: u64,
        distributable_cents: u64,
        results_root: [u8; 32],
        completed_after_ms: u64,
    ) -> Self {
        Self {
            participant_count,
            rounds_played,
            pool_cents,
            platform_fee_cents,
            distributable_cents,
            results_root,
            completed_after_ms,
        }
    }

    /// Compute the results root for a ranked list of standings.
    pub fn compute_results_root(standings: &[Standing]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for standing in standings {
            let id = standing.participant_id.as_bytes();
            hasher.update((id.len() as u64).to_le_bytes());
            hasher.update(id);
            hasher.update(standing.rank.to_le_bytes());
            hasher.update(standing.score.to_le_bytes());
            let prize = decimal_to_cents(standing.prize).unwrap_or_default();
            hasher.update(prize.to_le_bytes());
        }
        let result = hasher.finalize();

        let mut hash = [0u8; 32];
        hash.copy_from_slice(&result);
        hash
    }

    /// Get the results root as a hex string
    pub fn results_root_hex(&self) -> String {
        hex::encode(self.results_root)
    }

    /// Fee plus distributable accounts for the whole pool
    pub fn is_balanced(&self) -> bool {
        self.platform_fee_cents.checked_add(self.distributable_cents) == Some(self.pool_cents)
    }
}

/// Plain-data form for persistence: amounts in cents, root as hex.
impl serde::Serialize for SettlementReceipt {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("SettlementReceipt", 7)?;
        state.serialize_field("participant_count", &self.participant_count)?;
        state.serialize_field("rounds_played", &self.rounds_played)?;
        state.serialize_field("pool_cents", &self.pool_cents)?;
        state.serialize_field("platform_fee_cents", &self.platform_fee_cents)?;
        state.serialize_field("distributable_cents", &self.distributable_cents)?;
        state.serialize_field("results_root", &self.results_root_hex())?;
        state.serialize_field("completed_after_ms", &self.completed_after_ms)?;
        state.end()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

//! Final standings and match results.
//!
//! Results are immutable value data once produced; callers hand them to the
//! persistence and payment collaborators as they see fit.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::SettlementReceipt;

/// One row of the final ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    /// Standard competition rank (1, 1, 3, ...)
    pub rank: u32,
    pub participant_id: String,
    pub display_name: String,
    pub score: u64,
    /// Prize amount with 2 decimal places
    pub prize: Decimal,
}

impl Standing {
    #[inline]
    pub fn is_winner(&self) -> bool {
        self.rank == 1
    }
}

/// Outcome of a completed match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResults {
    pub match_id: String,

    /// Ranked by descending score; ties ordered by participant id
    pub standings: Vec<Standing>,

    pub pool: Decimal,
    pub platform_fee: Decimal,
    pub distributable: Decimal,

    /// Settlement summary stored next to the standings
    pub receipt: SettlementReceipt,
}

impl MatchResults {
    /// Standings sharing rank 1
    pub fn winners(&self) -> impl Iterator<Item = &Standing> {
        self.standings.iter().filter(|s| s.is_winner())
    }

    pub fn standing(&self, participant_id: &str) -> Option<&Standing> {
        self.standings.iter().find(|s| s.participant_id == participant_id)
    }

    /// Sum of all prize amounts
    pub fn total_paid(&self) -> Decimal {
        self.standings.iter().map(|s| s.prize).sum()
    }
}

//! Standard competition ranking.
//!
//! Participants are ordered by descending score. Equal scores share a rank
//! and the next distinct score skips ahead (1, 1, 3). Within a tie, rows are
//! ordered by participant id so the output never depends on roster order.

use crate::types::Participant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranked {
    pub rank: u32,
    pub participant_id: String,
    pub display_name: String,
    pub score: u64,
}

/// Rank participants by cumulative score.
pub fn rank<'a, I>(participants: I) -> Vec<Ranked>
where
    I: IntoIterator<Item = &'a Participant>,
{
    let mut rows: Vec<Ranked> = participants
        .into_iter()
        .map(|p| Ranked {
            rank: 0,
            participant_id: p.id().to_string(),
            display_name: p.display_name().to_string(),
            score: p.score(),
        })
        .collect();

    rows.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.participant_id.cmp(&b.participant_id))
    });

    let mut current_rank = 0u32;
    let mut previous_score = None;
    for (position, row) in rows.iter_mut().enumerate() {
        if previous_score != Some(row.score) {
            current_rank = position as u32 + 1;
            previous_score = Some(row.score);
        }
        row.rank = current_rank;
    }

    rows
}

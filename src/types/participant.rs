//! Participant types for the match engine.
//!
//! A participant's cumulative score only ever grows, and always equals the
//! sum of the points on its per-round records.

use serde::{Deserialize, Serialize};

use crate::types::Answer;

// ============================================================================
// ParticipantInfo
// ============================================================================

/// Identity supplied by the caller before a match starts.
///
/// Both fields are opaque; the engine performs no authenticity checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantInfo {
    pub id: String,
    pub display_name: String,
}

impl ParticipantInfo {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

// ============================================================================
// RoundRecord
// ============================================================================

/// Outcome of one round for one participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundRecord {
    /// 1-based round index
    pub round: u32,

    /// `None` when the round closed without an answer from this participant
    pub answer: Option<Answer>,

    pub correct: bool,

    /// Clock reading at the moment of submission
    pub remaining_ms: u64,

    pub points: u32,
}

impl RoundRecord {
    /// Record for a participant who never answered.
    pub fn missed(round: u32) -> Self {
        Self {
            round,
            answer: None,
            correct: false,
            remaining_ms: 0,
            points: 0,
        }
    }
}

// ============================================================================
// Participant
// ============================================================================

/// One player entered into a match.
///
/// ## Example
///
/// ```
/// use puzzle_arena::types::{Participant, ParticipantInfo};
///
/// let p = Participant::new(ParticipantInfo::new("p-1", "Ada"));
/// assert_eq!(p.score(), 0);
/// assert!(p.records().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    info: ParticipantInfo,
    score: u64,
    records: Vec<RoundRecord>,
}

impl Participant {
    pub fn new(info: ParticipantInfo) -> Self {
        Self {
            info,
            score: 0,
            records: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.info.id
    }

    #[inline]
    pub fn display_name(&self) -> &str {
        &self.info.display_name
    }

    #[inline]
    pub fn info(&self) -> &ParticipantInfo {
        &self.info
    }

    /// Cumulative score across all closed and open rounds
    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Per-round records in round order
    #[inline]
    pub fn records(&self) -> &[RoundRecord] {
        &self.records
    }

    /// Whether a record already exists for `round`
    pub fn has_record(&self, round: u32) -> bool {
        self.records.last().is_some_and(|r| r.round == round)
    }

    /// Append a round record and credit its points.
    pub(crate) fn record(&mut self, record: RoundRecord) {
        self.score = self.score.saturating_add(u64::from(record.points));
        self.records.push(record);
    }

    /// Sum of points over the per-round records
    pub fn points_total(&self) -> u64 {
        self.records.iter().map(|r| u64::from(r.points)).sum()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn correct(round: u32, points: u32) -> RoundRecord {
        RoundRecord {
            round,
            answer: Some(Answer::Graded(true)),
            correct: true,
            remaining_ms: 10_000,
            points,
        }
    }

    #[test]
    fn test_participant_new() {
        let p = Participant::new(ParticipantInfo::new("a", "Alice"));
        assert_eq!(p.id(), "a");
        assert_eq!(p.display_name(), "Alice");
        assert_eq!(p.score(), 0);
        assert!(!p.has_record(1));
    }

    #[test]
    fn test_record_accumulates_score() {
        let mut p = Participant::new(ParticipantInfo::new("a", "Alice"));
        p.record(correct(1, 950));
        p.record(RoundRecord::missed(2));
        p.record(correct(3, 400));

        assert_eq!(p.score(), 1_350);
        assert_eq!(p.score(), p.points_total());
        assert_eq!(p.records().len(), 3);
        assert!(p.has_record(3));
        assert!(!p.has_record(4));
    }

    #[test]
    fn test_missed_record() {
        let r = RoundRecord::missed(2);
        assert_eq!(r.round, 2);
        assert!(r.answer.is_none());
        assert!(!r.correct);
        assert_eq!(r.points, 0);
    }
}

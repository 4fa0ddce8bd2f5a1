//! Practice opponents.
//!
//! A [`PracticeBot`] is an ordinary roster member whose answers are chosen by
//! a seeded RNG. Bots reach the engine only through
//! [`MatchEngine::submit_answer`], exactly like a remote player, so the
//! engine has no notion of who is a bot.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use puzzle_arena::practice::{play_practice_round, BotProfile, PracticeBot};
//! use puzzle_arena::{ManualTimeSource, MatchConfig, MatchEngine, MatchState};
//! use puzzle_arena::types::RoundContent;
//!
//! let mut bots = vec![
//!     PracticeBot::new("bot-1", "Quick", BotProfile::new(0.9, 1_000, 8_000).unwrap(), 1),
//!     PracticeBot::new("bot-2", "Slow", BotProfile::new(0.5, 5_000, 40_000).unwrap(), 2),
//! ];
//! let roster = bots.iter().map(|b| b.info().clone()).collect();
//!
//! let time = Arc::new(ManualTimeSource::new());
//! let mut engine = MatchEngine::with_time_source(
//!     MatchConfig::default(),
//!     roster,
//!     vec![RoundContent::new("q", "a"); 3],
//!     time.clone(),
//! ).unwrap();
//!
//! engine.start().unwrap();
//! while engine.state() == MatchState::InProgress {
//!     play_practice_round(&mut engine, &time, &mut bots).unwrap();
//! }
//! assert!(engine.results().is_ok());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::clock::{ManualTimeSource, TimeSource};
use crate::engine::{MatchEngine, MatchState};
use crate::error::{EngineError, Result};
use crate::types::{Answer, ParticipantInfo};

/// How a bot plays: accuracy and answer-delay window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotProfile {
    accuracy: f64,
    min_delay_ms: u64,
    max_delay_ms: u64,
}

impl BotProfile {
    /// `accuracy` must lie in [0, 1] and `min_delay_ms <= max_delay_ms`.
    pub fn new(accuracy: f64, min_delay_ms: u64, max_delay_ms: u64) -> Result<Self> {
        if !(0.0..=1.0).contains(&accuracy) {
            return Err(EngineError::InvalidInput(format!(
                "bot accuracy {accuracy} outside [0, 1]"
            )));
        }
        if min_delay_ms > max_delay_ms {
            return Err(EngineError::InvalidInput(format!(
                "bot delay window {min_delay_ms}..{max_delay_ms} is empty"
            )));
        }
        Ok(Self {
            accuracy,
            min_delay_ms,
            max_delay_ms,
        })
    }

    #[inline]
    pub fn accuracy(&self) -> f64 {
        self.accuracy
    }
}

/// A planned answer: submit `answer` after `delay_ms` into the round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotMove {
    pub participant_id: String,
    pub delay_ms: u64,
    pub answer: Answer,
}

#[derive(Debug, Clone)]
pub struct PracticeBot {
    info: ParticipantInfo,
    profile: BotProfile,
    rng: ChaCha8Rng,
}

impl PracticeBot {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        profile: BotProfile,
        seed: u64,
    ) -> Self {
        Self {
            info: ParticipantInfo::new(id, display_name),
            profile,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn info(&self) -> &ParticipantInfo {
        &self.info
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.info.id
    }

    /// Decide this round's move. `None` means the bot lets the clock run out.
    pub fn plan(&mut self, round_duration_ms: u64) -> Option<BotMove> {
        let delay_ms = self
            .rng
            .gen_range(self.profile.min_delay_ms..=self.profile.max_delay_ms);
        let correct = self.rng.gen_bool(self.profile.accuracy);
        if delay_ms >= round_duration_ms {
            return None;
        }
        Some(BotMove {
            participant_id: self.info.id.clone(),
            delay_ms,
            answer: Answer::Graded(correct),
        })
    }
}

/// Play the open round to its close with every bot on a manual clock.
///
/// Must be called right after the round opens; bot delays are measured from
/// the current time. Bots not on the roster are rejected by the engine.
pub fn play_practice_round(
    engine: &mut MatchEngine,
    time: &ManualTimeSource,
    bots: &mut [PracticeBot],
) -> Result<()> {
    if engine.state() != MatchState::InProgress {
        return Err(EngineError::InvalidState("no practice round to play".to_string()));
    }
    let round = engine
        .current_round()
        .ok_or_else(|| EngineError::InvalidState("no round is open".to_string()))?;
    let round_index = round.index;
    let duration_ms = round.duration_ms();
    let opened_at = time.now_ms();

    let mut moves: Vec<BotMove> = bots.iter_mut().filter_map(|b| b.plan(duration_ms)).collect();
    moves.sort_by(|a, b| {
        a.delay_ms
            .cmp(&b.delay_ms)
            .then_with(|| a.participant_id.cmp(&b.participant_id))
    });

    for bot_move in moves {
        time.set_ms(opened_at + bot_move.delay_ms);
        debug!(
            participant_id = %bot_move.participant_id,
            round = round_index,
            delay_ms = bot_move.delay_ms,
            "practice bot answering"
        );
        let submission = engine.submit_answer(&bot_move.participant_id, bot_move.answer)?;
        if submission.closed_round {
            return Ok(());
        }
    }

    time.set_ms(opened_at + duration_ms);
    engine.tick()?;
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchConfig;
    use crate::types::{CloseReason, RoundContent};
    use std::sync::Arc;

    fn profile(accuracy: f64, min: u64, max: u64) -> BotProfile {
        BotProfile::new(accuracy, min, max).unwrap()
    }

    #[test]
    fn test_profile_validation() {
        assert!(BotProfile::new(1.5, 0, 10).is_err());
        assert!(BotProfile::new(f64::NAN, 0, 10).is_err());
        assert!(BotProfile::new(0.5, 10, 5).is_err());
        assert!(BotProfile::new(0.0, 5, 5).is_ok());
    }

    #[test]
    fn test_plan_is_deterministic_per_seed() {
        let mut a = PracticeBot::new("a", "A", profile(0.5, 0, 29_000), 7);
        let mut b = PracticeBot::new("a", "A", profile(0.5, 0, 29_000), 7);
        for _ in 0..20 {
            assert_eq!(a.plan(30_000), b.plan(30_000));
        }
    }

    #[test]
    fn test_plan_respects_profile() {
        let mut perfect = PracticeBot::new("p", "P", profile(1.0, 2_000, 3_000), 1);
        for _ in 0..50 {
            let m = perfect.plan(30_000).unwrap();
            assert!((2_000..=3_000).contains(&m.delay_ms));
            assert_eq!(m.answer, Answer::Graded(true));
        }

        let mut sleeper = PracticeBot::new("s", "S", profile(1.0, 60_000, 90_000), 1);
        assert!(sleeper.plan(30_000).is_none());
    }

    #[test]
    fn test_practice_round_closes_early_when_all_bots_answer() {
        let mut bots = vec![
            PracticeBot::new("a", "A", profile(1.0, 1_000, 2_000), 1),
            PracticeBot::new("b", "B", profile(0.0, 3_000, 4_000), 2),
        ];
        let time = Arc::new(ManualTimeSource::new());
        let mut engine = MatchEngine::with_time_source(
            MatchConfig::default(),
            bots.iter().map(|b| b.info().clone()).collect(),
            vec![RoundContent::new("q", "a")],
            time.clone(),
        )
        .unwrap();
        engine.start().unwrap();

        play_practice_round(&mut engine, &time, &mut bots).unwrap();

        assert_eq!(engine.state(), MatchState::Completed);
        assert_eq!(engine.rounds()[0].close_reason, Some(CloseReason::AllAnswered));
        assert!(time.now_ms() <= 4_000);
        let results = engine.results().unwrap();
        assert_eq!(results.standings[0].participant_id, "a");
        assert_eq!(results.standings[1].score, 0);
    }

    #[test]
    fn test_practice_round_runs_out_the_clock() {
        let mut bots = vec![
            PracticeBot::new("a", "A", profile(1.0, 1_000, 1_000), 1),
            PracticeBot::new("b", "B", profile(1.0, 45_000, 50_000), 2),
        ];
        let time = Arc::new(ManualTimeSource::new());
        let mut engine = MatchEngine::with_time_source(
            MatchConfig::default(),
            bots.iter().map(|b| b.info().clone()).collect(),
            vec![RoundContent::new("q", "a"); 2],
            time.clone(),
        )
        .unwrap();
        engine.start().unwrap();

        play_practice_round(&mut engine, &time, &mut bots).unwrap();

        assert_eq!(engine.rounds()[0].close_reason, Some(CloseReason::Expired));
        assert_eq!(engine.current_round().map(|r| r.index), Some(2));
        assert_eq!(engine.participant("a").unwrap().score(), 990);
        assert_eq!(engine.participant("b").unwrap().score(), 0);
    }
}

//! The match state machine.
//!
//! ## Lifecycle
//!
//! ```text
//! NotStarted --start()--> InProgress --(last round closes)--> Completed
//! ```
//!
//! While `InProgress` exactly one round is open. A round closes when its
//! clock expires or when every roster member has answered it; the next
//! round opens immediately. Closing the final round ranks the roster, splits
//! the prize and freezes the results.
//!
//! ## Rejections
//!
//! Every error returned from a public method leaves scores, records and
//! round state untouched. The one exception is clock expiry discovered on
//! entry: that expiry is processed (the round closes) before the call is
//! rejected, because it already happened.

use std::sync::Arc;

use tracing::{debug, info};

use crate::clock::{RoundClock, SystemTimeSource, TimeSource};
use crate::config::MatchConfig;
use crate::engine::events::MatchEvent;
use crate::engine::prize::{pool_amounts, split_prize};
use crate::engine::ranking::rank;
use crate::error::{EngineError, Result};
use crate::roster::Roster;
use crate::types::money::{cents_to_decimal, exact_cents};
use crate::types::{
    Answer, CloseReason, MatchResults, Participant, ParticipantInfo, Round, RoundContent,
    RoundRecord, SettlementReceipt, Standing,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchState {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

/// Outcome of an accepted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub round: u32,
    pub correct: bool,
    pub points: u32,
    /// Cumulative score after this answer
    pub total: u64,
    /// Whether this answer was the last one the round was waiting for
    pub closed_round: bool,
}

/// Round-based match engine.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use puzzle_arena::{Answer, ManualTimeSource, MatchConfig, MatchEngine, MatchState};
/// use puzzle_arena::types::{ParticipantInfo, RoundContent};
///
/// let time = Arc::new(ManualTimeSource::new());
/// let mut engine = MatchEngine::with_time_source(
///     MatchConfig::default(),
///     vec![ParticipantInfo::new("a", "Ada"), ParticipantInfo::new("b", "Bo")],
///     vec![RoundContent::new("capital of France?", "Paris")],
///     time.clone(),
/// ).unwrap();
///
/// engine.start().unwrap();
/// time.advance_secs(3);
/// engine.submit_answer("a", Answer::Text("paris".into())).unwrap();
/// engine.submit_answer("b", Answer::Text("Lyon".into())).unwrap();
///
/// assert_eq!(engine.state(), MatchState::Completed);
/// let results = engine.results().unwrap();
/// assert_eq!(results.standings[0].participant_id, "a");
/// ```
#[derive(Debug)]
pub struct MatchEngine {
    config: MatchConfig,
    entry_fee_cents: u64,
    roster: Roster,
    rounds: Vec<Round>,
    /// Position of the open round in `rounds`
    current: Option<usize>,
    state: MatchState,
    clock: RoundClock,
    events: Vec<MatchEvent>,
    results: Option<MatchResults>,
}

impl MatchEngine {
    /// Create an engine timed by the system clock.
    pub fn new(
        config: MatchConfig,
        participants: Vec<ParticipantInfo>,
        rounds: Vec<RoundContent>,
    ) -> Result<Self> {
        Self::with_time_source(config, participants, rounds, Arc::new(SystemTimeSource::new()))
    }

    /// Create an engine timed by an arbitrary time source.
    pub fn with_time_source(
        config: MatchConfig,
        participants: Vec<ParticipantInfo>,
        rounds: Vec<RoundContent>,
        time: Arc<dyn TimeSource>,
    ) -> Result<Self> {
        config.validate()?;
        if rounds.is_empty() {
            return Err(EngineError::InvalidInput("a match needs at least one round".to_string()));
        }
        let round_count = u32::try_from(rounds.len())
            .map_err(|_| EngineError::InvalidInput("too many rounds".to_string()))?;

        let roster = Roster::new(participants)?;
        let entry_fee_cents = exact_cents(config.entry_fee).ok_or_else(|| {
            EngineError::InvalidInput(format!("invalid entry fee {}", config.entry_fee))
        })?;
        // Surface overflow now rather than at completion
        pool_amounts(entry_fee_cents, roster.len(), config.platform_fee_rate)?;

        let rounds = (1..=round_count)
            .zip(rounds)
            .map(|(index, content)| Round::new(index, content, config.round_duration_secs))
            .collect();

        Ok(Self {
            config,
            entry_fee_cents,
            roster,
            rounds,
            current: None,
            state: MatchState::NotStarted,
            clock: RoundClock::new(time),
            events: Vec::new(),
            results: None,
        })
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn state(&self) -> MatchState {
        self.state
    }

    #[inline]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[inline]
    pub fn match_id(&self) -> &str {
        &self.config.match_id
    }

    #[inline]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn participant(&self, id: &str) -> Option<&Participant> {
        self.roster.get(id)
    }

    #[inline]
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// The open round, if any
    pub fn current_round(&self) -> Option<&Round> {
        self.current.and_then(|i| self.rounds.get(i))
    }

    /// Time left in the open round (0 when none is open)
    pub fn remaining_ms(&self) -> u64 {
        self.clock.remaining_ms()
    }

    /// Events queued since the last drain
    pub fn pending_events(&self) -> &[MatchEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<MatchEvent> {
        std::mem::take(&mut self.events)
    }

    /// Final standings and payouts; only available once completed.
    pub fn results(&self) -> Result<&MatchResults> {
        self.results
            .as_ref()
            .ok_or_else(|| EngineError::InvalidState(format!("match is {:?}", self.state)))
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Start the match and open round 1.
    pub fn start(&mut self) -> Result<()> {
        if self.state != MatchState::NotStarted {
            return Err(EngineError::InvalidState(format!(
                "cannot start a match that is {:?}",
                self.state
            )));
        }
        self.clock.start(i64::from(self.config.round_duration_secs))?;

        self.state = MatchState::InProgress;
        self.events.push(MatchEvent::MatchStarted {
            match_id: self.config.match_id.clone(),
            participants: self.roster.len(),
            rounds: self.rounds.len() as u32,
        });
        info!(
            match_id = %self.config.match_id,
            participants = self.roster.len(),
            rounds = self.rounds.len(),
            "match started"
        );
        self.activate(0);
        Ok(())
    }

    /// Submit a participant's answer for the open round.
    ///
    /// The first answer per participant per round is authoritative; later
    /// ones fail with `DuplicateAnswer` and change nothing.
    pub fn submit_answer(&mut self, participant_id: &str, answer: Answer) -> Result<Submission> {
        self.require_in_progress()?;

        if self.poll_expiry()? {
            let closed = self.rounds[self.last_closed_position()].index;
            debug!(participant_id, round = closed, "answer arrived after expiry");
            return Err(EngineError::InvalidState(format!(
                "round {closed} closed before the answer was received"
            )));
        }

        let position = self
            .current
            .ok_or_else(|| EngineError::InvalidState("no round is open".to_string()))?;
        let round = &self.rounds[position];
        let round_index = round.index;

        let participant = self.roster.get_mut(participant_id).map_err(|e| {
            debug!(participant_id, "answer from unknown participant");
            e
        })?;
        if participant.has_record(round_index) {
            debug!(participant_id, round = round_index, "duplicate answer rejected");
            return Err(EngineError::DuplicateAnswer {
                participant_id: participant_id.to_string(),
                round: round_index,
            });
        }

        let remaining_ms = self.clock.remaining_ms();
        let correct = answer.is_correct(&round.content.answer_key);
        let points = self.config.scoring.score(
            correct,
            i64::try_from(remaining_ms).unwrap_or(i64::MAX),
            i64::try_from(round.duration_ms()).unwrap_or(i64::MAX),
        )?;

        participant.record(RoundRecord {
            round: round_index,
            answer: Some(answer),
            correct,
            remaining_ms,
            points,
        });
        let total = participant.score();

        let round = &mut self.rounds[position];
        round.answers += 1;
        let all_answered = round.answers == self.roster.len();

        debug!(participant_id, round = round_index, correct, points, total, "answer accepted");
        self.events.push(MatchEvent::AnswerAccepted {
            participant_id: participant_id.to_string(),
            round: round_index,
            correct,
            points,
            total,
        });

        if all_answered {
            self.close_current(CloseReason::AllAnswered)?;
        }

        Ok(Submission {
            round: round_index,
            correct,
            points,
            total,
            closed_round: all_answered,
        })
    }

    /// Process clock expiry. Returns whether a round closed.
    ///
    /// Hosts call this on a schedule; it is a no-op outside `InProgress`.
    pub fn tick(&mut self) -> Result<bool> {
        if self.state != MatchState::InProgress {
            return Ok(false);
        }
        self.poll_expiry()
    }

    // ========================================================================
    // Round advancement
    // ========================================================================

    fn require_in_progress(&self) -> Result<()> {
        match self.state {
            MatchState::InProgress => Ok(()),
            state => Err(EngineError::InvalidState(format!(
                "no round is open while the match is {state:?}"
            ))),
        }
    }

    fn poll_expiry(&mut self) -> Result<bool> {
        if self.current.is_some() && self.clock.poll_expiry() {
            self.close_current(CloseReason::Expired)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Position of the most recently closed round.
    fn last_closed_position(&self) -> usize {
        match self.current {
            Some(position) => position.saturating_sub(1),
            None => self.rounds.len() - 1,
        }
    }

    fn activate(&mut self, position: usize) {
        let round = &mut self.rounds[position];
        round.open();
        self.current = Some(position);

        info!(
            match_id = %self.config.match_id,
            round = round.index,
            duration_secs = round.duration_secs,
            "round opened"
        );
        self.events.push(MatchEvent::RoundOpened {
            round: round.index,
            duration_secs: round.duration_secs,
        });
    }

    fn close_current(&mut self, reason: CloseReason) -> Result<()> {
        let Some(position) = self.current else {
            return Ok(());
        };
        self.clock.stop();

        let round = &mut self.rounds[position];
        round.close(reason);
        let index = round.index;

        for participant in self.roster.iter_mut() {
            if !participant.has_record(index) {
                participant.record(RoundRecord::missed(index));
            }
        }

        info!(match_id = %self.config.match_id, round = index, ?reason, "round closed");
        self.events.push(MatchEvent::RoundClosed { round: index, reason });

        let next = position + 1;
        if next < self.rounds.len() {
            self.clock.start(i64::from(self.rounds[next].duration_secs))?;
            self.activate(next);
        } else {
            self.current = None;
            self.complete()?;
        }
        Ok(())
    }

    fn complete(&mut self) -> Result<()> {
        let ranked = rank(self.roster.iter());
        let payout = split_prize(self.entry_fee_cents, self.config.platform_fee_rate, &ranked)?;

        let standings: Vec<Standing> = ranked
            .into_iter()
            .zip(&payout.prizes)
            .map(|(row, &prize_cents)| Standing {
                rank: row.rank,
                participant_id: row.participant_id,
                display_name: row.display_name,
                score: row.score,
                prize: cents_to_decimal(prize_cents),
            })
            .collect();

        let receipt = SettlementReceipt::new(
            standings.len() as u64,
            self.rounds.len() as u64,
            payout.pool_cents,
            payout.platform_fee_cents,
            payout.distributable_cents,
            SettlementReceipt::compute_results_root(&standings),
            self.clock.now_ms(),
        );

        let winners: Vec<String> = standings
            .iter()
            .filter(|s| s.is_winner())
            .map(|s| s.participant_id.clone())
            .collect();

        info!(
            match_id = %self.config.match_id,
            winners = ?winners,
            distributable_cents = payout.distributable_cents,
            results_root = %receipt.results_root_hex(),
            "match completed"
        );

        self.results = Some(MatchResults {
            match_id: self.config.match_id.clone(),
            standings,
            pool: cents_to_decimal(payout.pool_cents),
            platform_fee: cents_to_decimal(payout.platform_fee_cents),
            distributable: cents_to_decimal(payout.distributable_cents),
            receipt,
        });
        self.state = MatchState::Completed;
        self.events.push(MatchEvent::MatchCompleted { winners });
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualTimeSource;
    use crate::types::RoundState;

    fn setup(players: &[&str], rounds: usize) -> (Arc<ManualTimeSource>, MatchEngine) {
        let time = Arc::new(ManualTimeSource::new());
        let roster = players
            .iter()
            .map(|id| ParticipantInfo::new(*id, id.to_uppercase()))
            .collect();
        let content = (0..rounds)
            .map(|i| RoundContent::new(format!("q{i}"), format!("a{i}")))
            .collect();
        let engine =
            MatchEngine::with_time_source(MatchConfig::default(), roster, content, time.clone())
                .unwrap();
        (time, engine)
    }

    #[test]
    fn test_construction_validates_inputs() {
        let time: Arc<dyn TimeSource> = Arc::new(ManualTimeSource::new());
        let one = || vec![ParticipantInfo::new("a", "A")];

        let no_rounds =
            MatchEngine::with_time_source(MatchConfig::default(), one(), vec![], time.clone());
        assert!(matches!(no_rounds, Err(EngineError::InvalidInput(_))));

        let no_players = MatchEngine::with_time_source(
            MatchConfig::default(),
            vec![],
            vec![RoundContent::default()],
            time.clone(),
        );
        assert!(matches!(no_players, Err(EngineError::InvalidInput(_))));

        let mut config = MatchConfig::default();
        config.round_duration_secs = 0;
        let bad_config =
            MatchEngine::with_time_source(config, one(), vec![RoundContent::default()], time);
        assert!(matches!(bad_config, Err(EngineError::InvalidDuration(0))));
    }

    #[test]
    fn test_start_opens_first_round() {
        let (_, mut engine) = setup(&["a", "b"], 2);
        assert_eq!(engine.state(), MatchState::NotStarted);
        assert!(engine.current_round().is_none());

        engine.start().unwrap();

        assert_eq!(engine.state(), MatchState::InProgress);
        assert_eq!(engine.current_round().map(|r| r.index), Some(1));
        assert_eq!(engine.rounds()[1].state, RoundState::Pending);
        assert_eq!(engine.remaining_ms(), 30_000);
        assert!(matches!(engine.start(), Err(EngineError::InvalidState(_))));
    }

    #[test]
    fn test_submit_before_start_rejected() {
        let (_, mut engine) = setup(&["a"], 1);
        let err = engine.submit_answer("a", Answer::Graded(true));
        assert!(matches!(err, Err(EngineError::InvalidState(_))));
        assert_eq!(engine.participant("a").unwrap().score(), 0);
    }

    #[test]
    fn test_unknown_participant_rejected() {
        let (_, mut engine) = setup(&["a", "b"], 1);
        engine.start().unwrap();
        assert_eq!(
            engine.submit_answer("mallory", Answer::Graded(true)),
            Err(EngineError::UnknownParticipant("mallory".to_string()))
        );
        assert_eq!(engine.current_round().unwrap().answers, 0);
    }

    #[test]
    fn test_duplicate_answer_does_not_change_score() {
        let (time, mut engine) = setup(&["a", "b"], 1);
        engine.start().unwrap();

        time.advance_secs(10);
        let first = engine.submit_answer("a", Answer::Text("wrong".into())).unwrap();
        assert_eq!(first.points, 0);

        let second = engine.submit_answer("a", Answer::Text("a0".into()));
        assert_eq!(
            second,
            Err(EngineError::DuplicateAnswer {
                participant_id: "a".to_string(),
                round: 1
            })
        );
        assert_eq!(engine.participant("a").unwrap().score(), 0);
        assert_eq!(engine.participant("a").unwrap().records().len(), 1);
    }

    #[test]
    fn test_round_closes_when_all_answered() {
        let (time, mut engine) = setup(&["a", "b"], 2);
        engine.start().unwrap();
        engine.drain_events();

        time.advance_secs(2);
        let first = engine.submit_answer("a", Answer::Graded(true)).unwrap();
        assert!(!first.closed_round);
        let last = engine.submit_answer("b", Answer::Graded(true)).unwrap();
        assert!(last.closed_round);

        assert_eq!(engine.rounds()[0].close_reason, Some(CloseReason::AllAnswered));
        assert_eq!(engine.current_round().map(|r| r.index), Some(2));
        assert_eq!(engine.remaining_ms(), 30_000);

        let events = engine.drain_events();
        assert!(events.contains(&MatchEvent::RoundClosed {
            round: 1,
            reason: CloseReason::AllAnswered
        }));
        assert!(events.contains(&MatchEvent::RoundOpened {
            round: 2,
            duration_secs: 30
        }));
    }

    #[test]
    fn test_expiry_closes_round_and_records_misses() {
        let (time, mut engine) = setup(&["a", "b"], 2);
        engine.start().unwrap();

        time.advance_secs(5);
        engine.submit_answer("a", Answer::Graded(true)).unwrap();

        time.advance_secs(25);
        assert!(engine.tick().unwrap());
        assert!(!engine.tick().unwrap());

        assert_eq!(engine.rounds()[0].close_reason, Some(CloseReason::Expired));
        let b = engine.participant("b").unwrap();
        assert_eq!(b.records(), [RoundRecord::missed(1)]);
        assert_eq!(engine.current_round().map(|r| r.index), Some(2));
    }

    #[test]
    fn test_late_answer_not_credited_to_next_round() {
        let (time, mut engine) = setup(&["a", "b"], 2);
        engine.start().unwrap();

        time.advance_secs(30);
        let err = engine.submit_answer("a", Answer::Graded(true));
        assert!(matches!(err, Err(EngineError::InvalidState(_))));

        // round 2 opened with nobody's answer in it
        let round = engine.current_round().unwrap();
        assert_eq!(round.index, 2);
        assert_eq!(round.answers, 0);
        assert_eq!(engine.participant("a").unwrap().score(), 0);

        // the participant can still answer round 2
        assert!(engine.submit_answer("a", Answer::Graded(true)).is_ok());
    }

    #[test]
    fn test_results_only_after_completion() {
        let (time, mut engine) = setup(&["a"], 1);
        assert!(matches!(engine.results(), Err(EngineError::InvalidState(_))));
        engine.start().unwrap();
        assert!(engine.results().is_err());

        time.advance_secs(1);
        engine.submit_answer("a", Answer::Graded(true)).unwrap();

        assert_eq!(engine.state(), MatchState::Completed);
        let results = engine.results().unwrap();
        assert_eq!(results.standings.len(), 1);
        assert_eq!(results.standings[0].score, 990);
        assert_eq!(results.distributable.to_string(), "9.40");
    }

    #[test]
    fn test_completed_match_is_frozen() {
        let (time, mut engine) = setup(&["a"], 1);
        engine.start().unwrap();
        engine.submit_answer("a", Answer::Graded(true)).unwrap();
        let before = engine.results().unwrap().clone();

        time.advance_secs(100);
        assert!(!engine.tick().unwrap());
        assert!(matches!(
            engine.submit_answer("a", Answer::Graded(true)),
            Err(EngineError::InvalidState(_))
        ));
        assert!(engine.start().is_err());
        assert_eq!(engine.results().unwrap(), &before);
    }

    #[test]
    fn test_event_order_for_single_round() {
        let (_, mut engine) = setup(&["a"], 1);
        engine.start().unwrap();
        engine.submit_answer("a", Answer::Text("A0".into())).unwrap();

        let events = engine.drain_events();
        assert!(matches!(events[0], MatchEvent::MatchStarted { participants: 1, rounds: 1, .. }));
        assert!(matches!(events[1], MatchEvent::RoundOpened { round: 1, .. }));
        assert!(matches!(
            events[2],
            MatchEvent::AnswerAccepted { correct: true, points: 1_000, .. }
        ));
        assert!(matches!(
            events[3],
            MatchEvent::RoundClosed { round: 1, reason: CloseReason::AllAnswered }
        ));
        assert_eq!(
            events[4],
            MatchEvent::MatchCompleted { winners: vec!["a".to_string()] }
        );
        assert!(engine.pending_events().is_empty());
    }
}

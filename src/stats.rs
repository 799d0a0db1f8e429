//! Session statistics: risk exposure, luck, decision accuracy and record.
//!
//! [`SessionStatistics`] lives for a whole session. Only the per-hand win
//! chance fields are cleared between rounds; every history keeps growing.

use log::debug;
use serde::Serialize;

use crate::deck::Card;
use crate::error::EngineError;
use crate::strategy::{optimal_action, Action};

/// A hit is risky above this bust probability.
pub const RISKY_BUST_PROBABILITY: f64 = 0.4;

/// A stand is risky below this win probability.
pub const RISKY_WIN_PROBABILITY: f64 = 0.3;

/// How a round ended for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundOutcome {
    Win,
    Loss,
    Push,
}

impl RoundOutcome {
    /// Score used for luck: a push is worth half a win.
    pub fn score(self) -> f64 {
        match self {
            RoundOutcome::Win => 1.0,
            RoundOutcome::Push => 0.5,
            RoundOutcome::Loss => 0.0,
        }
    }

    /// Entry stored in the win/loss history, `None` for a push.
    pub fn history_value(self) -> Option<u8> {
        match self {
            RoundOutcome::Win => Some(1),
            RoundOutcome::Loss => Some(0),
            RoundOutcome::Push => None,
        }
    }
}

/// One graded decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRecord {
    pub action: Action,
    pub optimal: Action,
    pub is_correct: bool,
}

/// What [`SessionStatistics::record_action`] derived from an action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionRecord {
    pub decision: DecisionRecord,
    pub risk: f64,
    pub is_risky: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SessionStatistics {
    total_plays: u64,
    risky_plays: u64,
    risk_history: Vec<f64>,
    risk_average: f64,
    win_chance: f64,
    win_chance_at_stand: Option<f64>,
    win_chance_history: Vec<f64>,
    luck_factor: f64,
    luck_history: Vec<f64>,
    perfect_play_count: u64,
    total_decisions: u64,
    perfect_play_percent: f64,
    decision_history: Vec<DecisionRecord>,
    win_loss_history: Vec<Option<u8>>,
}

impl SessionStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grades and records a hit or stand.
    ///
    /// `bust_probability` and `win_probability` are the live odds for the
    /// hand the action was taken on. Both must be finite and within [0, 1],
    /// otherwise nothing is recorded.
    pub fn record_action(
        &mut self,
        action: Action,
        player: &[Card],
        upcard: Card,
        bust_probability: f64,
        win_probability: f64,
    ) -> Result<ActionRecord, EngineError> {
        check_probability(bust_probability)?;
        check_probability(win_probability)?;

        self.total_plays += 1;
        self.total_decisions += 1;

        let optimal = optimal_action(player, upcard);
        let is_correct = action == optimal;
        if is_correct {
            self.perfect_play_count += 1;
        }
        self.perfect_play_percent = self.perfect_play_count as f64 / self.total_decisions as f64;

        let decision = DecisionRecord {
            action,
            optimal,
            is_correct,
        };
        self.decision_history.push(decision);

        debug!(
            "Move: {} | Optimal: {} | Perfect: {:.1}%",
            action.name(),
            optimal.name(),
            self.perfect_play_percent * 100.0
        );

        let (risk, is_risky) = match action {
            Action::Hit => (bust_probability, bust_probability > RISKY_BUST_PROBABILITY),
            Action::Stand => {
                self.win_chance_at_stand = Some(win_probability);
                self.win_chance_history.push(win_probability);
                (1.0 - win_probability, win_probability < RISKY_WIN_PROBABILITY)
            }
        };

        if is_risky {
            self.risky_plays += 1;
        }
        self.risk_history.push(risk);
        self.risk_average = mean(&self.risk_history);

        Ok(ActionRecord {
            decision,
            risk,
            is_risky,
        })
    }

    /// Appends the round result and, if the player stood this round, a luck
    /// sample. Returns the luck sample when one was taken.
    pub fn record_round_outcome(&mut self, outcome: RoundOutcome) -> Option<f64> {
        self.win_loss_history.push(outcome.history_value());

        // Rounds that ended without a stand (bust, natural) have no expectation
        let at_stand = self.win_chance_at_stand?;
        let luck = outcome.score() - at_stand;
        self.luck_factor += luck;
        self.luck_history.push(luck);

        debug!(
            "Luck: result {:.1} - chance {:.2} = {:+.2} | total {:+.2}",
            outcome.score(),
            at_stand,
            luck,
            self.luck_factor
        );

        Some(luck)
    }

    /// Clears the per-hand fields at the start of a round.
    pub fn reset_per_hand(&mut self) {
        self.win_chance = 0.0;
        self.win_chance_at_stand = None;
    }

    /// Stores the live win estimate for the current hand.
    pub fn set_win_chance(&mut self, win_chance: f64) -> Result<(), EngineError> {
        check_probability(win_chance)?;
        self.win_chance = win_chance;
        Ok(())
    }

    pub fn total_plays(&self) -> u64 {
        self.total_plays
    }

    pub fn risky_plays(&self) -> u64 {
        self.risky_plays
    }

    pub fn risk_history(&self) -> &[f64] {
        &self.risk_history
    }

    pub fn risk_average(&self) -> f64 {
        self.risk_average
    }

    pub fn win_chance(&self) -> f64 {
        self.win_chance
    }

    /// Win probability snapshot from this round's stand, `None` before it.
    pub fn win_chance_at_stand(&self) -> Option<f64> {
        self.win_chance_at_stand
    }

    pub fn win_chance_history(&self) -> &[f64] {
        &self.win_chance_history
    }

    pub fn luck_factor(&self) -> f64 {
        self.luck_factor
    }

    pub fn luck_history(&self) -> &[f64] {
        &self.luck_history
    }

    pub fn perfect_play_count(&self) -> u64 {
        self.perfect_play_count
    }

    pub fn total_decisions(&self) -> u64 {
        self.total_decisions
    }

    pub fn perfect_play_percent(&self) -> f64 {
        self.perfect_play_percent
    }

    pub fn decision_history(&self) -> &[DecisionRecord] {
        &self.decision_history
    }

    pub fn win_loss_history(&self) -> &[Option<u8>] {
        &self.win_loss_history
    }

    /// Rounds won over rounds decided, pushes excluded.
    pub fn win_rate(&self) -> f64 {
        let decided = self.win_loss_history.iter().flatten().count();
        if decided == 0 {
            0.0
        } else {
            let wins = self.win_loss_history.iter().flatten().filter(|&&r| r == 1).count();
            wins as f64 / decided as f64
        }
    }
}

fn check_probability(p: f64) -> Result<(), EngineError> {
    if p.is_finite() && (0.0..=1.0).contains(&p) {
        Ok(())
    } else {
        Err(EngineError::ProbabilityOutOfRange(p))
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Summary of one figure across many sessions.
///
/// Keeps a running mean and sum of squared deviations (Welford), so
/// batches collected on different threads merge without losing precision.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SampleStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: Option<f64>,
    max: Option<f64>,
}

impl SampleStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, x: f64) {
        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);
        self.min = Some(self.min.map_or(x, |m| m.min(x)));
        self.max = Some(self.max.map_or(x, |m| m.max(x)));
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean of the samples, 0 when empty.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn min(&self) -> Option<f64> {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Unbiased sample variance, `None` with fewer than two samples.
    pub fn variance(&self) -> Option<f64> {
        (self.count >= 2).then(|| self.m2 / (self.count - 1) as f64)
    }

    pub fn std_dev(&self) -> Option<f64> {
        self.variance().map(f64::sqrt)
    }

    /// Standard error of the mean, `None` with fewer than two samples.
    pub fn sem(&self) -> Option<f64> {
        self.variance().map(|v| (v / self.count as f64).sqrt())
    }

    /// Folds another batch in as if its samples had been added here.
    pub fn merge(&mut self, other: &SampleStats) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }

        let count = self.count + other.count;
        let delta = other.mean - self.mean;
        self.mean += delta * other.count as f64 / count as f64;
        self.m2 += other.m2 + delta * delta * (self.count as f64 * other.count as f64) / count as f64;
        self.count = count;
        self.min = self.min.zip(other.min).map(|(a, b)| a.min(b));
        self.max = self.max.zip(other.max).map(|(a, b)| a.max(b));
    }
}

//! Headless game controller.
//!
//! Owns the deck and both hands, sequences a round through
//! Betting → Playing → DealerTurn → GameOver, calls the engine at each deal,
//! hit and stand, and pushes statistics to the registered observers.
//! Everything runs synchronously; pacing the dealer turn is up to the caller
//! through [`GameController::dealer_step`].

use std::fmt;

use log::{info, warn};

use crate::config::Config;
use crate::deck::{hand_value, is_blackjack, Card, Deck, HandValue};
use crate::error::EngineError;
use crate::events::{Observers, StatsEvent, StatsObserver};
use crate::probability::{bust_probability, WinEstimator, DEALER_STANDS_ON};
use crate::random::RandomSource;
use crate::stats::{RoundOutcome, SessionStatistics};
use crate::strategy::{dealer_upcard, optimal_action, Action};

/// Round phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Betting,
    Playing,
    DealerTurn,
    GameOver,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Betting => "betting",
            Phase::Playing => "playing",
            Phase::DealerTurn => "dealer turn",
            Phase::GameOver => "game over",
        };
        f.write_str(name)
    }
}

pub struct GameController<R: RandomSource = fastrand::Rng> {
    config: Config,
    rng: R,
    estimator: WinEstimator,
    deck: Deck,
    player: Vec<Card>,
    dealer: Vec<Card>,
    hole_hidden: bool,
    phase: Phase,
    coins: i64,
    stats: SessionStatistics,
    observers: Observers,
    last_outcome: Option<RoundOutcome>,
}

impl GameController<fastrand::Rng> {
    /// New session using the RNG described by the configuration.
    pub fn new(config: Config) -> Self {
        let rng = config.rng();
        Self::with_rng(config, rng)
    }
}

impl<R: RandomSource> GameController<R> {
    /// New session in the betting phase with a freshly shuffled deck.
    pub fn with_rng(config: Config, mut rng: R) -> Self {
        let deck = Deck::new_and_shuffled(&mut rng);
        GameController {
            estimator: WinEstimator::new(config.simulations),
            coins: config.starting_coins,
            config,
            rng,
            deck,
            player: Vec::new(),
            dealer: Vec::new(),
            hole_hidden: false,
            phase: Phase::Betting,
            stats: SessionStatistics::new(),
            observers: Observers::new(),
            last_outcome: None,
        }
    }

    pub fn register_observer(&mut self, observer: Box<dyn StatsObserver>) {
        self.observers.register(observer);
    }

    /// Starts a new round with a freshly shuffled deck.
    pub fn start_round(&mut self) -> Result<(), EngineError> {
        let deck = Deck::new_and_shuffled(&mut self.rng);
        self.start_round_with_deck(deck)
    }

    /// Starts a new round dealing from `deck` as given.
    pub fn start_round_with_deck(&mut self, deck: Deck) -> Result<(), EngineError> {
        if !matches!(self.phase, Phase::Betting | Phase::GameOver) {
            return Err(EngineError::InvalidPhase {
                expected: Phase::GameOver,
                actual: self.phase,
            });
        }

        self.deck = deck;
        self.player.clear();
        self.dealer.clear();
        self.hole_hidden = false;
        self.last_outcome = None;
        self.stats.reset_per_hand();
        self.phase = Phase::Betting;
        Ok(())
    }

    /// Deals the opening cards: player, dealer hole card, player, dealer upcard.
    ///
    /// Returns the outcome when a natural ends the round on the spot.
    pub fn deal(&mut self) -> Result<Option<RoundOutcome>, EngineError> {
        self.expect_phase(Phase::Betting)?;
        if self.deck.len() < 4 {
            return Err(EngineError::DeckExhausted);
        }

        for _ in 0..2 {
            let card = self.deck.deal().ok_or(EngineError::DeckExhausted)?;
            self.player.push(card);
            let card = self.deck.deal().ok_or(EngineError::DeckExhausted)?;
            self.dealer.push(card);
        }
        self.hole_hidden = true;
        self.phase = Phase::Playing;

        self.refresh_odds()?;

        if is_blackjack(&self.player) {
            let outcome = if is_blackjack(&self.dealer) {
                RoundOutcome::Push
            } else {
                RoundOutcome::Win
            };
            self.finish_round(outcome);
            return Ok(Some(outcome));
        }

        Ok(None)
    }

    /// Player draws a card. Returns the outcome if the hand busts.
    ///
    /// An empty deck rejects the hit with [`EngineError::DeckExhausted`]
    /// before anything is recorded; the player can still stand.
    pub fn hit(&mut self) -> Result<Option<RoundOutcome>, EngineError> {
        self.expect_phase(Phase::Playing)?;
        if self.deck.is_empty() {
            warn!("Deck exhausted, hit rejected");
            return Err(EngineError::DeckExhausted);
        }

        let upcard = dealer_upcard(&self.dealer)?;
        let bust = bust_probability(&self.player, self.deck.cards());
        let win = self.stats.win_chance();
        self.stats
            .record_action(Action::Hit, &self.player, upcard, bust, win)?;

        let card = self.deck.deal().ok_or(EngineError::DeckExhausted)?;
        self.player.push(card);

        self.refresh_odds()?;
        self.observers.publish(StatsEvent::risk_history(&self.stats));
        self.observers.publish(StatsEvent::perfect_play(&self.stats));

        if self.player_value().total > 21 {
            self.finish_round(RoundOutcome::Loss);
            return Ok(Some(RoundOutcome::Loss));
        }

        Ok(None)
    }

    /// Player stands; the win estimate at this point is kept for luck.
    pub fn stand(&mut self) -> Result<(), EngineError> {
        self.expect_phase(Phase::Playing)?;

        let upcard = dealer_upcard(&self.dealer)?;
        let bust = bust_probability(&self.player, self.deck.cards());
        let win = self.estimate_win();
        self.stats
            .record_action(Action::Stand, &self.player, upcard, bust, win)?;
        self.stats.set_win_chance(win)?;

        self.phase = Phase::DealerTurn;
        self.hole_hidden = false;

        self.observers.publish(StatsEvent::win_chance(&self.stats));
        self.observers.publish(StatsEvent::win_chance_history(&self.stats));
        self.observers.publish(StatsEvent::risk_history(&self.stats));
        self.observers.publish(StatsEvent::perfect_play(&self.stats));
        Ok(())
    }

    /// One dealer-turn tick: draw below 17, otherwise settle the round.
    ///
    /// An exhausted deck settles the round on the current totals.
    pub fn dealer_step(&mut self) -> Result<Option<RoundOutcome>, EngineError> {
        self.expect_phase(Phase::DealerTurn)?;

        if hand_value(&self.dealer).total < DEALER_STANDS_ON {
            match self.deck.deal() {
                Some(card) => {
                    self.dealer.push(card);
                    return Ok(None);
                }
                None => warn!("Deck exhausted during dealer turn"),
            }
        }

        let outcome = self.determine_winner();
        self.finish_round(outcome);
        Ok(Some(outcome))
    }

    /// Runs the dealer turn to completion.
    pub fn play_dealer(&mut self) -> Result<RoundOutcome, EngineError> {
        loop {
            if let Some(outcome) = self.dealer_step()? {
                return Ok(outcome);
            }
        }
    }

    /// Basic strategy advice for the current hand.
    pub fn advice(&self) -> Result<Action, EngineError> {
        self.expect_phase(Phase::Playing)?;
        Ok(optimal_action(&self.player, dealer_upcard(&self.dealer)?))
    }

    /// Bust probability for the current hand against the remaining deck.
    pub fn bust_probability(&self) -> f64 {
        bust_probability(&self.player, self.deck.cards())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn player_hand(&self) -> &[Card] {
        &self.player
    }

    pub fn dealer_hand(&self) -> &[Card] {
        &self.dealer
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn player_value(&self) -> HandValue {
        hand_value(&self.player)
    }

    pub fn hole_hidden(&self) -> bool {
        self.hole_hidden
    }

    /// Dealer total as the player sees it, hole card excluded while hidden.
    pub fn dealer_visible_value(&self) -> HandValue {
        if self.hole_hidden {
            hand_value(self.dealer.get(1..).unwrap_or_default())
        } else {
            hand_value(&self.dealer)
        }
    }

    pub fn coins(&self) -> i64 {
        self.coins
    }

    pub fn stats(&self) -> &SessionStatistics {
        &self.stats
    }

    pub fn last_outcome(&self) -> Option<RoundOutcome> {
        self.last_outcome
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), EngineError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(EngineError::InvalidPhase {
                expected,
                actual: self.phase,
            })
        }
    }

    fn estimate_win(&mut self) -> f64 {
        self.estimator
            .estimate(&self.player, &self.dealer, self.deck.cards(), &mut self.rng)
    }

    /// Recomputes the live odds and publishes them.
    fn refresh_odds(&mut self) -> Result<(), EngineError> {
        let win = self.estimate_win();
        self.stats.set_win_chance(win)?;
        let bust = self.bust_probability();

        self.observers.publish(StatsEvent::WinChance { win_chance: win });
        self.observers
            .publish(StatsEvent::BustProbability { bust_probability: bust });
        Ok(())
    }

    fn determine_winner(&self) -> RoundOutcome {
        let player = hand_value(&self.player).total;
        let dealer = hand_value(&self.dealer).total;

        if player > 21 {
            RoundOutcome::Loss
        } else if dealer > 21 || player > dealer {
            RoundOutcome::Win
        } else if player < dealer {
            RoundOutcome::Loss
        } else {
            RoundOutcome::Push
        }
    }

    fn finish_round(&mut self, outcome: RoundOutcome) {
        self.phase = Phase::GameOver;
        self.hole_hidden = false;
        self.last_outcome = Some(outcome);

        match outcome {
            RoundOutcome::Win => self.coins += self.config.bet,
            RoundOutcome::Loss => self.coins -= self.config.bet,
            RoundOutcome::Push => {}
        }

        let luck = self.stats.record_round_outcome(outcome);

        info!(
            "Round {:?}: player {} dealer {} coins {}{}",
            outcome,
            hand_value(&self.player).total,
            hand_value(&self.dealer).total,
            self.coins,
            luck.map(|l| format!(" luck {l:+.2}")).unwrap_or_default()
        );

        self.observers.publish(StatsEvent::luck(&self.stats));
        self.observers
            .publish(StatsEvent::win_loss_history(&self.stats));
    }
}

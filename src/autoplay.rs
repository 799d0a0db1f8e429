//! Automatic play for whole sessions, used by the CLI to exercise the engine.

use clap::ValueEnum;
use log::debug;

use crate::config::Config;
use crate::error::EngineError;
use crate::events::StatsObserver;
use crate::game::{GameController, Phase};
use crate::probability::DEALER_STANDS_ON;
use crate::random::RandomSource;
use crate::stats::{RoundOutcome, SessionStatistics};
use crate::strategy::Action;

/// How the automatic player picks between hit and stand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Policy {
    /// Follow the basic strategy advisor.
    Basic,
    /// Mimic the dealer: hit below 17.
    Dealer,
    /// Coin flip.
    Random,
}

impl Policy {
    pub fn choose<R: RandomSource, S: RandomSource>(
        &self,
        game: &GameController<R>,
        rng: &mut S,
    ) -> Result<Action, EngineError> {
        match self {
            Policy::Basic => game.advice(),
            Policy::Dealer => Ok(if game.player_value().total < DEALER_STANDS_ON {
                Action::Hit
            } else {
                Action::Stand
            }),
            Policy::Random => Ok(if rng.index(2) == 0 {
                Action::Hit
            } else {
                Action::Stand
            }),
        }
    }
}

/// Plays the current round from the deal to the dealer's last card.
pub fn play_round<R: RandomSource, S: RandomSource>(
    game: &mut GameController<R>,
    policy: Policy,
    rng: &mut S,
) -> Result<RoundOutcome, EngineError> {
    if let Some(outcome) = game.deal()? {
        return Ok(outcome);
    }

    while game.phase() == Phase::Playing {
        match policy.choose(game, rng)? {
            Action::Hit => match game.hit() {
                Ok(Some(outcome)) => return Ok(outcome),
                Ok(None) => {}
                // Nothing left to draw, stop asking for cards
                Err(EngineError::DeckExhausted) => game.stand()?,
                Err(e) => return Err(e),
            },
            Action::Stand => game.stand()?,
        }
    }

    game.play_dealer()
}

/// End-of-session figures for one automatically played session.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub rounds: usize,
    pub coins: i64,
    pub stats: SessionStatistics,
}

/// Plays `rounds` rounds in a fresh session.
pub fn run_session(
    config: Config,
    rounds: usize,
    policy: Policy,
    observers: Vec<Box<dyn StatsObserver>>,
) -> Result<SessionSummary, EngineError> {
    let mut rng = config.rng();
    let mut policy_rng = rng.fork();
    let mut game = GameController::with_rng(config, rng);
    for observer in observers {
        game.register_observer(observer);
    }

    for round in 0..rounds {
        if round > 0 {
            game.start_round()?;
        }
        let outcome = play_round(&mut game, policy, &mut policy_rng)?;
        debug!("Round {} finished: {:?}", round + 1, outcome);
    }

    Ok(SessionSummary {
        rounds,
        coins: game.coins(),
        stats: game.stats().clone(),
    })
}

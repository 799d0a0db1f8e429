//! Blackjack Coach
//! Live odds, basic strategy grading and session statistics for single-deck Blackjack.
//!
//! The engine is a set of pure functions over card slices
//! ([`hand_value`], [`bust_probability`], [`WinEstimator`], [`optimal_action`])
//! plus the session-scoped [`SessionStatistics`]. [`GameController`] drives a
//! round and fans statistics out to registered [`StatsObserver`]s.

pub mod autoplay;
pub mod config;
pub mod deck;
pub mod error;
pub mod events;
pub mod game;
pub mod probability;
pub mod random;
pub mod stats;
pub mod strategy;

pub use config::Config;
pub use deck::{hand_value, Card, Deck, HandValue, Rank, Suit};
pub use error::EngineError;
pub use events::{StatsEvent, StatsObserver};
pub use game::{GameController, Phase};
pub use probability::{bust_probability, win_probability, WinEstimator};
pub use random::RandomSource;
pub use stats::{RoundOutcome, SessionStatistics};
pub use strategy::{optimal_action, Action};

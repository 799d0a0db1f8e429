//! Session configuration.

use crate::probability::DEFAULT_SIMULATIONS;

/// Game session configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Monte Carlo trials per win estimate.
    pub simulations: usize,
    /// Coins the player starts the session with.
    pub starting_coins: i64,
    /// Coins won or lost per decided round.
    pub bet: i64,
    /// Seed for the session RNG, random when `None`.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            simulations: DEFAULT_SIMULATIONS,
            starting_coins: 50,
            bet: 10,
            seed: None,
        }
    }
}

impl Config {
    /// Session RNG built from the configured seed.
    pub fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}

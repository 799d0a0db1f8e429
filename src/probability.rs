//! Live odds for the player's hand.
//!
//! Bust probability is an exact count over the remaining deck. Win
//! probability is a Monte Carlo estimate: the dealer's hand is completed
//! against freshly shuffled copies of the remaining deck.

use crate::deck::{hand_value, Card};
use crate::random::RandomSource;

/// Default number of Monte Carlo trials per estimate.
pub const DEFAULT_SIMULATIONS: usize = 500;

/// Dealer draws below this total and stands on every 17.
pub const DEALER_STANDS_ON: u8 = 17;

/// Probability that the next card busts the player's hand.
///
/// Returns exactly 1.0 when the hand is already at 21 or above and 0.0 when
/// no cards remain. A drawn Ace is counted as 1, so only cards whose value
/// exceeds `21 - total` are counted. The result depends only on that buffer
/// for a given deck.
pub fn bust_probability(player: &[Card], remaining: &[Card]) -> f64 {
    let total = hand_value(player).total;
    if total >= 21 {
        return 1.0;
    }
    if remaining.is_empty() {
        return 0.0;
    }

    let buffer = 21 - total;
    let bust_cards = remaining
        .iter()
        .filter(|card| {
            let value = if card.is_ace() { 1 } else { card.weight() };
            value > buffer
        })
        .count();

    bust_cards as f64 / remaining.len() as f64
}

/// Monte Carlo estimator for the chance that a standing hand beats the dealer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinEstimator {
    pub simulations: usize,
}

impl WinEstimator {
    pub fn new(simulations: usize) -> Self {
        WinEstimator { simulations }
    }

    /// Fraction of trials where the dealer busts or finishes below the player.
    ///
    /// Ties and dealer wins are not wins. Returns 0.0 for a busted player hand
    /// and when no trials are configured.
    pub fn estimate<R: RandomSource>(
        &self,
        player: &[Card],
        dealer: &[Card],
        remaining: &[Card],
        rng: &mut R,
    ) -> f64 {
        let player_total = hand_value(player).total;
        if player_total > 21 || self.simulations == 0 {
            return 0.0;
        }

        // Scratch buffers reused across trials
        let mut deck = Vec::with_capacity(remaining.len());
        let mut hand = Vec::with_capacity(dealer.len() + remaining.len());
        let mut wins = 0usize;

        for _ in 0..self.simulations {
            // The dealer pops from `deck`, so refill it every trial
            deck.clear();
            deck.extend_from_slice(remaining);
            rng.shuffle(&mut deck);

            hand.clear();
            hand.extend_from_slice(dealer);
            let dealer_total = dealer_play(&mut hand, &mut deck);

            if dealer_total > 21 || dealer_total < player_total {
                wins += 1;
            }
        }

        wins as f64 / self.simulations as f64
    }
}

impl Default for WinEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATIONS)
    }
}

/// Convenience wrapper over [`WinEstimator::estimate`].
pub fn win_probability<R: RandomSource>(
    player: &[Card],
    dealer: &[Card],
    remaining: &[Card],
    simulations: usize,
    rng: &mut R,
) -> f64 {
    WinEstimator::new(simulations).estimate(player, dealer, remaining, rng)
}

/// Dealer draws from the top of `deck` (its last element) while below 17.
/// Stops early when the deck runs out. Returns the final dealer total.
#[inline]
pub fn dealer_play(hand: &mut Vec<Card>, deck: &mut Vec<Card>) -> u8 {
    loop {
        let total = hand_value(hand).total;
        if total >= DEALER_STANDS_ON {
            return total;
        }
        match deck.pop() {
            Some(card) => hand.push(card),
            None => return total,
        }
    }
}

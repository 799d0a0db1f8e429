//! Basic strategy advisor for a hit/stand-only game.
//!
//! Doubling, splitting and surrender are not available, so wherever the full
//! basic strategy chart would double the advisor hits instead.

use std::fmt::Write;

use serde::Serialize;

use crate::deck::{hand_value, Card, HandValue};
use crate::error::EngineError;

/// Possible player actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Hit,
    Stand,
}

impl Action {
    #[inline(always)]
    pub fn symbol(&self) -> &'static str {
        match self {
            Action::Hit => "H",
            Action::Stand => "S",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::Hit => "hit",
            Action::Stand => "stand",
        }
    }
}

/// Index of the dealer's face-up card. The hole card is dealt first.
pub const UPCARD_INDEX: usize = 1;

/// The dealer's visible card while the hole card is still face down.
///
/// The dealer must hold exactly the two opening cards; any other hand means
/// the deal was sequenced wrong and is rejected.
pub fn dealer_upcard(dealer: &[Card]) -> Result<Card, EngineError> {
    match dealer {
        [_, upcard] => Ok(*upcard),
        _ => Err(EngineError::DealerHand { cards: dealer.len() }),
    }
}

/// Upcard value for table lookup, Ace as 11.
#[inline]
pub fn upcard_value(upcard: Card) -> u8 {
    upcard.weight()
}

/// Recommended action for the player's hand against the dealer's upcard.
pub fn optimal_action(player: &[Card], upcard: Card) -> Action {
    table_action(hand_value(player), upcard_value(upcard))
}

/// The decision table itself, keyed by hand value and upcard value (2..=11).
pub fn table_action(hand: HandValue, dealer: u8) -> Action {
    let HandValue { total, is_soft } = hand;

    if is_soft {
        match total {
            19.. => Action::Stand,
            18 if matches!(dealer, 2 | 7 | 8) => Action::Stand,
            _ => Action::Hit,
        }
    } else {
        match total {
            17.. => Action::Stand,
            13..=16 if (2..=6).contains(&dealer) => Action::Stand,
            12 if (4..=6).contains(&dealer) => Action::Stand,
            _ => Action::Hit,
        }
    }
}

/// Renders the advisor's decision table as markdown.
pub struct StrategyChart;

impl StrategyChart {
    const DEALER_CARDS: [&'static str; 10] = ["2", "3", "4", "5", "6", "7", "8", "9", "10", "A"];

    pub fn render() -> String {
        let mut output = String::new();

        output.push_str("## Hard Totals Strategy\n\n");
        Self::push_header(&mut output);
        for total in (4..=21).rev() {
            let _ = write!(output, "| **{}** |", total);
            Self::push_row(&mut output, total, false);
        }
        output.push('\n');

        output.push_str("## Soft Totals Strategy\n\n");
        Self::push_header(&mut output);
        for total in (12..=21).rev() {
            if total == 12 {
                output.push_str("| **A,A** |");
            } else {
                let _ = write!(output, "| **A,{}** |", total - 11);
            }
            Self::push_row(&mut output, total, true);
        }
        output.push('\n');

        output.push_str("## Legend\n\n");
        output.push_str("- **H** = Hit\n");
        output.push_str("- **S** = Stand\n\n");
        output.push_str("### Rules Used\n\n");
        output.push_str("- Single deck, reshuffled every round\n");
        output.push_str("- Dealer stands on all 17s\n");
        output.push_str("- No double, split or surrender (double spots play as Hit)\n");

        output
    }

    fn push_header(output: &mut String) {
        output.push_str("| Hand | ");
        output.push_str(&Self::DEALER_CARDS.join(" | "));
        output.push_str(" |\n");
        output.push_str("|------|");
        output.push_str(&["---"; 10].join("|"));
        output.push_str("|\n");
    }

    fn push_row(output: &mut String, total: u8, is_soft: bool) {
        for dealer in 2..=11 {
            let action = table_action(HandValue { total, is_soft }, dealer);
            let _ = write!(output, " {} |", action.symbol());
        }
        output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::tests::c;
    use crate::deck::Rank;

    #[test]
    fn documented_boundaries() {
        let soft_18 = [c(Rank::Ace), c(Rank::Seven)];
        assert_eq!(optimal_action(&soft_18, c(Rank::Seven)), Action::Stand);
        assert_eq!(optimal_action(&soft_18, c(Rank::Nine)), Action::Hit);
        assert_eq!(optimal_action(&soft_18, c(Rank::Two)), Action::Stand);
        assert_eq!(optimal_action(&soft_18, c(Rank::Four)), Action::Hit);

        let hard_16 = [c(Rank::Ten), c(Rank::Six)];
        assert_eq!(optimal_action(&hard_16, c(Rank::King)), Action::Hit);
        assert_eq!(optimal_action(&hard_16, c(Rank::Six)), Action::Stand);

        let hard_12 = [c(Rank::Ten), c(Rank::Two)];
        assert_eq!(optimal_action(&hard_12, c(Rank::Five)), Action::Stand);
        assert_eq!(optimal_action(&hard_12, c(Rank::Three)), Action::Hit);
    }

    #[test]
    fn dealer_ace_is_eleven() {
        let hard_13 = [c(Rank::Ten), c(Rank::Three)];
        assert_eq!(optimal_action(&hard_13, c(Rank::Ace)), Action::Hit);

        let soft_18 = [c(Rank::Ace), c(Rank::Seven)];
        assert_eq!(optimal_action(&soft_18, c(Rank::Ace)), Action::Hit);
    }

    #[test]
    fn extremes() {
        for dealer in 2..=11 {
            let low = HandValue { total: 11, is_soft: false };
            assert_eq!(table_action(low, dealer), Action::Hit);
            let hard = HandValue { total: 17, is_soft: false };
            assert_eq!(table_action(hard, dealer), Action::Stand);
            let soft = HandValue { total: 19, is_soft: true };
            assert_eq!(table_action(soft, dealer), Action::Stand);
            let soft = HandValue { total: 17, is_soft: true };
            assert_eq!(table_action(soft, dealer), Action::Hit);
        }
    }

    #[test]
    fn upcard_requires_two_dealer_cards() {
        let hole = c(Rank::Nine);
        let up = c(Rank::Six);
        assert_eq!(dealer_upcard(&[hole, up]), Ok(up));
        assert_eq!(dealer_upcard(&[up]), Err(EngineError::DealerHand { cards: 1 }));
        assert_eq!(
            dealer_upcard(&[hole, up, c(Rank::Two)]),
            Err(EngineError::DealerHand { cards: 3 })
        );
    }

    #[test]
    fn chart_rows() {
        let chart = StrategyChart::render();
        assert!(chart.contains("| **16** | S | S | S | S | S | H | H | H | H | H |"));
        assert!(chart.contains("| **A,7** | S | H | H | H | H | S | S | H | H | H |"));
        assert!(chart.contains("| **12** | H | H | S | S | S | H | H | H | H | H |"));
        assert!(chart.contains("| **A,A** | H | H | H | H | H | H | H | H | H | H |"));
    }
}

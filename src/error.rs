//! Engine errors. All of them are caller contract violations and leave the
//! session state untouched.

use thiserror::Error;

use crate::game::Phase;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("operation requires the {expected} phase, round is in {actual}")]
    InvalidPhase { expected: Phase, actual: Phase },

    #[error("dealer must hold exactly two cards for advice, found {cards}")]
    DealerHand { cards: usize },

    #[error("probability {0} is outside [0, 1]")]
    ProbabilityOutOfRange(f64),

    #[error("deck exhausted")]
    DeckExhausted,
}

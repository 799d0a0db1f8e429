//! Card and deck model for single-deck Blackjack.
//! Hands are plain card slices, valued on demand.

use std::fmt;

use crate::random::RandomSource;

/// Card rank, ordered as printed on a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Ace,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Blackjack weight: faces count 10, an Ace counts 11.
    #[inline]
    pub fn weight(self) -> u8 {
        match self {
            Rank::Ace => 11,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

/// Card suit. Cosmetic only, never affects valuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Clubs,
    Diamonds,
    Hearts,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Clubs, Suit::Diamonds, Suit::Hearts, Suit::Spades];

    pub fn symbol(self) -> char {
        match self {
            Suit::Clubs => '♣',
            Suit::Diamonds => '♦',
            Suit::Hearts => '♥',
            Suit::Spades => '♠',
        }
    }
}

/// A playing card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Card { rank, suit }
    }

    #[inline]
    pub fn weight(&self) -> u8 {
        self.rank.weight()
    }

    #[inline]
    pub fn is_ace(&self) -> bool {
        self.rank == Rank::Ace
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.symbol(), self.suit.symbol())
    }
}

/// A single 52-card deck, dealt from the top without replacement.
///
/// The top of the deck is the last element of the backing vector so that
/// dealing is a `pop`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub const SIZE: usize = 52;

    /// Full deck in suit-major, rank-minor order.
    pub fn new() -> Self {
        let cards = Suit::ALL
            .iter()
            .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(rank, suit)))
            .collect();
        Deck { cards }
    }

    pub fn new_and_shuffled<R: RandomSource>(rng: &mut R) -> Self {
        let mut deck = Self::new();
        deck.shuffle(rng);
        deck
    }

    /// Builds a deck that deals `cards` in the given order, first card first.
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut cards: Vec<Card> = cards.into_iter().collect();
        cards.reverse();
        Deck { cards }
    }

    pub fn shuffle<R: RandomSource>(&mut self, rng: &mut R) {
        rng.shuffle(&mut self.cards);
    }

    /// Deals the top card, `None` once the deck is exhausted.
    #[inline]
    pub fn deal(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn remove(&mut self, card: Card) {
        self.cards.retain(|c| c != &card);
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Remaining cards, top of the deck last.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of hand value calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandValue {
    pub total: u8,
    pub is_soft: bool,
}

/// Calculate the value of a hand
#[inline]
pub fn hand_value(cards: &[Card]) -> HandValue {
    let mut total: u16 = cards.iter().map(|c| c.weight() as u16).sum();
    let mut aces = cards.iter().filter(|c| c.is_ace()).count();

    // Convert aces from 11 to 1 as needed to avoid bust
    while total > 21 && aces > 0 {
        total -= 10;
        aces -= 1;
    }

    HandValue {
        total: total.min(u8::MAX as u16) as u8,
        is_soft: aces > 0,
    }
}

/// Check if hand is a natural blackjack (two cards totalling 21)
#[inline]
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && hand_value(cards).total == 21
}

/// Check if hand is busted (over 21)
#[inline]
pub fn is_bust(cards: &[Card]) -> bool {
    hand_value(cards).total > 21
}

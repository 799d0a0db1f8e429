use std::cell::RefCell;
use std::rc::Rc;

use blackjack_coach::{
    Card, Config, Deck, GameController, Phase, Rank, RoundOutcome, StatsEvent, Suit,
};

/// Full deck whose first cards come out in the given order.
fn stacked(top: &[Card]) -> Deck {
    let rest = Deck::new()
        .cards()
        .iter()
        .rev()
        .copied()
        .filter(|c| !top.contains(c))
        .collect::<Vec<_>>();
    Deck::from_cards(top.iter().copied().chain(rest))
}

fn recorder() -> (Rc<RefCell<Vec<StatsEvent>>>, Box<dyn FnMut(&StatsEvent)>) {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = events.clone();
    (events, Box::new(move |e: &StatsEvent| sink.borrow_mut().push(e.clone())))
}

fn channels(events: &[StatsEvent]) -> Vec<&'static str> {
    events.iter().map(|e| e.channel()).collect()
}

#[test]
fn stand_on_19_against_six_dealer_busts() {
    let config = Config {
        simulations: 500,
        ..Config::default()
    };
    let mut game = GameController::with_rng(config, fastrand::Rng::with_seed(19));
    let (events, observer) = recorder();
    game.register_observer(Box::new(observer));

    // Player 10 + 9, dealer hole 10 and upcard 6, dealer then draws a 6.
    let deck = stacked(&[
        Card::new(Rank::Ten, Suit::Spades),
        Card::new(Rank::Ten, Suit::Hearts),
        Card::new(Rank::Nine, Suit::Clubs),
        Card::new(Rank::Six, Suit::Clubs),
        Card::new(Rank::Six, Suit::Diamonds),
    ]);
    game.start_round_with_deck(deck).unwrap();

    assert_eq!(game.deal().unwrap(), None);
    assert_eq!(game.player_value().total, 19);
    assert!(!game.player_value().is_soft);
    assert_eq!(game.dealer_visible_value().total, 6);
    assert_eq!(game.deck().len() + 4, Deck::SIZE);
    assert_eq!(channels(&events.borrow()), ["winChance", "bustProbability"]);

    game.stand().unwrap();
    let at_stand = game.stats().win_chance_at_stand().unwrap();
    assert!(at_stand > 0.0 && at_stand < 1.0, "win chance {at_stand}");
    assert_eq!(game.stats().win_chance_history(), &[at_stand]);
    assert!((game.stats().risk_history()[0] - (1.0 - at_stand)).abs() < 1e-12);
    assert_eq!(game.stats().perfect_play_percent(), 1.0);

    let outcome = game.play_dealer().unwrap();
    assert_eq!(outcome, RoundOutcome::Win);
    assert_eq!(game.dealer_hand().len(), 3);
    assert_eq!(game.phase(), Phase::GameOver);
    assert_eq!(game.coins(), 60);

    let stats = game.stats();
    assert_eq!(stats.luck_history().len(), 1);
    assert!((stats.luck_history()[0] - (1.0 - at_stand)).abs() < 1e-12);
    assert_eq!(stats.luck_factor(), stats.luck_history()[0]);
    assert_eq!(stats.win_loss_history(), &[Some(1)]);

    let events = events.borrow();
    assert_eq!(
        channels(&events[2..]),
        [
            "winChance",
            "winChanceHistory",
            "riskHistory",
            "perfectPlay",
            "luck",
            "winLossHistory"
        ]
    );
    assert_eq!(
        events.last(),
        Some(&StatsEvent::WinLossHistory {
            win_loss_history: vec![Some(1)]
        })
    );
}

#[test]
fn new_round_resets_only_per_hand_state() {
    let mut game = GameController::with_rng(
        Config {
            simulations: 100,
            ..Config::default()
        },
        fastrand::Rng::with_seed(4),
    );

    let deck = stacked(&[
        Card::new(Rank::Ten, Suit::Spades),
        Card::new(Rank::Nine, Suit::Hearts),
        Card::new(Rank::Eight, Suit::Clubs),
        Card::new(Rank::Eight, Suit::Hearts),
    ]);
    game.start_round_with_deck(deck).unwrap();
    game.deal().unwrap();
    game.stand().unwrap();
    game.play_dealer().unwrap();

    let before = game.stats().clone();
    assert!(before.win_chance_at_stand().is_some());

    game.start_round().unwrap();
    let after = game.stats();
    assert_eq!(after.win_chance_at_stand(), None);
    assert_eq!(after.win_chance(), 0.0);
    assert_eq!(after.win_loss_history(), before.win_loss_history());
    assert_eq!(after.risk_history(), before.risk_history());
    assert_eq!(after.luck_history(), before.luck_history());
    assert_eq!(after.perfect_play_percent(), before.perfect_play_percent());
    assert_eq!(game.phase(), Phase::Betting);
    assert_eq!(game.deck().len(), Deck::SIZE);
}

#[test]
fn hits_then_bust_record_risk_each_time() {
    let mut game = GameController::with_rng(
        Config {
            simulations: 100,
            ..Config::default()
        },
        fastrand::Rng::with_seed(12),
    );
    let (events, observer) = recorder();
    game.register_observer(Box::new(observer));

    // Player 2 + 3, hits a 4 (9), hits a king (19), hits a queen.
    let deck = stacked(&[
        Card::new(Rank::Two, Suit::Spades),
        Card::new(Rank::Ten, Suit::Hearts),
        Card::new(Rank::Three, Suit::Clubs),
        Card::new(Rank::Seven, Suit::Clubs),
        Card::new(Rank::Four, Suit::Diamonds),
        Card::new(Rank::King, Suit::Diamonds),
        Card::new(Rank::Queen, Suit::Diamonds),
    ]);
    game.start_round_with_deck(deck).unwrap();
    game.deal().unwrap();

    assert_eq!(game.hit().unwrap(), None);
    assert_eq!(game.hit().unwrap(), None);
    assert_eq!(game.player_value().total, 19);
    assert_eq!(game.hit().unwrap(), Some(RoundOutcome::Loss));

    let stats = game.stats();
    assert_eq!(stats.total_plays(), 3);
    assert_eq!(stats.risk_history().len(), 3);
    assert_eq!(stats.risk_history()[0], 0.0);
    // Hitting hard 19 is a mistake and very likely to bust.
    assert!(stats.risk_history()[2] > 0.4);
    assert_eq!(stats.risky_plays(), 1);
    assert_eq!(stats.perfect_play_count(), 2);
    let mean = stats.risk_history().iter().sum::<f64>() / 3.0;
    assert_eq!(stats.risk_average(), mean);
    assert!(stats.luck_history().is_empty());
    assert_eq!(game.coins(), 40);

    let events = events.borrow();
    let luck = events.iter().rev().find(|e| e.channel() == "luck");
    assert_eq!(
        luck,
        Some(&StatsEvent::Luck {
            luck_history: vec![],
            luck_factor: 0.0
        })
    );
}

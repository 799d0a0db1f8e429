//! Statistics notifications pushed to the presentation layer.
//!
//! Each event is one named channel with a fixed payload shape. Serialised
//! with serde it reads `{"channel":"winChance","payload":{"winChance":0.42}}`.

use serde::Serialize;

use crate::stats::SessionStatistics;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "channel", content = "payload", rename_all = "camelCase")]
pub enum StatsEvent {
    BustProbability {
        #[serde(rename = "bustProbability")]
        bust_probability: f64,
    },
    WinChance {
        #[serde(rename = "winChance")]
        win_chance: f64,
    },
    WinChanceHistory {
        #[serde(rename = "winChanceHistory")]
        win_chance_history: Vec<f64>,
    },
    RiskHistory {
        #[serde(rename = "riskHistory")]
        risk_history: Vec<f64>,
    },
    PerfectPlay {
        #[serde(rename = "perfectPlayPercent")]
        perfect_play_percent: f64,
        #[serde(rename = "totalDecisions")]
        total_decisions: u64,
    },
    Luck {
        #[serde(rename = "luckHistory")]
        luck_history: Vec<f64>,
        #[serde(rename = "luckFactor")]
        luck_factor: f64,
    },
    WinLossHistory {
        #[serde(rename = "winLossHistory")]
        win_loss_history: Vec<Option<u8>>,
    },
}

impl StatsEvent {
    /// Channel name subscribers key on.
    pub fn channel(&self) -> &'static str {
        match self {
            StatsEvent::BustProbability { .. } => "bustProbability",
            StatsEvent::WinChance { .. } => "winChance",
            StatsEvent::WinChanceHistory { .. } => "winChanceHistory",
            StatsEvent::RiskHistory { .. } => "riskHistory",
            StatsEvent::PerfectPlay { .. } => "perfectPlay",
            StatsEvent::Luck { .. } => "luck",
            StatsEvent::WinLossHistory { .. } => "winLossHistory",
        }
    }

    pub fn win_chance(stats: &SessionStatistics) -> Self {
        StatsEvent::WinChance {
            win_chance: stats.win_chance(),
        }
    }

    pub fn win_chance_history(stats: &SessionStatistics) -> Self {
        StatsEvent::WinChanceHistory {
            win_chance_history: stats.win_chance_history().to_vec(),
        }
    }

    pub fn risk_history(stats: &SessionStatistics) -> Self {
        StatsEvent::RiskHistory {
            risk_history: stats.risk_history().to_vec(),
        }
    }

    pub fn perfect_play(stats: &SessionStatistics) -> Self {
        StatsEvent::PerfectPlay {
            perfect_play_percent: stats.perfect_play_percent(),
            total_decisions: stats.total_decisions(),
        }
    }

    pub fn luck(stats: &SessionStatistics) -> Self {
        StatsEvent::Luck {
            luck_history: stats.luck_history().to_vec(),
            luck_factor: stats.luck_factor(),
        }
    }

    pub fn win_loss_history(stats: &SessionStatistics) -> Self {
        StatsEvent::WinLossHistory {
            win_loss_history: stats.win_loss_history().to_vec(),
        }
    }
}

/// Receives every event the game controller publishes.
pub trait StatsObserver {
    fn notify(&mut self, event: &StatsEvent);
}

impl<F: FnMut(&StatsEvent)> StatsObserver for F {
    fn notify(&mut self, event: &StatsEvent) {
        self(event)
    }
}

/// One-to-many fan-out owned by the game controller.
#[derive(Default)]
pub struct Observers {
    observers: Vec<Box<dyn StatsObserver>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Box<dyn StatsObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn publish(&mut self, event: StatsEvent) {
        for observer in self.observers.iter_mut() {
            observer.notify(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn payload_shapes() {
        let event = StatsEvent::PerfectPlay {
            perfect_play_percent: 0.5,
            total_decisions: 4,
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"channel":"perfectPlay","payload":{"perfectPlayPercent":0.5,"totalDecisions":4}}"#
        );

        let event = StatsEvent::WinLossHistory {
            win_loss_history: vec![Some(1), None, Some(0)],
        };
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"channel":"winLossHistory","payload":{"winLossHistory":[1,null,0]}}"#
        );

        let event = StatsEvent::BustProbability { bust_probability: 0.25 };
        assert_eq!(event.channel(), "bustProbability");
        assert_eq!(
            serde_json::to_string(&event).unwrap(),
            r#"{"channel":"bustProbability","payload":{"bustProbability":0.25}}"#
        );
    }

    #[test]
    fn fan_out_reaches_every_observer() {
        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(0usize));

        let mut observers = Observers::new();
        let sink = first.clone();
        observers.register(Box::new(move |e: &StatsEvent| sink.borrow_mut().push(e.clone())));
        let counter = second.clone();
        observers.register(Box::new(move |_: &StatsEvent| *counter.borrow_mut() += 1));
        assert_eq!(observers.len(), 2);

        observers.publish(StatsEvent::WinChance { win_chance: 0.4 });
        observers.publish(StatsEvent::luck(&SessionStatistics::new()));

        assert_eq!(first.borrow().len(), 2);
        assert_eq!(first.borrow()[0].channel(), "winChance");
        assert_eq!(*second.borrow(), 2);
    }
}

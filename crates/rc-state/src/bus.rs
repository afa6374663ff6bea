//! Notification bus
//!
//! Fans every snapshot and stage event out to all live subscribers over
//! unbounded channels. Receivers that have been dropped are pruned on the
//! next publish.

use crossbeam_channel::{Receiver, Sender, unbounded};

use rc_stage::StageEvent;

use crate::game_state::GameState;

/// What subscribers receive
#[derive(Debug, Clone, PartialEq)]
pub enum GameNotification {
    /// Full state after a mutation
    Snapshot(GameState),
    /// A lifecycle moment (spin start, reel stop, win, payout, ...)
    Stage(StageEvent),
}

impl GameNotification {
    pub fn as_snapshot(&self) -> Option<&GameState> {
        match self {
            GameNotification::Snapshot(state) => Some(state),
            GameNotification::Stage(_) => None,
        }
    }

    pub fn as_stage(&self) -> Option<&StageEvent> {
        match self {
            GameNotification::Stage(event) => Some(event),
            GameNotification::Snapshot(_) => None,
        }
    }
}

/// Subscriber list
#[derive(Debug, Default)]
pub struct NotificationBus {
    subscribers: Vec<Sender<GameNotification>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&mut self) -> Receiver<GameNotification> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Live subscriber count (as of the last publish)
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn publish(&mut self, notification: GameNotification) {
        let Some((last, rest)) = self.subscribers.split_last() else {
            return;
        };

        let mut dead = Vec::new();
        for (i, tx) in rest.iter().enumerate() {
            if tx.send(notification.clone()).is_err() {
                dead.push(i);
            }
        }
        if last.send(notification).is_err() {
            dead.push(rest.len());
        }

        if !dead.is_empty() {
            log::debug!("Pruning {} disconnected subscriber(s)", dead.len());
            for i in dead.into_iter().rev() {
                self.subscribers.remove(i);
            }
        }
    }

    pub fn publish_snapshot(&mut self, state: &GameState) {
        self.publish(GameNotification::Snapshot(state.clone()));
    }

    pub fn publish_stage(&mut self, event: StageEvent) {
        self.publish(GameNotification::Stage(event));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rc_stage::Stage;

    #[test]
    fn test_fan_out() {
        let mut bus = NotificationBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.publish_stage(StageEvent::new(Stage::SpinEnd, 10.0));
        bus.publish_snapshot(&GameState::default());

        for rx in [&a, &b] {
            let received: Vec<_> = rx.try_iter().collect();
            assert_eq!(received.len(), 2);
            assert_eq!(received[0].as_stage().unwrap().type_name(), "spin_end");
            assert!(received[1].as_snapshot().is_some());
        }
    }

    #[test]
    fn test_dropped_receivers_pruned() {
        let mut bus = NotificationBus::new();
        let keep = bus.subscribe();
        drop(bus.subscribe());
        drop(bus.subscribe());
        assert_eq!(bus.subscriber_count(), 3);

        bus.publish_snapshot(&GameState::default());
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(keep.try_iter().count(), 1);
    }

    #[test]
    fn test_publish_without_subscribers() {
        let mut bus = NotificationBus::new();
        bus.publish_stage(StageEvent::new(Stage::EvaluateWins, 0.0));
        assert_eq!(bus.subscriber_count(), 0);
    }
}

//! Controller notifications.
//!
//! Front-ends never poll the form. They hold a receiver from
//! [`EventBus::subscribe`] and redraw on [`Event::StatusChanged`]. Late
//! subscribers only see what happens after they join.

use tokio::sync::broadcast;

use crate::form::state::View;

/// Lagging receivers lose the oldest events first.
const CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The result area now reads `view`. `generation` is the form edit that
    /// the change belongs to.
    StatusChanged { generation: u64, view: View },
    /// The response for `generation` landed after a newer edit and was dropped.
    ResponseDiscarded { generation: u64 },
}

impl Event {
    pub fn generation(&self) -> u64 {
        match self {
            Event::StatusChanged { generation, .. } | Event::ResponseDiscarded { generation } => {
                *generation
            }
        }
    }
}

#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Fan `event` out to every live receiver and return how many there
    /// were. Nobody listening is not an error.
    pub fn emit(&self, event: Event) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn status_change_reaches_subscriber() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.emit(Event::StatusChanged {
            generation: 3,
            view: View::Loading,
        });

        assert_eq!(
            rx.recv().await.unwrap(),
            Event::StatusChanged {
                generation: 3,
                view: View::Loading
            }
        );
    }

    #[tokio::test]
    async fn every_front_end_sees_discards() {
        let bus = EventBus::default();
        let mut spinner = bus.subscribe();
        let mut repl = bus.subscribe();

        assert_eq!(bus.emit(Event::ResponseDiscarded { generation: 1 }), 2);
        assert_eq!(
            spinner.recv().await.unwrap(),
            repl.recv().await.unwrap()
        );
    }

    #[test]
    fn nobody_listening_is_fine() {
        let bus = EventBus::default();
        assert_eq!(bus.emit(Event::ResponseDiscarded { generation: 0 }), 0);
    }

    #[test]
    fn late_subscriber_misses_earlier_events() {
        let bus = EventBus::default();
        bus.emit(Event::StatusChanged {
            generation: 1,
            view: View::Empty,
        });
        let mut rx = bus.subscribe();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn generation_of_either_kind() {
        let changed = Event::StatusChanged {
            generation: 7,
            view: View::Error("boom".to_string()),
        };
        assert_eq!(changed.generation(), 7);
        assert_eq!(Event::ResponseDiscarded { generation: 4 }.generation(), 4);
    }
}

use std::collections::VecDeque;

use crate::events::MonsterEvent;

/// Monster events held back while the map is not ready, in arrival order.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: VecDeque<MonsterEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: MonsterEvent) {
        self.pending.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Takes every buffered event, oldest first. The queue is empty afterwards.
    pub fn drain(&mut self) -> impl Iterator<Item = MonsterEvent> + '_ {
        self.pending.drain(..)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packets::server::{MonsterDespawn, MonsterMove};

    #[test]
    fn drains_in_arrival_order_once() {
        let mut queue = EventQueue::default();
        let events = vec![
            MonsterEvent::Move(MonsterMove { id: 1, x: 0, y: 0 }),
            MonsterEvent::Move(MonsterMove { id: 1, x: 1, y: 0 }),
            MonsterEvent::Despawn(MonsterDespawn { id: 1 }),
        ];
        for event in events.clone() {
            queue.push(event);
        }
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.drain().collect::<Vec<_>>(), events);
        assert!(queue.is_empty());
        assert_eq!(queue.drain().count(), 0);
    }
}

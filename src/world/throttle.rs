use glam::Vec2;
use packets::client;

use crate::network::PacketOutbox;

/// Gate for per-tick outbound traffic. While a transition holds the lock,
/// movement is dropped outright, never queued.
#[derive(Debug, Default)]
pub struct OutboundThrottle {
    suppressed: u64,
}

impl OutboundThrottle {
    /// Sends a `move` unless `locked`. Returns whether the packet went out.
    pub fn send_move(
        &mut self,
        outbox: &PacketOutbox,
        locked: bool,
        character_id: u32,
        map_key: &str,
        position: Vec2,
    ) -> bool {
        if locked {
            self.suppressed += 1;
            tracing::debug!(character_id, "Transition in progress, dropping move");
            return false;
        }
        outbox.send(&client::Move {
            character_id,
            map_key: map_key.to_string(),
            x: position.x,
            y: position.y,
        });
        true
    }

    /// Moves dropped so far.
    pub fn suppressed(&self) -> u64 {
        self.suppressed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_moves_are_dropped_not_queued() {
        let (outbox, rx) = PacketOutbox::channel();
        let mut throttle = OutboundThrottle::default();

        assert!(!throttle.send_move(&outbox, true, 1, "worldmap", Vec2::ONE));
        assert!(!throttle.send_move(&outbox, true, 1, "worldmap", Vec2::ONE));
        assert!(rx.try_recv().is_err());
        assert_eq!(throttle.suppressed(), 2);

        assert!(throttle.send_move(&outbox, false, 1, "city2", Vec2::new(3.0, 4.0)));
        let frame = rx.try_recv().unwrap();
        let (event, data) = packets::split_frame(&frame).unwrap();
        assert_eq!(event, "move");
        let value: serde_json::Value = serde_json::from_slice(&data).unwrap();
        assert_eq!(value["map_key"], "city2");
        assert_eq!(value["x"], 3.0);
        assert!(rx.try_recv().is_err());
    }
}

use crossbeam_channel::{Receiver, Sender};
use ::network::protocol::MAX_BODY_LEN;
use packets::ToBytes;

use crate::events::UiSignal;

/// Outbound frame queue. Frames are fully encoded here and written to the
/// socket by the writer task, so the tick never blocks on I/O.
#[derive(Clone)]
pub struct PacketOutbox(async_channel::Sender<Vec<u8>>);

impl PacketOutbox {
    pub fn new(tx: async_channel::Sender<Vec<u8>>) -> Self {
        Self(tx)
    }

    /// Unbounded outbox plus the receiving end the writer task drains.
    pub fn channel() -> (Self, async_channel::Receiver<Vec<u8>>) {
        let (tx, rx) = async_channel::unbounded();
        (Self(tx), rx)
    }

    pub fn send<T: ToBytes>(&self, packet: &T) {
        let body = match packet.to_bytes() {
            Ok(body) => body,
            Err(err) => {
                tracing::error!(?err, event = T::EVENT, "Failed to encode packet");
                return;
            }
        };
        if body.len() > MAX_BODY_LEN {
            tracing::error!(event = T::EVENT, len = body.len(), "Packet too large, dropping");
            return;
        }
        if self.0.try_send(body).is_err() {
            tracing::warn!(event = T::EVENT, "Outbox closed, dropping packet");
        }
    }
}

/// Fire-and-forget channel to the presentation layer.
#[derive(Clone)]
pub struct UiBridge(Sender<UiSignal>);

impl UiBridge {
    pub fn new(tx: Sender<UiSignal>) -> Self {
        Self(tx)
    }

    pub fn channel() -> (Self, Receiver<UiSignal>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self(tx), rx)
    }

    pub fn emit(&self, signal: UiSignal) {
        // A detached UI is not an error for the world client
        let _ = self.0.send(signal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packets::client;

    #[test]
    fn outbox_encodes_full_envelope() {
        let (outbox, rx) = PacketOutbox::channel();
        outbox.send(&client::JoinMap {
            character_id: 3,
            map_key: "worldmap".into(),
        });
        let frame = rx.try_recv().unwrap();
        let (event, _) = packets::split_frame(&frame).unwrap();
        assert_eq!(event, "join_map");
    }

    #[test]
    fn oversize_packet_is_dropped_before_the_socket() {
        let (outbox, rx) = PacketOutbox::channel();
        outbox.send(&client::ChatMessage {
            sender_id: 1,
            text: "x".repeat(70_000),
        });
        outbox.send(&client::JoinMap {
            character_id: 1,
            map_key: "worldmap".into(),
        });
        let frames: Vec<_> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
        assert_eq!(frames.len(), 1);
        assert_eq!(packets::split_frame(&frames[0]).unwrap().0, "join_map");
    }

    #[test]
    fn closed_outbox_does_not_panic() {
        let (outbox, rx) = PacketOutbox::channel();
        drop(rx);
        outbox.send(&client::ChatMessage {
            sender_id: 1,
            text: "hi".into(),
        });
    }
}

use std::any::type_name;
use std::io;

use async_std::io::{Read, Write};
use async_std::task::{self, JoinHandle};
use crossbeam_channel::{Receiver, Sender};
use network::{Frame, FrameReceiver, FrameSender};
use packets::{TryFromBytes, server};

use crate::events::{
    CharacterEvent, InboundEvent, MonsterEvent, NetworkEvent, PlayerEvent,
};
use crate::world::WorldClient;

/// Background socket tasks for one connection.
pub struct NetTasks {
    pub reader: JoinHandle<()>,
    pub writer: JoinHandle<()>,
}

/// Spawns the reader (socket -> `events`) and writer (`outbox` -> socket)
/// tasks. The reader reports `Disconnected` once and exits on the first
/// transport error; malformed frames are skipped.
pub fn spawn_io<R, W>(
    mut receiver: FrameReceiver<R>,
    mut sender: FrameSender<W>,
    events: Sender<NetworkEvent>,
    outbox: async_channel::Receiver<Vec<u8>>,
) -> NetTasks
where
    R: Read + Unpin + Send + 'static,
    W: Write + Unpin + Send + 'static,
{
    let reader = task::spawn(async move {
        loop {
            match receiver.receive().await {
                Ok(Frame::Event { name, data }) => match server::Codes::try_from(name.as_str()) {
                    Ok(code) => {
                        if events.send(NetworkEvent::Packet(code, data)).is_err() {
                            break;
                        }
                    }
                    Err(name) => tracing::trace!(event = %name, "Ignoring unsubscribed event"),
                },
                Ok(Frame::Malformed { len, reason }) => {
                    tracing::error!(len, %reason, "Skipping malformed frame");
                }
                Err(err) => {
                    tracing::warn!(?err, "Socket read failed");
                    let _ = events.send(NetworkEvent::Disconnected);
                    break;
                }
            }
        }
    });

    let writer = task::spawn(async move {
        while let Ok(frame) = outbox.recv().await {
            if !write_frame(&mut sender, &frame).await {
                return;
            }
            while let Ok(extra) = outbox.try_recv() {
                if !write_frame(&mut sender, &extra).await {
                    return;
                }
            }
            if let Err(err) = sender.flush().await {
                tracing::warn!(?err, "Socket flush failed");
                return;
            }
        }
    });

    NetTasks { reader, writer }
}

/// Returns `false` once the socket is unusable. A frame the encoder refuses
/// is dropped and the writer keeps going.
async fn write_frame<W: Write + Unpin>(sender: &mut FrameSender<W>, frame: &[u8]) -> bool {
    match sender.send(frame).await {
        Ok(()) => true,
        Err(err) if err.kind() == io::ErrorKind::InvalidInput => {
            tracing::error!(len = frame.len(), %err, "Dropping unsendable frame");
            true
        }
        Err(err) => {
            tracing::warn!(?err, "Socket write failed");
            false
        }
    }
}

/// Whether the session is still connected after a drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Open,
    Closed,
}

/// Feeds every pending network event into the world client.
pub fn drain_net_events(rx: &Receiver<NetworkEvent>, world: &mut WorldClient) -> SessionStatus {
    while let Ok(event) = rx.try_recv() {
        match event {
            NetworkEvent::Connected => tracing::info!("Network connected"),
            NetworkEvent::Disconnected => {
                tracing::warn!("Network disconnected");
                return SessionStatus::Closed;
            }
            NetworkEvent::Packet(code, data) => {
                if let Some(inbound) = decode_inbound(code, &data) {
                    world.handle_inbound(inbound);
                }
            }
        }
    }
    SessionStatus::Open
}

/// Decodes one payload into the client's event union. Malformed payloads are
/// logged and skipped.
pub fn decode_inbound(code: server::Codes, data: &[u8]) -> Option<InboundEvent> {
    use server::Codes;

    let event = match code {
        Codes::CurrentPlayers => {
            InboundEvent::Player(PlayerEvent::Roster(parse_packet(code, data)?))
        }
        Codes::PlayerSpawn => InboundEvent::Player(PlayerEvent::Spawn(parse_packet(code, data)?)),
        Codes::PlayerMove => InboundEvent::Player(PlayerEvent::Move(parse_packet(code, data)?)),
        Codes::PlayerDespawn => {
            InboundEvent::Player(PlayerEvent::Despawn(parse_packet(code, data)?))
        }
        Codes::CurrentMonsters => {
            InboundEvent::Monster(MonsterEvent::Roster(parse_packet(code, data)?))
        }
        Codes::MonsterSpawn => {
            InboundEvent::Monster(MonsterEvent::Spawn(parse_packet(code, data)?))
        }
        Codes::MonsterMove => InboundEvent::Monster(MonsterEvent::Move(parse_packet(code, data)?)),
        Codes::MonsterDespawn => {
            InboundEvent::Monster(MonsterEvent::Despawn(parse_packet(code, data)?))
        }
        Codes::MonsterHit => InboundEvent::Monster(MonsterEvent::Hit(parse_packet(code, data)?)),
        Codes::PlayerHit => {
            InboundEvent::Character(CharacterEvent::Hit(parse_packet(code, data)?))
        }
        Codes::PlayerRespawn => {
            InboundEvent::Character(CharacterEvent::Respawn(parse_packet(code, data)?))
        }
        Codes::ExpGain => {
            InboundEvent::Character(CharacterEvent::ExpGain(parse_packet(code, data)?))
        }
        Codes::ChatMessage => InboundEvent::Chat(parse_packet(code, data)?),
    };
    Some(event)
}

fn parse_packet<T: TryFromBytes>(code: server::Codes, data: &[u8]) -> Option<T> {
    match T::try_from_bytes(data) {
        Ok(packet) => Some(packet),
        Err(err) => {
            tracing::error!(
                ?err,
                event = code.name(),
                len = data.len(),
                packet = type_name::<T>(),
                "Failed to parse packet"
            );
            None
        }
    }
}

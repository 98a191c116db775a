use game_types::{CharacterPatch, NpcMeta};
use packets::server;

// === Network Events ===

#[derive(Debug, Clone)]
pub enum NetworkEvent {
    Packet(server::Codes, Vec<u8>),
    Connected,
    Disconnected,
}

/// Remote-player channel. Always applied immediately, even mid-transition.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    Roster(Vec<server::ActorInfo>),
    Spawn(server::ActorInfo),
    Move(server::PlayerMove),
    Despawn(server::PlayerDespawn),
}

/// Monster channel. Buffered while the map is not ready, since tile to
/// pixel conversion needs the new map's tile size.
#[derive(Debug, Clone, PartialEq)]
pub enum MonsterEvent {
    Roster(Vec<server::MonsterInfo>),
    Spawn(server::MonsterInfo),
    Move(server::MonsterMove),
    Despawn(server::MonsterDespawn),
    Hit(server::MonsterHit),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CharacterEvent {
    Hit(server::PlayerHit),
    Respawn(server::PlayerRespawn),
    ExpGain(server::ExpGain),
}

/// Every server event the world client reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Player(PlayerEvent),
    Monster(MonsterEvent),
    Character(CharacterEvent),
    Chat(server::ChatMessage),
}

// === UI Events ===

/// Signals for the presentation layer (HUD, dialogs, audio).
#[derive(Debug, Clone, PartialEq)]
pub enum UiSignal {
    /// Local player tile, every tick
    Coords { x: i32, y: i32 },
    /// Display name of the map that just finished loading
    MapKey(String),
    OpenNpcDialog(NpcMeta),
    CharUpdate(CharacterPatch),
    LevelUp { level: u32 },
    BgmState(bool),
    ChatMessage(server::ChatMessage),
    TransitionFailed { map_key: String, reason: String },
}

/// Requests from the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    NpcDialogClosed,
    ToggleBgm,
    SendChat(String),
}

// === Input Events ===

/// Direction keys held during a tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    pub fn is_idle(&self) -> bool {
        !(self.up || self.down || self.left || self.right)
    }

    /// Unit-less direction; left beats right and up beats down.
    pub fn axis(&self) -> glam::Vec2 {
        let x = if self.left {
            -1.0
        } else if self.right {
            1.0
        } else {
            0.0
        };
        let y = if self.up {
            -1.0
        } else if self.down {
            1.0
        } else {
            0.0
        };
        glam::Vec2::new(x, y)
    }
}

mod character;
pub use character::{ExpGain, PlayerHit, PlayerRespawn};

mod chat_message;
pub use chat_message::ChatMessage;

mod monsters;
pub use monsters::{MonsterDespawn, MonsterHit, MonsterInfo, MonsterMove};

mod players;
pub use players::{ActorInfo, PlayerDespawn, PlayerMove};

/// Event names the server pushes to a client.
///
/// Anything not listed here is ignored by the client without being decoded.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Codes {
    /// Full roster of players already on the map, sent after `join_map`
    CurrentPlayers,
    PlayerSpawn,
    PlayerMove,
    PlayerDespawn,
    /// Full roster of monsters already on the map, sent after `join_map`
    CurrentMonsters,
    MonsterSpawn,
    MonsterMove,
    MonsterDespawn,
    MonsterHit,
    PlayerHit,
    PlayerRespawn,
    ExpGain,
    ChatMessage,
}

impl Codes {
    pub const ALL: [Codes; 13] = [
        Codes::CurrentPlayers,
        Codes::PlayerSpawn,
        Codes::PlayerMove,
        Codes::PlayerDespawn,
        Codes::CurrentMonsters,
        Codes::MonsterSpawn,
        Codes::MonsterMove,
        Codes::MonsterDespawn,
        Codes::MonsterHit,
        Codes::PlayerHit,
        Codes::PlayerRespawn,
        Codes::ExpGain,
        Codes::ChatMessage,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Codes::CurrentPlayers => "current_players",
            Codes::PlayerSpawn => "player_spawn",
            Codes::PlayerMove => "player_move",
            Codes::PlayerDespawn => "player_despawn",
            Codes::CurrentMonsters => "current_monsters",
            Codes::MonsterSpawn => "monster_spawn",
            Codes::MonsterMove => "monster_move",
            Codes::MonsterDespawn => "monster_despawn",
            Codes::MonsterHit => "monster_hit",
            Codes::PlayerHit => "player_hit",
            Codes::PlayerRespawn => "player_respawn",
            Codes::ExpGain => "exp_gain",
            Codes::ChatMessage => "chat_message",
        }
    }
}

impl TryFrom<&str> for Codes {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Codes::ALL
            .into_iter()
            .find(|code| code.name() == value)
            .ok_or_else(|| value.to_string())
    }
}

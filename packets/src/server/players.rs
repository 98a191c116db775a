use serde::Deserialize;

/// A remote player as it appears in `current_players` and `player_spawn`.
/// Coordinates are pixels.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ActorInfo {
    #[serde(alias = "character_id")]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub map_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerMove {
    #[serde(alias = "character_id")]
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerDespawn {
    #[serde(alias = "character_id")]
    pub id: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TryFromBytes;

    #[test]
    fn roster_accepts_character_records() {
        let bytes = br#"[
            {"id": 3, "name": "Marina", "x": 832, "y": 1600, "map_key": "city2", "level": 4},
            {"character_id": 9, "x": 0, "y": 128}
        ]"#;
        let roster = Vec::<ActorInfo>::try_from_bytes(bytes).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].name, "Marina");
        assert_eq!(roster[0].map_key.as_deref(), Some("city2"));
        assert_eq!(roster[1].id, 9);
        assert_eq!(roster[1].name, "");
    }
}

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerHit {
    pub id: u32,
    pub dmg: i32,
    pub hp: i32,
}

/// `x`/`y` are pixel coordinates on the destination map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlayerRespawn {
    pub id: u32,
    pub map_key: String,
    pub x: f32,
    pub y: f32,
    pub hp: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExpGain {
    pub char_id: u32,
    pub exp: u64,
    pub total_exp: u64,
    pub level: u32,
    #[serde(default)]
    pub level_up: bool,
}

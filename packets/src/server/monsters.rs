use serde::Deserialize;

/// A monster as sent in `current_monsters` and `monster_spawn`.
/// `x`/`y` are tile coordinates on the current map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonsterInfo {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub species: String,
    #[serde(default)]
    pub level: u32,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub hp: i32,
    #[serde(default)]
    pub max_hp: i32,
    #[serde(default)]
    pub sprite1: String,
    #[serde(default)]
    pub sprite2: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonsterMove {
    pub id: u32,
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonsterDespawn {
    pub id: u32,
}

/// Damage applied to a monster. `x`/`y` is its authoritative tile after the hit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MonsterHit {
    pub id: u32,
    pub dmg: i32,
    pub hp: i32,
    pub x: i32,
    pub y: i32,
}

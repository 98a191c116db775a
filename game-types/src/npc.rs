use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NpcType {
    #[default]
    Normal,
    Shop,
}

/// NPC record for the current map. `x`/`y` are pixel coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcMeta {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub job: String,
    #[serde(default)]
    pub race: String,
    #[serde(default)]
    pub dialog: String,
    #[serde(default)]
    pub npc_type: NpcType,
    pub x: f32,
    pub y: f32,
}

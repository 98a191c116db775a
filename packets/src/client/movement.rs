use serde::Serialize;

use crate::ToBytes;

/// Local player position in pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Move {
    pub character_id: u32,
    pub map_key: String,
    pub x: f32,
    pub y: f32,
}

impl ToBytes for Move {
    const EVENT: &'static str = "move";
}

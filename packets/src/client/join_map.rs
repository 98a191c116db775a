use serde::Serialize;

use crate::ToBytes;

/// Sent once per actual map change so the server moves the character's room.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinMap {
    pub character_id: u32,
    pub map_key: String,
}

impl ToBytes for JoinMap {
    const EVENT: &'static str = "join_map";
}

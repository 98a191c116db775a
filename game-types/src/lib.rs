mod character;
mod map;
mod npc;
mod settings;

pub use character::CharacterPatch;
pub use map::{MapMeta, Portal, PortalSource, TilePos};
pub use npc::{NpcMeta, NpcType};
pub use settings::{InteractionSettings, MovementSettings, ServerEntry};

use game_types::TilePos;
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorKind {
    LocalPlayer,
    RemoteActor,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    pub id: u32,
    pub name: String,
    pub position: Vec2,
    pub kind: ActorKind,
}

impl Actor {
    pub fn local(id: u32) -> Self {
        Self {
            id,
            name: String::new(),
            position: Vec2::ZERO,
            kind: ActorKind::LocalPlayer,
        }
    }

    pub fn remote(id: u32, name: impl Into<String>, position: Vec2) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            kind: ActorKind::RemoteActor,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Monster {
    pub id: u32,
    pub name: String,
    pub species: String,
    pub level: u32,
    pub tile: TilePos,
    pub position: Vec2,
    pub hp: i32,
}

/// Per-id facts that outlive a single spawn event. Hit events only carry
/// current hp, so the max is remembered here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonsterMeta {
    pub max_hp: i32,
    pub species: String,
    pub idle: Option<[String; 2]>,
}

impl MonsterMeta {
    pub fn health_percent(&self, hp: i32) -> Option<f32> {
        (self.max_hp > 0).then(|| (hp.max(0) as f32 / self.max_hp as f32).min(1.0))
    }
}

/// Pixel centre of `tile`.
pub fn tile_center(tile: TilePos, tile_size: Vec2) -> Vec2 {
    (Vec2::new(tile.x as f32, tile.y as f32) + Vec2::splat(0.5)) * tile_size
}

/// Tile containing the pixel `position`.
pub fn pixel_to_tile(position: Vec2, tile_size: Vec2) -> TilePos {
    let tile = (position / tile_size).floor();
    TilePos::new(tile.x as i32, tile.y as i32)
}

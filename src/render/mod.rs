//! Rendering port. The world client describes what should be on screen as a
//! stream of [`RenderCommand`]s; a sink owns the display objects, keyed by the
//! same ids the registry uses.

use glam::Vec2;

pub mod scene;
pub mod tween;

pub use scene::SceneGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKey {
    Local,
    Player(u32),
    Monster(u32),
    Npc(u32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Animation {
    Stand,
    Walk,
    /// Two-frame idle loop
    Idle([String; 2]),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Swap the tile layer. Issued once per successful transition.
    LoadMap {
        key: String,
        json_file: String,
        tileset_file: String,
        tile_size: Vec2,
    },
    /// Drop every display object except the local player.
    ClearMap,
    Spawn {
        key: EntityKey,
        label: String,
        position: Vec2,
    },
    /// Linear move to `position` over `duration` seconds; zero snaps.
    MoveTo {
        key: EntityKey,
        position: Vec2,
        duration: f32,
    },
    /// Overshoot towards `impact`, then ease back to `rest`.
    Knockback {
        key: EntityKey,
        impact: Vec2,
        rest: Vec2,
    },
    HealthBar {
        key: EntityKey,
        percent: f32,
    },
    SetAnimation {
        key: EntityKey,
        animation: Animation,
    },
    Despawn {
        key: EntityKey,
    },
}

pub trait RenderSink: Send {
    fn submit(&mut self, command: RenderCommand);

    /// Advance running tweens by `dt` seconds.
    fn advance(&mut self, _dt: f32) {}
}

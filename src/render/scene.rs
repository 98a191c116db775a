use std::collections::VecDeque;

use glam::Vec2;
use rustc_hash::FxHashMap;

use super::tween::{self, Tween};
use super::{Animation, EntityKey, RenderCommand, RenderSink};

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayObject {
    pub label: String,
    pub position: Vec2,
    pub animation: Option<Animation>,
    pub health: Option<f32>,
    tweens: VecDeque<Tween>,
}

impl DisplayObject {
    fn new(label: String, position: Vec2) -> Self {
        Self {
            label,
            position,
            animation: None,
            health: None,
            tweens: VecDeque::new(),
        }
    }

    pub fn is_moving(&self) -> bool {
        !self.tweens.is_empty()
    }

    /// Where the object comes to rest once every queued tween finishes.
    pub fn target(&self) -> Vec2 {
        self.tweens.back().map_or(self.position, |t| t.end)
    }

    fn advance(&mut self, dt: f32) {
        let mut remaining = dt;
        while let Some(tween) = self.tweens.front_mut() {
            let (pos, overflow) = tween.step(remaining);
            self.position = pos;
            match overflow {
                Some(left) => {
                    self.tweens.pop_front();
                    remaining = left;
                }
                None => break,
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadedMap {
    pub key: String,
    pub json_file: String,
    pub tileset_file: String,
    pub tile_size: Vec2,
}

/// Headless display list. Holds one display object per entity key; entity
/// state itself stays in the world registry.
#[derive(Debug, Default)]
pub struct SceneGraph {
    map: Option<LoadedMap>,
    objects: FxHashMap<EntityKey, DisplayObject>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(&self) -> Option<&LoadedMap> {
        self.map.as_ref()
    }

    pub fn get(&self, key: EntityKey) -> Option<&DisplayObject> {
        self.objects.get(&key)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn object_mut(&mut self, key: EntityKey) -> Option<&mut DisplayObject> {
        let object = self.objects.get_mut(&key);
        if object.is_none() {
            tracing::trace!(?key, "Render command for unknown display object");
        }
        object
    }
}

impl RenderSink for SceneGraph {
    fn submit(&mut self, command: RenderCommand) {
        match command {
            RenderCommand::LoadMap {
                key,
                json_file,
                tileset_file,
                tile_size,
            } => {
                tracing::debug!(map_key = %key, "Loading tile layer");
                self.map = Some(LoadedMap {
                    key,
                    json_file,
                    tileset_file,
                    tile_size,
                });
            }
            RenderCommand::ClearMap => {
                self.map = None;
                self.objects.retain(|key, _| *key == EntityKey::Local);
            }
            RenderCommand::Spawn {
                key,
                label,
                position,
            } => {
                self.objects.insert(key, DisplayObject::new(label, position));
            }
            RenderCommand::MoveTo {
                key,
                position,
                duration,
            } => {
                if let Some(object) = self.object_mut(key) {
                    object.tweens.clear();
                    if duration <= 0.0 {
                        object.position = position;
                    } else {
                        object
                            .tweens
                            .push_back(Tween::linear(object.position, position, duration));
                    }
                }
            }
            RenderCommand::Knockback { key, impact, rest } => {
                if let Some(object) = self.object_mut(key) {
                    object.tweens.clear();
                    object
                        .tweens
                        .extend(tween::knockback(object.position, impact, rest));
                }
            }
            RenderCommand::HealthBar { key, percent } => {
                if let Some(object) = self.object_mut(key) {
                    object.health = Some(percent.clamp(0.0, 1.0));
                }
            }
            RenderCommand::SetAnimation { key, animation } => {
                if let Some(object) = self.object_mut(key) {
                    object.animation = Some(animation);
                }
            }
            RenderCommand::Despawn { key } => {
                self.objects.remove(&key);
            }
        }
    }

    fn advance(&mut self, dt: f32) {
        for object in self.objects.values_mut() {
            object.advance(dt);
        }
    }
}

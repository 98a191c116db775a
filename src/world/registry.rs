//! Keyed store of remote actors and monsters.

use game_types::TilePos;
use glam::Vec2;
use packets::server::{ActorInfo, MonsterHit, MonsterInfo};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, trace, warn};

use super::components::{Actor, Monster, MonsterMeta, tile_center};
use crate::events::{MonsterEvent, PlayerEvent};
use crate::render::{Animation, EntityKey, RenderCommand, RenderSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
    /// The id belongs to the local player
    Ignored,
}

pub struct EntityRegistry {
    local_id: u32,
    tween: f32,
    players: FxHashMap<u32, Actor>,
    monsters: FxHashMap<u32, Monster>,
    monster_meta: FxHashMap<u32, MonsterMeta>,
}

impl EntityRegistry {
    /// `tween` is the interpolation time in seconds applied to every
    /// position update.
    pub fn new(local_id: u32, tween: f32) -> Self {
        Self {
            local_id,
            tween,
            players: FxHashMap::default(),
            monsters: FxHashMap::default(),
            monster_meta: FxHashMap::default(),
        }
    }

    pub fn player(&self, id: u32) -> Option<&Actor> {
        self.players.get(&id)
    }

    pub fn players(&self) -> impl Iterator<Item = &Actor> {
        self.players.values()
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn monster(&self, id: u32) -> Option<&Monster> {
        self.monsters.get(&id)
    }

    pub fn monsters(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.values()
    }

    pub fn monster_count(&self) -> usize {
        self.monsters.len()
    }

    pub fn monster_meta(&self, id: u32) -> Option<&MonsterMeta> {
        self.monster_meta.get(&id)
    }

    // === Players ===

    pub fn upsert(
        &mut self,
        id: u32,
        position: Vec2,
        name: &str,
        render: &mut dyn RenderSink,
    ) -> Upsert {
        if id == self.local_id {
            trace!(id, "Ignoring roster entry for local player");
            return Upsert::Ignored;
        }

        let key = EntityKey::Player(id);
        if let Some(actor) = self.players.get_mut(&id) {
            actor.position = position;
            render.submit(RenderCommand::MoveTo {
                key,
                position,
                duration: self.tween,
            });
            return Upsert::Updated;
        }

        debug!(id, name, "Spawning remote player");
        self.players.insert(id, Actor::remote(id, name, position));
        render.submit(RenderCommand::Spawn {
            key,
            label: name.to_string(),
            position,
        });
        Upsert::Created
    }

    pub fn remove(&mut self, id: u32, render: &mut dyn RenderSink) -> bool {
        if self.players.remove(&id).is_some() {
            render.submit(RenderCommand::Despawn {
                key: EntityKey::Player(id),
            });
            true
        } else {
            false
        }
    }

    pub fn apply_player(&mut self, event: PlayerEvent, render: &mut dyn RenderSink) {
        match event {
            PlayerEvent::Roster(roster) => {
                let present: FxHashSet<u32> = roster.iter().map(|a| a.id).collect();
                let stale: Vec<u32> = self
                    .players
                    .keys()
                    .filter(|id| !present.contains(*id))
                    .copied()
                    .collect();
                for id in stale {
                    self.remove(id, render);
                }
                for actor in &roster {
                    self.upsert_actor(actor, render);
                }
            }
            PlayerEvent::Spawn(actor) => {
                self.upsert_actor(&actor, render);
            }
            // A move can be the first sighting when no roster follows a
            // same-map reload; the player is tracked unlabelled until then.
            PlayerEvent::Move(mv) => {
                self.upsert(mv.id, Vec2::new(mv.x, mv.y), "", render);
            }
            PlayerEvent::Despawn(despawn) => {
                self.remove(despawn.id, render);
            }
        }
    }

    fn upsert_actor(&mut self, actor: &ActorInfo, render: &mut dyn RenderSink) {
        self.upsert(actor.id, Vec2::new(actor.x, actor.y), &actor.name, render);
    }

    // === Monsters ===

    /// Monster coordinates arrive as tiles and are placed at the tile centre.
    pub fn upsert_monster(
        &mut self,
        info: &MonsterInfo,
        tile_size: Vec2,
        render: &mut dyn RenderSink,
    ) -> Upsert {
        let tile = TilePos::new(info.x, info.y);
        let position = tile_center(tile, tile_size);
        let key = EntityKey::Monster(info.id);

        let meta = self.monster_meta.entry(info.id).or_default();
        if info.max_hp > 0 {
            meta.max_hp = info.max_hp;
        }
        if meta.species.is_empty() {
            meta.species = info.species.clone();
        }
        if meta.idle.is_none() && !info.sprite1.is_empty() && !info.sprite2.is_empty() {
            meta.idle = Some([info.sprite1.clone(), info.sprite2.clone()]);
        }

        if let Some(monster) = self.monsters.get_mut(&info.id) {
            monster.tile = tile;
            monster.position = position;
            monster.hp = info.hp;
            render.submit(RenderCommand::MoveTo {
                key,
                position,
                duration: self.tween,
            });
            return Upsert::Updated;
        }

        debug!(id = info.id, species = %info.species, "Spawning monster");
        let label = if info.name.is_empty() {
            info.species.clone()
        } else {
            info.name.clone()
        };
        render.submit(RenderCommand::Spawn {
            key,
            label,
            position,
        });
        if let Some(frames) = meta.idle.clone() {
            render.submit(RenderCommand::SetAnimation {
                key,
                animation: Animation::Idle(frames),
            });
        }
        if let Some(percent) = meta.health_percent(info.hp) {
            render.submit(RenderCommand::HealthBar { key, percent });
        }
        self.monsters.insert(
            info.id,
            Monster {
                id: info.id,
                name: info.name.clone(),
                species: info.species.clone(),
                level: info.level,
                tile,
                position,
                hp: info.hp,
            },
        );
        Upsert::Created
    }

    pub fn move_monster(
        &mut self,
        id: u32,
        tile: TilePos,
        tile_size: Vec2,
        render: &mut dyn RenderSink,
    ) -> bool {
        let Some(monster) = self.monsters.get_mut(&id) else {
            warn!(id, "Move for unknown monster");
            return false;
        };
        monster.tile = tile;
        monster.position = tile_center(tile, tile_size);
        render.submit(RenderCommand::MoveTo {
            key: EntityKey::Monster(id),
            position: monster.position,
            duration: self.tween,
        });
        true
    }

    pub fn remove_monster(&mut self, id: u32, render: &mut dyn RenderSink) -> bool {
        if self.monsters.remove(&id).is_some() {
            render.submit(RenderCommand::Despawn {
                key: EntityKey::Monster(id),
            });
            true
        } else {
            false
        }
    }

    /// Applies a hit: new hp, authoritative tile, health bar, and a knockback
    /// away from `impact`.
    pub fn hit_monster(
        &mut self,
        hit: &MonsterHit,
        impact: Vec2,
        tile_size: Vec2,
        render: &mut dyn RenderSink,
    ) -> bool {
        let Some(monster) = self.monsters.get_mut(&hit.id) else {
            debug!(id = hit.id, "Hit for unknown monster");
            return false;
        };
        let key = EntityKey::Monster(hit.id);
        monster.hp = hit.hp;
        monster.tile = TilePos::new(hit.x, hit.y);
        monster.position = tile_center(monster.tile, tile_size);

        if let Some(percent) = self
            .monster_meta
            .get(&hit.id)
            .and_then(|meta| meta.health_percent(hit.hp))
        {
            render.submit(RenderCommand::HealthBar { key, percent });
        }
        render.submit(RenderCommand::Knockback {
            key,
            impact,
            rest: monster.position,
        });
        true
    }

    /// Applies one monster event. `impact` is where hits come from (the local
    /// player's position).
    pub fn apply_monster(
        &mut self,
        event: MonsterEvent,
        tile_size: Vec2,
        impact: Vec2,
        render: &mut dyn RenderSink,
    ) {
        match event {
            MonsterEvent::Roster(roster) => {
                let present: FxHashSet<u32> = roster.iter().map(|m| m.id).collect();
                let stale: Vec<u32> = self
                    .monsters
                    .keys()
                    .filter(|id| !present.contains(*id))
                    .copied()
                    .collect();
                for id in stale {
                    self.remove_monster(id, render);
                }
                for info in &roster {
                    self.upsert_monster(info, tile_size, render);
                }
            }
            MonsterEvent::Spawn(info) => {
                self.upsert_monster(&info, tile_size, render);
            }
            MonsterEvent::Move(mv) => {
                self.move_monster(mv.id, TilePos::new(mv.x, mv.y), tile_size, render);
            }
            MonsterEvent::Despawn(despawn) => {
                self.remove_monster(despawn.id, render);
            }
            MonsterEvent::Hit(hit) => {
                self.hit_monster(&hit, impact, tile_size, render);
            }
        }
    }

    /// Forgets every remote actor and monster, including cached monster
    /// metadata. Display objects are dropped separately by the map clear.
    pub fn clear(&mut self) {
        self.players.clear();
        self.monsters.clear();
        self.monster_meta.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packets::server::{MonsterMove, PlayerMove};

    #[derive(Default)]
    struct Recorder(Vec<RenderCommand>);

    impl RenderSink for Recorder {
        fn submit(&mut self, command: RenderCommand) {
            self.0.push(command);
        }
    }

    fn actor(id: u32, x: f32, y: f32) -> ActorInfo {
        ActorInfo {
            id,
            name: format!("p{id}"),
            x,
            y,
            map_key: None,
        }
    }

    fn monster(id: u32, x: i32, y: i32) -> MonsterInfo {
        MonsterInfo {
            id,
            name: "Slime".into(),
            species: "slime".into(),
            level: 1,
            x,
            y,
            hp: 20,
            max_hp: 40,
            sprite1: "slime1".into(),
            sprite2: "slime2".into(),
        }
    }

    #[test]
    fn repeated_moves_keep_one_record_at_last_position() {
        let mut registry = EntityRegistry::new(1, 0.13);
        let mut render = Recorder::default();
        registry.apply_player(PlayerEvent::Spawn(actor(2, 0.0, 0.0)), &mut render);
        for step in 1..=5 {
            registry.apply_player(
                PlayerEvent::Move(PlayerMove {
                    id: 2,
                    x: step as f32 * 10.0,
                    y: 4.0,
                }),
                &mut render,
            );
        }
        assert_eq!(registry.player_count(), 1);
        assert_eq!(registry.player(2).unwrap().position, Vec2::new(50.0, 4.0));
        assert_eq!(registry.player(2).unwrap().name, "p2");
    }

    #[test]
    fn duplicate_spawn_is_a_position_update() {
        let mut registry = EntityRegistry::new(1, 0.13);
        let mut render = Recorder::default();
        assert_eq!(
            registry.upsert(3, Vec2::ZERO, "first", &mut render),
            Upsert::Created
        );
        assert_eq!(
            registry.upsert(3, Vec2::ONE, "second", &mut render),
            Upsert::Updated
        );
        assert_eq!(registry.player(3).unwrap().name, "first");
        let spawns = render
            .0
            .iter()
            .filter(|c| matches!(c, RenderCommand::Spawn { .. }))
            .count();
        assert_eq!(spawns, 1);
    }

    #[test]
    fn local_id_is_never_tracked() {
        let mut registry = EntityRegistry::new(7, 0.13);
        let mut render = Recorder::default();
        registry.apply_player(
            PlayerEvent::Roster(vec![actor(7, 1.0, 1.0), actor(8, 2.0, 2.0)]),
            &mut render,
        );
        registry.apply_player(PlayerEvent::Spawn(actor(7, 5.0, 5.0)), &mut render);
        registry.apply_player(
            PlayerEvent::Move(PlayerMove {
                id: 7,
                x: 9.0,
                y: 9.0,
            }),
            &mut render,
        );
        assert!(registry.player(7).is_none());
        assert_eq!(registry.player_count(), 1);
    }

    #[test]
    fn roster_drops_players_missing_from_snapshot() {
        let mut registry = EntityRegistry::new(1, 0.13);
        let mut render = Recorder::default();
        registry.apply_player(
            PlayerEvent::Roster(vec![actor(2, 0.0, 0.0), actor(3, 0.0, 0.0)]),
            &mut render,
        );
        registry.apply_player(PlayerEvent::Roster(vec![actor(3, 1.0, 1.0)]), &mut render);
        assert!(registry.player(2).is_none());
        assert_eq!(registry.player(3).unwrap().position, Vec2::ONE);
    }

    #[test]
    fn move_for_unseen_player_creates_it() {
        let mut registry = EntityRegistry::new(1, 0.13);
        let mut render = Recorder::default();
        for x in [1.0, 2.0, 3.0] {
            registry.apply_player(PlayerEvent::Move(PlayerMove { id: 42, x, y: 1.0 }), &mut render);
        }
        assert_eq!(registry.player_count(), 1);
        assert_eq!(registry.player(42).unwrap().position, Vec2::new(3.0, 1.0));
        assert!(matches!(
            render.0[0],
            RenderCommand::Spawn { key: EntityKey::Player(42), .. }
        ));

        // Local id stays excluded on this path too
        registry.apply_player(PlayerEvent::Move(PlayerMove { id: 1, x: 0.0, y: 0.0 }), &mut render);
        assert!(registry.player(1).is_none());
    }

    #[test]
    fn monster_tiles_become_pixel_centres() {
        let mut registry = EntityRegistry::new(1, 0.13);
        let mut render = Recorder::default();
        let size = Vec2::splat(32.0);
        registry.apply_monster(MonsterEvent::Spawn(monster(5, 2, 3)), size, Vec2::ZERO, &mut render);
        assert_eq!(registry.monster(5).unwrap().position, Vec2::new(80.0, 112.0));

        registry.apply_monster(
            MonsterEvent::Move(MonsterMove { id: 5, x: 3, y: 3 }),
            size,
            Vec2::ZERO,
            &mut render,
        );
        assert_eq!(registry.monster(5).unwrap().tile, TilePos::new(3, 3));
        assert_eq!(registry.monster(5).unwrap().position, Vec2::new(112.0, 112.0));
    }

    #[test]
    fn idle_frames_are_first_seen_wins() {
        let mut registry = EntityRegistry::new(1, 0.13);
        let mut render = Recorder::default();
        let size = Vec2::splat(32.0);
        registry.upsert_monster(&monster(5, 0, 0), size, &mut render);
        let mut respawned = monster(5, 1, 1);
        respawned.sprite1 = "other1".into();
        respawned.sprite2 = "other2".into();
        registry.upsert_monster(&respawned, size, &mut render);

        let meta = registry.monster_meta(5).unwrap();
        assert_eq!(meta.idle, Some(["slime1".to_string(), "slime2".to_string()]));
        assert_eq!(registry.monster(5).unwrap().tile, TilePos::new(1, 1));
    }

    #[test]
    fn hit_updates_health_and_knocks_back() {
        let mut registry = EntityRegistry::new(1, 0.13);
        let mut render = Recorder::default();
        let size = Vec2::splat(32.0);
        registry.upsert_monster(&monster(5, 2, 2), size, &mut render);
        render.0.clear();

        let hit = MonsterHit {
            id: 5,
            dmg: 10,
            hp: 10,
            x: 2,
            y: 2,
        };
        assert!(registry.hit_monster(&hit, Vec2::ZERO, size, &mut render));
        assert_eq!(registry.monster(5).unwrap().hp, 10);
        assert_eq!(
            render.0[0],
            RenderCommand::HealthBar {
                key: EntityKey::Monster(5),
                percent: 0.25
            }
        );
        assert!(matches!(render.0[1], RenderCommand::Knockback { .. }));
    }

    #[test]
    fn clear_forgets_everything() {
        let mut registry = EntityRegistry::new(1, 0.13);
        let mut render = Recorder::default();
        registry.upsert(2, Vec2::ZERO, "p2", &mut render);
        registry.upsert_monster(&monster(5, 0, 0), Vec2::splat(32.0), &mut render);
        registry.clear();
        assert_eq!(registry.player_count(), 0);
        assert_eq!(registry.monster_count(), 0);
        assert!(registry.monster_meta(5).is_none());
    }
}

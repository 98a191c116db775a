//! Map loading. One transition in flight at a time; requests made while
//! loading are dropped and the running fetch still finishes. A failed load
//! leaves no map installed and discards buffered monster events.

use std::sync::Arc;

use futures_lite::future::{self, Boxed};
use game_types::{MapMeta, NpcMeta, TilePos};
use glam::Vec2;
use packets::client;
use thiserror::Error;
use tracing::{debug, error, info};

use super::components::{Actor, pixel_to_tile, tile_center};
use super::event_queue::EventQueue;
use super::interaction::InteractionTrigger;
use super::registry::EntityRegistry;
use crate::metadata::{FetchError, MetadataSource};
use crate::network::PacketOutbox;
use crate::render::{EntityKey, RenderCommand, RenderSink};

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("map metadata fetch failed for {map_key}: {source}")]
    MapFetch {
        map_key: String,
        #[source]
        source: FetchError,
    },
    #[error("npc metadata fetch failed for {map_key}: {source}")]
    NpcFetch {
        map_key: String,
        #[source]
        source: FetchError,
    },
    #[error("map {0} has no tileset")]
    MissingTileset(String),
    #[error("map {0} has no tile layer")]
    MissingLayer(String),
    #[error("map {map_key} has invalid tile size {width}x{height}")]
    InvalidTileSize {
        map_key: String,
        width: u32,
        height: u32,
    },
}

impl TransitionError {
    pub fn map_key(&self) -> &str {
        match self {
            TransitionError::MapFetch { map_key, .. }
            | TransitionError::NpcFetch { map_key, .. }
            | TransitionError::InvalidTileSize { map_key, .. } => map_key,
            TransitionError::MissingTileset(key) | TransitionError::MissingLayer(key) => key,
        }
    }
}

/// Where the local player lands on the destination map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnPoint {
    Tile(TilePos),
    /// Pixel coordinates, snapped to their tile once the tile size is known
    Pixel(Vec2),
    /// The map's own `start_position`
    MapStart,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransitionTarget {
    pub map_key: String,
    pub spawn: SpawnPoint,
}

impl TransitionTarget {
    pub fn tile(map_key: impl Into<String>, tile: TilePos) -> Self {
        Self {
            map_key: map_key.into(),
            spawn: SpawnPoint::Tile(tile),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    Loading,
    Ready,
}

#[derive(Debug)]
pub enum TransitionOutcome {
    Completed { map_key: String, display_name: String },
    Failed(TransitionError),
}

/// World state a transition resets and repopulates.
pub struct TransitionContext<'a> {
    pub registry: &'a mut EntityRegistry,
    pub queue: &'a mut EventQueue,
    pub interaction: &'a mut InteractionTrigger,
    pub local: &'a mut Actor,
    pub render: &'a mut dyn RenderSink,
    pub outbox: &'a PacketOutbox,
}

struct PendingLoad {
    target: TransitionTarget,
    map_task: Option<Boxed<Result<MapMeta, FetchError>>>,
    npc_task: Option<Boxed<Result<Vec<NpcMeta>, FetchError>>>,
    map: Option<MapMeta>,
    npcs: Option<Vec<NpcMeta>>,
}

pub struct MapTransitionManager {
    source: Arc<dyn MetadataSource>,
    character_id: u32,
    phase: TransitionPhase,
    pending: Option<PendingLoad>,
    map: Option<MapMeta>,
    npcs: Vec<NpcMeta>,
    tile_size: Option<Vec2>,
    ready: bool,
    last_joined: Option<String>,
}

impl MapTransitionManager {
    pub fn new(source: Arc<dyn MetadataSource>, character_id: u32) -> Self {
        Self {
            source,
            character_id,
            phase: TransitionPhase::Idle,
            pending: None,
            map: None,
            npcs: Vec::new(),
            tile_size: None,
            ready: false,
            last_joined: None,
        }
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// The transition lock: held for the whole of a map change.
    pub fn is_locked(&self) -> bool {
        self.phase != TransitionPhase::Idle
    }

    /// Whether the current map's geometry is installed.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn map(&self) -> Option<&MapMeta> {
        self.map.as_ref()
    }

    pub fn npcs(&self) -> &[NpcMeta] {
        &self.npcs
    }

    /// Tile size of the last installed map. Survives the reset at the start
    /// of a transition so the HUD keeps reporting tiles.
    pub fn tile_size(&self) -> Option<Vec2> {
        self.tile_size
    }

    /// Starts loading `target`. Returns `false` if a transition is already in
    /// flight, in which case nothing changes.
    pub fn request(&mut self, target: TransitionTarget, ctx: &mut TransitionContext<'_>) -> bool {
        if self.is_locked() {
            debug!(map_key = %target.map_key, "Transition already in progress, dropping request");
            return false;
        }

        info!(map_key = %target.map_key, spawn = ?target.spawn, "Starting map transition");
        self.phase = TransitionPhase::Loading;
        self.ready = false;
        self.map = None;
        self.npcs.clear();
        ctx.registry.clear();
        ctx.interaction.reset();
        ctx.render.submit(RenderCommand::ClearMap);

        self.pending = Some(PendingLoad {
            map_task: Some(self.source.fetch_map(&target.map_key)),
            npc_task: Some(self.source.fetch_npcs(&target.map_key)),
            target,
            map: None,
            npcs: None,
        });
        true
    }

    /// Advances the in-flight load. Returns an outcome on the tick the
    /// transition finishes, successfully or not.
    pub fn poll(&mut self, ctx: &mut TransitionContext<'_>) -> Option<TransitionOutcome> {
        let pending = self.pending.as_mut()?;

        if let Some(task) = pending.map_task.as_mut() {
            if let Some(result) = future::block_on(future::poll_once(task)) {
                pending.map_task = None;
                match result {
                    Ok(map) => pending.map = Some(map),
                    Err(source) => {
                        let map_key = pending.target.map_key.clone();
                        return Some(self.fail(TransitionError::MapFetch { map_key, source }, ctx));
                    }
                }
            }
        }

        if let Some(task) = pending.npc_task.as_mut() {
            if let Some(result) = future::block_on(future::poll_once(task)) {
                pending.npc_task = None;
                match result {
                    Ok(npcs) => pending.npcs = Some(npcs),
                    Err(source) => {
                        let map_key = pending.target.map_key.clone();
                        return Some(self.fail(TransitionError::NpcFetch { map_key, source }, ctx));
                    }
                }
            }
        }

        if pending.map.is_none() || pending.npcs.is_none() {
            return None;
        }

        let PendingLoad {
            target, map, npcs, ..
        } = self.pending.take()?;
        let (map, npcs) = (map?, npcs?);

        if let Err(err) = validate(&map) {
            return Some(self.fail(err, ctx));
        }
        Some(self.install(target, map, npcs, ctx))
    }

    fn install(
        &mut self,
        target: TransitionTarget,
        map: MapMeta,
        npcs: Vec<NpcMeta>,
        ctx: &mut TransitionContext<'_>,
    ) -> TransitionOutcome {
        let tile_size = Vec2::new(map.tile_width as f32, map.tile_height as f32);
        ctx.render.submit(RenderCommand::LoadMap {
            key: map.key.clone(),
            json_file: map.json_file.clone(),
            tileset_file: map.tileset_file.clone(),
            tile_size,
        });
        for npc in &npcs {
            ctx.render.submit(RenderCommand::Spawn {
                key: EntityKey::Npc(npc.id),
                label: npc.name.clone(),
                position: Vec2::new(npc.x, npc.y),
            });
        }

        let tile = match target.spawn {
            SpawnPoint::Tile(tile) => tile,
            SpawnPoint::Pixel(position) => pixel_to_tile(position, tile_size),
            SpawnPoint::MapStart => TilePos::from(map.start_position),
        };
        ctx.local.position = tile_center(tile, tile_size);
        ctx.render.submit(RenderCommand::MoveTo {
            key: EntityKey::Local,
            position: ctx.local.position,
            duration: 0.0,
        });

        if self.last_joined.as_deref() != Some(map.key.as_str()) {
            ctx.outbox.send(&client::JoinMap {
                character_id: self.character_id,
                map_key: map.key.clone(),
            });
            self.last_joined = Some(map.key.clone());
        }

        let outcome = TransitionOutcome::Completed {
            map_key: map.key.clone(),
            display_name: map.display_name.clone(),
        };
        info!(map_key = %map.key, ?tile, npcs = npcs.len(), "Map ready");
        self.tile_size = Some(tile_size);
        self.map = Some(map);
        self.npcs = npcs;

        self.phase = TransitionPhase::Ready;
        self.ready = true;
        let replayed = ctx.queue.len();
        for event in ctx.queue.drain() {
            ctx.registry
                .apply_monster(event, tile_size, ctx.local.position, &mut *ctx.render);
        }
        if replayed > 0 {
            debug!(replayed, "Replayed buffered monster events");
        }
        self.phase = TransitionPhase::Idle;
        outcome
    }

    /// Buffered monster events are discarded: no map was installed for them
    /// to replay against.
    fn fail(&mut self, err: TransitionError, ctx: &mut TransitionContext<'_>) -> TransitionOutcome {
        error!(map_key = err.map_key(), %err, dropped = ctx.queue.len(), "Map transition failed");
        ctx.queue.clear();
        self.pending = None;
        self.phase = TransitionPhase::Idle;
        TransitionOutcome::Failed(err)
    }

    /// Drops any in-flight load without finishing it.
    pub fn abandon(&mut self) {
        self.pending = None;
        self.phase = TransitionPhase::Idle;
        self.ready = false;
    }
}

fn validate(map: &MapMeta) -> Result<(), TransitionError> {
    if map.tile_width == 0 || map.tile_height == 0 {
        return Err(TransitionError::InvalidTileSize {
            map_key: map.key.clone(),
            width: map.tile_width,
            height: map.tile_height,
        });
    }
    if map.tileset_file.trim().is_empty() {
        return Err(TransitionError::MissingTileset(map.key.clone()));
    }
    if map.json_file.trim().is_empty() {
        return Err(TransitionError::MissingLayer(map.key.clone()));
    }
    Ok(())
}

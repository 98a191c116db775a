#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use arkacia_lib::events::{InboundEvent, InputState, UiSignal};
use arkacia_lib::metadata::{FetchError, MetadataSource};
use arkacia_lib::network::{PacketOutbox, UiBridge};
use arkacia_lib::render::{RenderCommand, RenderSink};
use arkacia_lib::settings::Settings;
use arkacia_lib::world::{Identity, Ports, SpawnPoint, TransitionTarget, WorldClient};
use futures_lite::future::Boxed;
use game_types::{MapMeta, NpcMeta, NpcType, Portal, PortalSource, TilePos};

pub const LOCAL_ID: u32 = 12;
pub const TICK: f32 = 1.0 / 60.0;

/// In-memory metadata. Fetches resolve as soon as they are polled unless a
/// gate is held, in which case they wait until it is released.
#[derive(Default)]
pub struct ScriptedMetadata {
    maps: Mutex<HashMap<String, MapMeta>>,
    npcs: Mutex<HashMap<String, Vec<NpcMeta>>>,
    gate: Mutex<Option<async_channel::Receiver<()>>>,
    map_fetches: Mutex<Vec<String>>,
    npc_fetches: Mutex<Vec<String>>,
}

impl ScriptedMetadata {
    pub fn insert_map(&self, map: MapMeta) {
        self.maps.lock().unwrap().insert(map.key.clone(), map);
    }

    pub fn insert_npcs(&self, map_key: &str, npcs: Vec<NpcMeta>) {
        self.npcs.lock().unwrap().insert(map_key.to_string(), npcs);
    }

    /// Holds every fetch started from now on. Dropping the returned sender
    /// releases them.
    pub fn hold(&self) -> async_channel::Sender<()> {
        let (tx, rx) = async_channel::bounded(1);
        *self.gate.lock().unwrap() = Some(rx);
        tx
    }

    pub fn map_fetches(&self) -> Vec<String> {
        self.map_fetches.lock().unwrap().clone()
    }

    pub fn npc_fetches(&self) -> Vec<String> {
        self.npc_fetches.lock().unwrap().clone()
    }
}

impl MetadataSource for ScriptedMetadata {
    fn fetch_map(&self, map_key: &str) -> Boxed<Result<MapMeta, FetchError>> {
        self.map_fetches.lock().unwrap().push(map_key.to_string());
        let result = self
            .maps
            .lock()
            .unwrap()
            .get(map_key)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(map_key.to_string()));
        let gate = self.gate.lock().unwrap().clone();
        Box::pin(async move {
            if let Some(gate) = gate {
                let _ = gate.recv().await;
            }
            result
        })
    }

    fn fetch_npcs(&self, map_key: &str) -> Boxed<Result<Vec<NpcMeta>, FetchError>> {
        self.npc_fetches.lock().unwrap().push(map_key.to_string());
        let result = Ok(self
            .npcs
            .lock()
            .unwrap()
            .get(map_key)
            .cloned()
            .unwrap_or_default());
        let gate = self.gate.lock().unwrap().clone();
        Box::pin(async move {
            if let Some(gate) = gate {
                let _ = gate.recv().await;
            }
            result
        })
    }
}

/// Render sink that only records what it was asked to do.
#[derive(Clone, Default)]
pub struct RecordingSink(pub Arc<Mutex<Vec<RenderCommand>>>);

impl RenderSink for RecordingSink {
    fn submit(&mut self, command: RenderCommand) {
        self.0.lock().unwrap().push(command);
    }
}

pub fn map(key: &str, tile: u32, portals: Vec<Portal>) -> MapMeta {
    MapMeta {
        key: key.to_string(),
        display_name: key.to_uppercase(),
        json_file: format!("{key}.json"),
        tileset_file: "tmw_grass_spacing.png".to_string(),
        tile_width: tile,
        tile_height: tile,
        width: 40,
        height: 30,
        start_position: [6, 12],
        teleports: portals,
    }
}

pub fn point_portal(x: i32, y: i32, to_map: &str, to: [i32; 2]) -> Portal {
    Portal {
        from: PortalSource::Point { x, y },
        to_map: to_map.to_string(),
        to_position: to,
    }
}

pub fn npc(id: u32, name: &str, x: f32, y: f32) -> NpcMeta {
    NpcMeta {
        id,
        name: name.to_string(),
        job: "merchant".to_string(),
        race: "human".to_string(),
        dialog: "Welcome!".to_string(),
        npc_type: NpcType::Shop,
        x,
        y,
    }
}

/// `worldmap` (128 px tiles) with a portal at (14,15) into `city2`
/// (64 px tiles), which has one NPC 40 px east of its arrival tile (13,2).
pub fn standard_metadata() -> ScriptedMetadata {
    let metadata = ScriptedMetadata::default();
    metadata.insert_map(map(
        "worldmap",
        128,
        vec![point_portal(14, 15, "city2", [13, 2])],
    ));
    metadata.insert_map(map("city2", 64, vec![]));
    metadata.insert_npcs("city2", vec![npc(1, "Elder", 13.5 * 64.0 + 40.0, 2.5 * 64.0)]);
    metadata
}

pub struct TestWorld {
    pub world: WorldClient,
    pub metadata: Arc<ScriptedMetadata>,
    outbox_rx: async_channel::Receiver<Vec<u8>>,
    ui_rx: crossbeam_channel::Receiver<UiSignal>,
    render_log: Arc<Mutex<Vec<RenderCommand>>>,
}

impl TestWorld {
    pub fn new(metadata: ScriptedMetadata) -> Self {
        Self::with_settings(metadata, Settings::default())
    }

    pub fn with_settings(metadata: ScriptedMetadata, settings: Settings) -> Self {
        let metadata = Arc::new(metadata);
        let (outbox, outbox_rx) = PacketOutbox::channel();
        let (ui, ui_rx) = UiBridge::channel();
        let sink = RecordingSink::default();
        let render_log = sink.0.clone();
        let ports = Ports {
            outbox,
            render: Box::new(sink),
            ui,
            metadata: metadata.clone(),
        };
        let identity = Identity {
            character_id: LOCAL_ID,
            name: "hero".to_string(),
        };
        Self {
            world: WorldClient::new(identity, ports, &settings),
            metadata,
            outbox_rx,
            ui_rx,
            render_log,
        }
    }

    pub fn start_at(&mut self, map_key: &str, x: i32, y: i32) {
        self.world.initialize(TransitionTarget {
            map_key: map_key.to_string(),
            spawn: SpawnPoint::Tile(TilePos::new(x, y)),
        });
    }

    pub fn step(&mut self, input: InputState) {
        self.world.tick(TICK, input);
    }

    pub fn step_for(&mut self, dt: f32, input: InputState) {
        self.world.tick(dt, input);
    }

    /// Ticks until no transition is in flight.
    pub fn settle(&mut self) {
        for _ in 0..10 {
            self.step(InputState::default());
            if !self.world.is_locked() {
                return;
            }
        }
        panic!("transition did not settle");
    }

    pub fn send(&mut self, event: InboundEvent) {
        self.world.handle_inbound(event);
    }

    /// Drains outbound frames as `(event, data)`.
    pub fn sent_frames(&self) -> Vec<(String, serde_json::Value)> {
        let mut frames = vec![];
        while let Ok(frame) = self.outbox_rx.try_recv() {
            let (event, data) = packets::split_frame(&frame).unwrap();
            frames.push((event, serde_json::from_slice(&data).unwrap()));
        }
        frames
    }

    pub fn sent_events(&self, event: &str) -> Vec<serde_json::Value> {
        self.sent_frames()
            .into_iter()
            .filter(|(name, _)| name == event)
            .map(|(_, data)| data)
            .collect()
    }

    pub fn ui_signals(&self) -> Vec<UiSignal> {
        self.ui_rx.try_iter().collect()
    }

    pub fn render_commands(&self) -> Vec<RenderCommand> {
        std::mem::take(&mut *self.render_log.lock().unwrap())
    }
}

pub fn held(up: bool, down: bool, left: bool, right: bool) -> InputState {
    InputState {
        up,
        down,
        left,
        right,
    }
}

pub fn right() -> InputState {
    held(false, false, false, true)
}

pub fn left() -> InputState {
    held(false, false, true, false)
}

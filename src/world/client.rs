use std::sync::Arc;

use game_types::{CharacterPatch, MapMeta, MovementSettings};
use glam::Vec2;
use packets::client;
use tracing::{debug, info};

use super::components::{Actor, pixel_to_tile};
use super::event_queue::EventQueue;
use super::interaction::{InteractionState, InteractionTrigger};
use super::portal;
use super::registry::EntityRegistry;
use super::throttle::OutboundThrottle;
use super::transition::{
    MapTransitionManager, SpawnPoint, TransitionContext, TransitionOutcome, TransitionTarget,
};
use crate::events::{CharacterEvent, InboundEvent, InputState, UiAction, UiSignal};
use crate::metadata::MetadataSource;
use crate::network::{PacketOutbox, UiBridge};
use crate::render::{Animation, EntityKey, RenderCommand, RenderSink};
use crate::settings::Settings;

/// Who the local player is. Passed in explicitly, never looked up.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub character_id: u32,
    pub name: String,
}

/// Everything the world client talks to.
pub struct Ports {
    pub outbox: PacketOutbox,
    pub render: Box<dyn RenderSink>,
    pub ui: UiBridge,
    pub metadata: Arc<dyn MetadataSource>,
}

pub struct WorldClient {
    identity: Identity,
    outbox: PacketOutbox,
    render: Box<dyn RenderSink>,
    ui: UiBridge,
    local: Actor,
    walking: bool,
    registry: EntityRegistry,
    queue: EventQueue,
    transitions: MapTransitionManager,
    interaction: InteractionTrigger,
    throttle: OutboundThrottle,
    movement: MovementSettings,
    bgm_enabled: bool,
    torn_down: bool,
}

impl WorldClient {
    pub fn new(identity: Identity, ports: Ports, settings: &Settings) -> Self {
        let tween = settings.movement.tween_ms as f32 / 1000.0;
        let mut local = Actor::local(identity.character_id);
        local.name = identity.name.clone();
        Self {
            registry: EntityRegistry::new(identity.character_id, tween),
            transitions: MapTransitionManager::new(ports.metadata, identity.character_id),
            identity,
            outbox: ports.outbox,
            render: ports.render,
            ui: ports.ui,
            local,
            walking: false,
            queue: EventQueue::default(),
            interaction: InteractionTrigger::new(settings.interaction),
            throttle: OutboundThrottle::default(),
            movement: settings.movement,
            bgm_enabled: settings.audio.bgm_enabled,
            torn_down: false,
        }
    }

    // === Lifecycle ===

    /// Places the local player and starts loading the first map.
    pub fn initialize(&mut self, spawn: TransitionTarget) {
        info!(
            character_id = self.identity.character_id,
            map_key = %spawn.map_key,
            "Initializing world client"
        );
        self.render.submit(RenderCommand::Spawn {
            key: EntityKey::Local,
            label: self.identity.name.clone(),
            position: self.local.position,
        });
        self.render.submit(RenderCommand::SetAnimation {
            key: EntityKey::Local,
            animation: Animation::Stand,
        });
        self.ui.emit(UiSignal::BgmState(self.bgm_enabled));
        self.request_transition(spawn);
    }

    /// One fixed-rate update.
    pub fn tick(&mut self, dt: f32, input: InputState) {
        if self.torn_down {
            return;
        }

        self.poll_transition();

        if self.transitions.is_locked() {
            if !input.is_idle() {
                self.throttle.send_move(
                    &self.outbox,
                    true,
                    self.identity.character_id,
                    "",
                    self.local.position,
                );
            }
        } else if self.transitions.is_ready() {
            self.update_spatial(dt, input);
        }

        if let Some(tile_size) = self.transitions.tile_size() {
            let tile = pixel_to_tile(self.local.position, tile_size);
            self.ui.emit(UiSignal::Coords {
                x: tile.x,
                y: tile.y,
            });
        }

        self.render.advance(dt);
    }

    /// Stops all work. Later calls into the client do nothing.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        info!(character_id = self.identity.character_id, "Tearing down world client");
        self.transitions.abandon();
        self.registry.clear();
        self.queue.clear();
        self.interaction.reset();
        self.render.submit(RenderCommand::ClearMap);
        self.render.submit(RenderCommand::Despawn {
            key: EntityKey::Local,
        });
        self.torn_down = true;
    }

    // === Reducers ===

    pub fn handle_inbound(&mut self, event: InboundEvent) {
        if self.torn_down {
            return;
        }
        match event {
            InboundEvent::Player(event) => {
                self.registry.apply_player(event, self.render.as_mut());
            }
            InboundEvent::Monster(event) => match self.transitions.tile_size() {
                Some(tile_size) if self.transitions.is_ready() => {
                    self.registry.apply_monster(
                        event,
                        tile_size,
                        self.local.position,
                        self.render.as_mut(),
                    );
                }
                _ if self.transitions.is_locked() => self.queue.push(event),
                // No map and no load in flight: nothing would ever replay these
                _ => debug!(?event, "Dropping monster event without a map"),
            },
            InboundEvent::Character(event) => self.handle_character(event),
            InboundEvent::Chat(message) => self.ui.emit(UiSignal::ChatMessage(message)),
        }
    }

    fn handle_character(&mut self, event: CharacterEvent) {
        let me = self.identity.character_id;
        match event {
            CharacterEvent::Hit(hit) if hit.id == me => {
                self.ui.emit(UiSignal::CharUpdate(CharacterPatch::hp(hit.hp)));
            }
            CharacterEvent::Respawn(respawn) if respawn.id == me => {
                self.ui.emit(UiSignal::CharUpdate(CharacterPatch::hp(respawn.hp)));
                self.request_transition(TransitionTarget {
                    map_key: respawn.map_key,
                    spawn: SpawnPoint::Pixel(Vec2::new(respawn.x, respawn.y)),
                });
            }
            CharacterEvent::ExpGain(gain) if gain.char_id == me => {
                self.ui.emit(UiSignal::CharUpdate(CharacterPatch {
                    exp: Some(gain.total_exp),
                    level: Some(gain.level),
                    ..Default::default()
                }));
                if gain.level_up {
                    info!(level = gain.level, "Level up");
                    self.ui.emit(UiSignal::LevelUp { level: gain.level });
                }
            }
            other => debug!(?other, "Character event for another player"),
        }
    }

    pub fn handle_ui(&mut self, action: UiAction) {
        if self.torn_down {
            return;
        }
        match action {
            UiAction::NpcDialogClosed => self.interaction.dialog_closed(),
            UiAction::ToggleBgm => {
                self.bgm_enabled = !self.bgm_enabled;
                self.ui.emit(UiSignal::BgmState(self.bgm_enabled));
            }
            UiAction::SendChat(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return;
                }
                self.outbox.send(&client::ChatMessage {
                    sender_id: self.identity.character_id,
                    text: text.to_string(),
                });
            }
        }
    }

    // === Internals ===

    fn context(&mut self) -> (&mut MapTransitionManager, TransitionContext<'_>) {
        (
            &mut self.transitions,
            TransitionContext {
                registry: &mut self.registry,
                queue: &mut self.queue,
                interaction: &mut self.interaction,
                local: &mut self.local,
                render: self.render.as_mut(),
                outbox: &self.outbox,
            },
        )
    }

    fn request_transition(&mut self, target: TransitionTarget) -> bool {
        let (transitions, mut ctx) = self.context();
        transitions.request(target, &mut ctx)
    }

    fn poll_transition(&mut self) {
        let (transitions, mut ctx) = self.context();
        match transitions.poll(&mut ctx) {
            Some(TransitionOutcome::Completed { display_name, .. }) => {
                self.ui.emit(UiSignal::MapKey(display_name));
            }
            Some(TransitionOutcome::Failed(err)) => {
                self.ui.emit(UiSignal::TransitionFailed {
                    map_key: err.map_key().to_string(),
                    reason: err.to_string(),
                });
            }
            None => {}
        }
    }

    /// Movement, then portals, then NPCs, then the outbound move.
    fn update_spatial(&mut self, dt: f32, input: InputState) {
        let Some(tile_size) = self.transitions.tile_size() else {
            return;
        };
        let before = self.local.position;
        self.step_movement(dt, input);
        let moved = self.local.position != before;

        let tile = pixel_to_tile(self.local.position, tile_size);
        let portal_hit = self
            .transitions
            .map()
            .and_then(|map| portal::detect(tile, &map.teleports))
            .map(|portal| TransitionTarget::tile(portal.to_map.clone(), portal.destination()));

        if let Some(target) = portal_hit {
            debug!(?tile, map_key = %target.map_key, "Portal reached");
            self.request_transition(target);
        } else if let Some(npc) = self
            .interaction
            .update(self.local.position, self.transitions.npcs())
        {
            self.ui.emit(UiSignal::OpenNpcDialog(npc.clone()));
        }

        if moved {
            let map_key = self
                .transitions
                .map()
                .map(|map| map.key.clone())
                .unwrap_or_default();
            self.throttle.send_move(
                &self.outbox,
                self.transitions.is_locked(),
                self.identity.character_id,
                &map_key,
                self.local.position,
            );
        }
    }

    fn step_movement(&mut self, dt: f32, input: InputState) {
        let velocity = input.axis() * self.movement.speed;
        let mut next = self.local.position + velocity * dt;
        if let Some((w, h)) = self.transitions.map().and_then(MapMeta::pixel_bounds) {
            next = next.clamp(Vec2::ZERO, Vec2::new(w, h));
        }

        let walking = next != self.local.position;
        if walking != self.walking {
            self.render.submit(RenderCommand::SetAnimation {
                key: EntityKey::Local,
                animation: if walking {
                    Animation::Walk
                } else {
                    Animation::Stand
                },
            });
            self.walking = walking;
        }
        if walking {
            self.local.position = next;
            self.render.submit(RenderCommand::MoveTo {
                key: EntityKey::Local,
                position: next,
                duration: 0.0,
            });
        }
    }

    // === Accessors ===

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn local_position(&self) -> Vec2 {
        self.local.position
    }

    pub fn current_map(&self) -> Option<&MapMeta> {
        self.transitions.map()
    }

    pub fn is_ready(&self) -> bool {
        self.transitions.is_ready()
    }

    pub fn is_locked(&self) -> bool {
        self.transitions.is_locked()
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn queued_events(&self) -> usize {
        self.queue.len()
    }

    pub fn interaction_state(&self) -> InteractionState {
        self.interaction.state()
    }

    pub fn bgm_enabled(&self) -> bool {
        self.bgm_enabled
    }

    pub fn suppressed_moves(&self) -> u64 {
        self.throttle.suppressed()
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}

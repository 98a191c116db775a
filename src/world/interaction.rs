use game_types::{InteractionSettings, NpcMeta};
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Engaged(u32),
    CoolingDown(u32),
}

/// Proximity trigger for NPC dialogs with a hysteresis band: engage under
/// `talk_distance`, re-arm only once the engaged NPC is at least
/// `reset_distance` away. One NPC at a time, system wide.
#[derive(Debug, Clone)]
pub struct InteractionTrigger {
    engaged_npc_id: u32,
    cooling_down: bool,
    talk_distance: f32,
    reset_distance: f32,
}

impl InteractionTrigger {
    pub fn new(settings: InteractionSettings) -> Self {
        Self {
            engaged_npc_id: 0,
            cooling_down: false,
            talk_distance: settings.talk_distance,
            reset_distance: settings.reset_distance,
        }
    }

    pub fn state(&self) -> InteractionState {
        match (self.engaged_npc_id, self.cooling_down) {
            (0, _) => InteractionState::Idle,
            (id, false) => InteractionState::Engaged(id),
            (id, true) => InteractionState::CoolingDown(id),
        }
    }

    /// Runs one proximity check and returns the NPC whose dialog should open.
    pub fn update<'a>(&mut self, player: Vec2, npcs: &'a [NpcMeta]) -> Option<&'a NpcMeta> {
        match self.state() {
            InteractionState::Idle => {
                let npc = npcs
                    .iter()
                    .find(|npc| npc_distance(player, npc) < self.talk_distance)?;
                tracing::debug!(npc_id = npc.id, name = %npc.name, "Engaging NPC");
                self.engaged_npc_id = npc.id;
                Some(npc)
            }
            InteractionState::Engaged(_) => None,
            InteractionState::CoolingDown(id) => {
                let far = npcs
                    .iter()
                    .find(|npc| npc.id == id)
                    .is_none_or(|npc| npc_distance(player, npc) >= self.reset_distance);
                if far {
                    self.reset();
                }
                None
            }
        }
    }

    /// The UI closed the dialog; wait for the player to walk away.
    pub fn dialog_closed(&mut self) {
        if self.engaged_npc_id != 0 {
            self.cooling_down = true;
        }
    }

    pub fn reset(&mut self) {
        self.engaged_npc_id = 0;
        self.cooling_down = false;
    }
}

fn npc_distance(player: Vec2, npc: &NpcMeta) -> f32 {
    player.distance(Vec2::new(npc.x, npc.y))
}

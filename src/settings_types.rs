pub use game_types::{InteractionSettings, MovementSettings, ServerEntry};

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AudioSettings {
    pub bgm_enabled: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self { bgm_enabled: true }
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub server: ServerEntry,
    pub tick_rate_hz: u32,
    pub audio: AudioSettings,
    pub interaction: InteractionSettings,
    pub movement: MovementSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerEntry::default(),
            tick_rate_hz: 60,
            audio: AudioSettings::default(),
            interaction: InteractionSettings::default(),
            movement: MovementSettings::default(),
        }
    }
}

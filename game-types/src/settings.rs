use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEntry {
    pub name: String,
    /// `host:port` of the world event socket
    pub address: String,
    /// Base URL of the metadata HTTP API
    pub api_base_url: String,
}

impl Default for ServerEntry {
    fn default() -> Self {
        Self {
            name: "Local".to_string(),
            address: "127.0.0.1:5001".to_string(),
            api_base_url: "http://127.0.0.1:5000".to_string(),
        }
    }
}

/// Distances in pixels between the local player and an NPC.
/// `reset_distance` must stay above `talk_distance` or the dialog flickers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    pub talk_distance: f32,
    pub reset_distance: f32,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            talk_distance: 48.0,
            reset_distance: 64.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    /// Local walking speed in pixels per second
    pub speed: f32,
    /// Interpolation time applied to every remote position update
    pub tween_ms: u32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            speed: 200.0,
            tween_ms: 130,
        }
    }
}

pub use crate::settings_types::*;
use crate::storage_dir;
use std::fs;
use std::path::Path;
use tracing::{error, info};

impl Settings {
    pub fn load() -> Self {
        let path = storage_dir().join("settings.toml");
        if path.exists() {
            Self::load_from(&path)
        } else {
            info!("Creating default settings at {:?}", path);
            let default_settings = Settings::default();
            default_settings.save_to(&path);
            default_settings
        }
    }

    /// Reads settings from `path`, falling back to defaults on any error.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<Settings>(&content) {
                Ok(s) => {
                    info!("Loaded settings from {:?}", path);
                    s.sanitized()
                }
                Err(e) => {
                    error!("Failed to parse {:?}: {}", path, e);
                    Settings::default()
                }
            },
            Err(e) => {
                error!("Failed to read {:?}: {}", path, e);
                Settings::default()
            }
        }
    }

    pub fn save(&self) {
        self.save_to(&storage_dir().join("settings.toml"));
    }

    pub fn save_to(&self, path: &Path) {
        match toml::to_string_pretty(self) {
            Ok(content) => {
                if let Err(e) = fs::write(path, content) {
                    error!("Failed to write {:?}: {}", path, e);
                } else {
                    info!("Saved settings to {:?}", path);
                }
            }
            Err(e) => error!("Failed to serialize settings: {}", e),
        }
    }

    // A hand-edited file can break the hysteresis band; restore the defaults.
    fn sanitized(mut self) -> Self {
        if self.interaction.reset_distance <= self.interaction.talk_distance {
            error!(
                talk = self.interaction.talk_distance,
                reset = self.interaction.reset_distance,
                "reset_distance must exceed talk_distance; using defaults"
            );
            self.interaction = InteractionSettings::default();
        }
        if self.tick_rate_hz == 0 {
            self.tick_rate_hz = Settings::default().tick_rate_hz;
        }
        self
    }
}

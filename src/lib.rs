pub mod events;
pub mod metadata;
pub mod network;
pub mod render;
pub mod session;
pub mod settings;
pub mod settings_types;
pub mod world;

pub fn storage_dir() -> std::path::PathBuf {
    let mut path = dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    path.push("Arkacia");
    let _ = std::fs::create_dir_all(&path);
    path
}

//! Settings persistence, live mirroring and change watching.

mod heal;
pub mod mirror;
pub mod store;
pub mod watcher;

pub use heal::{HealedSettings, heal_settings, serialize_settings};
pub use mirror::ConfigMirror;
pub use store::{FileSettingsStore, LoadedSettings, MemorySettingsStore, SettingsStore};
pub use watcher::{SettingsEvent, SettingsWatcher};

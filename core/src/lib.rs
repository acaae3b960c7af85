pub mod config;
pub mod error;
pub mod host;
pub mod mode;
pub mod session;
pub mod signals;
pub mod sim;

// Re-exports for convenience
pub use config::{ConfigMirror, FileSettingsStore, MemorySettingsStore, SettingsStore, SettingsWatcher};
pub use error::ConfigError;
pub use host::Environment;
pub use mode::resolve_mode;
pub use session::{GameState, Orchestrator};
pub use signals::{SessionSignal, SignalHandler};
pub use tweaks_types::{Mode, Settings};

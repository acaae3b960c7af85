//! Shared settings types for Tweaks.
//!
//! Kept separate from the core so settings editors and the simulator can
//! read the schema without pulling in the orchestrator.

pub mod formatting;
mod listings;
mod settings;

pub use listings::{ListingKind, SettingListing, SETTINGS_LISTINGS};
pub use settings::{Mode, ModeTunables, Settings, MISSION_SEED_UNSET};

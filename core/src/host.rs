//! Seams onto the host game.
//!
//! [`Environment`] is what every host provides. Room- and mod-specific
//! features are optional capabilities: the accessor returns `None` when the
//! feature is not present and the orchestrator skips the dependent work.

use crate::session::placeholder::CasePlaceholder;

pub type EntityId = u64;
pub type DeviceId = u32;
pub type RoutineId = u32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl LightColor {
    pub const NEUTRAL_GRAY: LightColor = LightColor {
        r: 0.5,
        g: 0.5,
        b: 0.5,
    };
}

/// Scenes with tunable fade and load timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scene {
    Main,
    GameplayLoading,
    Gameplay,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceLabel {
    /// The game's own localized label.
    Default,
    Custom(String),
}

/// The two time edit controls on the freeplay device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeControl {
    Increment,
    Decrement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeControlEvent {
    Pushed(TimeControl),
    InteractEnded(TimeControl),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeColor {
    Red,
    Yellow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudConfig {
    pub show_hud: bool,
    pub show_edgework: bool,
    pub show_confidence: bool,
    pub strike_color: StrikeColor,
}

/// One table-of-contents entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentsEntry {
    pub id: String,
    /// Mod or pack the entry came from.
    pub source: String,
    /// Localized name shown in the binder.
    pub display_name: String,
}

impl ContentsEntry {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            display_name: display_name.into(),
        }
    }
}

/// Stat or record persistence that can be told to ignore a round.
pub trait RecordKeeper {
    fn set_suppressed(&mut self, suppressed: bool);
}

/// A room that presents one entity at a time.
pub trait AdaptiveRoom {
    /// False when the room is running its static game mode.
    fn is_sequential(&self) -> bool;
    fn has_global_timer(&self) -> bool;
    fn current_entity(&self) -> Option<EntityId>;
    fn set_warning_time(&mut self, seconds: f32);
}

pub trait EmergencyRoom {
    fn start_emergency_routine(&mut self) -> RoutineId;
    fn stop_routine(&mut self, routine: RoutineId);
    fn set_light_color(&mut self, color: LightColor);
}

pub trait MusicController {
    fn stop_music(&mut self);
    fn clear_queue(&mut self);
    fn first_playlist_clip(&self) -> Option<String>;
    fn queue_clip(&mut self, clip: &str, looped: bool);
}

/// The pre-round device where the player picks a starting time.
pub trait FreeplayDevice {
    fn set_label(&mut self, label: DeviceLabel);
    fn time(&self) -> f32;
    fn set_time(&mut self, seconds: f32);
    fn set_time_text(&mut self, text: &str);
    /// Route increment and decrement edits to the orchestrator.
    fn wire_time_controls(&mut self);
    fn set_interacting(&mut self, control: TimeControl, interacting: bool);
}

/// Registry of objects the mod loader manages.
pub trait ModRegistry {
    fn register(&mut self, object: &CasePlaceholder);
    fn unregister(&mut self, id: &str) -> bool;
}

pub trait ContentsCatalog {
    fn applied(&self) -> Vec<ContentsEntry>;
    /// Entries whose source was unloaded since the last transition.
    fn unloaded(&self) -> Vec<ContentsEntry>;
    fn apply(&mut self, entries: Vec<ContentsEntry>);
    /// Reset the binder page and index to 0.
    fn reset_scroll(&mut self);
}

pub trait HudOverlay {
    fn configure(&mut self, config: HudConfig);
    fn set_multiplier(&mut self, multiplier: f32);
    fn clear_focus(&mut self);
}

pub trait LeaderboardFilter {
    fn block_submission(&mut self, mission_id: &str);
}

pub trait SceneTiming {
    fn set_fade_time(&mut self, scene: Scene, seconds: f32);
    fn set_min_load_time(&mut self, seconds: f32);
}

/// Everything the orchestrator needs from the host game.
pub trait Environment {
    /// Entities currently in play, in host order.
    fn entities(&self) -> Vec<EntityId>;
    fn is_solved(&self, entity: EntityId) -> bool;
    /// `None` once the entity or its timer is gone.
    fn timer(&self, entity: EntityId) -> Option<f32>;
    fn set_timer(&mut self, entity: EntityId, seconds: f32);
    /// Subscribe to the entity's "released" notification.
    fn watch_release(&mut self, entity: EntityId);

    fn alarm_devices(&self) -> Vec<DeviceId>;
    fn set_alarm_device(&mut self, device: DeviceId, active: bool);

    fn set_time_scale(&mut self, scale: f32);

    fn mission_seed_token(&self) -> i32;
    fn set_mission_seed_token(&mut self, seed: i32);

    fn stats(&mut self) -> &mut dyn RecordKeeper;
    fn best_records(&mut self) -> &mut dyn RecordKeeper;

    /// A competitive session is running and forces Normal mode.
    fn competitive_override(&self) -> bool {
        false
    }

    fn mission_to_load(&self) -> Option<String> {
        None
    }

    fn show_setting_warning(&mut self, _visible: bool) {}

    /// Drop the host's own "one minute left" pacing event.
    fn suppress_pacing_warning(&mut self) {}

    fn adaptive_room(&mut self) -> Option<&mut dyn AdaptiveRoom> {
        None
    }

    fn emergency_room(&mut self) -> Option<&mut dyn EmergencyRoom> {
        None
    }

    fn music(&mut self) -> Option<&mut dyn MusicController> {
        None
    }

    fn freeplay_device(&mut self) -> Option<&mut dyn FreeplayDevice> {
        None
    }

    fn mod_registry(&mut self) -> Option<&mut dyn ModRegistry> {
        None
    }

    fn contents_catalog(&mut self) -> Option<&mut dyn ContentsCatalog> {
        None
    }

    fn hud(&mut self) -> Option<&mut dyn HudOverlay> {
        None
    }

    fn leaderboard_filter(&mut self) -> Option<&mut dyn LeaderboardFilter> {
        None
    }

    fn scene_timing(&mut self) -> Option<&mut dyn SceneTiming> {
        None
    }
}

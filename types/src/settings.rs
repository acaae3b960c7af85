use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Mission seed value meaning "no seed, generate randomly".
pub const MISSION_SEED_UNSET: i32 = -1;

/// Scoring and timing variant for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Normal,
    Time,
    Zen,
    Steady,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Normal, Mode::Time, Mode::Zen, Mode::Steady];

    pub fn label(self) -> &'static str {
        match self {
            Mode::Normal => "Normal",
            Mode::Time => "Time",
            Mode::Zen => "Zen",
            Mode::Steady => "Steady",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Persisted mod settings.
///
/// Every field carries a default so a partial file still deserializes; the
/// store writes the completed snapshot back after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Scene fade time in seconds. Negative leaves the game's own fades alone.
    pub fade_time: f64,
    pub instant_skip: bool,
    pub skip_gameplay_delay: bool,
    pub better_case_picker: bool,
    pub enable_mods_only_key: bool,
    pub fix_fer: bool,
    pub bomb_hud: bool,
    pub show_edgework: bool,
    /// Glob patterns matched against table-of-contents display names.
    pub hide_toc: Vec<String>,
    pub mode: Mode,
    pub mission_seed: i32,
    pub case_generator: bool,
    pub case_colors: Vec<String>,
    /// Keys that external editors must not overwrite.
    pub pinned_settings: BTreeSet<String>,
    pub modes: ModeTunables,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fade_time: 1.0,
            instant_skip: true,
            skip_gameplay_delay: false,
            better_case_picker: true,
            enable_mods_only_key: false,
            fix_fer: false,
            bomb_hud: false,
            show_edgework: false,
            hide_toc: Vec::new(),
            mode: Mode::Normal,
            mission_seed: MISSION_SEED_UNSET,
            case_generator: true,
            case_colors: Vec::new(),
            pinned_settings: BTreeSet::new(),
            modes: ModeTunables::default(),
        }
    }
}

impl Settings {
    pub fn is_pinned(&self, key: &str) -> bool {
        self.pinned_settings.contains(key)
    }

    pub fn has_mission_seed(&self) -> bool {
        self.mission_seed != MISSION_SEED_UNSET
    }

    /// Time mode starting time converted to seconds.
    pub fn time_mode_starting_seconds(&self) -> f32 {
        (self.modes.time_starting_time * 60.0) as f32
    }
}

/// Per-mode numeric tunables, persisted under `[modes]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeTunables {
    // Zen
    pub zen_time_penalty: f64,
    pub zen_time_penalty_increase: f64,
    pub zen_timer_speed_up: f64,
    pub zen_timer_max_speed: f64,

    // Steady
    pub steady_fixed_penalty: f64,
    pub steady_percent_penalty: f64,

    // Time
    /// Minutes on the timer when a bomb starts.
    pub time_starting_time: f64,
    pub time_starting_multiplier: f64,
    pub time_max_multiplier: f64,
    pub time_min_multiplier: f64,
    pub time_solve_bonus: f64,
    pub time_multiplier_strike_penalty: f64,
    pub time_timer_strike_penalty: f64,
    pub time_minimum_time_lost: f64,
    pub time_minimum_time_gained: f64,
}

impl Default for ModeTunables {
    fn default() -> Self {
        Self {
            zen_time_penalty: 0.0,
            zen_time_penalty_increase: 0.0,
            zen_timer_speed_up: 0.25,
            zen_timer_max_speed: 2.0,
            steady_fixed_penalty: 2.0,
            steady_percent_penalty: 0.25,
            time_starting_time: 5.0,
            time_starting_multiplier: 9.0,
            time_max_multiplier: 10.0,
            time_min_multiplier: 1.0,
            time_solve_bonus: 0.1,
            time_multiplier_strike_penalty: 1.5,
            time_timer_strike_penalty: 0.25,
            time_minimum_time_lost: 15.0,
            time_minimum_time_gained: 20.0,
        }
    }
}

//! Editor metadata for the persisted settings.
//!
//! External settings editors render these listings; keys match the TOML
//! keys written by the settings store (`modes.*` for the mode tunables).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingKind {
    /// Section heading, carries no key.
    Section,
    Toggle,
    Number,
    Text,
    Dropdown(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingListing {
    pub key: Option<&'static str>,
    pub text: &'static str,
    pub description: &'static str,
    pub kind: ListingKind,
}

impl SettingListing {
    const fn section(text: &'static str) -> Self {
        Self {
            key: None,
            text,
            description: "",
            kind: ListingKind::Section,
        }
    }

    const fn field(
        key: &'static str,
        text: &'static str,
        description: &'static str,
        kind: ListingKind,
    ) -> Self {
        Self {
            key: Some(key),
            text,
            description,
            kind,
        }
    }
}

pub const SETTINGS_LISTINGS: &[SettingListing] = &[
    SettingListing::section("Tweaks"),
    SettingListing::field(
        "mode",
        "Mode",
        "Sets the mode for the next round.",
        ListingKind::Dropdown(&["Normal", "Time", "Zen", "Steady"]),
    ),
    SettingListing::field(
        "fade_time",
        "Fade Time",
        "The number of seconds it should take to fade in and out of scenes.",
        ListingKind::Number,
    ),
    SettingListing::field(
        "instant_skip",
        "Instant Skip",
        "Skips the gameplay loading screen as soon as possible.",
        ListingKind::Toggle,
    ),
    SettingListing::field(
        "skip_gameplay_delay",
        "Skip Gameplay Delay",
        "Skips the delay at the beginning of a round when the lights are out.",
        ListingKind::Toggle,
    ),
    SettingListing::field(
        "better_case_picker",
        "Better Case Picker",
        "Chooses the smallest case that fits instead of a random one.",
        ListingKind::Toggle,
    ),
    SettingListing::field(
        "enable_mods_only_key",
        "Enable Mods Only Key",
        "Turns the Mods Only key to be on by default.",
        ListingKind::Toggle,
    ),
    SettingListing::field(
        "fix_fer",
        "Fix Foreign Exchange Rates",
        "Changes the URL that is queried since the old one is no longer operational.",
        ListingKind::Toggle,
    ),
    SettingListing::field(
        "bomb_hud",
        "Bomb HUD",
        "Adds a HUD in the top right corner showing information about the currently selected bomb.",
        ListingKind::Toggle,
    ),
    SettingListing::field(
        "show_edgework",
        "Show Edgework",
        "Adds a HUD to the top of the screen showing the edgework for the currently selected bomb.",
        ListingKind::Toggle,
    ),
    SettingListing::field(
        "mission_seed",
        "Mission Seed",
        "Seeds the random numbers for the mission so the bomb generates consistently.",
        ListingKind::Number,
    ),
    SettingListing::field(
        "case_generator",
        "Case Generator",
        "Generates a case to best fit the bomb using one of the colors in case_colors.",
        ListingKind::Toggle,
    ),
    SettingListing::field(
        "hide_toc",
        "Hide Table of Contents",
        "Glob patterns for mission table-of-contents entries to hide.",
        ListingKind::Text,
    ),
    SettingListing::section("Zen Mode"),
    SettingListing::field(
        "modes.zen_time_penalty",
        "Time Penalty",
        "The base amount of minutes to be penalized for getting a strike.",
        ListingKind::Number,
    ),
    SettingListing::field(
        "modes.zen_time_penalty_increase",
        "Time Penalty Increase",
        "The number of minutes to add to the penalty each time you get a strike after the first.",
        ListingKind::Number,
    ),
    SettingListing::field(
        "modes.zen_timer_speed_up",
        "Timer Speed Up",
        "The rate the timer speeds up when you get a strike.",
        ListingKind::Number,
    ),
    SettingListing::field(
        "modes.zen_timer_max_speed",
        "Timer Max Speed",
        "The maximum rate the timer can be set to. 2 is twice as fast as the normal timer.",
        ListingKind::Number,
    ),
    SettingListing::section("Steady Mode"),
    SettingListing::field(
        "modes.steady_fixed_penalty",
        "Fixed Penalty",
        "The number of minutes subtracted from the time when you get a strike.",
        ListingKind::Number,
    ),
    SettingListing::field(
        "modes.steady_percent_penalty",
        "Percent Penalty",
        "The factor of the starting time the remaining time is reduced by.",
        ListingKind::Number,
    ),
    SettingListing::section("Time Mode"),
    SettingListing::field(
        "modes.time_starting_time",
        "Starting Time",
        "The number of minutes on the timer when you start a bomb.",
        ListingKind::Number,
    ),
    SettingListing::field(
        "modes.time_starting_multiplier",
        "Starting Multiplier",
        "The initial multiplier.",
        ListingKind::Number,
    ),
    SettingListing::field(
        "modes.time_max_multiplier",
        "Max Multiplier",
        "The highest the multiplier can go.",
        ListingKind::Number,
    ),
    SettingListing::field(
        "modes.time_min_multiplier",
        "Min Multiplier",
        "The lowest the multiplier can go.",
        ListingKind::Number,
    ),
    SettingListing::field(
        "modes.time_solve_bonus",
        "Solve Bonus",
        "The amount added to the multiplier when you solve a module.",
        ListingKind::Number,
    ),
    SettingListing::field(
        "modes.time_multiplier_strike_penalty",
        "Multiplier Strike Penalty",
        "The amount subtracted from the multiplier when you get a strike.",
        ListingKind::Number,
    ),
    SettingListing::field(
        "modes.time_timer_strike_penalty",
        "Timer Strike Penalty",
        "The factor the time is reduced by when getting a strike.",
        ListingKind::Number,
    ),
    SettingListing::field(
        "modes.time_minimum_time_lost",
        "Min Time Lost",
        "Lowest amount of time that you can lose when you get a strike.",
        ListingKind::Number,
    ),
    SettingListing::field(
        "modes.time_minimum_time_gained",
        "Min Time Gained",
        "Lowest amount of time you can gain when you solve a module.",
        ListingKind::Number,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;

    /// Every listed key must exist in the serialized settings.
    #[test]
    fn listing_keys_exist_in_settings() {
        let table: toml::Table = toml::from_str(&toml::to_string(&Settings::default()).unwrap()).unwrap();
        for listing in SETTINGS_LISTINGS {
            let Some(key) = listing.key else { continue };
            let found = match key.split_once('.') {
                Some((section, field)) => table
                    .get(section)
                    .and_then(|v| v.as_table())
                    .is_some_and(|t| t.contains_key(field)),
                None => table.contains_key(key),
            };
            assert!(found, "listing key {key} missing from settings");
        }
    }
}

use tweaks_types::{Mode, Settings};

/// Effective mode for the next round. A competitive session forces Normal.
pub fn resolve_mode(settings: &Settings, override_active: bool) -> Mode {
    if override_active {
        Mode::Normal
    } else {
        settings.mode
    }
}

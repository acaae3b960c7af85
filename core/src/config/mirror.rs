//! Live settings snapshot kept in sync with a store.

use tweaks_types::Settings;

use super::heal::serialize_settings;
use super::store::SettingsStore;

/// Owns the last-loaded snapshot. Reads never fail outward: a store error
/// keeps whatever was live before.
pub struct ConfigMirror {
    store: Box<dyn SettingsStore>,
    live: Settings,
}

impl ConfigMirror {
    /// Create a mirror and perform the initial load.
    pub fn new(store: Box<dyn SettingsStore>) -> Self {
        let mut mirror = Self {
            store,
            live: Settings::default(),
        };
        mirror.reload();
        mirror
    }

    pub fn settings(&self) -> &Settings {
        &self.live
    }

    /// Re-read the store, persisting the healed form when it differs from
    /// what was stored. Returns true when the live snapshot changed.
    pub fn reload(&mut self) -> bool {
        let loaded = match self.store.read() {
            Ok(loaded) => loaded,
            Err(err) => {
                tracing::warn!(error = %err, "Failed to read settings, keeping current");
                return false;
            }
        };

        if loaded.needs_write_back {
            tracing::debug!("Writing healed settings back");
            if let Err(err) = self.store.save(&loaded.settings) {
                tracing::warn!(error = %err, "Failed to write healed settings");
            }
        }

        let changed = loaded.settings != self.live;
        self.live = loaded.settings;
        changed
    }

    /// Whether the stored snapshot serializes differently from the live one.
    pub fn has_pending_change(&self) -> bool {
        let Ok(loaded) = self.store.read() else {
            return false;
        };
        match (
            serialize_settings(&loaded.settings),
            serialize_settings(&self.live),
        ) {
            (Ok(stored), Ok(live)) => stored != live,
            _ => false,
        }
    }

    /// Reload only when the stored snapshot actually differs.
    pub fn reload_if_changed(&mut self) -> bool {
        self.has_pending_change() && self.reload()
    }

    /// Derive a new snapshot from the live one, persist it and make it live.
    pub fn update(&mut self, edit: impl FnOnce(&mut Settings)) {
        let mut next = self.live.clone();
        edit(&mut next);
        if let Err(err) = self.store.save(&next) {
            tracing::warn!(error = %err, "Failed to persist settings update");
        }
        self.live = next;
    }
}

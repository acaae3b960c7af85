use std::path::Path;
use std::time::Duration;

use tweaks_core::config::SettingsEvent;
use tweaks_core::sim::ScriptedHost;
use tweaks_core::{Orchestrator, SettingsWatcher};

/// Start watching the settings file. The simulator keeps running without a
/// watcher if the backend can't be started.
pub fn start(path: &Path) -> Option<SettingsWatcher> {
    match SettingsWatcher::new(path) {
        Ok(watcher) => {
            println!("Watching settings: {}", watcher.path().display());
            Some(watcher)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to start settings watcher");
            None
        }
    }
}

/// Only forward events while the orchestrator honours them.
pub fn sync_enabled(watcher: Option<&SettingsWatcher>, orchestrator: &Orchestrator) {
    if let Some(watcher) = watcher {
        watcher.set_enabled(orchestrator.watch_enabled());
    }
}

/// Wait up to `wait` for a settings event.
pub async fn next_change(
    watcher: &mut Option<SettingsWatcher>,
    wait: Duration,
) -> Option<SettingsEvent> {
    match watcher {
        Some(watcher) => tokio::time::timeout(wait, watcher.next_event())
            .await
            .ok()
            .flatten(),
        None => {
            tokio::time::sleep(wait).await;
            None
        }
    }
}

pub fn handle_watcher_event(
    event: SettingsEvent,
    orchestrator: &mut Orchestrator,
    host: &mut ScriptedHost,
) {
    match event {
        SettingsEvent::Changed(path) => {
            tracing::debug!(path = %path.display(), "Settings file changed");
            let signals = orchestrator.handle_settings_file_changed(host);
            if signals.is_empty() {
                tracing::debug!("Settings unchanged after write");
            }
        }
        SettingsEvent::Error(e) => {
            tracing::warn!(error = %e, "Settings watcher error");
        }
    }
}

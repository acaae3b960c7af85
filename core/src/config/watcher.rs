//! Settings file watcher.
//!
//! notify delivers events on its own thread; they are forwarded over an
//! unbounded channel so an async driver can await them. Events arriving while
//! the watcher is disabled are dropped at the source.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsEvent {
    /// The settings file was written or recreated.
    Changed(PathBuf),
    /// The backend reported an error.
    Error(String),
}

pub struct SettingsWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::UnboundedReceiver<SettingsEvent>,
    enabled: Arc<AtomicBool>,
    path: PathBuf,
}

impl SettingsWatcher {
    /// Watch the directory containing `path`, reporting events for that file
    /// only. Starts disabled.
    pub fn new(path: &Path) -> Result<Self, ConfigError> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = path.file_name().map(OsString::from).unwrap_or_default();

        let (tx, rx) = mpsc::unbounded_channel();
        let enabled = Arc::new(AtomicBool::new(false));
        let gate = Arc::clone(&enabled);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            if !gate.load(Ordering::Relaxed) {
                return;
            }
            let event = match res {
                Ok(event) => match settings_event(&event, &file_name) {
                    Some(event) => event,
                    None => return,
                },
                Err(err) => SettingsEvent::Error(err.to_string()),
            };
            // Receiver gone means the driver shut down
            let _ = tx.send(event);
        })
        .map_err(|source| ConfigError::Watch {
            path: dir.clone(),
            source,
        })?;

        watcher
            .watch(&dir, RecursiveMode::NonRecursive)
            .map_err(|source| ConfigError::Watch {
                path: dir.clone(),
                source,
            })?;

        tracing::debug!(dir = ?dir, "Watching for settings changes");

        Ok(Self {
            _watcher: watcher,
            rx,
            enabled,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Wait for the next event.
    pub async fn next_event(&mut self) -> Option<SettingsEvent> {
        self.rx.recv().await
    }

    /// Drain an already-delivered event without waiting.
    pub fn try_next_event(&mut self) -> Option<SettingsEvent> {
        self.rx.try_recv().ok()
    }
}

/// Map a backend event onto a settings change, if it touches the file.
fn settings_event(event: &Event, file_name: &OsString) -> Option<SettingsEvent> {
    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
        return None;
    }
    event
        .paths
        .iter()
        .find(|p| p.file_name() == Some(file_name.as_os_str()))
        .map(|p| SettingsEvent::Changed(p.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind};

    fn name() -> OsString {
        OsString::from("settings.toml")
    }

    #[test]
    fn modify_of_settings_file_is_reported() {
        let event = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/cfg/tweaks/settings.toml"));
        assert_eq!(
            settings_event(&event, &name()),
            Some(SettingsEvent::Changed(PathBuf::from("/cfg/tweaks/settings.toml")))
        );
    }

    #[test]
    fn create_counts_as_change() {
        let event = Event::new(EventKind::Create(CreateKind::File))
            .add_path(PathBuf::from("/cfg/tweaks/settings.toml"));
        assert!(settings_event(&event, &name()).is_some());
    }

    #[test]
    fn other_files_and_removals_are_ignored() {
        let other = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/cfg/tweaks/settings.toml.bak"));
        assert_eq!(settings_event(&other, &name()), None);

        let removed = Event::new(EventKind::Remove(RemoveKind::File))
            .add_path(PathBuf::from("/cfg/tweaks/settings.toml"));
        assert_eq!(settings_event(&removed, &name()), None);
    }

    #[tokio::test]
    async fn watcher_starts_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut watcher = SettingsWatcher::new(&dir.path().join("settings.toml")).unwrap();
        assert!(!watcher.is_enabled());

        std::fs::write(dir.path().join("settings.toml"), "mode = \"Zen\"\n").unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        assert_eq!(watcher.try_next_event(), None);

        watcher.set_enabled(true);
        assert!(watcher.is_enabled());
    }
}

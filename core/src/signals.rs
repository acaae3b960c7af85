use tweaks_types::Mode;

use crate::host::EntityId;
use crate::session::GameState;
use crate::session::entities::PopulationStrategy;

/// Notifications emitted by the orchestrator.
/// These describe what a transition or tick did, at a higher level than the
/// individual host calls.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionSignal {
    // Lifecycle
    StateChanged {
        from: GameState,
        to: GameState,
    },
    RoundStarted {
        mode: Mode,
        records_suppressed: bool,
    },
    RoundEnded {
        handles: usize,
    },

    // Settings
    SettingsReloaded {
        mode: Mode,
    },
    SettingWarningChanged {
        visible: bool,
    },
    CasePlaceholderToggled {
        registered: bool,
    },

    // Entities
    EntityWrapped {
        entity: EntityId,
        slot: usize,
        seeded: Option<f32>,
    },
    PopulationFinished {
        strategy: PopulationStrategy,
        handles: usize,
    },
    EntityReleased {
        entity: EntityId,
    },

    // Alarm
    AlarmRaised,
    AlarmCleared,

    FastForwardStarted,
    FastForwardFinished {
        cancelled: bool,
    },

    // Setup room
    FreeplaySynced {
        seconds: f32,
    },
    StartingTimeCaptured {
        seconds: f32,
        persisted: bool,
    },

    ContentsReconciled {
        applied: usize,
        scroll_reset: bool,
    },
}

/// Receives orchestrator signals.
pub trait SignalHandler {
    fn handle_signal(&mut self, signal: &SessionSignal);

    fn handle_signals(&mut self, signals: &[SessionSignal]) {
        for signal in signals {
            self.handle_signal(signal);
        }
    }
}

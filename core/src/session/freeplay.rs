//! Mirrors the mode's starting time onto the pre-round freeplay device.

use tweaks_types::formatting::format_clock;
use tweaks_types::{Mode, Settings};

use crate::host::{DeviceLabel, Environment, TimeControlEvent};
use crate::signals::SessionSignal;

/// Time shown on the device before the player ever edits it.
pub const DEFAULT_REMEMBERED_SECONDS: f32 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncKind {
    /// Setup was entered.
    FirstTime,
    /// Settings changed while in Setup.
    Refresh,
}

/// A time edit that ended on the device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapturedTime {
    pub seconds: f32,
    /// Time mode stores the edit as its new starting time.
    pub persist: bool,
}

#[derive(Debug)]
pub struct FreeplayTimeSync {
    remembered: f32,
    wired: bool,
    pending: Option<SyncKind>,
}

impl Default for FreeplayTimeSync {
    fn default() -> Self {
        Self::new()
    }
}

impl FreeplayTimeSync {
    pub fn new() -> Self {
        Self {
            remembered: DEFAULT_REMEMBERED_SECONDS,
            wired: false,
            pending: None,
        }
    }

    pub fn remembered(&self) -> f32 {
        self.remembered
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Run on the next tick. A pending first-time sync is not downgraded.
    pub fn schedule(&mut self, kind: SyncKind) {
        self.pending = match (self.pending, kind) {
            (Some(SyncKind::FirstTime), _) => Some(SyncKind::FirstTime),
            _ => Some(kind),
        };
    }

    pub fn poll(
        &mut self,
        mode: Mode,
        settings: &Settings,
        host: &mut dyn Environment,
        signals: &mut Vec<SessionSignal>,
    ) {
        let Some(kind) = self.pending.take() else {
            return;
        };
        let Some(device) = host.freeplay_device() else {
            return;
        };

        let label = match mode {
            Mode::Normal => DeviceLabel::Default,
            mode => DeviceLabel::Custom(format!("{mode} mode")),
        };
        device.set_label(label);

        let seconds = if mode == Mode::Time {
            settings.time_mode_starting_seconds()
        } else {
            self.remembered
        };
        device.set_time(seconds);
        device.set_time_text(&format_clock(device.time()));
        signals.push(SessionSignal::FreeplaySynced { seconds });

        if kind == SyncKind::Refresh {
            return;
        }

        if mode == Mode::Normal {
            self.remembered = device.time();
        }
        if !self.wired {
            device.wire_time_controls();
            self.wired = true;
        }
    }

    /// Handle an edit on one of the time controls. Returns the captured time
    /// when an edit ended.
    pub fn handle_control(
        &mut self,
        event: TimeControlEvent,
        mode: Mode,
        host: &mut dyn Environment,
    ) -> Option<CapturedTime> {
        if !self.wired {
            return None;
        }
        let device = host.freeplay_device()?;
        match event {
            TimeControlEvent::Pushed(control) => {
                device.set_interacting(control, true);
                None
            }
            TimeControlEvent::InteractEnded(_) => {
                self.remembered = device.time();
                Some(CapturedTime {
                    seconds: self.remembered,
                    persist: mode == Mode::Time,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::TimeControl;
    use crate::sim::{ScriptedHost, SimFreeplayDevice};

    fn host_with_device() -> ScriptedHost {
        let mut host = ScriptedHost::new();
        host.freeplay = Some(SimFreeplayDevice::default());
        host
    }

    fn device(host: &ScriptedHost) -> &SimFreeplayDevice {
        host.freeplay.as_ref().unwrap()
    }

    #[test]
    fn time_mode_shows_starting_minutes() {
        let mut host = host_with_device();
        let mut settings = Settings::default();
        settings.modes.time_starting_time = 3.0;
        let mut sync = FreeplayTimeSync::new();
        let mut signals = Vec::new();

        sync.schedule(SyncKind::FirstTime);
        sync.poll(Mode::Time, &settings, &mut host, &mut signals);

        assert_eq!(device(&host).time_text, "3:00");
        assert_eq!(device(&host).label, DeviceLabel::Custom("Time mode".to_string()));
        assert_eq!(device(&host).wired, 1);
    }

    #[test]
    fn steady_mode_shows_remembered_time() {
        let mut host = host_with_device();
        let settings = Settings::default();
        let mut sync = FreeplayTimeSync::new();
        let mut signals = Vec::new();

        sync.schedule(SyncKind::FirstTime);
        sync.poll(Mode::Steady, &settings, &mut host, &mut signals);

        assert_eq!(device(&host).time, DEFAULT_REMEMBERED_SECONDS);
        assert_eq!(device(&host).time_text, "5:00");
        assert_eq!(device(&host).label, DeviceLabel::Custom("Steady mode".to_string()));
    }

    #[test]
    fn controls_wired_once() {
        let mut host = host_with_device();
        let settings = Settings::default();
        let mut sync = FreeplayTimeSync::new();
        let mut signals = Vec::new();

        for _ in 0..3 {
            sync.schedule(SyncKind::FirstTime);
            sync.poll(Mode::Normal, &settings, &mut host, &mut signals);
        }
        assert_eq!(device(&host).wired, 1);
        assert_eq!(device(&host).label, DeviceLabel::Default);
    }

    #[test]
    fn edit_end_captures_and_persists_only_in_time_mode() {
        let mut host = host_with_device();
        let settings = Settings::default();
        let mut sync = FreeplayTimeSync::new();
        let mut signals = Vec::new();
        sync.schedule(SyncKind::FirstTime);
        sync.poll(Mode::Normal, &settings, &mut host, &mut signals);

        let pushed = TimeControlEvent::Pushed(TimeControl::Increment);
        assert_eq!(sync.handle_control(pushed, Mode::Normal, &mut host), None);
        assert_eq!(device(&host).interacting, vec![TimeControl::Increment]);

        host.freeplay.as_mut().unwrap().time = 420.0;
        let ended = TimeControlEvent::InteractEnded(TimeControl::Increment);
        let captured = sync.handle_control(ended, Mode::Normal, &mut host).unwrap();
        assert_eq!(captured.seconds, 420.0);
        assert!(!captured.persist);
        assert_eq!(sync.remembered(), 420.0);

        let captured = sync.handle_control(ended, Mode::Time, &mut host).unwrap();
        assert!(captured.persist);
    }

    #[test]
    fn refresh_does_not_wire() {
        let mut host = host_with_device();
        let settings = Settings::default();
        let mut sync = FreeplayTimeSync::new();
        let mut signals = Vec::new();

        sync.schedule(SyncKind::Refresh);
        sync.poll(Mode::Zen, &settings, &mut host, &mut signals);
        assert_eq!(device(&host).wired, 0);
        assert_eq!(signals, vec![SessionSignal::FreeplaySynced { seconds: 300.0 }]);
    }

    #[test]
    fn nothing_runs_until_scheduled() {
        let mut host = host_with_device();
        let mut sync = FreeplayTimeSync::new();
        let mut signals = Vec::new();

        sync.poll(Mode::Time, &Settings::default(), &mut host, &mut signals);
        assert!(signals.is_empty());
        assert_eq!(device(&host).wired, 0);
    }
}

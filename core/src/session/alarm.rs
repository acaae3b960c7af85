//! Low-time alarm across the round's entities.

use tweaks_types::Mode;

use crate::host::{Environment, LightColor, RoutineId};
use crate::session::entities::EntityHandle;
use crate::signals::SessionSignal;

pub const ALARM_THRESHOLD_SECONDS: f32 = 60.0;

/// Alarm is on when any unsolved entity has less than a minute left.
/// Zen rounds never alarm.
pub fn alarm_predicate(mode: Mode, handles: &[EntityHandle], host: &dyn Environment) -> bool {
    if mode == Mode::Zen {
        return false;
    }
    handles.iter().any(|handle| {
        !handle.is_solved(host)
            && handle
                .live_timer(host)
                .is_some_and(|seconds| seconds < ALARM_THRESHOLD_SECONDS)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmEdge {
    Rising,
    Falling,
}

/// Commands alarm devices only when the predicate changes.
#[derive(Debug, Default)]
pub struct AlarmMonitor {
    last_state: bool,
    emergency_routine: Option<RoutineId>,
}

impl AlarmMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.last_state
    }

    pub fn poll(
        &mut self,
        mode: Mode,
        handles: &[EntityHandle],
        host: &mut dyn Environment,
        signals: &mut Vec<SessionSignal>,
    ) -> Option<AlarmEdge> {
        let target = alarm_predicate(mode, handles, &*host);
        self.observe(target, host, signals)
    }

    /// Apply one predicate sample. Non-edges do nothing.
    pub fn observe(
        &mut self,
        target: bool,
        host: &mut dyn Environment,
        signals: &mut Vec<SessionSignal>,
    ) -> Option<AlarmEdge> {
        if target == self.last_state {
            return None;
        }
        self.last_state = target;

        for device in host.alarm_devices() {
            host.set_alarm_device(device, target);
        }

        if target {
            if let Some(room) = host.emergency_room() {
                self.emergency_routine = Some(room.start_emergency_routine());
            }
            tracing::info!("Alarm raised");
            signals.push(SessionSignal::AlarmRaised);
            Some(AlarmEdge::Rising)
        } else {
            self.stop_emergency_routine(host);
            tracing::info!("Alarm cleared");
            signals.push(SessionSignal::AlarmCleared);
            Some(AlarmEdge::Falling)
        }
    }

    /// End-of-round reset. A raised alarm is cleared like a falling edge so
    /// devices never carry over into the next round.
    pub fn shutdown(&mut self, host: &mut dyn Environment, signals: &mut Vec<SessionSignal>) {
        if self.last_state {
            self.observe(false, host, signals);
        }
        self.stop_emergency_routine(host);
    }

    fn stop_emergency_routine(&mut self, host: &mut dyn Environment) {
        let Some(routine) = self.emergency_routine.take() else {
            return;
        };
        if let Some(room) = host.emergency_room() {
            room.stop_routine(routine);
            room.set_light_color(LightColor::NEUTRAL_GRAY);
        }
    }
}

use crate::host::Environment;
use crate::signals::SessionSignal;

pub const FAST_FORWARD_SCALE: f32 = 100.0;

/// Simulated seconds spent at [`FAST_FORWARD_SCALE`].
pub const FAST_FORWARD_SECONDS: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Pending,
    Running { elapsed: f32 },
    Finished,
}

/// Skips the lights-off delay at the start of a round by running the game
/// fast for a few seconds.
#[derive(Debug)]
pub struct FastForward {
    phase: Phase,
}

impl Default for FastForward {
    fn default() -> Self {
        Self::new()
    }
}

impl FastForward {
    pub fn new() -> Self {
        Self {
            phase: Phase::Pending,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// `delta` is simulated (already scaled) seconds.
    pub fn poll(&mut self, delta: f32, host: &mut dyn Environment, signals: &mut Vec<SessionSignal>) {
        match self.phase {
            Phase::Pending => {
                host.set_time_scale(FAST_FORWARD_SCALE);
                self.phase = Phase::Running { elapsed: 0.0 };
                tracing::debug!("Fast-forwarding gameplay delay");
                signals.push(SessionSignal::FastForwardStarted);
            }
            Phase::Running { elapsed } => {
                let elapsed = elapsed + delta;
                if elapsed >= FAST_FORWARD_SECONDS {
                    host.set_time_scale(1.0);
                    self.phase = Phase::Finished;
                    signals.push(SessionSignal::FastForwardFinished { cancelled: false });
                } else {
                    self.phase = Phase::Running { elapsed };
                }
            }
            Phase::Finished => {}
        }
    }

    /// Stop early, restoring normal speed if it was changed.
    pub fn cancel(&mut self, host: &mut dyn Environment, signals: &mut Vec<SessionSignal>) {
        if self.is_running() {
            host.set_time_scale(1.0);
            signals.push(SessionSignal::FastForwardFinished { cancelled: true });
        }
        self.phase = Phase::Finished;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ScriptedHost;

    #[test]
    fn runs_fast_for_six_simulated_seconds() {
        let mut host = ScriptedHost::new();
        let mut ff = FastForward::new();
        let mut signals = Vec::new();

        ff.poll(0.0, &mut host, &mut signals);
        assert_eq!(host.time_scale, FAST_FORWARD_SCALE);

        for _ in 0..5 {
            ff.poll(1.0, &mut host, &mut signals);
        }
        assert!(ff.is_running());

        ff.poll(1.0, &mut host, &mut signals);
        assert!(ff.is_finished());
        assert_eq!(host.time_scale_changes, vec![FAST_FORWARD_SCALE, 1.0]);
        assert_eq!(
            signals,
            vec![
                SessionSignal::FastForwardStarted,
                SessionSignal::FastForwardFinished { cancelled: false }
            ]
        );
    }

    #[test]
    fn cancel_restores_speed() {
        let mut host = ScriptedHost::new();
        let mut ff = FastForward::new();
        let mut signals = Vec::new();

        ff.poll(0.0, &mut host, &mut signals);
        ff.cancel(&mut host, &mut signals);
        assert_eq!(host.time_scale, 1.0);

        // Nothing more after cancel
        ff.poll(10.0, &mut host, &mut signals);
        assert_eq!(host.time_scale_changes.len(), 2);
    }

    #[test]
    fn cancel_before_start_is_silent() {
        let mut host = ScriptedHost::new();
        let mut ff = FastForward::new();
        let mut signals = Vec::new();

        ff.cancel(&mut host, &mut signals);
        assert!(host.time_scale_changes.is_empty());
        assert!(signals.is_empty());
    }
}

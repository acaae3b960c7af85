//! Session orchestrator.
//!
//! Purely reactive: the host reports state changes, scene loads, releases
//! and time edits, and calls [`Orchestrator::tick`] once per frame. Every
//! entry point returns the signals it produced after fanning them out to
//! registered handlers.

use tweaks_types::{MISSION_SEED_UNSET, Mode, Settings};

use super::GameState;
use super::alarm::AlarmMonitor;
use super::contents::{ContentsReconciler, HidePatterns};
use super::entities::{EntityHandle, EntitySessionManager};
use super::fast_forward::FastForward;
use super::freeplay::{FreeplayTimeSync, SyncKind};
use super::placeholder::{CaseGeneratorSync, CasePlaceholder};
use crate::config::ConfigMirror;
use crate::host::{EntityId, Environment, HudConfig, Scene, StrikeColor, TimeControlEvent};
use crate::mode::resolve_mode;
use crate::signals::{SessionSignal, SignalHandler};

/// Everything that lives for exactly one Gameplay state.
struct RoundSession {
    mode: Mode,
    entities: EntitySessionManager,
    alarm: AlarmMonitor,
    fast_forward: Option<FastForward>,
}

pub struct Orchestrator {
    config: ConfigMirror,
    state: GameState,
    override_active: bool,
    /// Decided once at start-up from the fade time.
    fade_tuning: bool,
    case_generator: CaseGeneratorSync,
    setting_warning: bool,
    contents: ContentsReconciler,
    freeplay: FreeplayTimeSync,
    round: Option<RoundSession>,
    multiplier: f32,
    signal_handlers: Vec<Box<dyn SignalHandler>>,
}

impl Orchestrator {
    pub fn new(config: ConfigMirror) -> Self {
        let fade_tuning = config.settings().fade_time >= 0.0;
        let multiplier = config.settings().modes.time_starting_multiplier as f32;
        Self {
            config,
            state: GameState::Uninitialized,
            override_active: false,
            fade_tuning,
            case_generator: CaseGeneratorSync::new(),
            setting_warning: false,
            contents: ContentsReconciler::new(),
            freeplay: FreeplayTimeSync::new(),
            round: None,
            multiplier,
            signal_handlers: Vec::new(),
        }
    }

    pub fn add_signal_handler(&mut self, handler: Box<dyn SignalHandler>) {
        self.signal_handlers.push(handler);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Locked for the round while in Gameplay, otherwise resolved from the
    /// live settings.
    pub fn mode(&self) -> Mode {
        match &self.round {
            Some(round) => round.mode,
            None => resolve_mode(self.config.settings(), self.override_active),
        }
    }

    pub fn settings(&self) -> &Settings {
        self.config.settings()
    }

    /// Current Time mode score multiplier.
    pub fn multiplier(&self) -> f32 {
        self.multiplier
    }

    pub fn setting_warning_active(&self) -> bool {
        self.setting_warning
    }

    pub fn case_placeholder(&self) -> &CasePlaceholder {
        self.case_generator.placeholder()
    }

    pub fn case_placeholder_registered(&self) -> bool {
        self.case_generator.is_registered()
    }

    pub fn entity_handles(&self) -> &[EntityHandle] {
        self.round
            .as_ref()
            .map(|round| round.entities.handles())
            .unwrap_or_default()
    }

    pub fn alarm_active(&self) -> bool {
        self.round.as_ref().is_some_and(|round| round.alarm.is_active())
    }

    /// Settings file events are only honoured in Setup.
    pub fn watch_enabled(&self) -> bool {
        self.state == GameState::Setup
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Host notifications
    // ─────────────────────────────────────────────────────────────────────────

    pub fn handle_state_change(
        &mut self,
        next: GameState,
        host: &mut dyn Environment,
    ) -> Vec<SessionSignal> {
        let mut signals = Vec::new();
        let previous = self.state;
        if previous == next {
            tracing::debug!(state = %next, "Ignoring repeated state");
            return signals;
        }
        if !previous.can_transition_to(next) {
            tracing::warn!(from = %previous, to = %next, "Unexpected state transition");
        }
        tracing::info!(from = %previous, to = %next, "State changed");

        self.override_active = host.competitive_override();
        if previous == GameState::Gameplay {
            self.end_round(host, &mut signals);
        }
        self.state = next;
        signals.push(SessionSignal::StateChanged {
            from: previous,
            to: next,
        });

        match next {
            GameState::Setup => self.enter_setup(host, &mut signals),
            GameState::Gameplay => self.enter_gameplay(host, &mut signals),
            GameState::Transitioning => self.enter_transitioning(host, &mut signals),
            GameState::Uninitialized => {}
        }

        self.dispatch(signals)
    }

    pub fn handle_scene_loaded(
        &mut self,
        scene: Scene,
        host: &mut dyn Environment,
    ) -> Vec<SessionSignal> {
        let mut signals = Vec::new();
        self.reload_settings(&mut signals);
        self.update_setting_warning(host, &mut signals);

        let fade = self.config.settings().fade_time as f32;
        let instant_skip = self.config.settings().instant_skip;
        let fade_tuning = self.fade_tuning;
        if let Some(timing) = host.scene_timing() {
            if scene == Scene::GameplayLoading && instant_skip {
                timing.set_min_load_time(0.0);
            }
            if fade_tuning && scene != Scene::Other {
                timing.set_fade_time(scene, fade);
            }
        }

        self.dispatch(signals)
    }

    /// The settings file changed on disk.
    pub fn handle_settings_file_changed(
        &mut self,
        host: &mut dyn Environment,
    ) -> Vec<SessionSignal> {
        let mut signals = Vec::new();
        if !self.watch_enabled() {
            tracing::debug!(state = %self.state, "Settings change ignored outside Setup");
            return signals;
        }
        if !self.config.reload_if_changed() {
            return signals;
        }

        let mode = self.config.settings().mode;
        tracing::info!(%mode, "Settings reloaded");
        signals.push(SessionSignal::SettingsReloaded { mode });
        self.update_setting_warning(host, &mut signals);
        self.freeplay.schedule(SyncKind::Refresh);
        self.dispatch(signals)
    }

    /// A wrapped entity was put down.
    pub fn handle_entity_released(
        &mut self,
        entity: EntityId,
        host: &mut dyn Environment,
    ) -> Vec<SessionSignal> {
        let mut signals = Vec::new();
        let Some(round) = self.round.as_mut() else {
            return signals;
        };
        if round.entities.handle_released(entity) {
            if let Some(hud) = host.hud() {
                hud.clear_focus();
            }
            signals.push(SessionSignal::EntityReleased { entity });
        }
        self.dispatch(signals)
    }

    pub fn handle_time_control(
        &mut self,
        event: TimeControlEvent,
        host: &mut dyn Environment,
    ) -> Vec<SessionSignal> {
        let mut signals = Vec::new();
        self.override_active = host.competitive_override();
        let mode = self.mode();
        if let Some(captured) = self.freeplay.handle_control(event, mode, host) {
            if captured.persist {
                let minutes = f64::from(captured.seconds) / 60.0;
                self.config
                    .update(|settings| settings.modes.time_starting_time = minutes);
            }
            signals.push(SessionSignal::StartingTimeCaptured {
                seconds: captured.seconds,
                persisted: captured.persist,
            });
        }
        self.dispatch(signals)
    }

    /// Advance the per-tick tasks. `delta` is simulated seconds.
    pub fn tick(&mut self, delta: f32, host: &mut dyn Environment) -> Vec<SessionSignal> {
        let mut signals = Vec::new();
        // The override can flip at any time, not only on state changes
        self.override_active = host.competitive_override();

        if self.freeplay.is_pending() {
            let mode = self.mode();
            self.freeplay
                .poll(mode, self.config.settings(), host, &mut signals);
        }

        if self.state == GameState::Gameplay
            && let Some(round) = self.round.as_mut()
        {
            // Population first so the alarm sees this tick's handles
            round.entities.poll(host, &mut signals);
            round
                .alarm
                .poll(round.mode, round.entities.handles(), host, &mut signals);
            if let Some(fast_forward) = round.fast_forward.as_mut() {
                fast_forward.poll(delta, host, &mut signals);
            }
        }

        self.dispatch(signals)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Transitions
    // ─────────────────────────────────────────────────────────────────────────

    fn enter_setup(&mut self, host: &mut dyn Environment, signals: &mut Vec<SessionSignal>) {
        self.reload_settings(signals);

        let enabled = self.config.settings().case_generator;
        if let Some(registered) = self.case_generator.sync(enabled, host) {
            signals.push(SessionSignal::CasePlaceholderToggled { registered });
        }
        self.update_setting_warning(host, signals);

        self.freeplay.schedule(SyncKind::FirstTime);
        host.set_mission_seed_token(MISSION_SEED_UNSET);
    }

    fn enter_gameplay(&mut self, host: &mut dyn Environment, signals: &mut Vec<SessionSignal>) {
        self.reload_settings(signals);
        self.update_setting_warning(host, signals);

        let settings = self.config.settings().clone();
        let mode = resolve_mode(&settings, self.override_active);

        let records_suppressed = settings.bomb_hud
            || settings.show_edgework
            || mode != Mode::Normal
            || settings.has_mission_seed();
        host.stats().set_suppressed(records_suppressed);
        host.best_records().set_suppressed(records_suppressed);
        if records_suppressed
            && let Some(mission) = host.mission_to_load()
            && let Some(filter) = host.leaderboard_filter()
        {
            filter.block_submission(&mission);
        }

        self.multiplier = settings.modes.time_starting_multiplier as f32;
        if let Some(hud) = host.hud() {
            hud.configure(HudConfig {
                show_hud: settings.bomb_hud,
                show_edgework: settings.show_edgework,
                show_confidence: mode != Mode::Zen,
                strike_color: if mode == Mode::Time {
                    StrikeColor::Yellow
                } else {
                    StrikeColor::Red
                },
            });
            hud.set_multiplier(self.multiplier);
        }

        self.round = Some(RoundSession {
            mode,
            entities: EntitySessionManager::new(mode, &settings),
            alarm: AlarmMonitor::new(),
            fast_forward: settings.skip_gameplay_delay.then(FastForward::new),
        });

        if host.mission_seed_token() == MISSION_SEED_UNSET {
            host.set_mission_seed_token(settings.mission_seed);
        }

        tracing::info!(%mode, records_suppressed, "Round started");
        signals.push(SessionSignal::RoundStarted {
            mode,
            records_suppressed,
        });
    }

    fn enter_transitioning(
        &mut self,
        host: &mut dyn Environment,
        signals: &mut Vec<SessionSignal>,
    ) {
        self.reload_settings(signals);
        self.update_setting_warning(host, signals);

        let hidden = HidePatterns::compile(&self.config.settings().hide_toc);
        let Some(catalog) = host.contents_catalog() else {
            return;
        };
        let result = self.contents.reconcile(catalog, &hidden);
        signals.push(SessionSignal::ContentsReconciled {
            applied: result.applied,
            scroll_reset: result.modified,
        });
    }

    fn end_round(&mut self, host: &mut dyn Environment, signals: &mut Vec<SessionSignal>) {
        let Some(mut round) = self.round.take() else {
            return;
        };
        round.alarm.shutdown(host, signals);
        if let Some(fast_forward) = round.fast_forward.as_mut() {
            fast_forward.cancel(host, signals);
        }
        if round.entities.is_waiting() {
            tracing::debug!("Round ended before any entity appeared");
        }
        signals.push(SessionSignal::RoundEnded {
            handles: round.entities.handles().len(),
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn reload_settings(&mut self, signals: &mut Vec<SessionSignal>) {
        if self.config.reload() {
            let mode = self.config.settings().mode;
            tracing::info!(%mode, "Settings reloaded");
            signals.push(SessionSignal::SettingsReloaded { mode });
        }
    }

    /// The placeholder only changes on Setup entry, so a differing setting
    /// needs a trip through Gameplay to take effect.
    fn update_setting_warning(
        &mut self,
        host: &mut dyn Environment,
        signals: &mut Vec<SessionSignal>,
    ) {
        let visible = self.state == GameState::Setup
            && self
                .case_generator
                .differs_from(self.config.settings().case_generator)
            && host.mod_registry().is_some();
        host.show_setting_warning(visible);
        if visible != self.setting_warning {
            self.setting_warning = visible;
            signals.push(SessionSignal::SettingWarningChanged { visible });
        }
    }

    fn dispatch(&mut self, signals: Vec<SessionSignal>) -> Vec<SessionSignal> {
        if !signals.is_empty() {
            for handler in &mut self.signal_handlers {
                handler.handle_signals(&signals);
            }
        }
        signals
    }
}

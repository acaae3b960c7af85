//! Per-round entity discovery and timer seeding.
//!
//! Population runs as a small state machine advanced once per tick:
//! - AwaitingEntities: nothing in play yet
//! - Settling: entities appeared, give the host one more tick
//! - AwaitingFirst / Following: adaptive room, one slot replaced as the room
//!   moves on to its next entity
//! - Finished: static population done, or the adaptive room went away

use tweaks_types::{Mode, Settings};

use crate::host::{EntityId, Environment};
use crate::signals::SessionSignal;

/// Zen timers count up from just above zero.
pub const ZEN_SEED_SECONDS: f32 = 0.001;

/// Adaptive-room "time running out" warning outside Zen.
pub const ADAPTIVE_WARNING_SECONDS: f32 = 60.0;

/// Starting timer for a freshly wrapped entity, or `None` to keep the host's.
pub fn seed_for_mode(mode: Mode, settings: &Settings) -> Option<f32> {
    match mode {
        Mode::Time => Some(settings.time_mode_starting_seconds()),
        Mode::Zen => Some(ZEN_SEED_SECONDS),
        Mode::Normal | Mode::Steady => None,
    }
}

/// One wrapped entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityHandle {
    entity: EntityId,
    seeded: Option<f32>,
    releases: u32,
}

impl EntityHandle {
    /// Wrap an entity and subscribe to its release notification.
    pub fn wrap(entity: EntityId, host: &mut dyn Environment) -> Self {
        host.watch_release(entity);
        Self {
            entity,
            seeded: None,
            releases: 0,
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Timer value written at seeding time. The entity owns its countdown
    /// afterwards; read [`EntityHandle::live_timer`] for the current value.
    pub fn seeded(&self) -> Option<f32> {
        self.seeded
    }

    pub fn seed(&mut self, seconds: f32, host: &mut dyn Environment) {
        host.set_timer(self.entity, seconds);
        self.seeded = Some(seconds);
    }

    pub fn live_timer(&self, host: &dyn Environment) -> Option<f32> {
        host.timer(self.entity)
    }

    pub fn is_solved(&self, host: &dyn Environment) -> bool {
        host.is_solved(self.entity)
    }

    pub fn release_count(&self) -> u32 {
        self.releases
    }

    fn record_release(&mut self) {
        self.releases += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopulationStrategy {
    Static,
    Adaptive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitingEntities,
    Settling,
    AwaitingFirst { global_timer: bool },
    Following { current: EntityId, global_timer: bool },
    Finished,
}

/// Owns the round's entity handles.
#[derive(Debug)]
pub struct EntitySessionManager {
    mode: Mode,
    seed: Option<f32>,
    handles: Vec<EntityHandle>,
    phase: Phase,
    strategy: Option<PopulationStrategy>,
    music_started: bool,
}

impl EntitySessionManager {
    pub fn new(mode: Mode, settings: &Settings) -> Self {
        Self {
            mode,
            seed: seed_for_mode(mode, settings),
            handles: Vec::new(),
            phase: Phase::AwaitingEntities,
            strategy: None,
            music_started: false,
        }
    }

    pub fn handles(&self) -> &[EntityHandle] {
        &self.handles
    }

    pub fn strategy(&self) -> Option<PopulationStrategy> {
        self.strategy
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// No entity ever appeared.
    pub fn is_waiting(&self) -> bool {
        self.phase == Phase::AwaitingEntities
    }

    /// Advance population by one tick.
    pub fn poll(&mut self, host: &mut dyn Environment, signals: &mut Vec<SessionSignal>) {
        match self.phase {
            Phase::AwaitingEntities => {
                if !host.entities().is_empty() {
                    tracing::debug!("Entities present, settling for one tick");
                    self.phase = Phase::Settling;
                }
            }
            Phase::Settling => self.begin(host, signals),
            Phase::AwaitingFirst { global_timer } => self.await_first(host, global_timer, signals),
            Phase::Following {
                current,
                global_timer,
            } => self.follow(host, current, global_timer, signals),
            Phase::Finished => {}
        }
    }

    /// Record a release of a wrapped entity. Unknown entities are ignored.
    pub fn handle_released(&mut self, entity: EntityId) -> bool {
        match self.handles.iter_mut().find(|h| h.entity == entity) {
            Some(handle) => {
                handle.record_release();
                true
            }
            None => false,
        }
    }

    fn begin(&mut self, host: &mut dyn Environment, signals: &mut Vec<SessionSignal>) {
        if self.mode == Mode::Zen {
            self.start_zen_music(host);
        }

        let warning_time = if self.mode == Mode::Zen {
            0.0
        } else {
            ADAPTIVE_WARNING_SECONDS
        };
        let room = host.adaptive_room().map(|room| {
            room.set_warning_time(warning_time);
            (room.is_sequential(), room.has_global_timer())
        });

        match room {
            Some((true, global_timer)) => {
                tracing::debug!(global_timer, "Following adaptive room");
                self.strategy = Some(PopulationStrategy::Adaptive);
                self.phase = Phase::AwaitingFirst { global_timer };
                self.await_first(host, global_timer, signals);
            }
            Some((false, _)) => self.wrap_all(host, signals),
            None => {
                self.wrap_all(host, signals);
                host.suppress_pacing_warning();
            }
        }
    }

    fn wrap_all(&mut self, host: &mut dyn Environment, signals: &mut Vec<SessionSignal>) {
        let seed = self.seed;
        self.handles.clear();
        for (slot, entity) in host.entities().into_iter().enumerate() {
            let mut handle = EntityHandle::wrap(entity, host);
            if let Some(seconds) = seed {
                handle.seed(seconds, host);
            }
            signals.push(SessionSignal::EntityWrapped {
                entity,
                slot,
                seeded: handle.seeded,
            });
            self.handles.push(handle);
        }

        self.strategy = Some(PopulationStrategy::Static);
        self.finish(signals);
    }

    fn await_first(
        &mut self,
        host: &mut dyn Environment,
        global_timer: bool,
        signals: &mut Vec<SessionSignal>,
    ) {
        let current = match host.adaptive_room() {
            Some(room) => room.current_entity(),
            None => {
                self.finish(signals);
                return;
            }
        };
        let Some(entity) = current else {
            return;
        };

        self.install(entity, true, host, signals);
        self.phase = Phase::Following {
            current: entity,
            global_timer,
        };
    }

    fn follow(
        &mut self,
        host: &mut dyn Environment,
        previous: EntityId,
        global_timer: bool,
        signals: &mut Vec<SessionSignal>,
    ) {
        let current = match host.adaptive_room() {
            Some(room) => room.current_entity(),
            None => {
                tracing::debug!("Adaptive room gone, population finished");
                self.finish(signals);
                return;
            }
        };

        match current {
            Some(entity) if entity == previous => {}
            Some(entity) => {
                // With a global timer the countdown carries over between entities
                self.install(entity, !global_timer, host, signals);
                self.phase = Phase::Following {
                    current: entity,
                    global_timer,
                };
            }
            None => self.finish(signals),
        }
    }

    /// Replace the single adaptive slot.
    fn install(
        &mut self,
        entity: EntityId,
        seed: bool,
        host: &mut dyn Environment,
        signals: &mut Vec<SessionSignal>,
    ) {
        let mut handle = EntityHandle::wrap(entity, host);
        if seed && let Some(seconds) = self.seed {
            handle.seed(seconds, host);
        }
        signals.push(SessionSignal::EntityWrapped {
            entity,
            slot: 0,
            seeded: handle.seeded,
        });
        self.handles.clear();
        self.handles.push(handle);
    }

    fn finish(&mut self, signals: &mut Vec<SessionSignal>) {
        if self.phase == Phase::Finished {
            return;
        }
        self.phase = Phase::Finished;
        if let Some(strategy) = self.strategy {
            tracing::info!(?strategy, handles = self.handles.len(), "Entity population finished");
            signals.push(SessionSignal::PopulationFinished {
                strategy,
                handles: self.handles.len(),
            });
        }
    }

    fn start_zen_music(&mut self, host: &mut dyn Environment) {
        if self.music_started {
            return;
        }
        self.music_started = true;
        let Some(music) = host.music() else {
            return;
        };
        music.stop_music();
        music.clear_queue();
        if let Some(clip) = music.first_playlist_clip() {
            music.queue_clip(&clip, true);
        }
    }
}

//! Scripted rounds for the simulator.

use std::path::Path;
use std::time::Duration;

use tweaks_core::host::{ContentsEntry, EntityId, Scene};
use tweaks_core::sim::{ScriptedHost, SimAdaptiveRoom, SimCatalog, SimMusic};
use tweaks_core::{
    ConfigMirror, FileSettingsStore, GameState, Mode, Orchestrator, SessionSignal, SignalHandler,
};
use tweaks_types::formatting::{format_countdown, format_multiplier};

use crate::settings_watch;
use crate::{RunArgs, Scenario};

/// Seconds between scripted solves.
const SOLVE_SPACING_SECONDS: f32 = 40.0;
const FIRST_SOLVE_SECONDS: f32 = 30.0;

/// Prints orchestrator signals as they happen.
struct SignalPrinter;

impl SignalHandler for SignalPrinter {
    fn handle_signal(&mut self, signal: &SessionSignal) {
        match signal {
            SessionSignal::StateChanged { from, to } => println!("state: {from} -> {to}"),
            SessionSignal::RoundStarted {
                mode,
                records_suppressed,
            } => println!("round started in {mode} mode (records suppressed: {records_suppressed})"),
            SessionSignal::EntityWrapped {
                entity,
                slot,
                seeded,
            } => match seeded {
                Some(seconds) => println!("  entity {entity} in slot {slot}, timer {seconds:.3}s"),
                None => println!("  entity {entity} in slot {slot}"),
            },
            SessionSignal::AlarmRaised => println!("  ALARM on"),
            SessionSignal::AlarmCleared => println!("  alarm off"),
            other => tracing::debug!(signal = ?other, "Signal"),
        }
    }
}

/// Solve schedule and adaptive-room progression.
struct Script {
    kind: Scenario,
    order: Vec<EntityId>,
    next: usize,
    elapsed: f32,
    solve_at: f32,
}

impl Script {
    fn new(kind: Scenario, count: u64) -> Self {
        Self {
            kind,
            order: (1..=count.max(1)).collect(),
            next: 0,
            elapsed: 0.0,
            solve_at: FIRST_SOLVE_SECONDS,
        }
    }

    fn is_adaptive(&self) -> bool {
        matches!(self.kind, Scenario::Adaptive | Scenario::AdaptiveGlobal)
    }

    fn build_host(&self, timer: f32) -> ScriptedHost {
        let mut host = ScriptedHost::fully_equipped().with_alarm_devices(2);
        host.mission_to_load = Some("freeplay".to_string());
        host.music = Some(SimMusic {
            playlist: vec!["ambient_01".to_string()],
            ..SimMusic::default()
        });
        host.catalog = Some(SimCatalog::with_applied(vec![
            ContentsEntry::new("base", "vanilla", "The Bomb"),
            ContentsEntry::new("tutorial", "vanilla", "Tutorial Missions"),
            ContentsEntry::new("community", "community-pack", "Community Missions"),
        ]));
        if self.kind != Scenario::Portal {
            host.emergency_room = None;
        }

        if self.is_adaptive() {
            host.add_entity(self.order[0], timer);
            host.adaptive_room = Some(SimAdaptiveRoom {
                sequential: true,
                global_timer: self.kind == Scenario::AdaptiveGlobal,
                current: Some(self.order[0]),
                warning_time: None,
            });
        } else {
            for &id in &self.order {
                host.add_entity(id, timer);
            }
        }
        host
    }

    fn is_done(&self) -> bool {
        self.next >= self.order.len()
    }

    /// Advance scripted time; solves the next entity when due.
    fn step(&mut self, delta: f32, timer: f32, host: &mut ScriptedHost) {
        self.elapsed += delta;
        if self.is_done() || self.elapsed < self.solve_at {
            return;
        }

        let solved = self.order[self.next];
        host.solve(solved);
        self.next += 1;
        self.solve_at += SOLVE_SPACING_SECONDS;
        println!("  entity {solved} solved at {:.1}s", self.elapsed);

        if self.is_adaptive() {
            let upcoming = self.order.get(self.next).copied();
            if let Some(id) = upcoming {
                let carried = host.entity(solved).map(|e| e.timer).unwrap_or(timer);
                host.add_entity(id, carried);
            }
            if let Some(room) = host.adaptive_room.as_mut() {
                room.current = upcoming;
            }
        }
    }
}

pub async fn run(path: &Path, args: &RunArgs) -> Result<(), String> {
    let mirror = ConfigMirror::new(Box::new(FileSettingsStore::new(path)));
    let mut orchestrator = Orchestrator::new(mirror);
    orchestrator.add_signal_handler(Box::new(SignalPrinter));

    let mut script = Script::new(args.scenario, args.entities);
    let mut host = script.build_host(args.timer);
    let mut watcher = settings_watch::start(path);
    let frame = Duration::from_millis(args.frame_ms.max(1));
    let frame_secs = frame.as_secs_f32();

    // Setup room
    orchestrator.handle_scene_loaded(Scene::Main, &mut host);
    orchestrator.handle_state_change(GameState::Setup, &mut host);
    settings_watch::sync_enabled(watcher.as_ref(), &orchestrator);
    orchestrator.tick(frame_secs, &mut host);

    let setup_frames = args.setup_watch_ms / frame.as_millis().max(1) as u64;
    if setup_frames > 0 {
        println!("Edit the settings file now; watching for {} ms", args.setup_watch_ms);
    }
    for _ in 0..setup_frames {
        if let Some(event) = settings_watch::next_change(&mut watcher, frame).await {
            settings_watch::handle_watcher_event(event, &mut orchestrator, &mut host);
        }
        orchestrator.tick(frame_secs, &mut host);
    }
    if let Some(device) = host.freeplay.as_ref() {
        println!("freeplay device: {:?} at {}", device.label, device.time_text);
    }

    // Round
    orchestrator.handle_scene_loaded(Scene::GameplayLoading, &mut host);
    orchestrator.handle_state_change(GameState::Gameplay, &mut host);
    orchestrator.handle_scene_loaded(Scene::Gameplay, &mut host);
    settings_watch::sync_enabled(watcher.as_ref(), &orchestrator);

    if orchestrator.mode() == Mode::Zen {
        for entity in &mut host.entities {
            entity.counting_up = true;
        }
    }

    let mut exploded = None;
    for _ in 0..args.frames {
        if args.realtime {
            tokio::time::sleep(frame).await;
        }
        let delta = frame_secs * host.time_scale;
        host.advance(delta);
        script.step(delta, args.timer, &mut host);
        orchestrator.tick(delta, &mut host);

        exploded = host
            .entities
            .iter()
            .find(|e| !e.solved && !e.counting_up && e.timer <= 0.0)
            .map(|e| e.id);
        if exploded.is_some() || script.is_done() {
            break;
        }
    }

    print_summary(&orchestrator, &host, exploded);

    // Back to the setup room
    orchestrator.handle_state_change(GameState::Transitioning, &mut host);
    orchestrator.handle_scene_loaded(Scene::Main, &mut host);
    orchestrator.handle_state_change(GameState::Setup, &mut host);
    settings_watch::sync_enabled(watcher.as_ref(), &orchestrator);
    orchestrator.tick(frame_secs, &mut host);

    if let Some(catalog) = host.catalog.as_ref() {
        let names: Vec<&str> = catalog
            .applied
            .iter()
            .map(|entry| entry.display_name.as_str())
            .collect();
        println!("table of contents: {}", names.join(", "));
    }

    Ok(())
}

fn print_summary(orchestrator: &Orchestrator, host: &ScriptedHost, exploded: Option<EntityId>) {
    println!("--- round summary ---");
    println!("mode: {}", orchestrator.mode());
    if orchestrator.mode() == Mode::Time {
        println!("multiplier: {}", format_multiplier(orchestrator.multiplier()));
    }
    for entity in &host.entities {
        let status = if entity.solved { "solved" } else { "unsolved" };
        println!(
            "entity {}: {} ({})",
            entity.id,
            format_countdown(entity.timer, "boom"),
            status
        );
    }
    println!(
        "alarm commands: {}, time scale changes: {:?}",
        host.device_commands.len(),
        host.time_scale_changes
    );
    if let Some(id) = exploded {
        println!("entity {id} ran out of time");
    }
}

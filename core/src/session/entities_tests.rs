//! Tests for entity population
//!
//! Covers static and adaptive population, per-mode seeding and Zen music.

use tweaks_types::{Mode, Settings};

use super::entities::{
    ADAPTIVE_WARNING_SECONDS, EntitySessionManager, PopulationStrategy, ZEN_SEED_SECONDS,
    seed_for_mode,
};
use crate::signals::SessionSignal;
use crate::sim::{ScriptedHost, SimAdaptiveRoom, SimMusic};

fn settings_with_minutes(minutes: f64) -> Settings {
    let mut settings = Settings::default();
    settings.modes.time_starting_time = minutes;
    settings
}

fn host_with_entities(count: u64) -> ScriptedHost {
    let mut host = ScriptedHost::new();
    for id in 1..=count {
        host.add_entity(id, 600.0);
    }
    host
}

/// Poll until population finishes or the budget runs out.
fn run(manager: &mut EntitySessionManager, host: &mut ScriptedHost, ticks: usize) -> Vec<SessionSignal> {
    let mut signals = Vec::new();
    for _ in 0..ticks {
        manager.poll(host, &mut signals);
    }
    signals
}

#[test]
fn seed_values_per_mode() {
    let settings = settings_with_minutes(5.0);
    assert_eq!(seed_for_mode(Mode::Time, &settings), Some(300.0));
    assert_eq!(seed_for_mode(Mode::Zen, &settings), Some(ZEN_SEED_SECONDS));
    assert_eq!(seed_for_mode(Mode::Normal, &settings), None);
    assert_eq!(seed_for_mode(Mode::Steady, &settings), None);
}

#[test]
fn waits_for_entities_then_one_more_tick() {
    let mut host = ScriptedHost::new();
    let mut manager = EntitySessionManager::new(Mode::Normal, &Settings::default());

    run(&mut manager, &mut host, 3);
    assert!(manager.is_waiting());

    host.add_entity(1, 600.0);
    run(&mut manager, &mut host, 1);
    assert!(manager.handles().is_empty());

    run(&mut manager, &mut host, 1);
    assert_eq!(manager.handles().len(), 1);
    assert!(manager.is_finished());
}

#[test]
fn static_time_mode_seeds_every_entity() {
    let mut host = host_with_entities(3);
    let mut manager = EntitySessionManager::new(Mode::Time, &settings_with_minutes(5.0));

    let signals = run(&mut manager, &mut host, 2);

    assert_eq!(manager.strategy(), Some(PopulationStrategy::Static));
    assert_eq!(manager.handles().len(), 3);
    for id in 1..=3 {
        assert_eq!(host.seeds_for(id), vec![300.0]);
        assert!(host.release_watches.contains(&id));
    }
    assert!(host.pacing_warning_suppressed);
    assert_eq!(
        signals.last(),
        Some(&SessionSignal::PopulationFinished {
            strategy: PopulationStrategy::Static,
            handles: 3
        })
    );
}

#[test]
fn static_zen_mode_seeds_near_zero() {
    let mut host = host_with_entities(3);
    let mut manager = EntitySessionManager::new(Mode::Zen, &Settings::default());

    run(&mut manager, &mut host, 2);

    for id in 1..=3 {
        let seeds = host.seeds_for(id);
        assert_eq!(seeds.len(), 1);
        assert!(seeds[0] > 0.0 && seeds[0] < 0.01);
    }
}

#[test]
fn static_normal_mode_keeps_host_timers() {
    let mut host = host_with_entities(2);
    let mut manager = EntitySessionManager::new(Mode::Normal, &Settings::default());

    run(&mut manager, &mut host, 2);

    assert_eq!(manager.handles().len(), 2);
    assert!(host.seeds.is_empty());
    assert!(manager.handles().iter().all(|h| h.seeded().is_none()));
}

#[test]
fn static_game_mode_in_adaptive_room() {
    let mut host = host_with_entities(2);
    host.adaptive_room = Some(SimAdaptiveRoom {
        sequential: false,
        ..SimAdaptiveRoom::default()
    });
    let mut manager = EntitySessionManager::new(Mode::Steady, &Settings::default());

    run(&mut manager, &mut host, 2);

    assert_eq!(manager.strategy(), Some(PopulationStrategy::Static));
    assert_eq!(manager.handles().len(), 2);
    assert!(!host.pacing_warning_suppressed);
    assert_eq!(
        host.adaptive_room.as_ref().unwrap().warning_time,
        Some(ADAPTIVE_WARNING_SECONDS)
    );
}

/// Walk the adaptive room through entities 1..=3, one per couple of ticks.
fn walk_adaptive_room(global_timer: bool) -> (ScriptedHost, EntitySessionManager) {
    let mut host = ScriptedHost::new();
    host.add_entity(1, 600.0);
    host.adaptive_room = Some(SimAdaptiveRoom {
        sequential: true,
        global_timer,
        current: Some(1),
        warning_time: None,
    });
    let mut manager = EntitySessionManager::new(Mode::Time, &settings_with_minutes(5.0));

    run(&mut manager, &mut host, 3);
    for id in 2..=3 {
        host.add_entity(id, 600.0);
        host.adaptive_room.as_mut().unwrap().current = Some(id);
        run(&mut manager, &mut host, 2);
    }
    (host, manager)
}

#[test]
fn adaptive_room_seeds_each_entity_without_global_timer() {
    let (host, manager) = walk_adaptive_room(false);

    assert_eq!(manager.strategy(), Some(PopulationStrategy::Adaptive));
    assert_eq!(host.seeds.len(), 3);
    assert_eq!(manager.handles().len(), 1);
    assert_eq!(manager.handles()[0].entity(), 3);
    assert!(!manager.is_finished());
}

#[test]
fn adaptive_room_seeds_only_first_with_global_timer() {
    let (host, manager) = walk_adaptive_room(true);

    assert_eq!(host.seeds, vec![(1, 300.0)]);
    assert_eq!(manager.handles()[0].entity(), 3);
    assert_eq!(manager.handles()[0].seeded(), None);
}

#[test]
fn adaptive_room_waits_for_first_entity() {
    let mut host = ScriptedHost::new();
    host.add_entity(7, 600.0);
    host.adaptive_room = Some(SimAdaptiveRoom {
        sequential: true,
        ..SimAdaptiveRoom::default()
    });
    let mut manager = EntitySessionManager::new(Mode::Normal, &Settings::default());

    run(&mut manager, &mut host, 4);
    assert!(manager.handles().is_empty());

    host.adaptive_room.as_mut().unwrap().current = Some(7);
    run(&mut manager, &mut host, 1);
    assert_eq!(manager.handles()[0].entity(), 7);
}

#[test]
fn adaptive_loop_ends_when_room_disappears() {
    let (mut host, mut manager) = walk_adaptive_room(false);

    host.adaptive_room = None;
    let signals = run(&mut manager, &mut host, 1);

    assert!(manager.is_finished());
    assert_eq!(
        signals,
        vec![SessionSignal::PopulationFinished {
            strategy: PopulationStrategy::Adaptive,
            handles: 1
        }]
    );
}

#[test]
fn adaptive_loop_ends_when_current_cleared() {
    let (mut host, mut manager) = walk_adaptive_room(false);

    host.adaptive_room.as_mut().unwrap().current = None;
    run(&mut manager, &mut host, 1);
    assert!(manager.is_finished());
}

#[test]
fn zen_sets_adaptive_warning_to_zero() {
    let mut host = host_with_entities(1);
    host.adaptive_room = Some(SimAdaptiveRoom {
        sequential: true,
        current: Some(1),
        ..SimAdaptiveRoom::default()
    });
    let mut manager = EntitySessionManager::new(Mode::Zen, &Settings::default());

    run(&mut manager, &mut host, 2);
    assert_eq!(host.adaptive_room.as_ref().unwrap().warning_time, Some(0.0));
}

#[test]
fn zen_music_queued_once() {
    let mut host = host_with_entities(1);
    host.music = Some(SimMusic {
        playlist: vec!["calm".to_string(), "calmer".to_string()],
        ..SimMusic::default()
    });
    let mut manager = EntitySessionManager::new(Mode::Zen, &Settings::default());

    run(&mut manager, &mut host, 5);

    let music = host.music.as_ref().unwrap();
    assert_eq!(music.stops, 1);
    assert_eq!(music.queue, vec![("calm".to_string(), true)]);
}

#[test]
fn release_counts_only_wrapped_entities() {
    let mut host = host_with_entities(2);
    let mut manager = EntitySessionManager::new(Mode::Normal, &Settings::default());
    run(&mut manager, &mut host, 2);

    assert!(manager.handle_released(1));
    assert!(manager.handle_released(1));
    assert!(!manager.handle_released(99));
    assert_eq!(manager.handles()[0].release_count(), 2);
}

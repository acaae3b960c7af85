//! In-memory host used by the simulator and the test suite.
//!
//! Every capability is a plain struct with public fields, so scripts can set
//! up a room and inspect what the orchestrator did to it.

use std::collections::{BTreeMap, BTreeSet};

use crate::host::{
    AdaptiveRoom, ContentsCatalog, ContentsEntry, DeviceId, DeviceLabel, EmergencyRoom, EntityId,
    Environment, FreeplayDevice, HudConfig, HudOverlay, LeaderboardFilter, LightColor,
    ModRegistry, MusicController, RecordKeeper, RoutineId, Scene, SceneTiming, TimeControl,
};
use crate::session::placeholder::CasePlaceholder;

#[derive(Debug, Clone, PartialEq)]
pub struct SimEntity {
    pub id: EntityId,
    pub timer: f32,
    pub solved: bool,
    /// Zen timers count up instead of down.
    pub counting_up: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RecordLog {
    pub suppressed: bool,
    pub history: Vec<bool>,
}

impl RecordKeeper for RecordLog {
    fn set_suppressed(&mut self, suppressed: bool) {
        self.suppressed = suppressed;
        self.history.push(suppressed);
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimAdaptiveRoom {
    pub sequential: bool,
    pub global_timer: bool,
    pub current: Option<EntityId>,
    pub warning_time: Option<f32>,
}

impl AdaptiveRoom for SimAdaptiveRoom {
    fn is_sequential(&self) -> bool {
        self.sequential
    }

    fn has_global_timer(&self) -> bool {
        self.global_timer
    }

    fn current_entity(&self) -> Option<EntityId> {
        self.current
    }

    fn set_warning_time(&mut self, seconds: f32) {
        self.warning_time = Some(seconds);
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimEmergencyRoom {
    next_routine: RoutineId,
    pub running: Option<RoutineId>,
    pub started: usize,
    pub light: Option<LightColor>,
}

impl EmergencyRoom for SimEmergencyRoom {
    fn start_emergency_routine(&mut self) -> RoutineId {
        self.next_routine += 1;
        self.running = Some(self.next_routine);
        self.started += 1;
        self.next_routine
    }

    fn stop_routine(&mut self, routine: RoutineId) {
        if self.running == Some(routine) {
            self.running = None;
        }
    }

    fn set_light_color(&mut self, color: LightColor) {
        self.light = Some(color);
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimMusic {
    pub playlist: Vec<String>,
    pub queue: Vec<(String, bool)>,
    pub stops: usize,
}

impl MusicController for SimMusic {
    fn stop_music(&mut self) {
        self.stops += 1;
    }

    fn clear_queue(&mut self) {
        self.queue.clear();
    }

    fn first_playlist_clip(&self) -> Option<String> {
        self.playlist.first().cloned()
    }

    fn queue_clip(&mut self, clip: &str, looped: bool) {
        self.queue.push((clip.to_string(), looped));
    }
}

#[derive(Debug, Clone)]
pub struct SimFreeplayDevice {
    pub label: DeviceLabel,
    pub time: f32,
    pub time_text: String,
    /// How many times the edit controls were wired.
    pub wired: usize,
    pub interacting: Vec<TimeControl>,
}

impl Default for SimFreeplayDevice {
    fn default() -> Self {
        Self {
            label: DeviceLabel::Default,
            time: 300.0,
            time_text: String::new(),
            wired: 0,
            interacting: Vec::new(),
        }
    }
}

impl FreeplayDevice for SimFreeplayDevice {
    fn set_label(&mut self, label: DeviceLabel) {
        self.label = label;
    }

    fn time(&self) -> f32 {
        self.time
    }

    fn set_time(&mut self, seconds: f32) {
        self.time = seconds;
    }

    fn set_time_text(&mut self, text: &str) {
        self.time_text = text.to_string();
    }

    fn wire_time_controls(&mut self) {
        self.wired += 1;
    }

    fn set_interacting(&mut self, control: TimeControl, interacting: bool) {
        if interacting {
            self.interacting.push(control);
        } else {
            self.interacting.retain(|c| *c != control);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimRegistry {
    pub objects: BTreeMap<String, CasePlaceholder>,
}

impl SimRegistry {
    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }
}

impl ModRegistry for SimRegistry {
    fn register(&mut self, object: &CasePlaceholder) {
        self.objects.insert(object.id.to_string(), object.clone());
    }

    fn unregister(&mut self, id: &str) -> bool {
        self.objects.remove(id).is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimCatalog {
    pub applied: Vec<ContentsEntry>,
    pub unloaded: Vec<ContentsEntry>,
    pub writes: usize,
    pub scroll_resets: usize,
}

impl SimCatalog {
    pub fn with_applied(applied: Vec<ContentsEntry>) -> Self {
        Self {
            applied,
            ..Self::default()
        }
    }
}

impl ContentsCatalog for SimCatalog {
    fn applied(&self) -> Vec<ContentsEntry> {
        self.applied.clone()
    }

    fn unloaded(&self) -> Vec<ContentsEntry> {
        self.unloaded.clone()
    }

    fn apply(&mut self, entries: Vec<ContentsEntry>) {
        self.applied = entries;
        self.writes += 1;
    }

    fn reset_scroll(&mut self) {
        self.scroll_resets += 1;
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimHud {
    pub config: Option<HudConfig>,
    pub multiplier: Option<f32>,
    pub focus_clears: usize,
}

impl HudOverlay for SimHud {
    fn configure(&mut self, config: HudConfig) {
        self.config = Some(config);
    }

    fn set_multiplier(&mut self, multiplier: f32) {
        self.multiplier = Some(multiplier);
    }

    fn clear_focus(&mut self) {
        self.focus_clears += 1;
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimLeaderboard {
    pub blocked: Vec<String>,
}

impl LeaderboardFilter for SimLeaderboard {
    fn block_submission(&mut self, mission_id: &str) {
        self.blocked.push(mission_id.to_string());
    }
}

#[derive(Debug, Clone, Default)]
pub struct SimSceneTiming {
    pub fade_times: BTreeMap<Scene, f32>,
    pub min_load_time: Option<f32>,
}

impl SceneTiming for SimSceneTiming {
    fn set_fade_time(&mut self, scene: Scene, seconds: f32) {
        self.fade_times.insert(scene, seconds);
    }

    fn set_min_load_time(&mut self, seconds: f32) {
        self.min_load_time = Some(seconds);
    }
}

/// Scriptable host. Absent capabilities are `None`.
#[derive(Debug, Clone)]
pub struct ScriptedHost {
    pub entities: Vec<SimEntity>,
    /// Every `set_timer` call, in order.
    pub seeds: Vec<(EntityId, f32)>,
    pub release_watches: BTreeSet<EntityId>,
    pub devices: BTreeMap<DeviceId, bool>,
    /// Every device command, in order.
    pub device_commands: Vec<(DeviceId, bool)>,
    pub time_scale: f32,
    pub time_scale_changes: Vec<f32>,
    pub mission_seed_token: i32,
    pub competitive_override: bool,
    pub mission_to_load: Option<String>,
    pub setting_warning_visible: bool,
    pub pacing_warning_suppressed: bool,
    pub stats: RecordLog,
    pub best_records: RecordLog,
    pub adaptive_room: Option<SimAdaptiveRoom>,
    pub emergency_room: Option<SimEmergencyRoom>,
    pub music: Option<SimMusic>,
    pub freeplay: Option<SimFreeplayDevice>,
    pub registry: Option<SimRegistry>,
    pub catalog: Option<SimCatalog>,
    pub hud: Option<SimHud>,
    pub leaderboard: Option<SimLeaderboard>,
    pub scene_timing: Option<SimSceneTiming>,
}

impl Default for ScriptedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedHost {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            seeds: Vec::new(),
            release_watches: BTreeSet::new(),
            devices: BTreeMap::new(),
            device_commands: Vec::new(),
            time_scale: 1.0,
            time_scale_changes: Vec::new(),
            mission_seed_token: -1,
            competitive_override: false,
            mission_to_load: None,
            setting_warning_visible: false,
            pacing_warning_suppressed: false,
            stats: RecordLog::default(),
            best_records: RecordLog::default(),
            adaptive_room: None,
            emergency_room: None,
            music: None,
            freeplay: None,
            registry: None,
            catalog: None,
            hud: None,
            leaderboard: None,
            scene_timing: None,
        }
    }

    /// A host with every optional capability present.
    pub fn fully_equipped() -> Self {
        Self {
            emergency_room: Some(SimEmergencyRoom::default()),
            music: Some(SimMusic::default()),
            freeplay: Some(SimFreeplayDevice::default()),
            registry: Some(SimRegistry::default()),
            catalog: Some(SimCatalog::default()),
            hud: Some(SimHud::default()),
            leaderboard: Some(SimLeaderboard::default()),
            scene_timing: Some(SimSceneTiming::default()),
            ..Self::new()
        }
    }

    pub fn with_alarm_devices(mut self, count: u32) -> Self {
        for device in 0..count {
            self.devices.insert(device, false);
        }
        self
    }

    pub fn add_entity(&mut self, id: EntityId, timer: f32) {
        self.entities.push(SimEntity {
            id,
            timer,
            solved: false,
            counting_up: false,
        });
    }

    pub fn remove_entity(&mut self, id: EntityId) {
        self.entities.retain(|e| e.id != id);
    }

    pub fn entity(&self, id: EntityId) -> Option<&SimEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut SimEntity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn solve(&mut self, id: EntityId) {
        if let Some(entity) = self.entity_mut(id) {
            entity.solved = true;
        }
    }

    pub fn seeds_for(&self, id: EntityId) -> Vec<f32> {
        self.seeds
            .iter()
            .filter(|(entity, _)| *entity == id)
            .map(|(_, seconds)| *seconds)
            .collect()
    }

    /// Run unsolved timers for `delta` simulated seconds.
    pub fn advance(&mut self, delta: f32) {
        for entity in self.entities.iter_mut().filter(|e| !e.solved) {
            if entity.counting_up {
                entity.timer += delta;
            } else {
                entity.timer = (entity.timer - delta).max(0.0);
            }
        }
    }
}

impl Environment for ScriptedHost {
    fn entities(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id).collect()
    }

    fn is_solved(&self, entity: EntityId) -> bool {
        self.entity(entity).is_some_and(|e| e.solved)
    }

    fn timer(&self, entity: EntityId) -> Option<f32> {
        self.entity(entity).map(|e| e.timer)
    }

    fn set_timer(&mut self, entity: EntityId, seconds: f32) {
        self.seeds.push((entity, seconds));
        if let Some(e) = self.entity_mut(entity) {
            e.timer = seconds;
        }
    }

    fn watch_release(&mut self, entity: EntityId) {
        self.release_watches.insert(entity);
    }

    fn alarm_devices(&self) -> Vec<DeviceId> {
        self.devices.keys().copied().collect()
    }

    fn set_alarm_device(&mut self, device: DeviceId, active: bool) {
        self.devices.insert(device, active);
        self.device_commands.push((device, active));
    }

    fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale;
        self.time_scale_changes.push(scale);
    }

    fn mission_seed_token(&self) -> i32 {
        self.mission_seed_token
    }

    fn set_mission_seed_token(&mut self, seed: i32) {
        self.mission_seed_token = seed;
    }

    fn stats(&mut self) -> &mut dyn RecordKeeper {
        &mut self.stats
    }

    fn best_records(&mut self) -> &mut dyn RecordKeeper {
        &mut self.best_records
    }

    fn competitive_override(&self) -> bool {
        self.competitive_override
    }

    fn mission_to_load(&self) -> Option<String> {
        self.mission_to_load.clone()
    }

    fn show_setting_warning(&mut self, visible: bool) {
        self.setting_warning_visible = visible;
    }

    fn suppress_pacing_warning(&mut self) {
        self.pacing_warning_suppressed = true;
    }

    fn adaptive_room(&mut self) -> Option<&mut dyn AdaptiveRoom> {
        self.adaptive_room
            .as_mut()
            .map(|room| room as &mut dyn AdaptiveRoom)
    }

    fn emergency_room(&mut self) -> Option<&mut dyn EmergencyRoom> {
        self.emergency_room
            .as_mut()
            .map(|room| room as &mut dyn EmergencyRoom)
    }

    fn music(&mut self) -> Option<&mut dyn MusicController> {
        self.music.as_mut().map(|music| music as &mut dyn MusicController)
    }

    fn freeplay_device(&mut self) -> Option<&mut dyn FreeplayDevice> {
        self.freeplay
            .as_mut()
            .map(|device| device as &mut dyn FreeplayDevice)
    }

    fn mod_registry(&mut self) -> Option<&mut dyn ModRegistry> {
        self.registry
            .as_mut()
            .map(|registry| registry as &mut dyn ModRegistry)
    }

    fn contents_catalog(&mut self) -> Option<&mut dyn ContentsCatalog> {
        self.catalog
            .as_mut()
            .map(|catalog| catalog as &mut dyn ContentsCatalog)
    }

    fn hud(&mut self) -> Option<&mut dyn HudOverlay> {
        self.hud.as_mut().map(|hud| hud as &mut dyn HudOverlay)
    }

    fn leaderboard_filter(&mut self) -> Option<&mut dyn LeaderboardFilter> {
        self.leaderboard
            .as_mut()
            .map(|filter| filter as &mut dyn LeaderboardFilter)
    }

    fn scene_timing(&mut self) -> Option<&mut dyn SceneTiming> {
        self.scene_timing
            .as_mut()
            .map(|timing| timing as &mut dyn SceneTiming)
    }
}

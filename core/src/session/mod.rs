//! Game lifecycle orchestration
//!
//! This module provides:
//! - **Orchestrator**: reacts to host state changes and drives per-tick tasks
//! - **Entity population**: wraps and seeds the round's entities
//! - **Alarm**: edge-triggered low-time alarm devices
//! - **Setup room helpers**: freeplay time sync, contents visibility and the
//!   case placeholder

pub mod alarm;
pub mod contents;
pub mod entities;
pub mod fast_forward;
pub mod freeplay;
pub mod orchestrator;
pub mod placeholder;

#[cfg(test)]
mod entities_tests;

use std::fmt;

pub use alarm::{AlarmEdge, AlarmMonitor, alarm_predicate};
pub use contents::{ContentsReconciler, HidePatterns};
pub use entities::{EntityHandle, EntitySessionManager, PopulationStrategy};
pub use fast_forward::FastForward;
pub use freeplay::FreeplayTimeSync;
pub use orchestrator::Orchestrator;
pub use placeholder::CasePlaceholder;

/// Host game lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GameState {
    #[default]
    Uninitialized,
    Setup,
    Gameplay,
    Transitioning,
}

impl GameState {
    /// Transitions the host is expected to make.
    pub fn can_transition_to(self, next: GameState) -> bool {
        matches!(
            (self, next),
            (GameState::Uninitialized, GameState::Setup)
                | (GameState::Setup, GameState::Gameplay)
                | (GameState::Gameplay, GameState::Transitioning)
                | (GameState::Gameplay, GameState::Setup)
                | (GameState::Transitioning, GameState::Setup)
        )
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GameState::Uninitialized => "Uninitialized",
            GameState::Setup => "Setup",
            GameState::Gameplay => "Gameplay",
            GameState::Transitioning => "Transitioning",
        };
        f.write_str(name)
    }
}

//! Synthetic case registered so the case generator has an oversized target.

use crate::host::Environment;

pub const CASE_PLACEHOLDER_ID: &str = "TweaksCaseGenerator";

/// Enough anchors for any generated case.
pub const CASE_PLACEHOLDER_ANCHORS: usize = 9002;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CasePlaceholder {
    pub id: &'static str,
    pub holdable: bool,
    pub anchor_count: usize,
}

impl Default for CasePlaceholder {
    fn default() -> Self {
        Self {
            id: CASE_PLACEHOLDER_ID,
            holdable: false,
            anchor_count: CASE_PLACEHOLDER_ANCHORS,
        }
    }
}

/// Tracks whether the placeholder is registered, against the live setting.
///
/// The cache starts off, so the first Setup with the generator enabled
/// registers it.
#[derive(Debug, Default)]
pub struct CaseGeneratorSync {
    placeholder: CasePlaceholder,
    registered: bool,
}

impl CaseGeneratorSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placeholder(&self) -> &CasePlaceholder {
        &self.placeholder
    }

    pub fn is_registered(&self) -> bool {
        self.registered
    }

    /// The live setting disagrees with what is registered.
    pub fn differs_from(&self, enabled: bool) -> bool {
        self.registered != enabled
    }

    /// Register or unregister to match `enabled`. Returns the new state when
    /// anything changed; `None` without a registry or when already in sync.
    pub fn sync(&mut self, enabled: bool, host: &mut dyn Environment) -> Option<bool> {
        if !self.differs_from(enabled) {
            return None;
        }
        let registry = host.mod_registry()?;
        if enabled {
            registry.register(&self.placeholder);
        } else if !registry.unregister(self.placeholder.id) {
            tracing::debug!(id = self.placeholder.id, "Placeholder was not registered");
        }
        self.registered = enabled;
        tracing::info!(registered = enabled, "Case placeholder updated");
        Some(enabled)
    }
}

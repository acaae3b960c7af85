//! Table-of-contents visibility.
//!
//! The cache remembers every entry seen while its source stays loaded, so an
//! entry hidden by a pattern comes back when the pattern is removed.

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};

use crate::host::{ContentsCatalog, ContentsEntry};

/// Case-insensitive `*`/`?` globs matched against display names.
#[derive(Debug, Clone, Default)]
pub struct HidePatterns {
    patterns: Vec<Regex>,
}

impl HidePatterns {
    pub fn compile(patterns: &[String]) -> Self {
        let patterns = patterns
            .iter()
            .filter_map(|pattern| {
                match RegexBuilder::new(&glob_to_regex(pattern))
                    .case_insensitive(true)
                    .build()
                {
                    Ok(regex) => Some(regex),
                    Err(err) => {
                        tracing::warn!(pattern = %pattern, error = %err, "Skipping hide pattern");
                        None
                    }
                }
            })
            .collect();
        Self { patterns }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|regex| regex.is_match(name))
    }
}

fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 2);
    out.push('^');
    for ch in pattern.chars() {
        match ch {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            other => out.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    out.push('$');
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Number of entries now applied.
    pub applied: usize,
    /// The cache or the applied set changed.
    pub modified: bool,
}

#[derive(Debug, Default)]
pub struct ContentsReconciler {
    cache: BTreeSet<ContentsEntry>,
}

impl ContentsReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reconcile(
        &mut self,
        catalog: &mut dyn ContentsCatalog,
        hidden: &HidePatterns,
    ) -> Reconciliation {
        let applied = catalog.applied();
        let mut modified = false;

        for entry in &applied {
            modified |= self.cache.insert(entry.clone());
        }
        for entry in catalog.unloaded() {
            modified |= self.cache.remove(&entry);
        }

        let filtered: Vec<ContentsEntry> = self
            .cache
            .iter()
            .filter(|entry| !hidden.matches(&entry.display_name))
            .cloned()
            .collect();

        let current: BTreeSet<&ContentsEntry> = applied.iter().collect();
        let differs =
            filtered.len() != applied.len() || filtered.iter().any(|e| !current.contains(e));

        let count = filtered.len();
        if differs {
            tracing::debug!(applied = count, "Applying filtered table of contents");
            catalog.apply(filtered);
            modified = true;
        }
        if modified {
            catalog.reset_scroll();
        }

        Reconciliation {
            applied: count,
            modified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimCatalog;

    fn entry(name: &str, source: &str) -> ContentsEntry {
        ContentsEntry::new(name.to_lowercase(), source, name)
    }

    #[test]
    fn glob_matching() {
        let hidden = HidePatterns::compile(&["vanilla*".to_string(), "Test?".to_string()]);
        assert!(hidden.matches("Vanilla Missions"));
        assert!(hidden.matches("TEST1"));
        assert!(!hidden.matches("Test12"));
        assert!(!hidden.matches("My vanilla pack"));
    }

    #[test]
    fn regex_characters_are_literal() {
        let hidden = HidePatterns::compile(&["(Beta) [v1.0]".to_string()]);
        assert!(hidden.matches("(beta) [V1.0]"));
        assert!(!hidden.matches("Beta v1x0"));
    }

    #[test]
    fn unload_hide_and_add() {
        let (a, b, c, d) = (
            entry("A", "pack-a"),
            entry("B", "pack-b"),
            entry("C", "pack-c"),
            entry("D", "pack-d"),
        );
        let mut catalog = SimCatalog::with_applied(vec![a.clone(), b.clone(), c.clone()]);
        let mut reconciler = ContentsReconciler::new();
        reconciler.reconcile(&mut catalog, &HidePatterns::default());
        catalog.scroll_resets = 0;

        catalog.applied.push(d.clone());
        catalog.unloaded = vec![b.clone()];
        let hidden = HidePatterns::compile(&["C".to_string()]);
        let result = reconciler.reconcile(&mut catalog, &hidden);

        assert_eq!(catalog.applied, vec![a.clone(), d.clone()]);
        assert!(result.modified);
        assert_eq!(result.applied, 2);
        assert_eq!(catalog.scroll_resets, 1);

        // Same inputs again: nothing changes, no scroll reset
        catalog.unloaded.clear();
        let result = reconciler.reconcile(&mut catalog, &hidden);
        assert!(!result.modified);
        assert_eq!(catalog.scroll_resets, 1);
    }

    #[test]
    fn hidden_entry_returns_when_pattern_removed() {
        let (a, c) = (entry("A", "pack-a"), entry("C", "pack-c"));
        let mut catalog = SimCatalog::with_applied(vec![a.clone(), c.clone()]);
        let mut reconciler = ContentsReconciler::new();

        reconciler.reconcile(&mut catalog, &HidePatterns::compile(&["c".to_string()]));
        assert_eq!(catalog.applied, vec![a.clone()]);

        reconciler.reconcile(&mut catalog, &HidePatterns::default());
        assert_eq!(catalog.applied, vec![a, c]);
    }
}

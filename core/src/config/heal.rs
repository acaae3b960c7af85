//! Field-level repair of persisted settings.
//!
//! The persisted file is parsed as a loose TOML table first. Every leaf the
//! defaults know about is then copied over one at a time, and a value is
//! only kept if the whole snapshot still deserializes with it. Anything
//! missing, mistyped or out of range falls back to its default.

use toml::{Table, Value};
use tweaks_types::Settings;

use crate::error::ConfigError;

/// Outcome of parsing a persisted settings file.
#[derive(Debug, Clone, PartialEq)]
pub struct HealedSettings {
    pub settings: Settings,
    /// Dotted keys whose persisted values were rejected.
    pub rejected: Vec<String>,
    /// True when the canonical form differs from what was on disk.
    pub needs_write_back: bool,
}

/// Serialize a snapshot to its canonical persisted form.
pub fn serialize_settings(settings: &Settings) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(settings)?)
}

/// Parse and repair persisted settings. `None` means the file does not exist.
pub fn heal_settings(raw: Option<&str>) -> Result<HealedSettings, ConfigError> {
    let defaults = to_table(&Settings::default())?;

    let loaded = match raw {
        Some(text) => match toml::from_str::<Table>(text) {
            Ok(table) => Some(table),
            Err(err) => {
                tracing::warn!(error = %err, "Settings file is not valid TOML, using defaults");
                None
            }
        },
        None => None,
    };

    let Some(loaded) = loaded else {
        return Ok(HealedSettings {
            settings: Settings::default(),
            rejected: Vec::new(),
            needs_write_back: true,
        });
    };

    let mut paths = Vec::new();
    collect_leaf_paths(&defaults, &mut Vec::new(), &mut paths);

    let mut healed = defaults.clone();
    let mut rejected = Vec::new();
    for path in &paths {
        let Some(value) = lookup(&loaded, path) else {
            continue;
        };
        let Some(default_value) = lookup(&defaults, path) else {
            continue;
        };
        let accepted = match coerce(default_value, value.clone()) {
            Some(candidate) => {
                set_at(&mut healed, path, candidate);
                parse_table(&healed).is_ok()
            }
            None => false,
        };
        if !accepted {
            set_at(&mut healed, path, default_value.clone());
            let key = path.join(".");
            tracing::warn!(key = %key, "Rejected settings value, using default");
            rejected.push(key);
        }
    }

    let settings = parse_table(&healed).unwrap_or_default();
    // Compare text, not values: `Value` equality fails on NaN.
    let canonical = toml::to_string_pretty(&to_table(&settings)?)?;
    let stored = toml::to_string_pretty(&loaded)?;

    Ok(HealedSettings {
        settings,
        rejected,
        needs_write_back: canonical != stored,
    })
}

fn to_table(settings: &Settings) -> Result<Table, ConfigError> {
    match Value::try_from(settings)? {
        Value::Table(table) => Ok(table),
        _ => Ok(Table::new()),
    }
}

fn parse_table(table: &Table) -> Result<Settings, toml::de::Error> {
    Value::Table(table.clone()).try_into()
}

fn collect_leaf_paths(table: &Table, prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
    for (key, value) in table {
        prefix.push(key.clone());
        match value {
            Value::Table(inner) => collect_leaf_paths(inner, prefix, out),
            _ => out.push(prefix.clone()),
        }
        prefix.pop();
    }
}

fn lookup<'a>(table: &'a Table, path: &[String]) -> Option<&'a Value> {
    let (last, parents) = path.split_last()?;
    let mut current = table;
    for key in parents {
        current = current.get(key)?.as_table()?;
    }
    current.get(last)
}

fn set_at(table: &mut Table, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut current = table;
    for key in parents {
        let entry = current
            .entry(key.clone())
            .or_insert_with(|| Value::Table(Table::new()));
        let Value::Table(inner) = entry else {
            return;
        };
        current = inner;
    }
    current.insert(last.clone(), value);
}

/// Hand-edited files often write `2` where a float is expected. `nan` and
/// `inf` parse as TOML floats but are never valid settings.
fn coerce(default_value: &Value, value: Value) -> Option<Value> {
    match (default_value, value) {
        (Value::Float(_), Value::Integer(n)) => Some(Value::Float(n as f64)),
        (_, Value::Float(f)) if !f.is_finite() => None,
        (_, value) => Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tweaks_types::Mode;

    #[test]
    fn missing_file_uses_defaults_and_writes_back() {
        let healed = heal_settings(None).unwrap();
        assert_eq!(healed.settings, Settings::default());
        assert!(healed.needs_write_back);
    }

    #[test]
    fn partial_file_is_completed() {
        let healed = heal_settings(Some("mode = \"Zen\"\n")).unwrap();
        assert_eq!(healed.settings.mode, Mode::Zen);
        assert_eq!(healed.settings.modes.time_starting_time, 5.0);
        assert!(healed.rejected.is_empty());
        assert!(healed.needs_write_back);
    }

    #[test]
    fn canonical_file_needs_no_write() {
        let mut settings = Settings::default();
        settings.mode = Mode::Steady;
        settings.hide_toc.push("Test*".to_string());
        let text = serialize_settings(&settings).unwrap();

        let healed = heal_settings(Some(&text)).unwrap();
        assert_eq!(healed.settings, settings);
        assert!(!healed.needs_write_back);
    }

    #[test]
    fn malformed_field_falls_back_to_default() {
        let text = r#"
mode = "Hardcore"
mission_seed = "not a number"
fade_time = 0.5

[modes]
time_starting_time = 3
time_solve_bonus = true
"#;
        let healed = heal_settings(Some(text)).unwrap();
        assert_eq!(healed.settings.mode, Mode::Normal);
        assert_eq!(healed.settings.mission_seed, -1);
        assert_eq!(healed.settings.fade_time, 0.5);
        assert_eq!(healed.settings.modes.time_starting_time, 3.0);
        assert_eq!(healed.settings.modes.time_solve_bonus, 0.1);
        assert!(healed.rejected.contains(&"mode".to_string()));
        assert!(healed.rejected.contains(&"mission_seed".to_string()));
        assert!(healed.rejected.contains(&"modes.time_solve_bonus".to_string()));
        assert!(healed.needs_write_back);
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        let text = "fade_time = nan\n[modes]\ntime_starting_time = inf\n";
        let healed = heal_settings(Some(text)).unwrap();
        assert_eq!(healed.settings, Settings::default());
        assert!(healed.rejected.contains(&"fade_time".to_string()));
        assert!(healed.rejected.contains(&"modes.time_starting_time".to_string()));
        assert!(healed.needs_write_back);

        let text = serialize_settings(&healed.settings).unwrap();
        let again = heal_settings(Some(&text)).unwrap();
        assert!(again.rejected.is_empty());
        assert!(!again.needs_write_back);
    }

    #[test]
    fn garbage_file_is_replaced() {
        let healed = heal_settings(Some("this is [[ not toml")).unwrap();
        assert_eq!(healed.settings, Settings::default());
        assert!(healed.needs_write_back);
    }

    #[test]
    fn unknown_keys_are_dropped_on_write_back() {
        let mut text = serialize_settings(&Settings::default()).unwrap();
        text.insert_str(0, "legacy_option = 4\n");
        let healed = heal_settings(Some(&text)).unwrap();
        assert_eq!(healed.settings, Settings::default());
        assert!(healed.needs_write_back);
    }
}

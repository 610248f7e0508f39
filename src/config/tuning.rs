use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How the restoration guard decides a field is still ours to reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GuardMode {
    /// Approximate compare of the live value against `original * strength`.
    #[default]
    Tolerance,
    /// Exact compare against the value the engine last wrote.
    Origin,
}

/// Effect engine parameters, loaded from effects.ron.
#[derive(Debug, Clone, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectTuning {
    /// Fixed simulation step in seconds.
    pub dt: f32,
    pub guard_mode: GuardMode,
    /// Relative tolerance (absolute below magnitude 1) for `GuardMode::Tolerance`.
    pub restore_epsilon: f32,
    /// Health restored each tick while Regeneration is active.
    pub regen_heal_per_tick: i32,
    /// Drop registry links to destroyed actors every N ticks. 0 disables.
    pub prune_interval_ticks: u64,
}

impl Default for EffectTuning {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            guard_mode: GuardMode::Tolerance,
            restore_epsilon: 1e-4,
            regen_heal_per_tick: 1,
            prune_interval_ticks: 60,
        }
    }
}

impl EffectTuning {
    /// Get the data directory for tuning files.
    pub fn data_dir() -> PathBuf {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        base.join("status_bridge")
    }

    /// Path to the tuning file.
    pub fn file_path() -> PathBuf {
        Self::data_dir().join("effects.ron")
    }

    /// Load from the default location, or create it with defaults.
    pub fn load_or_default() -> Self {
        Self::load_from(&Self::file_path())
    }

    /// Load from `path`. A missing file is created with defaults; an
    /// unreadable or malformed one falls back to defaults untouched.
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match ron::from_str::<Self>(&contents) {
                    Ok(tuning) => return tuning.sanitized(),
                    Err(e) => {
                        warn!("Failed to parse {}: {e}, using defaults", path.display());
                        return Self::default();
                    }
                },
                Err(e) => {
                    warn!("Failed to read {}: {e}, using defaults", path.display());
                    return Self::default();
                }
            }
        }
        let tuning = Self::default();
        tuning.save_to(path);
        tuning
    }

    /// Save to the default location.
    pub fn save(&self) {
        self.save_to(&Self::file_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let pretty = ron::ser::PrettyConfig::default();
        match ron::ser::to_string_pretty(self, pretty) {
            Ok(s) => {
                if let Err(e) = std::fs::write(path, s) {
                    warn!("Failed to write {}: {e}", path.display());
                }
            }
            Err(e) => {
                warn!("Failed to serialize effect tuning: {e}");
            }
        }
    }

    /// Reload from the default location.
    pub fn reload(&mut self) {
        *self = Self::load_or_default();
        info!("Effect tuning reloaded");
    }

    /// Replace values that would make the engine misbehave with defaults.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.dt.is_finite() && self.dt > 0.0) {
            warn!("Effect tuning dt={} is invalid, using {}", self.dt, defaults.dt);
            self.dt = defaults.dt;
        }
        if !(self.restore_epsilon.is_finite() && self.restore_epsilon >= 0.0) {
            warn!(
                "Effect tuning restore_epsilon={} is invalid, using {}",
                self.restore_epsilon, defaults.restore_epsilon
            );
            self.restore_epsilon = defaults.restore_epsilon;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("effects.ron");

        let tuning = EffectTuning::load_from(&path);
        assert!(path.exists());
        assert_eq!(tuning.guard_mode, GuardMode::Tolerance);
        assert_eq!(tuning.regen_heal_per_tick, 1);
    }

    #[test]
    fn saved_values_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("effects.ron");
        let tuning = EffectTuning {
            guard_mode: GuardMode::Origin,
            regen_heal_per_tick: 3,
            ..Default::default()
        };
        tuning.save_to(&path);

        let loaded = EffectTuning::load_from(&path);
        assert_eq!(loaded.guard_mode, GuardMode::Origin);
        assert_eq!(loaded.regen_heal_per_tick, 3);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("effects.ron");
        std::fs::write(&path, "(regen_heal_per_tick: 5, dt: -1.0)").unwrap();

        let loaded = EffectTuning::load_from(&path);
        assert_eq!(loaded.regen_heal_per_tick, 5);
        assert_eq!(loaded.dt, EffectTuning::default().dt);
    }

    #[test]
    fn malformed_file_falls_back_without_overwriting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("effects.ron");
        std::fs::write(&path, "not ron at all {").unwrap();

        let loaded = EffectTuning::load_from(&path);
        assert_eq!(loaded.prune_interval_ticks, 60);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not ron at all {");
    }
}

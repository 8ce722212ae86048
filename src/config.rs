use crate::app_dirs::AppDirs;
use crate::plan::WorkoutPlan;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted settings: the five timer fields plus the aux toggles.
/// Loaded with field-merge semantics so a partial or damaged record
/// degrades per field instead of discarding everything.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub work_secs: u32,
    pub rest_secs: u32,
    pub round_rest_secs: u32,
    pub exercises_per_round: u32,
    pub rounds: u32,
    pub keep_screen_on: bool,
    pub sound_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        let plan = WorkoutPlan::default();
        Self {
            work_secs: plan.work_secs,
            rest_secs: plan.rest_secs,
            round_rest_secs: plan.round_rest_secs,
            exercises_per_round: plan.exercises_per_round,
            rounds: plan.rounds,
            keep_screen_on: true,
            sound_enabled: true,
        }
    }
}

impl Config {
    pub fn plan(&self) -> WorkoutPlan {
        WorkoutPlan {
            work_secs: self.work_secs,
            rest_secs: self.rest_secs,
            round_rest_secs: self.round_rest_secs,
            exercises_per_round: self.exercises_per_round,
            rounds: self.rounds,
        }
        .normalized()
    }

    pub fn set_plan(&mut self, plan: WorkoutPlan) {
        let plan = plan.normalized();
        self.work_secs = plan.work_secs;
        self.rest_secs = plan.rest_secs;
        self.round_rest_secs = plan.round_rest_secs;
        self.exercises_per_round = plan.exercises_per_round;
        self.rounds = plan.rounds;
    }

    /// Merge a parsed JSON record field-by-field over the defaults.
    /// Missing, mistyped, or non-positive duration fields fall back to
    /// their individual default; the rest of the record is kept.
    fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        let secs = |key: &str, fallback: u32| {
            value
                .get(key)
                .and_then(Value::as_u64)
                .filter(|n| (1..=u32::MAX as u64).contains(n))
                .map(|n| n as u32)
                .unwrap_or(fallback)
        };
        let flag = |key: &str, fallback: bool| {
            value.get(key).and_then(Value::as_bool).unwrap_or(fallback)
        };

        Self {
            work_secs: secs("work_secs", defaults.work_secs),
            rest_secs: secs("rest_secs", defaults.rest_secs),
            round_rest_secs: secs("round_rest_secs", defaults.round_rest_secs),
            exercises_per_round: secs("exercises_per_round", defaults.exercises_per_round),
            rounds: secs("rounds", defaults.rounds),
            keep_screen_on: flag("keep_screen_on", defaults.keep_screen_on),
            sound_enabled: flag("sound_enabled", defaults.sound_enabled),
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(value) = serde_json::from_slice::<Value>(&bytes) {
                return Config::from_value(&value);
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

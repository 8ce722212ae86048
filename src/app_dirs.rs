use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        if let Some(pd) = ProjectDirs::from("", "", "rondo") {
            pd.config_dir().join("config.json")
        } else {
            PathBuf::from("rondo_config.json")
        }
    }

    /// Workout history log lives next to the config file.
    pub fn log_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "rondo").map(|pd| pd.config_dir().join("log.csv"))
    }
}

use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Mutable game state (high scores, session log) lives under
    /// $HOME/.local/state/typeblitz when HOME is set.
    fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("typeblitz"),
            )
        } else {
            ProjectDirs::from("", "", "typeblitz")
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn rules_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "typeblitz")
            .map(|proj_dirs| proj_dirs.config_dir().join("rules.json"))
    }

    pub fn highscores_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("highscores.jsonl"))
    }

    pub fn session_log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("log.csv"))
    }
}

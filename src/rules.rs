use crate::app_dirs::AppDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Bounds every rules file is clipped into at load time. The engine trusts
/// clipped values and performs no further validation.
pub const MISS_LIMIT_RANGE: (u32, u32) = (0, 99);
pub const MIN_WORD_LENGTH_FLOOR: usize = 1;
pub const MAX_WORD_LENGTH_CEIL: usize = 19;
pub const MAX_WORDS_RANGE: (usize, usize) = (1, 20);
pub const MIN_SPEED_FLOOR: u32 = 1;
pub const STEP_FLOOR: u32 = 1;

/// Unbounded sentinel for `max_speed`.
pub const UNBOUNDED_SPEED: i64 = -1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rules {
    /// Misses that end the game.
    pub miss_limit: u32,
    pub min_word_length: usize,
    pub max_word_length: usize,
    /// Cap on concurrently in-flight words.
    pub max_words: usize,
    pub min_speed: u32,
    /// Rate ceiling; `UNBOUNDED_SPEED` (-1) disables the ceiling.
    pub max_speed: i64,
    /// Points needed per unit of extra speed.
    pub step: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            miss_limit: 10,
            min_word_length: 3,
            max_word_length: 9,
            max_words: 10,
            min_speed: 1,
            max_speed: UNBOUNDED_SPEED,
            step: 10,
        }
    }
}

impl Rules {
    /// Clip every field independently into its documented bounds.
    /// `max_speed` is left alone: any non-positive value means unbounded.
    pub fn clamped(mut self) -> Self {
        self.miss_limit = self.miss_limit.clamp(MISS_LIMIT_RANGE.0, MISS_LIMIT_RANGE.1);
        self.min_word_length = self.min_word_length.max(MIN_WORD_LENGTH_FLOOR);
        self.max_word_length = self.max_word_length.min(MAX_WORD_LENGTH_CEIL);
        self.max_words = self.max_words.clamp(MAX_WORDS_RANGE.0, MAX_WORDS_RANGE.1);
        self.min_speed = self.min_speed.max(MIN_SPEED_FLOOR);
        self.step = self.step.max(STEP_FLOOR);
        self
    }
}

pub trait RulesStore {
    /// Load rules, falling back to defaults when the file is missing or
    /// malformed. The result is always clamped.
    fn load(&self) -> Rules;
    fn save(&self, rules: &Rules) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileRulesStore {
    path: PathBuf,
}

impl FileRulesStore {
    pub fn new() -> Self {
        let path = AppDirs::rules_path().unwrap_or_else(|| PathBuf::from("typeblitz_rules.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }
}

impl Default for FileRulesStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RulesStore for FileRulesStore {
    fn load(&self) -> Rules {
        if let Ok(bytes) = fs::read(&self.path) {
            if let Ok(rules) = serde_json::from_slice::<Rules>(&bytes) {
                return rules.clamped();
            }
        }
        Rules::default()
    }

    fn save(&self, rules: &Rules) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(rules).unwrap_or_default();
        fs::write(&self.path, data)
    }
}

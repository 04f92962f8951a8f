use crate::app_dirs::AppDirs;
use crate::score::Score;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Maximum number of entries retained on disk
pub const MAX_HIGH_SCORES: usize = 10;

/// One finished session, in the on-disk row order:
/// `[score, wpm, words_completed, duration_secs, typo_percent]`.
/// Serializes as a JSON array, one row per line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HighScoreEntry(pub u32, pub f64, pub u32, pub f64, pub f64);

impl HighScoreEntry {
    pub fn from_score(score: &Score) -> Self {
        Self(
            score.points,
            score.wpm(),
            score.words_completed,
            score.elapsed_secs(),
            score.typo_percent(),
        )
    }

    pub fn score(&self) -> u32 {
        self.0
    }

    pub fn wpm(&self) -> f64 {
        self.1
    }

    pub fn words_completed(&self) -> u32 {
        self.2
    }

    pub fn duration_secs(&self) -> f64 {
        self.3
    }

    pub fn typo_percent(&self) -> f64 {
        self.4
    }
}

/// The persisted leaderboard. `add` takes a finished session's score;
/// `save` sorts by score descending, keeps the top `MAX_HIGH_SCORES`,
/// and writes one JSON row per line.
#[derive(Debug, Clone)]
pub struct HighScores {
    entries: Vec<HighScoreEntry>,
    path: PathBuf,
}

impl HighScores {
    pub fn load() -> Self {
        let path =
            AppDirs::highscores_path().unwrap_or_else(|| PathBuf::from("typeblitz_scores.jsonl"));
        Self::load_from(path)
    }

    /// Load from an explicit path; a missing file is an empty leaderboard,
    /// and unreadable rows are dropped rather than failing the load.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = fs::read_to_string(&path)
            .map(|contents| {
                contents
                    .lines()
                    .filter(|line| !line.trim().is_empty())
                    .filter_map(|line| serde_json::from_str::<HighScoreEntry>(line).ok())
                    .collect()
            })
            .unwrap_or_default();

        Self { entries, path }
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record one finished session. The derived metrics (wpm, duration,
    /// typo percent) are computed here, once, off the final score.
    pub fn add(&mut self, score: &Score) {
        self.entries.push(HighScoreEntry::from_score(score));
    }

    /// Entries in display order: score descending, top N only.
    pub fn ranked(&self) -> Vec<HighScoreEntry> {
        self.entries
            .iter()
            .copied()
            .sorted_by(|a, b| b.score().cmp(&a.score()))
            .take(MAX_HIGH_SCORES)
            .collect()
    }

    pub fn save(&mut self) -> io::Result<()> {
        self.entries = self.ranked();

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = String::new();
        for entry in &self.entries {
            let line = serde_json::to_string(entry)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            out.push_str(&line);
            out.push('\n');
        }
        fs::write(&self.path, out)
    }
}

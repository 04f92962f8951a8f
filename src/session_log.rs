use crate::app_dirs::AppDirs;
use crate::score::Score;
use chrono::Local;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

/// Append-only CSV log of finished sessions, one row per game, kept next
/// to the high-score file. Best-effort: callers ignore failures rather
/// than interrupting the game-over flow.
#[derive(Debug, Clone)]
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    pub fn new() -> Self {
        let path = AppDirs::session_log_path().unwrap_or_else(|| PathBuf::from("typeblitz_log.csv"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn append(&self, list_name: &str, score: &Score) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // If the log doesn't exist yet, we need to emit a header
        let needs_header = !self.path.exists();

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer
                .write_record([
                    "date",
                    "list",
                    "score",
                    "wpm",
                    "words",
                    "duration_secs",
                    "typos",
                    "misses",
                ])
                .map_err(csv_to_io)?;
        }

        writer
            .write_record([
                Local::now().format("%c").to_string(),
                list_name.to_string(),
                score.points.to_string(),
                format!("{:.1}", score.wpm()),
                score.words_completed.to_string(),
                format!("{:.2}", score.elapsed_secs()),
                score.typos.to_string(),
                score.misses.to_string(),
            ])
            .map_err(csv_to_io)?;

        writer.flush()
    }
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::new()
    }
}

fn csv_to_io(err: csv::Error) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err)
}

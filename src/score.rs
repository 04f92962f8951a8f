use std::time::SystemTime;

/// Number of difficulty bands `level()` maps into.
pub const MAX_LEVELS: u32 = 11;
/// Points per level band.
pub const LEVEL_RATIO: u32 = 100;

/// Ascending typo-count thresholds; `typo_rank` returns the index of the
/// first entry that is >= the typo count.
pub const TYPO_RANK_THRESHOLDS: [u32; 10] = [0, 1, 3, 5, 7, 10, 14, 19, 29, 49];

/// Running tally for a single game session.
///
/// Points only ever grow; words-per-minute and typo percent are derived on
/// demand rather than stored so they can never go stale.
#[derive(Debug, Clone)]
pub struct Score {
    pub points: u32,
    pub words_completed: u32,
    pub typos: u32,
    pub misses: u32,
    started_at: SystemTime,
}

impl Score {
    pub fn new() -> Self {
        Self {
            points: 0,
            words_completed: 0,
            typos: 0,
            misses: 0,
            started_at: SystemTime::now(),
        }
    }

    /// A matched word is worth its length in points.
    pub fn record_completion(&mut self, word_len: usize) {
        self.points += word_len as u32;
        self.words_completed += 1;
    }

    /// Confirmed input that matched nothing in flight.
    pub fn record_typo(&mut self) {
        self.typos += 1;
    }

    /// A word escaped off the far edge unmatched.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.started_at
            .elapsed()
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Words per minute over the session so far; 0.0 until there is both a
    /// completed word and measurable elapsed time.
    pub fn wpm(&self) -> f64 {
        let elapsed = self.elapsed_secs();
        if self.words_completed == 0 || elapsed <= 0.0 {
            return 0.0;
        }
        self.words_completed as f64 * 60.0 / elapsed
    }

    /// Share of confirms that were typos; 0.0 before any word is completed.
    pub fn typo_percent(&self) -> f64 {
        if self.words_completed == 0 {
            return 0.0;
        }
        self.typos as f64 * 100.0 / self.words_completed as f64
    }

    /// Difficulty band in `[0, MAX_LEVELS]`. Inverted: level 0 is the
    /// hardest band (highest score), `MAX_LEVELS` the easiest.
    pub fn level(&self) -> u32 {
        let raw = self.points.div_ceil(LEVEL_RATIO).min(MAX_LEVELS);
        MAX_LEVELS - raw
    }

    /// Step classification of the typo count against the fixed threshold
    /// table; counts beyond the last threshold rank one past the table.
    pub fn typo_rank(&self) -> usize {
        for (i, threshold) in TYPO_RANK_THRESHOLDS.iter().enumerate() {
            if self.typos <= *threshold {
                return i;
            }
        }
        TYPO_RANK_THRESHOLDS.len() + 1
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

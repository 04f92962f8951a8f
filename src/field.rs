use crate::rules::Rules;
use crate::score::Score;
use crate::vocabulary::Vocabulary;
use rand::Rng;

/// A word currently crossing the board, left to right.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlightWord {
    pub row: u16,
    pub col: u16,
    pub text: String,
}

impl FlightWord {
    pub fn width(&self) -> u16 {
        self.text.chars().count() as u16
    }

    /// One past the last cell the word occupies.
    pub fn trailing_edge(&self) -> u16 {
        self.col + self.width()
    }
}

/// Render intent emitted by the engine. The engine never draws; a renderer
/// consumes these after each state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderEvent {
    Spawned { row: u16, col: u16, text: String },
    Advanced { row: u16, col: u16, text: String },
    Cleared { row: u16, col: u16, len: u16 },
    ScoreUpdated,
}

/// Owns the in-flight word set and its per-tick lifecycle.
///
/// Words are stored in spawn order and never reordered, so iteration order
/// is spawn order everywhere a tie-break matters.
#[derive(Debug)]
pub struct WordField {
    words: Vec<FlightWord>,
    spawn_row: u16,
    /// Running total of in-flight characters. Diagnostic only; recomputable
    /// from `words`.
    in_flight_chars: usize,
    board_width: u16,
    board_height: u16,
}

impl WordField {
    pub fn new(board_width: u16, board_height: u16) -> Self {
        Self {
            words: Vec::new(),
            spawn_row: 0,
            in_flight_chars: 0,
            board_width,
            board_height,
        }
    }

    pub fn words(&self) -> &[FlightWord] {
        &self.words
    }

    pub fn in_flight(&self) -> usize {
        self.words.len()
    }

    pub fn in_flight_chars(&self) -> usize {
        self.in_flight_chars
    }

    pub fn board_width(&self) -> u16 {
        self.board_width
    }

    pub fn board_height(&self) -> u16 {
        self.board_height
    }

    /// Remove every word whose trailing edge has reached the far side of
    /// the board, recording one miss each. Returns the number removed.
    pub fn expire_offscreen(&mut self, score: &mut Score, events: &mut Vec<RenderEvent>) -> usize {
        let board_width = self.board_width;
        let mut removed = 0;

        self.words.retain(|word| {
            if word.trailing_edge() < board_width {
                return true;
            }
            removed += 1;
            events.push(RenderEvent::Cleared {
                row: word.row,
                col: word.col,
                len: word.width(),
            });
            false
        });

        for _ in 0..removed {
            score.record_miss();
        }
        if removed > 0 {
            self.in_flight_chars = self.words.iter().map(|w| w.text.chars().count()).sum();
            events.push(RenderEvent::ScoreUpdated);
        }
        removed
    }

    /// Spawn at most one word per tick, at the cycling spawn row, column 0.
    /// Degrades to a no-op when the board is full, the vocabulary is empty,
    /// or the rules are degenerate (`max_words` or board height of zero).
    pub fn spawn_if_room<R: Rng>(
        &mut self,
        vocabulary: &Vocabulary,
        rules: &Rules,
        rng: &mut R,
        events: &mut Vec<RenderEvent>,
    ) -> bool {
        if self.board_height == 0 || self.words.len() >= rules.max_words {
            return false;
        }
        // TODO: decide whether picks should exclude words already in
        // flight (a rules flag); today the same word can appear twice.
        let Some(text) = vocabulary.choose(rng) else {
            return false;
        };

        let word = FlightWord {
            row: self.spawn_row,
            col: 0,
            text: text.to_string(),
        };
        self.spawn_row = (self.spawn_row + 1) % self.board_height;
        self.in_flight_chars += word.text.chars().count();
        events.push(RenderEvent::Spawned {
            row: word.row,
            col: word.col,
            text: word.text.clone(),
        });
        self.words.push(word);
        true
    }

    /// Advance every in-flight word one column to the right.
    pub fn advance_all(&mut self, events: &mut Vec<RenderEvent>) {
        for word in &mut self.words {
            events.push(RenderEvent::Cleared {
                row: word.row,
                col: word.col,
                len: word.width(),
            });
            word.col += 1;
            events.push(RenderEvent::Advanced {
                row: word.row,
                col: word.col,
                text: word.text.clone(),
            });
        }
    }

    /// Try to match `typed` against the in-flight words: exact text,
    /// case-sensitive. When several in-flight words carry the same text the
    /// earliest-spawned one is removed. A failed attempt records a typo.
    pub fn attempt_match(
        &mut self,
        typed: &str,
        score: &mut Score,
        events: &mut Vec<RenderEvent>,
    ) -> bool {
        let Some(pos) = self.words.iter().position(|w| w.text == typed) else {
            score.record_typo();
            events.push(RenderEvent::ScoreUpdated);
            return false;
        };

        let word = self.words.remove(pos);
        let len = word.text.chars().count();
        self.in_flight_chars = self.in_flight_chars.saturating_sub(len);
        score.record_completion(len);
        events.push(RenderEvent::Cleared {
            row: word.row,
            col: word.col,
            len: word.width(),
        });
        events.push(RenderEvent::ScoreUpdated);
        true
    }
}

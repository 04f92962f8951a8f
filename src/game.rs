use crate::field::{RenderEvent, WordField};
use crate::input::{InputAction, InputBuffer};
use crate::rules::Rules;
use crate::score::Score;
use crate::speed;
use crate::vocabulary::Vocabulary;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    GameOver,
}

/// What the caller should do after a tick or an input action. Returned,
/// never thrown: the engine has no failure states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Quit,
    GameOver,
}

/// One tick's (or one action's) worth of render intents plus the loop
/// decision.
#[derive(Debug)]
pub struct TickReport {
    pub events: Vec<RenderEvent>,
    pub outcome: TickOutcome,
}

impl TickReport {
    fn cont(events: Vec<RenderEvent>) -> Self {
        Self {
            events,
            outcome: TickOutcome::Continue,
        }
    }
}

/// A single game: score, in-flight words, input buffer, and the
/// Running/GameOver state machine. All mutation happens on the caller's
/// thread; the session never touches the terminal or the clock beyond
/// `Score`'s start timestamp.
#[derive(Debug)]
pub struct GameSession {
    pub score: Score,
    pub rules: Rules,
    pub buffer: InputBuffer,
    field: WordField,
    vocabulary: Vocabulary,
    state: SessionState,
    rng: StdRng,
}

impl GameSession {
    pub fn new(rules: Rules, vocabulary: Vocabulary, board_width: u16, board_height: u16) -> Self {
        Self::with_rng(
            rules,
            vocabulary,
            board_width,
            board_height,
            StdRng::from_entropy(),
        )
    }

    /// Seedable constructor so sessions replay deterministically in tests.
    pub fn with_rng(
        rules: Rules,
        vocabulary: Vocabulary,
        board_width: u16,
        board_height: u16,
        rng: StdRng,
    ) -> Self {
        Self {
            score: Score::new(),
            rules,
            buffer: InputBuffer::new(),
            field: WordField::new(board_width, board_height),
            vocabulary,
            state: SessionState::Running,
            rng,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_over(&self) -> bool {
        self.state == SessionState::GameOver
    }

    pub fn field(&self) -> &WordField {
        &self.field
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Current speed derived from the score.
    pub fn rate(&self) -> f64 {
        speed::compute_rate(&self.score, &self.rules)
    }

    /// Time budget for the next tick's input-poll window.
    pub fn interval(&self) -> Duration {
        speed::tick_interval(self.rate())
    }

    /// Advance the session one tick: expire, then (if still alive) spawn
    /// and advance. The miss limit is checked between expiry and spawn so
    /// a fatal tick produces no further movement.
    pub fn tick(&mut self) -> TickReport {
        if self.is_over() {
            return TickReport {
                events: Vec::new(),
                outcome: TickOutcome::GameOver,
            };
        }

        let mut events = Vec::new();
        self.field.expire_offscreen(&mut self.score, &mut events);

        if self.score.misses >= self.rules.miss_limit {
            self.state = SessionState::GameOver;
            return TickReport {
                events,
                outcome: TickOutcome::GameOver,
            };
        }

        self.field
            .spawn_if_room(&self.vocabulary, &self.rules, &mut self.rng, &mut events);
        self.field.advance_all(&mut events);

        TickReport::cont(events)
    }

    /// Route one decoded input action. Characters and backspaces edit the
    /// buffer; a confirm drains it into a match attempt (the buffer clears
    /// whether or not anything matched); quit ends the session.
    pub fn handle_action(&mut self, action: InputAction) -> TickReport {
        if self.is_over() {
            return TickReport {
                events: Vec::new(),
                outcome: TickOutcome::GameOver,
            };
        }

        match action {
            InputAction::Char(c) => {
                self.buffer.append(c);
                TickReport::cont(Vec::new())
            }
            InputAction::Backspace => {
                self.buffer.backspace();
                TickReport::cont(Vec::new())
            }
            InputAction::Confirm => {
                let typed = self.buffer.drain();
                let mut events = Vec::new();
                self.field
                    .attempt_match(&typed, &mut self.score, &mut events);
                TickReport::cont(events)
            }
            InputAction::Quit => {
                self.state = SessionState::GameOver;
                TickReport {
                    events: Vec::new(),
                    outcome: TickOutcome::Quit,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn scenario_rules() -> Rules {
        Rules {
            miss_limit: 2,
            min_word_length: 1,
            max_word_length: 5,
            max_words: 1,
            min_speed: 1,
            max_speed: -1,
            step: 10,
        }
    }

    fn cat_session(board_width: u16) -> GameSession {
        GameSession::with_rng(
            scenario_rules(),
            Vocabulary::from_words("test", ["cat"]),
            board_width,
            3,
            StdRng::seed_from_u64(1),
        )
    }

    #[test]
    fn test_first_tick_spawns_and_advances() {
        let mut session = cat_session(20);

        let report = session.tick();

        assert_matches!(report.outcome, TickOutcome::Continue);
        assert_eq!(session.field().in_flight(), 1);
        assert_eq!(session.field().words()[0].text, "cat");
        assert_eq!(session.field().words()[0].col, 1);
        assert!(report
            .events
            .iter()
            .any(|e| matches!(e, RenderEvent::Spawned { .. })));
    }

    #[test]
    fn test_one_spawn_per_tick_even_when_far_under_cap() {
        let mut session = GameSession::with_rng(
            Rules {
                max_words: 10,
                ..scenario_rules()
            },
            Vocabulary::from_words("test", ["cat"]),
            80,
            3,
            StdRng::seed_from_u64(1),
        );

        session.tick();
        assert_eq!(session.field().in_flight(), 1);
        session.tick();
        assert_eq!(session.field().in_flight(), 2);
    }

    #[test]
    fn test_unmatched_words_escape_until_game_over() {
        // "cat" on a 6-wide board: expires on the 4th tick after spawning.
        let mut session = cat_session(6);

        let mut ticks = 0;
        let outcome = loop {
            ticks += 1;
            assert!(ticks < 100, "session never ended");
            match session.tick().outcome {
                TickOutcome::Continue => continue,
                other => break other,
            }
        };

        assert_matches!(outcome, TickOutcome::GameOver);
        assert!(session.is_over());
        assert_eq!(session.score.misses, 2);
        // First escape on tick 4, second on tick 7
        assert_eq!(ticks, 7);
    }

    #[test]
    fn test_game_over_tick_stops_spawning() {
        let mut session = cat_session(6);
        while !session.is_over() {
            session.tick();
        }

        let report = session.tick();
        assert_matches!(report.outcome, TickOutcome::GameOver);
        assert!(report.events.is_empty());
    }

    #[test]
    fn test_typing_the_word_scores_it() {
        let mut session = cat_session(20);
        session.tick();

        for c in "cat".chars() {
            session.handle_action(InputAction::Char(c));
        }
        assert_eq!(session.buffer.as_str(), "cat");

        let report = session.handle_action(InputAction::Confirm);

        assert_matches!(report.outcome, TickOutcome::Continue);
        assert_eq!(session.score.points, 3);
        assert_eq!(session.score.words_completed, 1);
        assert_eq!(session.field().in_flight(), 0);
        assert!(session.buffer.is_empty());
    }

    #[test]
    fn test_confirming_garbage_counts_a_typo() {
        let mut session = cat_session(20);
        session.tick();

        for c in "xyz".chars() {
            session.handle_action(InputAction::Char(c));
        }
        session.handle_action(InputAction::Confirm);

        assert_eq!(session.score.typos, 1);
        assert_eq!(session.score.points, 0);
        assert_eq!(session.field().in_flight(), 1);
        assert!(session.buffer.is_empty());
    }

    #[test]
    fn test_backspace_edits_the_buffer() {
        let mut session = cat_session(20);
        session.tick();

        session.handle_action(InputAction::Char('c'));
        session.handle_action(InputAction::Char('x'));
        session.handle_action(InputAction::Backspace);
        session.handle_action(InputAction::Char('a'));
        session.handle_action(InputAction::Char('t'));
        session.handle_action(InputAction::Confirm);

        assert_eq!(session.score.points, 3);
    }

    #[test]
    fn test_quit_ends_the_session() {
        let mut session = cat_session(20);
        session.tick();

        let report = session.handle_action(InputAction::Quit);

        assert_matches!(report.outcome, TickOutcome::Quit);
        assert!(session.is_over());
        assert_matches!(session.tick().outcome, TickOutcome::GameOver);
    }

    #[test]
    fn test_actions_after_game_over_are_ignored() {
        let mut session = cat_session(20);
        session.handle_action(InputAction::Quit);

        let report = session.handle_action(InputAction::Char('c'));
        assert_matches!(report.outcome, TickOutcome::GameOver);
        assert!(session.buffer.is_empty());
    }

    #[test]
    fn test_rate_rises_after_completions() {
        let mut session = cat_session(20);
        session.tick();
        let before = session.rate();
        let interval_before = session.interval();

        for c in "cat".chars() {
            session.handle_action(InputAction::Char(c));
        }
        session.handle_action(InputAction::Confirm);

        assert!(session.rate() > before);
        assert!(session.interval() < interval_before);
    }

    #[test]
    fn test_miss_count_matches_escaped_words_per_tick() {
        // With no matches ever, misses grow exactly by the words whose
        // trailing edge reaches the board width that tick.
        let mut session = cat_session(6);
        let mut last_misses = 0;

        for _ in 0..6 {
            let in_flight_before = session.field().in_flight();
            let report = session.tick();
            let spawned = report
                .events
                .iter()
                .filter(|e| matches!(e, RenderEvent::Spawned { .. }))
                .count();
            let advanced = report
                .events
                .iter()
                .filter(|e| matches!(e, RenderEvent::Advanced { .. }))
                .count();
            // Every surviving word (old or new) advances exactly once, so
            // the shortfall is the words that escaped this tick.
            let escaped = if session.is_over() {
                in_flight_before
            } else {
                in_flight_before + spawned - advanced
            };
            assert_eq!(session.score.misses, last_misses + escaped as u32);
            assert_eq!(
                session.field().in_flight(),
                in_flight_before - escaped + spawned
            );
            if session.is_over() {
                break;
            }
            last_misses = session.score.misses;
        }
    }
}

use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;

use typeblitz::game::{GameSession, TickOutcome};
use typeblitz::runtime::{decode_key, EventSource, GameEvent, TestEventSource};
use typeblitz::rules::Rules;
use typeblitz::vocabulary::Vocabulary;

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

fn session(board_width: u16, vocab: &[&str]) -> GameSession {
    GameSession::with_rng(
        scenario_rules(),
        Vocabulary::from_words("test", vocab.iter().copied()),
        board_width,
        23,
        StdRng::seed_from_u64(11),
    )
}

/// Drain whatever the event source holds into the session, the way the
/// real game loop routes keys during the input-poll window.
fn drain_keys<E: EventSource>(session: &mut GameSession, events: &E) -> TickOutcome {
    loop {
        match events.recv_timeout(Duration::from_millis(5)) {
            Ok(GameEvent::Key(key)) => {
                if let Some(action) = decode_key(key) {
                    let report = session.handle_action(action);
                    if report.outcome != TickOutcome::Continue {
                        return report.outcome;
                    }
                }
            }
            Ok(GameEvent::Resize) => {}
            Err(_) => return TickOutcome::Continue,
        }
    }
}

fn send_keys(tx: &mpsc::Sender<GameEvent>, text: &str, confirm: bool) {
    for c in text.chars() {
        tx.send(GameEvent::Key(KeyEvent::new(
            KeyCode::Char(c),
            KeyModifiers::NONE,
        )))
        .unwrap();
    }
    if confirm {
        tx.send(GameEvent::Key(KeyEvent::new(
            KeyCode::Enter,
            KeyModifiers::NONE,
        )))
        .unwrap();
    }
}

// Headless integration using the internal runtime + GameSession without a
// TTY. Verifies that a minimal match flow completes via TestEventSource.
#[test]
fn headless_typing_flow_scores_a_word() {
    let mut session = session(80, &["cat"]);

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    send_keys(&tx, "cat", true);

    session.tick();
    let outcome = drain_keys(&mut session, &es);

    assert_eq!(outcome, TickOutcome::Continue);
    assert_eq!(session.score.words_completed, 1);
    assert_eq!(session.score.points, 3);
    assert_eq!(session.field().in_flight(), 0);
    assert!(session.buffer.is_empty());
}

#[test]
fn headless_wrong_word_counts_typo_and_clears_buffer() {
    let mut session = session(80, &["cat"]);

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    send_keys(&tx, "dog", true);

    session.tick();
    drain_keys(&mut session, &es);

    assert_eq!(session.score.typos, 1);
    assert_eq!(session.score.points, 0);
    assert_eq!(session.field().in_flight(), 1);
    assert!(session.buffer.is_empty());
}

#[test]
fn headless_unattended_session_ends_by_miss_limit() {
    // 6-wide board: "cat" escapes quickly; two escapes hit the limit.
    let mut session = session(6, &["cat"]);

    let mut outcome = TickOutcome::Continue;
    for _ in 0..50 {
        outcome = session.tick().outcome;
        if outcome != TickOutcome::Continue {
            break;
        }
    }

    assert_eq!(outcome, TickOutcome::GameOver);
    assert!(session.is_over());
    assert_eq!(session.score.misses, 2);
    assert_eq!(session.score.words_completed, 0);
}

#[test]
fn headless_end_key_quits_mid_session() {
    let mut session = session(80, &["cat"]);

    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);
    tx.send(GameEvent::Key(KeyEvent::new(
        KeyCode::End,
        KeyModifiers::NONE,
    )))
    .unwrap();

    session.tick();
    let outcome = drain_keys(&mut session, &es);

    assert_eq!(outcome, TickOutcome::Quit);
    assert!(session.is_over());
}

#[test]
fn headless_mixed_session_tallies_add_up() {
    let mut session = session(80, &["cat"]);
    let (tx, rx) = mpsc::channel();
    let es = TestEventSource::new(rx);

    // Tick to spawn, fumble once, then land the word.
    session.tick();
    send_keys(&tx, "cta", true);
    send_keys(&tx, "cat", true);
    drain_keys(&mut session, &es);

    assert_eq!(session.score.typos, 1);
    assert_eq!(session.score.words_completed, 1);
    assert_eq!(session.score.points, 3);

    // Next tick respawns; speed never fell below the configured floor.
    session.tick();
    assert_eq!(session.field().in_flight(), 1);
    assert!(session.rate() >= 1.0);
}

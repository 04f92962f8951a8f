use clap::{error::ErrorKind, CommandFactory, Parser, ValueEnum};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    sync::mpsc::RecvTimeoutError,
    time::{Duration, Instant},
};

use typeblitz::{
    game::{GameSession, TickOutcome},
    highscores::HighScores,
    rules::{FileRulesStore, Rules, RulesStore},
    runtime::{decode_key, CrosstermEventSource, EventSource, GameEvent},
    session_log::SessionLog,
    ui,
    vocabulary::{Vocabulary, WordList},
};

/// Redraw cadence for the static screens (menu, results, leaderboard).
const IDLE_POLL_MS: u64 = 250;

/// terminal typing game: words race across the screen, type them down
/// before they reach the far side
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Words scroll across the terminal and you have to type them before they escape. Score feeds a difficulty curve; misses end the game."
)]
pub struct Cli {
    /// word list to play with
    #[clap(short = 'w', long, value_enum, default_value_t = WordListChoice::English)]
    word_list: WordListChoice,

    /// path to a rules file (defaults to the per-user config location)
    #[clap(short = 'r', long)]
    rules: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, strum_macros::Display)]
pub enum WordListChoice {
    English,
    Code,
}

impl WordListChoice {
    fn as_list(&self) -> WordList {
        WordList::new(&self.to_string().to_lowercase())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    MainMenu,
    Playing,
    Results,
    HighScores,
}

const MENU_ITEMS: [&str; 3] = ["Play", "High Scores", "Quit"];

#[derive(Debug)]
pub struct App {
    pub rules: Rules,
    pub word_list: WordListChoice,
    pub highscores: HighScores,
    pub state: AppState,
    pub menu_selected: usize,
    /// The last finished session's score, shown on the results screen.
    pub last_score: Option<typeblitz::score::Score>,
}

impl App {
    pub fn new(cli: &Cli) -> Self {
        let store = match &cli.rules {
            Some(path) => FileRulesStore::with_path(path),
            None => FileRulesStore::new(),
        };

        Self {
            rules: store.load(),
            word_list: cli.word_list,
            highscores: HighScores::load(),
            state: AppState::MainMenu,
            menu_selected: 0,
            last_score: None,
        }
    }

    pub fn menu_prev(&mut self) {
        self.menu_selected = self
            .menu_selected
            .checked_sub(1)
            .unwrap_or(MENU_ITEMS.len() - 1);
    }

    pub fn menu_next(&mut self) {
        self.menu_selected = (self.menu_selected + 1) % MENU_ITEMS.len();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    if let Err(msg) = ui::check_screen_size(size.width, size.height) {
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        return Err(msg.into());
    }

    let events = CrosstermEventSource::new();
    let mut app = App::new(&cli);
    let result = run_app(&mut terminal, &events, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    events: &E,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    loop {
        match app.state {
            AppState::MainMenu => {
                if !run_menu(terminal, events, app)? {
                    return Ok(());
                }
            }
            AppState::Playing => run_game(terminal, events, app)?,
            AppState::Results => {
                terminal.draw(|f| {
                    if let Some(score) = &app.last_score {
                        ui::render_results(f, score);
                    }
                })?;
                wait_any_key(events)?;
                app.state = AppState::MainMenu;
            }
            AppState::HighScores => {
                terminal.draw(|f| ui::render_highscores(f, &app.highscores))?;
                wait_any_key(events)?;
                app.state = AppState::MainMenu;
            }
        }
    }
}

/// Returns false when the player chose to leave the program.
fn run_menu<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    events: &E,
    app: &mut App,
) -> Result<bool, Box<dyn Error>> {
    use crossterm::event::KeyCode;

    loop {
        terminal.draw(|f| ui::render_menu(f, "typeblitz", &MENU_ITEMS, app.menu_selected))?;

        match events.recv_timeout(Duration::from_millis(IDLE_POLL_MS)) {
            Ok(GameEvent::Key(key)) => match key.code {
                KeyCode::Up => app.menu_prev(),
                KeyCode::Down => app.menu_next(),
                KeyCode::Enter => match app.menu_selected {
                    0 => {
                        app.state = AppState::Playing;
                        return Ok(true);
                    }
                    1 => {
                        app.state = AppState::HighScores;
                        return Ok(true);
                    }
                    _ => return Ok(false),
                },
                KeyCode::Esc => return Ok(false),
                _ => {}
            },
            Ok(GameEvent::Resize) => {}
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Ok(false),
        }
    }
}

fn run_game<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    events: &E,
    app: &mut App,
) -> Result<(), Box<dyn Error>> {
    let size = terminal.size()?;
    let (board_width, board_height) = (size.width, size.height.saturating_sub(ui::STATUS_ROWS));
    let vocabulary = Vocabulary::from_list(app.word_list.as_list(), &app.rules);
    let mut session = GameSession::new(app.rules.clone(), vocabulary, board_width, board_height);

    'game: loop {
        let report = session.tick();
        terminal.draw(|f| ui::render_game(f, &session))?;
        if report.outcome != TickOutcome::Continue {
            break;
        }

        // Bounded input-poll window: keys are handled the moment they
        // arrive, but the tick fires on schedule with or without input.
        let deadline = Instant::now() + session.interval();
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            match events.recv_timeout(deadline - now) {
                Ok(GameEvent::Key(key)) => {
                    if let Some(action) = decode_key(key) {
                        let report = session.handle_action(action);
                        terminal.draw(|f| ui::render_game(f, &session))?;
                        if report.outcome != TickOutcome::Continue {
                            break 'game;
                        }
                    }
                }
                Ok(GameEvent::Resize) => {
                    terminal.draw(|f| ui::render_game(f, &session))?;
                }
                Err(RecvTimeoutError::Timeout) => break,
                Err(RecvTimeoutError::Disconnected) => break 'game,
            }
        }
    }

    // Final wpm/duration/typo% are computed off the score exactly once
    // here, on their way into the leaderboard and the session log.
    app.highscores.add(&session.score);
    let _ = app.highscores.save();
    let _ = SessionLog::new().append(&session.vocabulary().name, &session.score);

    app.last_score = Some(session.score.clone());
    app.state = AppState::Results;
    Ok(())
}

fn wait_any_key<E: EventSource>(events: &E) -> Result<(), Box<dyn Error>> {
    loop {
        match events.recv_timeout(Duration::from_millis(IDLE_POLL_MS)) {
            Ok(GameEvent::Key(_)) => return Ok(()),
            Ok(GameEvent::Resize) | Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["typeblitz"]);

        assert_eq!(cli.word_list, WordListChoice::English);
        assert_eq!(cli.rules, None);
    }

    #[test]
    fn test_cli_word_list_flag() {
        let cli = Cli::parse_from(["typeblitz", "-w", "code"]);
        assert_eq!(cli.word_list, WordListChoice::Code);

        let cli = Cli::parse_from(["typeblitz", "--word-list", "english"]);
        assert_eq!(cli.word_list, WordListChoice::English);
    }

    #[test]
    fn test_cli_rules_path_flag() {
        let cli = Cli::parse_from(["typeblitz", "-r", "/tmp/rules.json"]);
        assert_eq!(cli.rules, Some(PathBuf::from("/tmp/rules.json")));
    }

    #[test]
    fn test_word_list_choice_display() {
        assert_eq!(WordListChoice::English.to_string(), "English");
        assert_eq!(WordListChoice::Code.to_string(), "Code");
    }

    #[test]
    fn test_word_list_choice_as_list() {
        let english = WordListChoice::English.as_list();
        assert_eq!(english.name, "english");
        assert!(!english.words.is_empty());

        let code = WordListChoice::Code.as_list();
        assert_eq!(code.name, "code");
        assert!(!code.words.is_empty());
    }

    #[test]
    fn test_app_new_starts_in_menu() {
        let cli = Cli::parse_from(["typeblitz"]);
        let app = App::new(&cli);

        assert_eq!(app.state, AppState::MainMenu);
        assert_eq!(app.menu_selected, 0);
        assert!(app.last_score.is_none());
    }

    #[test]
    fn test_app_new_with_rules_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        let custom = Rules {
            miss_limit: 3,
            ..Rules::default()
        };
        FileRulesStore::with_path(&path).save(&custom).unwrap();

        let cli = Cli::parse_from(["typeblitz", "-r", path.to_str().unwrap()]);
        let app = App::new(&cli);

        assert_eq!(app.rules.miss_limit, 3);
    }

    #[test]
    fn test_app_new_missing_rules_file_uses_defaults() {
        let cli = Cli::parse_from(["typeblitz", "-r", "/nonexistent/rules.json"]);
        let app = App::new(&cli);

        assert_eq!(app.rules, Rules::default());
    }

    #[test]
    fn test_menu_navigation_wraps() {
        let cli = Cli::parse_from(["typeblitz"]);
        let mut app = App::new(&cli);

        app.menu_prev();
        assert_eq!(app.menu_selected, MENU_ITEMS.len() - 1);

        app.menu_next();
        assert_eq!(app.menu_selected, 0);

        app.menu_next();
        app.menu_next();
        app.menu_next();
        assert_eq!(app.menu_selected, 0);
    }
}

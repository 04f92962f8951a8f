use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::game::GameSession;
use crate::highscores::HighScores;
use crate::score::Score;

/// Smallest terminal the game is playable on.
pub const MIN_SCREEN_WIDTH: u16 = 80;
pub const MIN_SCREEN_HEIGHT: u16 = 25;

/// Rows reserved below the board: separator + status line.
pub const STATUS_ROWS: u16 = 2;

const MENU_OFFSET: u16 = 5;

/// Startup precondition: refuse to run on a terminal smaller than the
/// board layout assumes. Fatal to the whole program, checked before the
/// first frame.
pub fn check_screen_size(width: u16, height: u16) -> Result<(), String> {
    if width < MIN_SCREEN_WIDTH || height < MIN_SCREEN_HEIGHT {
        return Err(format!(
            "You need a minimum screen size of {MIN_SCREEN_WIDTH}x{MIN_SCREEN_HEIGHT} (current: {width}x{height})"
        ));
    }
    Ok(())
}

/// Board geometry for a drawing area: full width, height minus the status
/// rows.
pub fn board_size(area: Rect) -> (u16, u16) {
    (area.width, area.height.saturating_sub(STATUS_ROWS))
}

/// The live play field: in-flight words above a separator, the input echo
/// and scoreboard on the status line below it.
pub struct GameScreen<'a> {
    pub session: &'a GameSession,
}

impl Widget for GameScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (board_width, board_height) = board_size(area);
        if board_height == 0 {
            return;
        }

        let word_style = Style::default().fg(Color::Cyan);
        for word in self.session.field().words() {
            // Words keep the geometry they spawned with; clip anything the
            // terminal can no longer show after a resize.
            if word.row >= board_height || word.col >= board_width {
                continue;
            }
            buf.set_stringn(
                area.x + word.col,
                area.y + word.row,
                &word.text,
                (board_width - word.col) as usize,
                word_style,
            );
        }

        let separator_y = area.y + board_height;
        buf.set_string(
            area.x,
            separator_y,
            "─".repeat(board_width as usize),
            Style::default().add_modifier(Modifier::DIM),
        );

        let status_y = separator_y + 1;
        let score = &self.session.score;
        let scoreboard = format!(
            "Typo: {:<4} Words: {:<4} Score: {:<5} WPM: {:<3} Misses: {:<2}",
            score.typos,
            score.words_completed,
            score.points,
            score.wpm() as u32,
            score.misses,
        );
        let scoreboard_x = area.x + board_width.saturating_sub(scoreboard.width() as u16);
        buf.set_string(
            scoreboard_x,
            status_y,
            &scoreboard,
            Style::default().add_modifier(Modifier::BOLD),
        );
        buf.set_string(
            area.x,
            status_y,
            self.session.buffer.as_str(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    }
}

pub fn render_game(f: &mut Frame, session: &GameSession) {
    f.render_widget(GameScreen { session }, f.area());
}

/// Vertical menu with a `->` pointer, navigated with Up/Down.
pub fn render_menu(f: &mut Frame, title: &str, items: &[&str], selected: usize) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let dim = Style::default().add_modifier(Modifier::DIM);
    let pointer_style = Style::default().fg(Color::Yellow).patch(bold);

    let mut lines = vec![
        Line::from(Span::styled(
            "Choose using Up/Down, Enter to confirm...",
            dim,
        )),
        Line::from(Span::styled(title.to_string(), bold)),
        Line::from(""),
    ];
    for (i, item) in items.iter().enumerate() {
        if i == selected {
            lines.push(Line::from(Span::styled(format!("-> {item}"), pointer_style)));
        } else {
            lines.push(Line::from(format!("   {item}")));
        }
    }

    let area = f.area();
    let inner = Rect {
        x: area.x + MENU_OFFSET.min(area.width.saturating_sub(1)),
        y: area.y + (MENU_OFFSET - 2).min(area.height.saturating_sub(1)),
        width: area.width.saturating_sub(MENU_OFFSET),
        height: area.height.saturating_sub(MENU_OFFSET - 2),
    };
    f.render_widget(Paragraph::new(lines), inner);
}

/// Post-game summary: the final tallies plus the derived level and
/// typo-rank bands.
pub fn render_results(f: &mut Frame, score: &Score) {
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let lines = vec![
        Line::from(Span::styled(
            "GAME OVER!!",
            Style::default().fg(Color::Red).patch(bold),
        )),
        Line::from(""),
        Line::from(format!("Score : {}", score.points)),
        Line::from(format!("WPM   : {}", score.wpm() as u32)),
        Line::from(format!("Words : {}", score.words_completed)),
        Line::from(format!("Typo %: {:.2}", score.typo_percent())),
        Line::from(format!("Misses: {}", score.misses)),
        Line::from(format!("Level : {}", score.level())),
        Line::from(format!("Rank  : {}", score.typo_rank())),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to continue...",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Min(lines.len() as u16),
            Constraint::Percentage(30),
        ])
        .split(f.area());

    f.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        chunks[1],
    );
}

/// Leaderboard table, score descending.
pub fn render_highscores(f: &mut Frame, scores: &HighScores) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let ranked = scores.ranked();

    if ranked.is_empty() {
        let empty = Paragraph::new("No scores yet. Play a game!")
            .block(Block::default().borders(Borders::ALL).title("Top Scores"))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        f.render_widget(empty, chunks[0]);
    } else {
        let header = Row::new(vec![
            Cell::from("Idx"),
            Cell::from("Score"),
            Cell::from("WPM"),
            Cell::from("Words"),
            Cell::from("Time(s)"),
            Cell::from("Typo%"),
        ])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

        let rows: Vec<Row> = ranked
            .iter()
            .enumerate()
            .map(|(idx, entry)| {
                Row::new(vec![
                    Cell::from(format!("{}", idx + 1)),
                    Cell::from(format!("{}", entry.score())),
                    Cell::from(format!("{:.0}", entry.wpm())),
                    Cell::from(format!("{}", entry.words_completed())),
                    Cell::from(format!("{:.1}", entry.duration_secs())),
                    Cell::from(format!("{:.2}", entry.typo_percent())),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            &[
                Constraint::Length(5),
                Constraint::Length(8),
                Constraint::Length(6),
                Constraint::Length(7),
                Constraint::Length(9),
                Constraint::Length(7),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Top {} Scores", ranked.len())),
        );

        f.render_widget(table, chunks[0]);
    }

    let hint = Paragraph::new("Press any key to go back...")
        .style(Style::default().add_modifier(Modifier::DIM))
        .alignment(Alignment::Center);
    f.render_widget(hint, chunks[1]);
}

// Library surface for headless/integration tests and reuse.
// Keep this lean to avoid coupling to bin-only types in main.rs.
pub mod app_dirs;
pub mod field;
pub mod game;
pub mod highscores;
pub mod input;
pub mod rules;
pub mod runtime;
pub mod score;
pub mod session_log;
pub mod speed;
pub mod ui;
pub mod vocabulary;

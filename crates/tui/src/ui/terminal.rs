use std::io::{Stdout, stdout};

use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::error::Result;

pub type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

pub fn setup_terminal() -> Result<AppTerminal> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    if let Err(err) = crossterm::execute!(stdout, EnterAlternateScreen) {
        disable_raw_mode().ok();
        return Err(err.into());
    }
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

/// Leaves raw mode and the alternate screen. Safe to call after a failed
/// draw.
pub fn restore_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    tracing::debug!("terminal restored");
    Ok(())
}

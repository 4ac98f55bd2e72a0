//! Terminal rendering using ratatui.
//!
//! Pure presentation: raw-mode setup/teardown and drawing the register view.
//! Input collection lives on the input thread (see `app`), not here.

use crate::error::Result;
use crate::ui::RegisterView;
use ratatui::crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::io::{self, Stdout};

type CrosstermTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Terminal UI with a ratatui/crossterm backend.
pub struct TerminalUI {
    terminal: Option<CrosstermTerminal>,
}

impl TerminalUI {
    pub fn new() -> Self {
        Self { terminal: None }
    }

    /// Enter raw mode and the alternate screen.
    pub fn initialize(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout);
        self.terminal = Some(Terminal::new(backend)?);
        Ok(())
    }

    /// Restore the terminal. Safe to call more than once.
    pub fn cleanup(&mut self) -> Result<()> {
        if self.terminal.is_some() {
            disable_raw_mode()?;
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.terminal = None;
        }
        Ok(())
    }

    /// Draw one frame of the register view.
    pub fn render(&mut self, view: &RegisterView) -> Result<()> {
        if let Some(ref mut terminal) = self.terminal {
            terminal.draw(|frame| {
                let area = frame.size();
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints(
                        [
                            Constraint::Length(1), // header
                            Constraint::Length(3), // display
                            Constraint::Min(0),    // spacer
                            Constraint::Length(1), // key hints
                        ]
                        .as_ref(),
                    )
                    .split(area);

                Self::render_header(frame, chunks[0], view);
                Self::render_display(frame, chunks[1], view);
                Self::render_hints(frame, chunks[3]);
            })?;
        }
        Ok(())
    }

    fn render_header(frame: &mut Frame, area: Rect, view: &RegisterView) {
        let status_style = if view.status.is_connected() {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Red)
        };
        let line = Line::from(vec![
            Span::styled(view.header(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(view.status_line(), status_style),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_display(frame: &mut Frame, area: Rect, view: &RegisterView) {
        let display = Paragraph::new(view.display_line())
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Right)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(display, area);
    }

    fn render_hints(frame: &mut Frame, area: Rect) {
        let hints = Paragraph::new("0-9 digits  .  decimal  ⌫ backspace  c clear  q quit")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(hints, area);
    }
}

impl Default for TerminalUI {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalUI {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

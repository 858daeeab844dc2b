pub mod cpu;
pub mod disk;
pub mod header;
pub mod memory;
pub mod network;
pub mod statusbar;
pub mod theme;

use std::io;

use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders};
use ratatui::{Frame, Terminal};

use crate::dashboard::Dashboard;
use crate::ui::theme::Theme;

/// Anything the scheduler can present a dashboard on.
///
/// Each call is one complete redraw cycle; the frame is flushed before it
/// returns.
pub trait Canvas {
    fn draw(&mut self, dashboard: &Dashboard) -> io::Result<()>;
}

/// A ratatui terminal paired with the theme it paints with.
pub struct TerminalCanvas<B: Backend> {
    terminal: Terminal<B>,
    theme: Theme,
}

impl<B: Backend> TerminalCanvas<B> {
    pub fn new(terminal: Terminal<B>, theme: Theme) -> Self {
        Self { terminal, theme }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }
}

impl<B: Backend> Canvas for TerminalCanvas<B> {
    fn draw(&mut self, dashboard: &Dashboard) -> io::Result<()> {
        let theme = &self.theme;
        self.terminal
            .draw(|frame| draw(frame, dashboard, theme))
            .map(|_| ())
            .map_err(|err| io::Error::other(err.to_string()))
    }
}

pub fn draw(frame: &mut Frame, dashboard: &Dashboard, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(cpu::height(&dashboard.cpu)),
            Constraint::Min(6),
            Constraint::Length(network::HEIGHT),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(frame, chunks[0], dashboard, theme);
    cpu::render(frame, chunks[1], &dashboard.cpu, theme);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[2]);
    disk::render(frame, middle[0], &dashboard.disk, theme);
    memory::render(frame, middle[1], dashboard.memory.as_ref(), theme);

    network::render(frame, chunks[3], dashboard.network.as_ref(), theme);
    statusbar::render(
        frame,
        chunks[4],
        &dashboard.hints,
        dashboard.runtime_enabled,
        theme,
    );
}

/// Rounded, titled frame shared by every panel.
fn panel_block<'a>(title: impl Into<String>, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border))
        .title(Span::styled(
            title.into(),
            Style::default()
                .fg(theme.title)
                .add_modifier(Modifier::BOLD),
        ))
}

#[cfg(test)]
mod tests;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, Paragraph};

use crate::dashboard::CpuView;
use crate::format::progress_bar;
use crate::ui::panel_block;
use crate::ui::theme::Theme;

/// Per-core bars are laid out row-major across this many columns.
pub const COLUMNS: usize = 4;

/// Borders, the aggregate gauge, and one row per `COLUMNS` cores.
pub fn height(view: &CpuView) -> u16 {
    let rows = view.cores.len().div_ceil(COLUMNS);
    u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(3)
}

pub fn render(frame: &mut Frame, area: Rect, view: &CpuView, theme: &Theme) {
    let block = panel_block(" CPU ", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let aggregate = f64::from(view.aggregate).clamp(0.0, 100.0);
    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(theme.heat(aggregate))
                .bg(theme.gauge_unfilled),
        )
        .ratio(aggregate / 100.0)
        .label(format!("total {aggregate:.1}%"));
    frame.render_widget(gauge, rows[0]);

    render_cores(frame, rows[1], &view.cores, theme);
}

fn render_cores(frame: &mut Frame, area: Rect, cores: &[f32], theme: &Theme) {
    if cores.is_empty() || area.height == 0 {
        return;
    }
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, COLUMNS as u32); COLUMNS])
        .split(area);

    let mut lines: Vec<Vec<Line>> = vec![Vec::new(); COLUMNS];
    for (index, usage) in cores.iter().enumerate() {
        let column = index % COLUMNS;
        // label (4) + " " + value (7)
        let bar_width = usize::from(columns[column].width).saturating_sub(12);
        lines[column].push(core_line(index, f64::from(*usage), bar_width, theme));
    }

    for (column, lines) in lines.into_iter().enumerate() {
        frame.render_widget(Paragraph::new(lines), columns[column]);
    }
}

fn core_line(index: usize, usage: f64, bar_width: usize, theme: &Theme) -> Line<'static> {
    let usage = usage.clamp(0.0, 100.0);
    Line::from(vec![
        Span::styled(
            format!("{index:>3} "),
            Style::default().fg(theme.text_secondary),
        ),
        Span::styled(
            progress_bar(usage, bar_width),
            Style::default().fg(theme.heat(usage)),
        ),
        Span::styled(
            format!(" {usage:>5.1}%"),
            Style::default().fg(theme.text_primary),
        ),
    ])
}

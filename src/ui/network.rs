use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Cell, Row, Table};

use crate::dashboard::NetworkView;
use crate::format::{format_rate, truncate_unicode};
use crate::system::snapshot::NetworkStat;
use crate::ui::panel_block;
use crate::ui::theme::Theme;

/// Borders, the name row and the RX, TX and total rows.
pub const HEIGHT: u16 = 6;

const LABEL_WIDTH: u16 = 7;

pub fn render(frame: &mut Frame, area: Rect, view: Option<&NetworkView>, theme: &Theme) {
    let block = panel_block(" Network ", theme);
    let Some(view) = view.filter(|v| !v.columns.is_empty()) else {
        frame.render_widget(block, area);
        return;
    };

    let columns = view.columns.len() as u16;
    // borders, the label column, and one space of spacing per rate column
    let inner_width = area.width.saturating_sub(2 + LABEL_WIDTH + columns);
    let column_width = (inner_width / columns.max(1)).max(1);

    let header = Row::new(
        std::iter::once(Cell::from(""))
            .chain(view.columns.iter().map(|stat| {
                Cell::from(Span::styled(
                    truncate_unicode(&stat.name, usize::from(column_width.saturating_sub(1))),
                    Style::default()
                        .fg(theme.title)
                        .add_modifier(Modifier::BOLD),
                ))
            })),
    );

    let rows = [
        rate_row("RX", &view.columns, |s| s.rx_bytes, theme.rx_color, theme),
        rate_row("TX", &view.columns, |s| s.tx_bytes, theme.tx_color, theme),
        rate_row(
            "Total",
            &view.columns,
            NetworkStat::total_bytes,
            theme.text_primary,
            theme,
        ),
    ];

    let widths = std::iter::once(Constraint::Length(LABEL_WIDTH))
        .chain(view.columns.iter().map(|_| Constraint::Length(column_width)));

    let table = Table::new(rows, widths).header(header).block(block);
    frame.render_widget(table, area);
}

fn rate_row<'a>(
    label: &'a str,
    columns: &[NetworkStat],
    value: impl Fn(&NetworkStat) -> u64,
    color: Color,
    theme: &Theme,
) -> Row<'a> {
    let cells = std::iter::once(Cell::from(Span::styled(
        label,
        Style::default().fg(theme.text_secondary),
    )))
    .chain(columns.iter().map(|stat| {
        Cell::from(Span::styled(
            format_rate(value(stat)),
            Style::default().fg(color),
        ))
    }));
    Row::new(cells)
}

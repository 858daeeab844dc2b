use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::dashboard::Dashboard;
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, dashboard: &Dashboard, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut spans = vec![Span::styled(
        " dashtop ",
        Style::default()
            .fg(theme.header_accent_fg)
            .bg(theme.header_accent_bg)
            .add_modifier(Modifier::BOLD),
    )];

    if dashboard.has_data() {
        spans.extend([
            Span::raw("  "),
            Span::styled(
                format!("Cores: {}", dashboard.cpu.cores.len()),
                Style::default().fg(theme.text_secondary),
            ),
            Span::raw("  "),
            Span::styled(
                format!("Samples: {}", dashboard.samples),
                Style::default().fg(theme.text_secondary),
            ),
        ]);
    } else {
        spans.extend([
            Span::raw("  "),
            Span::styled(
                "waiting for first sample\u{2026}",
                Style::default().fg(theme.text_secondary),
            ),
        ]);
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

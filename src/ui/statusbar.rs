use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::dashboard::KeyHints;
use crate::ui::theme::Theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    hints: &KeyHints,
    runtime_enabled: bool,
    theme: &Theme,
) {
    let bg_style = Style::default().bg(theme.statusbar_bg);

    let mut spans = Vec::new();
    spans.extend(pill_spans(&hints.quit, "Quit", theme));
    spans.extend(pill_spans(&hints.toggle_runtime, "Runtime", theme));

    let state = if runtime_enabled { "on" } else { "off" };
    spans.push(Span::styled(
        format!("  runtime stats {state}"),
        Style::default().fg(theme.text_secondary),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
}

fn pill_spans<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Vec<Span<'a>> {
    vec![
        Span::raw(" "),
        Span::styled(
            format!(" {key} "),
            Style::default()
                .fg(theme.pill_key_fg)
                .bg(theme.pill_key_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {desc}"),
            Style::default().fg(theme.pill_desc_fg).bg(theme.surface_bg),
        ),
    ]
}

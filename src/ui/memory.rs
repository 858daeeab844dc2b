use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::dashboard::MemoryView;
use crate::format::{format_bytes, progress_bar};
use crate::system::snapshot::RuntimeStat;
use crate::ui::panel_block;
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, view: Option<&MemoryView>, theme: &Theme) {
    let block = panel_block(" Memory ", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(view) = view else {
        return;
    };
    let stat = &view.stat;
    let label = Style::default().fg(theme.text_secondary);
    let value = Style::default().fg(theme.text_primary);

    let mut lines = vec![
        Line::from(Span::styled(
            progress_bar(stat.used_percent, usize::from(inner.width)),
            Style::default().fg(theme.heat(stat.used_percent)),
        )),
        Line::from(vec![
            Span::styled("used  ", label),
            Span::styled(
                format!(
                    "{} / {} ({:.0}%)",
                    format_bytes(stat.used),
                    format_bytes(stat.total),
                    stat.used_percent
                ),
                value,
            ),
        ]),
        Line::from(vec![
            Span::styled("free  ", label),
            Span::styled(format_bytes(stat.free), value),
        ]),
    ];

    if let Some(runtime) = &view.runtime {
        lines.push(Line::raw(""));
        lines.extend(runtime_lines(runtime, theme));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn runtime_lines(runtime: &RuntimeStat, theme: &Theme) -> Vec<Line<'static>> {
    let label = Style::default().fg(theme.text_secondary);
    let value = Style::default().fg(theme.text_primary);
    let row = |name: &'static str, text: String| {
        Line::from(vec![Span::styled(name, label), Span::styled(text, value)])
    };
    vec![
        Line::from(Span::styled(
            "Runtime",
            Style::default()
                .fg(theme.title)
                .add_modifier(Modifier::BOLD),
        )),
        row("tasks     ", runtime.workers.to_string()),
        row("resident  ", format_bytes(runtime.heap_bytes)),
        row("virtual   ", format_bytes(runtime.reserved_bytes)),
        row(
            "gc        ",
            format!(
                "{} cycles, {} ms",
                runtime.gc_cycles,
                runtime.gc_pause.as_millis()
            ),
        ),
    ]
}

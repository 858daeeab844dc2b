use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::dashboard::DiskView;
use crate::format::{format_bytes, progress_bar, truncate_unicode};
use crate::system::snapshot::DiskStat;
use crate::ui::panel_block;
use crate::ui::theme::Theme;

const PATH_WIDTH: usize = 14;
const BAR_WIDTH: usize = 12;

pub fn render(frame: &mut Frame, area: Rect, view: &DiskView, theme: &Theme) {
    let block = panel_block(" Disk ", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = view
        .disks
        .iter()
        .map(|disk| disk_line(disk, theme))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn disk_line(disk: &DiskStat, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(
                "{:<width$} ",
                truncate_unicode(&disk.path, PATH_WIDTH),
                width = PATH_WIDTH
            ),
            Style::default().fg(theme.text_secondary),
        ),
        Span::styled(
            progress_bar(disk.used_percent, BAR_WIDTH),
            Style::default().fg(theme.heat(disk.used_percent)),
        ),
        Span::styled(
            format!(
                " {:>3.0}% {} / {}",
                disk.used_percent,
                format_bytes(disk.used),
                format_bytes(disk.total)
            ),
            Style::default().fg(theme.text_primary),
        ),
    ])
}

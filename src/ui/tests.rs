use std::time::Duration;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::dashboard::{CpuView, Dashboard, DiskView, KeyHints, MemoryView, NetworkView};
use crate::system::snapshot::{DiskStat, MemoryStat, NetworkStat, RuntimeStat};
use crate::ui::theme::Theme;
use crate::ui::{Canvas, TerminalCanvas, draw, memory, network, statusbar};

const GIB: u64 = 1024 * 1024 * 1024;

fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            let cell = buf.cell((x, y)).unwrap();
            out.push_str(cell.symbol());
        }
        if y + 1 < area.height {
            out.push('\n');
        }
    }
    out
}

fn render_to_string<F>(width: u16, height: u16, draw: F) -> String
where
    F: FnOnce(&mut ratatui::Frame),
{
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(draw).unwrap();
    let buf = terminal.backend().buffer();
    buffer_to_string(buf)
}

fn iface(name: &str, rx: u64, tx: u64) -> NetworkStat {
    NetworkStat {
        name: name.to_string(),
        rx_bytes: rx,
        tx_bytes: tx,
        ..NetworkStat::default()
    }
}

fn make_dashboard() -> Dashboard {
    Dashboard {
        samples: 3,
        cpu: CpuView {
            aggregate: 42.0,
            cores: vec![10.0, 20.0, 30.0, 95.0],
        },
        memory: Some(MemoryView {
            stat: MemoryStat::new(16 * GIB, 4 * GIB, 12 * GIB),
            runtime: None,
        }),
        disk: DiskView {
            disks: vec![DiskStat::new("/", 100 * GIB, 50 * GIB, 50 * GIB)],
        },
        network: Some(NetworkView {
            columns: vec![iface("eth0", 2048, 1024), iface("wlan0", 512, 0)],
        }),
        runtime_enabled: false,
        hints: KeyHints {
            quit: "q".to_string(),
            toggle_runtime: "g".to_string(),
        },
    }
}

#[test]
fn full_dashboard_shows_every_panel() {
    let dashboard = make_dashboard();
    let output = render_to_string(120, 30, |frame| draw(frame, &dashboard, &Theme::dark()));

    assert!(output.contains("dashtop"));
    assert!(output.contains("Cores: 4"));
    assert!(output.contains("Samples: 3"));
    assert!(output.contains("total 42.0%"));
    assert!(output.contains(" 95.0%"));
    assert!(output.contains("4.0 GB / 16.0 GB (25%)"));
    assert!(output.contains("50.0 GB / 100.0 GB"));
    assert!(output.contains("eth0"));
    assert!(output.contains("wlan0"));
    assert!(output.contains("2 KB/s"));
    assert!(output.contains("3 KB/s"));
    assert!(output.contains("Quit"));
    assert!(output.contains("runtime stats off"));
}

#[test]
fn empty_dashboard_renders_empty_sections() {
    let dashboard = Dashboard::default();
    let output = render_to_string(80, 20, |frame| draw(frame, &dashboard, &Theme::dark()));

    assert!(output.contains("waiting for first sample"));
    assert!(output.contains("Memory"));
    assert!(output.contains("Disk"));
    assert!(output.contains("Network"));
    assert!(!output.contains("used"));
    assert!(!output.contains("RX"));
}

#[test]
fn memory_panel_includes_runtime_section_when_present() {
    let view = MemoryView {
        stat: MemoryStat::new(8 * GIB, 2 * GIB, 6 * GIB),
        runtime: Some(RuntimeStat {
            workers: 3,
            heap_bytes: 8 * 1024 * 1024,
            reserved_bytes: GIB,
            gc_cycles: 0,
            gc_pause: Duration::ZERO,
        }),
    };
    let output = render_to_string(40, 12, |frame| {
        memory::render(frame, Rect::new(0, 0, 40, 12), Some(&view), &Theme::dark());
    });

    assert!(output.contains("Runtime"));
    assert!(output.contains("tasks     3"));
    assert!(output.contains("8.0 MB"));
    assert!(output.contains("0 cycles, 0 ms"));
}

#[test]
fn memory_panel_without_runtime_hides_section() {
    let view = MemoryView {
        stat: MemoryStat::new(8 * GIB, 2 * GIB, 6 * GIB),
        runtime: None,
    };
    let output = render_to_string(40, 12, |frame| {
        memory::render(frame, Rect::new(0, 0, 40, 12), Some(&view), &Theme::dark());
    });

    assert!(output.contains("2.0 GB / 8.0 GB (25%)"));
    assert!(!output.contains("Runtime"));
}

#[test]
fn network_panel_truncates_long_names() {
    let view = NetworkView {
        columns: vec![
            iface("enp0s31f6-long", 1, 1),
            iface("wlp2s0", 1, 1),
            iface("lo", 1, 1),
        ],
    };
    let output = render_to_string(40, network::HEIGHT, |frame| {
        network::render(
            frame,
            Rect::new(0, 0, 40, network::HEIGHT),
            Some(&view),
            &Theme::dark(),
        );
    });

    assert!(output.contains("enp0s31\u{2026}"));
    assert!(output.contains("wlp2s0"));
    assert!(output.contains("Total"));
}

#[test]
fn statusbar_uses_remapped_keys() {
    let hints = KeyHints {
        quit: "x".to_string(),
        toggle_runtime: "F2".to_string(),
    };
    let output = render_to_string(60, 1, |frame| {
        statusbar::render(frame, Rect::new(0, 0, 60, 1), &hints, true, &Theme::mono());
    });

    assert_eq!(
        output.trim_end(),
        "  x  Quit  F2  Runtime  runtime stats on"
    );
}

#[test]
fn terminal_canvas_draws_through_trait() {
    let terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    let mut canvas = TerminalCanvas::new(terminal, Theme::from_config("light"));

    canvas.draw(&make_dashboard()).unwrap();

    let output = buffer_to_string(canvas.terminal().backend().buffer());
    assert!(output.contains("dashtop"));
    assert!(output.contains("eth0"));
    assert_eq!(canvas.theme().name, "light");
}

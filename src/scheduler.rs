use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use futures::{Stream, StreamExt};
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::config::{KeybindsConfig, Settings, parse_key};
use crate::dashboard::{CpuView, Dashboard, DiskView, KeyHints, MemoryView, NetworkView};
use crate::event::Event;
use crate::ranking::RankingCache;
use crate::shutdown::Shutdown;
use crate::stream::SnapshotReceiver;
use crate::system::provider::MetricsProvider;
use crate::system::sampler::Sampler;
use crate::system::snapshot::Snapshot;
use crate::throttle::PanelThrottle;
use crate::ui::Canvas;

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub toggle_runtime: KeyCode,
}

impl Default for ResolvedKeybinds {
    fn default() -> Self {
        Self::from_config(&KeybindsConfig::default())
    }
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            toggle_runtime: parse_key(&kb.toggle_runtime).unwrap_or(KeyCode::Char('g')),
        }
    }

    fn hints(&self) -> KeyHints {
        KeyHints {
            quit: key_label(self.quit),
            toggle_runtime: key_label(self.toggle_runtime),
        }
    }
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Delete => "Del".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => "?".to_string(),
    }
}

/// Why the render loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Quit,
    Cancelled,
    StreamClosed,
}

/// Single consumer of the snapshot stream and sole caller of the canvas.
///
/// CPU and disk follow every snapshot. Memory and the network table redraw at
/// most once per their cadence, and the set of interfaces the network table
/// shows is re-ranked on a slower cadence still.
pub struct RenderScheduler {
    dashboard: Dashboard,
    show_runtime: bool,
    memory: PanelThrottle,
    network: PanelThrottle,
    ranking: RankingCache,
    keybinds: ResolvedKeybinds,
    shutdown: Shutdown,
}

impl RenderScheduler {
    pub fn new(settings: &Settings, keybinds: ResolvedKeybinds, shutdown: Shutdown) -> Self {
        let dashboard = Dashboard {
            runtime_enabled: settings.runtime_panel_enabled,
            hints: keybinds.hints(),
            ..Dashboard::default()
        };
        RenderScheduler {
            dashboard,
            show_runtime: settings.runtime_panel_enabled,
            memory: PanelThrottle::new(settings.memory_cadence),
            network: PanelThrottle::new(settings.network_cadence),
            ranking: RankingCache::new(settings.ranking_cadence, settings.top_interfaces),
            keybinds,
            shutdown,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn show_runtime(&self) -> bool {
        self.show_runtime
    }

    pub fn ranking(&self) -> &RankingCache {
        &self.ranking
    }

    /// Folds one snapshot into the panel views, honoring each panel's cadence.
    pub fn apply(&mut self, snapshot: Snapshot, now: Instant) {
        let Snapshot {
            cpu,
            memory,
            disk,
            network,
            runtime,
            ..
        } = snapshot;

        self.dashboard.samples += 1;

        let aggregate = cpu.first().copied().unwrap_or(0.0);
        let cores = cpu.get(1..).map(<[f32]>::to_vec).unwrap_or_default();
        self.dashboard.cpu = CpuView { aggregate, cores };

        self.dashboard.disk = DiskView { disks: disk };

        if self.memory.try_acquire(now) {
            self.dashboard.memory = Some(MemoryView {
                stat: memory,
                runtime: self.show_runtime.then_some(runtime),
            });
        }

        if self.ranking.refresh(&network, now) {
            debug!(top = ?self.ranking.top_names(), "interface ranking refreshed");
        }

        if self.network.try_acquire(now) {
            let columns = self
                .ranking
                .top_names()
                .iter()
                .filter_map(|name| network.iter().find(|n| &n.name == name).cloned())
                .collect();
            self.dashboard.network = Some(NetworkView { columns });
        }
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }
        if key.code == self.keybinds.quit {
            return Action::Quit;
        }
        if key.code == self.keybinds.toggle_runtime {
            return Action::ToggleRuntimePanel;
        }
        Action::None
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.shutdown.trigger(),
            Action::ToggleRuntimePanel => {
                // Picked up by the next memory redraw the throttle lets through.
                self.show_runtime = !self.show_runtime;
                self.dashboard.runtime_enabled = self.show_runtime;
            }
            Action::None => {}
        }
    }

    /// Consumes snapshots and input until quit, cancellation or end of stream,
    /// then stops the sampler and releases the queue.
    pub async fn run<P, C, I>(
        &mut self,
        sampler: &mut Sampler<P>,
        mut snapshots: SnapshotReceiver,
        canvas: &mut C,
        input: &mut I,
    ) -> Exit
    where
        P: MetricsProvider,
        C: Canvas,
        I: Stream<Item = Event> + Unpin,
    {
        let shutdown = self.shutdown.clone();
        let mut input_open = true;
        self.present(canvas);

        let exit = loop {
            tokio::select! {
                biased;
                _ = shutdown.triggered() => break Exit::Cancelled,
                event = input.next(), if input_open => match event {
                    Some(Event::Key(key)) => {
                        let action = self.map_key(key);
                        self.dispatch(action);
                        if action == Action::Quit {
                            break Exit::Quit;
                        }
                        if action != Action::None {
                            self.present(canvas);
                        }
                    }
                    Some(Event::Resize) => self.present(canvas),
                    None => {
                        warn!("terminal input closed; only quit via shutdown signal remains");
                        input_open = false;
                    }
                },
                snapshot = snapshots.recv() => match snapshot {
                    Some(snapshot) => {
                        self.apply(snapshot, Instant::now());
                        self.present(canvas);
                    }
                    None => break Exit::StreamClosed,
                },
            }
        };

        self.shutdown.trigger();
        sampler.stop().await;
        snapshots.close();
        info!(?exit, samples = self.dashboard.samples, "render loop finished");
        exit
    }

    fn present<C: Canvas>(&self, canvas: &mut C) {
        if let Err(err) = canvas.draw(&self.dashboard) {
            warn!(error = %err, "dropping frame");
        }
    }
}

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::Result;
use dashtop::config::{Config, load_config, load_config_from_path, save_config};
use dashtop::event::EventHandler;
use dashtop::logging;
use dashtop::scheduler::{RenderScheduler, ResolvedKeybinds};
use dashtop::shutdown::Shutdown;
use dashtop::stream::stream_buffer;
use dashtop::system::collector::Collector;
use dashtop::system::sampler::{MIN_INTERVAL, Sampler};
use dashtop::ui::TerminalCanvas;
use dashtop::ui::theme::Theme;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "dashtop",
    version,
    about = "Terminal dashboard for CPU, memory, disk and network usage"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sampling interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Start with runtime statistics shown in the memory panel
    #[arg(long, default_value_t = false)]
    runtime: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Clone, Default)]
enum Command {
    /// Interactive dashboard (default)
    #[default]
    Monitor,
    /// Collect two samples one interval apart and print the second as JSON
    Snapshot,
    /// Print the effective configuration as TOML, or save it with --write
    Config {
        /// Save the configuration instead of printing it
        #[arg(long)]
        write: bool,
        /// Destination for --write (defaults to ~/.dashtop.toml)
        #[arg(long, requires = "write")]
        path: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);
    let log_path = logging::init(&config.logging)?;
    info!(log = %log_path.display(), version = env!("CARGO_PKG_VERSION"), "dashtop starting");

    match cli.command.unwrap_or_default() {
        Command::Monitor => run_monitor(config).await,
        Command::Snapshot => print_snapshot(config).await,
        Command::Config { write, path } => show_config(&config, write, path.as_deref()),
    }
}

async fn run_monitor(config: Config) -> Result<()> {
    let settings = config.settings();
    let keybinds = ResolvedKeybinds::from_config(&config.keybinds);
    let theme = Theme::from_config(&config.general.theme);

    let shutdown = Shutdown::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => signal.trigger(),
            Err(err) => warn!(error = %err, "cannot listen for interrupt signal"),
        }
    });

    // init also installs a panic hook that restores the terminal
    let terminal = ratatui::init();

    let (sender, receiver) = stream_buffer(settings.queue_capacity);
    let mut sampler = Sampler::new(Collector::default());
    sampler.start(settings.sampling_interval, sender);

    let mut scheduler = RenderScheduler::new(&settings, keybinds, shutdown);
    let mut canvas = TerminalCanvas::new(terminal, theme);
    let mut input = EventHandler::new();

    let exit = scheduler
        .run(&mut sampler, receiver, &mut canvas, &mut input)
        .await;

    ratatui::restore();
    info!(?exit, "dashtop exiting");
    Ok(())
}

async fn print_snapshot(config: Config) -> Result<()> {
    let interval = config.settings().sampling_interval.max(MIN_INTERVAL);
    let mut collector = Collector::default();

    // The first reading only establishes network baselines.
    collector.collect()?;
    tokio::time::sleep(interval).await;
    let snapshot = collector.collect()?;

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn show_config(config: &Config, write: bool, path: Option<&Path>) -> Result<()> {
    if write {
        let written = save_config(config, path)?;
        println!("wrote {}", written.display());
    } else {
        print!("{}", toml::to_string_pretty(config)?);
    }
    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(interval) = cli.interval_ms {
        config.general.refresh_interval_ms = interval;
    }
    if cli.runtime {
        config.general.show_runtime = true;
    }

    config
}

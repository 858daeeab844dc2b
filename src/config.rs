use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::ranking::DEFAULT_TOP_N;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no home directory to save the config under")]
    NoHome,
    #[error("cannot write config: {0}")]
    Io(#[from] io::Error),
    #[error("cannot serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub panels: PanelsConfig,
    pub keybinds: KeybindsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub refresh_interval_ms: u64,
    pub show_runtime: bool,
    pub queue_capacity: usize,
    pub theme: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            refresh_interval_ms: 1000,
            show_runtime: false,
            queue_capacity: 10,
            theme: "dark".to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelsConfig {
    pub memory_cadence_ms: u64,
    pub network_cadence_ms: u64,
    pub ranking_cadence_ms: u64,
    pub top_interfaces: usize,
}

impl Default for PanelsConfig {
    fn default() -> Self {
        PanelsConfig {
            memory_cadence_ms: 5_000,
            network_cadence_ms: 5_000,
            ranking_cadence_ms: 30_000,
            top_interfaces: 3,
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeybindsConfig {
    pub quit: String,
    pub toggle_runtime: String,
}

impl Default for KeybindsConfig {
    fn default() -> Self {
        KeybindsConfig {
            quit: "q".to_string(),
            toggle_runtime: "g".to_string(),
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Immutable knobs handed to the sampler and the scheduler at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub sampling_interval: Duration,
    pub runtime_panel_enabled: bool,
    pub queue_capacity: usize,
    pub memory_cadence: Duration,
    pub network_cadence: Duration,
    pub ranking_cadence: Duration,
    pub top_interfaces: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Config::default().settings()
    }
}

impl Config {
    pub fn settings(&self) -> Settings {
        Settings {
            sampling_interval: Duration::from_millis(self.general.refresh_interval_ms),
            runtime_panel_enabled: self.general.show_runtime,
            queue_capacity: self.general.queue_capacity,
            memory_cadence: Duration::from_millis(self.panels.memory_cadence_ms),
            network_cadence: Duration::from_millis(self.panels.network_cadence_ms),
            ranking_cadence: Duration::from_millis(self.panels.ranking_cadence_ms),
            top_interfaces: self.panels.top_interfaces.min(DEFAULT_TOP_N),
        }
    }
}

/// Parses a keybind name such as `"q"`, `"Enter"` or `"F2"`.
pub fn parse_key(s: &str) -> Option<KeyCode> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }
    match s.to_lowercase().as_str() {
        "enter" | "return" => Some(KeyCode::Enter),
        "esc" | "escape" => Some(KeyCode::Esc),
        "tab" => Some(KeyCode::Tab),
        "space" => Some(KeyCode::Char(' ')),
        "backspace" => Some(KeyCode::Backspace),
        "delete" | "del" => Some(KeyCode::Delete),
        other => other
            .strip_prefix('f')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=12).contains(n))
            .map(KeyCode::F),
    }
}

/// Candidate config files, most specific first.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("dashtop").join("config.toml"));
    }
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".dashtop.toml"));
    }
    paths.push(PathBuf::from("dashtop.toml"));
    paths
}

pub fn load_config() -> Config {
    match config_paths().into_iter().find(|p| p.exists()) {
        Some(path) => load_config_from_path(&path),
        None => Config::default(),
    }
}

pub fn load_config_from_path(path: &Path) -> Config {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "config unreadable, using defaults");
            return Config::default();
        }
    };
    match toml::from_str(&contents) {
        Ok(config) => config,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "config invalid, using defaults");
            Config::default()
        }
    }
}

/// Where `save_config` writes when no path is given.
pub fn default_save_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".dashtop.toml"))
}

/// Writes `config` as TOML to `path`, or to `~/.dashtop.toml`.
pub fn save_config(config: &Config, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_save_path().ok_or(ConfigError::NoHome)?,
    };
    let contents = toml::to_string_pretty(config)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, contents)?;
    info!(path = %path.display(), "config saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.general.refresh_interval_ms, 1000);
        assert!(!config.general.show_runtime);
        assert_eq!(config.general.queue_capacity, 10);
        assert_eq!(config.general.theme, "dark");
        assert_eq!(config.panels.memory_cadence_ms, 5_000);
        assert_eq!(config.panels.ranking_cadence_ms, 30_000);
        assert_eq!(config.keybinds.quit, "q");
        assert_eq!(config.keybinds.toggle_runtime, "g");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_partial_toml() {
        let toml_str = r#"
[general]
refresh_interval_ms = 250
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.refresh_interval_ms, 250);
        // Other fields should be defaults
        assert_eq!(config.general.queue_capacity, 10);
        assert_eq!(config.panels.top_interfaces, 3);
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[general]
refresh_interval_ms = 500
show_runtime = true
queue_capacity = 4
theme = "light"

[panels]
memory_cadence_ms = 2000
network_cadence_ms = 3000
ranking_cadence_ms = 10000
top_interfaces = 5

[keybinds]
quit = "x"
toggle_runtime = "r"

[logging]
level = "debug"
file = "/tmp/dashtop.log"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        let settings = config.settings();
        assert_eq!(settings.sampling_interval, Duration::from_millis(500));
        assert!(settings.runtime_panel_enabled);
        assert_eq!(settings.queue_capacity, 4);
        assert_eq!(settings.memory_cadence, Duration::from_secs(2));
        assert_eq!(settings.network_cadence, Duration::from_secs(3));
        assert_eq!(settings.ranking_cadence, Duration::from_secs(10));
        // the dashboard never lists more than three interfaces
        assert_eq!(config.panels.top_interfaces, 5);
        assert_eq!(settings.top_interfaces, 3);
        assert_eq!(config.general.theme, "light");
        assert_eq!(config.keybinds.quit, "x");
        assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/dashtop.log")));
    }

    #[test]
    fn top_interfaces_below_the_cap_are_kept() {
        let mut config = Config::default();
        config.panels.top_interfaces = 2;
        assert_eq!(config.settings().top_interfaces, 2);
    }

    #[test]
    fn saved_config_loads_back_unchanged() {
        let mut config = Config::default();
        config.general.refresh_interval_ms = 750;
        config.general.theme = "mono".to_string();
        config.panels.network_cadence_ms = 2_500;
        config.keybinds.quit = "x".to_string();
        config.logging.file = Some(PathBuf::from("/tmp/dashtop.log"));

        let path = std::env::temp_dir()
            .join("dashtop_test_save")
            .join("config.toml");
        let written = save_config(&config, Some(&path)).unwrap();
        assert_eq!(written, path);

        let loaded = load_config_from_path(&path);
        assert_eq!(loaded, config);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn saved_config_omits_unset_log_file() {
        let contents = toml::to_string_pretty(&Config::default()).unwrap();
        assert!(contents.contains("[general]"));
        assert!(contents.contains("refresh_interval_ms = 1000"));
        assert!(!contents.contains("file ="));
    }

    #[test]
    fn missing_file_returns_default() {
        let config = load_config_from_path(Path::new("/nonexistent/path/config.toml"));
        assert_eq!(config.general.refresh_interval_ms, 1000);
    }

    #[test]
    fn invalid_toml_returns_default() {
        let temp = std::env::temp_dir().join("dashtop_test_invalid.toml");
        std::fs::write(&temp, "this is not valid toml {{{{").unwrap();
        let config = load_config_from_path(&temp);
        assert_eq!(config.general.refresh_interval_ms, 1000);
        let _ = std::fs::remove_file(&temp);
    }

    #[test]
    fn parse_key_names() {
        assert_eq!(parse_key("q"), Some(KeyCode::Char('q')));
        assert_eq!(parse_key("G"), Some(KeyCode::Char('G')));
        assert_eq!(parse_key("Escape"), Some(KeyCode::Esc));
        assert_eq!(parse_key("space"), Some(KeyCode::Char(' ')));
        assert_eq!(parse_key("F5"), Some(KeyCode::F(5)));
        assert_eq!(parse_key("F13"), None);
        assert_eq!(parse_key("nonsense"), None);
    }

    #[test]
    fn config_paths_end_with_working_directory() {
        let paths = config_paths();
        assert_eq!(paths.last(), Some(&PathBuf::from("dashtop.toml")));
    }
}

//! Cursors configuration file handling

use anyhow::{bail, Context, Result};
use cursors_app::SimulationConfig;
use cursors_platform::WindowConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default configuration file name
pub const CONFIG_FILE: &str = "cursors.toml";

/// Top-level configuration (cursors.toml)
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct CursorsConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub simulation: SimulationSection,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Window settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DisplayConfig {
    #[serde(default = "default_title")]
    pub title: String,
    /// Window width when not fullscreen; also the headless display width
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_true")]
    pub fullscreen: bool,
    #[serde(default = "default_fps")]
    pub target_fps: u32,
}

fn default_title() -> String {
    "Cursors".to_string()
}

fn default_width() -> u32 {
    1280
}

fn default_height() -> u32 {
    720
}

fn default_true() -> bool {
    true
}

fn default_fps() -> u32 {
    60
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            fullscreen: true,
            target_fps: default_fps(),
        }
    }
}

/// Swarm behavior
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationSection {
    #[serde(default = "default_cursor_count")]
    pub cursor_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default = "default_real_smoothing")]
    pub real_smoothing: f32,
    #[serde(default = "default_synthetic_smoothing")]
    pub synthetic_smoothing: f32,
    #[serde(default = "default_velocity_refresh_ms")]
    pub velocity_refresh_ms: u64,
    #[serde(default = "default_max_velocity")]
    pub max_velocity: f32,
    #[serde(default = "default_max_rotation_speed")]
    pub max_rotation_speed: f32,
}

fn default_cursor_count() -> usize {
    10
}

fn default_real_smoothing() -> f32 {
    0.3
}

fn default_synthetic_smoothing() -> f32 {
    0.15
}

fn default_velocity_refresh_ms() -> u64 {
    100
}

fn default_max_velocity() -> f32 {
    2.0
}

fn default_max_rotation_speed() -> f32 {
    3.0
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            cursor_count: default_cursor_count(),
            seed: None,
            real_smoothing: default_real_smoothing(),
            synthetic_smoothing: default_synthetic_smoothing(),
            velocity_refresh_ms: default_velocity_refresh_ms(),
            max_velocity: default_max_velocity(),
            max_rotation_speed: default_max_rotation_speed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter, overridden by `RUST_LOG`
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl CursorsConfig {
    /// Load configuration from a file, or from `cursors.toml` in a directory
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = config_path(path);

        if !config_path.exists() {
            bail!(
                "No {} found in {}. Run `cursors init` to create one.",
                CONFIG_FILE,
                path.display()
            );
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    /// Load `path` if given, otherwise `./cursors.toml` if present, otherwise
    /// defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_dir(path),
            None if Path::new(CONFIG_FILE).is_file() => Self::load_from_dir(Path::new(CONFIG_FILE)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: CursorsConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }

    pub fn validate(&self) -> Result<()> {
        let display = &self.display;
        if display.width == 0 || display.height == 0 {
            bail!(
                "display size must be non-zero, got {}x{}",
                display.width,
                display.height
            );
        }
        if display.target_fps == 0 {
            bail!("display.target_fps must be > 0");
        }
        if self.simulation.velocity_refresh_ms == 0 {
            bail!("simulation.velocity_refresh_ms must be > 0");
        }
        self.simulation_config().validate()?;
        Ok(())
    }

    pub fn simulation_config(&self) -> SimulationConfig {
        let sim = &self.simulation;
        let mut config = SimulationConfig::default().with_cursor_count(sim.cursor_count);
        config.seed = sim.seed;
        config.motion.real_smoothing = sim.real_smoothing;
        config.motion.synthetic_smoothing = sim.synthetic_smoothing;
        config.targets.velocity_refresh = Duration::from_millis(sim.velocity_refresh_ms);
        config.targets.max_velocity = sim.max_velocity;
        config.spawn.max_rotation_speed = sim.max_rotation_speed;
        config
    }

    pub fn window_config(&self) -> WindowConfig {
        let display = &self.display;
        let window = WindowConfig::new(display.title.clone()).with_target_fps(display.target_fps);
        if display.fullscreen {
            WindowConfig {
                width: display.width,
                height: display.height,
                ..window
            }
        } else {
            window.windowed(display.width, display.height)
        }
    }
}

fn config_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(CONFIG_FILE)
    } else {
        path.to_path_buf()
    }
}

/// Parse a `WIDTHxHEIGHT` size such as `1280x720`
pub fn parse_size(value: &str) -> std::result::Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value:?}"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid size {value:?}: {e}"))
    };
    let size = (parse(width)?, parse(height)?);
    if size.0 == 0 || size.1 == 0 {
        return Err(format!("size must be non-zero, got {value:?}"));
    }
    Ok(size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = CursorsConfig::from_toml("").unwrap();
        assert_eq!(config, CursorsConfig::default());
        assert_eq!(config.simulation_config(), SimulationConfig::default());
        assert!(config.window_config().fullscreen);
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = CursorsConfig::from_toml(
            r#"
            [display]
            width = 800
            height = 600
            fullscreen = false

            [simulation]
            cursor_count = 25
            seed = 7
            velocity_refresh_ms = 250

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        let sim = config.simulation_config();
        assert_eq!(sim.cursor_count, 25);
        assert_eq!(sim.seed, Some(7));
        assert_eq!(sim.targets.velocity_refresh, Duration::from_millis(250));

        let window = config.window_config();
        assert!(!window.fullscreen);
        assert_eq!((window.width, window.height), (800, 600));
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(CursorsConfig::from_toml("[simulation]\ncursor_count = 0").is_err());
        assert!(CursorsConfig::from_toml("[display]\ntarget_fps = 0").is_err());
        assert!(CursorsConfig::from_toml("[display]\nwidth = 0").is_err());
        assert!(CursorsConfig::from_toml("[simulation]\nreal_smoothing = 2.0").is_err());
    }

    #[test]
    fn test_rejects_rotation_speed_past_one_turn() {
        let err = CursorsConfig::from_toml("[simulation]\nmax_rotation_speed = 900.0\nseed = 1")
            .unwrap_err();
        assert!(format!("{err:#}").contains("max_rotation_speed"));

        let config = CursorsConfig::from_toml("[simulation]\nmax_rotation_speed = 12.5").unwrap();
        assert_eq!(config.simulation_config().spawn.max_rotation_speed, 12.5);
    }

    #[test]
    fn test_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = CursorsConfig::default();
        fs::write(dir.path().join(CONFIG_FILE), config.to_toml().unwrap()).unwrap();

        assert_eq!(CursorsConfig::load_from_dir(dir.path()).unwrap(), config);
        assert!(CursorsConfig::load_from_dir(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1280x720"), Ok((1280, 720)));
        assert_eq!(parse_size("640X480"), Ok((640, 480)));
        assert!(parse_size("1280").is_err());
        assert!(parse_size("0x10").is_err());
        assert!(parse_size("ax10").is_err());
    }
}

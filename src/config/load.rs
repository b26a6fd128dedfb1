use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `SWIPETUNE__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("SWIPETUNE")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.progress.poll_interval_ms == 0 {
            return Err("progress.poll_interval_ms must be >= 1".to_string());
        }
        if !(self.carousel.pages_per_second > 0.0) {
            return Err("carousel.pages_per_second must be > 0".to_string());
        }
        if !(self.carousel.drag_fraction > 0.0 && self.carousel.drag_fraction <= 1.0) {
            return Err("carousel.drag_fraction must be in (0, 1]".to_string());
        }
        if self.catalog.manifest_name.trim().is_empty() {
            return Err("catalog.manifest_name must not be empty".to_string());
        }
        Ok(())
    }
}

/// Resolve the config path from `SWIPETUNE_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("SWIPETUNE_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/swipetune/config.toml`
/// or `~/.config/swipetune/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("swipetune").join("config.toml"))
}

/// Default log directory: `$XDG_STATE_HOME/swipetune` or `~/.local/state/swipetune`.
pub fn default_log_dir() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("swipetune"))
}

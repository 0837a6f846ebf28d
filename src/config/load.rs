use std::{env, path::PathBuf};

use super::schema::{ProgressMode, Settings};

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then lets environment
/// variables (prefix `CHORALITH__`) override it, over struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("CHORALITH")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.scan.progress == ProgressMode::Stride && self.scan.progress_stride == 0 {
            return Err("scan.progress_stride must be >= 1".to_string());
        }
        if self.display.fields.is_empty() {
            return Err("display.fields must name at least one field".to_string());
        }
        Ok(())
    }

    /// Snapshot file to use: the configured one or the XDG default.
    pub fn cache_path(&self) -> Option<PathBuf> {
        self.cache.path.clone().or_else(default_cache_path)
    }
}

/// Resolve the config path from `CHORALITH_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("CHORALITH_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(dir) = env::var_os(var) {
        Some(PathBuf::from(dir))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}

/// `$XDG_CONFIG_HOME/choralith/config.toml`, or under `~/.config` when
/// `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join("choralith").join("config.toml"))
}

/// `$XDG_CACHE_HOME/choralith/snapshots.json`, or under `~/.cache`.
pub fn default_cache_path() -> Option<PathBuf> {
    xdg_dir("XDG_CACHE_HOME", ".cache").map(|d| d.join("choralith").join("snapshots.json"))
}

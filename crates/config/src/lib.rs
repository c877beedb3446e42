use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable that overrides `[cache] dir`.
pub const CACHE_DIR_ENV: &str = "TIPLINE_CACHE_DIR";

/// Shown by `get` when no daemon has written a tip yet.
pub const DEFAULT_TIP: &str = "💡 Tip: Press Tab for suggestions";

// ── Cache ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding `current_reminder.txt` and `daemon.pid`.
    /// Empty means `~/.cache/tipline`.
    pub dir: String,
    /// Printed when the cache file does not exist.
    pub default_tip: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: String::new(),
            default_tip: DEFAULT_TIP.to_string(),
        }
    }
}

// ── Daemon ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    /// Seconds to sleep between two refresh cycles.
    pub refresh_interval_secs: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 5,
        }
    }
}

// ── Context detection ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// How many trailing shell-history lines are inspected.
    pub history_lines: usize,
    /// Shell name used to pick the history file.  Empty means `$SHELL`.
    pub shell: String,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            history_lines: 20,
            shell: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// `tracing` filter used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub cache: CacheConfig,
    pub daemon: DaemonConfig,
    pub context: ContextConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// `~/.config/tipline/config.toml`, or a relative `config.toml` when the
    /// platform has no config directory.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("tipline").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Self::default();
        if let Ok(raw) = fs::read_to_string(path) {
            config = toml::from_str(&raw)
                .with_context(|| format!("parse config {}", path.display()))?;
        }

        config.apply_env_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    /// Apply environment overrides through `lookup` so callers (and tests)
    /// control where values come from.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(CACHE_DIR_ENV) {
            if !dir.trim().is_empty() {
                self.cache.dir = dir;
            }
        }
    }

    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let rendered = toml::to_string_pretty(self)?;
        fs::write(path, rendered)?;
        Ok(())
    }

    /// Resolved cache directory.  Falls back to `~/.cache/tipline`, and to a
    /// relative `.cache/tipline` when no home directory is known.
    pub fn cache_dir(&self) -> PathBuf {
        if !self.cache.dir.trim().is_empty() {
            return expand_home(self.cache.dir.trim());
        }
        dirs::home_dir()
            .unwrap_or_default()
            .join(".cache")
            .join("tipline")
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.daemon.refresh_interval_secs.max(1))
    }

    /// Shell name for history lookup: the configured value or `$SHELL`.
    pub fn shell(&self) -> String {
        if !self.context.shell.trim().is_empty() {
            return self.context.shell.clone();
        }
        env::var("SHELL").unwrap_or_default()
    }
}

fn expand_home(raw: &str) -> PathBuf {
    if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

// ── Tests ────────────────────────────────────────────────────────────────────

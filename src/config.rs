//! User configuration
//!
//! Read from `<config dir>/newtab/config.toml` (XDG on Linux), or from the
//! path in `NEWTAB_CONFIG_PATH`. Every key can also be set through an
//! environment variable named `NEWTAB_<KEY>`, e.g. `NEWTAB_IPC_TOOL=qdbus6`.
//!
//! ```toml
//! emulator = "konsole"
//! ipc-tool = "qdbus"
//! service = "org.kde.konsole"
//! state-dir = "/run/user/1000"
//! fallback-grace-secs = 10
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use etcetera::base_strategy::{BaseStrategy, choose_base_strategy};
use serde::{Deserialize, Serialize};

/// Environment variable pointing at an alternate config file.
pub const CONFIG_PATH_ENV_VAR: &str = "NEWTAB_CONFIG_PATH";

const DEFAULT_EMULATOR: &str = "konsole";
const DEFAULT_IPC_TOOL: &str = "qdbus";
const DEFAULT_SERVICE: &str = "org.kde.konsole";
const DEFAULT_GRACE_SECS: u64 = 10;
/// Launcher and tab shell must agree on this path without sharing an
/// environment, so it ignores `TMPDIR`.
const DEFAULT_STATE_DIR: &str = "/tmp";

/// Config file contents. Unset keys fall back to defaults via the accessors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Terminal emulator binary spawned on the fallback path
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emulator: Option<String>,
    /// D-Bus command line tool used for window IPC
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipc_tool: Option<String>,
    /// D-Bus service name of the emulator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    /// Directory for pending, claimed and launcher files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,
    /// Seconds before a fallback launcher script is deleted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_grace_secs: Option<u64>,
}

impl Config {
    /// Load the config file and apply `NEWTAB_*` environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();
        let mut config = match &path {
            Some(path) => Self::load_from(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the launcher and the hook disagree.
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(dir) = &self.state_dir
            && !dir.is_absolute()
        {
            anyhow::bail!("state-dir must be an absolute path, got {}", dir.display());
        }
        Ok(())
    }

    /// Load from a specific file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config file {}", path.display()));
            }
        };
        toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Override fields from environment variables.
    ///
    /// `lookup` abstracts the environment so tests need not mutate the process env.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(value) = lookup("NEWTAB_EMULATOR") {
            self.emulator = Some(value);
        }
        if let Some(value) = lookup("NEWTAB_IPC_TOOL") {
            self.ipc_tool = Some(value);
        }
        if let Some(value) = lookup("NEWTAB_SERVICE") {
            self.service = Some(value);
        }
        if let Some(value) = lookup("NEWTAB_STATE_DIR") {
            self.state_dir = Some(PathBuf::from(value));
        }
        if let Some(value) = lookup("NEWTAB_FALLBACK_GRACE_SECS") {
            let secs = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid NEWTAB_FALLBACK_GRACE_SECS: {value}"))?;
            self.fallback_grace_secs = Some(secs);
        }
        if self.service.is_none()
            && let Some(value) = lookup("KONSOLE_DBUS_SERVICE")
        {
            self.service = Some(value);
        }
        Ok(())
    }

    pub fn emulator(&self) -> &str {
        self.emulator.as_deref().unwrap_or(DEFAULT_EMULATOR)
    }

    pub fn ipc_tool(&self) -> &str {
        self.ipc_tool.as_deref().unwrap_or(DEFAULT_IPC_TOOL)
    }

    pub fn service(&self) -> &str {
        self.service.as_deref().unwrap_or(DEFAULT_SERVICE)
    }

    pub fn state_dir(&self) -> PathBuf {
        self.state_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR))
    }

    pub fn fallback_grace(&self) -> Duration {
        Duration::from_secs(self.fallback_grace_secs.unwrap_or(DEFAULT_GRACE_SECS))
    }

    /// All keys with defaults filled in, for `config show`.
    pub fn resolved(&self) -> Self {
        Self {
            emulator: Some(self.emulator().to_string()),
            ipc_tool: Some(self.ipc_tool().to_string()),
            service: Some(self.service().to_string()),
            state_dir: Some(self.state_dir()),
            fallback_grace_secs: Some(self.fallback_grace().as_secs()),
        }
    }
}

/// Path of the user config file, honoring `NEWTAB_CONFIG_PATH`.
pub fn config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV_VAR) {
        return Some(PathBuf::from(path));
    }
    let strategy = choose_base_strategy().ok()?;
    Some(strategy.config_dir().join("newtab").join("config.toml"))
}

//! User settings read from `config.toml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use podscope_api::Credentials;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub ui: UiSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Per-request timeout; unset means requests may take as long as they need
    pub timeout_secs: Option<u64>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            username: None,
            password: None,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    pub tick_rate_ms: u64,
    /// How long "Copied!" and similar messages stay visible
    pub flash_ms: u64,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            flash_ms: 2000,
        }
    }
}

impl Settings {
    /// `$CONFIG_DIR/podscope/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("podscope").join("config.toml"))
    }

    /// Load settings from `path`, or from the default location.
    ///
    /// A missing file yields the defaults; an explicitly named file must exist.
    /// The result is not validated, so command line overrides can complete it
    /// before [`Settings::validate`] runs.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match Self::default_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        if !explicit && !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&s).with_context(|| format!("Invalid config file {}", path.display()))
    }

    fn parse(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Parse and validate settings from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let settings = Self::parse(s)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(!self.server.url.trim().is_empty(), "server.url must be non-empty");
        anyhow::ensure!(
            self.server.password.is_none() || self.server.username.is_some(),
            "server.password is set but server.username is missing"
        );
        anyhow::ensure!(
            self.server.timeout_secs != Some(0),
            "server.timeout_secs must be > 0 when set"
        );
        anyhow::ensure!(
            self.ui.tick_rate_ms > 0,
            "ui.tick_rate_ms must be > 0, got {}",
            self.ui.tick_rate_ms
        );
        anyhow::ensure!(
            self.ui.flash_ms > 0,
            "ui.flash_ms must be > 0, got {}",
            self.ui.flash_ms
        );
        Ok(())
    }

    /// Basic auth credentials, if a username is configured
    pub fn credentials(&self) -> Option<Credentials> {
        self.server.username.as_ref().map(|username| {
            Credentials::new(username.clone(), self.server.password.clone().unwrap_or_default())
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.server.timeout_secs.map(Duration::from_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.ui.tick_rate_ms)
    }

    pub fn flash_duration(&self) -> Duration {
        Duration::from_millis(self.ui.flash_ms)
    }
}

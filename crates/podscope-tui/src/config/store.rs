//! Persisted context selection
//!
//! The last selected context survives restarts in a small TOML state file.
//! Storage failures are logged and otherwise ignored; the UI keeps working
//! without persistence.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize, Serialize)]
struct StoredState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected_context: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ContextStore {
    path: Option<PathBuf>,
}

impl ContextStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// `$DATA_LOCAL_DIR/podscope/state.toml`, or a disabled store when the
    /// platform has no data directory
    pub fn default_location() -> Self {
        match dirs::data_local_dir() {
            Some(dir) => Self::new(dir.join("podscope").join("state.toml")),
            None => {
                tracing::warn!("No data directory, context selection will not be saved");
                Self::disabled()
            }
        }
    }

    /// A store that remembers nothing
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Saved context, if any
    pub fn load(&self) -> Option<String> {
        let path = self.path.as_ref()?;
        match read_state(path) {
            Ok(state) => state.selected_context.filter(|c| !c.is_empty()),
            Err(e) => {
                tracing::warn!("Failed to read saved context: {:#}", e);
                None
            }
        }
    }

    pub fn save(&self, context: &str) {
        self.write(StoredState {
            selected_context: Some(context.to_string()),
        });
    }

    /// Forget the saved context
    pub fn clear(&self) {
        self.write(StoredState::default());
    }

    fn write(&self, state: StoredState) {
        let Some(path) = &self.path else {
            return;
        };
        if let Err(e) = write_state(path, &state) {
            tracing::warn!("Failed to save context selection: {:#}", e);
        }
    }
}

fn read_state(path: &Path) -> anyhow::Result<StoredState> {
    if !path.exists() {
        return Ok(StoredState::default());
    }
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parsing {}", path.display()))
}

fn write_state(path: &Path, state: &StoredState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    let s = toml::to_string(state)?;
    std::fs::write(path, s).with_context(|| format!("writing {}", path.display()))
}

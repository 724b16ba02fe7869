use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IoContext, Result};

/// Whether the environment is owned by stackup or supplied by the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenvMode {
    New,
    Existing,
}

impl fmt::Display for VenvMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VenvMode::New => f.write_str("new"),
            VenvMode::Existing => f.write_str("existing"),
        }
    }
}

/// The saved environment choice (`install.toml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallConfig {
    pub mode: VenvMode,
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configured_at: Option<String>,
}

/// Why a saved config was not used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadIssue {
    Unreadable(String),
    Malformed(String),
    EmptyPath,
}

impl fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadIssue::Unreadable(err) => write!(f, "could not be read ({err})"),
            LoadIssue::Malformed(err) => write!(f, "is not valid ({err})"),
            LoadIssue::EmptyPath => f.write_str("has an empty path"),
        }
    }
}

impl InstallConfig {
    pub fn new(mode: VenvMode, path: PathBuf) -> Self {
        Self {
            mode,
            path,
            configured_at: Some(chrono::Utc::now().to_rfc3339()),
        }
    }

    /// Load a saved choice
    ///
    /// `Ok(None)` when no file exists. A file that can't be used yields
    /// `Err(issue)` so the caller can warn and fall back to prompting.
    pub fn load(path: &Path) -> std::result::Result<Option<Self>, LoadIssue> {
        if !path.exists() {
            return Ok(None);
        }

        let contents =
            fs::read_to_string(path).map_err(|err| LoadIssue::Unreadable(err.to_string()))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|err| LoadIssue::Malformed(err.message().to_string()))?;

        if config.path.as_os_str().is_empty() {
            return Err(LoadIssue::EmptyPath);
        }
        Ok(Some(config))
    }

    /// Save, replacing any previous choice
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .io_context(|| format!("Failed to create config directory {}", parent.display()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)
            .io_context(|| format!("Failed to write install config {}", path.display()))
    }
}

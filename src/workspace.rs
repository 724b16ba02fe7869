use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::catalog::RepoSpec;
use crate::error::{Error, IoContext, Result};

/// Workspace path types
#[derive(Debug, Clone, Copy)]
pub enum WorkspacePath {
    /// Installation root: $STACKUP_ROOT or $XDG_DATA_HOME/stackup
    Root,
    /// Persisted environment choice: root/install.toml
    InstallConfig,
    /// Default virtual environment: root/.venv
    DefaultVenv,
}

/// Workspace - the installation root
///
/// Everything the bootstrapper creates lives under this directory: one
/// checkout per repository, the saved install config, and optionally the
/// virtual environment. Shell startup files are the only state outside it.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Workspace rooted at an explicit directory
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve the installation root from the environment
    ///
    /// - `$STACKUP_ROOT` if set
    /// - `$XDG_DATA_HOME/stackup`
    /// - `~/.local/share/stackup`
    ///
    /// Empty variables count as unset. A relative root is resolved against
    /// the current directory.
    pub fn from_env() -> Result<Self> {
        let root = match env::var_os("STACKUP_ROOT").filter(|v| !v.is_empty()) {
            Some(root) => PathBuf::from(root),
            None => {
                let base = match env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
                    Some(dir) => PathBuf::from(dir),
                    None => home_dir()?.join(".local/share"),
                };
                base.join("stackup")
            }
        };

        Ok(Self::at(absolute(&root)?))
    }

    /// Get path for a specific workspace location
    pub fn path(&self, path_type: WorkspacePath) -> PathBuf {
        match path_type {
            WorkspacePath::Root => self.root.clone(),
            WorkspacePath::InstallConfig => self.root.join("install.toml"),
            WorkspacePath::DefaultVenv => self.root.join(".venv"),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Checkout directory for a repository
    pub fn repo_dir(&self, repo: RepoSpec) -> PathBuf {
        self.root.join(repo.name)
    }

    /// Create the root if needed; never removes anything
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .io_context(|| format!("Failed to create installation root {}", self.root.display()))
    }
}

/// Process environment consumed by the pipeline
///
/// Captured once in `main` so the stages never read ambient state and tests
/// can describe a host without touching the real environment.
#[derive(Debug, Clone, Default)]
pub struct HostEnv {
    pub home: PathBuf,
    /// `$SHELL`
    pub shell: Option<String>,
    /// `$VIRTUAL_ENV`
    pub active_venv: Option<PathBuf>,
}

impl HostEnv {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            home: home_dir()?,
            shell: env::var("SHELL").ok().filter(|v| !v.is_empty()),
            active_venv: env::var_os("VIRTUAL_ENV")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        })
    }
}

/// Resolve `path` against the current directory without touching the filesystem
pub fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path)
        .io_context(|| format!("Failed to resolve {} to an absolute path", path.display()))
}

/// Get the home directory
pub fn home_dir() -> Result<PathBuf> {
    directories::BaseDirs::new()
        .map(|bd| bd.home_dir().to_path_buf())
        .ok_or(Error::NoHomeDir)
}

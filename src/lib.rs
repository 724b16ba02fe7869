// Public API
pub mod bootstrap;
pub mod catalog;
pub mod cli;
pub mod prompt;
pub mod runner;
pub mod ui;

// Pipeline stages
pub mod install_config;
pub mod installer;
pub mod link;
pub mod preflight;
pub mod repos;
pub mod shell;
pub mod venv;

mod error;
mod workspace;

// Re-export main types
pub use bootstrap::{Context, RunReport, ShellSetup};
pub use error::{Error, Result};
pub use install_config::{InstallConfig, VenvMode};
pub use workspace::{HostEnv, Workspace, WorkspacePath};

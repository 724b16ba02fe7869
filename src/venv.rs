//! Virtual environment layout and selection.
//!
//! Selection is a small state machine: a saved choice in `install.toml`
//! wins; otherwise the user is asked (or, without a terminal, the default
//! new environment is chosen) and the answer is saved for next time.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::install_config::{InstallConfig, VenvMode};
use crate::prompt::Prompter;
use crate::ui;
use crate::workspace::{absolute, HostEnv, Workspace, WorkspacePath};

const INTERPRETERS: [&str; 2] = ["bin/python", "Scripts/python.exe"];
const INSTALLERS: [&str; 2] = ["bin/pip", "Scripts/pip.exe"];

/// Interpreter inside a venv, whichever platform layout it uses
pub fn interpreter(venv: &Path) -> Option<PathBuf> {
    first_existing(venv, &INTERPRETERS)
}

/// `pip` inside a venv, whichever platform layout it uses
pub fn pip(venv: &Path) -> Option<PathBuf> {
    first_existing(venv, &INSTALLERS)
}

/// Directory to put on PATH for this venv
pub fn bin_dir(venv: &Path) -> PathBuf {
    if venv.join("Scripts/python.exe").exists() && !venv.join("bin").exists() {
        venv.join("Scripts")
    } else {
        venv.join("bin")
    }
}

fn first_existing(venv: &Path, candidates: &[&str]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|rel| venv.join(rel))
        .find(|path| path.exists())
}

/// Progress of the selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorState {
    Unconfigured,
    Prompting,
    Configured(InstallConfig),
}

/// Decide which environment to install into
pub fn select(
    workspace: &Workspace,
    host: &HostEnv,
    prompter: &mut dyn Prompter,
) -> Result<InstallConfig> {
    let mut state = SelectorState::Unconfigured;
    loop {
        state = match state {
            SelectorState::Unconfigured => load_saved(workspace),
            SelectorState::Prompting => {
                let config = prompt_for_choice(workspace, host, prompter)?;
                config.save(&workspace.path(WorkspacePath::InstallConfig))?;
                tracing::debug!(
                    mode = %config.mode,
                    path = %config.path.display(),
                    "saved environment choice"
                );
                SelectorState::Configured(config)
            }
            SelectorState::Configured(config) => return Ok(config),
        };
    }
}

fn load_saved(workspace: &Workspace) -> SelectorState {
    let path = workspace.path(WorkspacePath::InstallConfig);
    match InstallConfig::load(&path) {
        Ok(Some(config)) => {
            ui::info(format!(
                "Using saved {} environment {}",
                config.mode,
                config.path.display()
            ));
            SelectorState::Configured(config)
        }
        Ok(None) => SelectorState::Prompting,
        Err(issue) => {
            ui::warn(format!("Ignoring {}: file {issue}", path.display()));
            SelectorState::Prompting
        }
    }
}

fn prompt_for_choice(
    workspace: &Workspace,
    host: &HostEnv,
    prompter: &mut dyn Prompter,
) -> Result<InstallConfig> {
    let default_path = workspace.path(WorkspacePath::DefaultVenv);

    if !prompter.is_interactive() {
        tracing::debug!("stdin is not a terminal; creating a new environment");
        return Ok(InstallConfig::new(VenvMode::New, default_path));
    }

    let new_choice = format!("Create a new environment at {}", default_path.display());
    let answer = prompter.ask_choice(
        "Which Python environment should stackup install into?",
        &[new_choice.as_str(), "Use an existing environment"],
    )?;

    match answer.trim() {
        "" | "1" => Ok(InstallConfig::new(VenvMode::New, default_path)),
        "2" => {
            let path = existing_environment(host, prompter)?;
            Ok(InstallConfig::new(VenvMode::Existing, path))
        }
        other => Err(Error::InvalidChoice(other.to_string())),
    }
}

fn existing_environment(host: &HostEnv, prompter: &mut dyn Prompter) -> Result<PathBuf> {
    if let Some(active) = &host.active_venv {
        let reuse = prompter.confirm(
            &format!("Use the active environment {}?", active.display()),
            true,
        )?;
        if reuse {
            return validate_environment(active.clone());
        }
    }

    let answer = prompter.ask_path("Path to the existing environment")?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(Error::EmptyEnvPath);
    }
    validate_environment(expand_home(answer, &host.home))
}

/// Expand a leading `~` against `home`
pub fn expand_home(input: &str, home: &Path) -> PathBuf {
    let expanded = shellexpand::tilde_with_context(input, || home.to_str());
    PathBuf::from(expanded.into_owned())
}

/// Accept `path` only if it holds an interpreter; the result is absolute
fn validate_environment(path: PathBuf) -> Result<PathBuf> {
    let path = absolute(&path)?;
    if interpreter(&path).is_some() {
        Ok(path)
    } else {
        Err(Error::InvalidEnvironment(path))
    }
}

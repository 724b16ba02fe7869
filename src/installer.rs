use std::path::{Path, PathBuf};

use crate::catalog::{RepoSpec, PRETEND_VERSION, PRETEND_VERSION_VAR};
use crate::error::{Error, Result};
use crate::install_config::{InstallConfig, VenvMode};
use crate::preflight::Python;
use crate::runner::{CommandRunner, Invocation};
use crate::ui::{self, Progress};
use crate::venv;
use crate::workspace::Workspace;

/// Create the environment when stackup owns it and it doesn't exist yet
///
/// Returns `true` if a venv was created by this call.
pub fn ensure_venv(
    config: &InstallConfig,
    python: &Python,
    runner: &dyn CommandRunner,
) -> Result<bool> {
    if config.mode != VenvMode::New || config.path.is_dir() {
        tracing::debug!(
            path = %config.path.display(),
            mode = %config.mode,
            "venv creation not needed"
        );
        return Ok(false);
    }

    let progress = Progress::new(
        "Creating",
        format!(
            "virtual environment {} (Python {})",
            config.path.display(),
            python.version()
        ),
    );
    let invocation = Invocation::new(&python.program)
        .arg("-m")
        .arg("venv")
        .path_arg(&config.path);

    let detail = match runner.run(&invocation) {
        Ok(output) if output.success() => {
            progress.success("Created", None);
            return Ok(true);
        }
        Ok(output) => output.failure_detail(),
        Err(err) => err.to_string(),
    };

    progress.fail("Failed", &detail);
    Err(Error::VenvCreateFailed {
        path: config.path.clone(),
        detail,
    })
}

/// `pip install -e` every package in order; the first failure stops the rest
pub fn install_packages(
    workspace: &Workspace,
    venv_path: &Path,
    packages: &[RepoSpec],
    runner: &dyn CommandRunner,
) -> Result<()> {
    let pip = venv::pip(venv_path).ok_or_else(|| Error::PipNotFound(venv_path.to_path_buf()))?;
    tracing::debug!(pip = %pip.display(), "using installer");

    for package in packages {
        install_one(&pip, &requirement(workspace, *package), *package, runner)?;
    }

    ui::success("Installed", format!("{} packages into {}", packages.len(), venv_path.display()));
    Ok(())
}

/// Editable requirement for a checkout, with its extra if it has one
fn requirement(workspace: &Workspace, package: RepoSpec) -> PathBuf {
    let dir = workspace.repo_dir(package);
    match package.extra {
        Some(extra) => {
            let mut spec = dir.into_os_string();
            spec.push(format!("[{extra}]"));
            PathBuf::from(spec)
        }
        None => dir,
    }
}

fn install_one(
    pip: &Path,
    requirement: &Path,
    package: RepoSpec,
    runner: &dyn CommandRunner,
) -> Result<()> {
    let progress = Progress::new("Installing", package.name);
    let invocation = Invocation::new(pip.as_os_str())
        .arg("install")
        .arg("-e")
        .path_arg(requirement)
        .env(PRETEND_VERSION_VAR, PRETEND_VERSION);

    let detail = match runner.run(&invocation) {
        Ok(output) if output.success() => {
            progress.success("Installed", None);
            return Ok(());
        }
        Ok(output) => output.failure_detail(),
        Err(err) => err.to_string(),
    };

    progress.fail("Failed", &detail);
    Err(Error::InstallFailed {
        package: package.name.to_string(),
        detail,
    })
}

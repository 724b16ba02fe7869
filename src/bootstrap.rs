//! The provisioning pipeline.
//!
//! Each stage only runs once the previous one succeeded. Every stage checks
//! existing state first, so running the whole pipeline again converges
//! instead of redoing work.

use crate::catalog::{Transport, DEPENDENCY_LINK, INSTALL_ORDER, REPOSITORIES};
use crate::error::Result;
use crate::install_config::InstallConfig;
use crate::installer;
use crate::link::{self, LinkOutcome};
use crate::preflight;
use crate::prompt::Prompter;
use crate::repos::{self, SyncOutcome};
use crate::runner::CommandRunner;
use crate::shell::{self, RcOutcome, Shell};
use crate::ui;
use crate::venv;
use crate::workspace::{HostEnv, Workspace};

/// Everything a run needs, threaded through the stages
pub struct Context<'a> {
    pub workspace: &'a Workspace,
    pub host: &'a HostEnv,
    pub transport: Transport,
    pub runner: &'a dyn CommandRunner,
}

/// Outcome of shell integration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellSetup {
    /// No venv was created in this run
    Skipped,
    /// `$SHELL` was unset or unrecognised
    UnknownShell(Option<String>),
    Configured { shell: Shell, files: Vec<RcOutcome> },
}

impl ShellSetup {
    /// True when any startup file was changed
    pub fn changed_path(&self) -> bool {
        match self {
            ShellSetup::Configured { files, .. } => files
                .iter()
                .any(|outcome| matches!(outcome, RcOutcome::Updated(_))),
            _ => false,
        }
    }
}

/// What a successful run did
#[derive(Debug, Clone)]
pub struct RunReport {
    pub python: preflight::Python,
    pub repositories: Vec<(&'static str, SyncOutcome)>,
    pub link: LinkOutcome,
    pub environment: InstallConfig,
    pub created_venv: bool,
    pub shell: ShellSetup,
}

impl RunReport {
    /// Repositories whose fast-forward was refused
    pub fn diverged(&self) -> impl Iterator<Item = &str> {
        self.repositories
            .iter()
            .filter(|(_, outcome)| matches!(outcome, SyncOutcome::Diverged(_)))
            .map(|(name, _)| *name)
    }
}

/// Run the whole pipeline
pub fn run(ctx: &Context<'_>, prompter: &mut dyn Prompter) -> Result<RunReport> {
    let git = preflight::check_git(ctx.runner)?;
    tracing::debug!(%git, "git available");
    let python = preflight::find_python(ctx.runner)?;
    ui::info(format!("Using {} (Python {})", python.program, python.version()));

    ctx.workspace.ensure()?;

    let repositories = repos::sync_all(ctx.workspace, &REPOSITORIES, ctx.transport, ctx.runner)?
        .into_iter()
        .map(|(repo, outcome)| (repo.name, outcome))
        .collect();

    let link = link::ensure_link(ctx.workspace, DEPENDENCY_LINK)?;
    if link == LinkOutcome::Created {
        ui::success(
            "Linked",
            format!(
                "{}/{}/{} -> {}",
                DEPENDENCY_LINK.owner.name,
                DEPENDENCY_LINK.dir,
                DEPENDENCY_LINK.target.name,
                ctx.workspace.repo_dir(DEPENDENCY_LINK.target).display()
            ),
        );
    }

    let environment = venv::select(ctx.workspace, ctx.host, prompter)?;
    let created_venv = installer::ensure_venv(&environment, &python, ctx.runner)?;
    installer::install_packages(ctx.workspace, &environment.path, &INSTALL_ORDER, ctx.runner)?;

    let shell = if created_venv {
        setup_shell(ctx.host, &environment)?
    } else {
        ShellSetup::Skipped
    };

    Ok(RunReport {
        python,
        repositories,
        link,
        environment,
        created_venv,
        shell,
    })
}

fn setup_shell(host: &HostEnv, environment: &InstallConfig) -> Result<ShellSetup> {
    let bin_dir = venv::bin_dir(&environment.path);

    let Some(shell) = Shell::detect(host.shell.as_deref()) else {
        ui::warn(format!(
            "Unrecognised shell {}; add this to your shell startup file:\n  export PATH=\"{}:$PATH\"",
            host.shell.as_deref().unwrap_or("(SHELL not set)"),
            bin_dir.display()
        ));
        return Ok(ShellSetup::UnknownShell(host.shell.clone()));
    };

    let files = shell::configure(shell, &host.home, &bin_dir)?;
    for outcome in &files {
        if let RcOutcome::Updated(path) = outcome {
            ui::success(
                "Updated",
                format!("{} to add {} to PATH", path.display(), bin_dir.display()),
            );
        }
    }

    Ok(ShellSetup::Configured { shell, files })
}

/// Closing summary printed by the binary
pub fn print_summary(report: &RunReport) {
    let diverged: Vec<_> = report.diverged().collect();
    if !diverged.is_empty() {
        ui::warn(format!(
            "Not updated (local changes or diverged history): {}",
            diverged.join(", ")
        ));
    }

    ui::success(
        "Finished",
        format!(
            "stackup is installed into {} environment {}",
            report.environment.mode,
            report.environment.path.display()
        ),
    );

    if report.shell.changed_path() {
        ui::info("Run 'exec $SHELL' to reload your shell.");
    }
}

use std::path::Path;

use crate::catalog::{RepoSpec, Transport};
use crate::error::{Error, Result};
use crate::runner::{CommandRunner, Invocation};
use crate::ui::Progress;
use crate::workspace::Workspace;

/// What happened to one repository during synchronization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Cloned,
    Updated,
    /// Fast-forward was refused; the checkout was left as is
    Diverged(String),
}

/// A checkout counts as present once its `.git` marker exists
pub fn is_present(dir: &Path) -> bool {
    dir.join(".git").exists()
}

/// Clone or fast-forward every repository, in order
///
/// Stops at the first failed clone; a refused fast-forward only warns.
pub fn sync_all(
    workspace: &Workspace,
    repos: &[RepoSpec],
    transport: Transport,
    runner: &dyn CommandRunner,
) -> Result<Vec<(RepoSpec, SyncOutcome)>> {
    let mut outcomes = Vec::with_capacity(repos.len());
    for repo in repos {
        let outcome = sync_repo(workspace, *repo, transport, runner)?;
        outcomes.push((*repo, outcome));
    }
    Ok(outcomes)
}

pub fn sync_repo(
    workspace: &Workspace,
    repo: RepoSpec,
    transport: Transport,
    runner: &dyn CommandRunner,
) -> Result<SyncOutcome> {
    let dir = workspace.repo_dir(repo);
    if is_present(&dir) {
        Ok(update(repo, &dir, runner))
    } else {
        clone(repo, &dir, transport, runner).map(|_| SyncOutcome::Cloned)
    }
}

fn update(repo: RepoSpec, dir: &Path, runner: &dyn CommandRunner) -> SyncOutcome {
    let progress = Progress::new("Updating", repo.name);
    let invocation = Invocation::new("git")
        .arg("-C")
        .path_arg(dir)
        .arg("pull")
        .arg("--ff-only");

    let reason = match runner.run(&invocation) {
        Ok(output) if output.success() => {
            progress.success("Updated", describe_head(dir));
            return SyncOutcome::Updated;
        }
        Ok(output) => output.failure_detail(),
        Err(err) => err.to_string(),
    };

    tracing::warn!(repo = repo.name, %reason, "fast-forward refused");
    progress.warn(
        "Skipped",
        format!("could not fast-forward ({reason}); local changes left untouched"),
    );
    SyncOutcome::Diverged(reason)
}

fn clone(
    repo: RepoSpec,
    dir: &Path,
    transport: Transport,
    runner: &dyn CommandRunner,
) -> Result<()> {
    let url = transport.remote_url(repo.name);
    let progress = Progress::new("Cloning", format!("{} from {url}", repo.name));
    let invocation = Invocation::new("git").arg("clone").arg(&url).path_arg(dir);

    let detail = match runner.run(&invocation) {
        Ok(output) if output.success() => {
            progress.success("Cloned", describe_head(dir));
            return Ok(());
        }
        Ok(output) => output.failure_detail(),
        Err(err) => err.to_string(),
    };

    progress.fail("Failed", &detail);
    Err(Error::CloneFailed {
        repo: repo.name.to_string(),
        url,
        detail,
        hint: transport.access_hint(),
    })
}

/// `(main @ 1a2b3c4)` for status lines; `None` if the checkout can't be read
fn describe_head(dir: &Path) -> Option<String> {
    let repo = git2::Repository::open(dir).ok()?;
    let head = repo.head().ok()?;
    let commit = head.peel_to_commit().ok()?;
    let id = commit.id().to_string();
    let short = id.get(..7).unwrap_or(&id);

    match head.shorthand() {
        Some(branch) if head.is_branch() => Some(format!("({branch} @ {short})")),
        _ => Some(format!("(detached @ {short})")),
    }
}

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::catalog::LinkSpec;
use crate::error::{Error, IoContext, Result};
use crate::workspace::{absolute, Workspace};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    Created,
    /// A symlink was already there; it is never replaced
    Present { points_to: Option<PathBuf> },
}

/// Ensure `<owner>/<dir>/<target>` is a symlink to the target checkout
pub fn ensure_link(workspace: &Workspace, spec: LinkSpec) -> Result<LinkOutcome> {
    let link_dir = workspace.repo_dir(spec.owner).join(spec.dir);
    let link_path = link_dir.join(spec.target.name);
    // A relative target would resolve from `link_dir`, not from the root
    let target = absolute(&workspace.repo_dir(spec.target))?;

    fs::create_dir_all(&link_dir)
        .io_context(|| format!("Failed to create {}", link_dir.display()))?;

    match fs::symlink_metadata(&link_path) {
        Ok(meta) if meta.file_type().is_symlink() => {
            let points_to = fs::read_link(&link_path).ok();
            if points_to.as_deref() != Some(target.as_path()) {
                // Stale links are reported, not repaired
                tracing::warn!(
                    link = %link_path.display(),
                    actual = ?points_to,
                    expected = %target.display(),
                    "dependency link points elsewhere; leaving it in place"
                );
            } else {
                tracing::debug!(link = %link_path.display(), "dependency link already present");
            }
            return Ok(LinkOutcome::Present { points_to });
        }
        Ok(_) => return Err(Error::LinkOccupied(link_path)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => {
            return Err(Error::io(
                format!("Failed to inspect {}", link_path.display()),
                err,
            ))
        }
    }

    symlink_dir(&target, &link_path).io_context(|| {
        format!(
            "Failed to link {} -> {}",
            link_path.display(),
            target.display()
        )
    })?;
    Ok(LinkOutcome::Created)
}

#[cfg(unix)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_dir(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::catalog::{CORE, DEPENDENCY_LINK};
    use serial_test::serial;
    use tempfile::TempDir;

    fn workspace_with_checkouts(temp: &TempDir) -> Workspace {
        let workspace = Workspace::at(temp.path());
        fs::create_dir_all(workspace.repo_dir(DEPENDENCY_LINK.owner)).unwrap();
        fs::create_dir_all(workspace.repo_dir(DEPENDENCY_LINK.target)).unwrap();
        fs::write(workspace.repo_dir(CORE).join("pyproject.toml"), "").unwrap();
        workspace
    }

    fn link_path(workspace: &Workspace) -> PathBuf {
        workspace
            .repo_dir(DEPENDENCY_LINK.owner)
            .join("extern")
            .join("stack-core")
    }

    #[test]
    fn test_creates_link_to_target_root() {
        let temp = TempDir::new().unwrap();
        let workspace = workspace_with_checkouts(&temp);

        let outcome = ensure_link(&workspace, DEPENDENCY_LINK).unwrap();

        assert_eq!(outcome, LinkOutcome::Created);
        let link = link_path(&workspace);
        assert_eq!(fs::read_link(&link).unwrap(), workspace.repo_dir(CORE));
        assert!(link.join("pyproject.toml").exists());
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let temp = TempDir::new().unwrap();
        let workspace = workspace_with_checkouts(&temp);

        ensure_link(&workspace, DEPENDENCY_LINK).unwrap();
        let outcome = ensure_link(&workspace, DEPENDENCY_LINK).unwrap();

        assert_eq!(
            outcome,
            LinkOutcome::Present {
                points_to: Some(workspace.repo_dir(CORE))
            }
        );
        assert_eq!(fs::read_link(link_path(&workspace)).unwrap(), workspace.repo_dir(CORE));
    }

    #[test]
    fn test_existing_link_elsewhere_is_left_alone() {
        let temp = TempDir::new().unwrap();
        let workspace = workspace_with_checkouts(&temp);
        let link = link_path(&workspace);
        fs::create_dir_all(link.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink("/nonexistent/elsewhere", &link).unwrap();

        let outcome = ensure_link(&workspace, DEPENDENCY_LINK).unwrap();

        assert_eq!(
            outcome,
            LinkOutcome::Present {
                points_to: Some(PathBuf::from("/nonexistent/elsewhere"))
            }
        );
        assert_eq!(fs::read_link(&link).unwrap(), PathBuf::from("/nonexistent/elsewhere"));
    }

    #[test]
    #[serial]
    fn test_relative_root_link_resolves() {
        let temp = TempDir::new().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(temp.path()).unwrap();

        let workspace = Workspace::at("work");
        fs::create_dir_all(workspace.repo_dir(DEPENDENCY_LINK.owner)).unwrap();
        fs::create_dir_all(workspace.repo_dir(CORE)).unwrap();
        fs::write(workspace.repo_dir(CORE).join("pyproject.toml"), "").unwrap();
        let outcome = ensure_link(&workspace, DEPENDENCY_LINK);
        let cwd = std::env::current_dir().unwrap();
        std::env::set_current_dir(original_dir).unwrap();

        assert_eq!(outcome.unwrap(), LinkOutcome::Created);
        let link = cwd.join("work/stack-compiler/extern/stack-core");
        let points_to = fs::read_link(&link).unwrap();
        assert!(points_to.is_absolute());
        assert_eq!(points_to, cwd.join("work/stack-core"));
        assert!(link.join("pyproject.toml").exists());
    }

    #[test]
    fn test_regular_directory_in_the_way_is_an_error() {
        let temp = TempDir::new().unwrap();
        let workspace = workspace_with_checkouts(&temp);
        fs::create_dir_all(link_path(&workspace)).unwrap();

        let err = ensure_link(&workspace, DEPENDENCY_LINK).unwrap_err();
        assert!(matches!(err, Error::LinkOccupied(_)));
    }
}

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{IoContext, Result};

/// Marks a block appended by stackup
pub const SENTINEL: &str = "# Added by stackup";

/// Shell families with known startup files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Zsh,
    Bash,
    Fish,
}

impl Shell {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "zsh" => Some(Shell::Zsh),
            "bash" => Some(Shell::Bash),
            "fish" => Some(Shell::Fish),
            _ => None,
        }
    }

    /// Detect from a `$SHELL` value such as `/usr/bin/zsh`
    pub fn detect(shell_var: Option<&str>) -> Option<Self> {
        let value = shell_var?;
        let name = Path::new(value).file_name()?.to_str()?;
        Self::from_name(name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Shell::Zsh => "zsh",
            Shell::Bash => "bash",
            Shell::Fish => "fish",
        }
    }

    /// Startup files to update, relative to the home directory
    pub fn startup_files(self, home: &Path) -> Vec<PathBuf> {
        match self {
            Shell::Zsh => vec![home.join(".zshrc")],
            Shell::Bash => vec![home.join(".bashrc"), home.join(".bash_profile")],
            Shell::Fish => vec![home.join(".config/fish/config.fish")],
        }
    }

    /// Statement that prepends `bin_dir` to PATH
    pub fn path_line(self, bin_dir: &Path) -> String {
        match self {
            Shell::Zsh | Shell::Bash => format!("export PATH=\"{}:$PATH\"", bin_dir.display()),
            Shell::Fish => format!("set -gx PATH {} $PATH", bin_dir.display()),
        }
    }
}

/// What happened to one startup file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RcOutcome {
    Updated(PathBuf),
    AlreadyConfigured(PathBuf),
    Missing(PathBuf),
}

/// Append the PATH block to each existing startup file that lacks it
pub fn configure(shell: Shell, home: &Path, bin_dir: &Path) -> Result<Vec<RcOutcome>> {
    let line = shell.path_line(bin_dir);
    shell
        .startup_files(home)
        .into_iter()
        .map(|rc_file| add_path_block(rc_file, &line))
        .collect()
}

/// Add the guarded block to an rc file (idempotent, never creates the file)
fn add_path_block(rc_file: PathBuf, line: &str) -> Result<RcOutcome> {
    if !rc_file.is_file() {
        tracing::debug!(file = %rc_file.display(), "startup file does not exist; skipping");
        return Ok(RcOutcome::Missing(rc_file));
    }

    let existing = fs::read_to_string(&rc_file)
        .io_context(|| format!("Failed to read {}", rc_file.display()))?;

    if existing.contains(SENTINEL) {
        tracing::debug!(file = %rc_file.display(), "PATH block already present");
        return Ok(RcOutcome::AlreadyConfigured(rc_file));
    }

    let separator = if existing.is_empty() || existing.ends_with('\n') {
        "\n"
    } else {
        "\n\n"
    };
    let block = format!("{separator}{SENTINEL}\n{line}\n");

    let mut file = OpenOptions::new()
        .append(true)
        .open(&rc_file)
        .io_context(|| format!("Failed to open {}", rc_file.display()))?;
    file.write_all(block.as_bytes())
        .io_context(|| format!("Failed to write {}", rc_file.display()))?;

    Ok(RcOutcome::Updated(rc_file))
}

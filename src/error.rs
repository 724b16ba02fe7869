use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions that abort a bootstrap run
#[derive(Debug, Error)]
pub enum Error {
    #[error("git was not found. Install git and make sure it is on your PATH.")]
    GitNotFound,

    #[error("No suitable Python interpreter found (requires Python >= 3.11, i.e. 3.x with x >= 11). Tried: {}", .tried.join(", "))]
    PythonNotFound { tried: Vec<String> },

    #[error("Failed to clone {repo} from {url}: {detail}\n{hint}")]
    CloneFailed {
        repo: String,
        url: String,
        detail: String,
        hint: &'static str,
    },

    #[error("{} exists and is not a symlink; move it aside and rerun", .0.display())]
    LinkOccupied(PathBuf),

    #[error("Invalid choice '{0}'; expected 1 or 2")]
    InvalidChoice(String),

    #[error("No environment path given")]
    EmptyEnvPath,

    #[error("{} is not a virtual environment (no bin/python or Scripts/python.exe found)", .0.display())]
    InvalidEnvironment(PathBuf),

    #[error("Failed to create virtual environment at {}: {detail}", path.display())]
    VenvCreateFailed { path: PathBuf, detail: String },

    #[error("pip not found in {} (looked for bin/pip and Scripts/pip.exe)", .0.display())]
    PipNotFound(PathBuf),

    #[error("Failed to install {package}: {detail}")]
    InstallFailed { package: String, detail: String },

    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize install config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Attach a human-readable context to raw I/O failures
pub(crate) trait IoContext<T> {
    fn io_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn io_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|source| Error::io(f(), source))
    }
}

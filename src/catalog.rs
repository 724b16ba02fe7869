//! The fixed set of repositories that make up the stackup toolchain.
//!
//! Order is significant everywhere: repositories are cloned in declaration
//! order and packages are installed in dependency order.

/// GitHub organisation hosting every repository
pub const ORG: &str = "stackup-dev";

/// Version handed to setuptools-scm while installing editable checkouts
pub const PRETEND_VERSION: &str = "0.1.0";

/// Environment variable read by setuptools-scm during `pip install`
pub const PRETEND_VERSION_VAR: &str = "SETUPTOOLS_SCM_PRETEND_VERSION";

/// How repositories are fetched from the remote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Https,
    Ssh,
}

impl Transport {
    pub fn as_str(self) -> &'static str {
        match self {
            Transport::Https => "https",
            Transport::Ssh => "ssh",
        }
    }

    /// Remote URL for a repository under [`ORG`]
    pub fn remote_url(self, repo: &str) -> String {
        match self {
            Transport::Https => format!("https://github.com/{ORG}/{repo}.git"),
            Transport::Ssh => format!("git@github.com:{ORG}/{repo}.git"),
        }
    }

    /// What to check when a clone fails
    pub fn access_hint(self) -> &'static str {
        match self {
            Transport::Https => {
                "Check your network connection and that you have access to the repository."
            }
            Transport::Ssh => {
                "Check that your SSH key is loaded and registered with GitHub, and that you have access to the repository."
            }
        }
    }
}

/// One repository of the toolchain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepoSpec {
    pub name: &'static str,
    /// Optional pip extra requested when installing this package
    pub extra: Option<&'static str>,
}

pub const CORE: RepoSpec = RepoSpec {
    name: "stack-core",
    extra: None,
};

pub const COMPILER: RepoSpec = RepoSpec {
    name: "stack-compiler",
    extra: None,
};

pub const CLI: RepoSpec = RepoSpec {
    name: "stack-cli",
    extra: Some("dev"),
};

/// Clone order
pub const REPOSITORIES: [RepoSpec; 3] = [CORE, COMPILER, CLI];

/// Install order: base library, library depending on it, top-level package
pub const INSTALL_ORDER: [RepoSpec; 3] = [CORE, COMPILER, CLI];

/// The dependency link: `<owner>/<dir>/<target>` points at `<target>`'s root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSpec {
    pub owner: RepoSpec,
    pub dir: &'static str,
    pub target: RepoSpec,
}

pub const DEPENDENCY_LINK: LinkSpec = LinkSpec {
    owner: COMPILER,
    dir: "extern",
    target: CORE,
};

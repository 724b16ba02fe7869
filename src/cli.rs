use clap::Parser;

use crate::catalog::Transport;

/// stackup - bootstrap the stackup development environment
///
/// Clones (or fast-forwards) stack-core, stack-compiler and stack-cli into
/// the installation root, links stack-core into stack-compiler, installs all
/// three into a Python virtual environment, and adds the environment to your
/// shell PATH. Safe to run repeatedly.
///
/// The installation root is $STACKUP_ROOT, or $XDG_DATA_HOME/stackup
/// (default ~/.local/share/stackup). Set STACKUP_LOG=debug for diagnostics.
#[derive(Parser, Debug, Default, PartialEq, Eq)]
#[command(author, about, long_about)]
pub struct Cli {
    /// Clone repositories over SSH instead of HTTPS
    #[arg(long)]
    pub ssh: bool,
}

impl Cli {
    pub fn transport(&self) -> Transport {
        if self.ssh {
            Transport::Ssh
        } else {
            Transport::Https
        }
    }
}

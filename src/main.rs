use anyhow::Result;
use clap::Parser;
use stackup::bootstrap::{self, Context};
use stackup::cli::Cli;
use stackup::prompt::TerminalPrompter;
use stackup::runner::SystemRunner;
use stackup::{ui, HostEnv, Workspace};

fn main() {
    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_env("STACKUP_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("stackup=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments; usage errors exit 2 with the offending argument
    let cli = Cli::parse();

    if let Err(err) = execute(&cli) {
        ui::error(format!("{err:#}"));
        std::process::exit(1);
    }
}

fn execute(cli: &Cli) -> Result<()> {
    let workspace = Workspace::from_env()?;
    let host = HostEnv::from_env()?;
    let ctx = Context {
        workspace: &workspace,
        host: &host,
        transport: cli.transport(),
        runner: &SystemRunner,
    };

    ui::status(
        "Bootstrap",
        format!(
            "{} (transport: {})",
            workspace.root().display(),
            cli.transport().as_str()
        ),
    );

    let report = bootstrap::run(&ctx, &mut TerminalPrompter::new())?;
    bootstrap::print_summary(&report);
    Ok(())
}

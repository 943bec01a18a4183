mod commands;
mod context;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blueprint-architect")]
#[command(about = "Architect the deployment lifecycle of declarative blueprints", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a blueprint document
    Validate(commands::validate::ValidateCommand),
    /// Initialize a blueprint environment
    Init(commands::init::InitCommand),
    /// Show the plugins a blueprint would install
    Requirements(commands::requirements::RequirementsCommand),
    /// Run the install workflow
    Install(commands::install::InstallCommand),
    /// Run the uninstall workflow
    Uninstall(commands::uninstall::UninstallCommand),
    /// Run a named workflow
    Execute(commands::execute::ExecuteCommand),
    /// Print declared deployment outputs
    Outputs(commands::outputs::OutputsCommand),
    /// List node instances
    Instances(commands::instances::InstancesCommand),
    /// Remove a blueprint's persisted state
    Teardown(commands::teardown::TeardownCommand),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate(cmd) => cmd.execute(),
        Commands::Init(cmd) => cmd.execute(),
        Commands::Requirements(cmd) => cmd.execute(),
        Commands::Install(cmd) => cmd.execute(),
        Commands::Uninstall(cmd) => cmd.execute(),
        Commands::Execute(cmd) => cmd.execute(),
        Commands::Outputs(cmd) => cmd.execute(),
        Commands::Instances(cmd) => cmd.execute(),
        Commands::Teardown(cmd) => cmd.execute(),
    }
}

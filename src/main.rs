use anyhow::Result;
use clap::{Parser, Subcommand};
use fxsnap::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the latest exchange rates and store them (default)
    Run,
    /// Create default configuration
    Setup,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command.unwrap_or(Commands::Run) {
        Commands::Setup => fxsnap::cli::setup::setup(),
        Commands::Run => run(cli.config_path.as_deref()).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Invocation failed");
    }
    result
}

async fn run(config_path: Option<&str>) -> Result<()> {
    let response = fxsnap::run(config_path).await?;
    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

//! # Dragline CLI
//!
//! Command-line front end for the parasite drag build-up.
//!
//! ```text
//! drag_cli init cruise.dbu --sref 174
//! drag_cli run --vehicle trainer.json --degen trainer_degen.json --study cruise.dbu --csv cruise.csv
//! drag_cli equations
//! ```

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Parasite drag build-up from the command line
#[derive(Parser)]
#[command(name = "drag_cli")]
#[command(author = "Dragline Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Parasite drag build-up: skin friction, form factor and excrescences", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a build-up and print or export the report
    Run(commands::run::RunArgs),
    /// List the available correlations
    Equations(commands::equations::EquationsArgs),
    /// Create a new study file
    Init(commands::init::InitArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Equations(args) => commands::equations::execute(args),
        Commands::Init(args) => commands::init::execute(args),
    }
}

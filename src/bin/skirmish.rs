//! skirmish CLI - train and inspect the melee target-selection controller

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "skirmish")]
#[command(version, about = "Linear Q-learning target selection for melee squads", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train the controller by replaying a recorded battle
    Train(Box<skirmish::cli::commands::train::TrainArgs>),

    /// Print stored weights with feature names
    Inspect(skirmish::cli::commands::inspect::InspectArgs),

    /// Write fresh random weights
    Init(skirmish::cli::commands::init::InitArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    skirmish::logging::init(cli.verbose);

    match cli.command {
        Commands::Train(args) => skirmish::cli::commands::train::execute(*args),
        Commands::Inspect(args) => skirmish::cli::commands::inspect::execute(args),
        Commands::Init(args) => skirmish::cli::commands::init::execute(args),
    }
}

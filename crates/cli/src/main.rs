mod commands;
mod harness;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{MapCommand, RelinkCommand, ScaleCommand};

/// Bonemap CLI - rig correspondence and rescale tool
#[derive(Debug, Parser)]
#[command(
    name = "bonemap",
    version,
    about = "Resolve bone correspondences between two rigs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build a source-to-destination correspondence map
    Map(MapCommand),
    /// Re-resolve captured bone references against a live destination rig
    Relink(RelinkCommand),
    /// Compute the size ratio between two rigs
    Scale(ScaleCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Map(cmd) => cmd.execute()?,
        Commands::Relink(cmd) => cmd.execute()?,
        Commands::Scale(cmd) => cmd.execute()?,
    };

    std::process::exit(exit_code);
}

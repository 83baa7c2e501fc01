// CLI application
use clap::Parser;
use std::path::PathBuf;

mod chooser;
mod commands;

use commands::{load_dump, print_registers, probe_dump};

#[derive(Parser)]
#[command(name = "dcload")]
#[command(about = "SEGA Dreamcast RAM dump loader")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Check whether a file is a Dreamcast RAM dump
    Probe {
        /// Path to the RAM dump
        #[arg(short, long)]
        image: PathBuf,
    },
    /// Load a RAM dump into an analysis database
    Load {
        /// Path to the RAM dump
        #[arg(short, long)]
        image: PathBuf,

        /// RAM window base (e.g. 0x8C000000); prompts when omitted
        #[arg(short, long)]
        base: Option<String>,

        /// Write the annotated memory map as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the SH7750 register reference table
    Registers,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Probe { image } => probe_dump(&image)?,
        Commands::Load {
            image,
            base,
            output,
        } => load_dump(&image, base.as_deref(), output.as_deref())?,
        Commands::Registers => print_registers(),
    }

    Ok(())
}

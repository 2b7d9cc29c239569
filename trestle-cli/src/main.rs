// trestle-cli: CLI entry point for Trestle tools (generate, check).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "trestle", about = "Trestle CLI — method bridge binding tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate TypeScript, Kotlin, and Swift bindings from a method catalog.
    Generate {
        /// Path to trestle.config.toml.
        #[arg(long, default_value = "trestle.config.toml")]
        config: PathBuf,
    },
    /// Validate a method catalog without writing any output.
    Check {
        /// Path to trestle.config.toml.
        #[arg(long, default_value = "trestle.config.toml")]
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate { config } => trestle_codegen::run_generate(&config),
        Commands::Check { config } => trestle_codegen::run_check(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

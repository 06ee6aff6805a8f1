//! coursegen CLI - learning-document generator.
//!
//! Provides commands for:
//! - `generate`: Render one spec file or a directory of specs
//! - `validate`: Pre-flight check a directory of specs without rendering
//! - `engines`: List registered engines and their component sets

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{EnginesArgs, GenerateArgs, ValidateArgs};
use output::Output;

/// coursegen - learning-document generator.
#[derive(Parser)]
#[command(name = "coursegen", version, about)]
struct Cli {
    /// Enable verbose logging (INFO level).
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a spec file or a directory of specs.
    Generate(GenerateArgs),
    /// Validate a directory of specs without rendering.
    Validate(ValidateArgs),
    /// List registered engines.
    Engines(EnginesArgs),
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Generate(args) => args.execute(&output),
        Commands::Validate(args) => args.execute(&output),
        Commands::Engines(args) => args.execute(&output),
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            output.error(&format!("Error: {err}"));
            std::process::ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}

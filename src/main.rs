use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use alp_ga::error::ShellError;
use alp_ga::generate::AlpGenerator;
use alp_ga::resolution::Solve;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct AlpTools {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Writes a random single runway instance
    Generate(AlpGenerator),
    /// Runs the genetic algorithm on an instance
    Solve(Solve)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = AlpTools::parse();
    let result: Result<(), ShellError> = match cli.command {
        Command::Generate(generate) => generate.generate().map_err(ShellError::from),
        Command::Solve(solve) => solve.solve().map(|_| ())
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod commands;

/// Generate typed IAM statement providers from AWS service authorization catalogs.
#[derive(Parser, Debug)]
#[command(name = "iam-policy-builder", version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one Rust module per service catalog plus a mod.rs index
    Generate(commands::generate::GenerateArgs),
    /// Print the normalized metadata of a single catalog as JSON
    Inspect(commands::inspect::InspectArgs),
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    log::debug!("{cli:?}");

    let result = match &cli.command {
        Command::Generate(args) => commands::generate::run(args),
        Command::Inspect(args) => commands::inspect::run(args),
    };

    match result {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

//! `pbo`: load pseudo-boolean models, print canonical forms, brute-force them.

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use tracing::Level;

use crate::commands::{convert, solve};
use crate::config::{PboConfig, DEFAULT_CONFIG_FILE};

#[derive(Parser, Debug)]
#[command(name = "pbo", version, about = "Pseudo-boolean and Ising polynomial toolkit")]
struct Cli {
    /// Config file (defaults to ./pbo_config.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// More logging on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a model as a QUBO, Ising, PUBO or higher-order Ising polynomial
    Convert(convert::ConvertArgs),
    /// Find the minimizing assignment(s) by exhaustive search
    Solve(solve::SolveArgs),
    /// Write the effective configuration to the config path
    InitConfig,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = PboConfig::load(cli.config.as_deref());
    match cli.command {
        Command::Convert(args) => convert::run(args, &config),
        Command::Solve(args) => solve::run(args, &config),
        Command::InitConfig => {
            let path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
            config
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

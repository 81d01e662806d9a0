//! modbump CLI - bump Go module dependencies in go.mod.

mod commands;
mod display;

use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "modbump")]
#[command(version, about = "Bump Go module dependencies through the go toolchain", long_about = None)]
struct Cli {
    #[command(flatten)]
    bump: commands::BumpArgs,

    /// Verbose output (-v for debug, -vv for trace)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .without_time()
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    commands::handle_bump(cli.bump)
}

//! lacam — command-line front end for the lacam-rs planner.
//!
//! ```text
//! lacam solve    -m random-32-32-10.map -i random-32-32-10-random-1.scen -N 50
//! lacam lifelong -m warehouse.map --cache lru --ngoals 1000 --nagents 20
//! ```

// The explored set allocates many small configuration vectors.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod commands;

use anyhow::Result;
use clap::Parser;

use commands::Command;

#[derive(Parser, Debug)]
#[command(name = "lacam", version, about = "Multi-agent path finding with LaCAM and PIBT")]
struct Cli {
    /// Increase log output (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    cli.command.run()
}

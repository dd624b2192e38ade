mod error;
mod files;
mod process;
mod push_counts;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub use error::Error;

#[derive(Debug, Parser)]
#[command(name = "hubstats")]
#[command(about = "Turn GitHub public timeline entries into encoded event lines")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate, encode and de-duplicate feed entries.
    Process(process::Args),
    /// Count distinct push events per repository.
    PushCounts(push_counts::Args),
}

// Logs go to stderr; stdout may carry the encoded output.
fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Error> {
    setup_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Process(args) => process::run(args).map(|_| ()),
        Command::PushCounts(args) => push_counts::run(args),
    }
}

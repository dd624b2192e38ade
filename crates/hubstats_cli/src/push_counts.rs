use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use hubstats::{Dispatcher, EventTypeRegistry, FeedEntry, Grammar, PushTally};
use tracing::info;

use crate::error::Error;
use crate::files::{feed_lines, open_input, open_output, unreadable_line};

#[derive(Debug, Parser)]
pub struct Args {
    /// Tab-separated `identifier, published, title` lines (default: stdin).
    #[arg(long, env = "HUBSTATS_INPUT")]
    pub input: Option<PathBuf>,

    /// Destination for `account/repo<TAB>count` rows (default: stdout).
    #[arg(long, env = "HUBSTATS_OUTPUT")]
    pub output: Option<PathBuf>,

    #[arg(long, default_value_t = 64 * 1024)]
    pub max_line_bytes: usize,
}

pub fn run(args: Args) -> Result<(), Error> {
    let registry = EventTypeRegistry::new();
    let grammar = Grammar::new()?;
    let dispatcher = Dispatcher::new(&registry, &grammar);

    let mut tally = PushTally::new();
    for record in feed_lines(open_input(args.input.as_deref())?, args.max_line_bytes)? {
        let line = match record.outcome {
            Ok(line) => line,
            Err(err) => {
                unreadable_line(record.line_number, &err)?;
                continue;
            }
        };
        // Rejections are already logged by the dispatcher.
        if let Ok(Some(event)) = dispatcher.dispatch_event(&FeedEntry::from(line)) {
            tally.record(&event);
        }
    }

    let counts = tally.counts();
    let mut out = open_output(args.output.as_deref())?;
    for (repository, count) in &counts {
        writeln!(out, "{repository}\t{count}")?;
    }
    out.flush()?;

    info!(repositories = counts.len(), "finished counting pushes");
    Ok(())
}

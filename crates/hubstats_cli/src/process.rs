use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use hubstats::{
    Deduplicator, DispatchError, Dispatcher, EncodedEvent, EntryFailure, EventTypeRegistry,
    FeedEntry, Grammar,
};
use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::error::Error;
use crate::files::{feed_lines, open_input, open_output, unreadable_line};

/// Entries dispatched per parallel batch.
const BATCH_SIZE: usize = 8192;

#[derive(Debug, Parser)]
pub struct Args {
    /// Tab-separated `identifier, published, title` lines (default: stdin).
    #[arg(long, env = "HUBSTATS_INPUT")]
    pub input: Option<PathBuf>,

    /// Destination for `id<TAB>line` rows (default: stdout).
    #[arg(long, env = "HUBSTATS_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Write rejected entries here as JSON lines.
    #[arg(long)]
    pub failures: Option<PathBuf>,

    /// Worker threads (default: one per available core).
    #[arg(long, env = "HUBSTATS_THREADS")]
    pub threads: Option<usize>,

    #[arg(long, default_value_t = 64 * 1024)]
    pub max_line_bytes: usize,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Summary {
    pub entries: usize,
    pub emitted: usize,
    pub duplicates: usize,
    pub rejected: usize,
    pub skipped: usize,
    pub unreadable: usize,
}

#[derive(Debug, Serialize)]
struct FailureRecord {
    line_number: usize,
    #[serde(flatten)]
    failure: EntryFailure,
}

/// Per-worker results; merged pairwise, so grouping does not change the outcome.
#[derive(Default)]
struct Partial {
    events: Deduplicator,
    failures: Vec<(usize, DispatchError)>,
    skipped: usize,
}

impl Partial {
    fn record(
        mut self,
        line_number: usize,
        outcome: Result<Option<EncodedEvent>, DispatchError>,
    ) -> Self {
        match outcome {
            Ok(Some(event)) => {
                self.events.insert_event(event);
            }
            Ok(None) => self.skipped += 1,
            Err(err) => self.failures.push((line_number, err)),
        }
        self
    }

    fn merge(mut self, other: Partial) -> Partial {
        self.events = self.events.merge(other.events);
        self.failures.extend(other.failures);
        self.skipped += other.skipped;
        self
    }
}

pub fn run(args: Args) -> Result<Summary, Error> {
    let registry = EventTypeRegistry::new();
    let grammar = Grammar::new()?;
    let dispatcher = Dispatcher::new(&registry, &grammar);

    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("hubstats-{i}"));
    if let Some(threads) = args.threads {
        builder = builder.num_threads(threads);
    }
    let pool = builder.build()?;
    info!(threads = pool.current_num_threads(), "processing feed entries");

    let mut failures_out = args
        .failures
        .as_deref()
        .map(|path| open_output(Some(path)))
        .transpose()?;

    let mut summary = Summary::default();
    let mut total = Partial::default();
    let mut batch: Vec<(usize, FeedEntry)> = Vec::with_capacity(BATCH_SIZE);

    let mut lines = feed_lines(open_input(args.input.as_deref())?, args.max_line_bytes)?;
    loop {
        let record = lines.next();
        let end_of_input = record.is_none();
        if let Some(record) = record {
            match record.outcome {
                Ok(line) => {
                    summary.entries += 1;
                    batch.push((record.line_number, FeedEntry::from(line)));
                }
                Err(err) => {
                    summary.unreadable += 1;
                    unreadable_line(record.line_number, &err)?;
                }
            }
        }
        if batch.len() < BATCH_SIZE && !end_of_input {
            continue;
        }

        let mut partial = pool.install(|| dispatch_batch(dispatcher, &batch));
        batch.clear();
        if let Some(out) = failures_out.as_mut() {
            for (line_number, err) in &partial.failures {
                let record = FailureRecord {
                    line_number: *line_number,
                    failure: EntryFailure::from(err),
                };
                serde_json::to_writer(&mut *out, &record)?;
                out.write_all(b"\n")?;
            }
        }
        summary.rejected += partial.failures.len();
        partial.failures.clear();
        total = total.merge(partial);

        if end_of_input {
            break;
        }
    }
    if let Some(mut out) = failures_out {
        out.flush()?;
    }

    summary.skipped = total.skipped;
    summary.duplicates = total.events.duplicates();
    summary.emitted = total.events.len();

    let mut out = open_output(args.output.as_deref())?;
    for (id, line) in total.events.iter() {
        writeln!(out, "{id}\t{line}")?;
    }
    out.flush()?;

    info!(
        entries = summary.entries,
        emitted = summary.emitted,
        duplicates = summary.duplicates,
        rejected = summary.rejected,
        skipped = summary.skipped,
        unreadable = summary.unreadable,
        "finished processing"
    );
    Ok(summary)
}

fn dispatch_batch(dispatcher: Dispatcher<'_>, batch: &[(usize, FeedEntry)]) -> Partial {
    batch
        .par_iter()
        .fold(Partial::default, |partial, (line_number, entry)| {
            partial.record(*line_number, dispatcher.dispatch(entry))
        })
        .reduce(Partial::default, Partial::merge)
}

use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;

use feed_events::{FeedEntryParser, IngestConfig, LineIngestor, LineRecordError};
use tracing::warn;

use crate::error::Error;

pub const ADAPTER_NAME: &str = "feed";

/// Opens `path`, or stdin when absent.
pub fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>, Error> {
    match path {
        Some(path) => File::open(path)
            .map(|file| Box::new(file) as Box<dyn Read>)
            .map_err(|source| Error::Open {
                path: path.to_path_buf(),
                source,
            }),
        None => Ok(Box::new(io::stdin().lock())),
    }
}

/// Creates `path`, or writes to stdout when absent.
pub fn open_output(path: Option<&Path>) -> Result<BufWriter<Box<dyn Write>>, Error> {
    let sink: Box<dyn Write> = match path {
        Some(path) => Box::new(File::create(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?),
        None => Box::new(io::stdout().lock()),
    };
    Ok(BufWriter::new(sink))
}

pub fn feed_lines(
    reader: Box<dyn Read>,
    max_line_bytes: usize,
) -> Result<LineIngestor<Box<dyn Read>, FeedEntryParser>, Error> {
    if max_line_bytes == 0 {
        return Err(Error::ZeroLineLimit);
    }
    let config = IngestConfig::default().with_max_line_bytes(max_line_bytes);
    Ok(LineIngestor::new(
        reader,
        FeedEntryParser::new(),
        config,
        ADAPTER_NAME,
    ))
}

/// Read failures end the input; everything else only loses the one line.
pub fn unreadable_line(line_number: usize, err: &LineRecordError) -> Result<(), Error> {
    warn!(line_number, "skipping unreadable line: {err}");
    match err {
        LineRecordError::Io => Err(Error::Io(io::Error::new(
            io::ErrorKind::Other,
            format!("input failed at line {line_number}"),
        ))),
        _ => Ok(()),
    }
}

//! Feeds ingested lines through a [`hubstats::Dispatcher`].

use hubstats::{DispatchError, Dispatcher, EncodedEvent, ErrorCategory, FeedEntry};

use crate::entry::{FeedEntryParser, FeedLine, SplitError};
use crate::error::AdapterErrorCode;
use crate::line_parser::{ClassifiedParserError, LineInput, LineParser};

pub const ADAPTER_NAME: &str = "hubstats";

impl From<FeedLine> for FeedEntry {
    fn from(line: FeedLine) -> Self {
        FeedEntry::new(line.identifier, line.published, line.title)
    }
}

/// Parses a line into an entry and dispatches it. Entries that are not events yield no record.
#[derive(Debug, Clone, Copy)]
pub struct EventLineParser<'a> {
    entries: FeedEntryParser,
    dispatcher: Dispatcher<'a>,
}

impl<'a> EventLineParser<'a> {
    pub fn new(dispatcher: Dispatcher<'a>) -> Self {
        Self {
            entries: FeedEntryParser::new(),
            dispatcher,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EventLineError {
    #[error(transparent)]
    Split(#[from] SplitError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl EventLineError {
    /// The dispatcher's failure, when the line got that far.
    pub fn dispatch_error(&self) -> Option<&DispatchError> {
        match self {
            EventLineError::Dispatch(err) => Some(err),
            EventLineError::Split(_) => None,
        }
    }
}

impl ClassifiedParserError for EventLineError {
    fn code(&self) -> AdapterErrorCode {
        match self {
            EventLineError::Split(err) => err.code(),
            EventLineError::Dispatch(err) => match err.category() {
                ErrorCategory::UnknownEventKind => AdapterErrorCode::UnknownKind,
                ErrorCategory::MalformedEntry => AdapterErrorCode::Malformed,
                _ => AdapterErrorCode::Invalid,
            },
        }
    }

    // Titles carry user names; the summary names only the entry and category.
    fn redacted_summary(&self) -> String {
        match self {
            EventLineError::Split(err) => err.redacted_summary(),
            EventLineError::Dispatch(err) => {
                format!("{} rejected: {:?}", err.identifier(), err.category())
            }
        }
    }

    fn full_details(&self) -> String {
        match self {
            EventLineError::Split(err) => err.full_details(),
            EventLineError::Dispatch(err) => format!("{}: {err}", err.identifier()),
        }
    }
}

impl<'a> LineParser for EventLineParser<'a> {
    type Event = EncodedEvent;
    type Error = EventLineError;

    fn reset(&mut self) {
        self.entries.reset();
    }

    fn parse_line(&mut self, input: LineInput<'_>) -> Result<Option<Self::Event>, Self::Error> {
        let entry = FeedEntry::from(self.entries.split(input.line_number, input.line)?);
        Ok(self.dispatcher.dispatch(&entry)?)
    }
}

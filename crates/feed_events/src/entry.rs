use thiserror::Error;

use crate::error::AdapterErrorCode;
use crate::line_parser::{ClassifiedParserError, LineInput, LineParser};

/// Fields per input line: identifier, published, title.
pub const ENTRY_FIELD_COUNT: usize = 3;

/// One input line split into its fields, not yet interpreted.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FeedLine {
    pub identifier: String,
    pub published: String,
    pub title: String,
}

#[derive(Debug, Error, Clone, Eq, PartialEq)]
#[error("expected {} tab-separated fields, found {found}", ENTRY_FIELD_COUNT)]
pub struct SplitError {
    pub found: usize,
    line_number: usize,
}

impl ClassifiedParserError for SplitError {
    fn code(&self) -> AdapterErrorCode {
        AdapterErrorCode::Split
    }

    fn redacted_summary(&self) -> String {
        self.to_string()
    }

    fn full_details(&self) -> String {
        format!("line {}: {self}", self.line_number)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FeedEntryParser;

impl FeedEntryParser {
    pub fn new() -> Self {
        Self
    }

    pub fn split(&self, line_number: usize, line: &str) -> Result<FeedLine, SplitError> {
        let mut fields = line.split('\t');
        match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(identifier), Some(published), Some(title), None) => Ok(FeedLine {
                identifier: identifier.to_string(),
                published: published.to_string(),
                title: title.to_string(),
            }),
            _ => Err(SplitError {
                found: line.split('\t').count(),
                line_number,
            }),
        }
    }
}

impl LineParser for FeedEntryParser {
    type Event = FeedLine;
    type Error = SplitError;

    fn reset(&mut self) {}

    fn parse_line(&mut self, input: LineInput<'_>) -> Result<Option<Self::Event>, Self::Error> {
        self.split(input.line_number, input.line).map(Some)
    }
}

use std::error::Error;

use crate::error::AdapterErrorCode;

pub struct LineInput<'a> {
    pub line_number: usize,
    pub line: &'a str,
}

pub trait LineParser {
    type Event;
    type Error: ClassifiedParserError;

    fn reset(&mut self);
    fn parse_line(&mut self, input: LineInput<'_>) -> Result<Option<Self::Event>, Self::Error>;
}

pub trait ClassifiedParserError: Error {
    fn code(&self) -> AdapterErrorCode;
    fn redacted_summary(&self) -> String;
    fn full_details(&self) -> String;
}

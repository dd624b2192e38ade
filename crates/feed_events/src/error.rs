use thiserror::Error;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AdapterErrorCode {
    /// The line is not an `identifier<TAB>published<TAB>title` tuple.
    Split,
    UnknownKind,
    Malformed,
    Invalid,
    Unknown,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CapturedRaw {
    pub line: String,
}

#[derive(Debug, Error, Clone, Eq, PartialEq)]
pub enum LineRecordError {
    #[error("I/O error while reading feed input")]
    Io,
    #[error("invalid UTF-8 in feed input")]
    InvalidUtf8,
    #[error("line too long (observed_bytes={observed_bytes}, max_line_bytes={max_line_bytes})")]
    LineTooLong {
        observed_bytes: usize,
        max_line_bytes: usize,
    },
    #[error("entry rejected ({code:?}): {summary}")]
    Adapter {
        code: AdapterErrorCode,
        summary: String,
    },
}

#[derive(Debug, Clone)]
pub struct LineRecord<T> {
    pub line_number: usize,
    pub captured_raw: Option<CapturedRaw>,
    pub outcome: Result<T, LineRecordError>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ErrorDetail {
    pub line_number: usize,
    pub code: AdapterErrorCode,
    pub adapter: &'static str,
    pub details: String,
}

pub trait ErrorDetailSink: Send + 'static {
    fn on_error(&mut self, detail: ErrorDetail);
}

impl<F> ErrorDetailSink for F
where
    F: FnMut(ErrorDetail) + Send + 'static,
{
    fn on_error(&mut self, detail: ErrorDetail) {
        self(detail)
    }
}

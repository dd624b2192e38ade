use crate::error::ErrorDetailSink;

/// Whether the ingestor keeps a copy of each accepted line alongside its record.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum CaptureRaw {
    #[default]
    None,
    Line,
}

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum ErrorDetailCapture {
    #[default]
    RedactedSummaryOnly,
    FullDetails,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct IngestLimits {
    pub max_line_bytes: usize,
    /// Total bytes of raw lines that may be captured over the whole input.
    pub max_raw_bytes_total: Option<usize>,
}

impl Default for IngestLimits {
    fn default() -> Self {
        Self {
            max_line_bytes: 64 * 1024,
            max_raw_bytes_total: None,
        }
    }
}

#[derive(Default)]
pub struct IngestConfig {
    pub limits: IngestLimits,
    pub capture_raw: CaptureRaw,
    pub error_detail_capture: ErrorDetailCapture,
    pub error_sink: Option<Box<dyn ErrorDetailSink>>,
}

impl IngestConfig {
    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.limits.max_line_bytes = max_line_bytes;
        self
    }

    /// Sends full error details to `sink` in addition to the redacted record summary.
    pub fn with_error_sink(mut self, sink: impl ErrorDetailSink) -> Self {
        self.error_detail_capture = ErrorDetailCapture::FullDetails;
        self.error_sink = Some(Box::new(sink));
        self
    }
}

use std::io::Read;

use tracing::debug;

use crate::config::{CaptureRaw, ErrorDetailCapture, IngestConfig};
use crate::error::{AdapterErrorCode, CapturedRaw, ErrorDetail, LineRecord, LineRecordError};
use crate::line_parser::{ClassifiedParserError, LineInput, LineParser};
use crate::reader::{BoundedLine, SyncBoundedLineReader};

/// Bytes of raw input still allowed to be captured. `None` is unlimited.
#[derive(Debug, Clone, Copy)]
pub struct RawCaptureBudget {
    remaining_bytes: Option<usize>,
}

impl RawCaptureBudget {
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            remaining_bytes: limit,
        }
    }

    /// Deducts `bytes` if they fit; a capture that does not fit is skipped entirely.
    fn try_spend(&mut self, bytes: usize) -> bool {
        match self.remaining_bytes {
            None => true,
            Some(rem) if bytes <= rem => {
                self.remaining_bytes = Some(rem - bytes);
                true
            }
            Some(_) => false,
        }
    }
}

/// Iterator of parsed records over a line-oriented reader.
///
/// Blank lines, and lines the parser answers with `Ok(None)`, produce no record. Every other
/// line produces exactly one record, so a bad line never hides the ones after it.
pub struct LineIngestor<R: Read, P: LineParser> {
    reader: SyncBoundedLineReader<R>,
    parser: P,
    config: IngestConfig,
    budget: RawCaptureBudget,
    adapter_name: &'static str,
}

impl<R: Read, P: LineParser> LineIngestor<R, P> {
    pub fn new(reader: R, parser: P, config: IngestConfig, adapter_name: &'static str) -> Self {
        let budget = RawCaptureBudget::new(config.limits.max_raw_bytes_total);
        Self {
            reader: SyncBoundedLineReader::new(reader, config.limits.max_line_bytes),
            parser,
            config,
            budget,
            adapter_name,
        }
    }

    /// Lines consumed so far, including skipped ones.
    pub fn lines_read(&self) -> usize {
        self.reader.lines_read()
    }

    pub fn into_parser(self) -> P {
        self.parser
    }

    fn failed<T>(line_number: usize, err: LineRecordError) -> LineRecord<T> {
        LineRecord {
            line_number,
            captured_raw: None,
            outcome: Err(err),
        }
    }

    fn capture(&mut self, line: &str) -> Option<CapturedRaw> {
        if self.config.capture_raw == CaptureRaw::None || !self.budget.try_spend(line.len()) {
            return None;
        }
        Some(CapturedRaw {
            line: line.to_string(),
        })
    }

    fn rejected<T>(&mut self, line_number: usize, err: P::Error) -> LineRecord<T> {
        let code: AdapterErrorCode = err.code();
        if self.config.error_detail_capture == ErrorDetailCapture::FullDetails {
            if let Some(sink) = self.config.error_sink.as_mut() {
                sink.on_error(ErrorDetail {
                    line_number,
                    code,
                    adapter: self.adapter_name,
                    details: err.full_details(),
                });
            }
        }
        Self::failed(
            line_number,
            LineRecordError::Adapter {
                code,
                summary: err.redacted_summary(),
            },
        )
    }
}

impl<R: Read, P: LineParser> Iterator for LineIngestor<R, P> {
    type Item = LineRecord<P::Event>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (line_number, bytes) = match self.reader.next()? {
                BoundedLine::Line { line_number, bytes } => (line_number, bytes),
                BoundedLine::LineTooLong {
                    line_number,
                    observed_bytes,
                    max_line_bytes,
                } => {
                    debug!(line_number, observed_bytes, "dropping over-long line");
                    return Some(Self::failed(
                        line_number,
                        LineRecordError::LineTooLong {
                            observed_bytes,
                            max_line_bytes,
                        },
                    ));
                }
                BoundedLine::IoError { line_number, kind } => {
                    debug!(line_number, ?kind, "read failed");
                    return Some(Self::failed(line_number, LineRecordError::Io));
                }
            };

            let Ok(raw_line) = String::from_utf8(bytes) else {
                return Some(Self::failed(line_number, LineRecordError::InvalidUtf8));
            };
            let line = raw_line.strip_suffix('\r').unwrap_or(&raw_line);
            if line.trim().is_empty() {
                continue;
            }

            let captured_raw = self.capture(line);
            match self.parser.parse_line(LineInput { line_number, line }) {
                Ok(None) => continue,
                Ok(Some(event)) => {
                    return Some(LineRecord {
                        line_number,
                        captured_raw,
                        outcome: Ok(event),
                    })
                }
                Err(err) => return Some(self.rejected(line_number, err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::entry::{FeedEntryParser, FeedLine};

    fn ingest(data: &[u8], config: IngestConfig) -> Vec<LineRecord<FeedLine>> {
        LineIngestor::new(
            std::io::Cursor::new(data.to_vec()),
            FeedEntryParser::new(),
            config,
            "feed",
        )
        .collect()
    }

    #[test]
    fn blank_lines_and_carriage_returns_are_dropped() {
        let records = ingest(b"a\tb\tc\r\n\n   \nd\te\tf\n", IngestConfig::default());
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line_number, 1);
        assert_eq!(records[0].outcome.as_ref().unwrap().title, "c");
        assert_eq!(records[1].line_number, 4);
    }

    #[test]
    fn bad_lines_do_not_stop_ingestion() {
        let mut data = b"only\tone\n".to_vec();
        data.extend_from_slice(&[0xff, b'\t', b'x', b'\t', b'y', b'\n']);
        data.extend_from_slice(&[b'z'; 40]);
        data.extend_from_slice(b"\nid\tts\ttitle\n");

        let records = ingest(&data, IngestConfig::default().with_max_line_bytes(32));
        assert_eq!(records.len(), 4);
        assert!(matches!(
            records[0].outcome,
            Err(LineRecordError::Adapter {
                code: AdapterErrorCode::Split,
                ..
            })
        ));
        assert_eq!(records[1].outcome, Err(LineRecordError::InvalidUtf8));
        assert!(matches!(
            records[2].outcome,
            Err(LineRecordError::LineTooLong {
                observed_bytes: 40,
                max_line_bytes: 32
            })
        ));
        assert!(records[3].outcome.is_ok());
    }

    #[test]
    fn captures_line_within_budget() {
        let mut config = IngestConfig::default();
        config.capture_raw = CaptureRaw::Line;
        config.limits.max_raw_bytes_total = Some(8);

        let records = ingest(b"a\tb\tc\nlonger\tline\there\n", config);
        assert_eq!(
            records[0].captured_raw.as_ref().map(|raw| raw.line.as_str()),
            Some("a\tb\tc")
        );
        assert!(records[1].captured_raw.is_none());
        assert!(records[1].outcome.is_ok());
    }

    #[test]
    fn full_details_reach_the_sink() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = {
            let seen = Arc::clone(&seen);
            move |detail: ErrorDetail| seen.lock().unwrap().push(detail)
        };

        let records = ingest(b"x\n", IngestConfig::default().with_error_sink(sink));
        assert_eq!(
            records[0].outcome,
            Err(LineRecordError::Adapter {
                code: AdapterErrorCode::Split,
                summary: "expected 3 tab-separated fields, found 1".to_string(),
            })
        );

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].adapter, "feed");
        assert_eq!(seen[0].details, "line 1: expected 3 tab-separated fields, found 1");
    }
}

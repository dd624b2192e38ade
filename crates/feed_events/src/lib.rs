#![forbid(unsafe_code)]
//! Line-oriented ingestion of timeline feed entries.
//!
//! Input is one entry per line, `identifier<TAB>published<TAB>title`. This crate provides:
//! - A bounded-memory reader that never buffers more than `max_line_bytes` of a single line.
//! - [`LineIngestor`], which runs any [`LineParser`] over those lines and isolates failures per line.
//! - [`FeedEntryParser`] for the three-field tuple format.
//! - With the `hubstats` feature, [`hubstats_adapter::EventLineParser`], which turns lines
//!   straight into encoded events.

mod config;
mod entry;
mod error;
mod ingest;
mod line_parser;
mod reader;

#[cfg(feature = "hubstats")]
pub mod hubstats_adapter;

pub use config::{CaptureRaw, ErrorDetailCapture, IngestConfig, IngestLimits};
pub use entry::{FeedEntryParser, FeedLine, SplitError, ENTRY_FIELD_COUNT};
pub use error::{
    AdapterErrorCode, CapturedRaw, ErrorDetail, ErrorDetailSink, LineRecord, LineRecordError,
};
pub use ingest::{LineIngestor, RawCaptureBudget};
pub use line_parser::{ClassifiedParserError, LineInput, LineParser};
pub use reader::{BoundedLine, SyncBoundedLineReader};

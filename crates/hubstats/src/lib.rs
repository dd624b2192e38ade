#![forbid(unsafe_code)]
//! Typed events for GitHub public timeline entries.
//!
//! A feed entry (`identifier`, `published`, `title`) goes through:
//! - [`parse_identifier`] to find the event kind and numeric id,
//! - [`Grammar::extract`] to read the fields out of the title,
//! - [`EventBuilder::build`] to check them against the [`EventTypeRegistry`],
//! - [`encode`] to render the canonical tab-separated line.
//!
//! [`Dispatcher`] runs the whole chain for one entry; [`Deduplicator`] collapses repeated ids.
//!
//! ```
//! use hubstats::{Dispatcher, EventTypeRegistry, FeedEntry, Grammar};
//!
//! let registry = EventTypeRegistry::new();
//! let grammar = Grammar::new().unwrap();
//! let dispatcher = Dispatcher::new(&registry, &grammar);
//!
//! let entry = FeedEntry::new(
//!     "tag:github.com,2008:PushEvent/1007541708",
//!     "2010-11-19T03:55:54-08:00",
//!     "esil pushed to master at esil/cmake",
//! );
//! let encoded = dispatcher.dispatch(&entry).unwrap().unwrap();
//! assert_eq!(
//!     encoded.line,
//!     "1007541708\tPush\t2010-11-19T03:55:54-08:00\tesil\tesil\tcmake\tmaster\t\t\t"
//! );
//! ```

mod dedup;
mod dispatch;
mod encode;
mod error;
mod event;
mod event_type;
mod extract;
mod tally;

pub use dedup::{dedup, Deduplicator};
pub use dispatch::{parse_identifier, Dispatcher, EntryIdentifier, FeedEntry};
pub use encode::{encode, EncodedEvent, FIELD_COUNT, FIELD_SEPARATOR};
pub use error::{BuildError, DispatchError, EntryFailure, ErrorCategory, Field, Violation};
pub use event::{Event, EventBuilder};
pub use event_type::{EventKind, EventTypeRegistry, KindRules, UnknownKind};
pub use extract::{Grammar, PartialFields};
pub use tally::PushTally;

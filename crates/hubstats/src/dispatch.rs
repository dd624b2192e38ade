use tracing::{debug, warn};

use crate::encode::EncodedEvent;
use crate::error::{BuildError, DispatchError};
use crate::event::{Event, EventBuilder};
use crate::event_type::{EventKind, EventTypeRegistry};
use crate::extract::Grammar;

/// One feed entry as produced by the feed reader.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FeedEntry {
    pub identifier: String,
    pub published: String,
    pub title: String,
}

impl FeedEntry {
    pub fn new(
        identifier: impl Into<String>,
        published: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            published: published.into(),
            title: title.into(),
        }
    }
}

/// Kind name and numeric id taken from an identifier such as
/// `tag:github.com,2008:PushEvent/1007541708`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct EntryIdentifier<'a> {
    pub kind_name: &'a str,
    pub digits: &'a str,
}

/// Splits `<anything>:<KindName>Event/<digits>`; anything else is not an event entry.
pub fn parse_identifier(identifier: &str) -> Option<EntryIdentifier<'_>> {
    let (head, digits) = identifier.rsplit_once("Event/")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (_, kind_name) = head.rsplit_once(':')?;
    if kind_name.is_empty() || !kind_name.bytes().all(|b| b.is_ascii_alphabetic()) {
        return None;
    }
    Some(EntryIdentifier { kind_name, digits })
}

/// Turns feed entries into encoded events.
///
/// Holds only shared references to immutable tables, so one dispatcher (or many copies of it)
/// can serve any number of threads.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'a> {
    registry: &'a EventTypeRegistry,
    grammar: &'a Grammar,
}

impl<'a> Dispatcher<'a> {
    pub fn new(registry: &'a EventTypeRegistry, grammar: &'a Grammar) -> Self {
        Self { registry, grammar }
    }

    pub fn registry(&self) -> &'a EventTypeRegistry {
        self.registry
    }

    /// Processes one entry.
    ///
    /// - `Ok(None)`: the identifier is not an event identifier (e.g. the feed's own id).
    /// - `Ok(Some(_))`: a validated, encoded event.
    /// - `Err(_)`: the entry names an event but could not be turned into one.
    pub fn dispatch(&self, entry: &FeedEntry) -> Result<Option<EncodedEvent>, DispatchError> {
        Ok(self.dispatch_event(entry)?.as_ref().map(EncodedEvent::new))
    }

    /// Like [`Dispatcher::dispatch`], but hands back the validated event unencoded.
    pub fn dispatch_event(&self, entry: &FeedEntry) -> Result<Option<Event>, DispatchError> {
        let Some(parsed) = parse_identifier(&entry.identifier) else {
            debug!(identifier = %entry.identifier, "skipping unrecognized entry");
            return Ok(None);
        };

        let outcome = self.build_event(entry, parsed);
        match &outcome {
            Ok(event) => debug!(id = event.id(), kind = %event.kind(), "dispatched entry"),
            Err(err) => warn!(
                identifier = %entry.identifier,
                kind = err.kind_name(),
                category = ?err.category(),
                "rejected entry: {err}"
            ),
        }
        outcome.map(Some)
    }

    fn build_event(
        &self,
        entry: &FeedEntry,
        parsed: EntryIdentifier<'_>,
    ) -> Result<Event, DispatchError> {
        let kind = self
            .registry
            .resolve(parsed.kind_name)
            .map_err(|_| DispatchError::UnknownEventKind {
                identifier: entry.identifier.clone(),
                kind_name: parsed.kind_name.to_string(),
            })?;

        let invalid = |source: BuildError| DispatchError::Invalid {
            identifier: entry.identifier.clone(),
            source,
        };

        // All-digit ids only fail to parse on overflow.
        let id: i64 = parsed.digits.parse().map_err(|_| {
            invalid(BuildError::InvalidId {
                kind,
                value: parsed.digits.to_string(),
            })
        })?;

        let fields = self
            .grammar
            .extract(kind, &entry.title)
            .ok_or_else(|| malformed(entry, kind))?;

        fields
            .apply(EventBuilder::without_actor(id, kind, entry.published.as_str()))
            .build(self.registry)
            .map_err(invalid)
    }
}

fn malformed(entry: &FeedEntry, kind: EventKind) -> DispatchError {
    DispatchError::MalformedEntry {
        identifier: entry.identifier.clone(),
        kind,
        title: entry.title.clone(),
    }
}

use crate::event::Event;

pub const FIELD_SEPARATOR: char = '\t';

/// Number of fields in an encoded line. Changing it (or the order below) breaks the format.
pub const FIELD_COUNT: usize = 10;

/// An encoded event keyed by its id, as handed to the output sink.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EncodedEvent {
    pub id: u64,
    pub line: String,
}

impl EncodedEvent {
    pub fn new(event: &Event) -> Self {
        Self {
            id: event.id(),
            line: encode(event),
        }
    }
}

/// Renders `event` as one tab-separated line.
///
/// Fields, in order: id, kind, occurred_at, actor, repo_account, repo_name, branch, tag,
/// alternate_id, sub_type. Absent values render as empty fields, so the line always has
/// `FIELD_COUNT - 1` separators.
pub fn encode(event: &Event) -> String {
    let mut line = event.id().to_string();
    push_field(&mut line, Some(event.kind().name()));
    push_field(&mut line, Some(event.occurred_at()));
    push_field(&mut line, Some(event.actor()));
    push_field(&mut line, event.repo_account());
    push_field(&mut line, event.repo_name());
    push_field(&mut line, event.branch());
    push_field(&mut line, event.tag());
    line.push(FIELD_SEPARATOR);
    if let Some(id) = event.alternate_id() {
        line.push_str(&id.to_string());
    }
    push_field(&mut line, event.sub_type());
    line
}

fn push_field(line: &mut String, value: Option<&str>) {
    line.push(FIELD_SEPARATOR);
    if let Some(value) = value {
        line.push_str(value);
    }
}

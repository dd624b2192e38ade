use serde::Serialize;
use thiserror::Error;

use crate::event_type::EventKind;

/// Event fields checked by [`crate::EventBuilder::build`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum Field {
    Id,
    Actor,
    RepoAccount,
    RepoName,
    Branch,
    Tag,
    AlternateId,
    SubType,
}

/// How a field broke its contract.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub enum Violation {
    Invalid,
    /// Required but absent or blank.
    Missing,
    /// Forbidden for the kind but present.
    Unexpected,
    Conflicting,
}

/// Validation failures raised while finalizing an event.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum BuildError {
    #[error("Event id must be greater than zero (was {value})")]
    InvalidId { kind: EventKind, value: String },
    #[error("Actor account name cannot be null or empty")]
    MissingActor { kind: EventKind },
    #[error("{kind} event must have an associated repository account")]
    MissingRepoAccount { kind: EventKind },
    #[error("{kind} event must not have an associated repository account")]
    UnexpectedRepoAccount { kind: EventKind },
    #[error("{kind} event must have an associated repository name")]
    MissingRepoName { kind: EventKind },
    #[error("{kind} event must not have an associated repository name")]
    UnexpectedRepoName { kind: EventKind },
    #[error("{kind} event must have an associated branch")]
    MissingBranch { kind: EventKind },
    #[error("Can't {} a branch and a tag in the same event", .kind.name().to_lowercase())]
    ConflictingBranchAndTag { kind: EventKind },
    #[error("{kind} event must specify the id of the {}", referenced_object(.kind))]
    MissingAlternateId { kind: EventKind },
    #[error("{kind} event must specify the type of the operation")]
    MissingSubType { kind: EventKind },
}

fn referenced_object(kind: &EventKind) -> String {
    let lower = kind.name().to_lowercase();
    match lower.strip_suffix('s') {
        Some(stem) => stem.to_string(),
        None => lower,
    }
}

impl BuildError {
    pub fn kind(&self) -> EventKind {
        match self {
            BuildError::InvalidId { kind, .. }
            | BuildError::MissingActor { kind }
            | BuildError::MissingRepoAccount { kind }
            | BuildError::UnexpectedRepoAccount { kind }
            | BuildError::MissingRepoName { kind }
            | BuildError::UnexpectedRepoName { kind }
            | BuildError::MissingBranch { kind }
            | BuildError::ConflictingBranchAndTag { kind }
            | BuildError::MissingAlternateId { kind }
            | BuildError::MissingSubType { kind } => *kind,
        }
    }

    pub fn field(&self) -> Field {
        match self {
            BuildError::InvalidId { .. } => Field::Id,
            BuildError::MissingActor { .. } => Field::Actor,
            BuildError::MissingRepoAccount { .. } | BuildError::UnexpectedRepoAccount { .. } => {
                Field::RepoAccount
            }
            BuildError::MissingRepoName { .. } | BuildError::UnexpectedRepoName { .. } => {
                Field::RepoName
            }
            BuildError::MissingBranch { .. } => Field::Branch,
            BuildError::ConflictingBranchAndTag { .. } => Field::Tag,
            BuildError::MissingAlternateId { .. } => Field::AlternateId,
            BuildError::MissingSubType { .. } => Field::SubType,
        }
    }

    pub fn violation(&self) -> Violation {
        match self {
            BuildError::InvalidId { .. } => Violation::Invalid,
            BuildError::UnexpectedRepoAccount { .. } | BuildError::UnexpectedRepoName { .. } => {
                Violation::Unexpected
            }
            BuildError::ConflictingBranchAndTag { .. } => Violation::Conflicting,
            BuildError::MissingActor { .. }
            | BuildError::MissingRepoAccount { .. }
            | BuildError::MissingRepoName { .. }
            | BuildError::MissingBranch { .. }
            | BuildError::MissingAlternateId { .. }
            | BuildError::MissingSubType { .. } => Violation::Missing,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            BuildError::InvalidId { .. } => ErrorCategory::InvalidId,
            BuildError::MissingActor { .. } => ErrorCategory::MissingActor,
            BuildError::MissingRepoAccount { .. } => ErrorCategory::MissingRepoAccount,
            BuildError::UnexpectedRepoAccount { .. } => ErrorCategory::UnexpectedRepoAccount,
            BuildError::MissingRepoName { .. } => ErrorCategory::MissingRepoName,
            BuildError::UnexpectedRepoName { .. } => ErrorCategory::UnexpectedRepoName,
            BuildError::MissingBranch { .. } => ErrorCategory::MissingBranch,
            BuildError::ConflictingBranchAndTag { .. } => ErrorCategory::ConflictingBranchAndTag,
            BuildError::MissingAlternateId { .. } => ErrorCategory::MissingAlternateId,
            BuildError::MissingSubType { .. } => ErrorCategory::MissingSubType,
        }
    }
}

/// Every reported failure category.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub enum ErrorCategory {
    UnknownEventKind,
    MalformedEntry,
    InvalidId,
    MissingActor,
    MissingRepoAccount,
    UnexpectedRepoAccount,
    MissingRepoName,
    UnexpectedRepoName,
    MissingBranch,
    ConflictingBranchAndTag,
    MissingAlternateId,
    MissingSubType,
}

/// Why a recognised feed entry produced no output.
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum DispatchError {
    #[error("entry `{identifier}` names unknown event kind `{kind_name}`")]
    UnknownEventKind {
        identifier: String,
        kind_name: String,
    },
    #[error("{kind} entry `{identifier}` has a title that does not match its grammar: {title:?}")]
    MalformedEntry {
        identifier: String,
        kind: EventKind,
        title: String,
    },
    #[error("entry `{identifier}` failed validation: {source}")]
    Invalid {
        identifier: String,
        #[source]
        source: BuildError,
    },
}

impl DispatchError {
    pub fn identifier(&self) -> &str {
        match self {
            DispatchError::UnknownEventKind { identifier, .. }
            | DispatchError::MalformedEntry { identifier, .. }
            | DispatchError::Invalid { identifier, .. } => identifier,
        }
    }

    pub fn kind_name(&self) -> &str {
        match self {
            DispatchError::UnknownEventKind { kind_name, .. } => kind_name,
            DispatchError::MalformedEntry { kind, .. } => kind.name(),
            DispatchError::Invalid { source, .. } => source.kind().name(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            DispatchError::UnknownEventKind { .. } => ErrorCategory::UnknownEventKind,
            DispatchError::MalformedEntry { .. } => ErrorCategory::MalformedEntry,
            DispatchError::Invalid { source, .. } => source.category(),
        }
    }

    /// Extraction failures are distinct from validation failures.
    pub fn is_extraction_failure(&self) -> bool {
        matches!(self, DispatchError::MalformedEntry { .. })
    }
}

/// Serializable failure report handed to callers that persist rejections.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct EntryFailure {
    pub identifier: String,
    pub kind: String,
    pub category: ErrorCategory,
    pub detail: String,
}

impl From<&DispatchError> for EntryFailure {
    fn from(err: &DispatchError) -> Self {
        let detail = match err {
            DispatchError::Invalid { source, .. } => source.to_string(),
            other => other.to_string(),
        };
        Self {
            identifier: err.identifier().to_string(),
            kind: err.kind_name().to_string(),
            category: err.category(),
            detail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_kind_and_field() {
        let err = BuildError::UnexpectedRepoName {
            kind: EventKind::Follow,
        };
        assert_eq!(
            err.to_string(),
            "Follow event must not have an associated repository name"
        );
        assert_eq!(err.field(), Field::RepoName);
        assert_eq!(err.violation(), Violation::Unexpected);

        let err = BuildError::ConflictingBranchAndTag {
            kind: EventKind::Delete,
        };
        assert_eq!(
            err.to_string(),
            "Can't delete a branch and a tag in the same event"
        );
    }

    #[test]
    fn alternate_id_message_names_referenced_object() {
        let issue = BuildError::MissingAlternateId {
            kind: EventKind::Issues,
        };
        assert_eq!(
            issue.to_string(),
            "Issues event must specify the id of the issue"
        );
        let gist = BuildError::MissingAlternateId {
            kind: EventKind::Gist,
        };
        assert_eq!(gist.to_string(), "Gist event must specify the id of the gist");
        let pull = BuildError::MissingAlternateId {
            kind: EventKind::PullRequest,
        };
        assert_eq!(
            pull.to_string(),
            "PullRequest event must specify the id of the pullrequest"
        );
    }

    #[test]
    fn failure_report_carries_identifier_kind_and_category() {
        let err = DispatchError::Invalid {
            identifier: "tag:github.com,2008:PushEvent/1".to_string(),
            source: BuildError::MissingBranch {
                kind: EventKind::Push,
            },
        };
        let report = EntryFailure::from(&err);
        assert_eq!(report.kind, "Push");
        assert_eq!(report.category, ErrorCategory::MissingBranch);
        assert_eq!(report.detail, "Push event must have an associated branch");

        let unknown = DispatchError::UnknownEventKind {
            identifier: "tag:github.com,2008:MonkeyPatchEvent/2".to_string(),
            kind_name: "MonkeyPatch".to_string(),
        };
        let report = EntryFailure::from(&unknown);
        assert_eq!(report.kind, "MonkeyPatch");
        assert_eq!(report.category, ErrorCategory::UnknownEventKind);
    }
}

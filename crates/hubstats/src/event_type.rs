use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// The recognised kinds of public timeline activity.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize)]
pub enum EventKind {
    /// Commits pushed to a repository branch.
    Push,
    /// A repository, branch or tag was created.
    Create,
    /// A user started watching a repository.
    Watch,
    /// An issue was opened or closed.
    Issues,
    /// A user started following another account.
    Follow,
    /// A repository was forked.
    Fork,
    /// A gist was created, updated or forked.
    Gist,
    /// A collaborator was added to a repository.
    Member,
    /// A pull request was opened, merged or closed.
    PullRequest,
    /// A file was uploaded to a repository.
    Download,
    /// A wiki page was created or edited.
    Gollum,
    /// A branch or tag was deleted.
    Delete,
    /// A repository was made public.
    Public,
    /// A commit received a comment.
    CommitComment,
}

impl EventKind {
    pub const ALL: [EventKind; 14] = [
        EventKind::Push,
        EventKind::Create,
        EventKind::Watch,
        EventKind::Issues,
        EventKind::Follow,
        EventKind::Fork,
        EventKind::Gist,
        EventKind::Member,
        EventKind::PullRequest,
        EventKind::Download,
        EventKind::Gollum,
        EventKind::Delete,
        EventKind::Public,
        EventKind::CommitComment,
    ];

    /// Name as it appears in entry identifiers and in encoded lines.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::Push => "Push",
            EventKind::Create => "Create",
            EventKind::Watch => "Watch",
            EventKind::Issues => "Issues",
            EventKind::Follow => "Follow",
            EventKind::Fork => "Fork",
            EventKind::Gist => "Gist",
            EventKind::Member => "Member",
            EventKind::PullRequest => "PullRequest",
            EventKind::Download => "Download",
            EventKind::Gollum => "Gollum",
            EventKind::Delete => "Delete",
            EventKind::Public => "Public",
            EventKind::CommitComment => "CommitComment",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("unknown event kind `{0}`")]
pub struct UnknownKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}

/// Field-presence contract for one event kind.
///
/// `needs_account`/`needs_repo_name` are two-sided: `true` means the field is mandatory, `false`
/// means it must be absent. The `requires_*` flags are one-sided: `false` leaves the field
/// optional.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct KindRules {
    pub needs_account: bool,
    pub needs_repo_name: bool,
    pub requires_alternate_id: bool,
    pub requires_sub_type: bool,
}

impl KindRules {
    const REPOSITORY: KindRules = KindRules::new(true, true, false, false);

    const fn new(
        needs_account: bool,
        needs_repo_name: bool,
        requires_alternate_id: bool,
        requires_sub_type: bool,
    ) -> Self {
        Self {
            needs_account,
            needs_repo_name,
            requires_alternate_id,
            requires_sub_type,
        }
    }

    fn for_kind(kind: EventKind) -> Self {
        match kind {
            EventKind::Push
            | EventKind::Create
            | EventKind::Watch
            | EventKind::Fork
            | EventKind::Delete
            | EventKind::Public
            | EventKind::CommitComment => Self::REPOSITORY,
            EventKind::Follow => Self::new(true, false, false, false),
            EventKind::Gist => Self::new(false, false, true, true),
            EventKind::Member | EventKind::Download | EventKind::Gollum => {
                Self::new(true, true, false, true)
            }
            EventKind::Issues | EventKind::PullRequest => Self::new(true, true, true, true),
        }
    }
}

/// Immutable table of per-kind rules, built once and shared by reference.
#[derive(Debug, Clone)]
pub struct EventTypeRegistry {
    rules: [KindRules; EventKind::ALL.len()],
}

impl EventTypeRegistry {
    pub fn new() -> Self {
        Self {
            rules: EventKind::ALL.map(KindRules::for_kind),
        }
    }

    pub fn rules(&self, kind: EventKind) -> KindRules {
        self.rules[kind.index()]
    }

    /// Resolves a kind name taken from an entry identifier.
    pub fn resolve(&self, name: &str) -> Result<EventKind, UnknownKind> {
        name.parse()
    }

    pub fn kinds(&self) -> impl Iterator<Item = EventKind> + '_ {
        EventKind::ALL.into_iter()
    }
}

impl Default for EventTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_order_matches_table_index() {
        for (idx, kind) in EventKind::ALL.into_iter().enumerate() {
            assert_eq!(kind.index(), idx);
        }
    }

    #[test]
    fn names_round_trip_through_resolve() {
        let registry = EventTypeRegistry::new();
        for kind in registry.kinds() {
            assert_eq!(registry.resolve(kind.name()), Ok(kind));
        }
        assert_eq!(
            registry.resolve("MonkeyPatch"),
            Err(UnknownKind("MonkeyPatch".to_string()))
        );
        assert!(registry.resolve("push").is_err());
    }

    #[test]
    fn rule_table_matches_contract() {
        let registry = EventTypeRegistry::new();

        let follow = registry.rules(EventKind::Follow);
        assert!(follow.needs_account && !follow.needs_repo_name);

        let gist = registry.rules(EventKind::Gist);
        assert!(!gist.needs_account && !gist.needs_repo_name);
        assert!(gist.requires_alternate_id && gist.requires_sub_type);

        for kind in [EventKind::Member, EventKind::Download, EventKind::Gollum] {
            let rules = registry.rules(kind);
            assert!(rules.needs_account && rules.needs_repo_name);
            assert!(!rules.requires_alternate_id && rules.requires_sub_type);
        }

        for kind in [EventKind::Issues, EventKind::PullRequest] {
            assert_eq!(registry.rules(kind), KindRules::new(true, true, true, true));
        }

        for kind in [
            EventKind::Push,
            EventKind::Create,
            EventKind::Watch,
            EventKind::Fork,
            EventKind::Delete,
            EventKind::Public,
            EventKind::CommitComment,
        ] {
            assert_eq!(registry.rules(kind), KindRules::REPOSITORY);
        }
    }
}

use crate::error::BuildError;
use crate::event_type::{EventKind, EventTypeRegistry};

/// A validated timeline event.
///
/// Instances only come out of [`EventBuilder::build`], so every field already satisfies the
/// rules registered for [`Event::kind`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Event {
    id: u64,
    kind: EventKind,
    occurred_at: String,
    actor: String,
    repo_account: Option<String>,
    repo_name: Option<String>,
    branch: Option<String>,
    tag: Option<String>,
    alternate_id: Option<u64>,
    sub_type: Option<String>,
}

impl Event {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Publication timestamp, passed through as found in the feed.
    pub fn occurred_at(&self) -> &str {
        &self.occurred_at
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    pub fn repo_account(&self) -> Option<&str> {
        self.repo_account.as_deref()
    }

    pub fn repo_name(&self) -> Option<&str> {
        self.repo_name.as_deref()
    }

    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Issue, pull request or gist number.
    pub fn alternate_id(&self) -> Option<u64> {
        self.alternate_id
    }

    pub fn sub_type(&self) -> Option<&str> {
        self.sub_type.as_deref()
    }
}

/// Two-phase factory for [`Event`].
///
/// The identifier, kind, timestamp and actor are supplied up front; everything else is set by the
/// title extractor. Nothing is checked until [`EventBuilder::build`], which either yields a complete
/// event or the first broken rule.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    id: i64,
    kind: EventKind,
    occurred_at: String,
    actor: Option<String>,
    repo_account: Option<String>,
    repo_name: Option<String>,
    branch: Option<String>,
    tag: Option<String>,
    alternate_id: u64,
    sub_type: Option<String>,
}

impl EventBuilder {
    pub fn new(
        id: i64,
        kind: EventKind,
        occurred_at: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self::without_actor(id, kind, occurred_at).actor(actor)
    }

    /// Starts a builder whose actor is only known once the title has been read.
    pub fn without_actor(id: i64, kind: EventKind, occurred_at: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            occurred_at: occurred_at.into(),
            actor: None,
            repo_account: None,
            repo_name: None,
            branch: None,
            tag: None,
            alternate_id: 0,
            sub_type: None,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn repo_account(mut self, account: impl Into<String>) -> Self {
        self.repo_account = Some(account.into());
        self
    }

    pub fn repo_name(mut self, name: impl Into<String>) -> Self {
        self.repo_name = Some(name.into());
        self
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// `0` is the unset sentinel and is treated as absent.
    pub fn alternate_id(mut self, id: u64) -> Self {
        self.alternate_id = id;
        self
    }

    pub fn sub_type(mut self, sub_type: impl Into<String>) -> Self {
        self.sub_type = Some(sub_type.into());
        self
    }

    /// Validates the accumulated fields against `registry` and produces the event.
    pub fn build(self, registry: &EventTypeRegistry) -> Result<Event, BuildError> {
        let kind = self.kind;
        let rules = registry.rules(kind);

        let id = match u64::try_from(self.id) {
            Ok(id) if id > 0 => id,
            _ => {
                return Err(BuildError::InvalidId {
                    kind,
                    value: self.id.to_string(),
                })
            }
        };

        let actor = trimmed_non_blank(self.actor.as_deref())
            .ok_or(BuildError::MissingActor { kind })?
            .to_string();

        if rules.needs_account {
            if trimmed_non_blank(self.repo_account.as_deref()).is_none() {
                return Err(BuildError::MissingRepoAccount { kind });
            }
        } else if self.repo_account.is_some() {
            return Err(BuildError::UnexpectedRepoAccount { kind });
        }

        if rules.needs_repo_name {
            if trimmed_non_blank(self.repo_name.as_deref()).is_none() {
                return Err(BuildError::MissingRepoName { kind });
            }
        } else if self.repo_name.is_some() {
            return Err(BuildError::UnexpectedRepoName { kind });
        }

        match kind {
            EventKind::Push if trimmed_non_blank(self.branch.as_deref()).is_none() => {
                return Err(BuildError::MissingBranch { kind });
            }
            EventKind::Create | EventKind::Delete
                if self.branch.is_some() && self.tag.is_some() =>
            {
                return Err(BuildError::ConflictingBranchAndTag { kind });
            }
            _ => {}
        }

        if rules.requires_alternate_id && self.alternate_id == 0 {
            return Err(BuildError::MissingAlternateId { kind });
        } else if rules.requires_sub_type && self.sub_type.is_none() {
            return Err(BuildError::MissingSubType { kind });
        }

        Ok(Event {
            id,
            kind,
            occurred_at: self.occurred_at,
            actor,
            repo_account: self.repo_account.map(trim_owned),
            repo_name: self.repo_name.map(trim_owned),
            branch: self.branch.map(trim_owned),
            tag: self.tag,
            alternate_id: (self.alternate_id != 0).then_some(self.alternate_id),
            sub_type: self.sub_type,
        })
    }
}

fn trimmed_non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn trim_owned(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Field, Violation};

    const AT: &str = "2010-11-19T03:55:54-08:00";

    fn registry() -> EventTypeRegistry {
        EventTypeRegistry::new()
    }

    fn push(id: i64) -> EventBuilder {
        EventBuilder::new(id, EventKind::Push, AT, "esil")
            .repo_account("esil")
            .repo_name("cmake")
            .branch("master")
    }

    #[test]
    fn non_positive_ids_are_rejected_for_every_kind() {
        for kind in EventKind::ALL {
            for id in [0, -1] {
                let err = EventBuilder::new(id, kind, AT, "esil")
                    .build(&registry())
                    .unwrap_err();
                assert_eq!(
                    err,
                    BuildError::InvalidId {
                        kind,
                        value: id.to_string()
                    }
                );
            }
        }
        let err = push(-1).build(&registry()).unwrap_err();
        assert_eq!(err.to_string(), "Event id must be greater than zero (was -1)");
    }

    #[test]
    fn actor_must_be_present_and_is_trimmed() {
        let registry = registry();
        for kind in EventKind::ALL {
            let err = EventBuilder::without_actor(1, kind, AT)
                .build(&registry)
                .unwrap_err();
            assert_eq!(err, BuildError::MissingActor { kind });
            for blank in ["", "   ", " \t "] {
                let err = EventBuilder::new(1, kind, AT, blank)
                    .build(&registry)
                    .unwrap_err();
                assert_eq!(err.field(), Field::Actor);
            }
        }

        let event = push(1007541708).actor(" asdf \t").build(&registry).unwrap();
        assert_eq!(event.actor(), "asdf");
    }

    #[test]
    fn repository_fields_follow_registry_rules() {
        let registry = registry();
        for kind in registry.kinds() {
            let rules = registry.rules(kind);
            let base = || {
                EventBuilder::new(1, kind, AT, "actor")
                    .branch("master")
                    .alternate_id(7)
                    .sub_type("opened")
            };

            let without_account = if rules.needs_repo_name {
                base().repo_name("repo")
            } else {
                base()
            };
            let err = without_account
                .clone()
                .repo_account("  ")
                .build(&registry)
                .unwrap_err();
            if rules.needs_account {
                assert_eq!(err, BuildError::MissingRepoAccount { kind });
                let err = without_account.build(&registry).unwrap_err();
                assert_eq!(err, BuildError::MissingRepoAccount { kind });
            } else {
                assert_eq!(err, BuildError::UnexpectedRepoAccount { kind });
            }

            let without_name = if rules.needs_account {
                base().repo_account("account")
            } else {
                base()
            };
            let err = without_name
                .clone()
                .repo_name("")
                .build(&registry)
                .unwrap_err();
            if rules.needs_repo_name {
                assert_eq!(err, BuildError::MissingRepoName { kind });
                assert_eq!(err.violation(), Violation::Missing);
            } else {
                assert_eq!(err, BuildError::UnexpectedRepoName { kind });
                assert_eq!(err.violation(), Violation::Unexpected);
            }
        }
    }

    #[test]
    fn repository_fields_are_trimmed() {
        let event = push(1)
            .repo_account("  esil ")
            .repo_name("\tcmake  ")
            .build(&registry())
            .unwrap();
        assert_eq!(event.repo_account(), Some("esil"));
        assert_eq!(event.repo_name(), Some("cmake"));
    }

    #[test]
    fn push_requires_branch_and_trims_it() {
        let registry = registry();
        let err = EventBuilder::new(1, EventKind::Push, AT, "esil")
            .repo_account("esil")
            .repo_name("cmake")
            .build(&registry)
            .unwrap_err();
        assert_eq!(err, BuildError::MissingBranch { kind: EventKind::Push });

        let err = push(1).branch(" ").build(&registry).unwrap_err();
        assert_eq!(err.field(), Field::Branch);

        let event = push(1).branch("master\t  ").build(&registry).unwrap();
        assert_eq!(event.branch(), Some("master"));
    }

    #[test]
    fn create_and_delete_reject_branch_with_tag() {
        let registry = registry();
        for kind in [EventKind::Create, EventKind::Delete] {
            let err = EventBuilder::new(1, kind, AT, "marcomaggi")
                .repo_account("marcomaggi")
                .repo_name("Infix")
                .branch("master")
                .tag("1.0.3")
                .build(&registry)
                .unwrap_err();
            assert_eq!(err, BuildError::ConflictingBranchAndTag { kind });

            let repo_level = EventBuilder::new(1, kind, AT, "channgo")
                .repo_account("channgo")
                .repo_name("SmallGift")
                .build(&registry)
                .unwrap();
            assert_eq!(repo_level.branch(), None);
            assert_eq!(repo_level.tag(), None);
        }
    }

    #[test]
    fn tag_is_kept_verbatim() {
        let event = EventBuilder::new(1, EventKind::Create, AT, "marcomaggi")
            .repo_account("marcomaggi")
            .repo_name("Infix")
            .tag(" 1.0.3 ")
            .build(&registry())
            .unwrap();
        assert_eq!(event.tag(), Some(" 1.0.3 "));
    }

    #[test]
    fn alternate_id_is_checked_before_sub_type() {
        let registry = registry();
        for kind in [EventKind::Issues, EventKind::PullRequest] {
            let base = EventBuilder::new(1, kind, AT, "weisserd")
                .repo_account("weisserd")
                .repo_name("LDAP-Sync");

            let err = base.clone().build(&registry).unwrap_err();
            assert_eq!(err, BuildError::MissingAlternateId { kind });

            let err = base.clone().alternate_id(0).sub_type("closed").build(&registry);
            assert_eq!(err.unwrap_err(), BuildError::MissingAlternateId { kind });

            let err = base.clone().alternate_id(1).build(&registry).unwrap_err();
            assert_eq!(err, BuildError::MissingSubType { kind });

            let event = base.alternate_id(1).sub_type("closed").build(&registry).unwrap();
            assert_eq!(event.alternate_id(), Some(1));
            assert_eq!(event.sub_type(), Some("closed"));
        }
    }

    #[test]
    fn gist_carries_no_repository() {
        let registry = registry();
        let gist = EventBuilder::new(1007546130, EventKind::Gist, AT, "zakuro563")
            .alternate_id(706394)
            .sub_type("updated");

        let event = gist.clone().build(&registry).unwrap();
        assert_eq!(event.repo_account(), None);
        assert_eq!(event.repo_name(), None);

        let err = gist.clone().repo_account("zakuro563").build(&registry);
        assert_eq!(
            err.unwrap_err(),
            BuildError::UnexpectedRepoAccount {
                kind: EventKind::Gist
            }
        );
        let err = gist.repo_name("dotfiles").build(&registry);
        assert_eq!(
            err.unwrap_err(),
            BuildError::UnexpectedRepoName {
                kind: EventKind::Gist
            }
        );
    }

    #[test]
    fn sub_type_only_kinds_need_no_alternate_id() {
        let registry = registry();
        for kind in [EventKind::Member, EventKind::Download, EventKind::Gollum] {
            let base = EventBuilder::new(1, kind, AT, "rakd")
                .repo_account("rakd")
                .repo_name("test wiki");
            assert_eq!(
                base.clone().build(&registry).unwrap_err(),
                BuildError::MissingSubType { kind }
            );
            let event = base.sub_type("created").build(&registry).unwrap();
            assert_eq!(event.alternate_id(), None);
        }
    }
}

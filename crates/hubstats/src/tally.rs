use std::collections::BTreeMap;

use crate::event::Event;
use crate::event_type::EventKind;

/// Push counts per repository, counting each event id once.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct PushTally {
    repositories: BTreeMap<u64, String>,
}

impl PushTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `event` if it is a push; other kinds are ignored.
    pub fn record(&mut self, event: &Event) {
        if event.kind() != EventKind::Push {
            return;
        }
        let (Some(account), Some(name)) = (event.repo_account(), event.repo_name()) else {
            return;
        };
        self.insert(event.id(), format!("{account}/{name}"));
    }

    pub fn merge(mut self, other: PushTally) -> PushTally {
        for (id, repository) in other.repositories {
            self.insert(id, repository);
        }
        self
    }

    fn insert(&mut self, id: u64, repository: String) {
        match self.repositories.get_mut(&id) {
            Some(kept) if repository < *kept => *kept = repository,
            Some(_) => {}
            None => {
                self.repositories.insert(id, repository);
            }
        }
    }

    /// `account/name` to number of pushes, in repository order.
    pub fn counts(&self) -> BTreeMap<&str, u64> {
        let mut counts = BTreeMap::new();
        for repository in self.repositories.values() {
            *counts.entry(repository.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventBuilder;
    use crate::event_type::EventTypeRegistry;

    fn push(id: i64, account: &str, name: &str) -> Event {
        EventBuilder::new(id, EventKind::Push, "2010-11-19T03:55:01-08:00", account)
            .repo_account(account)
            .repo_name(name)
            .branch("master")
            .build(&EventTypeRegistry::new())
            .unwrap()
    }

    #[test]
    fn counts_pushes_per_repository_once_per_id() {
        let mut tally = PushTally::new();
        tally.record(&push(1007541463, "certik", "hermes"));
        tally.record(&push(1007541462, "certik", "hermes"));
        tally.record(&push(1007541462, "certik", "hermes"));
        tally.record(&push(1007541708, "esil", "cmake"));

        let watch = EventBuilder::new(3, EventKind::Watch, "t", "mengu")
            .repo_account("kbhomes")
            .repo_name("TextCaptchaBreaker")
            .build(&EventTypeRegistry::new())
            .unwrap();
        tally.record(&watch);

        let counts = tally.counts();
        assert_eq!(
            counts.into_iter().collect::<Vec<_>>(),
            vec![("certik/hermes", 2), ("esil/cmake", 1)]
        );
    }

    #[test]
    fn merge_unions_ids() {
        let mut left = PushTally::new();
        left.record(&push(1, "a", "x"));
        let mut right = PushTally::new();
        right.record(&push(1, "a", "x"));
        right.record(&push(2, "a", "x"));

        let merged = left.merge(right);
        assert_eq!(merged.counts().get("a/x"), Some(&2));
    }
}

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::encode::EncodedEvent;

/// Collapses repeated observations of the same event id.
///
/// The kept line for an id is the lexicographically smallest one seen, so the result does not
/// depend on arrival order or on how partial results are grouped before [`Deduplicator::merge`].
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Deduplicator {
    kept: BTreeMap<u64, String>,
    duplicates: usize,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when `id` had not been seen before.
    pub fn insert(&mut self, id: u64, line: String) -> bool {
        match self.kept.entry(id) {
            Entry::Vacant(slot) => {
                slot.insert(line);
                true
            }
            Entry::Occupied(mut slot) => {
                self.duplicates += 1;
                if line < *slot.get() {
                    slot.insert(line);
                }
                false
            }
        }
    }

    pub fn insert_event(&mut self, event: EncodedEvent) -> bool {
        self.insert(event.id, event.line)
    }

    pub fn merge(mut self, other: Deduplicator) -> Deduplicator {
        self.duplicates += other.duplicates;
        for (id, line) in other.kept {
            self.insert(id, line);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.kept.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }

    /// Number of observations dropped so far.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &str)> + '_ {
        self.kept.iter().map(|(id, line)| (*id, line.as_str()))
    }

    /// One pair per distinct id, in ascending id order.
    pub fn into_pairs(self) -> Vec<(u64, String)> {
        self.kept.into_iter().collect()
    }
}

impl Extend<EncodedEvent> for Deduplicator {
    fn extend<T: IntoIterator<Item = EncodedEvent>>(&mut self, iter: T) {
        for event in iter {
            self.insert_event(event);
        }
    }
}

impl FromIterator<(u64, String)> for Deduplicator {
    fn from_iter<T: IntoIterator<Item = (u64, String)>>(iter: T) -> Self {
        let mut dedup = Deduplicator::new();
        for (id, line) in iter {
            dedup.insert(id, line);
        }
        dedup
    }
}

pub fn dedup<I>(pairs: I) -> Vec<(u64, String)>
where
    I: IntoIterator<Item = (u64, String)>,
{
    pairs.into_iter().collect::<Deduplicator>().into_pairs()
}

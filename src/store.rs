use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::record::Read;

/// In-memory collection of reads keyed by identifier, iterated in order of first appearance.
///
/// Re-inserting an identifier keeps its original position and replaces the stored sequence and
/// quality, the same way an ordinary insertion-ordered map behaves.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordStore {
    by_id: IndexMap<String, (String, String)>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a read. Returns true if a read with the same identifier was already present.
    pub fn insert(&mut self, read: Read) -> bool {
        match self.by_id.entry(read.id) {
            Entry::Occupied(mut e) => {
                e.insert((read.seq, read.qual));
                true
            }
            Entry::Vacant(e) => {
                e.insert((read.seq, read.qual));
                false
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<(&str, &str)> {
        self.by_id
            .get(id)
            .map(|(seq, qual)| (seq.as_str(), qual.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Iterates over the stored reads, in order of first appearance.
    pub fn reads(&self) -> impl ExactSizeIterator<Item = Read> + '_ {
        self.by_id
            .iter()
            .map(|(id, (seq, qual))| Read::new(id.as_str(), seq.as_str(), qual.as_str()))
    }
}

impl FromIterator<Read> for RecordStore {
    fn from_iter<I: IntoIterator<Item = Read>>(iter: I) -> Self {
        let mut store = RecordStore::new();
        iter.into_iter().for_each(|r| {
            store.insert(r);
        });
        store
    }
}

impl IntoIterator for RecordStore {
    type Item = Read;
    type IntoIter = std::iter::Map<
        indexmap::map::IntoIter<String, (String, String)>,
        fn((String, (String, String))) -> Read,
    >;

    fn into_iter(self) -> Self::IntoIter {
        self.by_id
            .into_iter()
            .map(into_read as fn((String, (String, String))) -> Read)
    }
}

fn into_read((id, (seq, qual)): (String, (String, String))) -> Read {
    Read { id, seq, qual }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_insertion_order() {
        let store: RecordStore = [
            Read::new("b", "A", "I"),
            Read::new("a", "C", "I"),
            Read::new("c", "G", "I"),
        ]
        .into_iter()
        .collect();

        let ids: Vec<String> = store.reads().map(|r| r.id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn duplicate_keeps_position_and_replaces_value() {
        let mut store = RecordStore::new();
        assert!(!store.insert(Read::new("x", "AAAA", "IIII")));
        assert!(!store.insert(Read::new("y", "CC", "II")));
        assert!(store.insert(Read::new("x", "GG", "##")));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get("x"), Some(("GG", "##")));

        let ids: Vec<String> = store.into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["x", "y"]);
    }
}

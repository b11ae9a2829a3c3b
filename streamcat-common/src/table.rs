//! Insertion-ordered entity table
//!
//! Each row gets a sequence number when inserted. Listing walks the sequence order, lookups go
//! through the id map, and removal is O(log n).

use std::collections::{BTreeMap, HashMap};

#[derive(Debug)]
struct Row<T> {
    seq: u64,
    value: T,
}

#[derive(Debug)]
pub(crate) struct Table<T> {
    next_seq: u64,
    order: BTreeMap<u64, String>,
    rows: HashMap<String, Row<T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            next_seq: 0,
            order: BTreeMap::new(),
            rows: HashMap::new(),
        }
    }
}

impl<T> Table<T> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rows.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.rows.get(id).map(|row| &row.value)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        self.rows.get_mut(id).map(|row| &mut row.value)
    }

    pub fn seq_of(&self, id: &str) -> Option<u64> {
        self.rows.get(id).map(|row| row.seq)
    }

    pub fn by_seq(&self, seq: u64) -> Option<&T> {
        self.order.get(&seq).and_then(|id| self.get(id))
    }

    /// Insert a new row, returning its sequence number. `None` if the id is taken.
    pub fn insert(&mut self, id: String, value: T) -> Option<u64> {
        if self.rows.contains_key(&id) {
            return None;
        }
        let seq = self.next_seq;
        self.next_seq += 1;
        self.order.insert(seq, id.clone());
        self.rows.insert(id, Row { seq, value });
        Some(seq)
    }

    pub fn remove(&mut self, id: &str) -> Option<(u64, T)> {
        let row = self.rows.remove(id)?;
        self.order.remove(&row.seq);
        Some((row.seq, row.value))
    }

    /// Rows in insertion order
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.order.values().filter_map(|id| self.get(id))
    }

    /// `(seq, row)` pairs in insertion order
    pub fn entries(&self) -> impl Iterator<Item = (u64, &T)> + '_ {
        self.order
            .iter()
            .filter_map(|(seq, id)| self.get(id).map(|value| (*seq, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order_after_removal() {
        let mut table = Table::default();
        assert_eq!(table.insert("a".to_string(), 1), Some(0));
        assert_eq!(table.insert("b".to_string(), 2), Some(1));
        assert_eq!(table.insert("c".to_string(), 3), Some(2));

        assert_eq!(table.remove("b"), Some((1, 2)));
        assert_eq!(table.values().copied().collect::<Vec<_>>(), vec![1, 3]);

        // Sequence numbers are never reused
        assert_eq!(table.insert("d".to_string(), 4), Some(3));
        assert_eq!(table.values().copied().collect::<Vec<_>>(), vec![1, 3, 4]);
        assert_eq!(table.by_seq(3), Some(&4));
        assert_eq!(table.by_seq(1), None);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut table = Table::default();
        assert!(table.insert("a".to_string(), 1).is_some());
        assert!(table.insert("a".to_string(), 2).is_none());
        assert_eq!(table.get("a"), Some(&1));
        assert_eq!(table.len(), 1);
    }
}

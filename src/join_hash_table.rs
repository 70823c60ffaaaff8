//! In-memory, open-chained hash table used by the hash-join operator.
//!
//! Keyed on one attribute value per record; stores [`Rid`]s rather than
//! whole records, matching the rest of this crate's pattern of fetching
//! record bytes back through the buffer pool instead of caching them.

use crate::types::{AttrDesc, AttrType, Rid};

struct Bucket {
    key: Vec<u8>,
    rid: Rid,
    next: Option<Box<Bucket>>,
}

/// Hash table for one build-side attribute, keyed by its raw byte value.
///
/// Equality between a probe key and a stored key is always a byte
/// comparison: for `INTEGER`/`FLOAT` this is bitwise identity of the
/// fixed-width representation, and for `STRING` it is `attrLen`-byte
/// equality — both are what the source's type-dispatched comparison reduces
/// to once the value has been copied out of the record.
pub struct JoinHashTable {
    buckets: Vec<Option<Box<Bucket>>>,
    attr: AttrDesc,
}

impl JoinHashTable {
    /// Creates a hash table of `bucket_count` chains over `attr`.
    #[must_use]
    pub fn new(bucket_count: usize, attr: AttrDesc) -> Self {
        let bucket_count = bucket_count.max(1);
        let mut buckets = Vec::with_capacity(bucket_count);
        buckets.resize_with(bucket_count, || None);
        Self { buckets, attr }
    }

    fn hash(&self, key: &[u8]) -> usize {
        let bucket_count = self.buckets.len() as i64;
        let value: i64 = match self.attr.attr_type {
            AttrType::Integer => {
                let v = i32::from_le_bytes(key[0..4].try_into().expect("4-byte integer key"));
                i64::from(v).wrapping_mul(bucket_count).wrapping_mul(31)
            }
            AttrType::Float => {
                let v = f32::from_le_bytes(key[0..4].try_into().expect("4-byte float key"));
                (f64::from(v) * bucket_count as f64 * 31.0) as i64
            }
            AttrType::String => {
                let mut value: i64 = 0;
                for &byte in key {
                    value = value.wrapping_mul(31).wrapping_add(i64::from(byte));
                }
                value
            }
        };
        (value % bucket_count).unsigned_abs() as usize
    }

    fn key_bytes<'r>(&self, record: &'r [u8]) -> &'r [u8] {
        &record[self.attr.offset..self.attr.offset + self.attr.length]
    }

    /// Inserts `record`'s join-attribute value into the table, prepending a
    /// new bucket to its chain.
    pub fn build(&mut self, record: &[u8], rid: Rid) {
        let key = self.key_bytes(record).to_vec();
        let index = self.hash(&key);
        let head = self.buckets[index].take();
        self.buckets[index] = Some(Box::new(Bucket {
            key,
            rid,
            next: head,
        }));
    }

    /// Returns every rid whose stored key equals `key`, in reverse
    /// insertion order (chains prepend, so the most recently built match
    /// comes first).
    #[must_use]
    pub fn probe(&self, key: &[u8]) -> Vec<Rid> {
        let index = self.hash(key);
        let mut out = Vec::new();
        let mut bucket = self.buckets[index].as_deref();
        while let Some(b) = bucket {
            if b.key == key {
                out.push(b.rid);
            }
            bucket = b.next.as_deref();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_attr() -> AttrDesc {
        AttrDesc::new("id", 0, 4, AttrType::Integer)
    }

    fn record_for(value: i32) -> [u8; 4] {
        value.to_le_bytes()
    }

    #[test]
    fn build_size_four_probe_returns_matches_in_reverse_insertion_order() {
        let mut table = JoinHashTable::new(4, int_attr());
        let rids: Vec<Rid> = (0..4).map(|i| Rid::new(0, i)).collect();
        for (key, rid) in [1, 5, 9, 5].iter().zip(&rids) {
            table.build(&record_for(*key), *rid);
        }

        let matches = table.probe(&record_for(5));
        assert_eq!(matches, vec![rids[3], rids[1]]);
    }

    #[test]
    fn probe_with_no_match_returns_empty() {
        let mut table = JoinHashTable::new(4, int_attr());
        table.build(&record_for(1), Rid::new(0, 0));

        assert!(table.probe(&record_for(99)).is_empty());
    }

    #[test]
    fn string_keys_compare_by_fixed_length_bytes() {
        let attr = AttrDesc::new("name", 0, 8, AttrType::String);
        let mut table = JoinHashTable::new(4, attr);

        let mut a = [0u8; 8];
        a[..3].copy_from_slice(b"abc");
        let mut b = [0u8; 8];
        b[..3].copy_from_slice(b"xyz");

        table.build(&a, Rid::new(0, 0));
        table.build(&b, Rid::new(0, 1));

        assert_eq!(table.probe(&a), vec![Rid::new(0, 0)]);
        assert_eq!(table.probe(&b), vec![Rid::new(0, 1)]);
    }
}

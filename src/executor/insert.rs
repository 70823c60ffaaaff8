//! Insert operator: assembles a record from named attribute values and
//! appends it to a heap file.

use crate::catalog::RelationDesc;
use crate::error::{PoolError, Result};
use crate::heap_file::HeapFile;
use crate::types::Rid;

/// Builds a record from `values` (attribute name, raw bytes pairs) in the
/// layout `relation` describes, and inserts it into `heap`.
///
/// Every attribute in `relation` must appear exactly once in `values`, with
/// a value of the attribute's declared length.
///
/// # Errors
///
/// Returns an error if an attribute is missing, a value's length does not
/// match its attribute's declared length, or the insert fails.
pub fn insert(heap: &HeapFile, relation: &RelationDesc, values: &[(&str, &[u8])]) -> Result<Rid> {
    let mut record = vec![0u8; relation.record_len()];

    for attr in &relation.attrs {
        let Some((_, value)) = values.iter().find(|(name, _)| *name == attr.name) else {
            return Err(PoolError::BadBuffer(format!(
                "missing value for attribute '{}'",
                attr.name
            )));
        };
        if value.len() != attr.length {
            return Err(PoolError::BadBuffer(format!(
                "attribute '{}' expects {} bytes, got {}",
                attr.name,
                attr.length,
                value.len()
            )));
        }
        record[attr.offset..attr.offset + attr.length].copy_from_slice(value);
    }

    heap.insert_record(&record)
}

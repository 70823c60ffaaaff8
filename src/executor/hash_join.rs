//! Hash-join operator: builds a [`JoinHashTable`] over one relation and
//! probes it with every record of the other.

use crate::catalog::RelationDesc;
use crate::error::Result;
use crate::heap_file::HeapFile;
use crate::join_hash_table::JoinHashTable;
use crate::types::AttrDesc;

/// Joins `build_heap` and `probe_heap` on `build_attr`/`probe_attr`.
///
/// Builds the hash table over every record in `build_heap`, then probes it
/// once per record in `probe_heap`, emitting one concatenated output record
/// (probe record followed by build record) per match.
///
/// # Errors
///
/// Returns an error if either heap file fails to scan.
pub fn hash_join(
    build_heap: &HeapFile,
    build_relation: &RelationDesc,
    build_attr: &AttrDesc,
    probe_heap: &HeapFile,
    probe_attr: &AttrDesc,
) -> Result<Vec<Vec<u8>>> {
    let build_records = build_heap.scan()?;
    let bucket_count = build_records.len().max(1);
    let mut table = JoinHashTable::new(bucket_count, build_attr.clone());

    for (rid, record) in &build_records {
        table.build(record, *rid);
    }
    let by_rid: std::collections::HashMap<_, _> = build_records.into_iter().collect();

    let mut out = Vec::new();
    for (_probe_rid, probe_record) in probe_heap.scan()? {
        let key = &probe_record[probe_attr.offset..probe_attr.offset + probe_attr.length];
        for build_rid in table.probe(key) {
            if let Some(build_record) = by_rid.get(&build_rid) {
                let mut joined = probe_record.clone();
                joined.extend_from_slice(build_record);
                out.push(joined);
            }
        }
    }

    let _ = build_relation;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::buffer_pool::{BufferPool, BufferPoolConfig};
    use crate::storage::page::DiskPagedFile;
    use crate::types::AttrType;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[test]
    fn joins_matching_keys() {
        let dir = TempDir::new().unwrap();
        let build_file = Rc::new(RefCell::new(
            DiskPagedFile::open(dir.path().join("build.db")).unwrap(),
        ));
        let probe_file = Rc::new(RefCell::new(
            DiskPagedFile::open(dir.path().join("probe.db")).unwrap(),
        ));
        let pool = BufferPool::new(BufferPoolConfig { n_frames: 8 }).unwrap();

        let build_heap = HeapFile::new(build_file, &pool);
        let probe_heap = HeapFile::new(probe_file, &pool);

        let key_attr = AttrDesc::new("key", 0, 4, AttrType::Integer);
        let relation = RelationDesc::new(vec![key_attr.clone()]);

        build_heap.insert_record(&1i32.to_le_bytes()).unwrap();
        build_heap.insert_record(&2i32.to_le_bytes()).unwrap();
        probe_heap.insert_record(&2i32.to_le_bytes()).unwrap();
        probe_heap.insert_record(&3i32.to_le_bytes()).unwrap();

        let results = hash_join(
            &build_heap,
            &relation,
            &key_attr,
            &probe_heap,
            &key_attr,
        )
        .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(&results[0][0..4], &2i32.to_le_bytes());
        assert_eq!(&results[0][4..8], &2i32.to_le_bytes());
    }
}

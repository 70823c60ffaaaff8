//! Delete operator: scans a heap file and removes every record that passes
//! an optional filter.

use crate::error::Result;
use crate::executor::select::Filter;
use crate::heap_file::HeapFile;

/// Deletes every record in `heap` matching `filter`, or every record if
/// `filter` is `None`. Returns the number of records deleted.
///
/// # Errors
///
/// Returns an error if scanning or deleting fails.
pub fn delete(heap: &HeapFile, filter: Option<&Filter>) -> Result<usize> {
    let mut deleted = 0;
    for (rid, record) in heap.scan()? {
        if let Some(f) = filter {
            let slice = &record[f.attr.offset..f.attr.offset + f.attr.length];
            if !f.op.matches(slice, f.value) {
                continue;
            }
        }
        heap.delete_record(rid)?;
        deleted += 1;
    }
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::select::CompareOp;
    use crate::storage::buffer_pool::{BufferPool, BufferPoolConfig};
    use crate::storage::page::DiskPagedFile;
    use crate::types::{AttrDesc, AttrType};
    use std::cell::RefCell;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[test]
    fn deletes_only_matching_records() {
        let dir = TempDir::new().unwrap();
        let file = Rc::new(RefCell::new(
            DiskPagedFile::open(dir.path().join("t.db")).unwrap(),
        ));
        let pool = BufferPool::new(BufferPoolConfig { n_frames: 4 }).unwrap();
        let heap = HeapFile::new(file, &pool);

        let id_attr = AttrDesc::new("id", 0, 4, AttrType::Integer);
        heap.insert_record(&1i32.to_le_bytes()).unwrap();
        heap.insert_record(&2i32.to_le_bytes()).unwrap();

        let filter = Filter {
            attr: &id_attr,
            op: CompareOp::Eq,
            value: &1i32.to_le_bytes(),
        };
        let deleted = delete(&heap, Some(&filter)).unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(heap.scan().unwrap().len(), 1);
    }

    #[test]
    fn no_filter_deletes_everything() {
        let dir = TempDir::new().unwrap();
        let file = Rc::new(RefCell::new(
            DiskPagedFile::open(dir.path().join("t.db")).unwrap(),
        ));
        let pool = BufferPool::new(BufferPoolConfig { n_frames: 4 }).unwrap();
        let heap = HeapFile::new(file, &pool);
        heap.insert_record(&1i32.to_le_bytes()).unwrap();
        heap.insert_record(&2i32.to_le_bytes()).unwrap();

        assert_eq!(delete(&heap, None).unwrap(), 2);
        assert!(heap.scan().unwrap().is_empty());
    }
}

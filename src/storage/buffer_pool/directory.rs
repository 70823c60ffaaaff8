//! Page directory: maps resident pages to their frame index.
//!
//! Modeled on the join hash table's open-chained bucket array rather than
//! wrapping `std::collections::HashMap`, so the directory's bucket count and
//! collision behavior are explicit and match the rest of this crate's
//! storage layer.

use crate::storage::page::PageId;

struct Entry {
    key: PageId,
    frame: usize,
    next: Option<Box<Entry>>,
}

/// Open-chained hash table from `PageId` to frame index.
pub struct Directory {
    buckets: Vec<Option<Box<Entry>>>,
}

impl Directory {
    /// Creates a directory sized for `num_frames` resident pages.
    ///
    /// The bucket count is `ceil(1.2 * num_frames)`, leaving headroom so
    /// chains stay short under the pool's expected load factor.
    #[must_use]
    pub fn new(num_frames: usize) -> Self {
        let num_buckets = (num_frames * 6).div_ceil(5).max(1);
        let mut buckets = Vec::with_capacity(num_buckets);
        buckets.resize_with(num_buckets, || None);
        Self { buckets }
    }

    fn bucket_index(&self, key: PageId) -> usize {
        let mix = (key.file.as_usize() as u64)
            .wrapping_mul(31)
            .wrapping_add(u64::from(key.page_no));
        (mix % self.buckets.len() as u64) as usize
    }

    /// Looks up the frame index holding `key`, if resident.
    #[must_use]
    pub fn get(&self, key: PageId) -> Option<usize> {
        let idx = self.bucket_index(key);
        let mut entry = self.buckets[idx].as_deref();
        while let Some(e) = entry {
            if e.key == key {
                return Some(e.frame);
            }
            entry = e.next.as_deref();
        }
        None
    }

    /// Records that `key` is held by `frame`.
    pub fn insert(&mut self, key: PageId, frame: usize) {
        let idx = self.bucket_index(key);
        let head = self.buckets[idx].take();
        self.buckets[idx] = Some(Box::new(Entry {
            key,
            frame,
            next: head,
        }));
    }

    /// Removes `key` from the directory, if present.
    pub fn remove(&mut self, key: PageId) {
        let idx = self.bucket_index(key);
        let mut head = self.buckets[idx].take();

        let mut result = None;
        let mut rev: Option<Box<Entry>> = None;
        while let Some(mut e) = head {
            head = e.next.take();
            if e.key == key {
                result = Some(());
                continue;
            }
            e.next = rev;
            rev = Some(e);
        }
        self.buckets[idx] = rev;
        let _ = result;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::page::{FileHandle, Page, PagedFile};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct DummyFile;

    impl PagedFile for DummyFile {
        fn read_page(&mut self, _page_no: u32) -> crate::error::Result<Page> {
            Ok(Page::new())
        }
        fn write_page(&mut self, _page_no: u32, _page: &Page) -> crate::error::Result<()> {
            Ok(())
        }
        fn allocate_page(&mut self) -> crate::error::Result<u32> {
            Ok(0)
        }
        fn dispose_page(&mut self, _page_no: u32) -> crate::error::Result<()> {
            Ok(())
        }
    }

    fn handle() -> FileHandle {
        Rc::new(RefCell::new(DummyFile))
    }

    #[test]
    fn insert_then_get_round_trips() {
        let file = handle();
        let mut dir = Directory::new(4);
        let key = PageId::new(&file, 7);
        dir.insert(key, 2);
        assert_eq!(dir.get(key), Some(2));
    }

    #[test]
    fn remove_forgets_entry() {
        let file = handle();
        let mut dir = Directory::new(4);
        let key = PageId::new(&file, 7);
        dir.insert(key, 2);
        dir.remove(key);
        assert_eq!(dir.get(key), None);
    }

    #[test]
    fn chains_survive_collisions() {
        let file = handle();
        let mut dir = Directory::new(1);
        let a = PageId::new(&file, 1);
        let b = PageId::new(&file, 2);
        dir.insert(a, 0);
        dir.insert(b, 1);
        assert_eq!(dir.get(a), Some(0));
        assert_eq!(dir.get(b), Some(1));
    }
}

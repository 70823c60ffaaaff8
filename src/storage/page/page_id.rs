//! File identity for the buffer pool directory.
//!
//! The directory keys frames on `(file identity, page number)`. A file is
//! handed to the pool as a shared, non-owning `FileHandle`; its identity is
//! the address of the `Rc` allocation itself, not any field of the file, so
//! two handles to the same open file always hash and compare equal, and two
//! different files never collide even if they happen to wrap the same path.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::paged_file::PagedFile;

/// A shared, non-owning handle to an open paged file.
///
/// The buffer pool never owns a file outright; callers keep their own
/// `FileHandle` and hand clones of it to `pin`/`alloc_page`/etc.
pub type FileHandle = Rc<RefCell<dyn PagedFile>>;

/// Stable identity of a `FileHandle`, used as half of the directory's key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId(usize);

impl FileId {
    /// Computes the identity of a file handle from its allocation address.
    #[must_use]
    pub fn of(file: &FileHandle) -> Self {
        FileId(Rc::as_ptr(file) as *const () as usize)
    }

    /// Returns the raw identity value, for use as a hash-table mixing input.
    #[must_use]
    pub fn as_usize(&self) -> usize {
        self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "file@{:#x}", self.0)
    }
}

/// Identifies a single page: which file it belongs to and its page number
/// within that file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageId {
    /// Identity of the owning file.
    pub file: FileId,
    /// Page number within the file.
    pub page_no: u32,
}

impl PageId {
    /// Creates a page id from a file handle and page number.
    #[must_use]
    pub fn new(file: &FileHandle, page_no: u32) -> Self {
        Self {
            file: FileId::of(file),
            page_no,
        }
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.file, self.page_no)
    }
}

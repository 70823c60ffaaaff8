//! The `PagedFile` trait: the buffer pool's only dependency on concrete
//! storage.
//!
//! The buffer pool never opens, creates, or closes files itself; it is
//! handed a [`FileHandle`](super::FileHandle) and calls back into it to
//! read, write, allocate, and dispose of pages. This mirrors the original
//! buffer manager's relationship to its `File` collaborator: the manager
//! holds a pointer to a file object and calls `readPage`/`writePage`/
//! `allocatePage`/`disposePage` on it without knowing how pages are laid
//! out on disk.

use crate::error::Result;
use crate::storage::page::Page;

/// A source and sink of fixed-size pages, addressed by page number.
///
/// Implementations are free to back this with a single disk file, an
/// in-memory vector, or anything else; the buffer pool only depends on this
/// trait.
pub trait PagedFile {
    /// Reads the page at `page_no` into a freshly allocated `Page`.
    ///
    /// # Errors
    ///
    /// Returns an error if `page_no` has never been allocated, or the
    /// underlying I/O fails.
    fn read_page(&mut self, page_no: u32) -> Result<Page>;

    /// Writes `page`'s contents to `page_no`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying I/O fails.
    fn write_page(&mut self, page_no: u32, page: &Page) -> Result<()>;

    /// Allocates a new page and returns its page number.
    ///
    /// The page is not guaranteed to contain any particular content until
    /// it is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be extended.
    fn allocate_page(&mut self) -> Result<u32>;

    /// Releases the space occupied by `page_no` back to the file.
    ///
    /// # Errors
    ///
    /// Returns an error if `page_no` was never allocated, or the underlying
    /// I/O fails.
    fn dispose_page(&mut self, page_no: u32) -> Result<()>;
}

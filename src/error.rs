//! Error types for buffer pool and join hash table operations.

use thiserror::Error;

/// Result type alias using [`PoolError`].
pub type Result<T> = std::result::Result<T, PoolError>;

/// Closed error taxonomy for the buffer pool and join hash table.
///
/// Every variant corresponds to one of the status codes returned by the
/// original buffer manager's `allocBuf`/`readPage`/`unPinPage`/`flushFile`
/// family of calls: `OK` is simply `Ok(())`/`Ok(value)`, everything else
/// becomes one of these variants.
#[derive(Debug, Error)]
pub enum PoolError {
    /// No frame could be found to host a new page; every frame is pinned.
    #[error("buffer pool exceeded: all frames are pinned")]
    BufferExceeded,

    /// `unPinPage`/`flushFile` was called on a page whose pin count is
    /// already zero.
    #[error("page is not pinned")]
    PageNotPinned,

    /// `disposePage`/`flushFile` was asked to act on a page that is still
    /// pinned by at least one caller.
    #[error("page is pinned")]
    PagePinned,

    /// A probe found no matching record in the join hash table.
    #[error("no matching entry in hash table")]
    HashNotFound,

    /// The join hash table could not allocate a bucket.
    #[error("hash table allocation error")]
    HashTblError,

    /// A directory or frame-table invariant was violated; the buffer pool
    /// is in a state that should be unreachable.
    #[error("bad buffer: {0}")]
    BadBuffer(String),

    /// The underlying file reached end-of-file on a read that was expected
    /// to return a full page.
    #[error("unexpected end of file")]
    FileEof,

    /// Any other I/O failure surfaced by the underlying paged file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

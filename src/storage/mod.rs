//! Storage layer: pages, paged files, and the buffer pool that caches them.
//!
//! No database-wide header or catalog persistence lives here; the pool is
//! purely a cache and all durable state lives in the paged files managed by
//! [`page`].

pub mod buffer_pool;
pub mod page;

pub use buffer_pool::{BufferFrame, BufferPool, BufferPoolConfig, FrameRef, PoolStats};
pub use page::{DiskPagedFile, FileHandle, FileId, Page, PageId, PagedFile, PAGE_SIZE};

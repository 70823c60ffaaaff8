//! Buffer pool: frame table, page directory, and clock eviction.
//!
//! The pool mediates between on-disk paged files and callers that want to
//! read and modify pages in place. It is single-threaded: all state is
//! `RefCell`-guarded rather than lock-guarded, matching the cooperative,
//! one-actor-at-a-time scheduling model the rest of this crate assumes.
//!
//! # Example
//!
//! ```ignore
//! let pool = BufferPool::new(BufferPoolConfig { n_frames: 16 })?;
//! let frame = pool.alloc_page(&file)?;
//! let (page_no, frame_ref) = frame;
//! frame_ref.bytes_mut(&pool)[0] = b'A';
//! pool.unpin_page(&file, page_no, true)?;
//! ```

mod buffer_frame;
mod directory;
mod eviction;

pub use buffer_frame::BufferFrame;
pub use directory::Directory;
pub use eviction::Clock;

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;

use log::{debug, error, warn};

use crate::error::{PoolError, Result};
use crate::storage::page::{FileHandle, FileId, Page, PageId, PAGE_SIZE};

/// Constructor-level configuration for a [`BufferPool`].
#[derive(Debug, Clone, Copy)]
pub struct BufferPoolConfig {
    /// Number of frames in the pool. Must be at least 1.
    pub n_frames: usize,
}

/// Advisory, non-persisted statistics about pool activity.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoolStats {
    /// Pages read from the file layer on a directory miss.
    pub disk_reads: u64,
    /// Pages written back to the file layer, on eviction or flush.
    pub disk_writes: u64,
    /// Clock-hand advances, whether or not they found a victim.
    pub scanned: u64,
    /// `ref_bit` clears performed during eviction sweeps.
    pub ref_clears: u64,
}

/// A pinned frame, returned by [`BufferPool::read_page`] and
/// [`BufferPool::alloc_page`].
///
/// `FrameRef` is a bare index; it borrows the underlying frame's bytes only
/// for the duration of a [`FrameRef::bytes`]/[`FrameRef::bytes_mut`] call,
/// rather than holding a live reference for its own lifetime. This keeps a
/// second `read_page` on a different page from being blocked by an
/// outstanding `FrameRef`, at the cost of callers having to pass `&pool`
/// back in to touch the bytes.
#[derive(Debug, Clone, Copy)]
pub struct FrameRef(usize);

impl FrameRef {
    /// The frame-table index this reference points at.
    #[must_use]
    pub fn frame_no(&self) -> usize {
        self.0
    }

    /// Borrows the frame's page bytes, read-only.
    #[must_use]
    pub fn bytes<'a>(&self, pool: &'a BufferPool) -> Ref<'a, [u8; PAGE_SIZE]> {
        Ref::map(pool.frames[self.0].borrow(), |f| f.data.bytes())
    }

    /// Borrows the frame's page bytes, mutably.
    ///
    /// This does not itself mark the frame dirty; callers must still call
    /// [`BufferPool::unpin_page`] with `dirty = true`.
    #[must_use]
    pub fn bytes_mut<'a>(&self, pool: &'a BufferPool) -> RefMut<'a, [u8; PAGE_SIZE]> {
        RefMut::map(pool.frames[self.0].borrow_mut(), |f| f.data.bytes_mut())
    }
}

/// Fixed-capacity page cache sitting in front of one or more [`PagedFile`]s.
///
/// [`PagedFile`]: crate::storage::page::PagedFile
pub struct BufferPool {
    frames: Vec<RefCell<BufferFrame>>,
    directory: RefCell<Directory>,
    clock: RefCell<Clock>,
    n_frames: usize,
    disk_reads: Cell<u64>,
    disk_writes: Cell<u64>,
}

impl BufferPool {
    /// Creates a pool with `config.n_frames` frames, all initially empty.
    ///
    /// # Errors
    ///
    /// Returns an error if `n_frames` is 0.
    pub fn new(config: BufferPoolConfig) -> Result<Self> {
        if config.n_frames == 0 {
            return Err(PoolError::BadBuffer(
                "n_frames must be at least 1".to_string(),
            ));
        }

        let frames = (0..config.n_frames)
            .map(|i| RefCell::new(BufferFrame::new(i)))
            .collect();

        Ok(Self {
            frames,
            directory: RefCell::new(Directory::new(config.n_frames)),
            clock: RefCell::new(Clock::new(config.n_frames)),
            n_frames: config.n_frames,
            disk_reads: Cell::new(0),
            disk_writes: Cell::new(0),
        })
    }

    /// Number of frames in the pool.
    #[must_use]
    pub fn n_frames(&self) -> usize {
        self.n_frames
    }

    /// Resolves and pins a page, loading it from `file` on a directory miss.
    ///
    /// # Errors
    ///
    /// Returns `BUFFER_EXCEEDED` if every frame is pinned, or whatever the
    /// file layer reports on a miss.
    pub fn read_page(&self, file: &FileHandle, page_no: u32) -> Result<FrameRef> {
        let key = PageId::new(file, page_no);

        if let Some(frame_no) = self.directory.borrow().get(key) {
            let mut frame = self.frames[frame_no].borrow_mut();
            frame.ref_bit = true;
            frame.pin_count += 1;
            return Ok(FrameRef(frame_no));
        }

        let frame_no = self.evict_frame()?;
        let page = {
            let page = file.borrow_mut().read_page(page_no)?;
            self.disk_reads.set(self.disk_reads.get() + 1);
            page
        };

        self.frames[frame_no]
            .borrow_mut()
            .set(Rc::clone(file), page_no, page);
        self.directory.borrow_mut().insert(key, frame_no);

        Ok(FrameRef(frame_no))
    }

    /// Unpins a previously pinned page.
    ///
    /// `dirty` is ORed into the frame's dirty flag; a clean unpin never
    /// undoes a prior dirty one.
    ///
    /// # Errors
    ///
    /// `PAGE_NOT_PINNED` if the frame's pin count is already 0.
    /// `HASH_NOT_FOUND` if the page is not resident.
    pub fn unpin_page(&self, file: &FileHandle, page_no: u32, dirty: bool) -> Result<()> {
        let key = PageId::new(file, page_no);
        let frame_no = self
            .directory
            .borrow()
            .get(key)
            .ok_or(PoolError::HashNotFound)?;

        let mut frame = self.frames[frame_no].borrow_mut();
        if frame.pin_count == 0 {
            return Err(PoolError::PageNotPinned);
        }
        frame.pin_count -= 1;
        if dirty {
            frame.dirty = true;
        }
        Ok(())
    }

    /// Allocates a new page in `file` and pins it.
    ///
    /// The returned bytes are uninitialised; the caller must write them
    /// before unpinning with `dirty = true`.
    ///
    /// # Errors
    ///
    /// Returns whatever the file layer reports, or `BUFFER_EXCEEDED`.
    pub fn alloc_page(&self, file: &FileHandle) -> Result<(u32, FrameRef)> {
        let page_no = file.borrow_mut().allocate_page()?;
        let frame_no = self.evict_frame()?;

        self.frames[frame_no]
            .borrow_mut()
            .set(Rc::clone(file), page_no, Page::new());
        let key = PageId::new(file, page_no);
        self.directory.borrow_mut().insert(key, frame_no);

        Ok((page_no, FrameRef(frame_no)))
    }

    /// Disposes of a page in `file`.
    ///
    /// # Errors
    ///
    /// `PAGE_PINNED` if the page is resident and pinned. Otherwise whatever
    /// the file layer reports.
    pub fn dispose_page(&self, file: &FileHandle, page_no: u32) -> Result<()> {
        let key = PageId::new(file, page_no);

        if let Some(frame_no) = self.directory.borrow().get(key) {
            let mut frame = self.frames[frame_no].borrow_mut();
            if frame.pin_count > 0 {
                return Err(PoolError::PagePinned);
            }
            frame.clear();
            drop(frame);
            self.directory.borrow_mut().remove(key);
        }

        file.borrow_mut().dispose_page(page_no)?;
        Ok(())
    }

    /// Writes back and evicts every resident page belonging to `file`.
    ///
    /// # Errors
    ///
    /// `PAGE_PINNED` if any matching frame is still pinned. `BAD_BUFFER` if
    /// an invalid frame still claims `file` (invariant violation).
    pub fn flush_file(&self, file: &FileHandle) -> Result<()> {
        let target = FileId::of(file);

        for frame_no in 0..self.n_frames {
            let belongs_to_target = {
                let frame = self.frames[frame_no].borrow();
                frame
                    .file
                    .as_ref()
                    .is_some_and(|f| FileId::of(f) == target)
            };
            if !belongs_to_target {
                continue;
            }

            let mut frame = self.frames[frame_no].borrow_mut();
            if !frame.valid {
                error!("frame {frame_no} tagged with {target} but invalid");
                return Err(PoolError::BadBuffer(format!(
                    "frame {frame_no} invalid but still tagged with {target}"
                )));
            }
            if frame.pin_count > 0 {
                return Err(PoolError::PagePinned);
            }

            let page_no = frame.page_no;
            if frame.dirty {
                file.borrow_mut().write_page(page_no, &frame.data)?;
                self.disk_writes.set(self.disk_writes.get() + 1);
            }
            frame.clear();
            drop(frame);

            self.directory.borrow_mut().remove(PageId {
                file: target,
                page_no,
            });
        }

        Ok(())
    }

    /// Dumps the frame table to the log at debug level.
    pub fn print_self(&self) {
        for (idx, frame_cell) in self.frames.iter().enumerate() {
            let frame = frame_cell.borrow();
            debug!(
                "frame {idx}: valid={} dirty={} ref_bit={} pin_count={} page_no={}",
                frame.valid, frame.dirty, frame.ref_bit, frame.pin_count, frame.page_no
            );
        }
    }

    /// Snapshot of the pool's advisory statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        let clock = self.clock.borrow();
        PoolStats {
            disk_reads: self.disk_reads.get(),
            disk_writes: self.disk_writes.get(),
            scanned: clock.scanned(),
            ref_clears: clock.ref_clears(),
        }
    }

    /// Finds an empty frame, or evicts an unpinned one via the clock sweep.
    ///
    /// A dirty victim is written back before its frame is handed out; a
    /// failed write-back leaves the frame installed and propagates the
    /// error.
    fn evict_frame(&self) -> Result<usize> {
        let mut clock = self.clock.borrow_mut();
        let max_scans = 2 * self.n_frames;

        for _ in 0..max_scans {
            let idx = clock.advance(self.n_frames);
            let mut frame = self.frames[idx].borrow_mut();

            if !frame.valid {
                return Ok(idx);
            }
            if frame.ref_bit {
                frame.ref_bit = false;
                clock.record_ref_clear();
                continue;
            }
            if frame.pin_count > 0 {
                continue;
            }

            let file = frame.file.clone().expect("valid frame has a file");
            let page_no = frame.page_no;
            self.directory.borrow_mut().remove(PageId {
                file: FileId::of(&file),
                page_no,
            });
            if frame.dirty {
                file.borrow_mut().write_page(page_no, &frame.data)?;
                self.disk_writes.set(self.disk_writes.get() + 1);
                debug!("evicted dirty frame {idx} file={} page={page_no}", FileId::of(&file));
            }
            return Ok(idx);
        }

        Err(PoolError::BufferExceeded)
    }
}

impl Drop for BufferPool {
    fn drop(&mut self) {
        for frame_cell in &self.frames {
            let frame = frame_cell.borrow();
            if !frame.valid || !frame.dirty {
                continue;
            }
            let Some(file) = frame.file.clone() else {
                continue;
            };
            if let Err(e) = file.borrow_mut().write_page(frame.page_no, &frame.data) {
                warn!(
                    "buffer pool teardown: failed to flush frame {} page {}: {e}",
                    frame.frame_no, frame.page_no
                );
            }
        }
    }
}

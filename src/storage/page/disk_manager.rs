//! Single-file, on-disk implementation of [`PagedFile`].

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::{PoolError, Result};
use crate::storage::page::{Page, PagedFile, PAGE_SIZE};

/// A [`PagedFile`] backed by a single regular file on disk.
///
/// Pages are stored back-to-back at `page_no * PAGE_SIZE`. Unlike a cache
/// that tolerates sparse reads, a read past the file's current extent is a
/// hard error ([`PoolError::FileEof`]): callers are expected to allocate a
/// page before reading it, and a read past the end almost always means a
/// directory or caller bug rather than a legitimately empty page.
pub struct DiskPagedFile {
    path: PathBuf,
    file: File,
    num_pages: u32,
}

impl DiskPagedFile {
    /// Opens or creates a database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its length cannot
    /// be read.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let file_len = file.metadata()?.len();
        let num_pages = file_len.div_ceil(PAGE_SIZE as u64) as u32;

        Ok(Self {
            path,
            file,
            num_pages,
        })
    }

    /// Returns the path to the underlying file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of pages currently allocated in the file.
    #[must_use]
    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    /// Flushes buffered writes to the operating system.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying sync fails.
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    fn offset(page_no: u32) -> u64 {
        u64::from(page_no) * PAGE_SIZE as u64
    }
}

impl PagedFile for DiskPagedFile {
    fn read_page(&mut self, page_no: u32) -> Result<Page> {
        if page_no >= self.num_pages {
            return Err(PoolError::FileEof);
        }

        self.file.seek(SeekFrom::Start(Self::offset(page_no)))?;
        let mut data = [0u8; PAGE_SIZE];
        match self.file.read_exact(&mut data) {
            Ok(()) => Ok(Page::from_bytes(data)),
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => Err(PoolError::FileEof),
            Err(e) => Err(PoolError::Io(e)),
        }
    }

    fn write_page(&mut self, page_no: u32, page: &Page) -> Result<()> {
        if page_no >= self.num_pages {
            return Err(PoolError::FileEof);
        }
        self.file.seek(SeekFrom::Start(Self::offset(page_no)))?;
        self.file.write_all(page.bytes())?;
        Ok(())
    }

    fn allocate_page(&mut self) -> Result<u32> {
        let page_no = self.num_pages;
        self.num_pages += 1;
        let new_size = Self::offset(self.num_pages);
        self.file.set_len(new_size)?;
        debug!("allocated page {page_no} in {}", self.path.display());
        Ok(page_no)
    }

    fn dispose_page(&mut self, page_no: u32) -> Result<()> {
        if page_no >= self.num_pages {
            return Err(PoolError::FileEof);
        }
        debug!("disposed page {page_no} in {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_file() -> (DiskPagedFile, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.db");
        let file = DiskPagedFile::open(&path).unwrap();
        (file, temp_dir)
    }

    #[test]
    fn allocate_and_read_write() {
        let (mut file, _temp) = create_test_file();
        let page_no = file.allocate_page().unwrap();
        assert_eq!(page_no, 0);

        let mut page = Page::new();
        page.bytes_mut()[0] = 42;
        file.write_page(page_no, &page).unwrap();

        let read_back = file.read_page(page_no).unwrap();
        assert_eq!(read_back.bytes()[0], 42);
    }

    #[test]
    fn read_past_extent_is_eof_error() {
        let (mut file, _temp) = create_test_file();
        match file.read_page(0) {
            Err(PoolError::FileEof) => {}
            other => panic!("expected FileEof, got {other:?}"),
        }
    }

    #[test]
    fn persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.db");

        {
            let mut file = DiskPagedFile::open(&path).unwrap();
            let page_no = file.allocate_page().unwrap();
            let mut page = Page::new();
            page.bytes_mut()[0..4].copy_from_slice(&[1, 2, 3, 4]);
            file.write_page(page_no, &page).unwrap();
            file.sync().unwrap();
        }

        {
            let mut file = DiskPagedFile::open(&path).unwrap();
            assert_eq!(file.num_pages(), 1);
            let page = file.read_page(0).unwrap();
            assert_eq!(&page.bytes()[0..4], &[1, 2, 3, 4]);
        }
    }
}

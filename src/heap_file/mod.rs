//! Minimal heap file: variable-length records over pages pinned through the
//! buffer pool.
//!
//! This is an interface-level stand-in for the out-of-scope record-layout
//! and scan-cursor machinery; it exists to give the buffer pool a realistic
//! caller that pins, mutates, and unpins pages. Pages use a simple slotted
//! layout: a two-field header (slot count, free-space offset) followed by
//! record bytes growing from the front and a slot directory growing
//! backward from the tail. A slot with length 0 is a tombstone left by
//! `delete_record`.

use std::cell::Cell;

use crate::error::{PoolError, Result};
use crate::storage::buffer_pool::BufferPool;
use crate::storage::page::{FileHandle, PAGE_SIZE};
use crate::types::Rid;

const HEADER_LEN: usize = 4;
const SLOT_LEN: usize = 4;

fn read_u16(bytes: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([bytes[at], bytes[at + 1]])
}

fn write_u16(bytes: &mut [u8], at: usize, value: u16) {
    bytes[at..at + 2].copy_from_slice(&value.to_le_bytes());
}

struct PageHeader {
    num_slots: u16,
    free_space_start: u16,
}

impl PageHeader {
    fn read(bytes: &[u8]) -> Self {
        Self {
            num_slots: read_u16(bytes, 0),
            free_space_start: read_u16(bytes, 2),
        }
    }

    fn write(&self, bytes: &mut [u8]) {
        write_u16(bytes, 0, self.num_slots);
        write_u16(bytes, 2, self.free_space_start);
    }

    fn slot_dir_start(&self) -> usize {
        PAGE_SIZE - usize::from(self.num_slots) * SLOT_LEN
    }

    fn free_bytes(&self) -> usize {
        self.slot_dir_start() - usize::from(self.free_space_start)
    }
}

fn slot_at(bytes: &[u8], slot_no: u16) -> (u16, u16) {
    let at = PAGE_SIZE - usize::from(slot_no + 1) * SLOT_LEN;
    (read_u16(bytes, at), read_u16(bytes, at + 2))
}

fn write_slot(bytes: &mut [u8], slot_no: u16, offset: u16, length: u16) {
    let at = PAGE_SIZE - usize::from(slot_no + 1) * SLOT_LEN;
    write_u16(bytes, at, offset);
    write_u16(bytes, at + 2, length);
}

/// A heap file: a dedicated paged file holding one relation's records.
pub struct HeapFile<'a> {
    file: FileHandle,
    pool: &'a BufferPool,
    num_pages: Cell<u32>,
}

impl<'a> HeapFile<'a> {
    /// Wraps a freshly opened, empty paged file as a heap file.
    #[must_use]
    pub fn new(file: FileHandle, pool: &'a BufferPool) -> Self {
        Self {
            file,
            pool,
            num_pages: Cell::new(0),
        }
    }

    fn alloc_heap_page(&self) -> Result<u32> {
        let (page_no, frame_ref) = self.pool.alloc_page(&self.file)?;
        {
            let mut bytes = frame_ref.bytes_mut(self.pool);
            PageHeader {
                num_slots: 0,
                free_space_start: HEADER_LEN as u16,
            }
            .write(&mut bytes[..]);
        }
        self.pool.unpin_page(&self.file, page_no, true)?;
        self.num_pages.set(self.num_pages.get() + 1);
        Ok(page_no)
    }

    /// Inserts a record, appending to the last page if it has room or
    /// allocating a new page otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is larger than a page can ever hold,
    /// or if the buffer pool or file layer fails.
    pub fn insert_record(&self, record: &[u8]) -> Result<Rid> {
        let needed = record.len() + SLOT_LEN;
        if needed > PAGE_SIZE - HEADER_LEN {
            return Err(PoolError::BadBuffer(format!(
                "record of {} bytes does not fit in a {PAGE_SIZE}-byte page",
                record.len()
            )));
        }

        if self.num_pages.get() == 0 {
            self.alloc_heap_page()?;
        }

        let page_no = self.num_pages.get() - 1;
        let frame_ref = self.pool.read_page(&self.file, page_no)?;
        let fits = {
            let bytes = frame_ref.bytes(self.pool);
            PageHeader::read(&bytes[..]).free_bytes() >= needed
        };

        if !fits {
            self.pool.unpin_page(&self.file, page_no, false)?;
            let page_no = self.alloc_heap_page()?;
            return self.insert_into_page(page_no, record);
        }

        self.pool.unpin_page(&self.file, page_no, false)?;
        self.insert_into_page(page_no, record)
    }

    fn insert_into_page(&self, page_no: u32, record: &[u8]) -> Result<Rid> {
        let frame_ref = self.pool.read_page(&self.file, page_no)?;
        let slot_no = {
            let mut bytes = frame_ref.bytes_mut(self.pool);
            let mut header = PageHeader::read(&bytes[..]);
            let offset = header.free_space_start;
            bytes[usize::from(offset)..usize::from(offset) + record.len()]
                .copy_from_slice(record);

            let slot_no = header.num_slots;
            header.num_slots += 1;
            header.free_space_start += u16::try_from(record.len()).unwrap_or(u16::MAX);
            header.write(&mut bytes[..]);
            write_slot(&mut bytes[..], slot_no, offset, u16::try_from(record.len()).unwrap_or(u16::MAX));
            slot_no
        };
        self.pool.unpin_page(&self.file, page_no, true)?;
        Ok(Rid::new(page_no, slot_no))
    }

    /// Reads a record by its record identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the page or slot does not exist, or the slot has
    /// been deleted.
    pub fn get_record(&self, rid: Rid) -> Result<Vec<u8>> {
        let frame_ref = self.pool.read_page(&self.file, rid.page_no)?;
        let result = {
            let bytes = frame_ref.bytes(self.pool);
            let header = PageHeader::read(&bytes[..]);
            if rid.slot_no >= header.num_slots {
                None
            } else {
                let (offset, length) = slot_at(&bytes[..], rid.slot_no);
                if length == 0 {
                    None
                } else {
                    Some(bytes[usize::from(offset)..usize::from(offset + length)].to_vec())
                }
            }
        };
        self.pool.unpin_page(&self.file, rid.page_no, false)?;
        result.ok_or_else(|| PoolError::BadBuffer(format!("no record at {rid}")))
    }

    /// Deletes a record by marking its slot as a tombstone.
    ///
    /// # Errors
    ///
    /// Returns an error if the page or slot does not exist.
    pub fn delete_record(&self, rid: Rid) -> Result<()> {
        let frame_ref = self.pool.read_page(&self.file, rid.page_no)?;
        let found = {
            let mut bytes = frame_ref.bytes_mut(self.pool);
            let header = PageHeader::read(&bytes[..]);
            if rid.slot_no >= header.num_slots {
                false
            } else {
                let (offset, _) = slot_at(&bytes[..], rid.slot_no);
                write_slot(&mut bytes[..], rid.slot_no, offset, 0);
                true
            }
        };
        self.pool.unpin_page(&self.file, rid.page_no, found)?;
        if found {
            Ok(())
        } else {
            Err(PoolError::BadBuffer(format!("no record at {rid}")))
        }
    }

    /// Returns every live (non-deleted) record, in page/slot order.
    ///
    /// # Errors
    ///
    /// Returns an error if a page fails to pin.
    pub fn scan(&self) -> Result<Vec<(Rid, Vec<u8>)>> {
        let mut out = Vec::new();
        for page_no in 0..self.num_pages.get() {
            let frame_ref = self.pool.read_page(&self.file, page_no)?;
            {
                let bytes = frame_ref.bytes(self.pool);
                let header = PageHeader::read(&bytes[..]);
                for slot_no in 0..header.num_slots {
                    let (offset, length) = slot_at(&bytes[..], slot_no);
                    if length == 0 {
                        continue;
                    }
                    let data = bytes[usize::from(offset)..usize::from(offset + length)].to_vec();
                    out.push((Rid::new(page_no, slot_no), data));
                }
            }
            self.pool.unpin_page(&self.file, page_no, false)?;
        }
        Ok(out)
    }
}

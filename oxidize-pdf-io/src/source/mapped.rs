//! Memory-mapped byte source
//!
//! Uses OS-level memory mapping to address large files without reading them
//! into memory up front.

use super::array::{slice_get, slice_get_range};
use super::ByteSource;
use crate::error::{PdfIoError, Result};
use memmap2::Mmap;
use std::fs::File;

/// Source over a read-only memory map of a file
#[derive(Debug)]
pub struct MappedSource {
    map: Option<Mmap>,
}

impl MappedSource {
    /// Map `file` into memory.
    ///
    /// The file must not be modified while the map is alive.
    pub fn new(file: &File) -> Result<Self> {
        // SAFETY: the map is read-only and callers are documented not to
        // truncate the file while it is mapped
        let map = unsafe { Mmap::map(file)? };
        Ok(Self { map: Some(map) })
    }

    fn bytes(&self) -> Result<&[u8]> {
        self.map.as_deref().ok_or(PdfIoError::SourceClosed)
    }
}

impl ByteSource for MappedSource {
    fn get(&mut self, position: u64) -> Result<Option<u8>> {
        Ok(slice_get(self.bytes()?, position))
    }

    fn get_range(&mut self, position: u64, dest: &mut [u8]) -> Result<Option<usize>> {
        Ok(slice_get_range(self.bytes()?, position, dest))
    }

    fn length(&self) -> Result<u64> {
        Ok(self.bytes()?.len() as u64)
    }

    fn close(&mut self) -> Result<()> {
        self.map = None;
        Ok(())
    }
}

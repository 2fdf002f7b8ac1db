//! Sub-range view of another source

use super::ByteSource;
use crate::error::{PdfIoError, Result};

/// Exposes `length` bytes of a backing source starting at `offset`, with
/// positions re-addressed from zero.
///
/// Closing the window closes the backing source.
#[derive(Debug)]
pub struct WindowSource<S: ByteSource = Box<dyn ByteSource>> {
    backing: S,
    offset: u64,
    length: u64,
    closed: bool,
}

impl<S: ByteSource> WindowSource<S> {
    /// Window of `length` bytes at `offset`
    pub fn new(backing: S, offset: u64, length: u64) -> Self {
        Self {
            backing,
            offset,
            length,
            closed: false,
        }
    }

    /// Window from `offset` to the end of the backing source
    pub fn from_offset(backing: S, offset: u64) -> Result<Self> {
        let length = backing.length()?.saturating_sub(offset);
        Ok(Self::new(backing, offset, length))
    }

    /// Offset of the window in the backing source
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Consume the window, returning the backing source
    pub fn into_inner(self) -> S {
        self.backing
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(PdfIoError::SourceClosed);
        }
        Ok(())
    }
}

impl<S: ByteSource> ByteSource for WindowSource<S> {
    fn get(&mut self, position: u64) -> Result<Option<u8>> {
        self.ensure_open()?;
        if position >= self.length {
            return Ok(None);
        }
        self.backing.get(self.offset + position)
    }

    fn get_range(&mut self, position: u64, dest: &mut [u8]) -> Result<Option<usize>> {
        self.ensure_open()?;
        if position >= self.length {
            return Ok(None);
        }
        let count = (self.length - position).min(dest.len() as u64) as usize;
        self.backing
            .get_range(self.offset + position, &mut dest[..count])
    }

    fn length(&self) -> Result<u64> {
        Ok(self.length)
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.backing.close()
    }
}

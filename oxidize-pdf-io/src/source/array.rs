//! In-memory byte source

use super::ByteSource;
use crate::error::{PdfIoError, Result};
use std::sync::Arc;

/// Source backed by an in-memory byte sequence
#[derive(Debug, Clone)]
pub struct ArraySource {
    data: Option<Arc<[u8]>>,
}

impl ArraySource {
    /// Create a source over `data`
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            data: Some(data.into()),
        }
    }

    fn bytes(&self) -> Result<&[u8]> {
        self.data.as_deref().ok_or(PdfIoError::SourceClosed)
    }
}

impl ByteSource for ArraySource {
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
        self.data = None;
        Ok(())
    }
}

/// Byte of `data` at `position`, `None` past the end
pub(crate) fn slice_get(data: &[u8], position: u64) -> Option<u8> {
    usize::try_from(position)
        .ok()
        .and_then(|index| data.get(index))
        .copied()
}

/// Copy as much of `data[position..]` as fits into `dest`
pub(crate) fn slice_get_range(data: &[u8], position: u64, dest: &mut [u8]) -> Option<usize> {
    let start = usize::try_from(position).ok().filter(|&p| p < data.len())?;
    let count = dest.len().min(data.len() - start);
    dest[..count].copy_from_slice(&data[start..start + count]);
    Some(count)
}

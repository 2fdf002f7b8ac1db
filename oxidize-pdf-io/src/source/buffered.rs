//! Read-ahead wrapper

use super::ByteSource;
use crate::error::{PdfIoError, Result};

const MAX_BLOCK_SIZE: u64 = 4096;

/// Keeps one contiguous block of the backing source in memory.
///
/// The block holds a quarter of the backing length, at least one byte and at
/// most 4 KiB. Any read outside the cached block reloads a full block
/// starting at the requested position.
#[derive(Debug)]
pub struct BufferedSource<S: ByteSource = Box<dyn ByteSource>> {
    backing: S,
    block: Vec<u8>,
    // Absolute [start, end) of the valid cached bytes
    cached: Option<(u64, u64)>,
    length: u64,
    closed: bool,
}

impl<S: ByteSource> BufferedSource<S> {
    /// Wrap `backing` with a read-ahead block
    pub fn new(backing: S) -> Result<Self> {
        let length = backing.length()?;
        let block_size = (length / 4).clamp(1, MAX_BLOCK_SIZE) as usize;
        Ok(Self {
            backing,
            block: vec![0u8; block_size],
            cached: None,
            length,
            closed: false,
        })
    }

    /// Size of the read-ahead block
    pub fn block_size(&self) -> usize {
        self.block.len()
    }

    fn cached_slice(&self, position: u64, len: usize) -> Option<&[u8]> {
        let (start, end) = self.cached?;
        if position >= start && position + len as u64 <= end {
            let offset = (position - start) as usize;
            Some(&self.block[offset..offset + len])
        } else {
            None
        }
    }

    fn fill(&mut self, position: u64) -> Result<bool> {
        self.cached = None;
        match self.backing.get_range(position, &mut self.block)? {
            Some(count) if count > 0 => {
                self.cached = Some((position, position + count as u64));
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl<S: ByteSource> ByteSource for BufferedSource<S> {
    fn get(&mut self, position: u64) -> Result<Option<u8>> {
        if self.closed {
            return Err(PdfIoError::SourceClosed);
        }
        if position >= self.length {
            return Ok(None);
        }
        if let Some(bytes) = self.cached_slice(position, 1) {
            return Ok(Some(bytes[0]));
        }
        if !self.fill(position)? {
            return Ok(None);
        }
        Ok(Some(self.block[0]))
    }

    fn get_range(&mut self, position: u64, dest: &mut [u8]) -> Result<Option<usize>> {
        if self.closed {
            return Err(PdfIoError::SourceClosed);
        }
        if position >= self.length {
            return Ok(None);
        }
        let wanted = (self.length - position).min(dest.len() as u64) as usize;
        if let Some(bytes) = self.cached_slice(position, wanted) {
            dest[..wanted].copy_from_slice(bytes);
            return Ok(Some(wanted));
        }
        self.backing.get_range(position, dest)
    }

    fn length(&self) -> Result<u64> {
        Ok(self.length)
    }

    fn close(&mut self) -> Result<()> {
        self.cached = None;
        self.closed = true;
        self.backing.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PdfIoError;
    use crate::source::ArraySource;

    /// Counts how often the backing source is hit
    struct CountingSource {
        inner: ArraySource,
        range_reads: usize,
    }

    impl ByteSource for CountingSource {
        fn get(&mut self, position: u64) -> Result<Option<u8>> {
            self.inner.get(position)
        }

        fn get_range(&mut self, position: u64, dest: &mut [u8]) -> Result<Option<usize>> {
            self.range_reads += 1;
            self.inner.get_range(position, dest)
        }

        fn length(&self) -> Result<u64> {
            self.inner.length()
        }

        fn close(&mut self) -> Result<()> {
            self.inner.close()
        }
    }

    fn counting(data: Vec<u8>) -> CountingSource {
        CountingSource {
            inner: ArraySource::new(data),
            range_reads: 0,
        }
    }

    #[test]
    fn test_block_size_bounds() {
        let small = BufferedSource::new(ArraySource::new(b"ab".to_vec())).unwrap();
        assert_eq!(small.block_size(), 1);

        let medium = BufferedSource::new(ArraySource::new(vec![0u8; 400])).unwrap();
        assert_eq!(medium.block_size(), 100);

        let large = BufferedSource::new(ArraySource::new(vec![0u8; 100_000])).unwrap();
        assert_eq!(large.block_size(), 4096);
    }

    #[test]
    fn test_sequential_reads_hit_cache() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let mut source = BufferedSource::new(counting(data.clone())).unwrap();

        for position in 0..250u64 {
            assert_eq!(source.get(position).unwrap(), Some(data[position as usize]));
        }
        // block of 250 bytes loaded once
        assert_eq!(source.backing.range_reads, 1);

        assert_eq!(source.get(600).unwrap(), Some(data[600]));
        assert_eq!(source.backing.range_reads, 2);
    }

    #[test]
    fn test_range_read_served_from_cache_or_backing() {
        let mut source = BufferedSource::new(counting(b"0123456789abcdef".to_vec())).unwrap();
        assert_eq!(source.get(4).unwrap(), Some(b'4'));

        let mut dest = [0u8; 3];
        assert_eq!(source.get_range(5, &mut dest).unwrap(), Some(3));
        assert_eq!(&dest, b"567");
        assert_eq!(source.backing.range_reads, 1);

        let mut dest = [0u8; 8];
        assert_eq!(source.get_range(10, &mut dest).unwrap(), Some(6));
        assert_eq!(&dest[..6], b"abcdef");
        assert_eq!(source.get(16).unwrap(), None);
    }

    #[test]
    fn test_close_invalidates_cache() {
        let mut source = BufferedSource::new(ArraySource::new(b"abcdefgh".to_vec())).unwrap();
        assert_eq!(source.get(0).unwrap(), Some(b'a'));

        source.close().unwrap();
        assert!(matches!(source.get(0), Err(PdfIoError::SourceClosed)));
        assert!(matches!(source.get(100), Err(PdfIoError::SourceClosed)));
    }
}

//! Stateful reader over a byte source
//!
//! [`SourceCursor`] adds a position, a one-byte pushback slot, peeking and
//! typed multi-byte reads on top of a [`ByteSource`].

use crate::error::{PdfIoError, Result};
use crate::source::{ArraySource, ByteSource, IndependentSource, SourceHandle, SynchronizedSource};
use std::sync::Arc;

/// Cursor over a byte source.
///
/// While a byte is pushed back, [`position`](Self::position) reports one
/// less than the underlying read position. Cursors are not meant to be
/// shared between threads; create one view per thread with
/// [`create_view`](Self::create_view) instead.
#[derive(Debug)]
pub struct SourceCursor {
    source: SourceHandle,
    position: u64,
    pushback: Option<u8>,
}

impl SourceCursor {
    /// Cursor owning `source` exclusively
    pub fn new(source: impl ByteSource + 'static) -> Self {
        Self::from_handle(SourceHandle::exclusive(source))
    }

    /// Cursor over a shared source, so views can be created from it
    pub fn shared(source: impl ByteSource + 'static) -> Self {
        Self::from_handle(SourceHandle::shared(source))
    }

    /// Cursor over an in-memory byte array
    pub fn from_bytes(data: impl Into<Arc<[u8]>>) -> Self {
        Self::new(ArraySource::new(data))
    }

    pub fn from_handle(source: SourceHandle) -> Self {
        Self {
            source,
            position: 0,
            pushback: None,
        }
    }

    /// Turn an exclusive cursor into a shared one, keeping its position
    pub fn into_shared(self) -> Self {
        let source = if self.source.is_shared() {
            self.source
        } else {
            SourceHandle::Shared(self.source.into_shared())
        };
        Self {
            source,
            position: self.position,
            pushback: self.pushback,
        }
    }

    /// Check if views can be created from this cursor
    pub fn is_shared(&self) -> bool {
        self.source.is_shared()
    }

    /// New cursor at position zero over the same shared source.
    ///
    /// Closing the view does not close the source. Views can create
    /// further views of their own.
    pub fn create_view(&self) -> Result<SourceCursor> {
        Ok(SourceCursor::from_handle(SourceHandle::View(
            self.create_source_view()?,
        )))
    }

    /// Non-closing handle on the shared source
    pub fn create_source_view(&self) -> Result<IndependentSource<SynchronizedSource>> {
        self.source.view()
    }

    /// Give `byte` back so the next read returns it again
    pub fn push_back(&mut self, byte: u8) -> Result<()> {
        if self.pushback.is_some() {
            return Err(PdfIoError::PushbackOccupied {
                position: self.position(),
            });
        }
        self.pushback = Some(byte);
        Ok(())
    }

    /// Read one byte, `None` at the end of data
    pub fn read(&mut self) -> Result<Option<u8>> {
        if let Some(byte) = self.pushback.take() {
            return Ok(Some(byte));
        }
        let byte = self.source.get(self.position)?;
        if byte.is_some() {
            self.position += 1;
        }
        Ok(byte)
    }

    /// Next byte without consuming it
    pub fn peek(&mut self) -> Result<Option<u8>> {
        if let Some(byte) = self.pushback {
            return Ok(Some(byte));
        }
        self.source.get(self.position)
    }

    /// Fill `buf` with upcoming bytes without consuming them.
    ///
    /// Returns how many bytes were available.
    pub fn peek_into(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let mut count = 0;
        if let Some(byte) = self.pushback {
            buf[0] = byte;
            count = 1;
        }
        if count < buf.len() {
            if let Some(read) = self.source.get_range(self.position, &mut buf[count..])? {
                count += read;
            }
        }
        Ok(count)
    }

    /// Read up to `buf.len()` bytes, `None` when nothing is left
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<Option<usize>> {
        if buf.is_empty() {
            return Ok(Some(0));
        }
        let mut count = 0;
        if let Some(byte) = self.pushback.take() {
            buf[0] = byte;
            count = 1;
        }
        if count < buf.len() {
            match self.source.get_range(self.position, &mut buf[count..])? {
                Some(read) => {
                    self.position += read as u64;
                    count += read;
                }
                None if count == 0 => return Ok(None),
                None => {}
            }
        }
        Ok(Some(count))
    }

    /// Fill `buf` completely or fail with [`PdfIoError::EndOfData`]
    pub fn read_fully(&mut self, buf: &mut [u8]) -> Result<()> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read_into(&mut buf[filled..])? {
                Some(count) if count > 0 => filled += count,
                _ => {
                    return Err(PdfIoError::EndOfData {
                        position: self.position(),
                    })
                }
            }
        }
        Ok(())
    }

    /// Skip up to `n` bytes, clamped to the end of the source.
    ///
    /// A pushed back byte counts as one skipped byte.
    pub fn skip(&mut self, n: u64) -> Result<u64> {
        if n == 0 {
            return Ok(0);
        }
        let mut n = n;
        let mut adjust = 0;
        if self.pushback.take().is_some() {
            if n == 1 {
                return Ok(1);
            }
            n -= 1;
            adjust = 1;
        }

        let start = self.position;
        let target = start.saturating_add(n).min(self.source.length()?).max(start);
        self.seek(target);
        Ok(target.saturating_sub(start) + adjust)
    }

    /// Move to an absolute position, dropping any pushed back byte
    pub fn seek(&mut self, position: u64) {
        self.pushback = None;
        self.position = position;
    }

    /// Current logical position
    pub fn position(&self) -> u64 {
        match self.pushback {
            Some(_) => self.position.saturating_sub(1),
            None => self.position,
        }
    }

    /// Length of the underlying source
    pub fn length(&self) -> Result<u64> {
        self.source.length()
    }

    /// Close the underlying source
    pub fn close(&mut self) -> Result<()> {
        self.pushback = None;
        self.source.close()
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        self.read_fully(&mut bytes)?;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(self.read_array::<1>()?[0] as i8)
    }

    /// Big-endian 16-bit signed integer
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(self.read_array()?))
    }

    /// Little-endian 16-bit signed integer
    pub fn read_i16_le(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.read_array()?))
    }

    pub fn read_i32_le(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_be_bytes(self.read_array()?))
    }

    pub fn read_i64_le(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_be_bytes(self.read_array()?))
    }

    pub fn read_f32_le(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_be_bytes(self.read_array()?))
    }

    pub fn read_f64_le(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_and_peek() {
        let mut cursor = SourceCursor::from_bytes(b"ab".to_vec());

        assert_eq!(cursor.peek().unwrap(), Some(b'a'));
        assert_eq!(cursor.read().unwrap(), Some(b'a'));
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.read().unwrap(), Some(b'b'));
        assert_eq!(cursor.read().unwrap(), None);
        assert_eq!(cursor.peek().unwrap(), None);
        assert_eq!(cursor.position(), 2);
    }

    #[test]
    fn test_pushback_position() {
        let mut cursor = SourceCursor::from_bytes(b"xyz".to_vec());
        let byte = cursor.read().unwrap().unwrap();
        assert_eq!(cursor.position(), 1);

        cursor.push_back(byte).unwrap();
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.peek().unwrap(), Some(b'x'));
        assert_eq!(cursor.read().unwrap(), Some(b'x'));
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_double_pushback_fails() {
        let mut cursor = SourceCursor::from_bytes(b"xyz".to_vec());
        cursor.read().unwrap();
        cursor.push_back(b'x').unwrap();

        assert!(matches!(
            cursor.push_back(b'y'),
            Err(PdfIoError::PushbackOccupied { position: 0 })
        ));
        // the first byte survives
        assert_eq!(cursor.read().unwrap(), Some(b'x'));
    }

    #[test]
    fn test_peek_into_does_not_move() {
        let mut cursor = SourceCursor::from_bytes(b"hello".to_vec());
        cursor.read().unwrap();
        cursor.push_back(b'h').unwrap();

        let mut buf = [0u8; 3];
        assert_eq!(cursor.peek_into(&mut buf).unwrap(), 3);
        assert_eq!(&buf, b"hel");
        assert_eq!(cursor.position(), 0);

        let mut buf = [0u8; 10];
        assert_eq!(cursor.peek_into(&mut buf).unwrap(), 5);
    }

    #[test]
    fn test_read_into_with_pushback() {
        let mut cursor = SourceCursor::from_bytes(b"hello".to_vec());
        cursor.read().unwrap();
        cursor.push_back(b'h').unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(cursor.read_into(&mut buf).unwrap(), Some(4));
        assert_eq!(&buf, b"hell");
        assert_eq!(cursor.read_into(&mut buf).unwrap(), Some(1));
        assert_eq!(cursor.read_into(&mut buf).unwrap(), None);
    }

    #[test]
    fn test_read_fully_end_of_data() {
        let mut cursor = SourceCursor::from_bytes(b"abc".to_vec());
        let mut buf = [0u8; 4];

        match cursor.read_fully(&mut buf) {
            Err(PdfIoError::EndOfData { position }) => assert_eq!(position, 3),
            other => panic!("Expected end of data, got {other:?}"),
        }
    }

    #[test]
    fn test_skip() {
        let mut cursor = SourceCursor::from_bytes(b"0123456789".to_vec());

        assert_eq!(cursor.skip(0).unwrap(), 0);
        assert_eq!(cursor.skip(3).unwrap(), 3);
        assert_eq!(cursor.read().unwrap(), Some(b'3'));

        cursor.push_back(b'3').unwrap();
        assert_eq!(cursor.skip(1).unwrap(), 1);
        assert_eq!(cursor.read().unwrap(), Some(b'4'));

        cursor.push_back(b'4').unwrap();
        assert_eq!(cursor.skip(3).unwrap(), 3);
        assert_eq!(cursor.read().unwrap(), Some(b'7'));

        assert_eq!(cursor.skip(100).unwrap(), 2);
        assert_eq!(cursor.read().unwrap(), None);
    }

    #[test]
    fn test_skip_past_end_keeps_position() {
        let mut cursor = SourceCursor::from_bytes(b"abcd".to_vec());
        cursor.seek(10);
        assert_eq!(cursor.skip(2).unwrap(), 0);
        assert_eq!(cursor.position(), 10);
        assert_eq!(cursor.read().unwrap(), None);
    }

    #[test]
    fn test_seek_clears_pushback() {
        let mut cursor = SourceCursor::from_bytes(b"abcdef".to_vec());
        cursor.read().unwrap();
        cursor.push_back(b'a').unwrap();

        cursor.seek(4);
        assert_eq!(cursor.position(), 4);
        assert_eq!(cursor.read().unwrap(), Some(b'e'));
    }

    #[test]
    fn test_typed_reads_both_orders() {
        let data = vec![
            0x12, 0x34, // i16 BE
            0x34, 0x12, // i16 LE
            0xff, 0xff, 0xff, 0xfe, // i32 BE -2
            0xfe, 0xff, 0xff, 0xff, // i32 LE -2
            0x40, 0x09, 0x21, 0xfb, 0x54, 0x44, 0x2d, 0x18, // f64 BE pi
            0x00, 0x00, 0x80, 0x3f, // f32 LE 1.0
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, // i64 BE 256
        ];
        let mut cursor = SourceCursor::from_bytes(data);

        assert_eq!(cursor.read_i16().unwrap(), 0x1234);
        assert_eq!(cursor.read_i16_le().unwrap(), 0x1234);
        assert_eq!(cursor.read_i32().unwrap(), -2);
        assert_eq!(cursor.read_i32_le().unwrap(), -2);
        assert_eq!(cursor.read_f64().unwrap(), std::f64::consts::PI);
        assert_eq!(cursor.read_f32_le().unwrap(), 1.0);
        assert_eq!(cursor.read_i64().unwrap(), 256);
        assert!(matches!(
            cursor.read_u8(),
            Err(PdfIoError::EndOfData { .. })
        ));
    }

    #[test]
    fn test_typed_read_fails_on_partial_data() {
        let mut cursor = SourceCursor::from_bytes(vec![0xff, 0xff, 0xff]);
        assert!(matches!(
            cursor.read_u32(),
            Err(PdfIoError::EndOfData { position: 3 })
        ));
    }

    #[test]
    fn test_view_requires_shared_source() {
        let cursor = SourceCursor::from_bytes(b"abc".to_vec());
        assert!(matches!(
            cursor.create_view(),
            Err(PdfIoError::ExclusiveSource)
        ));

        let cursor = cursor.into_shared();
        assert!(cursor.is_shared());
        assert!(cursor.create_view().is_ok());
    }

    #[test]
    fn test_views_are_independent() {
        let mut cursor = SourceCursor::shared(ArraySource::new(b"abcdef".to_vec()));
        cursor.seek(3);
        cursor.read().unwrap();
        cursor.push_back(b'd').unwrap();

        let mut view = cursor.create_view().unwrap();
        assert_eq!(view.position(), 0);
        assert_eq!(view.read().unwrap(), Some(b'a'));

        view.close().unwrap();
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.read().unwrap(), Some(b'd'));
        assert_eq!(cursor.read().unwrap(), Some(b'e'));
    }

    #[test]
    fn test_views_of_views() {
        let cursor = SourceCursor::shared(ArraySource::new(b"nested".to_vec()));
        let view = cursor.create_view().unwrap();
        assert!(view.is_shared());

        let mut nested = view.create_view().unwrap();
        nested.seek(2);
        assert_eq!(nested.read().unwrap(), Some(b's'));

        let mut view = view;
        view.close().unwrap();
        nested.close().unwrap();
        let mut cursor = cursor;
        assert_eq!(cursor.read().unwrap(), Some(b'n'));
    }
}

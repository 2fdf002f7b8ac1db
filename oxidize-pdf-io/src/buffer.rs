//! Growable byte container shared by the tokenizer and the number writer
//!
//! A [`ByteBuffer`] is used in one of two layouts:
//!
//! - **append**: bytes are written from the front, growing the storage when
//!   needed. Content lives in `[0, len)`.
//! - **prepend**: bytes are written backwards from the end of a buffer that
//!   was sized in advance. Content lives in `[capacity - len, capacity)`.
//!
//! Mixing both layouts on the same buffer is not supported.

const DEFAULT_CAPACITY: usize = 128;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Byte sequence with a logical size no larger than its capacity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteBuffer {
    data: Vec<u8>,
    count: usize,
}

impl Default for ByteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteBuffer {
    /// Create an empty buffer with the default capacity
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty buffer able to hold `capacity` bytes without growing
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity],
            count: 0,
        }
    }

    /// Number of bytes written so far
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if nothing was written yet
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Current storage size
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Forget the content, keeping the storage
    pub fn reset(&mut self) -> &mut Self {
        self.count = 0;
        self
    }

    /// Append one byte, growing the storage if needed
    pub fn append(&mut self, byte: u8) -> &mut Self {
        self.reserve(1);
        self.data[self.count] = byte;
        self.count += 1;
        self
    }

    /// Append a slice, growing the storage if needed
    pub fn append_slice(&mut self, bytes: &[u8]) -> &mut Self {
        self.reserve(bytes.len());
        self.data[self.count..self.count + bytes.len()].copy_from_slice(bytes);
        self.count += bytes.len();
        self
    }

    /// Append the two lowercase hex digits of `byte`
    pub fn append_hex(&mut self, byte: u8) -> &mut Self {
        self.append(HEX_DIGITS[(byte >> 4) as usize]);
        self.append(HEX_DIGITS[(byte & 0x0f) as usize])
    }

    /// Write one byte in front of the prepended content.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is already full; prepend never grows the storage.
    pub fn prepend(&mut self, byte: u8) -> &mut Self {
        assert!(
            self.count < self.data.len(),
            "ByteBuffer::prepend on a full buffer (capacity {})",
            self.data.len()
        );
        let index = self.data.len() - self.count - 1;
        self.data[index] = byte;
        self.count += 1;
        self
    }

    /// Write a slice in front of the prepended content.
    ///
    /// # Panics
    ///
    /// Panics if the remaining room is smaller than `bytes`.
    pub fn prepend_slice(&mut self, bytes: &[u8]) -> &mut Self {
        assert!(
            self.count + bytes.len() <= self.data.len(),
            "ByteBuffer::prepend_slice needs {} bytes, {} left",
            bytes.len(),
            self.data.len() - self.count
        );
        let end = self.data.len() - self.count;
        self.data[end - bytes.len()..end].copy_from_slice(bytes);
        self.count += bytes.len();
        self
    }

    /// Byte at `index` in append layout
    pub fn get(&self, index: usize) -> Option<u8> {
        self.as_bytes().get(index).copied()
    }

    /// Content written with the append operations
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.count]
    }

    /// Content written with the prepend operations
    pub fn prepended_bytes(&self) -> &[u8] {
        &self.data[self.data.len() - self.count..]
    }

    /// Copy of the appended content
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    /// Check if the appended content starts with `prefix`
    pub fn starts_with(&self, prefix: &[u8]) -> bool {
        self.as_bytes().starts_with(prefix)
    }

    /// Value of an ASCII hex digit, `None` for anything else
    pub fn hex_value(byte: u8) -> Option<u8> {
        match byte {
            b'0'..=b'9' => Some(byte - b'0'),
            b'a'..=b'f' => Some(byte - b'a' + 10),
            b'A'..=b'F' => Some(byte - b'A' + 10),
            _ => None,
        }
    }

    fn reserve(&mut self, additional: usize) {
        let needed = self.count + additional;
        if needed > self.data.len() {
            let new_capacity = needed.max(self.data.len() * 2);
            self.data.resize(new_capacity, 0);
        }
    }
}

impl AsRef<[u8]> for ByteBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

//! Concatenation of several sources into one address space

use super::ByteSource;
use crate::error::{PdfIoError, Result};

/// Absolute byte range covered by one member of a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceEntry {
    first_byte: u64,
    last_byte: u64,
    index: usize,
}

impl SourceEntry {
    fn contains(&self, offset: u64) -> bool {
        offset >= self.first_byte && offset <= self.last_byte
    }
}

/// Ordered list of sources exposed as one contiguous range of bytes.
///
/// The member owning the last requested offset is remembered, so sequential
/// reads resolve their member without scanning. A miss scans forward from
/// the remembered member when the offset lies after it, otherwise from the
/// first member.
pub struct GroupSource {
    sources: Vec<Box<dyn ByteSource>>,
    entries: Vec<SourceEntry>,
    current: Option<usize>,
    length: u64,
    closed: bool,
}

impl GroupSource {
    /// Group `sources` in order; empty members take no address space
    pub fn new(sources: Vec<Box<dyn ByteSource>>) -> Result<Self> {
        let mut entries = Vec::with_capacity(sources.len());
        let mut length = 0u64;

        for (index, source) in sources.iter().enumerate() {
            let source_length = source.length()?;
            if source_length == 0 {
                continue;
            }
            entries.push(SourceEntry {
                first_byte: length,
                last_byte: length + source_length - 1,
                index,
            });
            length += source_length;
        }

        Ok(Self {
            sources,
            entries,
            current: None,
            length,
            closed: false,
        })
    }

    /// Number of grouped sources, empty ones included
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Resolve the entry owning `offset`, updating the cached entry
    fn entry_for_offset(&mut self, offset: u64) -> Option<SourceEntry> {
        if let Some(current) = self.current {
            let entry = self.entries[current];
            if entry.contains(offset) {
                return Some(entry);
            }
        }

        let start = match self.current {
            Some(current) if offset > self.entries[current].last_byte => current + 1,
            _ => 0,
        };

        let found = self.entries[start..]
            .iter()
            .position(|entry| entry.contains(offset))
            .map(|relative| start + relative);

        // a miss keeps the previous entry cached
        if let Some(found) = found {
            self.current = Some(found);
        }
        found.map(|index| self.entries[index])
    }
}

impl ByteSource for GroupSource {
    fn get(&mut self, position: u64) -> Result<Option<u8>> {
        if self.closed {
            return Err(PdfIoError::SourceClosed);
        }
        match self.entry_for_offset(position) {
            Some(entry) => self.sources[entry.index].get(position - entry.first_byte),
            None => Ok(None),
        }
    }

    fn get_range(&mut self, position: u64, dest: &mut [u8]) -> Result<Option<usize>> {
        if self.closed {
            return Err(PdfIoError::SourceClosed);
        }
        if position >= self.length {
            return Ok(None);
        }

        let mut position = position;
        let mut read = 0usize;

        while read < dest.len() {
            let Some(entry) = self.entry_for_offset(position) else {
                break;
            };
            let wanted = (entry.last_byte - position + 1).min((dest.len() - read) as u64) as usize;
            let chunk = &mut dest[read..read + wanted];

            match self.sources[entry.index].get_range(position - entry.first_byte, chunk)? {
                Some(count) if count > 0 => {
                    read += count;
                    position += count as u64;
                    if count < wanted {
                        break;
                    }
                }
                _ => break,
            }
        }

        if read == 0 && !dest.is_empty() {
            return Ok(None);
        }
        Ok(Some(read))
    }

    fn length(&self) -> Result<u64> {
        Ok(self.length)
    }

    /// Close every member.
    ///
    /// All members are closed even if some fail. The first failure is
    /// returned, later ones are logged.
    fn close(&mut self) -> Result<()> {
        let mut first_error: Option<PdfIoError> = None;

        for (index, source) in self.sources.iter_mut().enumerate() {
            if let Err(e) = source.close() {
                if first_error.is_none() {
                    first_error = Some(e);
                } else {
                    tracing::warn!("Failed to close grouped source {}: {}", index, e);
                }
            }
        }
        self.current = None;
        self.closed = true;

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for GroupSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupSource")
            .field("sources", &self.sources.len())
            .field("entries", &self.entries)
            .field("current", &self.current)
            .field("length", &self.length)
            .field("closed", &self.closed)
            .finish()
    }
}

//! PDF header and trailer markers
//!
//! Locates the `%PDF-` / `%FDF-` signature, the last `startxref` keyword
//! and `%%EOF` markers, according to ISO 32000-1 Sections 7.5.2 and 7.5.5.

use super::lexer::Tokenizer;
use crate::error::{PdfIoError, Result};
use tracing::debug;

pub const PDF_SIGNATURE: &[u8] = b"%PDF-";
pub const FDF_SIGNATURE: &[u8] = b"%FDF-";
pub const STARTXREF: &[u8] = b"startxref";
pub const EOF_MARKER: &[u8] = b"%%EOF";

/// Bytes searched for a header signature, and the block size of the
/// backward `startxref` scan
const SCAN_BLOCK: usize = 1024;
const EOF_SCAN_BLOCK: usize = 128;

/// PDF Version information
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PdfVersion {
    pub major: u8,
    pub minor: u8,
}

impl PdfVersion {
    /// Create a new PDF version
    pub fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Parse `M.m` from the bytes following a signature
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [major @ b'0'..=b'9', b'.', minor @ b'0'..=b'9', ..] => {
                Some(Self::new(major - b'0', minor - b'0'))
            }
            _ => None,
        }
    }

    /// Check if this version is supported
    pub fn is_supported(&self) -> bool {
        // PDF 1.0 through 2.0
        matches!((self.major, self.minor), (1, 0..=7) | (2, 0))
    }
}

impl std::fmt::Display for PdfVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl Tokenizer {
    /// Offset of the `%PDF-` (or `%FDF-`) signature within the first 1024
    /// bytes, searched from the current position
    pub fn header_offset(&mut self) -> Result<u64> {
        let start = self.cursor().position();
        let block = self.read_string(SCAN_BLOCK)?;
        find(&block, PDF_SIGNATURE)
            .or_else(|| find(&block, FDF_SIGNATURE))
            .map(|idx| idx as u64)
            .ok_or(PdfIoError::InvalidHeader { position: start })
    }

    /// Require `%PDF-` at position 0 and return the declared version
    pub fn check_pdf_header(&mut self) -> Result<PdfVersion> {
        self.check_signature(PDF_SIGNATURE)?;
        let version_bytes = self.read_string(3)?;
        let version =
            PdfVersion::parse(&version_bytes).ok_or(PdfIoError::InvalidHeader { position: 0 })?;
        debug!("PDF header version {}", version);
        Ok(version)
    }

    /// Require `%FDF-` at position 0
    pub fn check_fdf_header(&mut self) -> Result<()> {
        self.check_signature(FDF_SIGNATURE)
    }

    /// Leaves the position right after the signature
    fn check_signature(&mut self, signature: &[u8]) -> Result<()> {
        self.seek(0);
        let block = self.read_string(SCAN_BLOCK)?;
        if find(&block, signature) != Some(0) {
            return Err(PdfIoError::InvalidHeader { position: 0 });
        }
        self.seek(signature.len() as u64);
        Ok(())
    }

    /// Position of the last `startxref` keyword.
    ///
    /// Scans backwards from the end in 1024-byte blocks that overlap by the
    /// keyword length. Position 0 is never examined.
    pub fn startxref(&mut self) -> Result<u64> {
        let length = self.length()?;
        let mut pos = length.saturating_sub(SCAN_BLOCK as u64).max(1);

        loop {
            self.seek(pos);
            let block = self.read_string(SCAN_BLOCK)?;
            if let Some(idx) = rfind(&block, STARTXREF) {
                return Ok(pos + idx as u64);
            }
            if pos <= 1 {
                break;
            }
            pos = pos
                .saturating_sub((SCAN_BLOCK - STARTXREF.len()) as u64)
                .max(1);
        }
        Err(PdfIoError::StartxrefNotFound { position: length })
    }

    /// Position right after the next `%%EOF` marker and its line ending,
    /// searched from the current position
    pub fn next_eof(&mut self) -> Result<Option<u64>> {
        loop {
            let start = self.cursor().position();
            let block = self.read_string(EOF_SCAN_BLOCK)?;
            if let Some(idx) = find(&block, EOF_MARKER) {
                let mut end = start + (idx + EOF_MARKER.len()) as u64;
                self.seek(end);
                match self.read()? {
                    Some(b'\n') => end += 1,
                    Some(b'\r') => {
                        end += 1;
                        if self.read()? == Some(b'\n') {
                            end += 1;
                        }
                    }
                    _ => {}
                }
                self.seek(end);
                return Ok(Some(end));
            }
            if block.len() < EOF_SCAN_BLOCK {
                return Ok(None);
            }
            // keep a partial marker at the block boundary in view
            self.seek(start + (block.len() - (EOF_MARKER.len() - 1)) as u64);
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).rposition(|w| w == needle)
}

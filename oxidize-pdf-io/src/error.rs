use thiserror::Error;

/// Errors raised by byte sources, cursors and the tokenizer.
///
/// Positional variants carry the absolute byte offset of the cursor at the
/// time the failure was detected.
#[derive(Error, Debug)]
pub enum PdfIoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Byte source is already closed")]
    SourceClosed,

    #[error("Unexpected end of data at position {position}")]
    EndOfData { position: u64 },

    #[error("Syntax error at position {position}: {message}")]
    Syntax { position: u64, message: String },

    #[error("PDF header signature not found at position {position}")]
    InvalidHeader { position: u64 },

    #[error("startxref not found (searched back from position {position})")]
    StartxrefNotFound { position: u64 },

    #[error("A byte is already pushed back at position {position}")]
    PushbackOccupied { position: u64 },

    #[error("Source is exclusive; open it as shared to create views")]
    ExclusiveSource,

    #[error("Invalid range {start}..{end} for source of length {length}")]
    InvalidRange { start: u64, end: u64, length: u64 },

    #[error("Unsupported URL: {0}")]
    UnsupportedUrl(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Could not lock file: {0}")]
    Lock(String),

    #[error("Shared source lock poisoned")]
    Poisoned,
}

impl PdfIoError {
    /// Build a syntax error at the given position
    pub fn syntax(position: u64, message: impl Into<String>) -> Self {
        PdfIoError::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Byte offset attached to the error, if any
    pub fn position(&self) -> Option<u64> {
        match self {
            PdfIoError::EndOfData { position }
            | PdfIoError::Syntax { position, .. }
            | PdfIoError::InvalidHeader { position }
            | PdfIoError::StartxrefNotFound { position }
            | PdfIoError::PushbackOccupied { position } => Some(*position),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, PdfIoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_error_display() {
        let error = PdfIoError::syntax(42, "GT not expected");
        assert_eq!(
            error.to_string(),
            "Syntax error at position 42: GT not expected"
        );

        let error = PdfIoError::SourceClosed;
        assert_eq!(error.to_string(), "Byte source is already closed");
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = IoError::new(ErrorKind::NotFound, "file not found");
        let error = PdfIoError::from(io_error);

        match error {
            PdfIoError::Io(ref err) => assert_eq!(err.kind(), ErrorKind::NotFound),
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_error_position() {
        assert_eq!(PdfIoError::EndOfData { position: 7 }.position(), Some(7));
        assert_eq!(PdfIoError::InvalidHeader { position: 0 }.position(), Some(0));
        assert_eq!(PdfIoError::SourceClosed.position(), None);
        assert_eq!(PdfIoError::Poisoned.position(), None);
    }

    #[test]
    fn test_result_with_question_mark() {
        fn fails() -> Result<u8> {
            Err(PdfIoError::StartxrefNotFound { position: 1024 })?;
            Ok(0)
        }

        let err = fails().unwrap_err();
        assert!(err.to_string().contains("startxref"));
    }
}

//! # oxidize-pdf-io
//!
//! Low-level input and output layer for PDF processing: random-access byte
//! sources, a positioned cursor with pushback, a lexical tokenizer for PDF
//! syntax, and byte-exact serialization of numbers.
//!
//! ## Features
//!
//! - **Byte Sources**: In-memory, file, memory-mapped, windowed, grouped,
//!   read-ahead, shared and non-closing sources behind one trait
//! - **Cursor**: Positioned reads with one byte of pushback, peeking and
//!   big/little-endian typed reads
//! - **Tokenizer**: PDF tokens with the recovery rules viewers apply to
//!   damaged files (`--5`, `1.-5`, stray minus signs, bad references)
//! - **Number Encoding**: Compact decimal output for integers and reals,
//!   identical byte for byte across platforms
//!
//! ## Quick Start
//!
//! ```rust
//! use oxidize_pdf_io::parser::{TokenKind, Tokenizer};
//!
//! # fn main() -> oxidize_pdf_io::Result<()> {
//! let mut tokenizer = Tokenizer::from_bytes(b"<< /Pages 3 0 R >>".to_vec());
//!
//! let mut kinds = Vec::new();
//! while tokenizer.next_valid_token()? {
//!     kinds.push(tokenizer.kind());
//! }
//! assert_eq!(
//!     kinds,
//!     [TokenKind::StartDict, TokenKind::Name, TokenKind::Ref, TokenKind::EndDict]
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ### Writing numbers
//!
//! ```rust
//! use oxidize_pdf_io::writer::{double_to_bytes, int_to_bytes};
//!
//! assert_eq!(int_to_bytes(-42), b"-42");
//! assert_eq!(double_to_bytes(0.5, false), b"0.5");
//! assert_eq!(double_to_bytes(2.0 / 3.0, false), b"0.66667");
//! assert_eq!(double_to_bytes(1234.5678, false), b"1234.57");
//! ```
//!
//! ## Modules
//!
//! - [`source`] - Byte sources and the [`source::SourceFactory`]
//! - [`cursor`] - [`SourceCursor`] over any byte source
//! - [`parser`] - Tokenizer, string decoding and header markers
//! - [`writer`] - Number serialization
//! - [`buffer`] - Growable [`ByteBuffer`] used by the tokenizer and encoder

pub mod buffer;
pub mod cursor;
pub mod error;
pub mod parser;
pub mod source;
pub mod writer;

pub use buffer::ByteBuffer;
pub use cursor::SourceCursor;
pub use error::{PdfIoError, Result};
pub use parser::{PdfVersion, Token, TokenKind, Tokenizer};
pub use source::{ByteSource, SourceFactory, SourceHandle, SourceOptions};

/// Current version of oxidize-pdf-io
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! PDF Tokenizer Module
//!
//! Lexical layer for reading PDF files according to ISO 32000-1 Section 7.2:
//! tokens, string decoding, and the header and trailer markers used to
//! locate the cross-reference data.

pub mod header;
pub mod lexer;
pub mod strings;
pub mod token;

pub use self::header::PdfVersion;
pub use self::lexer::{
    is_delimiter, is_delimiter_whitespace, is_whitespace, is_whitespace_with, Tokenizer, Tokens,
};
pub use self::strings::decode_string_content;
pub use self::token::{ObjectRef, Token, TokenKind};

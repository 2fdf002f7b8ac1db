//! Token types produced by the tokenizer

use super::strings::decode_string_content;
use std::borrow::Cow;

/// Kind of the last token read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Integer or real number, content holds the digits
    Number,
    /// Literal `( )` or hex `< >` string, content holds the raw bytes
    String,
    /// Name without the leading `/`
    Name,
    /// `%` comment, content is not kept
    Comment,
    /// `[`
    StartArray,
    /// `]`
    EndArray,
    /// `<<`
    StartDict,
    /// `>>`
    EndDict,
    /// `n g R`
    Ref,
    /// `n g obj`
    Obj,
    /// `endobj` keyword
    EndObj,
    /// Any other bare keyword (`R`, `stream`, `true`, `null`, ...)
    Other,
    /// Nothing left to read
    EndOfFile,
}

/// Object and generation numbers of a `Ref` or `Obj` token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub number: i32,
    pub generation: i32,
}

impl ObjectRef {
    pub fn new(number: i32, generation: i32) -> Self {
        Self { number, generation }
    }
}

impl std::fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.number, self.generation)
    }
}

/// Owned snapshot of a token, independent of the tokenizer's buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub content: Vec<u8>,
    /// Set for strings written in hex form
    pub hex: bool,
    /// Set for `Ref` and `Obj` tokens
    pub reference: Option<ObjectRef>,
}

impl Token {
    /// Decoded bytes of a string token, `None` for other kinds
    pub fn decoded_string(&self) -> Option<Vec<u8>> {
        (self.kind == TokenKind::String).then(|| decode_string_content(&self.content, self.hex))
    }

    /// Content as text, replacing invalid UTF-8
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.content)
    }
}

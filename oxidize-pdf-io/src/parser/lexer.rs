//! PDF Tokenizer
//!
//! Splits PDF syntax into tokens according to ISO 32000-1 Section 7.2,
//! with the recovery rules real-world viewers apply to damaged files.
//!
//! The tokenizer keeps only the last token. Its raw content lives in an
//! internal [`ByteBuffer`] that is reused between calls; use
//! [`Tokenizer::token`] to take an owned copy.

use super::strings::decode_string_content;
use super::token::{ObjectRef, Token, TokenKind};
use crate::buffer::ByteBuffer;
use crate::cursor::SourceCursor;
use crate::error::{PdfIoError, Result};
use crate::source::{ByteSource, SourceHandle, SynchronizedSource, WindowSource};
use std::sync::Arc;
use tracing::{debug, warn};

/// Delimiter and whitespace lookup, shifted by one so index 0 is end of data
const DELIMITERS: [bool; 257] = build_delimiters();

const fn build_delimiters() -> [bool; 257] {
    let mut table = [false; 257];
    table[0] = true;
    let bytes = [
        0u8, 9, 10, 12, 13, 32, b'(', b')', b'<', b'>', b'[', b']', b'/', b'%',
    ];
    let mut i = 0;
    while i < bytes.len() {
        table[bytes[i] as usize + 1] = true;
        i += 1;
    }
    table
}

/// PDF whitespace: NUL, TAB, LF, FF, CR and SPACE
pub fn is_whitespace(byte: u8) -> bool {
    is_whitespace_with(byte, true)
}

/// Whitespace test where NUL only counts when `null_is_whitespace` is set
pub fn is_whitespace_with(byte: u8, null_is_whitespace: bool) -> bool {
    match byte {
        0 => null_is_whitespace,
        9 | 10 | 12 | 13 | 32 => true,
        _ => false,
    }
}

/// One of `( ) < > [ ] / %`
pub fn is_delimiter(byte: u8) -> bool {
    matches!(
        byte,
        b'(' | b')' | b'<' | b'>' | b'[' | b']' | b'/' | b'%'
    )
}

/// Delimiter, whitespace, or end of data (`None`)
pub fn is_delimiter_whitespace(byte: Option<u8>) -> bool {
    DELIMITERS[byte.map_or(0, |b| b as usize + 1)]
}

/// Tokenizer over a [`SourceCursor`]
#[derive(Debug)]
pub struct Tokenizer {
    cursor: SourceCursor,
    buffer: ByteBuffer,
    kind: TokenKind,
    hex_string: bool,
    reference: Option<ObjectRef>,
}

impl Tokenizer {
    pub fn new(cursor: SourceCursor) -> Self {
        Self {
            cursor,
            buffer: ByteBuffer::new(),
            kind: TokenKind::EndOfFile,
            hex_string: false,
            reference: None,
        }
    }

    /// Tokenizer over an in-memory byte array
    pub fn from_bytes(data: impl Into<Arc<[u8]>>) -> Self {
        Self::new(SourceCursor::from_bytes(data))
    }

    /// Tokenizer whose position zero is the start of the `%PDF-` header.
    ///
    /// Files with junk before the header are windowed so that offsets in
    /// the file are relative to the header.
    ///
    /// The returned tokenizer owns the source: closing it closes the
    /// source, and views can be created from its cursor.
    pub fn with_header_offset(source: impl ByteSource + 'static) -> Result<Self> {
        let shared = SynchronizedSource::new(source);
        let mut probe = Self::new(SourceCursor::from_handle(SourceHandle::Shared(
            shared.clone(),
        )));
        let offset = probe.header_offset()?;
        if offset == 0 {
            probe.seek(0);
            return Ok(probe);
        }

        debug!("PDF header found at offset {}, windowing source", offset);
        Ok(Self::new(SourceCursor::shared(WindowSource::from_offset(
            shared, offset,
        )?)))
    }

    /// Read the next token.
    ///
    /// Returns `false` once the end of data is reached, leaving the kind
    /// at [`TokenKind::EndOfFile`].
    pub fn next_token(&mut self) -> Result<bool> {
        self.buffer.reset();
        self.hex_string = false;
        self.reference = None;

        let mut ch = self.cursor.read()?;
        while matches!(ch, Some(b) if is_whitespace(b)) {
            ch = self.cursor.read()?;
        }
        let Some(ch) = ch else {
            self.kind = TokenKind::EndOfFile;
            return Ok(false);
        };

        match ch {
            b'[' => self.kind = TokenKind::StartArray,
            b']' => self.kind = TokenKind::EndArray,
            b'/' => {
                self.kind = TokenKind::Name;
                self.read_until_delimiter()?;
            }
            b'>' => {
                if self.cursor.read()? != Some(b'>') {
                    return Err(self.error("'>' not expected"));
                }
                self.kind = TokenKind::EndDict;
            }
            b'<' => self.read_angle_bracket()?,
            b'%' => {
                self.kind = TokenKind::Comment;
                loop {
                    match self.cursor.read()? {
                        None | Some(b'\r') | Some(b'\n') => break,
                        Some(_) => {}
                    }
                }
            }
            b'(' => self.read_literal_string()?,
            b'-' | b'+' | b'.' | b'0'..=b'9' => self.read_number(ch)?,
            _ => {
                self.kind = TokenKind::Other;
                self.buffer.append(ch);
                self.read_until_delimiter()?;
                if self.buffer.as_bytes() == b"endobj" {
                    self.kind = TokenKind::EndObj;
                }
            }
        }
        Ok(true)
    }

    /// Read the next token, merging `n g R` and `n g obj` into one token.
    ///
    /// Comments are skipped. When a number is not followed by the rest of a
    /// reference or object header, the first number is returned and the
    /// cursor is moved back right after it.
    pub fn next_valid_token(&mut self) -> Result<bool> {
        let mut level = 0;
        let mut first = Vec::new();
        let mut second = Vec::new();
        let mut after_first = 0;

        while self.next_token()? {
            if self.kind == TokenKind::Comment {
                continue;
            }
            match level {
                0 => {
                    if self.kind != TokenKind::Number {
                        return Ok(true);
                    }
                    after_first = self.cursor.position();
                    first = self.buffer.to_vec();
                    level = 1;
                }
                1 => {
                    if self.kind != TokenKind::Number {
                        self.restore_number(&first, after_first);
                        return Ok(true);
                    }
                    second = self.buffer.to_vec();
                    level = 2;
                }
                _ => {
                    if self.kind == TokenKind::Other {
                        let kind = match self.buffer.as_bytes() {
                            b"R" => Some(TokenKind::Ref),
                            b"obj" => Some(TokenKind::Obj),
                            _ => None,
                        };
                        if let Some(kind) = kind {
                            let reference = self.parse_reference(&first, &second);
                            self.kind = kind;
                            self.reference = Some(reference);
                            self.buffer.reset();
                            return Ok(true);
                        }
                    }
                    self.restore_number(&first, after_first);
                    return Ok(true);
                }
            }
        }

        if level > 0 {
            self.restore_number(&first, after_first);
            return Ok(true);
        }
        Ok(false)
    }

    fn restore_number(&mut self, content: &[u8], position: u64) {
        self.cursor.seek(position);
        self.kind = TokenKind::Number;
        self.hex_string = false;
        self.reference = None;
        self.buffer.reset().append_slice(content);
    }

    fn parse_reference(&self, number: &[u8], generation: &[u8]) -> ObjectRef {
        match (parse_ascii::<i32>(number), parse_ascii::<i32>(generation)) {
            (Some(number), Some(generation)) => ObjectRef::new(number, generation),
            _ => {
                warn!(
                    "Invalid indirect reference {} {} near position {}",
                    String::from_utf8_lossy(number),
                    String::from_utf8_lossy(generation),
                    self.cursor.position()
                );
                ObjectRef::new(-1, 0)
            }
        }
    }

    fn read_until_delimiter(&mut self) -> Result<()> {
        loop {
            let next = self.cursor.read()?;
            if is_delimiter_whitespace(next) {
                return self.unread(next);
            }
            if let Some(byte) = next {
                self.buffer.append(byte);
            }
        }
    }

    fn unread(&mut self, byte: Option<u8>) -> Result<()> {
        match byte {
            Some(byte) => self.cursor.push_back(byte),
            None => Ok(()),
        }
    }

    fn read_angle_bracket(&mut self) -> Result<()> {
        let mut v1 = self.cursor.read()?;
        if v1 == Some(b'<') {
            self.kind = TokenKind::StartDict;
            return Ok(());
        }

        self.kind = TokenKind::String;
        self.hex_string = true;
        loop {
            while matches!(v1, Some(b) if is_whitespace(b)) {
                v1 = self.cursor.read()?;
            }
            match v1 {
                Some(b'>') => break,
                Some(b) if ByteBuffer::hex_value(b).is_some() => {
                    self.buffer.append(b);
                }
                _ => return Err(self.error("Error reading hex string")),
            }

            let mut v2 = self.cursor.read()?;
            while matches!(v2, Some(b) if is_whitespace(b)) {
                v2 = self.cursor.read()?;
            }
            match v2 {
                Some(b'>') => break,
                Some(b) if ByteBuffer::hex_value(b).is_some() => {
                    self.buffer.append(b);
                }
                _ => return Err(self.error("Error reading hex string")),
            }
            v1 = self.cursor.read()?;
        }
        Ok(())
    }

    fn read_literal_string(&mut self) -> Result<()> {
        self.kind = TokenKind::String;
        let mut nesting = 0i32;
        loop {
            let Some(mut ch) = self.cursor.read()? else {
                return Err(self.error("Error reading string"));
            };
            match ch {
                b'(' => nesting += 1,
                b')' => nesting -= 1,
                b'\\' => {
                    self.buffer.append(b'\\');
                    match self.cursor.read()? {
                        Some(escaped) => ch = escaped,
                        None => return Err(self.error("Error reading string")),
                    }
                }
                _ => {}
            }
            if nesting == -1 {
                return Ok(());
            }
            self.buffer.append(ch);
        }
    }

    fn read_number(&mut self, first: u8) -> Result<()> {
        self.kind = TokenKind::Number;
        let mut is_real = false;
        let mut minuses = 0;
        let mut ch;

        if first == b'-' {
            // "--5" is accepted by viewers
            ch = Some(b'-');
            while ch == Some(b'-') {
                minuses += 1;
                ch = self.cursor.read()?;
            }
            self.buffer.append(b'-');
        } else {
            self.buffer.append(first);
            ch = self.cursor.read()?;
        }

        while let Some(digit @ b'0'..=b'9') = ch {
            self.buffer.append(digit);
            ch = self.cursor.read()?;
        }

        if ch == Some(b'.') {
            is_real = true;
            self.buffer.append(b'.');
            ch = self.cursor.read()?;

            // a minus after the dot drops the rest of the number
            let minus_after_dot = ch == Some(b'-');
            if minus_after_dot {
                ch = self.cursor.read()?;
            }
            while let Some(digit @ b'0'..=b'9') = ch {
                if !minus_after_dot {
                    self.buffer.append(digit);
                }
                ch = self.cursor.read()?;
            }
        }

        if minuses > 1 && !is_real {
            self.buffer.reset().append(b'0');
        }
        self.unread(ch)
    }

    /// Kind of the last token
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// Raw content of the last token
    pub fn content(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    /// Owned copy of the last token
    pub fn token(&self) -> Token {
        Token {
            kind: self.kind,
            content: self.buffer.to_vec(),
            hex: self.hex_string,
            reference: self.reference,
        }
    }

    pub fn is_hex_string(&self) -> bool {
        self.hex_string
    }

    /// Object and generation number of the last `Ref` or `Obj` token
    pub fn reference(&self) -> Option<ObjectRef> {
        self.reference
    }

    /// Object number of the last `Ref` or `Obj` token, 0 otherwise
    pub fn object_number(&self) -> i32 {
        self.reference.map_or(0, |r| r.number)
    }

    /// Generation number of the last `Ref` or `Obj` token, 0 otherwise
    pub fn generation_number(&self) -> i32 {
        self.reference.map_or(0, |r| r.generation)
    }

    /// Decoded bytes of the last string token
    pub fn decoded_string(&self) -> Vec<u8> {
        decode_string_content(self.buffer.as_bytes(), self.hex_string)
    }

    pub fn token_value_equals(&self, value: &[u8]) -> bool {
        self.buffer.as_bytes() == value
    }

    /// Last token content as an `i32`
    pub fn int_value(&self) -> Result<i32> {
        parse_ascii(self.content()).ok_or_else(|| self.value_error("integer"))
    }

    /// Last token content as an `i64`
    pub fn long_value(&self) -> Result<i64> {
        parse_ascii(self.content()).ok_or_else(|| self.value_error("integer"))
    }

    /// Last token content as an `f64`.
    ///
    /// A lone sign or dot reads as zero.
    pub fn real_value(&self) -> Result<f64> {
        let content = self.content();
        if let Some(value) = parse_ascii(content) {
            return Ok(value);
        }
        if content.iter().all(|b| matches!(b, b'-' | b'+' | b'.')) {
            return Ok(0.0);
        }
        Err(self.value_error("real number"))
    }

    fn value_error(&self, expected: &str) -> PdfIoError {
        self.error(format!(
            "Expected {expected}, found '{}'",
            String::from_utf8_lossy(self.content())
        ))
    }

    /// Syntax error at the current position
    pub fn error(&self, message: impl Into<String>) -> PdfIoError {
        PdfIoError::syntax(self.cursor.position(), message)
    }

    /// Try to read `n g obj` at the current position.
    ///
    /// On a mismatch the position is restored and `None` is returned.
    pub fn check_object_start(&mut self) -> Result<Option<ObjectRef>> {
        let start = self.cursor.position();
        match self.read_object_start() {
            Ok(Some(reference)) => Ok(Some(reference)),
            Ok(None) | Err(PdfIoError::Syntax { .. }) => {
                self.cursor.seek(start);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn read_object_start(&mut self) -> Result<Option<ObjectRef>> {
        if !self.next_token()? || self.kind != TokenKind::Number {
            return Ok(None);
        }
        let number = self.int_value()?;
        if !self.next_token()? || self.kind != TokenKind::Number {
            return Ok(None);
        }
        let generation = self.int_value()?;
        if !self.next_token()? || !self.token_value_equals(b"obj") {
            return Ok(None);
        }
        Ok(Some(ObjectRef::new(number, generation)))
    }

    /// Read one line into `buffer`.
    ///
    /// Leading whitespace is skipped, runs of TAB, FF and SPACE collapse to
    /// one byte, and the line ends at LF, CR, CR LF or end of data. At most
    /// `max_len` bytes are kept; the rest of a longer line is consumed.
    /// Returns `false` only when the end of data was reached with nothing
    /// read.
    pub fn read_line_segment(
        &mut self,
        buffer: &mut ByteBuffer,
        max_len: usize,
        null_is_whitespace: bool,
    ) -> Result<bool> {
        let mut c = self.cursor.read()?;
        while matches!(c, Some(b) if is_whitespace_with(b, null_is_whitespace)) {
            c = self.cursor.read()?;
        }

        let mut prev_was_whitespace = false;
        let mut eol = false;
        while buffer.len() < max_len {
            match c {
                None | Some(b'\n') => eol = true,
                Some(b'\r') => {
                    eol = true;
                    self.skip_line_feed()?;
                }
                Some(b @ (9 | 12 | 32)) => {
                    if !prev_was_whitespace {
                        prev_was_whitespace = true;
                        buffer.append(b);
                    }
                }
                Some(b) => {
                    prev_was_whitespace = false;
                    buffer.append(b);
                }
            }
            if eol || buffer.len() >= max_len {
                break;
            }
            c = self.cursor.read()?;
        }

        if !eol {
            loop {
                match self.cursor.read()? {
                    None | Some(b'\n') => break,
                    Some(b'\r') => {
                        self.skip_line_feed()?;
                        break;
                    }
                    Some(_) => {}
                }
            }
        }

        Ok(!(c.is_none() && buffer.is_empty()))
    }

    fn skip_line_feed(&mut self) -> Result<()> {
        if self.cursor.peek()? == Some(b'\n') {
            self.cursor.read()?;
        }
        Ok(())
    }

    /// Read up to `n` bytes, fewer at the end of data
    pub fn read_string(&mut self, n: usize) -> Result<Vec<u8>> {
        let mut bytes = vec![0u8; n];
        let mut filled = 0;
        while filled < n {
            match self.cursor.read_into(&mut bytes[filled..])? {
                Some(count) if count > 0 => filled += count,
                _ => break,
            }
        }
        bytes.truncate(filled);
        Ok(bytes)
    }

    pub fn seek(&mut self, position: u64) {
        self.cursor.seek(position);
    }

    pub fn position(&self) -> u64 {
        self.cursor.position()
    }

    pub fn length(&self) -> Result<u64> {
        self.cursor.length()
    }

    /// Read one raw byte
    pub fn read(&mut self) -> Result<Option<u8>> {
        self.cursor.read()
    }

    pub fn peek(&mut self) -> Result<Option<u8>> {
        self.cursor.peek()
    }

    /// Give back the last raw byte read
    pub fn back_one_position(&mut self, byte: u8) -> Result<()> {
        self.cursor.push_back(byte)
    }

    pub fn cursor(&self) -> &SourceCursor {
        &self.cursor
    }

    pub fn cursor_mut(&mut self) -> &mut SourceCursor {
        &mut self.cursor
    }

    pub fn into_cursor(self) -> SourceCursor {
        self.cursor
    }

    pub fn close(&mut self) -> Result<()> {
        self.cursor.close()
    }

    /// Owned copies of the remaining valid tokens
    pub fn tokens(&mut self) -> Tokens<'_> {
        Tokens { tokenizer: self }
    }
}

/// Iterator returned by [`Tokenizer::tokens`].
///
/// Yields valid tokens until the end of data and stops after the first
/// error, leaving the tokenizer at the end of its source.
#[derive(Debug)]
pub struct Tokens<'a> {
    tokenizer: &'a mut Tokenizer,
}

impl Iterator for Tokens<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        let tokenizer = &mut *self.tokenizer;
        match tokenizer.next_valid_token() {
            Ok(true) => Some(Ok(tokenizer.token())),
            Ok(false) => None,
            Err(e) => {
                tokenizer.kind = TokenKind::EndOfFile;
                let length = tokenizer.cursor.length().unwrap_or(0);
                tokenizer.cursor.seek(length);
                Some(Err(e))
            }
        }
    }
}

fn parse_ascii<T: std::str::FromStr>(bytes: &[u8]) -> Option<T> {
    std::str::from_utf8(bytes).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer(input: &[u8]) -> Tokenizer {
        Tokenizer::from_bytes(input.to_vec())
    }

    fn kinds(input: &[u8]) -> Vec<TokenKind> {
        tokenizer(input)
            .tokens()
            .map(|t| t.map(|t| t.kind))
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_reference() {
        let mut t = tokenizer(b"123 0 R");
        assert!(t.next_valid_token().unwrap());
        assert_eq!(t.kind(), TokenKind::Ref);
        assert_eq!(t.object_number(), 123);
        assert_eq!(t.generation_number(), 0);
        assert!(!t.next_valid_token().unwrap());
    }

    #[test]
    fn test_object_header() {
        let mut t = tokenizer(b"5 0 obj\n<< >>\nendobj");
        assert!(t.next_valid_token().unwrap());
        assert_eq!(t.kind(), TokenKind::Obj);
        assert_eq!(t.reference(), Some(ObjectRef::new(5, 0)));

        t.next_valid_token().unwrap();
        assert_eq!(t.kind(), TokenKind::StartDict);
        t.next_valid_token().unwrap();
        assert_eq!(t.kind(), TokenKind::EndDict);
        t.next_valid_token().unwrap();
        assert_eq!(t.kind(), TokenKind::EndObj);
    }

    #[test]
    fn test_basic_kinds() {
        assert_eq!(
            kinds(b"[ /Name (str) <41> 1.5 true ] << >>"),
            vec![
                TokenKind::StartArray,
                TokenKind::Name,
                TokenKind::String,
                TokenKind::String,
                TokenKind::Number,
                TokenKind::Other,
                TokenKind::EndArray,
                TokenKind::StartDict,
                TokenKind::EndDict,
            ]
        );
    }

    #[test]
    fn test_double_minus_is_zero() {
        let mut t = tokenizer(b"--5");
        t.next_token().unwrap();
        assert_eq!(t.kind(), TokenKind::Number);
        assert_eq!(t.content(), b"0");
    }

    #[test]
    fn test_double_minus_real_keeps_value() {
        let mut t = tokenizer(b"--5.5");
        t.next_token().unwrap();
        assert_eq!(t.content(), b"-5.5");
    }

    #[test]
    fn test_minus_after_dot_is_dropped() {
        let mut t = tokenizer(b"1.-5 7");
        t.next_token().unwrap();
        assert_eq!(t.content(), b"1.");
        assert_eq!(t.real_value().unwrap(), 1.0);
        t.next_token().unwrap();
        assert_eq!(t.content(), b"7");
    }

    #[test]
    fn test_number_terminator_is_pushed_back() {
        let mut t = tokenizer(b"12/Name");
        t.next_token().unwrap();
        assert_eq!(t.content(), b"12");
        assert_eq!(t.position(), 2);
        t.next_token().unwrap();
        assert_eq!(t.kind(), TokenKind::Name);
        assert_eq!(t.content(), b"Name");
    }

    #[test]
    fn test_hex_string() {
        let mut t = tokenizer(b"<48 65 6C 6C 6F>");
        t.next_token().unwrap();
        assert_eq!(t.kind(), TokenKind::String);
        assert!(t.is_hex_string());
        assert_eq!(t.content(), b"48656C6C6F");
        assert_eq!(t.decoded_string(), b"Hello");
    }

    #[test]
    fn test_hex_string_errors() {
        let mut t = tokenizer(b"<48zz>");
        assert!(matches!(t.next_token(), Err(PdfIoError::Syntax { .. })));

        let mut t = tokenizer(b"<4865");
        assert!(t.next_token().is_err());
    }

    #[test]
    fn test_literal_string_nesting_and_escapes() {
        let mut t = tokenizer(b"(a (nested) \\) str)");
        t.next_token().unwrap();
        assert_eq!(t.content(), b"a (nested) \\) str");
        assert_eq!(t.decoded_string(), b"a (nested) ) str");
    }

    #[test]
    fn test_literal_string_line_continuation() {
        let mut t = tokenizer(b"(line1\\\r\nline2)");
        t.next_token().unwrap();
        assert_eq!(t.decoded_string(), b"line1line2");
    }

    #[test]
    fn test_unterminated_literal_string() {
        let mut t = tokenizer(b"(abc");
        let err = t.next_token().unwrap_err();
        assert!(err.to_string().contains("Error reading string"));
    }

    #[test]
    fn test_stray_gt_is_error() {
        let mut t = tokenizer(b"> 1");
        assert!(matches!(t.next_token(), Err(PdfIoError::Syntax { .. })));
    }

    #[test]
    fn test_comment_consumed_to_end_of_line() {
        let mut t = tokenizer(b"% a comment\n42");
        t.next_token().unwrap();
        assert_eq!(t.kind(), TokenKind::Comment);
        assert!(t.content().is_empty());
        t.next_token().unwrap();
        assert_eq!(t.content(), b"42");
    }

    #[test]
    fn test_valid_token_skips_comments_inside_reference() {
        let mut t = tokenizer(b"7 % gen follows\n1 R");
        t.next_valid_token().unwrap();
        assert_eq!(t.kind(), TokenKind::Ref);
        assert_eq!(t.reference(), Some(ObjectRef::new(7, 1)));
    }

    #[test]
    fn test_number_without_reference_is_restored() {
        let mut t = tokenizer(b"1 2 /Name");
        t.next_valid_token().unwrap();
        assert_eq!(t.kind(), TokenKind::Number);
        assert_eq!(t.content(), b"1");
        t.next_valid_token().unwrap();
        assert_eq!(t.content(), b"2");
        t.next_valid_token().unwrap();
        assert_eq!(t.kind(), TokenKind::Name);
    }

    #[test]
    fn test_two_numbers_at_end_of_data() {
        let mut t = tokenizer(b"10 20");
        t.next_valid_token().unwrap();
        assert_eq!(t.content(), b"10");
        t.next_valid_token().unwrap();
        assert_eq!(t.content(), b"20");
        assert!(!t.next_valid_token().unwrap());
        assert_eq!(t.kind(), TokenKind::EndOfFile);
    }

    #[test]
    fn test_single_number_at_end_of_data() {
        let mut t = tokenizer(b"10");
        assert!(t.next_valid_token().unwrap());
        assert_eq!(t.kind(), TokenKind::Number);
        assert_eq!(t.content(), b"10");
        assert!(!t.next_valid_token().unwrap());
    }

    #[test]
    fn test_invalid_reference_numbers_recover() {
        let mut t = tokenizer(b"1.5 0 R");
        t.next_valid_token().unwrap();
        assert_eq!(t.kind(), TokenKind::Ref);
        assert_eq!(t.object_number(), -1);
        assert_eq!(t.generation_number(), 0);
    }

    #[test]
    fn test_value_accessors() {
        let mut t = tokenizer(b"-42 3.25 - /N");
        t.next_token().unwrap();
        assert_eq!(t.int_value().unwrap(), -42);
        assert_eq!(t.long_value().unwrap(), -42);
        t.next_token().unwrap();
        assert_eq!(t.real_value().unwrap(), 3.25);
        assert!(t.int_value().is_err());
        t.next_token().unwrap();
        assert_eq!(t.real_value().unwrap(), 0.0);
        t.next_token().unwrap();
        assert!(t.token_value_equals(b"N"));
        assert!(t.real_value().is_err());
    }

    #[test]
    fn test_check_object_start() {
        let mut t = tokenizer(b"12 3 obj");
        assert_eq!(t.check_object_start().unwrap(), Some(ObjectRef::new(12, 3)));

        let mut t = tokenizer(b"12 3 R");
        assert_eq!(t.check_object_start().unwrap(), None);
        assert_eq!(t.position(), 0);
    }

    #[test]
    fn test_read_line_segment() {
        let mut t = tokenizer(b"  first \t  line\r\nsecond\rthird\n");
        let mut line = ByteBuffer::new();

        assert!(t.read_line_segment(&mut line, 100, true).unwrap());
        assert_eq!(line.as_bytes(), b"first line");

        line.reset();
        assert!(t.read_line_segment(&mut line, 100, true).unwrap());
        assert_eq!(line.as_bytes(), b"second");

        line.reset();
        assert!(t.read_line_segment(&mut line, 100, true).unwrap());
        assert_eq!(line.as_bytes(), b"third");

        line.reset();
        assert!(!t.read_line_segment(&mut line, 100, true).unwrap());
    }

    #[test]
    fn test_read_line_segment_truncates() {
        let mut t = tokenizer(b"0123456789\nnext");
        let mut line = ByteBuffer::new();
        assert!(t.read_line_segment(&mut line, 4, true).unwrap());
        assert_eq!(line.as_bytes(), b"0123");

        line.reset();
        t.read_line_segment(&mut line, 100, true).unwrap();
        assert_eq!(line.as_bytes(), b"next");
    }

    #[test]
    fn test_read_line_segment_null_handling() {
        let mut t = tokenizer(b"\0abc");
        let mut line = ByteBuffer::new();
        t.read_line_segment(&mut line, 100, false).unwrap();
        assert_eq!(line.as_bytes(), b"\0abc");
    }

    #[test]
    fn test_delimiter_helpers() {
        assert!(is_whitespace(0));
        assert!(!is_whitespace_with(0, false));
        assert!(is_delimiter(b'/'));
        assert!(!is_delimiter(b' '));
        assert!(is_delimiter_whitespace(None));
        assert!(is_delimiter_whitespace(Some(b' ')));
        assert!(is_delimiter_whitespace(Some(b'%')));
        assert!(!is_delimiter_whitespace(Some(b'a')));
    }

    #[test]
    fn test_tokens_stop_after_error() {
        let mut t = tokenizer(b"/A (unterminated");
        let mut tokens = t.tokens();
        assert_eq!(tokens.next().unwrap().unwrap().content, b"A");
        assert!(tokens.next().unwrap().is_err());
        assert!(tokens.next().is_none());
        assert_eq!(t.kind(), TokenKind::EndOfFile);
    }

    #[test]
    fn test_header_methods_through_mutable_reference() {
        fn markers(t: &mut Tokenizer) -> (u64, u64) {
            (t.header_offset().unwrap(), t.startxref().unwrap())
        }
        let mut t = tokenizer(b"junk%PDF-1.4\nstartxref\n0\n%%EOF");
        assert_eq!(markers(&mut t), (4, 13));
    }
}

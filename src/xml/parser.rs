//! XML parser implementation

use indexmap::IndexMap;
use tracing::trace;

use crate::error::{Error, ErrorKind, Pos, Result};
use crate::lexer::Cursor;
use crate::xml::config::{ParserConfig, ParsingContext};
use crate::xml::model::{Content, Document, Element};

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: ParserConfig,
    context: ParsingContext,
}

impl<'a> Parser<'a> {
    /// Create a new XML parser with default limits
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, ParserConfig::default())
    }

    /// Create a new XML parser with custom limits
    pub fn with_config(input: &'a [u8], config: ParserConfig) -> Self {
        let input = input.strip_prefix(BOM).unwrap_or(input);
        Self {
            cursor: Cursor::new(input),
            config,
            context: ParsingContext::new(),
        }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        self.config.validate_size(self.cursor.remaining().len())?;

        self.skip_misc()?;
        if self.cursor.is_eof() {
            return Err(self.error_here(ErrorKind::EmptyDocument));
        }
        if self.cursor.starts_with(b"<!DOCTYPE") {
            self.skip_doctype()?;
            self.skip_misc()?;
        }

        let root = self.parse_element()?;
        self.skip_misc()?;

        if !self.cursor.is_eof() {
            return Err(self.error_here(ErrorKind::TrailingContent));
        }

        trace!(root = %root.name, "parsed xml document");
        Ok(Document { root })
    }

    /// Skip whitespace, comments and processing instructions outside the root
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
            } else if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
            } else {
                return Ok(());
            }
        }
    }

    fn skip_doctype(&mut self) -> Result<()> {
        // An internal subset ends with "]>" instead of a bare '>'
        while let Some(b) = self.cursor.current() {
            match b {
                b'[' => {
                    self.cursor.advance();
                    return self.skip_until(b"]>");
                }
                b'>' => {
                    self.cursor.advance();
                    return Ok(());
                }
                _ => self.cursor.advance(),
            }
        }
        Err(self.error_here(ErrorKind::UnexpectedEof))
    }

    fn parse_element(&mut self) -> Result<Element> {
        let start = self.cursor.position();
        self.expect_byte(b'<')?;

        if self.cursor.current() == Some(b'/') {
            self.cursor.advance();
            let name = self.parse_name()?;
            return Err(Error::at(ErrorKind::UnexpectedClosingTag { name }, start));
        }

        self.context.enter_nested(&self.config, start)?;

        let mut element = Element::new(self.parse_name()?);
        element.attributes = self.parse_attributes()?;

        if self.cursor.consume(b'/') {
            self.expect_byte(b'>')?;
            self.context.exit_nested();
            return Ok(element);
        }

        self.expect_byte(b'>')?;

        loop {
            if self.cursor.is_eof() {
                return Err(self.error_here(ErrorKind::UnexpectedEof));
            }

            if self.cursor.starts_with(b"</") {
                let close_pos = self.cursor.position();
                self.cursor.advance_by(2);
                let close_name = self.parse_name()?;
                if close_name != element.name {
                    return Err(Error::at(
                        ErrorKind::MismatchedTag {
                            expected: element.name,
                            found: close_name,
                        },
                        close_pos,
                    ));
                }
                self.cursor.skip_whitespace();
                self.expect_byte(b'>')?;
                break;
            }

            if self.cursor.starts_with(b"<!--") {
                self.cursor.advance_by(4);
                self.skip_until(b"-->")?;
                continue;
            }

            if self.cursor.starts_with(b"<![CDATA[") {
                let text = self.parse_cdata()?;
                element.children.push(Content::Text(text));
                continue;
            }

            if self.cursor.starts_with(b"<?") {
                self.cursor.advance_by(2);
                self.skip_until(b"?>")?;
                continue;
            }

            if self.cursor.current() == Some(b'<') {
                let child = self.parse_element()?;
                element.children.push(Content::Element(child));
                continue;
            }

            let text = self.parse_text()?;
            element.children.push(Content::Text(text));
        }

        self.context.exit_nested();
        Ok(element)
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/' | b'>') => break,
                Some(_) => {}
                None => return Err(self.error_here(ErrorKind::UnexpectedEof)),
            }

            let name_pos = self.cursor.position();
            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(Error::at(ErrorKind::DuplicateAttribute { name }, name_pos));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(q @ (b'"' | b'\'')) => q,
            Some(other) => {
                return Err(self.error_here(ErrorKind::Expected {
                    expected: "quoted attribute value".to_string(),
                    found: char::from(other).to_string(),
                }))
            }
            None => return Err(self.error_here(ErrorKind::UnexpectedEof)),
        };
        self.cursor.advance();

        let start_pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = bytes_to_str(raw, start_pos)?;
                return decode_entities(&normalize_attribute_value(text), start_pos);
            }
            if b == b'<' {
                return Err(self.error_here(ErrorKind::InvalidToken));
            }
            self.cursor.advance();
        }

        Err(self.error_here(ErrorKind::UnexpectedEof))
    }

    fn parse_text(&mut self) -> Result<String> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = bytes_to_str(raw, start_pos)?;
        decode_entities(&normalize_line_endings(text), start_pos)
    }

    fn parse_cdata(&mut self) -> Result<String> {
        self.cursor.advance_by(b"<![CDATA[".len());
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(b"]]>") {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance_by(3);
                return bytes_to_str(raw, start_pos).map(normalize_line_endings);
            }
            self.cursor.advance();
        }
        Err(self.error_here(ErrorKind::UnexpectedEof))
    }

    fn parse_name(&mut self) -> Result<String> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();

        match self.cursor.current() {
            Some(first) if is_name_start(first) => self.cursor.advance(),
            Some(_) => return Err(Error::at(ErrorKind::InvalidName, start_pos)),
            None => return Err(Error::at(ErrorKind::UnexpectedEof, start_pos)),
        }

        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        let raw = self.cursor.slice_from(start);
        bytes_to_str(raw, start_pos).map(str::to_string)
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(self.error_here(ErrorKind::UnexpectedEof))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        match self.cursor.current() {
            Some(b) if b == expected => {
                self.cursor.advance();
                Ok(())
            }
            Some(b) => Err(self.error_here(ErrorKind::Expected {
                expected: format!("'{}'", char::from(expected)),
                found: format!("'{}'", char::from(b)),
            })),
            None => Err(self.error_here(ErrorKind::UnexpectedEof)),
        }
    }

    fn error_here(&self, kind: ErrorKind) -> Error {
        Error::at(kind, self.cursor.position())
    }
}

fn bytes_to_str(bytes: &[u8], pos: Pos) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|_| Error::at(ErrorKind::InvalidUtf8, pos))
}

/// Translate `\r\n` and lone `\r` to `\n`
fn normalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Literal tab, CR and LF in an attribute value each read as one space;
/// a `\r\n` pair counts as a single line break.
fn normalize_attribute_value(text: &str) -> String {
    normalize_line_endings(text).replace(['\t', '\n'], " ")
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str, pos: Pos) -> Result<String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        let mut terminated = false;
        for next in chars.by_ref() {
            if next == ';' {
                terminated = true;
                break;
            }
            entity.push(next);
        }

        let decoded = match entity.as_str() {
            _ if !terminated => None,
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(&entity),
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => return Err(Error::at(ErrorKind::InvalidEntity { entity }, pos)),
        }
    }

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    let (digits, radix) = if let Some(hex) = entity.strip_prefix("#x") {
        (hex, 16)
    } else if let Some(dec) = entity.strip_prefix('#') {
        (dec, 10)
    } else {
        return None;
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u32::from_str_radix(digits, radix)
        .ok()
        .and_then(char::from_u32)
        .filter(|&c| is_xml_char(c))
}

/// Characters allowed in an XML document
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

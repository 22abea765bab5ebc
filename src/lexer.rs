//! Lexical analysis for GIR (XML) documents
//!
//! Only the XML subset that introspection data uses is recognised: elements,
//! attributes, character data, comments, CDATA sections, processing
//! instructions and the document type declaration. The last three carry no
//! meaning for the compiler and are tokenized so the tree builder can skip them.

use crate::error::{CompilerError, Result};
use regex::Regex;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    /// `<name attr="value">` or `<name/>`
    StartTag {
        name: String,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    },
    /// `</name>`
    EndTag(String),
    /// Character data with entities decoded
    Text(String),
    Comment(String),
    /// `<?xml ...?>` and `<!DOCTYPE ...>`
    Declaration(String),
    Eof,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::StartTag { name, self_closing: true, .. } => write!(f, "<{}/>", name),
            TokenType::StartTag { name, .. } => write!(f, "<{}>", name),
            TokenType::EndTag(name) => write!(f, "</{}>", name),
            TokenType::Text(_) => write!(f, "text"),
            TokenType::Comment(_) => write!(f, "comment"),
            TokenType::Declaration(_) => write!(f, "declaration"),
            TokenType::Eof => write!(f, "EOF"),
        }
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    filename: String,

    // Element and attribute names, including the "c:" and "glib:" prefixes
    name_regex: Regex,
}

impl Lexer {
    pub fn new(input: &str, filename: impl Into<String>) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            filename: filename.into(),
            name_regex: Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*(:[A-Za-z_][A-Za-z0-9_.\-]*)?$").unwrap(),
        }
    }

    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        while !self.is_at_end() {
            tokens.push(self.next_token()?);
        }

        tokens.push(Token {
            token_type: TokenType::Eof,
            line: self.line,
            column: self.column,
        });

        log::trace!("{}: {} tokens", self.filename, tokens.len());
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token> {
        let start_line = self.line;
        let start_column = self.column;

        let token_type = if self.peek() == Some('<') {
            if self.starts_with("<!--") {
                self.consume("<!--");
                TokenType::Comment(self.read_until("-->", "comment")?)
            } else if self.starts_with("<![CDATA[") {
                self.consume("<![CDATA[");
                TokenType::Text(self.read_until("]]>", "CDATA section")?)
            } else if self.starts_with("<?") {
                self.consume("<?");
                TokenType::Declaration(self.read_until("?>", "processing instruction")?)
            } else if self.starts_with("<!") {
                self.consume("<!");
                TokenType::Declaration(self.read_until(">", "declaration")?)
            } else if self.starts_with("</") {
                self.consume("</");
                let name = self.read_name()?;
                self.skip_whitespace();
                self.expect('>')?;
                TokenType::EndTag(name)
            } else {
                self.advance(); // consume <
                self.read_start_tag()?
            }
        } else {
            let mut raw = String::new();
            while let Some(ch) = self.peek() {
                if ch == '<' {
                    break;
                }
                raw.push(self.advance());
            }
            TokenType::Text(self.decode_entities(&raw, start_line)?)
        };

        Ok(Token {
            token_type,
            line: start_line,
            column: start_column,
        })
    }

    fn read_start_tag(&mut self) -> Result<TokenType> {
        let name = self.read_name()?;
        let mut attributes: Vec<(String, String)> = Vec::new();

        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('/') => {
                    self.advance();
                    self.expect('>')?;
                    return Ok(TokenType::StartTag { name, attributes, self_closing: true });
                }
                Some('>') => {
                    self.advance();
                    return Ok(TokenType::StartTag { name, attributes, self_closing: false });
                }
                Some(_) => {
                    let line = self.line;
                    let key = self.read_name()?;
                    self.skip_whitespace();
                    self.expect('=')?;
                    self.skip_whitespace();
                    let value = self.read_attribute_value()?;

                    if attributes.iter().any(|(k, _)| *k == key) {
                        return Err(CompilerError::schema(
                            &self.filename,
                            line,
                            format!("Duplicate attribute '{}' on <{}>", key, name),
                        ));
                    }
                    attributes.push((key, value));
                }
                None => {
                    return Err(self.error(format!("Unterminated start tag <{}>", name)));
                }
            }
        }
    }

    fn read_name(&mut self) -> Result<String> {
        let mut name = String::new();
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || ch == '/' || ch == '>' || ch == '=' {
                break;
            }
            name.push(self.advance());
        }

        if !self.name_regex.is_match(&name) {
            return Err(self.error(format!("Invalid name '{}'", name)));
        }

        Ok(name)
    }

    fn read_attribute_value(&mut self) -> Result<String> {
        let line = self.line;
        let quote = match self.peek() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error("Expected quoted attribute value")),
        };
        self.advance();

        let mut raw = String::new();
        loop {
            match self.peek() {
                Some(ch) if ch == quote => {
                    self.advance();
                    break;
                }
                Some(_) => raw.push(self.advance()),
                None => return Err(self.error("Unterminated attribute value")),
            }
        }

        self.decode_entities(&raw, line)
    }

    /// Decode the predefined entities and numeric character references
    fn decode_entities(&self, raw: &str, line: usize) -> Result<String> {
        if !raw.contains('&') {
            return Ok(raw.to_string());
        }

        let mut decoded = String::with_capacity(raw.len());
        let mut rest = raw;
        while let Some(amp) = rest.find('&') {
            decoded.push_str(&rest[..amp]);
            let after = &rest[amp + 1..];
            let semi = after.find(';').ok_or_else(|| {
                CompilerError::schema(&self.filename, line, "Unterminated entity reference")
            })?;
            let entity = &after[..semi];
            let ch = match entity {
                "lt" => '<',
                "gt" => '>',
                "amp" => '&',
                "quot" => '"',
                "apos" => '\'',
                _ => self.decode_char_reference(entity, line)?,
            };
            decoded.push(ch);
            rest = &after[semi + 1..];
        }
        decoded.push_str(rest);

        Ok(decoded)
    }

    fn decode_char_reference(&self, entity: &str, line: usize) -> Result<char> {
        let code = if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
            u32::from_str_radix(hex, 16).ok()
        } else if let Some(dec) = entity.strip_prefix('#') {
            dec.parse::<u32>().ok()
        } else {
            None
        };

        code.and_then(char::from_u32).ok_or_else(|| {
            CompilerError::schema(&self.filename, line, format!("Unknown entity '&{};'", entity))
        })
    }

    fn read_until(&mut self, terminator: &str, what: &str) -> Result<String> {
        let mut content = String::new();
        while !self.is_at_end() {
            if self.starts_with(terminator) {
                self.consume(terminator);
                return Ok(content);
            }
            content.push(self.advance());
        }
        Err(self.error(format!("Unterminated {}", what)))
    }

    fn expect(&mut self, expected: char) -> Result<()> {
        match self.peek() {
            Some(ch) if ch == expected => {
                self.advance();
                Ok(())
            }
            Some(ch) => Err(self.error(format!("Expected '{}', found '{}'", expected, ch))),
            None => Err(self.error(format!("Expected '{}', found end of input", expected))),
        }
    }

    fn error(&self, message: impl Into<String>) -> CompilerError {
        CompilerError::schema(&self.filename, self.line, message)
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn starts_with(&self, pattern: &str) -> bool {
        let mut index = self.position;
        for ch in pattern.chars() {
            if self.input.get(index) != Some(&ch) {
                return false;
            }
            index += 1;
        }
        true
    }

    fn consume(&mut self, pattern: &str) {
        for _ in pattern.chars() {
            self.advance();
        }
    }

    fn advance(&mut self) -> char {
        let ch = self.input[self.position];
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        ch
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }
}

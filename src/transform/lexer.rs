//! Go tokenizer
//!
//! Produces the token stream the top-level parser works on. Comments and
//! whitespace are skipped (the renderer splices into the original text, so
//! nothing is lost), and semicolons are inserted after line ends following
//! the same rule the Go compiler uses.

use std::fmt;

/// Kind of a lexed token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Keyword,
    Int,
    String,
    RawString,
    Rune,
    Operator,
    /// Explicit `;` or one inserted at a line end
    Semi,
    Eof,
}

/// A token with its byte span in the source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    /// True when a `Semi` was inserted rather than written
    pub implicit: bool,
}

impl Token {
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.start..self.end]
    }

    pub fn is_operator(&self, src: &str, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text(src) == op
    }

    pub fn is_keyword(&self, src: &str, kw: &str) -> bool {
        self.kind == TokenKind::Keyword && self.text(src) == kw
    }
}

/// Lexing failure with its byte offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub offset: usize,
    pub message: String,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at byte {}", self.message, self.offset)
    }
}

const KEYWORDS: &[&str] = &[
    "break",
    "case",
    "chan",
    "const",
    "continue",
    "default",
    "defer",
    "else",
    "fallthrough",
    "for",
    "func",
    "go",
    "goto",
    "if",
    "import",
    "interface",
    "map",
    "package",
    "range",
    "return",
    "select",
    "struct",
    "switch",
    "type",
    "var",
];

/// Operators and punctuation, longest first so the first match wins.
const OPERATORS: &[&str] = &[
    "<<=", ">>=", "&^=", "...", "&&", "||", "<-", "++", "--", "==", "!=", "<=", ">=", ":=", "+=",
    "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "&^", "+", "-", "*", "/", "%", "&", "|",
    "^", "<", ">", "=", "!", "(", ")", "[", "]", "{", "}", ",", ";", ".", ":", "~",
];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

/// Tokenize Go source text. The last token is always `Eof`.
pub fn tokenize(src: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(src).run()
}

struct Lexer<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        // A leading byte order mark is permitted and ignored.
        if self.src.starts_with('\u{feff}') {
            self.pos = '\u{feff}'.len_utf8();
        }

        while let Some(c) = self.peek_char() {
            match c {
                '\n' => {
                    self.newline(self.pos);
                    self.pos += 1;
                }
                ' ' | '\t' | '\r' => self.pos += 1,
                '/' if self.starts_with("//") => self.line_comment(),
                '/' if self.starts_with("/*") => self.block_comment()?,
                '"' => self.interpreted_string()?,
                '`' => self.raw_string()?,
                '\'' => self.rune()?,
                c if c.is_ascii_digit() => self.number(),
                '.' if self.next_is_digit() => self.number(),
                c if c == '_' || c.is_alphabetic() => self.word(),
                _ => self.operator()?,
            }
        }

        if self.needs_semicolon() {
            self.push(TokenKind::Semi, self.pos, self.pos, true);
        }
        self.push(TokenKind::Eof, self.pos, self.pos, false);
        Ok(self.tokens)
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn starts_with(&self, s: &str) -> bool {
        self.src[self.pos..].starts_with(s)
    }

    fn advance_char(&mut self) {
        self.pos += self.peek_char().map_or(1, char::len_utf8);
    }

    fn next_is_digit(&self) -> bool {
        self.bytes
            .get(self.pos + 1)
            .is_some_and(|b| b.is_ascii_digit())
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> LexError {
        LexError {
            offset,
            message: message.into(),
        }
    }

    fn push(&mut self, kind: TokenKind, start: usize, end: usize, implicit: bool) {
        self.tokens.push(Token {
            kind,
            start,
            end,
            implicit,
        });
    }

    /// Whether a line end after the previous token terminates a statement.
    fn needs_semicolon(&self) -> bool {
        let Some(last) = self.tokens.last() else {
            return false;
        };
        match last.kind {
            TokenKind::Ident
            | TokenKind::Int
            | TokenKind::String
            | TokenKind::RawString
            | TokenKind::Rune => true,
            TokenKind::Keyword => matches!(
                last.text(self.src),
                "break" | "continue" | "fallthrough" | "return"
            ),
            TokenKind::Operator => matches!(last.text(self.src), "++" | "--" | ")" | "]" | "}"),
            TokenKind::Semi | TokenKind::Eof => false,
        }
    }

    fn newline(&mut self, offset: usize) {
        if self.needs_semicolon() {
            self.push(TokenKind::Semi, offset, offset, true);
        }
    }

    fn line_comment(&mut self) {
        match self.src[self.pos..].find('\n') {
            // The newline itself is handled by the main loop.
            Some(rel) => self.pos += rel,
            None => self.pos = self.src.len(),
        }
    }

    fn block_comment(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let Some(rel) = self.src[start + 2..].find("*/") else {
            return Err(self.error(start, "comment not terminated"));
        };
        let end = start + 2 + rel + 2;
        if self.src[start..end].contains('\n') {
            self.newline(start);
        }
        self.pos = end;
        Ok(())
    }

    fn interpreted_string(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.bytes.get(self.pos) {
                None | Some(b'\n') => {
                    return Err(self.error(start, "string literal not terminated"));
                }
                Some(b'\\') => {
                    self.pos += 1;
                    self.advance_char();
                }
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.advance_char(),
            }
        }
        self.push(TokenKind::String, start, self.pos, false);
        Ok(())
    }

    fn raw_string(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let Some(rel) = self.src[start + 1..].find('`') else {
            return Err(self.error(start, "raw string literal not terminated"));
        };
        self.pos = start + 1 + rel + 1;
        self.push(TokenKind::RawString, start, self.pos, false);
        Ok(())
    }

    fn rune(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        self.pos += 1;
        let mut chars = 0usize;
        loop {
            match self.bytes.get(self.pos) {
                None | Some(b'\n') => return Err(self.error(start, "rune literal not terminated")),
                Some(b'\\') => {
                    self.pos += 1;
                    self.advance_char();
                    chars += 1;
                }
                Some(b'\'') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => {
                    self.advance_char();
                    chars += 1;
                }
            }
        }
        if chars == 0 {
            return Err(self.error(start, "empty rune literal"));
        }
        self.push(TokenKind::Rune, start, self.pos, false);
        Ok(())
    }

    fn number(&mut self) {
        let start = self.pos;
        let hex = self.starts_with("0x") || self.starts_with("0X");
        while let Some(&b) = self.bytes.get(self.pos) {
            let exponent = matches!(b, b'p' | b'P') || (!hex && matches!(b, b'e' | b'E'));
            if exponent && matches!(self.bytes.get(self.pos + 1), Some(b'+' | b'-')) {
                self.pos += 2;
            } else if b.is_ascii_alphanumeric() || b == b'_' || b == b'.' {
                self.pos += 1;
            } else {
                break;
            }
        }
        self.push(TokenKind::Int, start, self.pos, false);
    }

    fn word(&mut self) {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c == '_' || c.is_alphanumeric() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let kind = if is_keyword(&self.src[start..self.pos]) {
            TokenKind::Keyword
        } else {
            TokenKind::Ident
        };
        self.push(kind, start, self.pos, false);
    }

    fn operator(&mut self) -> Result<(), LexError> {
        let start = self.pos;
        let Some(op) = OPERATORS.iter().find(|op| self.starts_with(op)) else {
            let c = self.peek_char().unwrap_or('\0');
            return Err(self.error(start, format!("unexpected character {c:?}")));
        };
        self.pos += op.len();
        let kind = if *op == ";" {
            TokenKind::Semi
        } else {
            TokenKind::Operator
        };
        self.push(kind, start, self.pos, false);
        Ok(())
    }
}

//! Syntax tree for a single Go source file
//!
//! Only the parts the import patch needs are modelled structurally: the
//! package clause, import declarations and their specifiers. Every other
//! top-level declaration is recorded by its keyword. Specifiers and group
//! parentheses carry byte offsets into the source, which is where edits are
//! spliced.

use std::fmt;

/// A byte range in the original source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// `package <name>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageClause {
    pub name: String,
    /// Offset of the terminating semicolon (explicit or inserted at the line end)
    pub terminator: usize,
    pub explicit_terminator: bool,
}

/// Binding of an import specifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportName {
    /// `import foo "path"`
    Named(String),
    /// `import . "path"`
    Dot,
    /// `import _ "path"`, imported only for its initialization side effects
    Discard,
}

impl fmt::Display for ImportName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportName::Named(name) => f.write_str(name),
            ImportName::Dot => f.write_str("."),
            ImportName::Discard => f.write_str("_"),
        }
    }
}

/// An import path as written and as decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPath {
    /// Source form including quotes, e.g. `"fmt"` or `` `fmt` ``
    pub literal: String,
    /// Decoded value, e.g. `fmt`
    pub value: String,
}

impl ImportPath {
    /// Build a path from its decoded value using the canonical double-quoted form.
    pub fn from_value(value: &str) -> Self {
        Self {
            literal: quote(value),
            value: value.to_string(),
        }
    }

    /// Build a path from a string literal token.
    pub fn from_literal(literal: &str) -> Option<Self> {
        Some(Self {
            literal: literal.to_string(),
            value: unquote(literal)?,
        })
    }
}

/// One `[name] "path"` entry of an import declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    pub name: Option<ImportName>,
    pub path: ImportPath,
    /// Location in the original source; `None` for specifiers added in memory
    pub span: Option<Span>,
}

impl ImportSpec {
    /// A side-effect-only import of `value`
    pub fn discard(value: &str) -> Self {
        Self {
            name: Some(ImportName::Discard),
            path: ImportPath::from_value(value),
            span: None,
        }
    }

    /// Go source text of this specifier
    pub fn to_source(&self) -> String {
        match &self.name {
            Some(name) => format!("{} {}", name, self.path.literal),
            None => self.path.literal.clone(),
        }
    }
}

/// `import "x"` or `import ( ... )`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    /// Offsets of `(` and `)` for a parenthesized group
    pub lparen: Option<usize>,
    pub rparen: Option<usize>,
    pub specs: Vec<ImportSpec>,
}

impl ImportDecl {
    pub fn is_grouped(&self) -> bool {
        self.lparen.is_some()
    }
}

/// A top-level declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Import(ImportDecl),
    /// `func`, `var`, `const` or `type` declaration, kept verbatim
    Other { keyword: String },
}

impl Decl {
    /// Leading keyword of the declaration
    pub fn keyword(&self) -> &str {
        match self {
            Decl::Import(_) => "import",
            Decl::Other { keyword } => keyword,
        }
    }
}

/// The parsed form of one Go source file
#[derive(Debug, Clone)]
pub struct SourceUnit {
    pub(crate) source: String,
    pub package: PackageClause,
    pub decls: Vec<Decl>,
}

impl SourceUnit {
    /// All import specifiers across all import declarations, in source order
    pub fn imports(&self) -> impl Iterator<Item = &ImportSpec> {
        self.decls
            .iter()
            .filter_map(|decl| match decl {
                Decl::Import(import) => Some(import.specs.iter()),
                Decl::Other { .. } => None,
            })
            .flatten()
    }

    /// Whether any specifier imports `value`
    pub fn has_import(&self, value: &str) -> bool {
        self.imports().any(|spec| spec.path.value == value)
    }

    pub fn import_decls(&self) -> impl Iterator<Item = &ImportDecl> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Import(import) => Some(import),
            Decl::Other { .. } => None,
        })
    }
}

/// Quote `value` as a Go interpreted string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let code = u32::from(c);
                if code < 0x80 {
                    out.push_str(&format!("\\x{code:02x}"));
                } else {
                    out.push_str(&format!("\\u{code:04x}"));
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Decode a Go string literal (interpreted or raw). Returns `None` when the
/// literal is malformed.
pub fn unquote(literal: &str) -> Option<String> {
    if literal.len() >= 2 && literal.starts_with('`') && literal.ends_with('`') {
        // Carriage returns are discarded from raw string values.
        return Some(literal[1..literal.len() - 1].replace('\r', ""));
    }
    if literal.len() < 2 || !literal.starts_with('"') || !literal.ends_with('"') {
        return None;
    }

    let body = &literal[1..literal.len() - 1];
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            if c == '"' || c == '\n' {
                return None;
            }
            out.push(c);
            continue;
        }
        let escaped = chars.next()?;
        match escaped {
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0c}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0b}'),
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            'x' => out.push(char::from(read_radix(&mut chars, 2, 16)? as u8)),
            'u' => out.push(char::from_u32(read_radix(&mut chars, 4, 16)?)?),
            'U' => out.push(char::from_u32(read_radix(&mut chars, 8, 16)?)?),
            '0'..='7' => {
                let rest = read_radix(&mut chars, 2, 8)?;
                let code = escaped.to_digit(8)? * 64 + rest;
                out.push(char::from(u8::try_from(code).ok()?));
            }
            _ => return None,
        }
    }
    Some(out)
}

fn read_radix(chars: &mut std::str::Chars<'_>, digits: usize, radix: u32) -> Option<u32> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * radix + chars.next()?.to_digit(radix)?;
    }
    Some(value)
}

//! Top-level Go parser
//!
//! Builds a [`SourceUnit`] from source text. The grammar followed is the
//! file-level part of the Go specification:
//!
//! ```text
//! SourceFile  = PackageClause ";" { ImportDecl ";" } { TopLevelDecl ";" } .
//! ImportDecl  = "import" ( ImportSpec | "(" { ImportSpec ";" } ")" ) .
//! ImportSpec  = [ "." | PackageName ] ImportPath .
//! ```
//!
//! Top-level declarations other than imports are checked for a valid leading
//! keyword and balanced brackets, then recorded by keyword only.

use std::fmt;

use super::ast::{
    Decl, ImportDecl, ImportName, ImportPath, ImportSpec, PackageClause, SourceUnit, Span,
};
use super::lexer::{self, LexError, Token, TokenKind};

/// Parse failure with a 1-based line and byte column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl ParseError {
    fn at(src: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(src.len());
        let before = &src.as_bytes()[..offset];
        let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |pos| pos + 1);
        Self {
            line,
            column: offset - line_start + 1,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

/// Parse one Go source file.
pub fn parse(src: &str) -> Result<SourceUnit, ParseError> {
    let tokens = lexer::tokenize(src)
        .map_err(|LexError { offset, message }| ParseError::at(src, offset, message))?;
    Parser {
        src,
        tokens,
        pos: 0,
    }
    .source_file()
}

struct Parser<'a> {
    src: &'a str,
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Token {
        // The token list always ends with Eof and `pos` never moves past it.
        self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn next(&mut self) -> Token {
        let tok = self.peek();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    fn describe(&self, tok: Token) -> String {
        match tok.kind {
            TokenKind::Eof => "EOF".to_string(),
            TokenKind::Semi if tok.implicit => "newline".to_string(),
            _ => format!("'{}'", tok.text(self.src)),
        }
    }

    fn error(&self, tok: Token, expected: &str) -> ParseError {
        ParseError::at(
            self.src,
            tok.start,
            format!("expected {expected}, found {}", self.describe(tok)),
        )
    }

    fn expect_semi(&mut self, context: &str) -> Result<Token, ParseError> {
        let tok = self.next();
        if tok.kind == TokenKind::Semi {
            Ok(tok)
        } else {
            Err(self.error(tok, &format!("';' after {context}")))
        }
    }

    fn source_file(mut self) -> Result<SourceUnit, ParseError> {
        let package = self.package_clause()?;
        let mut decls = Vec::new();
        let mut seen_other = false;

        loop {
            let tok = self.peek();
            if tok.kind == TokenKind::Eof {
                break;
            }
            if tok.is_keyword(self.src, "import") {
                if seen_other {
                    return Err(ParseError::at(
                        self.src,
                        tok.start,
                        "imports must appear before other declarations",
                    ));
                }
                decls.push(Decl::Import(self.import_decl()?));
            } else if tok.kind == TokenKind::Keyword
                && matches!(tok.text(self.src), "func" | "var" | "const" | "type")
            {
                seen_other = true;
                decls.push(self.other_decl()?);
            } else {
                return Err(self.error(tok, "declaration"));
            }
        }

        Ok(SourceUnit {
            source: self.src.to_string(),
            package,
            decls,
        })
    }

    fn package_clause(&mut self) -> Result<PackageClause, ParseError> {
        let keyword = self.next();
        if !keyword.is_keyword(self.src, "package") {
            return Err(self.error(keyword, "'package'"));
        }
        let name = self.next();
        if name.kind != TokenKind::Ident {
            return Err(self.error(name, "package name"));
        }
        if name.text(self.src) == "_" {
            return Err(ParseError::at(
                self.src,
                name.start,
                "invalid package name _",
            ));
        }
        let semi = self.expect_semi("package clause")?;
        Ok(PackageClause {
            name: name.text(self.src).to_string(),
            terminator: semi.start,
            explicit_terminator: !semi.implicit,
        })
    }

    fn import_decl(&mut self) -> Result<ImportDecl, ParseError> {
        // `import`
        self.next();

        if !self.peek().is_operator(self.src, "(") {
            let spec = self.import_spec()?;
            self.expect_semi("import declaration")?;
            return Ok(ImportDecl {
                lparen: None,
                rparen: None,
                specs: vec![spec],
            });
        }

        let lparen = self.next();
        let mut specs = Vec::new();
        while !self.peek().is_operator(self.src, ")") {
            specs.push(self.import_spec()?);
            let tok = self.peek();
            if tok.kind == TokenKind::Semi {
                self.next();
            } else if !tok.is_operator(self.src, ")") {
                return Err(self.error(tok, "';' or ')' after import"));
            }
        }
        let rparen = self.next();
        self.expect_semi("import declaration")?;

        Ok(ImportDecl {
            lparen: Some(lparen.start),
            rparen: Some(rparen.start),
            specs,
        })
    }

    fn import_spec(&mut self) -> Result<ImportSpec, ParseError> {
        let first = self.peek();
        let name = if first.kind == TokenKind::Ident {
            self.next();
            Some(match first.text(self.src) {
                "_" => ImportName::Discard,
                ident => ImportName::Named(ident.to_string()),
            })
        } else if first.is_operator(self.src, ".") {
            self.next();
            Some(ImportName::Dot)
        } else {
            None
        };

        let literal = self.next();
        if !matches!(literal.kind, TokenKind::String | TokenKind::RawString) {
            return Err(self.error(literal, "import path"));
        }
        let path = ImportPath::from_literal(literal.text(self.src)).ok_or_else(|| {
            ParseError::at(self.src, literal.start, "malformed import path literal")
        })?;
        if path.value.is_empty() {
            return Err(ParseError::at(
                self.src,
                literal.start,
                "invalid import path: empty",
            ));
        }

        Ok(ImportSpec {
            name,
            path,
            span: Some(Span::new(first.start, literal.end)),
        })
    }

    fn other_decl(&mut self) -> Result<Decl, ParseError> {
        let keyword = self.next();
        let mut open: Vec<Token> = Vec::new();
        let mut end = keyword.end;

        loop {
            let tok = self.next();
            match tok.kind {
                TokenKind::Eof => {
                    return Err(match open.last() {
                        Some(&unclosed) => ParseError::at(
                            self.src,
                            unclosed.start,
                            format!("'{}' is never closed", unclosed.text(self.src)),
                        ),
                        None => self.error(tok, "';'"),
                    });
                }
                TokenKind::Semi if open.is_empty() => {
                    if end == keyword.end {
                        return Err(self.error(tok, "declaration body"));
                    }
                    break;
                }
                TokenKind::Keyword
                    if matches!(tok.text(self.src), "package" | "import") =>
                {
                    return Err(self.error(tok, "statement or expression"));
                }
                TokenKind::Operator => match tok.text(self.src) {
                    "(" | "[" | "{" => open.push(tok),
                    close @ (")" | "]" | "}") => {
                        let expected = match close {
                            ")" => "(",
                            "]" => "[",
                            _ => "{",
                        };
                        match open.pop() {
                            Some(opener) if opener.text(self.src) == expected => {}
                            _ => {
                                return Err(ParseError::at(
                                    self.src,
                                    tok.start,
                                    format!("unexpected '{close}'"),
                                ));
                            }
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
            end = tok.end;
        }

        Ok(Decl::Other {
            keyword: keyword.text(self.src).to_string(),
        })
    }
}

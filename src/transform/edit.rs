//! Import insertion and rendering
//!
//! Mutations are planned as text insertions at offsets the parser recorded,
//! spliced into the original source, and the result is parsed again. The
//! unit therefore always mirrors its own text, and a splice that would break
//! the file is caught before anything is rendered.

use std::fmt;

use super::ast::{ImportDecl, ImportSpec, SourceUnit};
use super::parser::{self, ParseError};

/// Characters the Go toolchain rejects in import paths
const INVALID_IMPORT_CHARS: &str = "!\"#$%&'()*,:;<=>?[\\]^`{|}";

/// Reasons a mutation can be refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    InvalidImportPath(String),
    /// The spliced text failed to parse
    Reparse(ParseError),
    /// The spliced text parses but does not import the path
    NotInserted(String),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::InvalidImportPath(path) => write!(f, "invalid import path {path:?}"),
            EditError::Reparse(err) => write!(f, "spliced source does not parse: {err}"),
            EditError::NotInserted(path) => {
                write!(f, "spliced source does not import {path:?}")
            }
        }
    }
}

/// Whether `value` is acceptable as a Go import path.
pub fn is_valid_import_path(value: &str) -> bool {
    !value.is_empty()
        && value.chars().all(|c| {
            !c.is_whitespace()
                && !c.is_control()
                && c != '\u{fffd}'
                && !INVALID_IMPORT_CHARS.contains(c)
        })
}

struct Insertion {
    offset: usize,
    /// Closing text sorts after everything else inserted at the same offset
    closing: bool,
    text: String,
}

impl Insertion {
    fn new(offset: usize, text: String) -> Self {
        Self {
            offset,
            closing: false,
            text,
        }
    }

    fn closing(offset: usize, text: String) -> Self {
        Self {
            offset,
            closing: true,
            text,
        }
    }
}

impl SourceUnit {
    /// Add `_ "value"` to the file unless some specifier already imports
    /// `value`. Returns whether the unit changed.
    ///
    /// The specifier goes into the first import declaration; a file without
    /// imports gets a new declaration right after its package clause.
    pub fn add_blank_import(&mut self, value: &str) -> Result<bool, EditError> {
        if !is_valid_import_path(value) {
            return Err(EditError::InvalidImportPath(value.to_string()));
        }
        if self.has_import(value) {
            return Ok(false);
        }

        let spec = ImportSpec::discard(value);
        let insertions = match self.first_import_decl() {
            Some(decl) if decl.is_grouped() => self.extend_group(decl, &spec),
            Some(decl) => self.convert_to_group(decl, &spec),
            None => self.synthesize_decl(&spec),
        };

        let text = splice(&self.source, insertions);
        let unit = parser::parse(&text).map_err(EditError::Reparse)?;
        if !unit.has_import(value) {
            return Err(EditError::NotInserted(value.to_string()));
        }
        *self = unit;
        Ok(true)
    }

    /// Source text of the unit, including applied mutations
    pub fn render(&self) -> String {
        self.source.clone()
    }

    fn first_import_decl(&self) -> Option<&ImportDecl> {
        self.import_decls().next()
    }

    fn newline(&self) -> &'static str {
        if self.source.contains("\r\n") {
            "\r\n"
        } else {
            "\n"
        }
    }

    /// Leading whitespace of the line containing `offset`
    fn indentation_at(&self, offset: usize) -> &str {
        let line_start = self.source[..offset].rfind('\n').map_or(0, |pos| pos + 1);
        let line = &self.source[line_start..];
        let width = line
            .find(|c: char| c != ' ' && c != '\t')
            .unwrap_or(line.len());
        &line[..width]
    }

    fn extend_group(&self, decl: &ImportDecl, spec: &ImportSpec) -> Vec<Insertion> {
        let (Some(lparen), Some(rparen)) = (decl.lparen, decl.rparen) else {
            return self.convert_to_group(decl, spec);
        };
        let last_end = decl.specs.iter().rev().find_map(|s| s.span).map(|s| s.end);
        let anchor = last_end.unwrap_or(lparen + 1);

        if self.source[anchor..rparen].contains('\n') {
            let nl = self.newline();
            let indent = match decl.specs.iter().rev().find_map(|s| s.span) {
                Some(span) => self.indentation_at(span.start),
                None => "\t",
            };
            let line_start = self.source[..rparen].rfind('\n').map_or(0, |pos| pos + 1);
            if self.source[line_start..rparen].trim().is_empty() {
                // `)` sits on its own line: add a line above it.
                return vec![Insertion::new(
                    line_start,
                    format!("{indent}{}{nl}", spec.to_source()),
                )];
            }
            // Text before `)` may close a block comment opened earlier.
            return vec![Insertion::new(
                anchor,
                format!("{nl}{indent}{}", spec.to_source()),
            )];
        }

        match last_end {
            Some(end) => vec![Insertion::new(end, format!("; {}", spec.to_source()))],
            None => vec![Insertion::new(lparen + 1, spec.to_source())],
        }
    }

    fn convert_to_group(&self, decl: &ImportDecl, spec: &ImportSpec) -> Vec<Insertion> {
        let nl = self.newline();
        let Some(existing) = decl.specs.first().and_then(|s| s.span) else {
            return self.synthesize_decl(spec);
        };
        vec![
            Insertion::new(existing.start, format!("({nl}\t")),
            Insertion::new(existing.end, format!("{nl}\t{}", spec.to_source())),
            Insertion::closing(existing.end, format!("{nl})")),
        ]
    }

    fn synthesize_decl(&self, spec: &ImportSpec) -> Vec<Insertion> {
        let nl = self.newline();
        let decl = format!("import {}", spec.to_source());
        let package = &self.package;

        if package.explicit_terminator {
            vec![Insertion::new(
                package.terminator + 1,
                format!("{nl}{nl}{decl}{nl}"),
            )]
        } else if package.terminator >= self.source.len() {
            vec![Insertion::new(
                self.source.len(),
                format!("{nl}{nl}{decl}{nl}"),
            )]
        } else {
            // The terminator offset is the line end; a preceding `\r` stays with its `\n`.
            let offset = if self.source[..package.terminator].ends_with('\r') {
                package.terminator - 1
            } else {
                package.terminator
            };
            vec![Insertion::new(offset, format!("{nl}{nl}{decl}"))]
        }
    }
}

fn splice(source: &str, mut insertions: Vec<Insertion>) -> String {
    insertions.sort_by_key(|ins| (ins.offset, ins.closing));
    let extra: usize = insertions.iter().map(|ins| ins.text.len()).sum();
    let mut out = String::with_capacity(source.len() + extra);
    let mut cursor = 0;
    for ins in insertions {
        out.push_str(&source[cursor..ins.offset]);
        out.push_str(&ins.text);
        cursor = ins.offset;
    }
    out.push_str(&source[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::ast::{Decl, ImportName};

    const TRACER: &str = "github.com/ethereum/go-ethereum/eth/tracers/native/simple";

    fn patch(src: &str, value: &str) -> String {
        let mut unit = parser::parse(src).unwrap();
        assert!(unit.add_blank_import(value).unwrap());
        unit.render()
    }

    #[test]
    fn test_extend_group_appends_last() {
        let src = "package main\n\nimport (\n\t\"fmt\"\n\t\"os\"\n)\n\nfunc main() {}\n";
        assert_eq!(
            patch(src, TRACER),
            format!(
                "package main\n\nimport (\n\t\"fmt\"\n\t\"os\"\n\t_ \"{TRACER}\"\n)\n\nfunc main() {{}}\n"
            )
        );
    }

    #[test]
    fn test_extend_group_keeps_order() {
        let src = "package main\nimport (\n\t\"b\"\n\t\"a\"\n)\n";
        let mut unit = parser::parse(src).unwrap();
        unit.add_blank_import("c").unwrap();
        let values: Vec<&str> = unit.imports().map(|s| s.path.value.as_str()).collect();
        assert_eq!(values, vec!["b", "a", "c"]);
        assert_eq!(
            unit.imports().last().unwrap().name,
            Some(ImportName::Discard)
        );
    }

    #[test]
    fn test_extend_group_uses_existing_indentation() {
        let src = "package main\nimport (\n    \"fmt\"\n)\n";
        assert_eq!(
            patch(src, "x/y"),
            "package main\nimport (\n    \"fmt\"\n    _ \"x/y\"\n)\n"
        );
    }

    #[test]
    fn test_extend_group_after_trailing_comment() {
        let src = "package main\nimport (\n\t\"fmt\" // printing\n\t// more to come\n)\n";
        assert_eq!(
            patch(src, "x/y"),
            "package main\nimport (\n\t\"fmt\" // printing\n\t// more to come\n\t_ \"x/y\"\n)\n"
        );
    }

    #[test]
    fn test_extend_group_on_one_line() {
        assert_eq!(
            patch("package main\nimport (\"fmt\")\n", "x/y"),
            "package main\nimport (\"fmt\"; _ \"x/y\")\n"
        );
    }

    #[test]
    fn test_extend_empty_group() {
        assert_eq!(
            patch("package main\nimport ()\n", "x/y"),
            "package main\nimport (_ \"x/y\")\n"
        );
        assert_eq!(
            patch("package main\nimport (\n)\n", "x/y"),
            "package main\nimport (\n\t_ \"x/y\"\n)\n"
        );
    }

    #[test]
    fn test_convert_single_import_to_group() {
        assert_eq!(
            patch("package main\n\nimport \"fmt\"\n\nfunc main() {}\n", "x/y"),
            "package main\n\nimport (\n\t\"fmt\"\n\t_ \"x/y\"\n)\n\nfunc main() {}\n"
        );
    }

    #[test]
    fn test_convert_named_single_import() {
        assert_eq!(
            patch("package main\nimport f \"fmt\" // note\n", "x/y"),
            "package main\nimport (\n\tf \"fmt\"\n\t_ \"x/y\"\n) // note\n"
        );
    }

    #[test]
    fn test_synthesize_when_no_imports() {
        let out = patch("package main\n\nfunc main() {}\n", "x/y");
        assert_eq!(out, "package main\n\nimport _ \"x/y\"\n\nfunc main() {}\n");

        let unit = parser::parse(&out).unwrap();
        assert_eq!(unit.import_decls().count(), 1);
        assert_eq!(unit.imports().count(), 1);
        assert!(matches!(unit.decls[0], Decl::Import(_)));
    }

    #[test]
    fn test_synthesize_keeps_package_comment() {
        assert_eq!(
            patch("package main // entry\nfunc main() {}\n", "x/y"),
            "package main // entry\n\nimport _ \"x/y\"\nfunc main() {}\n"
        );
    }

    #[test]
    fn test_synthesize_at_eof() {
        assert_eq!(
            patch("package main", "x/y"),
            "package main\n\nimport _ \"x/y\"\n"
        );
    }

    #[test]
    fn test_synthesize_after_explicit_semicolon() {
        let out = patch("package main; func main() {}\n", "x/y");
        assert!(parser::parse(&out).unwrap().has_import("x/y"));
        assert!(out.starts_with("package main;\n\nimport _ \"x/y\"\n"));
    }

    #[test]
    fn test_crlf_line_endings_are_kept() {
        assert_eq!(
            patch("package main\r\n\r\nfunc main() {}\r\n", "x/y"),
            "package main\r\n\r\nimport _ \"x/y\"\r\n\r\nfunc main() {}\r\n"
        );
        assert_eq!(
            patch("package main\r\nimport \"fmt\"\r\n", "x/y"),
            "package main\r\nimport (\r\n\t\"fmt\"\r\n\t_ \"x/y\"\r\n)\r\n"
        );
    }

    #[test]
    fn test_only_first_group_is_extended() {
        let src = "package main\nimport (\n\t\"a\"\n)\nimport (\n\t\"b\"\n)\n";
        let out = patch(src, "c");
        assert_eq!(
            out,
            "package main\nimport (\n\t\"a\"\n\t_ \"c\"\n)\nimport (\n\t\"b\"\n)\n"
        );
    }

    #[test]
    fn test_existing_import_is_not_duplicated() {
        let src = "package main\nimport (\n\t_ \"x/y\"\n)\n";
        let mut unit = parser::parse(src).unwrap();
        assert!(!unit.add_blank_import("x/y").unwrap());
        assert_eq!(unit.render(), src);
    }

    #[test]
    fn test_named_existing_import_counts_as_present() {
        let mut unit = parser::parse("package main\nimport y \"x/y\"\n").unwrap();
        assert!(!unit.add_blank_import("x/y").unwrap());
    }

    #[test]
    fn test_raw_string_existing_import_counts_as_present() {
        let mut unit = parser::parse("package main\nimport `x/y`\n").unwrap();
        assert!(!unit.add_blank_import("x/y").unwrap());
    }

    #[test]
    fn test_repeated_mutation_in_memory() {
        let mut unit = parser::parse("package main\nimport \"fmt\"\n").unwrap();
        assert!(unit.add_blank_import("a").unwrap());
        assert!(unit.add_blank_import("b").unwrap());
        assert!(!unit.add_blank_import("a").unwrap());
        assert_eq!(
            unit.render(),
            "package main\nimport (\n\t\"fmt\"\n\t_ \"a\"\n\t_ \"b\"\n)\n"
        );
    }

    #[test]
    fn test_invalid_import_paths_are_rejected() {
        let mut unit = parser::parse("package main\n").unwrap();
        for bad in ["", "has space", "quote\"d", "semi;colon", "tab\there", "a{b}"] {
            assert!(
                matches!(
                    unit.add_blank_import(bad),
                    Err(EditError::InvalidImportPath(_))
                ),
                "{bad:?} should be rejected"
            );
        }
        assert_eq!(unit.render(), "package main\n");
    }

    #[test]
    fn test_valid_import_paths() {
        assert!(is_valid_import_path("github.com/a-b/c_d/v2"));
        assert!(is_valid_import_path("example.com/ünïcode"));
        assert!(!is_valid_import_path("a\u{fffd}b"));
    }

    #[test]
    fn test_comments_and_other_decls_untouched() {
        let src = "// Copyright header\n\n// Package main is the entry point.\npackage main\n\nimport (\n\t\"fmt\"\n\n\t// tracers\n\t_ \"github.com/x/tracers/js\"\n)\n\n/* keep me */\nvar version = \"1.0\" // trailing\n\nfunc main() {\n\tfmt.Println(version)\n}\n";
        let out = patch(src, TRACER);
        let expected = src.replace(
            "\t_ \"github.com/x/tracers/js\"\n)",
            &format!("\t_ \"github.com/x/tracers/js\"\n\t_ \"{TRACER}\"\n)"),
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn test_extend_group_closed_after_block_comment() {
        let src = "package main\nimport (\n\t\"fmt\" /* a\n b */)\n";
        let out = patch(src, "x/y");
        assert_eq!(
            out,
            "package main\nimport (\n\t\"fmt\"\n\t_ \"x/y\" /* a\n b */)\n"
        );
        assert!(parser::parse(&out).unwrap().has_import("x/y"));
    }

    #[test]
    fn test_extend_empty_group_closed_after_block_comment() {
        let out = patch("package main\nimport ( /* a\n b */)\n", "x/y");
        assert_eq!(out, "package main\nimport (\n\t_ \"x/y\" /* a\n b */)\n");
    }
}

//! Entry-point patching
//!
//! Adds a blank (side-effect-only) import to a Go source file so the
//! imported package's `init` functions register themselves when the binary
//! starts. The file is parsed into an [`ast::SourceUnit`], mutated, and written
//! back only if something changed.

pub mod ast;
pub mod edit;
pub mod lexer;
pub mod parser;

use std::fs;
use std::path::Path;

pub use edit::{EditError, is_valid_import_path};
pub use parser::parse;

use crate::common::fs::write_atomic;
use crate::error::{self, Result};

/// What [`add_import_to_file`] did to the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The import was added and the file rewritten
    Added,
    /// The file already imported the path and was left untouched
    AlreadyPresent,
}

/// Ensure the Go file at `path` imports `import_path` for side effects.
///
/// Existing imports of the same path (under any name) satisfy the request,
/// so repeated runs leave the file byte-identical.
pub fn add_import_to_file(path: &Path, import_path: &str) -> Result<PatchOutcome> {
    let shown = path.display().to_string();
    if !is_valid_import_path(import_path) {
        return Err(error::transform::invalid_import_path(import_path));
    }

    let source = fs::read_to_string(path)
        .map_err(|e| error::transform::read_failed(&shown, e.to_string()))?;
    let mut unit = parse(&source).map_err(|e| {
        error::transform::parse_failed(&shown, e.line, e.column, e.message)
    })?;
    tracing::debug!(
        path = %shown,
        package = %unit.package.name,
        decls = ?unit.decls.iter().map(ast::Decl::keyword).collect::<Vec<_>>(),
        "parsed entry point"
    );

    match unit.add_blank_import(import_path) {
        Ok(false) => {
            tracing::debug!(path = %shown, import_path, "import already present");
            return Ok(PatchOutcome::AlreadyPresent);
        }
        Ok(true) => {}
        Err(EditError::InvalidImportPath(value)) => {
            return Err(error::transform::invalid_import_path(value));
        }
        Err(err @ (EditError::Reparse(_) | EditError::NotInserted(_))) => {
            return Err(error::transform::failed(&shown, err.to_string()));
        }
    }

    write_atomic(path, unit.render().as_bytes())
        .map_err(|e| error::transform::write_failed(&shown, e.to_string()))?;
    tracing::info!(path = %shown, import_path, "added blank import");
    Ok(PatchOutcome::Added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuilderError;

    const TRACER: &str = "github.com/ethereum/go-ethereum/eth/tracers/native/simpletracer";

    const GETH_MAIN: &str = r#"// Copyright 2014 The go-ethereum Authors
// This file is part of go-ethereum.

// geth is the official command-line client for Ethereum.
package main

import (
	"fmt"
	"os"
	"slices"
	"sort"
	"strconv"
	"time"

	"github.com/ethereum/go-ethereum/accounts"
	"github.com/ethereum/go-ethereum/cmd/utils"
	"github.com/ethereum/go-ethereum/internal/debug"
	"github.com/ethereum/go-ethereum/log"

	// Force-load the tracer engines to trigger registration
	_ "github.com/ethereum/go-ethereum/eth/tracers/js"
	_ "github.com/ethereum/go-ethereum/eth/tracers/live"
	_ "github.com/ethereum/go-ethereum/eth/tracers/native"

	"github.com/urfave/cli/v2"
)

const (
	clientIdentifier = "geth" // Client identifier to advertise over the network
)

var (
	// flags that configure the node
	nodeFlags = slices.Concat([]cli.Flag{
		utils.IdentityFlag,
	}, utils.NetworkFlags)
)

func init() {
	app.Action = geth
	sort.Sort(cli.CommandsByName(app.Commands))
}

func main() {
	if err := app.Run(os.Args); err != nil {
		fmt.Fprintln(os.Stderr, err)
		os.Exit(1)
	}
}
"#;

    fn write_main(dir: &Path, contents: &str) -> std::path::PathBuf {
        let path = dir.join("main.go");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_adds_import_to_geth_main() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = write_main(temp.path(), GETH_MAIN);

        assert_eq!(
            add_import_to_file(&path, TRACER).unwrap(),
            PatchOutcome::Added
        );

        let patched = fs::read_to_string(&path).unwrap();
        let unit = parse(&patched).unwrap();
        assert!(unit.has_import(TRACER));
        assert_eq!(
            unit.imports().filter(|s| s.path.value == TRACER).count(),
            1
        );

        let expected = GETH_MAIN.replace(
            "\t\"github.com/urfave/cli/v2\"\n)",
            &format!("\t\"github.com/urfave/cli/v2\"\n\t_ \"{TRACER}\"\n)"),
        );
        assert_eq!(patched, expected);
    }

    #[test]
    fn test_second_run_is_byte_identical() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = write_main(temp.path(), GETH_MAIN);

        add_import_to_file(&path, TRACER).unwrap();
        let first = fs::read(&path).unwrap();

        assert_eq!(
            add_import_to_file(&path, TRACER).unwrap(),
            PatchOutcome::AlreadyPresent
        );
        assert_eq!(fs::read(&path).unwrap(), first);
    }

    #[test]
    fn test_existing_blank_import_is_left_alone() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = write_main(temp.path(), GETH_MAIN);
        let native = "github.com/ethereum/go-ethereum/eth/tracers/native";

        assert_eq!(
            add_import_to_file(&path, native).unwrap(),
            PatchOutcome::AlreadyPresent
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), GETH_MAIN);
    }

    #[test]
    fn test_file_without_imports_gains_declaration() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = write_main(temp.path(), "package main\n\nfunc main() {}\n");

        add_import_to_file(&path, TRACER).unwrap();
        let unit = parse(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(unit.import_decls().count(), 1);
        assert!(unit.has_import(TRACER));
    }

    #[test]
    fn test_group_closed_inside_comment_line_gets_import() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = write_main(temp.path(), "package main\nimport (\n\t\"fmt\" /* a\n b */)\n");

        assert_eq!(
            add_import_to_file(&path, TRACER).unwrap(),
            PatchOutcome::Added
        );
        let unit = parse(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(unit.has_import(TRACER));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = add_import_to_file(&temp.path().join("missing.go"), TRACER).unwrap_err();
        assert!(matches!(err, BuilderError::EntryPointReadFailed { .. }));
    }

    #[test]
    fn test_invalid_source_is_parse_error_and_untouched() {
        let temp = tempfile::TempDir::new().unwrap();
        let broken = "package main\n\nimport (\n\t\"fmt\"\n\nfunc main() {}\n";
        let path = write_main(temp.path(), broken);

        let err = add_import_to_file(&path, TRACER).unwrap_err();
        match err {
            BuilderError::EntryPointParseFailed { line, .. } => assert_eq!(line, 6),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), broken);
    }

    #[test]
    fn test_invalid_import_path_leaves_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = write_main(temp.path(), GETH_MAIN);

        let err = add_import_to_file(&path, "native/has space").unwrap_err();
        assert!(matches!(err, BuilderError::InvalidImportPath { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), GETH_MAIN);
    }

    #[cfg(unix)]
    #[test]
    fn test_permissions_survive_rewrite() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::TempDir::new().unwrap();
        let path = write_main(temp.path(), GETH_MAIN);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o640)).unwrap();

        add_import_to_file(&path, TRACER).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }
}

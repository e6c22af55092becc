//! Common test utilities for geth-builder integration tests

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Entry point written into the fake go-ethereum checkout
#[allow(dead_code)]
pub const MAIN_GO: &str = r#"// Copyright 2014 The go-ethereum Authors

// geth is the official command-line client for Ethereum.
package main

import (
	"fmt"
	"os"

	// Force-load the tracer engines to trigger registration
	_ "github.com/ethereum/go-ethereum/eth/tracers/js"
	_ "github.com/ethereum/go-ethereum/eth/tracers/native"
)

func main() {
	if err := app.Run(os.Args); err != nil {
		fmt.Fprintln(os.Stderr, err)
		os.Exit(1)
	}
}
"#;

/// Import path the `mytracer` plugin is registered under
#[allow(dead_code)]
pub const MYTRACER_IMPORT: &str = "github.com/ethereum/go-ethereum/eth/tracers/native/mytracer";

/// A scratch directory holding a config file, a plugin, a pre-existing
/// go-ethereum checkout and a stand-in for the Go toolchain
pub struct TestWorkspace {
    #[allow(dead_code)]
    pub temp: TempDir,
    pub path: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// A workspace ready for `build` and `archive`: the `mytracer` plugin with
    /// module manifests, a checkout with `cmd/geth/main.go`, and a config
    /// whose `go_binary` is a shell script running `tool_body`.
    #[allow(dead_code)]
    pub fn prepared(tool_body: &str) -> Self {
        let ws = Self::new();
        ws.write_file(
            "mytracer/tracer.go",
            "package mytracer\n\nfunc init() {\n\tregister(\"mytracer\")\n}\n",
        );
        ws.write_file("mytracer/go.mod", "module example.com/mytracer\n\ngo 1.22\n");
        ws.write_file("mytracer/go.sum", "");
        ws.write_file("go-ethereum/cmd/geth/main.go", MAIN_GO);
        let tool = ws.write_tool("fake-go", tool_body);
        ws.write_file(
            "geth-builder.yaml",
            &format!(
                "repository_url: https://example.invalid/go-ethereum\n\
                 branch: master\n\
                 plugin_path: ./mytracer\n\
                 output_dir: ./build\n\
                 source_dir: ./go-ethereum\n\
                 go_binary: {}\n",
                tool.display()
            ),
        );
        ws
    }

    /// Write a file in the workspace, creating parent directories
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Write an executable `/bin/sh` script
    #[allow(dead_code)]
    pub fn write_tool(&self, name: &str, body: &str) -> PathBuf {
        let path = self.path.join("tools").join(name);
        self.write_file(
            &format!("tools/{name}"),
            &format!("#!/bin/sh\n{body}\n"),
        );
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
                .expect("Failed to make tool executable");
        }
        path
    }

    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// `geth-builder` running inside the workspace with a clean environment
    pub fn cmd(&self) -> Command {
        let mut cmd = geth_builder_cmd();
        cmd.current_dir(&self.path)
            .env_remove("GETH_BUILDER_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }

    #[allow(dead_code)]
    pub fn join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.path.join(path)
    }
}

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn geth_builder_cmd() -> Command {
    Command::cargo_bin("geth-builder").expect("Failed to find geth-builder binary")
}

/// Number of times `import_path` is imported by `source`
#[allow(dead_code)]
pub fn import_count(source: &str, import_path: &str) -> usize {
    source.matches(&format!("\"{import_path}\"")).count()
}

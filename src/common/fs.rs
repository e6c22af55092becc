//! Common file system operations with unified error handling

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{self, Result};

/// Module manifests removed from an injected plugin so it builds as part of
/// the host module
pub const MODULE_MANIFESTS: &[&str] = &["go.mod", "go.sum"];

/// Copy one file, carrying over its permission bits.
///
/// The parent directory of `dest` must already exist.
pub fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    // `fs::copy` copies the permission bits along with the contents.
    fs::copy(src, dest).map_err(|e| error::fs::copy_error(src, dest, &e))?;
    Ok(())
}

/// Mirror the directory `src` as `dest_parent/<basename of src>`.
///
/// Directories are created with the mode of their source; files keep theirs.
/// The first failure aborts the copy and leaves whatever was already copied
/// in place. Returns the root of the new tree.
pub fn copy_tree(src: &Path, dest_parent: &Path) -> Result<PathBuf> {
    let name = src.file_name().ok_or_else(|| {
        error::fs::copy_failed(
            src.display().to_string(),
            dest_parent.display().to_string(),
            "source has no directory name",
        )
    })?;
    let root = dest_parent.join(name);
    if dest_parent.starts_with(src) {
        return Err(error::fs::copy_failed(
            src.display().to_string(),
            root.display().to_string(),
            "destination is inside the source directory",
        ));
    }
    let mut dir_modes = Vec::new();

    for entry in WalkDir::new(src).follow_links(true) {
        let entry = entry.map_err(|e| {
            error::fs::copy_failed(
                e.path().unwrap_or(src).display().to_string(),
                root.display().to_string(),
                e.to_string(),
            )
        })?;
        let relative = entry.path().strip_prefix(src).map_err(|e| {
            error::fs::copy_failed(
                src.display().to_string(),
                root.display().to_string(),
                e.to_string(),
            )
        })?;
        let target = root.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| error::fs::copy_error(entry.path(), &target, &e))?;
            let permissions = fs::metadata(entry.path())
                .map_err(|e| error::fs::copy_error(entry.path(), &target, &e))?
                .permissions();
            dir_modes.push((entry.path().to_path_buf(), target, permissions));
        } else {
            copy_file(entry.path(), &target)?;
        }
    }

    // Deepest first, so a read-only directory is sealed after its contents exist.
    for (source, target, permissions) in dir_modes.into_iter().rev() {
        fs::set_permissions(&target, permissions)
            .map_err(|e| error::fs::copy_error(&source, &target, &e))?;
    }

    tracing::debug!(from = %src.display(), to = %root.display(), "copied tree");
    Ok(root)
}

/// Remove `go.mod` and `go.sum` from the top of `dir`. Returns the names removed.
pub fn strip_manifests(dir: &Path) -> Result<Vec<&'static str>> {
    let mut removed = Vec::new();
    for name in MODULE_MANIFESTS {
        let path = dir.join(name);
        if path.is_file() {
            fs::remove_file(&path).map_err(|e| {
                error::fs::io_error(format!("Failed to remove {}: {e}", path.display()))
            })?;
            removed.push(*name);
        }
    }
    Ok(removed)
}

/// Replace `path` with `contents` via a temporary file in the same directory.
///
/// An existing file keeps its permission bits. Readers never observe a
/// partially written file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let display = path.display().to_string();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| error::fs::write_failed(&display, e.to_string()))?;
    temp.write_all(contents)
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|e| error::fs::write_failed(&display, e.to_string()))?;

    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions())
            .map_err(|e| error::fs::write_failed(&display, e.to_string()))?;
    }

    temp.persist(path)
        .map_err(|e| error::fs::write_failed(&display, e.error.to_string()))?;
    Ok(())
}

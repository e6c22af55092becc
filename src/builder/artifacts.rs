//! Finding archive names in build tool output

use regex::Regex;

use crate::error::{self, Result};

/// Archive file names for `product` mentioned in `output`, in order of
/// first appearance and without duplicates. Empty when none are mentioned.
///
/// The upstream tool has no machine-readable output, so this scans for
/// `<product>-<anything>.zip` and `<product>-<anything>.tar.gz`.
pub fn extract_archives(output: &str, product: &str) -> Result<Vec<String>> {
    let pattern = format!(
        r"\b{}-[A-Za-z0-9._+-]*?\.(?:zip|tar\.gz)\b",
        regex::escape(product)
    );
    let re = Regex::new(&pattern).map_err(|e| {
        error::build::failed(
            "archive name scan",
            "invalid pattern",
            format!("{pattern}: {e}"),
        )
    })?;

    let mut archives: Vec<String> = Vec::new();
    for found in re.find_iter(output) {
        let name = found.as_str();
        if !archives.iter().any(|seen| seen == name) {
            archives.push(name.to_string());
        }
    }
    Ok(archives)
}

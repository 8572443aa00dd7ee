//! Listing of extracted RPM files.

use std::path::{Path, PathBuf};

/// Every `*.rpm` under `dest`, recursively, sorted. Missing or unreadable paths yield nothing.
pub fn list_rpms(dest: &str) -> Vec<String> {
    // The destination is a literal directory; only the suffix is a pattern.
    let pattern = Path::new(&glob::Pattern::escape(dest))
        .join("**")
        .join("*.rpm");

    let mut found: Vec<String> = match glob::glob(&pattern.to_string_lossy()) {
        Ok(paths) => paths
            .filter_map(|entry| entry.ok())
            .filter(|p: &PathBuf| p.is_file())
            .map(|p| p.to_string_lossy().to_string())
            .collect(),
        Err(e) => {
            log_status!("artifacts", "Invalid artifact pattern '{}': {}", pattern.display(), e);
            Vec::new()
        }
    };

    found.sort();
    found
}

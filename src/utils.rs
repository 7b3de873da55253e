/*!
 * Utility functions for CodePack
 */

use chrono::{DateTime, Utc};

/// Directory names that are never ingested: VCS metadata, dependency
/// caches, build output and IDE metadata.
pub const IGNORED_DIRECTORIES: &[&str] = &[
    // Version Control
    ".git",
    ".svn",
    ".hg",
    // Dependencies
    "node_modules",
    "vendor",
    // Python
    "__pycache__",
    ".venv",
    "venv",
    ".pytest_cache",
    ".mypy_cache",
    // IDEs & Editors
    ".idea",
    ".vscode",
    // Build & Dist
    "dist",
    "build",
    "target",
    ".next",
    ".nuxt",
    "coverage",
];

/// Whether a directory with this name is skipped during ingestion.
///
/// Only ever consulted for directories; a file that happens to be called
/// `node_modules` is ingested like any other file.
pub fn is_ignored_directory_name(name: &str) -> bool {
    IGNORED_DIRECTORIES.contains(&name)
}

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut value = size as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    format!("{:.1} {}", value, UNITS[unit])
}

/// Default file name for a bundle generated at `generated_at`
pub fn bundle_file_name(generated_at: &DateTime<Utc>) -> String {
    format!("codepack_{}.txt", generated_at.format("%Y-%m-%dT%H-%M-%S"))
}

use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobMatcher};

use crate::error::{Error, Result};

/// Glob for the markdown files the sources pick up. Matched
/// case-insensitively against the whole relative path.
const MARKDOWN_GLOB: &str = "*.{md,mdx}";

/// A discovered document file.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Path relative to the root directory.
    pub relative_path: PathBuf,
    /// Fully resolved absolute path.
    pub absolute_path: PathBuf,
}

/// Matcher accepting `.md` and `.mdx` paths in any letter case.
pub fn markdown_matcher() -> Result<GlobMatcher> {
    let glob = GlobBuilder::new(MARKDOWN_GLOB)
        .case_insensitive(true)
        .build()
        .map_err(|e| Error::Config(format!("invalid glob pattern: {e}")))?;
    Ok(glob.compile_matcher())
}

/// Recursively walk a directory and discover markdown files.
///
/// Skips hidden files/directories (names starting with `.`). Results are
/// sorted by relative path so ids are stable across runs.
pub fn discover_files(root: &Path) -> Result<Vec<DiscoveredFile>> {
    let canonical_root = root.canonicalize()?;
    let matcher = markdown_matcher()?;
    let mut results = Vec::new();
    walk_dir(&canonical_root, &canonical_root, &matcher, &mut results)?;
    results.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(results)
}

fn walk_dir(
    root: &Path,
    current: &Path,
    matcher: &GlobMatcher,
    results: &mut Vec<DiscoveredFile>,
) -> Result<()> {
    for entry in std::fs::read_dir(current)? {
        let entry = entry?;
        let file_name = entry.file_name();

        if file_name.to_string_lossy().starts_with('.') {
            continue;
        }

        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            walk_dir(root, &path, matcher, results)?;
            continue;
        }

        let resolved = if file_type.is_symlink() {
            // Broken links are skipped; linked directories are not followed
            // to avoid cycles.
            match path.canonicalize() {
                Ok(p) if p.is_file() => p,
                _ => continue,
            }
        } else if file_type.is_file() {
            path.clone()
        } else {
            continue;
        };

        let relative_path =
            path.strip_prefix(root).unwrap_or(&path).to_path_buf();
        if matcher.is_match(&relative_path) {
            results.push(DiscoveredFile {
                relative_path,
                absolute_path: resolved,
            });
        }
    }

    Ok(())
}

//! Working-tree scan for Fleet bundle descriptors.

use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

/// File names that mark a directory as a Fleet bundle.
pub const BUNDLE_DESCRIPTOR_NAMES: [&str; 2] = ["fleet.yaml", "fleet.yml"];

/// Version-control metadata directory, never descended into.
const SKIPPED_DIRECTORY: &str = ".git";

/// Returns true if `file_name` is exactly a bundle descriptor name.
#[must_use]
pub fn is_bundle_descriptor(file_name: &str) -> bool {
    BUNDLE_DESCRIPTOR_NAMES.contains(&file_name)
}

/// Returns true if a directory named `dir_name` must not be scanned.
#[must_use]
pub fn should_skip_directory(dir_name: &str) -> bool {
    dir_name == SKIPPED_DIRECTORY
}

/// Recursively finds bundle descriptors below `root`.
///
/// `.git` subtrees are pruned. Returned paths are relative to `root` and use
/// `/` separators on every platform. Entries that cannot be read are skipped.
/// Descriptors directly inside `root` are included.
#[must_use]
pub fn find_bundle_files(root: &Path) -> Vec<String> {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !(entry.file_type().is_dir()
                && should_skip_directory(&entry.file_name().to_string_lossy()))
        });

    let mut found = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if !entry.file_type().is_file() || !is_bundle_descriptor(&entry.file_name().to_string_lossy())
        {
            continue;
        }

        if let Ok(relative) = entry.path().strip_prefix(root) {
            found.push(to_posix(relative));
        }
    }

    debug!(root = %root.display(), count = found.len(), "Scanned for bundle descriptors");
    found
}

/// Joins path components with `/`.
fn to_posix(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

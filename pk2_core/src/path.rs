//! Archive path canonicalization.
//!
//! Every key stored in a folder mapping is the lower-cased entry name, and
//! every lookup path is reduced to the same form before walking the tree.

use crate::error::{Error, Result};
use std::path::MAIN_SEPARATOR;

/// Lower-case a single name segment into its mapping key.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
}

/// Check that `name` can stand as a single path segment.
///
/// Rejects empty names, `.` and `..`, and names containing `/` or `\`, so
/// every name maps to exactly one segment of a canonical path.
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_argument("Name cannot be empty"));
    }

    if name == "." || name == ".." {
        return Err(Error::invalid_argument(format!(
            "Name cannot be a relative reference: {}",
            name
        )));
    }

    if name.contains(['/', '\\']) {
        return Err(Error::invalid_argument(format!(
            "Name cannot contain path separators: {}",
            name
        )));
    }

    Ok(())
}

/// Split an archive path into normalized segments.
///
/// Both `/` and `\` are accepted as separators. Empty and `.` segments are
/// skipped, so `""`, `"/"` and `"."` all resolve to the root.
pub fn split_path(path: &str) -> Result<Vec<String>> {
    let mut segments = Vec::new();

    for segment in path.split(['/', '\\']) {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(Error::invalid_path(
                    path,
                    "parent references are not supported",
                ));
            }
            s => segments.push(normalize_name(s)),
        }
    }

    Ok(segments)
}

/// Join a resolved parent path with a child name.
///
/// An empty parent path yields the bare lower-cased child name.
pub fn join_segments(parent: &str, name: &str) -> String {
    let name = normalize_name(name);
    if parent.is_empty() {
        return name;
    }

    let mut joined = String::with_capacity(parent.len() + 1 + name.len());
    joined.push_str(parent);
    joined.push(MAIN_SEPARATOR);
    joined.push_str(&name);
    joined
}

//! core::paths
//!
//! Lexical path handling for descriptor locations.
//!
//! Module and parent paths are always resolved against the directory of the
//! descriptor that declares them. Resolution is purely lexical: nothing here
//! touches the filesystem, so the in-memory loader and the `pom.xml` loader
//! see identical paths.
//!
//! # Example
//!
//! ```
//! use pomlens::core::paths::{join_relative, normalize};
//! use std::path::{Path, PathBuf};
//!
//! assert_eq!(normalize(Path::new("a/./b/../c")), PathBuf::from("a/c"));
//! assert_eq!(join_relative(Path::new("parent/child"), "../sibling"), PathBuf::from("parent/sibling"));
//! ```

use std::path::{Component, Path, PathBuf};

/// File name looked up when a module path names a directory.
pub const DEFAULT_DESCRIPTOR: &str = "pom.xml";

/// Normalize `.` and `..` components without touching the filesystem.
///
/// Leading `..` components that cannot be popped are kept, so relative
/// paths that escape their base stay meaningful.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// Resolve `relative` against the directory `base` and normalize.
pub fn join_relative(base: &Path, relative: &str) -> PathBuf {
    normalize(&base.join(relative.trim()))
}

/// Whether a path names a descriptor file rather than a directory.
///
/// Decided lexically by the `.xml` extension.
pub fn is_descriptor_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
}

/// Split a resolved location into (directory, descriptor file).
///
/// A location without an `.xml` extension is treated as a directory
/// containing [`DEFAULT_DESCRIPTOR`].
pub fn descriptor_location(path: &Path) -> (PathBuf, PathBuf) {
    if is_descriptor_file(path) {
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        (dir, path.to_path_buf())
    } else {
        (path.to_path_buf(), path.join(DEFAULT_DESCRIPTOR))
    }
}

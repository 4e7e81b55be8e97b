//! Folder nodes.

use crate::error::{Error, Result};
use crate::file::Pk2File;
use crate::path::{normalize_name, validate_name};
use std::collections::BTreeMap;
use std::fmt;

/// Index of a folder inside its owning [`FolderTree`](crate::FolderTree).
///
/// Ids are never reused, so an id whose folder was removed stays invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FolderId(pub(crate) usize);

impl FolderId {
    /// Raw arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A directory entry inside the archive.
///
/// The `offset` points at the block listing this folder's own children and is
/// fixed at construction. Child mappings are keyed by lower-cased name.
pub struct Folder {
    name: String,
    parent: Option<FolderId>,
    offset: u64,
    pub(crate) files: BTreeMap<String, Pk2File>,
    pub(crate) subfolders: BTreeMap<String, FolderId>,
}

impl Folder {
    /// Create a new, childless folder.
    ///
    /// The folder is not registered anywhere; pass it to
    /// [`FolderTree::new`](crate::FolderTree::new) as the root or to
    /// [`FolderTree::insert_folder`](crate::FolderTree::insert_folder).
    ///
    /// Fails with `InvalidArgument` if `name` is not a single path segment
    /// (empty, `.`, `..`, or containing a separator) or `offset` is negative.
    pub fn new(name: impl Into<String>, parent: Option<FolderId>, offset: i64) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;

        let offset = u64::try_from(offset).map_err(|_| {
            Error::invalid_argument(format!("Folder offset must be non-negative: {}", offset))
        })?;

        Ok(Self::from_parts(name, parent, offset))
    }

    /// Create the archive root. Unlike other folders, the root may have an empty name.
    pub fn root(name: impl Into<String>, offset: i64) -> Result<Self> {
        let name = name.into();
        if !name.is_empty() {
            validate_name(&name)?;
        }

        let offset = u64::try_from(offset).map_err(|_| {
            Error::invalid_argument(format!("Root offset must be non-negative: {}", offset))
        })?;

        Ok(Self::from_parts(name, None, offset))
    }

    fn from_parts(name: String, parent: Option<FolderId>, offset: u64) -> Self {
        Self {
            name,
            parent,
            offset,
            files: BTreeMap::new(),
            subfolders: BTreeMap::new(),
        }
    }

    /// Display name, case preserved.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mapping key for this folder in its parent.
    pub fn key(&self) -> String {
        normalize_name(&self.name)
    }

    pub fn parent(&self) -> Option<FolderId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Byte offset of this folder's directory block in the archive stream.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// True while no file or subfolder has been attached.
    pub fn is_childless(&self) -> bool {
        self.files.is_empty() && self.subfolders.is_empty()
    }

    /// Directly owned files, keyed by lower-cased name.
    pub fn files(&self) -> &BTreeMap<String, Pk2File> {
        &self.files
    }

    /// Directly owned subfolders, keyed by lower-cased name.
    pub fn subfolders(&self) -> &BTreeMap<String, FolderId> {
        &self.subfolders
    }

    /// Case-insensitive file lookup among direct children.
    pub fn file(&self, name: &str) -> Option<&Pk2File> {
        self.files.get(&normalize_name(name))
    }

    /// Case-insensitive subfolder lookup among direct children.
    pub fn subfolder(&self, name: &str) -> Option<FolderId> {
        self.subfolders.get(&normalize_name(name)).copied()
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Pk2Folder(name={:?}, offset={}, files={}, folders={})",
            self.name,
            self.offset,
            self.files.len(),
            self.subfolders.len()
        )
    }
}

// Same summary form as Display; direct counts only.
impl fmt::Debug for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_new() {
        let folder = Folder::new("Media", Some(FolderId(0)), 100).unwrap();
        assert_eq!(folder.name(), "Media");
        assert_eq!(folder.key(), "media");
        assert_eq!(folder.parent(), Some(FolderId(0)));
        assert_eq!(folder.offset(), 100);
        assert!(folder.files().is_empty());
        assert!(folder.subfolders().is_empty());
        assert!(!folder.is_root());
    }

    #[test]
    fn test_folder_rejects_negative_offset() {
        let err = Folder::new("Media", None, -1).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));

        let err = Folder::root("", -1).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn test_folder_rejects_empty_name() {
        let err = Folder::new("", None, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn test_folder_rejects_non_segment_names() {
        for bad in [".", "..", "media/tex", "media\\tex"] {
            let err = Folder::new(bad, Some(FolderId(0)), 0).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument { .. }), "accepted {:?}", bad);

            let err = Folder::root(bad, 0).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument { .. }), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_root_allows_empty_name() {
        let root = Folder::root("", 256).unwrap();
        assert!(root.is_root());
        assert_eq!(root.name(), "");
    }

    #[test]
    fn test_case_insensitive_child_lookup() {
        let mut folder = Folder::root("Root", 0).unwrap();
        let file = Pk2File::new("Sky.DDJ", 10, 20).unwrap();
        folder.files.insert(normalize_name(file.name()), file);
        folder.subfolders.insert("textures".to_string(), FolderId(3));

        assert_eq!(folder.file("SKY.ddj").map(Pk2File::offset), Some(10));
        assert_eq!(folder.subfolder("TexTures"), Some(FolderId(3)));
        assert!(folder.file("missing").is_none());
    }

    #[test]
    fn test_diagnostic_format() {
        let mut folder = Folder::new("Media", Some(FolderId(0)), 100).unwrap();
        folder
            .files
            .insert("a.txt".to_string(), Pk2File::new("a.txt", 1, 1).unwrap());
        folder.subfolders.insert("x".to_string(), FolderId(1));
        folder.subfolders.insert("y".to_string(), FolderId(2));

        let expected = "Pk2Folder(name=\"Media\", offset=100, files=1, folders=2)";
        assert_eq!(folder.to_string(), expected);
        assert_eq!(format!("{:?}", folder), expected);
    }
}

//! JSON tree manifests.
//!
//! A manifest describes a folder tree the way a block-chain parser would
//! discover it: every folder with its directory-block offset, its files and
//! its subfolders. Building a tree from a manifest goes through the same
//! constructors and insertion checks as any other reader.

use crate::error::Result;
use crate::file::Pk2File;
use crate::folder::{Folder, FolderId};
use crate::tree::FolderTree;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::io::Read;
use tracing::info;

/// A folder entry in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFolder {
    #[serde(default)]
    pub name: String,
    pub offset: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<ManifestFile>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub folders: Vec<ManifestFolder>,
}

/// A file entry in a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestFile {
    pub name: String,
    pub offset: i64,
    #[serde(default)]
    pub size: u32,
}

/// A whole tree, rooted at one folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub root: ManifestFolder,
}

impl Manifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a manifest from a JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Build a folder tree, breadth-first.
    ///
    /// Fails on the first invalid entry (negative offset, empty name,
    /// duplicate name within a folder).
    pub fn build(&self) -> Result<FolderTree> {
        let mut tree = FolderTree::new(Folder::root(&self.root.name, self.root.offset)?)?;
        let mut queue: VecDeque<(FolderId, &ManifestFolder)> = VecDeque::new();
        queue.push_back((tree.root_id(), &self.root));

        while let Some((id, entry)) = queue.pop_front() {
            for file in &entry.files {
                tree.insert_file(id, Pk2File::new(&file.name, file.offset, file.size)?)?;
            }

            for sub in &entry.folders {
                let child = tree.insert_folder(Folder::new(&sub.name, Some(id), sub.offset)?)?;
                queue.push_back((child, sub));
            }
        }

        info!(
            folders = tree.len(),
            files = tree.file_count(),
            "built folder tree from manifest"
        );

        Ok(tree)
    }
}

impl FolderTree {
    /// Describe the live tree as a manifest, children in key order.
    pub fn to_manifest(&self) -> Result<Manifest> {
        Ok(Manifest {
            root: self.manifest_folder(self.root_id())?,
        })
    }

    fn manifest_folder(&self, id: FolderId) -> Result<ManifestFolder> {
        let folder = self.folder(id)?;

        let files = folder
            .files()
            .values()
            .map(|f| ManifestFile {
                name: f.name().to_string(),
                offset: f.offset() as i64,
                size: f.size(),
            })
            .collect();

        let folders = folder
            .subfolders()
            .values()
            .map(|&child| self.manifest_folder(child))
            .collect::<Result<Vec<_>>>()?;

        Ok(ManifestFolder {
            name: folder.name().to_string(),
            offset: folder.offset() as i64,
            files,
            folders,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"{
        "name": "",
        "offset": 256,
        "files": [{ "name": "Readme.TXT", "offset": 1024, "size": 12 }],
        "folders": [
            {
                "name": "Media",
                "offset": 2048,
                "folders": [
                    {
                        "name": "Textures",
                        "offset": 4096,
                        "files": [{ "name": "Sky.ddj", "offset": 8192, "size": 300 }]
                    }
                ]
            },
            { "name": "Data", "offset": 3072 }
        ]
    }"#;

    #[test]
    fn test_build_from_json() {
        let tree = Manifest::from_json(SAMPLE).unwrap().build().unwrap();

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.file_count(), 2);

        let textures = tree.find_folder("media/textures").unwrap().unwrap();
        assert_eq!(tree.get(textures).unwrap().offset(), 4096);
        assert_eq!(
            tree.find_file("MEDIA/Textures/SKY.DDJ").unwrap().unwrap().size(),
            300
        );
        assert_eq!(
            tree.get(tree.root_id()).unwrap().to_string(),
            "Pk2Folder(name=\"\", offset=256, files=1, folders=2)"
        );
    }

    #[test]
    fn test_build_rejects_negative_offset() {
        let json = r#"{ "name": "", "offset": 0, "folders": [{ "name": "Bad", "offset": -1 }] }"#;
        let err = Manifest::from_json(json).unwrap().build().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn test_build_rejects_duplicates() {
        let json = r#"{
            "name": "", "offset": 0,
            "folders": [{ "name": "Media", "offset": 1 }, { "name": "MEDIA", "offset": 2 }]
        }"#;
        let err = Manifest::from_json(json).unwrap().build().unwrap_err();
        assert!(matches!(err, Error::DuplicateEntry { .. }));
    }

    #[test]
    fn test_build_rejects_separator_names() {
        let json = r#"{
            "name": "", "offset": 0,
            "folders": [
                { "name": "Media", "offset": 1, "folders": [{ "name": "Tex", "offset": 2 }] },
                { "name": "media/tex", "offset": 3 }
            ]
        }"#;
        let err = Manifest::from_json(json).unwrap().build().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));

        let json = r#"{ "name": "", "offset": 0, "files": [{ "name": "..", "offset": 4 }] }"#;
        let err = Manifest::from_json(json).unwrap().build().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = Manifest::from_json("{ not json").unwrap_err();
        assert!(matches!(err, Error::Manifest { .. }));
    }

    #[test]
    fn test_to_manifest_rebuilds_same_tree() {
        let tree = Manifest::from_json(SAMPLE).unwrap().build().unwrap();
        let rebuilt = tree.to_manifest().unwrap().build().unwrap();

        let paths: Vec<String> = tree
            .walk()
            .map(|(id, _)| tree.full_path(id).unwrap())
            .collect();
        let rebuilt_paths: Vec<String> = rebuilt
            .walk()
            .map(|(id, _)| rebuilt.full_path(id).unwrap())
            .collect();
        assert_eq!(paths, rebuilt_paths);
        assert_eq!(rebuilt.file_count(), 2);
    }

    #[test]
    fn test_to_json_omits_empty_children() {
        let manifest = Manifest::from_json(r#"{ "name": "", "offset": 7 }"#).unwrap();
        let json = manifest.to_json().unwrap();
        assert!(!json.contains("files"));
        assert!(!json.contains("folders"));
        assert_eq!(Manifest::from_json(&json).unwrap(), manifest);
    }

    #[test]
    fn test_from_reader_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let reader = std::fs::File::open(file.path()).unwrap();
        let tree = Manifest::from_reader(reader).unwrap().build().unwrap();
        assert!(tree.find_folder("data").unwrap().is_some());
    }
}

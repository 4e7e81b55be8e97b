//! # PK2 Core
//!
//! The in-memory directory tree of a PK2 container archive.
//!
//! A PK2 archive is a single binary stream holding a hierarchy of folders and
//! files, each located by byte offset. This library models that hierarchy:
//! folders with their directory-block offsets, the files they own, and the
//! lower-cased canonical paths used to look entries up.
//!
//! ## Features
//!
//! - Arena-backed tree with non-owning parent links
//! - Case-insensitive, duplicate-rejecting child mappings
//! - Canonical full paths and case-insensitive path lookup
//! - JSON manifests for building trees without an archive reader
//!
//! ## Example
//!
//! ```
//! use pk2_core::{Folder, FolderTree, Pk2File};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut tree = FolderTree::new(Folder::root("", 256)?)?;
//!
//! let media = tree.insert_folder(Folder::new("Media", Some(tree.root_id()), 1024)?)?;
//! tree.insert_file(media, Pk2File::new("Logo.ddj", 4096, 512)?)?;
//!
//! assert_eq!(tree.full_path(media)?, "media");
//! assert_eq!(tree.find_file("MEDIA/logo.DDJ")?.map(|f| f.offset()), Some(4096));
//! println!("{}", tree.folder(media)?);
//! # Ok(())
//! # }
//! ```

mod error;
mod file;
mod folder;
mod manifest;
pub mod path;
mod tree;

pub use error::{Error, Result};
pub use file::Pk2File;
pub use folder::{Folder, FolderId};
pub use manifest::{Manifest, ManifestFile, ManifestFolder};
pub use tree::{Ancestors, FolderTree, Walk};

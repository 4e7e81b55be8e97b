//! Folder tree arena and path resolution.

use crate::error::{Error, Result};
use crate::file::Pk2File;
use crate::folder::{Folder, FolderId};
use crate::path::{join_segments, normalize_name, split_path};
use tracing::{debug, warn};

const ROOT: FolderId = FolderId(0);

/// Owns every folder of one archive.
///
/// Folders live in an arena of slots indexed by [`FolderId`]. A parent holds
/// its children's ids in its `subfolders` mapping and a child holds its
/// parent's id as a plain back-reference, so there is no ownership cycle.
/// Removing a folder vacates the slots of its whole subtree.
///
/// Mutation needs `&mut FolderTree`; once built, a shared `&FolderTree` can
/// be read from any number of threads.
#[derive(Debug)]
pub struct FolderTree {
    slots: Vec<Option<Folder>>,
    live: usize,
}

impl FolderTree {
    /// Create a tree rooted at `root`. The root must be childless and must
    /// not have a parent.
    pub fn new(root: Folder) -> Result<Self> {
        if let Some(parent) = root.parent() {
            return Err(Error::invalid_argument(format!(
                "Root folder cannot have a parent (got {})",
                parent.index()
            )));
        }

        if !root.is_childless() {
            return Err(Error::invalid_argument(format!(
                "Root folder '{}' already has children",
                root.name()
            )));
        }

        debug!(root = root.name(), offset = root.offset(), "created folder tree");

        Ok(Self {
            slots: vec![Some(root)],
            live: 1,
        })
    }

    pub fn root_id(&self) -> FolderId {
        ROOT
    }

    /// Number of live folders, root included.
    pub fn len(&self) -> usize {
        self.live
    }

    /// A tree always holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Get a live folder by id.
    pub fn get(&self, id: FolderId) -> Option<&Folder> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    /// Get a live folder by id, or a NotFound error.
    pub fn folder(&self, id: FolderId) -> Result<&Folder> {
        self.get(id)
            .ok_or_else(|| Error::not_found(format!("folder id {}", id.0)))
    }

    fn folder_mut(&mut self, id: FolderId) -> Result<&mut Folder> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or_else(|| Error::not_found(format!("folder id {}", id.0)))
    }

    /// Register a constructed folder in its parent's subfolder mapping.
    ///
    /// The folder must be childless. Rejects the folder with `DuplicateEntry`
    /// if the parent already holds a subfolder with the same case-insensitive
    /// name.
    pub fn insert_folder(&mut self, folder: Folder) -> Result<FolderId> {
        let parent_id = folder
            .parent()
            .ok_or_else(|| Error::invalid_argument("Only the root folder may have no parent"))?;

        if !folder.is_childless() {
            return Err(Error::invalid_argument(format!(
                "Folder '{}' already has children",
                folder.name()
            )));
        }

        let parent = self.get(parent_id).ok_or_else(|| {
            Error::invalid_argument(format!("Parent folder {} does not exist", parent_id.0))
        })?;

        let key = folder.key();
        if parent.subfolders.contains_key(&key) {
            let parent_path = self.full_path(parent_id)?;
            warn!(folder = folder.name(), parent = %parent_path, "rejected duplicate folder");
            return Err(Error::duplicate_folder(folder.name(), parent_path));
        }

        let id = FolderId(self.slots.len());
        debug!(
            id = id.0,
            parent = parent_id.0,
            folder = folder.name(),
            offset = folder.offset(),
            "inserted folder"
        );

        self.slots.push(Some(folder));
        self.live += 1;
        self.folder_mut(parent_id)?.subfolders.insert(key, id);

        Ok(id)
    }

    /// Register a file in `parent`'s file mapping.
    ///
    /// Rejects the file with `DuplicateEntry` if the parent already holds a
    /// file with the same case-insensitive name.
    pub fn insert_file(&mut self, parent: FolderId, file: Pk2File) -> Result<()> {
        let key = normalize_name(file.name());
        if self.folder(parent)?.files.contains_key(&key) {
            let parent_path = self.full_path(parent)?;
            warn!(file = file.name(), parent = %parent_path, "rejected duplicate file");
            return Err(Error::duplicate_file(file.name(), parent_path));
        }

        debug!(parent = parent.0, file = file.name(), offset = file.offset(), "inserted file");
        self.folder_mut(parent)?.files.insert(key, file);
        Ok(())
    }

    /// Insert a file, overwriting any entry with the same case-insensitive name.
    ///
    /// Returns the displaced entry, if any.
    pub fn replace_file(&mut self, parent: FolderId, file: Pk2File) -> Result<Option<Pk2File>> {
        let key = normalize_name(file.name());
        let name = file.name().to_string();
        let displaced = self.folder_mut(parent)?.files.insert(key, file);

        if let Some(old) = &displaced {
            warn!(parent = parent.0, file = %name, old_offset = old.offset(), "replaced file");
        } else {
            debug!(parent = parent.0, file = %name, "inserted file");
        }

        Ok(displaced)
    }

    /// Canonical path of a folder: lower-cased names from the root down,
    /// joined with the platform separator.
    ///
    /// The root yields its own lower-cased name. A child of a root whose path
    /// is empty yields just its own name.
    pub fn full_path(&self, id: FolderId) -> Result<String> {
        let folder = self.folder(id)?;
        match folder.parent() {
            None => Ok(normalize_name(folder.name())),
            Some(parent) => {
                let parent_path = self.full_path(parent)?;
                Ok(join_segments(&parent_path, folder.name()))
            }
        }
    }

    /// Number of edges between the folder and the root.
    pub fn depth(&self, id: FolderId) -> Result<usize> {
        self.folder(id)?;
        Ok(self.ancestors(id).count() - 1)
    }

    /// Iterate from `id` up to the root, both included.
    pub fn ancestors(&self, id: FolderId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: Some(id),
        }
    }

    /// Depth-first pre-order walk of every live folder, children in key order.
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            tree: self,
            stack: vec![ROOT],
        }
    }

    /// Remove a folder and destroy its entire subtree.
    ///
    /// Every id in the subtree becomes invalid. Returns how many folders were
    /// destroyed. The root cannot be removed.
    pub fn remove_folder(&mut self, id: FolderId) -> Result<usize> {
        if id == ROOT {
            return Err(Error::invalid_argument("The root folder cannot be removed"));
        }

        let folder = self
            .slots
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or_else(|| Error::not_found(format!("folder id {}", id.0)))?;

        if let Some(parent) = folder.parent() {
            self.folder_mut(parent)?.subfolders.remove(&folder.key());
        }

        let mut removed = 1;
        let mut pending: Vec<FolderId> = folder.subfolders.values().copied().collect();
        while let Some(child) = pending.pop() {
            if let Some(node) = self.slots.get_mut(child.0).and_then(Option::take) {
                pending.extend(node.subfolders.values().copied());
                removed += 1;
            }
        }

        self.live -= removed;
        debug!(id = id.0, folder = folder.name(), removed, "removed folder subtree");

        Ok(removed)
    }

    /// Resolve an archive path to a folder, case-insensitively.
    ///
    /// The empty path resolves to the root. Returns `Ok(None)` on a miss.
    pub fn find_folder(&self, path: &str) -> Result<Option<FolderId>> {
        let segments = split_path(path)?;
        Ok(self.descend(ROOT, &segments))
    }

    /// Resolve an archive path to a file, case-insensitively.
    pub fn find_file(&self, path: &str) -> Result<Option<&Pk2File>> {
        let mut segments = split_path(path)?;
        let name = segments
            .pop()
            .ok_or_else(|| Error::invalid_path(path, "file path has no name"))?;

        let file = self
            .descend(ROOT, &segments)
            .and_then(|id| self.get(id))
            .and_then(|folder| folder.files.get(&name));

        Ok(file)
    }

    fn descend(&self, from: FolderId, segments: &[String]) -> Option<FolderId> {
        segments.iter().try_fold(from, |current, segment| {
            self.get(current)?.subfolders.get(segment).copied()
        })
    }

    /// Total number of files across all live folders.
    pub fn file_count(&self) -> usize {
        self.slots.iter().flatten().map(|f| f.files.len()).sum()
    }
}

/// Iterator over a folder and its ancestors. See [`FolderTree::ancestors`].
pub struct Ancestors<'a> {
    tree: &'a FolderTree,
    next: Option<FolderId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = (FolderId, &'a Folder);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let folder = self.tree.get(id)?;
        self.next = folder.parent();
        Some((id, folder))
    }
}

/// Pre-order iterator over live folders. See [`FolderTree::walk`].
pub struct Walk<'a> {
    tree: &'a FolderTree,
    stack: Vec<FolderId>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (FolderId, &'a Folder);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(folder) = self.tree.get(id) {
                // Reverse so the smallest key is popped first
                self.stack.extend(folder.subfolders.values().rev().copied());
                return Some((id, folder));
            }
        }
        None
    }
}

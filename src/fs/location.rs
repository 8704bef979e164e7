//! Breadcrumb path from the root to the folder being viewed.

use crate::fs::node::FolderRef;

/// Location state: the ordered chain of folders from root to the current folder.
///
/// An empty path means the root is being viewed. The chain is only ever appended
/// to, truncated, cleared, or replaced with a server-resolved chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    path: Vec<FolderRef>,
}

impl Location {
    /// Location at the root.
    pub fn root() -> Self {
        Self::default()
    }

    /// Id of the current folder, `None` at root.
    pub fn current_id(&self) -> Option<&str> {
        self.path.last().map(|f| f.id.as_str())
    }

    pub fn current(&self) -> Option<&FolderRef> {
        self.path.last()
    }

    pub fn path(&self) -> &[FolderRef] {
        &self.path
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Descend into `folder`.
    pub fn navigate_to(&mut self, folder: FolderRef) {
        self.path.push(folder);
    }

    /// Keep the path up to and including `index`.
    ///
    /// Returns `false` and leaves the path untouched when `index` is out of range.
    pub fn navigate_to_ancestor(&mut self, index: usize) -> bool {
        if index >= self.path.len() {
            return false;
        }
        self.path.truncate(index + 1);
        true
    }

    pub fn go_root(&mut self) {
        self.path.clear();
    }

    /// Replace the whole chain with one resolved by the backend.
    pub fn replace(&mut self, path: Vec<FolderRef>) {
        self.path = path;
    }
}

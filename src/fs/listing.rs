//! Cached contents of the location being viewed.

use std::collections::HashSet;

use tracing::warn;

use crate::fs::node::{FolderEntry, Listing};

/// Listing cache: the most recently applied listing and the location it belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingCache {
    /// Folder id the listing was fetched for, `None` for root.
    scope: Option<String>,
    listing: Listing,
}

impl ListingCache {
    /// Empty listing scoped to root.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Listing {
        &self.listing
    }

    /// Location id this listing was fetched for.
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Discard the cached listing and take `listing` for `scope`.
    ///
    /// Entries whose `parent_id` is not `scope` are dropped, as are repeated ids.
    pub fn replace(&mut self, scope: Option<String>, listing: Listing) {
        let Listing { folders, files } = listing;
        let before = folders.len() + files.len();

        let mut seen = HashSet::new();
        let folders: Vec<_> = folders
            .into_iter()
            .filter(|f| f.parent_id == scope && seen.insert(f.id.clone()))
            .collect();
        seen.clear();
        let files: Vec<_> = files
            .into_iter()
            .filter(|f| f.parent_id == scope && seen.insert(f.id.clone()))
            .collect();

        let dropped = before - folders.len() - files.len();
        if dropped > 0 {
            warn!(
                scope = scope.as_deref().unwrap_or("root"),
                dropped, "dropped listing entries outside of the listed folder"
            );
        }

        self.scope = scope;
        self.listing = Listing { folders, files };
    }

    /// Add a freshly created folder without refetching.
    ///
    /// The folder set stays sorted by name and holds the entry exactly once.
    pub fn insert_folder_optimistic(&mut self, entry: FolderEntry) {
        self.listing.folders.retain(|f| f.id != entry.id);
        self.listing.folders.push(entry);
        self.listing.folders.sort_by(|a, b| a.name.cmp(&b.name));
    }
}

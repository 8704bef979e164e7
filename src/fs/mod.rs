//! Drive data model, location state and listing cache.

pub(crate) mod listing;
pub(crate) mod location;
pub(crate) mod node;

pub use listing::ListingCache;
pub use location::Location;
pub use node::{
    format_size, FileEntry, FolderEntry, FolderRef, ItemKind, Listing, RenameDraft, UploadFile,
};

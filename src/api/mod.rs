//! Drive API client and the backend abstraction it implements.

pub mod client;
#[cfg(test)]
pub(crate) mod mock;

pub use client::ApiClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::fs::{FolderEntry, FolderRef, ItemKind, Listing, UploadFile};

/// Remote Drive backend.
///
/// Every method is exactly one request. Nothing is retried.
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// List the children of `parent_id` (`None` for root).
    async fn list(&self, parent_id: Option<&str>) -> Result<Listing>;

    /// Resolve the root-to-folder chain for `folder_id`.
    async fn breadcrumbs(&self, folder_id: &str) -> Result<Vec<FolderRef>>;

    async fn create_folder(&self, name: &str, parent_id: Option<&str>) -> Result<FolderEntry>;

    /// Upload one file into `parent_id`.
    async fn upload(&self, file: UploadFile, parent_id: Option<&str>) -> Result<()>;

    async fn rename(&self, id: &str, kind: ItemKind, new_name: &str) -> Result<()>;

    async fn delete(&self, id: &str, kind: ItemKind) -> Result<()>;

    /// Direct download link for a file.
    fn download_url(&self, file_id: &str) -> Result<String>;
}

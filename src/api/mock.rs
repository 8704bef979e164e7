//! In-memory backend used by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::DriveApi;
use crate::error::{DriveError, Result};
use crate::fs::{FileEntry, FolderEntry, FolderRef, ItemKind, Listing, UploadFile};

/// A request seen by [`MockApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ApiCall {
    List(Option<String>),
    Breadcrumbs(String),
    CreateFolder {
        name: String,
        parent_id: Option<String>,
    },
    Upload {
        name: String,
        parent_id: Option<String>,
    },
    Rename {
        id: String,
        kind: ItemKind,
        name: String,
    },
    Delete {
        id: String,
        kind: ItemKind,
    },
}

#[derive(Default)]
struct MockState {
    listings: HashMap<Option<String>, Listing>,
    breadcrumbs: HashMap<String, Vec<FolderRef>>,
    list_delays: HashMap<Option<String>, Duration>,
    breadcrumb_delays: HashMap<String, Duration>,
    failing_lists: HashSet<Option<String>>,
    failing_uploads: HashSet<String>,
    calls: Vec<ApiCall>,
    next_id: u32,
}

impl MockState {
    fn contains(&self, id: &str) -> bool {
        self.listings.values().any(|l| l.folder(id).is_some() || l.file(id).is_some())
    }
}

#[derive(Default)]
pub(crate) struct MockApi {
    state: Mutex<MockState>,
}

impl MockApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_listing(self, parent: Option<&str>, listing: Listing) -> Self {
        self.lock().listings.insert(parent.map(str::to_string), listing);
        self
    }

    pub(crate) fn with_breadcrumbs(self, folder_id: &str, chain: Vec<FolderRef>) -> Self {
        self.lock().breadcrumbs.insert(folder_id.to_string(), chain);
        self
    }

    /// Delay every listing of `parent` by `delay`.
    pub(crate) fn with_list_delay(self, parent: Option<&str>, delay: Duration) -> Self {
        self.lock()
            .list_delays
            .insert(parent.map(str::to_string), delay);
        self
    }

    /// Delay resolving the breadcrumbs of `folder_id` by `delay`.
    pub(crate) fn with_breadcrumbs_delay(self, folder_id: &str, delay: Duration) -> Self {
        self.lock()
            .breadcrumb_delays
            .insert(folder_id.to_string(), delay);
        self
    }

    /// Listing `parent` answers with a 500.
    pub(crate) fn with_failing_list(self, parent: Option<&str>) -> Self {
        self.lock().failing_lists.insert(parent.map(str::to_string));
        self
    }

    /// Uploading a file named `name` answers with a 500.
    pub(crate) fn with_failing_upload(self, name: &str) -> Self {
        self.lock().failing_uploads.insert(name.to_string());
        self
    }

    pub(crate) fn set_failing_list(&self, parent: Option<&str>, failing: bool) {
        let key = parent.map(str::to_string);
        let mut state = self.lock();
        if failing {
            state.failing_lists.insert(key);
        } else {
            state.failing_lists.remove(&key);
        }
    }

    pub(crate) fn set_listing(&self, parent: Option<&str>, listing: Listing) {
        self.lock().listings.insert(parent.map(str::to_string), listing);
    }

    pub(crate) fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, ApiCall::List(_)))
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, call: ApiCall) {
        self.lock().calls.push(call);
    }
}

fn server(status: u16, message: &str) -> DriveError {
    DriveError::Server {
        status,
        message: message.to_string(),
    }
}

pub(crate) fn folder(id: &str, name: &str, parent: Option<&str>) -> FolderEntry {
    FolderEntry {
        id: id.to_string(),
        name: name.to_string(),
        parent_id: parent.map(str::to_string),
    }
}

pub(crate) fn file(id: &str, name: &str, parent: Option<&str>, size: u64) -> FileEntry {
    FileEntry {
        id: id.to_string(),
        name: name.to_string(),
        parent_id: parent.map(str::to_string),
        size_bytes: size,
    }
}

#[async_trait]
impl DriveApi for MockApi {
    async fn list(&self, parent_id: Option<&str>) -> Result<Listing> {
        let key = parent_id.map(str::to_string);
        self.record(ApiCall::List(key.clone()));

        let delay = self.lock().list_delays.get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.lock();
        if state.failing_lists.contains(&key) {
            return Err(server(500, "listing failed"));
        }
        Ok(state.listings.get(&key).cloned().unwrap_or_default())
    }

    async fn breadcrumbs(&self, folder_id: &str) -> Result<Vec<FolderRef>> {
        self.record(ApiCall::Breadcrumbs(folder_id.to_string()));

        let delay = self.lock().breadcrumb_delays.get(folder_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.lock()
            .breadcrumbs
            .get(folder_id)
            .cloned()
            .ok_or_else(|| server(404, "Folder not found"))
    }

    async fn create_folder(&self, name: &str, parent_id: Option<&str>) -> Result<FolderEntry> {
        self.record(ApiCall::CreateFolder {
            name: name.to_string(),
            parent_id: parent_id.map(str::to_string),
        });
        let mut state = self.lock();
        state.next_id += 1;
        let entry = folder(&format!("new-{}", state.next_id), name, parent_id);
        state
            .listings
            .entry(parent_id.map(str::to_string))
            .or_default()
            .folders
            .push(entry.clone());
        Ok(entry)
    }

    async fn upload(&self, file: UploadFile, parent_id: Option<&str>) -> Result<()> {
        self.record(ApiCall::Upload {
            name: file.name.clone(),
            parent_id: parent_id.map(str::to_string),
        });
        let mut state = self.lock();
        if state.failing_uploads.contains(&file.name) {
            return Err(server(500, "upload failed"));
        }
        state.next_id += 1;
        let entry = self::file(
            &format!("new-{}", state.next_id),
            &file.name,
            parent_id,
            file.size(),
        );
        state
            .listings
            .entry(parent_id.map(str::to_string))
            .or_default()
            .files
            .push(entry);
        Ok(())
    }

    async fn rename(&self, id: &str, kind: ItemKind, new_name: &str) -> Result<()> {
        self.record(ApiCall::Rename {
            id: id.to_string(),
            kind,
            name: new_name.to_string(),
        });
        let mut state = self.lock();
        if new_name.trim().is_empty() {
            return Err(server(400, "Name required"));
        }
        for listing in state.listings.values_mut() {
            match kind {
                ItemKind::Folder => {
                    if let Some(f) = listing.folders.iter_mut().find(|f| f.id == id) {
                        f.name = new_name.to_string();
                        return Ok(());
                    }
                }
                ItemKind::File => {
                    if let Some(f) = listing.files.iter_mut().find(|f| f.id == id) {
                        f.name = new_name.to_string();
                        return Ok(());
                    }
                }
            }
        }
        Err(server(404, "Item not found"))
    }

    async fn delete(&self, id: &str, kind: ItemKind) -> Result<()> {
        self.record(ApiCall::Delete {
            id: id.to_string(),
            kind,
        });
        let mut state = self.lock();
        if !state.contains(id) {
            return Err(server(404, "Item not found"));
        }
        for listing in state.listings.values_mut() {
            match kind {
                ItemKind::Folder => listing.folders.retain(|f| f.id != id),
                ItemKind::File => listing.files.retain(|f| f.id != id),
            }
        }
        Ok(())
    }

    fn download_url(&self, file_id: &str) -> Result<String> {
        Ok(format!("mock://drive/download/{file_id}"))
    }
}

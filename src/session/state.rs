//! Location + listing reconciliation with stale-response rejection.
//!
//! [`DriveState`] is the single writer of the location and the listing cache.
//! Every navigation issues a [`FetchTicket`]; a listing response is only applied
//! when its ticket still names the current location and is newer than the last
//! applied one.

use tracing::{debug, warn};

use crate::error::{DriveError, Result};
use crate::fs::{FolderEntry, FolderRef, Listing, ListingCache, Location};

/// Loading status of the current location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Idle,
    /// A fetch for the current location is outstanding.
    Loading,
    /// The last fetch for the current location failed.
    Error(String),
}

impl LoadStatus {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadStatus::Error(_))
    }
}

/// Tag attached to an outbound listing fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Location the fetch was issued for, `None` for root.
    pub location: Option<String>,
    /// Issue order; later fetches have larger values.
    pub seq: u64,
}

/// How a listing fetch was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The listing replaced the cache.
    Applied,
    /// The user moved on (or a newer fetch already landed); the response was discarded.
    Superseded,
    /// The request was invalid for the current state and nothing was fetched.
    Ignored,
}

/// Point-in-time copy of the state, for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveSnapshot {
    pub path: Vec<FolderRef>,
    pub listing: Listing,
    /// Location the listing belongs to.
    pub listing_scope: Option<String>,
    pub status: LoadStatus,
}

impl DriveSnapshot {
    pub fn current_id(&self) -> Option<&str> {
        self.path.last().map(|f| f.id.as_str())
    }

    /// True when the visible listing belongs to another location than the path,
    /// e.g. after a navigation whose fetch failed.
    pub fn listing_is_stale(&self) -> bool {
        self.listing_scope.as_deref() != self.current_id()
    }
}

/// Owned navigation and listing state.
#[derive(Debug, Default)]
pub struct DriveState {
    location: Location,
    cache: ListingCache,
    status: LoadStatus,
    issued_seq: u64,
    applied_seq: u64,
    /// Bumped on every location change.
    epoch: u64,
}

impl DriveState {
    /// State at root with an empty listing.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn cache(&self) -> &ListingCache {
        &self.cache
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn current_id(&self) -> Option<&str> {
        self.location.current_id()
    }

    pub fn snapshot(&self) -> DriveSnapshot {
        DriveSnapshot {
            path: self.location.path().to_vec(),
            listing: self.cache.current().clone(),
            listing_scope: self.cache.scope().map(str::to_string),
            status: self.status.clone(),
        }
    }

    /// Issue a fetch for the current location and enter `Loading`.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued_seq += 1;
        self.status = LoadStatus::Loading;
        FetchTicket {
            location: self.location.current_id().map(str::to_string),
            seq: self.issued_seq,
        }
    }

    /// Navigation counter; changes whenever the location does.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn navigate_to(&mut self, folder: FolderRef) -> FetchTicket {
        self.location.navigate_to(folder);
        self.epoch += 1;
        self.begin_fetch()
    }

    /// Truncate to `index`; `None` when `index` is out of range.
    pub fn navigate_to_ancestor(&mut self, index: usize) -> Option<FetchTicket> {
        if !self.location.navigate_to_ancestor(index) {
            warn!(index, depth = self.location.depth(), "ancestor index out of range");
            return None;
        }
        self.epoch += 1;
        Some(self.begin_fetch())
    }

    pub fn go_root(&mut self) -> FetchTicket {
        self.location.go_root();
        self.epoch += 1;
        self.begin_fetch()
    }

    /// Start resolving a folder by id; returns the epoch the result must match.
    ///
    /// Counts as a navigation: anything issued earlier becomes stale and the
    /// status is `Loading` until the chain and its listing resolve.
    pub fn begin_deep_link(&mut self) -> u64 {
        self.epoch += 1;
        self.issued_seq += 1;
        self.status = LoadStatus::Loading;
        self.epoch
    }

    /// Record a failed deep link issued at `epoch`. Returns `false` if it was superseded.
    pub fn fail_deep_link(&mut self, epoch: u64, error: &DriveError) -> bool {
        if epoch != self.epoch {
            return false;
        }
        warn!(error = %error, "failed to resolve folder");
        self.status = LoadStatus::Error(error.to_string());
        true
    }

    /// Adopt a breadcrumb chain resolved by the backend.
    pub fn enter_path(&mut self, path: Vec<FolderRef>) -> FetchTicket {
        self.location.replace(path);
        self.epoch += 1;
        self.begin_fetch()
    }

    fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.location.as_deref() == self.location.current_id() && ticket.seq > self.applied_seq
    }

    /// Apply or discard the response for `ticket`.
    ///
    /// A failed fetch for the current location keeps the previous listing visible
    /// and sets `Error`; a response for any other location changes nothing.
    pub fn resolve_fetch(
        &mut self,
        ticket: &FetchTicket,
        result: Result<Listing>,
    ) -> Result<FetchOutcome> {
        let location = ticket.location.as_deref().unwrap_or("root");
        if !self.is_current(ticket) {
            match &result {
                Ok(_) => debug!(location, seq = ticket.seq, "discarding stale listing"),
                Err(e) => warn!(location, seq = ticket.seq, error = %e, "stale listing fetch failed"),
            }
            return Ok(FetchOutcome::Superseded);
        }

        let latest = ticket.seq == self.issued_seq;
        match result {
            Ok(listing) => {
                debug!(
                    location,
                    seq = ticket.seq,
                    folders = listing.folders.len(),
                    files = listing.files.len(),
                    "applying listing"
                );
                self.cache.replace(ticket.location.clone(), listing);
                self.applied_seq = ticket.seq;
                if latest {
                    self.status = LoadStatus::Idle;
                }
                Ok(FetchOutcome::Applied)
            }
            Err(e) => {
                warn!(location, seq = ticket.seq, error = %e, "failed to load listing");
                if latest {
                    self.status = LoadStatus::Error(e.to_string());
                }
                Err(e)
            }
        }
    }

    /// Insert a folder created under `parent_id` into the cache.
    ///
    /// Skipped unless both the location and the cached listing are still `parent_id`.
    /// Returns whether the entry was inserted.
    pub fn insert_created_folder(&mut self, parent_id: Option<&str>, entry: FolderEntry) -> bool {
        let parent = entry
            .parent_id
            .clone()
            .or_else(|| parent_id.map(str::to_string));
        if parent.as_deref() != self.location.current_id() || parent.as_deref() != self.cache.scope()
        {
            debug!(id = %entry.id, "created folder is not in the visible listing");
            return false;
        }
        let entry = FolderEntry {
            parent_id: parent,
            ..entry
        };
        self.cache.insert_folder_optimistic(entry);
        true
    }
}

/// Reject folder names that are blank after trimming.
pub(crate) fn validate_folder_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DriveError::Validation(
            "Folder name must not be empty".to_string(),
        ));
    }
    Ok(trimmed)
}

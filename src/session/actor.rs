//! Actor-based drive runtime.
//!
//! The actor owns [`DriveState`]. Requests run in spawned tasks and report back
//! through an event channel, so commands keep flowing while a request is in flight.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::api::{ApiClient, DriveApi};
use crate::config::ClientConfig;
use crate::error::{DriveError, Result};
use crate::fs::{FolderEntry, FolderRef, ItemKind, Listing, RenameDraft, UploadFile};
use crate::progress::{ProgressCallback, UploadProgress};
use crate::session::state::{
    validate_folder_name, DriveSnapshot, DriveState, FetchOutcome, FetchTicket,
};

type FetchWaiter = Box<dyn FnOnce(Result<FetchOutcome>) + Send>;

/// Outcome of one file of an upload batch.
#[derive(Debug)]
pub struct UploadResult {
    pub name: String,
    pub result: Result<()>,
}

/// Per-file outcomes of an upload batch plus the refresh that followed it.
#[derive(Debug)]
pub struct UploadReport {
    pub files: Vec<UploadResult>,
    pub refresh: Result<FetchOutcome>,
}

impl UploadReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &UploadResult> {
        self.files.iter().filter(|f| f.result.is_ok())
    }

    pub fn failed(&self) -> impl Iterator<Item = &UploadResult> {
        self.files.iter().filter(|f| f.result.is_err())
    }

    pub fn all_succeeded(&self) -> bool {
        self.files.iter().all(|f| f.result.is_ok())
    }
}

/// Handle to a running drive actor. Cheap to clone.
#[derive(Clone)]
pub struct DriveHandle {
    tx: mpsc::Sender<DriveCommand>,
    api: Arc<dyn DriveApi>,
}

enum DriveCommand {
    Snapshot {
        reply: oneshot::Sender<Result<DriveSnapshot>>,
    },
    NavigateTo {
        folder: FolderRef,
        reply: oneshot::Sender<Result<FetchOutcome>>,
    },
    NavigateToAncestor {
        index: usize,
        reply: oneshot::Sender<Result<FetchOutcome>>,
    },
    GoRoot {
        reply: oneshot::Sender<Result<FetchOutcome>>,
    },
    OpenFolder {
        folder_id: Option<String>,
        reply: oneshot::Sender<Result<FetchOutcome>>,
    },
    Refresh {
        reply: oneshot::Sender<Result<FetchOutcome>>,
    },
    CreateFolder {
        name: String,
        reply: oneshot::Sender<Result<FolderEntry>>,
    },
    UploadFiles {
        files: Vec<UploadFile>,
        progress: Option<ProgressCallback>,
        reply: oneshot::Sender<Result<UploadReport>>,
    },
    Rename {
        id: String,
        kind: ItemKind,
        new_name: String,
        reply: oneshot::Sender<Result<FetchOutcome>>,
    },
    Delete {
        id: String,
        kind: ItemKind,
        reply: oneshot::Sender<Result<FetchOutcome>>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

enum DriveEvent {
    Listing {
        ticket: FetchTicket,
        result: Result<Listing>,
        waiter: FetchWaiter,
    },
    Breadcrumbs {
        folder_id: String,
        epoch: u64,
        result: Result<Vec<FolderRef>>,
        reply: oneshot::Sender<Result<FetchOutcome>>,
    },
    FolderCreated {
        parent_id: Option<String>,
        result: Result<FolderEntry>,
        reply: oneshot::Sender<Result<FolderEntry>>,
    },
    Mutated {
        result: Result<()>,
        reply: oneshot::Sender<Result<FetchOutcome>>,
    },
    Uploaded {
        files: Vec<UploadResult>,
        reply: oneshot::Sender<Result<UploadReport>>,
    },
}

struct DriveActor {
    state: DriveState,
    api: Arc<dyn DriveApi>,
    rx: mpsc::Receiver<DriveCommand>,
    events_tx: mpsc::UnboundedSender<DriveEvent>,
    events_rx: mpsc::UnboundedReceiver<DriveEvent>,
}

fn reply_waiter(reply: oneshot::Sender<Result<FetchOutcome>>) -> FetchWaiter {
    Box::new(move |outcome| {
        let _ = reply.send(outcome);
    })
}

impl DriveHandle {
    /// Start an actor over `api`, positioned at root with an empty listing.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<A: DriveApi + 'static>(api: A) -> Self {
        Self::spawn_shared(Arc::new(api))
    }

    pub fn spawn_shared(api: Arc<dyn DriveApi>) -> Self {
        DriveActor::spawn(api)
    }

    /// Start an actor and load the root listing.
    pub async fn open<A: DriveApi + 'static>(api: A) -> Result<Self> {
        let handle = Self::spawn(api);
        handle.go_root().await?;
        Ok(handle)
    }

    /// Connect to the HTTP backend described by `config` and load the root listing.
    pub async fn connect(config: &ClientConfig) -> Result<Self> {
        Self::open(ApiClient::new(config)?).await
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(oneshot::Sender<Result<R>>) -> DriveCommand,
    ) -> Result<R> {
        let (tx, rx) = oneshot::channel();
        let cmd = build(tx);
        self.tx
            .send(cmd)
            .await
            .map_err(|_| DriveError::Custom("Drive actor stopped".to_string()))?;
        rx.await
            .map_err(|_| DriveError::Custom("Drive actor stopped".to_string()))?
    }

    /// Current path, listing and status.
    pub async fn snapshot(&self) -> Result<DriveSnapshot> {
        self.request(|reply| DriveCommand::Snapshot { reply }).await
    }

    /// Descend into `folder` and load its listing.
    pub async fn navigate_to(&self, folder: FolderRef) -> Result<FetchOutcome> {
        self.request(|reply| DriveCommand::NavigateTo { folder, reply })
            .await
    }

    /// Descend into a folder of the current listing.
    pub async fn open_subfolder(&self, folder: &FolderEntry) -> Result<FetchOutcome> {
        self.navigate_to(folder.to_folder_ref()).await
    }

    /// Jump to breadcrumb `index` (0 is the first folder below root).
    ///
    /// Out-of-range indices leave everything untouched and yield [`FetchOutcome::Ignored`].
    pub async fn navigate_to_ancestor(&self, index: usize) -> Result<FetchOutcome> {
        self.request(|reply| DriveCommand::NavigateToAncestor { index, reply })
            .await
    }

    pub async fn go_root(&self) -> Result<FetchOutcome> {
        self.request(|reply| DriveCommand::GoRoot { reply }).await
    }

    /// Enter a folder by id, resolving its breadcrumb chain first.
    ///
    /// `None` goes to root without asking the backend.
    pub async fn open_folder(&self, folder_id: Option<&str>) -> Result<FetchOutcome> {
        self.request(|reply| DriveCommand::OpenFolder {
            folder_id: folder_id.map(str::to_string),
            reply,
        })
        .await
    }

    /// Reload the listing of the current location.
    pub async fn refresh(&self) -> Result<FetchOutcome> {
        self.request(|reply| DriveCommand::Refresh { reply }).await
    }

    /// Create a folder in the current location.
    ///
    /// Blank names fail with [`DriveError::Validation`] before any request.
    pub async fn create_folder(&self, name: &str) -> Result<FolderEntry> {
        self.request(|reply| DriveCommand::CreateFolder {
            name: name.to_string(),
            reply,
        })
        .await
    }

    /// Upload `files` one after another into the current location, then refresh once.
    pub async fn upload_files(&self, files: Vec<UploadFile>) -> Result<UploadReport> {
        self.request(|reply| DriveCommand::UploadFiles {
            files,
            progress: None,
            reply,
        })
        .await
    }

    pub async fn upload_files_with_progress(
        &self,
        files: Vec<UploadFile>,
        progress: ProgressCallback,
    ) -> Result<UploadReport> {
        self.request(|reply| DriveCommand::UploadFiles {
            files,
            progress: Some(progress),
            reply,
        })
        .await
    }

    /// Rename an item, then refresh the current location.
    ///
    /// The name is sent as given; the backend validates it. The refresh happens
    /// even when the rename is rejected, and the rename error is returned.
    pub async fn rename_item(
        &self,
        id: &str,
        kind: ItemKind,
        new_name: &str,
    ) -> Result<FetchOutcome> {
        self.request(|reply| DriveCommand::Rename {
            id: id.to_string(),
            kind,
            new_name: new_name.to_string(),
            reply,
        })
        .await
    }

    pub async fn submit_rename(&self, draft: RenameDraft) -> Result<FetchOutcome> {
        let RenameDraft {
            id,
            kind,
            proposed_name,
        } = draft;
        self.request(|reply| DriveCommand::Rename {
            id,
            kind,
            new_name: proposed_name,
            reply,
        })
        .await
    }

    /// Delete an item, then refresh the current location.
    pub async fn delete_item(&self, id: &str, kind: ItemKind) -> Result<FetchOutcome> {
        self.request(|reply| DriveCommand::Delete {
            id: id.to_string(),
            kind,
            reply,
        })
        .await
    }

    /// Direct download link for a file.
    pub fn download_url(&self, file_id: &str) -> Result<String> {
        self.api.download_url(file_id)
    }

    pub async fn shutdown(&self) {
        let (tx, rx) = oneshot::channel();
        let _ = self.tx.send(DriveCommand::Shutdown { reply: tx }).await;
        let _ = rx.await;
    }
}

impl DriveActor {
    fn spawn(api: Arc<dyn DriveApi>) -> DriveHandle {
        let (tx, rx) = mpsc::channel(64);
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let actor = DriveActor {
            state: DriveState::new(),
            api: Arc::clone(&api),
            rx,
            events_tx,
            events_rx,
        };
        tokio::spawn(actor.run());
        DriveHandle { tx, api }
    }

    async fn run(mut self) {
        loop {
            tokio::select! {
                cmd = self.rx.recv() => {
                    let Some(cmd) = cmd else { break; };
                    if self.handle_command(cmd) {
                        break;
                    }
                }
                Some(event) = self.events_rx.recv() => {
                    self.handle_event(event);
                }
            }
        }
        debug!("drive actor stopped");
    }

    fn spawn_fetch(&self, ticket: FetchTicket, waiter: FetchWaiter) {
        let api = Arc::clone(&self.api);
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = api.list(ticket.location.as_deref()).await;
            let _ = events.send(DriveEvent::Listing {
                ticket,
                result,
                waiter,
            });
        });
    }

    /// Refresh the current location, then hand the outcome to `waiter`.
    fn refresh_then(&mut self, waiter: FetchWaiter) {
        let ticket = self.state.begin_fetch();
        self.spawn_fetch(ticket, waiter);
    }

    fn handle_command(&mut self, cmd: DriveCommand) -> bool {
        match cmd {
            DriveCommand::Snapshot { reply } => {
                let _ = reply.send(Ok(self.state.snapshot()));
            }
            DriveCommand::NavigateTo { folder, reply } => {
                let ticket = self.state.navigate_to(folder);
                self.spawn_fetch(ticket, reply_waiter(reply));
            }
            DriveCommand::NavigateToAncestor { index, reply } => {
                match self.state.navigate_to_ancestor(index) {
                    Some(ticket) => self.spawn_fetch(ticket, reply_waiter(reply)),
                    None => {
                        let _ = reply.send(Ok(FetchOutcome::Ignored));
                    }
                }
            }
            DriveCommand::GoRoot { reply } => {
                let ticket = self.state.go_root();
                self.spawn_fetch(ticket, reply_waiter(reply));
            }
            DriveCommand::OpenFolder {
                folder_id: None,
                reply,
            } => {
                let ticket = self.state.go_root();
                self.spawn_fetch(ticket, reply_waiter(reply));
            }
            DriveCommand::OpenFolder {
                folder_id: Some(folder_id),
                reply,
            } => {
                let api = Arc::clone(&self.api);
                let events = self.events_tx.clone();
                let epoch = self.state.begin_deep_link();
                tokio::spawn(async move {
                    let result = api.breadcrumbs(&folder_id).await;
                    let _ = events.send(DriveEvent::Breadcrumbs {
                        folder_id,
                        epoch,
                        result,
                        reply,
                    });
                });
            }
            DriveCommand::Refresh { reply } => {
                self.refresh_then(reply_waiter(reply));
            }
            DriveCommand::CreateFolder { name, reply } => {
                let name = match validate_folder_name(&name) {
                    Ok(name) => name.to_string(),
                    Err(e) => {
                        let _ = reply.send(Err(e));
                        return false;
                    }
                };
                let parent_id = self.state.current_id().map(str::to_string);
                let api = Arc::clone(&self.api);
                let events = self.events_tx.clone();
                tokio::spawn(async move {
                    let result = api.create_folder(&name, parent_id.as_deref()).await;
                    let _ = events.send(DriveEvent::FolderCreated {
                        parent_id,
                        result,
                        reply,
                    });
                });
            }
            DriveCommand::UploadFiles {
                files,
                mut progress,
                reply,
            } => {
                let parent_id = self.state.current_id().map(str::to_string);
                let api = Arc::clone(&self.api);
                let events = self.events_tx.clone();
                tokio::spawn(async move {
                    let total = files.len();
                    let mut results = Vec::with_capacity(total);
                    for (idx, file) in files.into_iter().enumerate() {
                        let name = file.name.clone();
                        let result = api.upload(file, parent_id.as_deref()).await;
                        if let Err(e) = &result {
                            warn!(name = %name, error = %e, "upload failed");
                        }
                        if let Some(callback) = progress.as_mut() {
                            callback(&UploadProgress::new(
                                idx + 1,
                                total,
                                name.clone(),
                                result.is_ok(),
                            ));
                        }
                        results.push(UploadResult { name, result });
                    }
                    let _ = events.send(DriveEvent::Uploaded {
                        files: results,
                        reply,
                    });
                });
            }
            DriveCommand::Rename {
                id,
                kind,
                new_name,
                reply,
            } => {
                let api = Arc::clone(&self.api);
                let events = self.events_tx.clone();
                tokio::spawn(async move {
                    let result = api.rename(&id, kind, &new_name).await;
                    let _ = events.send(DriveEvent::Mutated { result, reply });
                });
            }
            DriveCommand::Delete { id, kind, reply } => {
                let api = Arc::clone(&self.api);
                let events = self.events_tx.clone();
                tokio::spawn(async move {
                    let result = api.delete(&id, kind).await;
                    let _ = events.send(DriveEvent::Mutated { result, reply });
                });
            }
            DriveCommand::Shutdown { reply } => {
                let _ = reply.send(());
                return true;
            }
        }
        false
    }

    fn handle_event(&mut self, event: DriveEvent) {
        match event {
            DriveEvent::Listing {
                ticket,
                result,
                waiter,
            } => {
                let outcome = self.state.resolve_fetch(&ticket, result);
                waiter(outcome);
            }
            DriveEvent::Breadcrumbs {
                folder_id,
                epoch,
                result,
                reply,
            } => {
                if epoch != self.state.epoch() {
                    debug!(folder_id = %folder_id, "discarding breadcrumbs after navigation");
                    let _ = reply.send(Ok(FetchOutcome::Superseded));
                    return;
                }
                let chain = result.and_then(|chain| {
                    if chain.last().map(|f| f.id.as_str()) == Some(folder_id.as_str()) {
                        Ok(chain)
                    } else {
                        Err(DriveError::InvalidResponse(format!(
                            "breadcrumbs for {folder_id} do not end at that folder"
                        )))
                    }
                });
                let chain = match chain {
                    Ok(chain) => chain,
                    Err(e) => {
                        self.state.fail_deep_link(epoch, &e);
                        let _ = reply.send(Err(e));
                        return;
                    }
                };
                let ticket = self.state.enter_path(chain);
                self.spawn_fetch(ticket, reply_waiter(reply));
            }
            DriveEvent::FolderCreated {
                parent_id,
                result,
                reply,
            } => {
                if let Ok(entry) = &result {
                    let inserted = self
                        .state
                        .insert_created_folder(parent_id.as_deref(), entry.clone());
                    info!(id = %entry.id, name = %entry.name, inserted, "folder created");
                }
                let _ = reply.send(result);
            }
            DriveEvent::Mutated { result, reply } => {
                self.refresh_then(Box::new(move |refresh| {
                    let _ = reply.send(result.and(refresh));
                }));
            }
            DriveEvent::Uploaded { files, reply } => {
                let failed = files.iter().filter(|f| f.result.is_err()).count();
                info!(total = files.len(), failed, "upload batch finished");
                self.refresh_then(Box::new(move |refresh| {
                    let _ = reply.send(Ok(UploadReport { files, refresh }));
                }));
            }
        }
    }
}

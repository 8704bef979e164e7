//! # drivelib
//!
//! Rust client library for a self-hosted Drive file manager.
//!
//! ## Features
//!
//! - **Navigation**: Folder path with breadcrumbs, root and ancestor jumps, and
//!   deep links by folder id.
//! - **Listing cache**: One listing per location, with out-of-order responses
//!   discarded so a slow reply never overwrites a newer location.
//! - **Mutations**:
//!   - Create folders (inserted locally without a refetch).
//!   - Rename and delete files/folders, each followed by a refresh.
//!   - Sequential multi-file uploads with per-file results and progress callbacks.
//! - **Downloads**: Direct download links and streaming to disk.
//!
//! All state lives in a background actor; [`DriveHandle`] is a cheap, cloneable
//! front end to it.
//!
//! ## Example: Basic Usage
//!
//! ```no_run
//! use drivelib::{ClientConfig, DriveHandle};
//!
//! # async fn example() -> drivelib::Result<()> {
//! // Connect and load the root listing
//! let drive = DriveHandle::connect(&ClientConfig::from_env()?).await?;
//!
//! let snapshot = drive.snapshot().await?;
//! for folder in &snapshot.listing.folders {
//!     println!("[dir] {}", folder.name);
//! }
//! for file in &snapshot.listing.files {
//!     println!("{} ({})", file.name, file.display_size());
//! }
//!
//! // Enter the first folder and create a subfolder there
//! if let Some(folder) = snapshot.listing.folders.first() {
//!     drive.open_subfolder(folder).await?;
//!     drive.create_folder("Reports").await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Uploading Files
//!
//! ```no_run
//! use drivelib::{DriveHandle, UploadFile};
//! use drivelib::progress::make_progress_printer;
//!
//! # async fn example(drive: DriveHandle) -> drivelib::Result<()> {
//! let files = vec![
//!     UploadFile::from_path("notes.txt").await?,
//!     UploadFile::new("hello.txt", b"hello".to_vec()),
//! ];
//! let report = drive
//!     .upload_files_with_progress(files, make_progress_printer())
//!     .await?;
//! for failed in report.failed() {
//!     eprintln!("{} was not uploaded", failed.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod fs;
pub mod http;
pub mod progress;
pub mod session;

// Re-export commonly used types
pub use api::{ApiClient, DriveApi};
pub use config::ClientConfig;
pub use error::{DriveError, Result};
pub use fs::{
    format_size, FileEntry, FolderEntry, FolderRef, ItemKind, Listing, RenameDraft, UploadFile,
};
pub use progress::{ProgressCallback, UploadProgress};
pub use session::{
    DriveHandle, DriveSnapshot, FetchOutcome, LoadStatus, UploadReport, UploadResult,
};

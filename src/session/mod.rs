//! Navigation state and the actor that keeps it in sync with the backend.

pub mod actor;
pub mod state;

pub use actor::{DriveHandle, UploadReport, UploadResult};
pub use state::{DriveSnapshot, DriveState, FetchOutcome, FetchTicket, LoadStatus};

//! Progress reporting for upload batches.

/// Progress of an upload batch, reported after each file attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadProgress {
    /// Files attempted so far, including this one
    pub done: usize,
    /// Files in the batch
    pub total: usize,
    /// Name of the file just attempted
    pub filename: String,
    /// Whether the backend accepted it
    pub succeeded: bool,
}

impl UploadProgress {
    /// Create a new progress report.
    pub fn new(done: usize, total: usize, filename: impl Into<String>, succeeded: bool) -> Self {
        Self {
            done,
            total,
            filename: filename.into(),
            succeeded,
        }
    }

    /// Get progress as a percentage (0.0 to 100.0).
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.done as f64 / self.total as f64) * 100.0
    }

    /// Check if every file of the batch has been attempted.
    pub fn is_complete(&self) -> bool {
        self.done >= self.total
    }
}

/// Type alias for progress callback function.
pub type ProgressCallback = Box<dyn FnMut(&UploadProgress) + Send>;

/// Create a simple progress callback that prints one line per file to stdout.
///
/// # Example
/// ```no_run
/// use drivelib::progress::make_progress_printer;
///
/// let callback = make_progress_printer();
/// ```
pub fn make_progress_printer() -> ProgressCallback {
    Box::new(|progress: &UploadProgress| {
        let mark = if progress.succeeded { "ok" } else { "FAILED" };
        println!(
            "[{}/{}] {:.0}% {} ... {}",
            progress.done,
            progress.total,
            progress.percent(),
            progress.filename,
            mark
        );
    })
}

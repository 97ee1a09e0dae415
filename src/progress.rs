//! Progress reporting for file transfers.

/// Progress information for uploads and downloads.
#[derive(Debug, Clone)]
pub struct TransferProgress {
    /// Bytes transferred so far
    pub done: u64,
    /// Total bytes to transfer, 0 when not known up front
    pub total: u64,
    /// Name of the file being transferred
    pub filename: String,
}

impl TransferProgress {
    /// Create a new progress report.
    pub fn new(done: u64, total: u64, filename: impl Into<String>) -> Self {
        Self {
            done,
            total,
            filename: filename.into(),
        }
    }

    /// Get progress as a percentage (0.0 to 100.0).
    ///
    /// Convenience for [`ProgressCallback`] renderers that draw a ratio;
    /// the bundled byte counter prints the raw count instead.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.done as f64 / self.total as f64) * 100.0
    }

    /// Check if transfer is complete. Always false while the total is
    /// unknown.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.done >= self.total
    }
}

/// Type alias for progress callback function.
///
/// The callback is invoked after every chunk that reaches its destination.
pub type ProgressCallback = Box<dyn FnMut(&TransferProgress) + Send>;

/// Create a progress callback that rewrites a running byte count in place.
///
/// # Example
/// ```no_run
/// use drivesh::progress::make_byte_counter;
///
/// let callback = make_byte_counter();
/// ```
pub fn make_byte_counter() -> ProgressCallback {
    Box::new(|progress: &TransferProgress| {
        print!("\rbytes: {}", progress.done);

        use std::io::Write;
        let _ = std::io::stdout().flush();
    })
}

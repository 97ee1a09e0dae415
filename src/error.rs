//! Error types for the drivesh crate.

use thiserror::Error;

/// Main error type for drivesh operations.
#[derive(Error, Debug)]
pub enum DriveshError {
    /// A command line matched a known verb but not its required shape.
    #[error("malformed command: {0}")]
    Parse(String),

    /// A command line starting with no recognized verb.
    #[error("unknown input: {0}")]
    UnknownCommand(String),

    /// A listing index outside `[1, len]`.
    #[error("index {index} out of range (listing has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    /// A folder operation was attempted on a file node.
    #[error("not a folder: {0}")]
    NotAFolder(String),

    /// A file operation was attempted on a folder node.
    #[error("not a file: {0}")]
    NotAFile(String),

    /// Listing, creation, or stream-open failure in the remote store.
    #[error("remote store error: {0}")]
    RemoteAccess(String),

    /// I/O failure while moving bytes during a transfer.
    #[error("transfer error: {0}")]
    Transfer(#[from] std::io::Error),
}

/// Result type alias for drivesh operations.
pub type Result<T> = std::result::Result<T, DriveshError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = DriveshError::UnknownCommand("foo bar".to_string());
        assert_eq!(err.to_string(), "unknown input: foo bar");

        let err = DriveshError::IndexOutOfRange { index: 7, len: 2 };
        assert!(err.to_string().contains('7'));
        assert!(err.to_string().contains('2'));
    }

    #[test]
    fn test_io_errors_become_transfer_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: DriveshError = io.into();
        assert!(matches!(err, DriveshError::Transfer(_)));
    }
}

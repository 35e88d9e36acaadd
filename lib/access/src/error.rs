//! Error types for the access crate.
//!
//! Errors are designed for layered context using rootcause:
//! - `StorageError`: Failures in a storage backend (I/O, encoding)
//! - `SessionError`: Failures persisting or clearing a session record
//!
//! None of these reach the UI-facing operations. Failed logins are a
//! `false` return, and unreadable sessions degrade to "not authenticated".

use std::fmt;

/// Errors from storage backend operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Reading from the backing store failed.
    ReadFailed { location: String, reason: String },
    /// Writing to the backing store failed.
    WriteFailed { location: String, reason: String },
    /// The backing store exists but its contents could not be decoded.
    Corrupt { location: String, reason: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed { location, reason } => {
                write!(f, "failed to read '{location}': {reason}")
            }
            Self::WriteFailed { location, reason } => {
                write!(f, "failed to write '{location}': {reason}")
            }
            Self::Corrupt { location, reason } => {
                write!(f, "corrupt storage at '{location}': {reason}")
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// Errors from session persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The session record could not be encoded.
    EncodeFailed { reason: String },
    /// The session record could not be written.
    PersistFailed,
    /// The session record could not be removed.
    ClearFailed,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EncodeFailed { reason } => {
                write!(f, "failed to encode session record: {reason}")
            }
            Self::PersistFailed => write!(f, "failed to persist session record"),
            Self::ClearFailed => write!(f, "failed to clear session record"),
        }
    }
}

impl std::error::Error for SessionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_read_failed_display() {
        let err = StorageError::ReadFailed {
            location: "/tmp/session.json".to_string(),
            reason: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("failed to read"));
        assert!(err.to_string().contains("/tmp/session.json"));
        assert!(err.to_string().contains("permission denied"));
    }

    #[test]
    fn storage_error_corrupt_display() {
        let err = StorageError::Corrupt {
            location: "session.json".to_string(),
            reason: "expected value at line 1".to_string(),
        };
        assert!(err.to_string().contains("corrupt"));
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn session_error_display() {
        assert!(
            SessionError::PersistFailed
                .to_string()
                .contains("persist session")
        );
        assert!(SessionError::ClearFailed.to_string().contains("clear"));
        let err = SessionError::EncodeFailed {
            reason: "bad".to_string(),
        };
        assert!(err.to_string().contains("encode"));
    }
}

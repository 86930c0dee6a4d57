//! Error types for the smart money engine

use thiserror::Error;

/// Result type alias using our custom Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the smart money engine
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Event errors
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Event source error: {0}")]
    EventSource(String),

    // Collaborator errors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Notification delivery failed: {0}")]
    Notification(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl Error {
    /// Check if this error only invalidates a single event (skip it, keep the batch)
    pub fn is_event_scoped(&self) -> bool {
        matches!(self, Error::MalformedEvent(_))
    }
}

// Conversion from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

// Conversion from I/O errors
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_scoped_errors() {
        assert!(Error::MalformedEvent("bad price".into()).is_event_scoped());
        assert!(!Error::EventSource("spool unreadable".into()).is_event_scoped());
        assert!(!Error::Storage("disk full".into()).is_event_scoped());
    }

    #[test]
    fn test_json_error_conversion() {
        let err: Error = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}

//! Error types for pagewire

use thiserror::Error;

/// Errors raised at the fallible edges of the crate.
///
/// Behaviors themselves never fail: a missing element only makes a behavior
/// inactive. These variants cover loading configuration, fixtures and
/// scenarios, and parsing selectors.
#[derive(Error, Debug)]
pub enum PageError {
    /// Selector string could not be parsed
    #[error("Unsupported selector: {0}")]
    Selector(String),

    /// A scenario step named an element that does not exist
    #[error("Target not found: {0}")]
    TargetNotFound(String),

    /// A scenario step is malformed
    #[error("Invalid scenario step: {0}")]
    InvalidStep(String),

    /// Page fixture is structurally invalid
    #[error("Invalid fixture: {0}")]
    Fixture(String),

    /// Error during serialization/deserialization
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using PageError
pub type PageResult<T> = Result<T, PageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PageError::TargetNotFound("#missing".to_string());
        assert_eq!(format!("{}", err), "Target not found: #missing");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let page_err: PageError = io_err.into();
        assert!(matches!(page_err, PageError::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let page_err: PageError = json_err.into();
        assert!(matches!(page_err, PageError::Serialization(_)));
    }
}

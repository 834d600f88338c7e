//! Error types for bounce classification

use thiserror::Error;

/// Errors raised at the edges of the classifier.
///
/// Classifying a message never fails: a message no extractor understands is
/// reported as [`Classification::Unrecognized`](crate::Classification).
/// These errors only come from reading raw input or building a registry.
#[derive(Error, Debug)]
pub enum ParseError {
    /// Failed to parse the header block of a raw message
    #[error("Failed to parse email structure: {0}")]
    Structure(String),

    /// Two extractors were registered under the same agent identifier
    #[error("Duplicate extractor agent: {0}")]
    DuplicateAgent(String),

    /// An agent named in the registry configuration is not registered
    #[error("Unknown extractor agent: {0}")]
    UnknownAgent(String),

    /// The registry was built without any extractor
    #[error("Registry has no extractors")]
    EmptyRegistry,
}

/// Result type for bounce classification operations
pub type Result<T> = std::result::Result<T, ParseError>;

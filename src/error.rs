//! Error types for quote-block recognition and message parsing

use thiserror::Error;

/// Errors that can occur while recognizing blocks or parsing messages
#[derive(Error, Debug)]
pub enum ParseError {
    /// Failed to parse the email structure
    #[error("Failed to parse email structure: {0}")]
    Structure(String),

    /// Failed to decode email content
    #[error("Failed to decode content: {0}")]
    Decode(String),

    /// Invalid date format
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Attribution format name outside the fixed set
    #[error("Invalid attribution format: {0}")]
    InvalidFormat(String),

    /// Pattern table entry that does not compile
    #[error("Invalid pattern for {format}: {source}")]
    InvalidPattern {
        format: String,
        #[source]
        source: regex::Error,
    },

    /// Pattern table entry wired to a capture slot it does not define,
    /// or a match that left every slot empty
    #[error("Missing capture slot `{slot}` for {format}")]
    MissingCaptureSlot { format: String, slot: &'static str },
}

/// Result type for parsing operations
pub type Result<T> = std::result::Result<T, ParseError>;

//! Error types for the lip-sync pipeline.
//!
//! Only configuration loading and explicit registry lookups surface errors.
//! The generator, blender and rig adapter log and degrade instead.

/// Top-level error type for the lip-sync crate.
#[derive(Debug, thiserror::Error)]
pub enum LipsyncError {
    /// Configuration error (parse failure or out-of-range value).
    #[error("config error: {0}")]
    Config(String),

    /// Malformed caller input (word timing arrays, JSON payloads).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A single write to the avatar rig failed.
    #[error("rig error: {0}")]
    Rig(String),

    /// No phonetic processor is registered for the requested language.
    #[error("unknown language: {0}")]
    UnknownLanguage(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, LipsyncError>;

//! Error types for tree operations.
//!
//! All fallible functions in this crate return [`Result<T>`]. Container errors
//! from `ltk_wwise` and `std::io::Error` are converted via `From`.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, editing or saving an audio tree.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Reading or writing the container failed.
    #[error(transparent)]
    Wwise(#[from] ltk_wwise::WwiseError),

    /// No node in the tree has this id.
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// The node exists but is a branch, so it has no audio to replace.
    #[error("Node '{0}' is a branch, not an audio leaf")]
    NotALeaf(String),

    /// A node carries both audio and children.
    #[error("Invalid tree: node '{0}' has both audio and children")]
    InvalidNode(String),

    /// Failed to serialize the tree view.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

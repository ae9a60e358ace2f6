//! Error and warning types for container parsing and writing.
//!
//! Fatal conditions are returned as [`WwiseError`]. Conditions the reader can
//! recover from are collected as [`ParseWarning`]s on the parsed container so
//! batch callers can report them without aborting.

use std::io;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, WwiseError>;

/// Fatal errors raised while reading or writing a container.
#[derive(Error, Debug)]
pub enum WwiseError {
    /// A chunk, object or media entry claims more bytes than the buffer holds.
    #[error(
        "malformed container: {section} at offset {offset:#x} declares {declared} bytes but only {available} are available"
    )]
    MalformedContainer {
        section: String,
        offset: u64,
        declared: u64,
        available: u64,
    },

    /// A section is structurally invalid (wrong entry size, missing header fields).
    #[error("invalid {tag} section: {reason}")]
    InvalidSection { tag: String, reason: String },

    /// The buffer does not start with a known container magic.
    #[error("unknown container magic {magic:02x?}")]
    UnknownContainer { magic: [u8; 4] },

    /// Nothing to write.
    #[error("refusing to write a container without audio payloads")]
    EmptyOutput,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("binrw error: {0}")]
    BinRw(#[from] binrw::Error),
}

impl WwiseError {
    pub(crate) fn malformed(
        section: impl Into<String>,
        offset: usize,
        declared: usize,
        available: usize,
    ) -> Self {
        Self::MalformedContainer {
            section: section.into(),
            offset: offset as u64,
            declared: declared as u64,
            available: available as u64,
        }
    }

    pub(crate) fn invalid_section(tag: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSection {
            tag: tag.into(),
            reason: reason.into(),
        }
    }
}

/// Recoverable conditions found while reading a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseWarning {
    /// A chunk tag the reader does not interpret. It is kept for pass-through.
    UnsupportedChunk { tag: String, offset: u64 },

    /// A hierarchy object of a known kind whose body could not be decoded.
    /// It is kept as an opaque object.
    UnreadableObject { id: u32, type_id: u8 },

    /// More than one payload in the container uses this ID. All copies are kept.
    DuplicateId { id: u32 },
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseWarning::UnsupportedChunk { tag, offset } => {
                write!(f, "skipped unsupported chunk '{tag}' at offset {offset:#x}")
            }
            ParseWarning::UnreadableObject { id, type_id } => {
                write!(f, "kept hierarchy object {id} (type {type_id}) as opaque")
            }
            ParseWarning::DuplicateId { id } => write!(f, "duplicate payload id {id}"),
        }
    }
}

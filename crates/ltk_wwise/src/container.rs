use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bnk::{self, BankMetadata, BKHD};
use crate::error::{ParseWarning, Result, WwiseError};
use crate::hirc::ObjectGraph;
use crate::payload::{dedup_payloads, AudioPayload};
use crate::wpk::{self, PackageMetadata, WPK_MAGIC};

/// The two supported container formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    Bnk,
    Wpk,
}

impl ContainerKind {
    /// Detect the format from the leading magic.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&BKHD) {
            Some(ContainerKind::Bnk)
        } else if bytes.starts_with(&WPK_MAGIC) {
            Some(ContainerKind::Wpk)
        } else {
            None
        }
    }

    /// Map a file extension (without the dot, any case) to a format.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "bnk" => Some(ContainerKind::Bnk),
            "wpk" => Some(ContainerKind::Wpk),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ContainerKind::Bnk => "bnk",
            ContainerKind::Wpk => "wpk",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContainerKind::Bnk => "BNK",
            ContainerKind::Wpk => "WPK",
        })
    }
}

/// Everything a writer needs besides the payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerMetadata {
    Bnk(BankMetadata),
    Wpk(PackageMetadata),
}

impl ContainerMetadata {
    /// Metadata for a brand new, otherwise empty container.
    pub fn fresh(kind: ContainerKind) -> Self {
        match kind {
            ContainerKind::Bnk => ContainerMetadata::Bnk(BankMetadata::default()),
            ContainerKind::Wpk => ContainerMetadata::Wpk(PackageMetadata::default()),
        }
    }

    pub fn kind(&self) -> ContainerKind {
        match self {
            ContainerMetadata::Bnk(_) => ContainerKind::Bnk,
            ContainerMetadata::Wpk(_) => ContainerKind::Wpk,
        }
    }

    pub fn version(&self) -> u32 {
        match self {
            ContainerMetadata::Bnk(bank) => bank.version,
            ContainerMetadata::Wpk(package) => package.version,
        }
    }
}

/// A fully read container.
#[derive(Debug, Clone)]
pub struct ParsedContainer {
    pub metadata: ContainerMetadata,
    /// Payloads in file order. Duplicate IDs are kept and reported in `warnings`.
    pub payloads: Vec<AudioPayload>,
    /// Object hierarchy of banks with a `HIRC` chunk.
    pub hierarchy: Option<ObjectGraph>,
    pub warnings: Vec<ParseWarning>,
}

impl ParsedContainer {
    pub fn kind(&self) -> ContainerKind {
        self.metadata.kind()
    }

    pub fn payload_ids(&self) -> Vec<u32> {
        self.payloads.iter().map(|payload| payload.id).collect()
    }
}

/// Output of [`write`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    pub bytes: Vec<u8>,
    /// Payloads dropped because a later payload had the same ID.
    pub duplicates: usize,
}

/// Parse a container, detecting its format from the magic.
pub fn parse(bytes: &[u8]) -> Result<ParsedContainer> {
    match ContainerKind::sniff(bytes) {
        Some(kind) => parse_as(bytes, kind),
        None => {
            let mut magic = [0u8; 4];
            let len = bytes.len().min(4);
            magic[..len].copy_from_slice(&bytes[..len]);
            Err(WwiseError::UnknownContainer { magic })
        }
    }
}

/// Parse a container of a known format.
pub fn parse_as(bytes: &[u8], kind: ContainerKind) -> Result<ParsedContainer> {
    let parsed = match kind {
        ContainerKind::Bnk => bnk::read_bank(bytes)?,
        ContainerKind::Wpk => wpk::read_package(bytes)?,
    };

    for warning in &parsed.warnings {
        tracing::debug!("{}: {}", kind, warning);
    }
    Ok(parsed)
}

/// Serialize payloads into a container described by `metadata`.
///
/// Payloads sharing an ID are collapsed: the last one wins and takes the first
/// one's position. Fails with [`WwiseError::EmptyOutput`] when there is nothing to write.
pub fn write(payloads: &[AudioPayload], metadata: &ContainerMetadata) -> Result<Written> {
    if payloads.is_empty() {
        return Err(WwiseError::EmptyOutput);
    }

    let (unique, duplicates) = dedup_payloads(payloads);
    if duplicates > 0 {
        tracing::warn!(
            "Collapsed {} payloads with duplicate ids, keeping the last copy of each",
            duplicates
        );
    }

    let bytes = match metadata {
        ContainerMetadata::Bnk(bank) => bnk::write_bank(&unique, bank)?,
        ContainerMetadata::Wpk(package) => wpk::write_package(&unique, package)?,
    };
    Ok(Written { bytes, duplicates })
}

/// Serialize payloads into a fresh container of the given format.
pub fn write_kind(payloads: &[AudioPayload], kind: ContainerKind) -> Result<Written> {
    write(payloads, &ContainerMetadata::fresh(kind))
}

//! Wwise soundbanks (`.bnk`).
//!
//! A bank is a flat sequence of `[tag: 4][size: u32][body]` chunks. Media lives in
//! the `DIDX` index and the `DATA` blob, the object hierarchy in `HIRC`. Every
//! other chunk is carried through unchanged.

use binrw::binrw;

mod read;
mod write;

pub(crate) use read::read_bank;
pub(crate) use write::write_bank;

pub const BKHD: [u8; 4] = *b"BKHD";
pub const DIDX: [u8; 4] = *b"DIDX";
pub const DATA: [u8; 4] = *b"DATA";
pub const HIRC: [u8; 4] = *b"HIRC";

/// Chunks that are understood well enough to pass through silently.
pub const PASSTHROUGH_TAGS: [[u8; 4]; 6] =
    [*b"STID", *b"STMG", *b"ENVS", *b"FXPR", *b"INIT", *b"PLAT"];

/// Bank version written into newly created headers.
pub const DEFAULT_BANK_VERSION: u32 = 134;

/// Alignment of each payload inside the `DATA` chunk.
pub const MEDIA_ALIGNMENT: usize = 16;

/// One `DIDX` entry. `offset` is relative to the start of the `DATA` body.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaIndexEntry {
    pub id: u32,
    pub offset: u32,
    pub size: u32,
}

impl MediaIndexEntry {
    pub const SIZE: usize = 12;
}

/// The fields of `BKHD` that are interpreted. The rest of the chunk is kept raw.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BankHeader {
    pub version: u32,
    pub bank_id: u32,
}

/// A chunk in the original bank, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankSection {
    /// A chunk written back byte for byte.
    Raw { tag: [u8; 4], body: Vec<u8> },
    /// Position of the `DIDX` chunk. Regenerated on write.
    MediaIndex,
    /// Position of the `DATA` chunk. Regenerated on write.
    MediaData,
}

impl BankSection {
    pub fn tag(&self) -> [u8; 4] {
        match self {
            BankSection::Raw { tag, .. } => *tag,
            BankSection::MediaIndex => DIDX,
            BankSection::MediaData => DATA,
        }
    }
}

/// Everything in a bank except the media itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankMetadata {
    pub version: u32,
    pub bank_id: u32,
    pub sections: Vec<BankSection>,
}

impl BankMetadata {
    /// Metadata for a bank with a minimal header and no other chunks.
    pub fn new(version: u32, bank_id: u32) -> Self {
        let mut header = Vec::with_capacity(20);
        header.extend_from_slice(&version.to_le_bytes());
        header.extend_from_slice(&bank_id.to_le_bytes());
        header.extend_from_slice(&0u32.to_le_bytes()); // language
        header.extend_from_slice(&0u32.to_le_bytes()); // alignment / feedback
        header.extend_from_slice(&0u32.to_le_bytes()); // project
        Self {
            version,
            bank_id,
            sections: vec![BankSection::Raw {
                tag: BKHD,
                body: header,
            }],
        }
    }

    /// The raw `HIRC` body, if the bank has one.
    pub fn hierarchy(&self) -> Option<&[u8]> {
        self.sections.iter().find_map(|section| match section {
            BankSection::Raw { tag, body } if *tag == HIRC => Some(body.as_slice()),
            _ => None,
        })
    }

    /// Section tags in file order, for display.
    pub fn section_tags(&self) -> Vec<String> {
        self.sections
            .iter()
            .map(|section| tag_to_string(&section.tag()))
            .collect()
    }
}

impl Default for BankMetadata {
    fn default() -> Self {
        Self::new(DEFAULT_BANK_VERSION, 0)
    }
}

pub(crate) fn tag_to_string(tag: &[u8; 4]) -> String {
    String::from_utf8_lossy(tag).into_owned()
}

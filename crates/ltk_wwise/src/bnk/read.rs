use std::collections::HashSet;
use std::io::Cursor;

use binrw::BinRead;
use byteorder::{ByteOrder, LE};

use super::{
    tag_to_string, BankHeader, BankMetadata, BankSection, MediaIndexEntry, BKHD, DATA, DIDX, HIRC,
    PASSTHROUGH_TAGS,
};
use crate::error::{ParseWarning, Result, WwiseError};
use crate::hirc::read_hierarchy;
use crate::{AudioPayload, ContainerMetadata, ParsedContainer};

const CHUNK_HEADER_SIZE: usize = 8;

/// A chunk body together with the file offset it starts at.
struct Located<'a> {
    body: &'a [u8],
    offset: usize,
}

pub(crate) fn read_bank(bytes: &[u8]) -> Result<ParsedContainer> {
    let mut header: Option<BankHeader> = None;
    let mut index: Option<Vec<MediaIndexEntry>> = None;
    let mut data: Option<Located> = None;
    let mut hierarchy: Option<Located> = None;
    let mut sections = Vec::new();
    let mut warnings = Vec::new();

    let mut position = 0;
    while position < bytes.len() {
        let remaining = bytes.len() - position;
        if remaining < CHUNK_HEADER_SIZE {
            return Err(WwiseError::malformed(
                "chunk header",
                position,
                CHUNK_HEADER_SIZE,
                remaining,
            ));
        }

        let mut tag = [0u8; 4];
        tag.copy_from_slice(&bytes[position..position + 4]);
        let size = LE::read_u32(&bytes[position + 4..]) as usize;
        let body_offset = position + CHUNK_HEADER_SIZE;
        let available = bytes.len() - body_offset;
        if size > available {
            return Err(WwiseError::malformed(
                format!("'{}' chunk", tag_to_string(&tag)),
                position,
                size,
                available,
            ));
        }
        let body = &bytes[body_offset..body_offset + size];

        match tag {
            BKHD => {
                if header.is_some() {
                    return Err(duplicate_chunk(&tag));
                }
                if body.len() < 8 {
                    return Err(WwiseError::invalid_section(
                        "BKHD",
                        format!("header is {} bytes, expected at least 8", body.len()),
                    ));
                }
                header = Some(BankHeader::read(&mut Cursor::new(body))?);
                sections.push(BankSection::Raw {
                    tag,
                    body: body.to_vec(),
                });
            }
            DIDX => {
                if index.is_some() {
                    return Err(duplicate_chunk(&tag));
                }
                if body.len() % MediaIndexEntry::SIZE != 0 {
                    return Err(WwiseError::invalid_section(
                        "DIDX",
                        format!(
                            "size {} is not a multiple of {}",
                            body.len(),
                            MediaIndexEntry::SIZE
                        ),
                    ));
                }
                index = Some(read_media_index(body)?);
                sections.push(BankSection::MediaIndex);
            }
            DATA => {
                if data.is_some() {
                    return Err(duplicate_chunk(&tag));
                }
                data = Some(Located {
                    body,
                    offset: body_offset,
                });
                sections.push(BankSection::MediaData);
            }
            HIRC => {
                hierarchy = Some(Located {
                    body,
                    offset: body_offset,
                });
                sections.push(BankSection::Raw {
                    tag,
                    body: body.to_vec(),
                });
            }
            _ => {
                if !PASSTHROUGH_TAGS.contains(&tag) {
                    tracing::warn!(
                        "Unsupported chunk '{}' at offset {:#x}, passing it through",
                        tag_to_string(&tag),
                        position
                    );
                    warnings.push(ParseWarning::UnsupportedChunk {
                        tag: tag_to_string(&tag),
                        offset: position as u64,
                    });
                }
                sections.push(BankSection::Raw {
                    tag,
                    body: body.to_vec(),
                });
            }
        }

        position = body_offset + size;
    }

    let header = header.ok_or_else(|| {
        WwiseError::invalid_section("BKHD", "bank has no header chunk")
    })?;

    let payloads = match (index, &data) {
        (Some(entries), Some(data)) => slice_media(&entries, data, &mut warnings)?,
        (Some(entries), None) if entries.is_empty() => Vec::new(),
        (Some(_), None) => {
            return Err(WwiseError::invalid_section(
                "DIDX",
                "media index present without a DATA chunk",
            ))
        }
        (None, _) => Vec::new(),
    };

    let hierarchy = hierarchy
        .map(|located| read_hierarchy(located.body, located.offset, header.version, &mut warnings))
        .transpose()?;

    tracing::debug!(
        "Read bank {} (version {}): {} payloads, {} sections",
        header.bank_id,
        header.version,
        payloads.len(),
        sections.len()
    );

    Ok(ParsedContainer {
        metadata: ContainerMetadata::Bnk(BankMetadata {
            version: header.version,
            bank_id: header.bank_id,
            sections,
        }),
        payloads,
        hierarchy,
        warnings,
    })
}

fn read_media_index(body: &[u8]) -> Result<Vec<MediaIndexEntry>> {
    let mut reader = Cursor::new(body);
    (0..body.len() / MediaIndexEntry::SIZE)
        .map(|_| MediaIndexEntry::read(&mut reader).map_err(WwiseError::from))
        .collect()
}

fn slice_media(
    entries: &[MediaIndexEntry],
    data: &Located,
    warnings: &mut Vec<ParseWarning>,
) -> Result<Vec<AudioPayload>> {
    let mut payloads = Vec::with_capacity(entries.len());
    let mut seen = HashSet::with_capacity(entries.len());

    for entry in entries {
        let start = entry.offset as usize;
        let end = start + entry.size as usize;
        if end > data.body.len() {
            return Err(WwiseError::malformed(
                format!("media {}", entry.id),
                data.offset + start,
                entry.size as usize,
                data.body.len().saturating_sub(start),
            ));
        }

        if !seen.insert(entry.id) {
            tracing::warn!("Duplicate media id {} in bank", entry.id);
            warnings.push(ParseWarning::DuplicateId { id: entry.id });
        }

        payloads.push(AudioPayload {
            id: entry.id,
            bytes: data.body[start..end].to_vec(),
            offset: entry.offset,
            length: entry.size,
        });
    }

    Ok(payloads)
}

fn duplicate_chunk(tag: &[u8; 4]) -> WwiseError {
    WwiseError::invalid_section(tag_to_string(tag), "chunk appears more than once")
}

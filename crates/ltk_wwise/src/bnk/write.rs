use std::io::{Cursor, Write};

use binrw::BinWrite;
use byteorder::{WriteBytesExt, LE};

use super::{BankMetadata, BankSection, MediaIndexEntry, BKHD, DATA, DIDX, MEDIA_ALIGNMENT};
use crate::error::{Result, WwiseError};
use crate::AudioPayload;

static MEDIA_INDEX: BankSection = BankSection::MediaIndex;
static MEDIA_DATA: BankSection = BankSection::MediaData;

/// Write a bank. `payloads` must already be free of duplicate IDs.
///
/// Non-media sections are written back in their original order. `DIDX` is rebuilt
/// sorted by ID and `DATA` is rebuilt with every payload aligned to
/// [`MEDIA_ALIGNMENT`] bytes.
pub(crate) fn write_bank(payloads: &[AudioPayload], metadata: &BankMetadata) -> Result<Vec<u8>> {
    let mut sorted: Vec<&AudioPayload> = payloads.iter().collect();
    sorted.sort_by_key(|payload| payload.id);

    let (entries, data) = build_media(&sorted)?;

    let mut writer = Cursor::new(Vec::new());
    for section in layout(&metadata.sections) {
        match section {
            BankSection::Raw { tag, body } => write_chunk(&mut writer, tag, body)?,
            BankSection::MediaIndex => {
                writer.write_all(&DIDX)?;
                writer.write_u32::<LE>(chunk_len(entries.len() * MediaIndexEntry::SIZE, &DIDX)?)?;
                for entry in &entries {
                    entry.write(&mut writer)?;
                }
            }
            BankSection::MediaData => write_chunk(&mut writer, &DATA, &data)?,
        }
    }

    tracing::debug!(
        "Wrote bank {} with {} payloads ({} data bytes)",
        metadata.bank_id,
        entries.len(),
        data.len()
    );
    Ok(writer.into_inner())
}

/// Original section order with the media slots filled in where they are missing.
fn layout(sections: &[BankSection]) -> Vec<&BankSection> {
    let mut layout: Vec<&BankSection> = sections.iter().collect();
    let has_index = sections.contains(&BankSection::MediaIndex);
    let has_data = sections.contains(&BankSection::MediaData);

    match (has_index, has_data) {
        (true, true) => {}
        (true, false) => {
            let at = position_of(&layout, DIDX).map_or(layout.len(), |i| i + 1);
            layout.insert(at, &MEDIA_DATA);
        }
        (false, true) => {
            let at = position_of(&layout, DATA).unwrap_or(0);
            layout.insert(at, &MEDIA_INDEX);
        }
        (false, false) => {
            let at = position_of(&layout, BKHD).map_or(0, |i| i + 1);
            layout.insert(at, &MEDIA_DATA);
            layout.insert(at, &MEDIA_INDEX);
        }
    }

    layout
}

fn position_of(layout: &[&BankSection], tag: [u8; 4]) -> Option<usize> {
    layout.iter().position(|section| section.tag() == tag)
}

/// Lay out `DATA`. Offsets strictly increase across non-empty payloads; an empty
/// payload takes no space and shares its offset with the next one.
fn build_media(payloads: &[&AudioPayload]) -> Result<(Vec<MediaIndexEntry>, Vec<u8>)> {
    let mut entries = Vec::with_capacity(payloads.len());
    let mut data = Vec::new();

    for payload in payloads {
        let padding = (MEDIA_ALIGNMENT - data.len() % MEDIA_ALIGNMENT) % MEDIA_ALIGNMENT;
        data.resize(data.len() + padding, 0);

        let offset = u32::try_from(data.len()).map_err(|_| too_large("DATA"))?;
        let size = u32::try_from(payload.bytes.len()).map_err(|_| too_large("DATA"))?;
        entries.push(MediaIndexEntry {
            id: payload.id,
            offset,
            size,
        });
        data.extend_from_slice(&payload.bytes);
    }

    Ok((entries, data))
}

fn write_chunk<W: Write>(writer: &mut W, tag: &[u8; 4], body: &[u8]) -> Result<()> {
    writer.write_all(tag)?;
    writer.write_u32::<LE>(chunk_len(body.len(), tag)?)?;
    writer.write_all(body)?;
    Ok(())
}

fn chunk_len(len: usize, tag: &[u8; 4]) -> Result<u32> {
    u32::try_from(len).map_err(|_| too_large(&super::tag_to_string(tag)))
}

fn too_large(tag: &str) -> WwiseError {
    WwiseError::invalid_section(tag, "section exceeds 4 GiB")
}

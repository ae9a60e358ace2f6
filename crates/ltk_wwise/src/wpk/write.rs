use std::io::{Cursor, Seek, SeekFrom, Write};

use binrw::BinWrite;

use super::{PackageEntry, PackageMetadata, PackageToc, DATA_ALIGNMENT};
use crate::error::{Result, WwiseError};
use crate::AudioPayload;

/// Write a package. Payloads keep their order; entry names are regenerated as `<id>.wem`.
///
/// Original entry names are not kept. An entry read as `explosion_01.wem` is
/// written back as `3643545792.wem`, which maps to the same id.
pub(crate) fn write_package(payloads: &[AudioPayload], metadata: &PackageMetadata) -> Result<Vec<u8>> {
    let mut entries: Vec<PackageEntry> = payloads
        .iter()
        .map(|payload| PackageEntry::new(0, 0, payload.file_name()))
        .collect();

    // Lay out the entry table, then the data area.
    let mut cursor = PackageToc::HEADER_SIZE + entries.len() * 4;
    let mut entry_offsets = Vec::with_capacity(entries.len());
    for entry in &entries {
        entry_offsets.push(to_u32(cursor)?);
        cursor += entry.encoded_size();
    }

    for (entry, payload) in entries.iter_mut().zip(payloads) {
        cursor = align(cursor, DATA_ALIGNMENT);
        entry.data_offset = to_u32(cursor)?;
        entry.data_size = to_u32(payload.bytes.len())?;
        cursor += payload.bytes.len();
    }

    let mut writer = Cursor::new(Vec::with_capacity(cursor));
    PackageToc::new(metadata.version, entry_offsets).write(&mut writer)?;
    for entry in &entries {
        entry.write(&mut writer)?;
    }

    for (entry, payload) in entries.iter().zip(payloads) {
        writer.seek(SeekFrom::Start(u64::from(entry.data_offset)))?;
        writer.write_all(&payload.bytes)?;
    }

    tracing::debug!("Wrote package with {} payloads", entries.len());
    Ok(writer.into_inner())
}

fn align(position: usize, alignment: usize) -> usize {
    position.div_ceil(alignment) * alignment
}

fn to_u32(value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| WwiseError::invalid_section("WPK", "package exceeds 4 GiB"))
}

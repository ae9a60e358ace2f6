use std::collections::HashSet;
use std::io::{Cursor, Seek, SeekFrom};

use binrw::BinRead;
use byteorder::{ByteOrder, LE};

use super::{entry_id, PackageEntry, PackageMetadata, PackageToc, WPK_MAGIC};
use crate::error::{ParseWarning, Result, WwiseError};
use crate::{AudioPayload, ContainerMetadata, ParsedContainer};

pub(crate) fn read_package(bytes: &[u8]) -> Result<ParsedContainer> {
    if bytes.len() < PackageToc::HEADER_SIZE {
        return Err(WwiseError::malformed(
            "WPK header",
            0,
            PackageToc::HEADER_SIZE,
            bytes.len(),
        ));
    }
    if bytes[..4] != WPK_MAGIC {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(WwiseError::UnknownContainer { magic });
    }

    let count = LE::read_u32(&bytes[8..]) as usize;
    let table_size = count.saturating_mul(4);
    let available = bytes.len() - PackageToc::HEADER_SIZE;
    if table_size > available {
        return Err(WwiseError::malformed(
            "WPK entry table",
            PackageToc::HEADER_SIZE,
            table_size,
            available,
        ));
    }

    let mut reader = Cursor::new(bytes);
    let toc = PackageToc::read(&mut reader)?;

    let mut payloads = Vec::with_capacity(count);
    let mut warnings = Vec::new();
    let mut seen = HashSet::with_capacity(count);

    for (i, &entry_offset) in toc.entry_offsets.iter().enumerate() {
        // Removed entries are left as zero offsets.
        if entry_offset == 0 {
            continue;
        }

        let entry = read_entry(&mut reader, bytes, i, entry_offset as usize)?;
        let start = entry.data_offset as usize;
        let size = entry.data_size as usize;
        let available = bytes.len().saturating_sub(start);
        if size > available {
            return Err(WwiseError::malformed(
                format!("WPK data for '{}'", entry.name),
                start,
                size,
                available,
            ));
        }

        let id = entry_id(&entry.name);
        if !seen.insert(id) {
            tracing::warn!("Duplicate payload id {} ('{}') in package", id, entry.name);
            warnings.push(ParseWarning::DuplicateId { id });
        }

        payloads.push(AudioPayload {
            id,
            bytes: bytes[start..start + size].to_vec(),
            offset: entry.data_offset,
            length: entry.data_size,
        });
    }

    tracing::debug!(
        "Read package version {} with {} payloads",
        toc.version,
        payloads.len()
    );

    Ok(ParsedContainer {
        metadata: ContainerMetadata::Wpk(PackageMetadata {
            version: toc.version,
        }),
        payloads,
        hierarchy: None,
        warnings,
    })
}

fn read_entry(
    reader: &mut Cursor<&[u8]>,
    bytes: &[u8],
    index: usize,
    offset: usize,
) -> Result<PackageEntry> {
    let section = || format!("WPK entry #{index}");

    let available = bytes.len().saturating_sub(offset);
    if available < PackageEntry::FIXED_SIZE {
        return Err(WwiseError::malformed(
            section(),
            offset,
            PackageEntry::FIXED_SIZE,
            available,
        ));
    }

    let name_size = (LE::read_u32(&bytes[offset + 8..]) as usize).saturating_mul(2);
    let name_available = available - PackageEntry::FIXED_SIZE;
    if name_size > name_available {
        return Err(WwiseError::malformed(
            section(),
            offset + PackageEntry::FIXED_SIZE,
            name_size,
            name_available,
        ));
    }

    reader.seek(SeekFrom::Start(offset as u64))?;
    let entry = PackageEntry::read(reader).map_err(|err| {
        WwiseError::invalid_section("WPK", format!("entry #{index} has an invalid name: {err}"))
    })?;
    Ok(entry)
}

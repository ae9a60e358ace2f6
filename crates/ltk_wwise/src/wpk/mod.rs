//! Riot audio packages (`.wpk`).
//!
//! Layout:
//!
//! ```text
//! "r3d2" | version: u32 | count: u32 | entry offsets: [u32; count]
//! entry: data offset: u32 | data size: u32 | name length: u32 | name: UTF-16LE
//! ```
//!
//! All offsets are absolute. Entry names are `<id>.wem`.

use binrw::binrw;

use crate::fnv::fnv1_lower;

mod read;
mod write;

pub(crate) use read::read_package;
pub(crate) use write::write_package;

pub const WPK_MAGIC: [u8; 4] = *b"r3d2";

/// Package version written by the game's tooling.
pub const DEFAULT_WPK_VERSION: u32 = 1;

/// Alignment of each payload in the data area.
pub const DATA_ALIGNMENT: usize = 8;

/// Header and entry offset table.
#[binrw]
#[brw(little, magic = b"r3d2")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageToc {
    pub version: u32,

    #[br(temp)]
    #[bw(try_calc(u32::try_from(entry_offsets.len())))]
    entry_count: u32,

    #[br(count = entry_count)]
    pub entry_offsets: Vec<u32>,
}

impl PackageToc {
    pub const HEADER_SIZE: usize = 12;

    pub fn new(version: u32, entry_offsets: Vec<u32>) -> Self {
        Self {
            version,
            entry_offsets,
        }
    }
}

/// A single file entry.
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageEntry {
    pub data_offset: u32,
    pub data_size: u32,

    #[br(temp)]
    #[bw(try_calc(u32::try_from(name.encode_utf16().count())))]
    name_len: u32,

    #[br(count = name_len, try_map = |units: Vec<u16>| String::from_utf16(&units))]
    #[bw(map = |name: &String| name.encode_utf16().collect::<Vec<u16>>())]
    pub name: String,
}

impl PackageEntry {
    pub const FIXED_SIZE: usize = 12;

    pub fn new(data_offset: u32, data_size: u32, name: String) -> Self {
        Self {
            data_offset,
            data_size,
            name,
        }
    }

    pub fn encoded_size(&self) -> usize {
        Self::FIXED_SIZE + self.name.encode_utf16().count() * 2
    }
}

/// Non-media state of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageMetadata {
    pub version: u32,
}

impl Default for PackageMetadata {
    fn default() -> Self {
        Self {
            version: DEFAULT_WPK_VERSION,
        }
    }
}

/// Map an entry name to a payload ID.
///
/// `123.wem` maps to `123`. Anything that is not a decimal stem is hashed, which
/// cannot be undone: [`write`](crate::write) names every entry `<id>.wem`, so a
/// package with hashed names comes back with decimal names.
pub fn entry_id(name: &str) -> u32 {
    let stem = name
        .rsplit_once('.')
        .map_or(name, |(stem, _extension)| stem);
    stem.parse().unwrap_or_else(|_| fnv1_lower(stem))
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use binrw::{BinRead, BinWrite};
    use proptest::prelude::*;

    use super::*;

    proptest! {
        #[test]
        fn test_entry_roundtrip(data_offset in any::<u32>(), data_size in any::<u32>(), name in "[0-9]{1,10}\\.wem") {
            let entry = PackageEntry::new(data_offset, data_size, name);
            let mut cursor = Cursor::new(Vec::new());
            entry.write(&mut cursor).unwrap();
            prop_assert_eq!(cursor.get_ref().len(), entry.encoded_size());

            cursor.set_position(0);
            let read_entry = PackageEntry::read(&mut cursor).unwrap();
            prop_assert_eq!(entry, read_entry);
        }

        #[test]
        fn test_toc_roundtrip(version in any::<u32>(), entry_offsets in proptest::collection::vec(any::<u32>(), 0..32)) {
            let toc = PackageToc::new(version, entry_offsets);
            let mut cursor = Cursor::new(Vec::new());
            toc.write(&mut cursor).unwrap();

            cursor.set_position(0);
            prop_assert_eq!(toc, PackageToc::read(&mut cursor).unwrap());
        }
    }

    #[test]
    fn test_entry_id() {
        assert_eq!(entry_id("123.wem"), 123);
        assert_eq!(entry_id("4294967295.wem"), u32::MAX);
        assert_eq!(entry_id("explosion_01.wem"), 0xD92C18C0);
        assert_eq!(entry_id("explosion_01"), 0xD92C18C0);
    }

    #[test]
    fn test_entry_encoded_size() {
        let entry = PackageEntry::new(0, 0, "12.wem".to_string());
        assert_eq!(entry.encoded_size(), 12 + 12);
    }
}

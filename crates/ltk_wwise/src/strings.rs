//! Candidate name lists used to resolve hashed event IDs.
//!
//! Names usually come from one of three places: a plain text list (one name per
//! line, optionally in `<hex hash> <name>` hashtable form), a sequence of
//! length-prefixed strings, or a binary property file (`.bin`) where event names
//! are embedded as `u16`-prefixed strings among other data.
//!
//! The loader never fails as a whole. Records that cannot be decoded are skipped
//! and counted so the caller can tell how much was lost.

use byteorder::{ByteOrder, LE};

/// Upper bound for a single name found by [`RecordFormat::Scan`].
const MAX_SCAN_NAME_LEN: usize = 512;

/// Lower bound for a single name found by [`RecordFormat::Scan`].
const MIN_SCAN_NAME_LEN: usize = 3;

/// Magic values of the engine's binary property files.
const PROPERTY_MAGICS: [&[u8; 4]; 2] = [b"PROP", b"PTCH"];

/// How records are laid out in a string table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordFormat {
    /// Newline separated UTF-8 text.
    Lines,
    /// Back to back `[u16 length][UTF-8 bytes]` records.
    LengthPrefixed,
    /// Binary property file scanned for embedded `u16`-prefixed names.
    Scan,
}

impl RecordFormat {
    /// Guess the record format from the raw bytes.
    pub fn sniff(bytes: &[u8]) -> Self {
        if PROPERTY_MAGICS
            .iter()
            .any(|magic| bytes.starts_with(magic.as_slice()))
        {
            return RecordFormat::Scan;
        }

        match std::str::from_utf8(bytes) {
            Ok(text) if !text.chars().any(|c| c.is_control() && !c.is_whitespace()) => {
                RecordFormat::Lines
            }
            _ => RecordFormat::LengthPrefixed,
        }
    }
}

/// Why a record was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    InvalidUtf8,
    Truncated,
    Empty,
}

/// A record that could not be turned into a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedRecord {
    pub offset: usize,
    pub reason: SkipReason,
}

/// Result of fully loading a string table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedStrings {
    /// Names in file order. Duplicates are kept.
    pub names: Vec<String>,
    /// Number of records that were skipped.
    pub skipped: usize,
}

/// A view over the raw bytes of a string table.
///
/// Iteration is lazy and can be restarted by calling [`StringTable::records`] again.
#[derive(Debug, Clone, Copy)]
pub struct StringTable<'a> {
    bytes: &'a [u8],
    format: RecordFormat,
}

impl<'a> StringTable<'a> {
    /// Create a table, sniffing the record format.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            format: RecordFormat::sniff(bytes),
        }
    }

    /// Create a table with an explicit record format.
    pub fn with_format(bytes: &'a [u8], format: RecordFormat) -> Self {
        Self { bytes, format }
    }

    pub fn format(&self) -> RecordFormat {
        self.format
    }

    /// Iterate over the records from the start.
    pub fn records(&self) -> Records<'a> {
        let position = match self.format {
            RecordFormat::Scan => 4.min(self.bytes.len()),
            _ => 0,
        };
        Records {
            bytes: self.bytes,
            format: self.format,
            position,
        }
    }

    /// Collect every name, counting skipped records.
    pub fn load(&self) -> LoadedStrings {
        let mut loaded = LoadedStrings::default();
        for record in self.records() {
            match record {
                Ok(name) => loaded.names.push(name),
                Err(skipped) => {
                    tracing::debug!(
                        "Skipping string record at offset {:#x}: {:?}",
                        skipped.offset,
                        skipped.reason
                    );
                    loaded.skipped += 1;
                }
            }
        }

        if loaded.skipped > 0 {
            tracing::warn!(
                "String table: loaded {} names, skipped {} malformed records",
                loaded.names.len(),
                loaded.skipped
            );
        }
        loaded
    }
}

/// Lazy iterator over the records of a [`StringTable`].
#[derive(Debug, Clone)]
pub struct Records<'a> {
    bytes: &'a [u8],
    format: RecordFormat,
    position: usize,
}

impl Iterator for Records<'_> {
    type Item = Result<String, SkippedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.format {
            RecordFormat::Lines => self.next_line(),
            RecordFormat::LengthPrefixed => self.next_prefixed(),
            RecordFormat::Scan => self.next_scanned(),
        }
    }
}

impl Records<'_> {
    fn next_line(&mut self) -> Option<Result<String, SkippedRecord>> {
        while self.position < self.bytes.len() {
            let start = self.position;
            let rest = &self.bytes[start..];
            let line_len = rest.iter().position(|&b| b == b'\n').unwrap_or(rest.len());
            self.position = start + line_len + 1;

            let Ok(line) = std::str::from_utf8(&rest[..line_len]) else {
                return Some(Err(SkippedRecord {
                    offset: start,
                    reason: SkipReason::InvalidUtf8,
                }));
            };

            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            return Some(Ok(strip_hash_prefix(line).to_string()));
        }
        None
    }

    fn next_prefixed(&mut self) -> Option<Result<String, SkippedRecord>> {
        let start = self.position;
        let remaining = self.bytes.len().checked_sub(start)?;
        if remaining == 0 {
            return None;
        }

        if remaining < 2 {
            self.position = self.bytes.len();
            return Some(Err(SkippedRecord {
                offset: start,
                reason: SkipReason::Truncated,
            }));
        }

        let len = LE::read_u16(&self.bytes[start..]) as usize;
        let body_start = start + 2;
        if len > self.bytes.len() - body_start {
            self.position = self.bytes.len();
            return Some(Err(SkippedRecord {
                offset: start,
                reason: SkipReason::Truncated,
            }));
        }

        self.position = body_start + len;
        let body = &self.bytes[body_start..body_start + len];
        Some(match std::str::from_utf8(body) {
            Ok("") => Err(SkippedRecord {
                offset: start,
                reason: SkipReason::Empty,
            }),
            Ok(name) => Ok(name.to_string()),
            Err(_) => Err(SkippedRecord {
                offset: start,
                reason: SkipReason::InvalidUtf8,
            }),
        })
    }

    fn next_scanned(&mut self) -> Option<Result<String, SkippedRecord>> {
        while self.position + 2 <= self.bytes.len() {
            let start = self.position;
            let len = LE::read_u16(&self.bytes[start..]) as usize;
            let body_start = start + 2;

            if (MIN_SCAN_NAME_LEN..=MAX_SCAN_NAME_LEN).contains(&len)
                && len <= self.bytes.len() - body_start
            {
                let body = &self.bytes[body_start..body_start + len];
                if body.iter().all(|&b| is_name_byte(b)) {
                    self.position = body_start + len;
                    // All bytes are ASCII, so this cannot fail.
                    return Some(Ok(String::from_utf8_lossy(body).into_owned()));
                }
            }

            self.position += 1;
        }

        self.position = self.bytes.len();
        None
    }
}

fn is_name_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'/' | b'.' | b':' | b'-')
}

/// Strip a leading `<hex hash> ` from hashtable style lines.
fn strip_hash_prefix(line: &str) -> &str {
    let Some((head, tail)) = line.split_once(' ') else {
        return line;
    };

    let digits = head
        .strip_prefix("0x")
        .or_else(|| head.strip_prefix("0X"))
        .unwrap_or(head);
    let is_hash = matches!(digits.len(), 8 | 16) && digits.chars().all(|c| c.is_ascii_hexdigit());

    let tail = tail.trim();
    if is_hash && !tail.is_empty() {
        tail
    } else {
        line
    }
}

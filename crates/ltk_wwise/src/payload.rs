use std::collections::HashMap;

/// A single embedded `.wem` payload.
///
/// `offset` is where the bytes were found: relative to the DATA chunk body for
/// soundbanks, absolute for packages. Writers always recompute it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    pub id: u32,
    pub bytes: Vec<u8>,
    pub offset: u32,
    pub length: u32,
}

impl AudioPayload {
    pub fn new(id: u32, bytes: Vec<u8>) -> Self {
        let length = bytes.len() as u32;
        Self {
            id,
            bytes,
            offset: 0,
            length,
        }
    }

    /// Replace the payload bytes, keeping `length` in sync.
    pub fn replace_bytes(&mut self, bytes: Vec<u8>) {
        self.length = bytes.len() as u32;
        self.bytes = bytes;
    }

    /// File name used when extracting the payload.
    pub fn file_name(&self) -> String {
        format!("{}.wem", self.id)
    }
}

/// Collapse payloads sharing an ID.
///
/// The first occurrence keeps its position, the last occurrence provides the
/// contents. Returns the unique payloads and the number of dropped duplicates.
pub fn dedup_payloads(payloads: &[AudioPayload]) -> (Vec<AudioPayload>, usize) {
    let mut unique: Vec<AudioPayload> = Vec::with_capacity(payloads.len());
    let mut positions: HashMap<u32, usize> = HashMap::with_capacity(payloads.len());
    let mut duplicates = 0;

    for payload in payloads {
        match positions.get(&payload.id) {
            Some(&index) => {
                unique[index] = payload.clone();
                duplicates += 1;
            }
            None => {
                positions.insert(payload.id, unique.len());
                unique.push(payload.clone());
            }
        }
    }

    (unique, duplicates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_last_wins_first_position() {
        let payloads = vec![
            AudioPayload::new(1, vec![1]),
            AudioPayload::new(2, vec![2]),
            AudioPayload::new(1, vec![3, 3]),
        ];

        let (unique, duplicates) = dedup_payloads(&payloads);
        assert_eq!(duplicates, 1);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].id, 1);
        assert_eq!(unique[0].bytes, vec![3, 3]);
        assert_eq!(unique[0].length, 2);
        assert_eq!(unique[1].id, 2);
    }

    #[test]
    fn test_replace_bytes_updates_length() {
        let mut payload = AudioPayload::new(7, vec![0; 4]);
        payload.replace_bytes(vec![0; 10]);
        assert_eq!(payload.length, 10);
        assert_eq!(payload.file_name(), "7.wem");
    }
}

//! 32-bit FNV-1 hashing as used by Wwise for event and object IDs.
//!
//! Wwise hashes lower-cased names with FNV-1 (multiply, then xor). FNV-1a
//! (xor, then multiply) produces different values and matches nothing.

const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Hash raw bytes with 32-bit FNV-1.
pub fn fnv1(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        hash.wrapping_mul(FNV_PRIME) ^ u32::from(byte)
    })
}

/// Hash a name the way Wwise does: lower-case, then FNV-1.
pub fn fnv1_lower(name: &str) -> u32 {
    fnv1(name.to_lowercase().as_bytes())
}

/// Formats an ID as an 8 digit hexadecimal string.
pub fn fnv1_hex(hash: u32) -> String {
    format!("{:08x}", hash)
}

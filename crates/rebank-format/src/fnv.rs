//! FNV-1 name hash used for soundbank identifiers
//!
//! Soundbank names are fingerprinted with the 32-bit FNV-1 hash
//! (multiply-then-xor, unlike the more common FNV-1a) over the lower-cased
//! name. The result is written into the archive header at save time and is
//! the numeric ID consumers use to look the bank up.

/// FNV-1 32-bit offset basis.
const OFFSET_BASIS: u32 = 0x811c9dc5;

/// FNV-1 32-bit prime.
const PRIME: u32 = 0x01000193;

/// Compute the 32-bit FNV-1 fingerprint of a name.
///
/// The name is lower-cased before hashing, so bank lookups are
/// case-insensitive. Non-ASCII input hashes its UTF-8 bytes.
///
/// # Examples
///
/// ```
/// use rebank_format::fnv::fnv1;
///
/// assert_eq!(fnv1("Foo"), fnv1("FOO"));
/// assert_eq!(fnv1("bank"), 0x67f9e01f);
/// ```
pub fn fnv1(name: &str) -> u32 {
    fnv1_bytes(name.to_lowercase().as_bytes())
}

/// Compute the 32-bit FNV-1 hash of raw bytes, without case folding.
pub fn fnv1_bytes(data: &[u8]) -> u32 {
    let mut hash = OFFSET_BASIS;
    for &byte in data {
        hash = hash.wrapping_mul(PRIME);
        hash ^= u32::from(byte);
    }
    hash
}

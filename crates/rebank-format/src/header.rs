//! `BKHD` header section
//!
//! The header is an opaque fixed-layout blob; the only field this layer
//! interprets is the archive ID, a little-endian u32 at byte offset 4 of the
//! payload. Every other byte is preserved verbatim from whichever file
//! supplied the header.
//!
//! # Format Structure
//!
//! ```text
//! BKHD payload (>= 0x14 bytes):
//! ├── Bank generation (u32, little-endian, 0x78 in observed banks)
//! ├── Archive ID (u32, little-endian, FNV-1 hash of the bank name)
//! ├── Zero padding (8 bytes)
//! ├── Constant marker (u32, little-endian, 0x447 in observed banks)
//! └── Optional trailing padding (0 or 8 bytes)
//! ```

use crate::error::{Error, Result};

/// Byte offset of the archive ID inside the header payload.
const ID_OFFSET: usize = 4;

/// Smallest header payload carried by real archives.
pub const MIN_HEADER_LEN: usize = 0x14;

/// Bank generation written into synthesized headers.
const BANK_GENERATION: u32 = 0x78;

/// Constant marker field present in every observed bank.
const BANK_MARKER: u32 = 0x447;

/// `BKHD` section: opaque payload with an addressable archive ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSection {
    payload: Vec<u8>,
}

impl HeaderSection {
    /// Parse a header section from its chunk payload.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < MIN_HEADER_LEN {
            return Err(Error::HeaderTooShort { actual: data.len() });
        }
        Ok(Self {
            payload: data.to_vec(),
        })
    }

    /// Build a header for a bank assembled from loose resources.
    ///
    /// Produces the 28-byte layout real banks carry: generation, ID
    /// placeholder, eight zero bytes, the 0x447 marker, eight more zero
    /// bytes. The ID is patched when the bank is saved.
    pub fn synthesize() -> Self {
        let mut payload = Vec::with_capacity(28);
        payload.extend_from_slice(&BANK_GENERATION.to_le_bytes());
        payload.extend_from_slice(&0u32.to_le_bytes());
        payload.extend_from_slice(&[0u8; 8]);
        payload.extend_from_slice(&BANK_MARKER.to_le_bytes());
        payload.extend_from_slice(&[0u8; 8]);
        Self { payload }
    }

    /// The archive ID stored at byte offset 4.
    pub fn id(&self) -> u32 {
        u32::from_le_bytes([
            self.payload[ID_OFFSET],
            self.payload[ID_OFFSET + 1],
            self.payload[ID_OFFSET + 2],
            self.payload[ID_OFFSET + 3],
        ])
    }

    /// Overwrite the archive ID in place, leaving all other bytes untouched.
    pub fn set_id(&mut self, id: u32) {
        self.payload[ID_OFFSET..ID_OFFSET + 4].copy_from_slice(&id.to_le_bytes());
    }

    /// The raw header payload.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Encode the section payload.
    pub fn build(&self) -> Vec<u8> {
        self.payload.clone()
    }
}

// Implement BnkFormat trait
use crate::BnkFormat;

impl BnkFormat for HeaderSection {
    fn parse(data: &[u8]) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        Self::parse(data).map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }

    fn build(&self) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>> {
        Ok(self.build())
    }
}

//! `HIRC` object hierarchy section
//!
//! The hierarchy payload is a little-endian `u32` object count followed by
//! the serialized objects themselves. Object internals vary by bank
//! generation and are carried opaquely; only the count is interpreted so
//! that banks can be combined without corrupting it.

use crate::error::{Error, Result};

/// `HIRC` section: object count plus the opaque object blob.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HierarchySection {
    entry_count: u32,
    objects: Vec<u8>,
}

impl HierarchySection {
    /// Create a hierarchy section from a count and its object bytes.
    pub fn new(entry_count: u32, objects: Vec<u8>) -> Self {
        Self {
            entry_count,
            objects,
        }
    }

    /// Parse a hierarchy section from its chunk payload.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < 4 {
            return Err(Error::TruncatedData {
                expected: 4,
                actual: data.len() as u64,
            });
        }

        let entry_count = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        Ok(Self {
            entry_count,
            objects: data[4..].to_vec(),
        })
    }

    /// Encode the section payload.
    pub fn build(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(4 + self.objects.len());
        payload.extend_from_slice(&self.entry_count.to_le_bytes());
        payload.extend_from_slice(&self.objects);
        payload
    }

    /// Declared object count.
    pub fn entry_count(&self) -> u32 {
        self.entry_count
    }

    /// The opaque object bytes following the count.
    pub fn objects(&self) -> &[u8] {
        &self.objects
    }

    /// Combine two hierarchies: counts add, object blobs concatenate in
    /// operand order. Neither operand is mutated.
    pub fn merge(&self, other: &Self) -> Self {
        let mut objects = Vec::with_capacity(self.objects.len() + other.objects.len());
        objects.extend_from_slice(&self.objects);
        objects.extend_from_slice(&other.objects);

        Self {
            entry_count: self.entry_count.wrapping_add(other.entry_count),
            objects,
        }
    }
}

// Implement BnkFormat trait
use crate::BnkFormat;

impl BnkFormat for HierarchySection {
    fn parse(data: &[u8]) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        Self::parse(data).map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }

    fn build(&self) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>> {
        Ok(self.build())
    }
}

//! `DIDX` index section
//!
//! The index maps sub-resource IDs to byte ranges inside the `DATA` payload.
//!
//! # Format Structure
//!
//! ```text
//! DIDX payload (N * 12 bytes):
//! └── N records:
//!     ├── Resource ID (u32, little-endian, FNV-1 hash of the source name)
//!     ├── Offset (u32, little-endian, relative to the DATA payload start)
//!     └── Size (u32, little-endian, unpadded byte count)
//! ```
//!
//! Records parsed from a file keep their on-disk order, which real banks
//! also keep sorted by offset. Records produced by a merge are reordered by
//! ascending ID; their offsets are placeholders until the owning archive
//! recomputes them against the rebuilt payload.

use crate::error::{Error, Result};
use binrw::{BinRead, BinWrite};
use std::collections::HashMap;
use std::io::Cursor;

/// Width of one index record on disk.
pub const RECORD_LEN: usize = 12;

/// One `DIDX` record: a sub-resource ID and its byte range inside `DATA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[brw(little)]
pub struct IndexEntry {
    /// Sub-resource ID
    pub id: u32,
    /// Byte offset relative to the start of the `DATA` payload
    pub offset: u32,
    /// Unpadded byte size
    pub size: u32,
}

/// `DIDX` section: an ordered table of [`IndexEntry`] records.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexSection {
    entries: Vec<IndexEntry>,
}

impl IndexSection {
    /// Create an index from caller-constructed records, preserving order.
    pub fn from_entries(entries: Vec<IndexEntry>) -> Self {
        Self { entries }
    }

    /// Parse an index section from its chunk payload.
    ///
    /// The payload must be a whole number of 12-byte records with
    /// non-decreasing offsets. A duplicated ID keeps its first position in
    /// the table but takes the offset and size of its last record.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() % RECORD_LEN != 0 {
            return Err(Error::InvalidIndexLength(data.len() as u32));
        }

        let count = data.len() / RECORD_LEN;
        let mut cursor = Cursor::new(data);
        let mut entries: Vec<IndexEntry> = Vec::with_capacity(count);
        let mut positions: HashMap<u32, usize> = HashMap::with_capacity(count);
        let mut prev_offset: Option<u32> = None;

        for _ in 0..count {
            let record = IndexEntry::read(&mut cursor)?;

            if let Some(prev) = prev_offset
                && record.offset < prev
            {
                return Err(Error::UnorderedIndex {
                    prev,
                    next: record.offset,
                });
            }
            prev_offset = Some(record.offset);

            if let Some(&pos) = positions.get(&record.id) {
                entries[pos] = record;
            } else {
                positions.insert(record.id, entries.len());
                entries.push(record);
            }
        }

        Ok(Self { entries })
    }

    /// Encode the section payload: records in table order, 12 bytes each.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::with_capacity(self.entries.len() * RECORD_LEN));
        for entry in &self.entries {
            entry.write(&mut cursor)?;
        }
        Ok(cursor.into_inner())
    }

    /// Records in table order.
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table holds no records.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the record for one resource ID.
    pub fn get(&self, id: u32) -> Option<&IndexEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Union this table with another, the other side winning on ID
    /// collision, reordered by ascending ID.
    ///
    /// The merged offsets are placeholders carried over from the operands;
    /// they are only valid again once the owning archive rebuilds its
    /// payload and adopts the fresh table.
    pub fn merge(&self, other: &Self) -> Self {
        let mut by_id: HashMap<u32, IndexEntry> = self
            .entries
            .iter()
            .map(|entry| (entry.id, *entry))
            .collect();
        for entry in &other.entries {
            by_id.insert(entry.id, *entry);
        }

        let mut merged: Vec<IndexEntry> = by_id.into_values().collect();
        merged.sort_unstable_by_key(|entry| entry.id);
        Self { entries: merged }
    }

    /// Replace the table with offsets recomputed from a rebuilt payload.
    pub fn adopt_offsets(&mut self, table: Vec<IndexEntry>) {
        self.entries = table;
    }
}

// Implement BnkFormat trait
use crate::BnkFormat;

impl BnkFormat for IndexSection {
    fn parse(data: &[u8]) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        Self::parse(data).map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }

    fn build(&self) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>> {
        Self::build(self).map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }
}

//! `DATA` payload section
//!
//! The payload is the concatenation of all sub-resource bytes, each
//! non-final resource zero-padded up to the next 16-byte boundary. The
//! section loads as one opaque blob; [`DataSection::split`] partitions it
//! into individually addressable sub-resources using a `DIDX` table, after
//! which the blob form is a derived encoding refreshed by
//! [`DataSection::rebuild`].

use crate::error::{Error, Result};
use crate::index::{IndexEntry, IndexSection};
use std::collections::HashMap;
use tracing::debug;

/// Sub-resource alignment inside the payload.
pub const ALIGNMENT: usize = 16;

/// One individually addressable audio payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubResource {
    /// Resource ID, also the file name stem when extracted
    pub id: u32,
    /// Raw resource bytes, unpadded
    pub bytes: Vec<u8>,
}

impl SubResource {
    /// Create a sub-resource from an ID and its bytes.
    pub fn new(id: u32, bytes: Vec<u8>) -> Self {
        Self { id, bytes }
    }
}

/// Zero padding needed to bring `len` up to the next 16-byte boundary.
///
/// A length already on a boundary needs no padding. Bank writers that pad
/// a full extra block in that case exist in the wild; their output parses
/// fine but that form is never produced here.
pub fn padding_for(len: usize) -> usize {
    (ALIGNMENT - (len % ALIGNMENT)) % ALIGNMENT
}

/// `DATA` section: raw payload blob plus the split sub-resource table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataSection {
    raw: Vec<u8>,
    resources: Option<Vec<SubResource>>,
}

impl DataSection {
    /// Parse a payload section from its chunk payload. No splitting happens
    /// here; the bytes are stored opaquely.
    pub fn parse(data: &[u8]) -> Result<Self> {
        Ok(Self {
            raw: data.to_vec(),
            resources: None,
        })
    }

    /// Create an already-split section from loose resources, in the order
    /// given. The blob form is empty until [`Self::rebuild`] runs.
    pub fn from_resources(resources: Vec<SubResource>) -> Self {
        Self {
            raw: Vec::new(),
            resources: Some(resources),
        }
    }

    /// The raw payload blob.
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Encode the section payload.
    pub fn build(&self) -> Vec<u8> {
        self.raw.clone()
    }

    /// Whether the payload has been split into sub-resources.
    pub fn is_split(&self) -> bool {
        self.resources.is_some()
    }

    /// The split sub-resources, in table order.
    pub fn resources(&self) -> Option<&[SubResource]> {
        self.resources.as_deref()
    }

    /// Look up one split sub-resource by ID.
    pub fn resource(&self, id: u32) -> Option<&SubResource> {
        self.resources
            .as_ref()
            .and_then(|resources| resources.iter().find(|r| r.id == id))
    }

    /// Partition the payload into sub-resources along an index table.
    ///
    /// Every `(id, offset, size)` record is sliced out of the blob in the
    /// index's order. A record that does not fit inside the blob aborts the
    /// split. Splitting twice against the same index yields the same
    /// resources both times.
    pub fn split(&mut self, index: &IndexSection) -> Result<()> {
        let available = self.raw.len() as u64;
        let mut resources = Vec::with_capacity(index.len());

        for entry in index.entries() {
            let end = u64::from(entry.offset) + u64::from(entry.size);
            if end > available {
                return Err(Error::OffsetOutOfRange {
                    id: entry.id,
                    offset: entry.offset,
                    size: entry.size,
                    available,
                });
            }

            let start = entry.offset as usize;
            resources.push(SubResource {
                id: entry.id,
                bytes: self.raw[start..start + entry.size as usize].to_vec(),
            });
        }

        self.resources = Some(resources);
        Ok(())
    }

    /// Overwrite the bytes of one sub-resource.
    pub fn replace(&mut self, id: u32, bytes: Vec<u8>) -> Result<()> {
        let resources = self.resources.as_mut().ok_or(Error::PayloadNotSplit)?;
        match resources.iter_mut().find(|r| r.id == id) {
            Some(resource) => {
                resource.bytes = bytes;
                Ok(())
            }
            None => Err(Error::ResourceNotFound(id)),
        }
    }

    /// Union this section's resources with another's, the other side
    /// winning on ID collision, reordered by ascending ID.
    ///
    /// Both operands must already be split. The merged blob form is empty
    /// and invalid until [`Self::rebuild`] runs; neither operand is
    /// mutated.
    pub fn merge(&self, other: &Self) -> Result<Self> {
        let left = self.resources.as_ref().ok_or_else(|| {
            Error::IncompatibleMerge("left DATA section has not been split".into())
        })?;
        let right = other.resources.as_ref().ok_or_else(|| {
            Error::IncompatibleMerge("right DATA section has not been split".into())
        })?;

        let mut by_id: HashMap<u32, &SubResource> =
            left.iter().map(|r| (r.id, r)).collect();
        for resource in right {
            by_id.insert(resource.id, resource);
        }

        let mut merged: Vec<SubResource> = by_id.into_values().cloned().collect();
        merged.sort_unstable_by_key(|r| r.id);

        Ok(Self {
            raw: Vec::new(),
            resources: Some(merged),
        })
    }

    /// Rebuild the blob form from the split resources.
    ///
    /// Walks the resources in table order, assigns each an offset at the
    /// running cursor, and pads with zeros to the next 16-byte boundary
    /// after every resource except the last. Offsets are relative to the
    /// section content; `start_pos` is where that content begins in the
    /// final file and bounds the section's absolute extent. Returns the
    /// fresh offset table for the index to adopt.
    pub fn rebuild(&mut self, start_pos: u32) -> Result<Vec<IndexEntry>> {
        let resources = self.resources.as_ref().ok_or(Error::PayloadNotSplit)?;

        let mut raw = Vec::new();
        let mut table = Vec::with_capacity(resources.len());

        for (i, resource) in resources.iter().enumerate() {
            let offset = u32::try_from(raw.len())
                .map_err(|_| Error::PayloadTooLarge(raw.len() as u64))?;
            let size = u32::try_from(resource.bytes.len())
                .map_err(|_| Error::PayloadTooLarge(resource.bytes.len() as u64))?;

            table.push(IndexEntry {
                id: resource.id,
                offset,
                size,
            });
            raw.extend_from_slice(&resource.bytes);

            if i + 1 != resources.len() {
                let pad = padding_for(raw.len());
                raw.resize(raw.len() + pad, 0);
            }
        }

        let end = u64::from(start_pos) + raw.len() as u64;
        if end > u64::from(u32::MAX) {
            return Err(Error::PayloadTooLarge(end));
        }

        debug!(
            "rebuilt DATA payload: {} resources, {} bytes at file offset {:#x}",
            resources.len(),
            raw.len(),
            start_pos
        );

        self.raw = raw;
        Ok(table)
    }
}

// Implement BnkFormat trait
use crate::BnkFormat;

impl BnkFormat for DataSection {
    fn parse(data: &[u8]) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        Self::parse(data).map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }

    fn build(&self) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>> {
        Ok(self.build())
    }
}

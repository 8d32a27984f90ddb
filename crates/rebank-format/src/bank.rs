//! Soundbank container aggregating the four sections
//!
//! # Format Structure
//!
//! ```text
//! SoundBank (.bnk)
//! ├── BKHD - Bank header carrying the archive ID    (required)
//! ├── DIDX - Index of sub-resource (id, offset, size) records
//! ├── DATA - Concatenated sub-resource payloads, 16-byte aligned
//! └── HIRC - Object hierarchy (count + opaque object bytes)
//! ```
//!
//! Sections always serialize in the order above. `DIDX` offsets are
//! relative to the first `DATA` payload byte, so they depend on the
//! encoded sizes of everything before the payload; [`SoundBank::correct_offsets`]
//! recomputes them after any structural change.
//!
//! # Example
//!
//! ```no_run
//! use rebank_format::SoundBank;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut bank = SoundBank::load("nms_audio_persistent.bnk")?;
//! println!("archive ID: {:#010x}", bank.id());
//! bank.extract("out", &[], "wem")?;
//! # Ok(())
//! # }
//! ```

use crate::chunk::{
    self, CHUNK_OVERHEAD, TAG_DATA, TAG_HEADER, TAG_HIERARCHY, TAG_INDEX,
};
use crate::data::{DataSection, SubResource};
use crate::error::{Error, Result};
use crate::fnv;
use crate::header::HeaderSection;
use crate::hierarchy::HierarchySection;
use crate::index::{IndexSection, RECORD_LEN};
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File name stem of a bank path, used to derive its archive ID.
pub fn archive_name(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_owned)
        .ok_or_else(|| Error::InvalidPath(path.to_path_buf()))
}

/// One fully decoded soundbank archive.
///
/// Exactly the sections present in the source file are present after a
/// load. The header is mandatory; the rest are optional (a bank that only
/// streams audio carries no in-bank payload).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoundBank {
    header: HeaderSection,
    index: Option<IndexSection>,
    data: Option<DataSection>,
    hierarchy: Option<HierarchySection>,
}

impl SoundBank {
    /// Parse a soundbank from bytes.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(data);
        Self::parse_from_reader(&mut cursor)
    }

    /// Parse a soundbank from a reader.
    ///
    /// Chunks are consumed until end of stream; unrecognized tags are
    /// logged and skipped. When both index and payload are present the
    /// payload is split into sub-resources immediately.
    pub fn parse_from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        let mut header = None;
        let mut index = None;
        let mut data: Option<DataSection> = None;
        let mut hierarchy = None;

        while let Some(chunk) = chunk::read_chunk(reader)? {
            debug!(
                "chunk '{}' ({} bytes)",
                chunk.tag_display(),
                chunk.payload.len()
            );
            match chunk.tag {
                TAG_HEADER => header = Some(HeaderSection::parse(&chunk.payload)?),
                TAG_INDEX => index = Some(IndexSection::parse(&chunk.payload)?),
                TAG_DATA => data = Some(DataSection::parse(&chunk.payload)?),
                TAG_HIERARCHY => hierarchy = Some(HierarchySection::parse(&chunk.payload)?),
                _ => {
                    warn!(
                        "skipping unknown chunk '{}' ({} bytes)",
                        chunk.tag_display(),
                        chunk.payload.len()
                    );
                }
            }
        }

        if let (Some(index), Some(data)) = (index.as_ref(), data.as_mut()) {
            data.split(index)?;
        }

        let header = header.ok_or(Error::MissingHeader)?;
        Ok(Self {
            header,
            index,
            data,
            hierarchy,
        })
    }

    /// Load a soundbank from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        debug!("loaded {} bytes from {}", bytes.len(), path.display());
        Self::parse(&bytes)
    }

    /// Assemble a bank from loose parts.
    ///
    /// Resources are reordered by ascending ID, a fresh header is
    /// synthesized with a placeholder ID, and offsets are computed
    /// immediately. A bank assembled without resources carries no index
    /// or payload section; the hierarchy section is omitted when
    /// `hierarchy` is `None`.
    pub fn assemble(
        mut resources: Vec<SubResource>,
        hierarchy: Option<HierarchySection>,
    ) -> Result<Self> {
        resources.sort_unstable_by_key(|r| r.id);

        let (index, data) = if resources.is_empty() {
            (None, None)
        } else {
            (
                Some(IndexSection::default()),
                Some(DataSection::from_resources(resources)),
            )
        };

        let mut bank = Self {
            header: HeaderSection::synthesize(),
            index,
            data,
            hierarchy,
        };
        bank.correct_offsets()?;
        Ok(bank)
    }

    /// Encode the bank to bytes, sections in fixed order, absent sections
    /// omitted.
    pub fn build(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        chunk::write_chunk(&mut out, TAG_HEADER, self.header.payload())?;
        if let Some(index) = &self.index {
            chunk::write_chunk(&mut out, TAG_INDEX, &index.build()?)?;
        }
        if let Some(data) = &self.data {
            chunk::write_chunk(&mut out, TAG_DATA, data.raw())?;
        }
        if let Some(hierarchy) = &self.hierarchy {
            chunk::write_chunk(&mut out, TAG_HIERARCHY, &hierarchy.build())?;
        }
        Ok(out)
    }

    /// Save the bank to a file.
    ///
    /// The archive ID is rewritten first, derived from the destination
    /// file name stem, so the bank self-identifies under its new name.
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let name = archive_name(path)?;
        self.header.set_id(fnv::fnv1(&name));

        let encoded = self.build()?;
        fs::write(path, &encoded)?;
        debug!("saved {} bytes to {}", encoded.len(), path.display());
        Ok(())
    }

    /// The archive ID stored in the header.
    pub fn id(&self) -> u32 {
        self.header.id()
    }

    /// The bank header.
    pub fn header(&self) -> &HeaderSection {
        &self.header
    }

    /// The index section, if present.
    pub fn index(&self) -> Option<&IndexSection> {
        self.index.as_ref()
    }

    /// The payload section, if present.
    pub fn data(&self) -> Option<&DataSection> {
        self.data.as_ref()
    }

    /// The hierarchy section, if present.
    pub fn hierarchy(&self) -> Option<&HierarchySection> {
        self.hierarchy.as_ref()
    }

    /// The split sub-resources, if the bank carries a split payload.
    pub fn resources(&self) -> Option<&[SubResource]> {
        self.data.as_ref().and_then(DataSection::resources)
    }

    /// Write sub-resources to `output_dir`, one file per resource named
    /// `<id>.<extension>`. An empty `ids` slice extracts everything.
    /// Returns the written paths in extraction order.
    pub fn extract(
        &mut self,
        output_dir: impl AsRef<Path>,
        ids: &[u32],
        extension: &str,
    ) -> Result<Vec<PathBuf>> {
        let output_dir = output_dir.as_ref();

        if let (Some(index), Some(data)) = (self.index.as_ref(), self.data.as_mut())
            && !data.is_split()
        {
            data.split(index)?;
        }
        let resources = self
            .data
            .as_ref()
            .and_then(DataSection::resources)
            .unwrap_or_default();

        fs::create_dir_all(output_dir)?;
        let mut written = Vec::new();
        if ids.is_empty() {
            for resource in resources {
                written.push(write_resource(output_dir, resource, extension)?);
            }
        } else {
            for &id in ids {
                let resource = resources
                    .iter()
                    .find(|r| r.id == id)
                    .ok_or(Error::ResourceNotFound(id))?;
                written.push(write_resource(output_dir, resource, extension)?);
            }
        }

        debug!("extracted {} resources to {}", written.len(), output_dir.display());
        Ok(written)
    }

    /// Write the index, payload, and hierarchy sections verbatim in chunk
    /// form to `<output_dir>/<name>.didx`, `.data`, and `.hirc`.
    ///
    /// No splitting happens; this round-trips the payload bytes unchanged
    /// and is the fast path when only the hierarchy will be edited.
    pub fn extract_bulk(
        &self,
        output_dir: impl AsRef<Path>,
        name: &str,
    ) -> Result<Vec<PathBuf>> {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir)?;

        let mut written = Vec::new();
        if let Some(index) = &self.index {
            written.push(write_section_chunk(
                output_dir,
                name,
                "didx",
                TAG_INDEX,
                &index.build()?,
            )?);
        }
        if let Some(data) = &self.data {
            written.push(write_section_chunk(
                output_dir,
                name,
                "data",
                TAG_DATA,
                data.raw(),
            )?);
        }
        if let Some(hierarchy) = &self.hierarchy {
            written.push(write_section_chunk(
                output_dir,
                name,
                "hirc",
                TAG_HIERARCHY,
                &hierarchy.build(),
            )?);
        }
        Ok(written)
    }

    /// Overwrite the bytes of one sub-resource.
    ///
    /// The payload stays stale until [`Self::correct_offsets`] rebuilds
    /// it, so call that before saving.
    pub fn replace(&mut self, id: u32, bytes: Vec<u8>) -> Result<()> {
        self.data
            .as_mut()
            .ok_or(Error::PayloadNotSplit)?
            .replace(id, bytes)
    }

    /// Combine two banks into a new one, leaving both operands untouched.
    ///
    /// The left header is kept. Index and payload union with the right
    /// side winning on ID collision; a section present on only one side
    /// carries over as-is. Hierarchies concatenate, and at least one side
    /// must have one. Offsets are recomputed before returning.
    pub fn merge(a: &Self, b: &Self) -> Result<Self> {
        let index = match (&a.index, &b.index) {
            (Some(left), Some(right)) => Some(left.merge(right)),
            (Some(left), None) => Some(left.clone()),
            (None, Some(right)) => Some(right.clone()),
            (None, None) => None,
        };
        let data = match (&a.data, &b.data) {
            (Some(left), Some(right)) => Some(left.merge(right)?),
            (Some(left), None) => Some(left.clone()),
            (None, Some(right)) => Some(right.clone()),
            (None, None) => None,
        };
        let hierarchy = match (&a.hierarchy, &b.hierarchy) {
            (Some(left), Some(right)) => Some(left.merge(right)),
            (Some(left), None) => Some(left.clone()),
            (None, Some(right)) => Some(right.clone()),
            (None, None) => {
                return Err(Error::IncompatibleMerge(
                    "neither bank carries a hierarchy section".into(),
                ));
            }
        };

        let mut merged = Self {
            header: a.header.clone(),
            index,
            data,
            hierarchy,
        };
        merged.correct_offsets()?;
        Ok(merged)
    }

    /// Rebuild the payload blob and rewrite the index offsets against it.
    ///
    /// The first payload byte lands at `8 + header len + 8 + index len + 8`
    /// in the encoded file; that position anchors and bounds the payload
    /// extent while the stored offsets stay relative to the payload start.
    /// Does nothing when the bank has no index or no payload.
    pub fn correct_offsets(&mut self) -> Result<()> {
        let (Some(index), Some(data)) = (self.index.as_mut(), self.data.as_mut()) else {
            debug!("no index/payload pair, offsets left untouched");
            return Ok(());
        };

        // The rebuilt index carries one record per resource
        let record_count = data.resources().map_or(index.len(), <[SubResource]>::len);
        let prefix = CHUNK_OVERHEAD
            + self.header.payload().len()
            + CHUNK_OVERHEAD
            + record_count * RECORD_LEN
            + CHUNK_OVERHEAD;
        let start_pos =
            u32::try_from(prefix).map_err(|_| Error::PayloadTooLarge(prefix as u64))?;

        let table = data.rebuild(start_pos)?;
        index.adopt_offsets(table);
        Ok(())
    }
}

// Implement BnkFormat trait
use crate::BnkFormat;

impl BnkFormat for SoundBank {
    fn parse(data: &[u8]) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        Self::parse(data).map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }

    fn build(&self) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>> {
        self.build()
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error>)
    }
}

fn write_resource(dir: &Path, resource: &SubResource, extension: &str) -> Result<PathBuf> {
    let path = dir.join(format!("{}.{}", resource.id, extension));
    fs::write(&path, &resource.bytes)?;
    Ok(path)
}

fn write_section_chunk(
    dir: &Path,
    name: &str,
    extension: &str,
    tag: [u8; 4],
    payload: &[u8],
) -> Result<PathBuf> {
    let path = dir.join(format!("{name}.{extension}"));
    let mut out = Vec::with_capacity(CHUNK_OVERHEAD + payload.len());
    chunk::write_chunk(&mut out, tag, payload)?;
    fs::write(&path, &out)?;
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::index::IndexEntry;
    use pretty_assertions::assert_eq;

    /// Header + index [(100, 0, 4), (200, 16, 3)] + padded payload +
    /// hierarchy {count: 1, 4 blob bytes}.
    fn fixture_bytes() -> Vec<u8> {
        let mut index_payload = Vec::new();
        for entry in [(100u32, 0u32, 4u32), (200, 16, 3)] {
            index_payload.extend_from_slice(&entry.0.to_le_bytes());
            index_payload.extend_from_slice(&entry.1.to_le_bytes());
            index_payload.extend_from_slice(&entry.2.to_le_bytes());
        }

        let mut data_payload = vec![0x01, 0x02, 0x03, 0x04];
        data_payload.resize(16, 0);
        data_payload.extend_from_slice(&[0xAA, 0xBB, 0xCC]);

        let mut hirc_payload = 1u32.to_le_bytes().to_vec();
        hirc_payload.extend_from_slice(&[0x10, 0x20, 0x30, 0x40]);

        let mut out = Vec::new();
        chunk::write_chunk(&mut out, TAG_HEADER, HeaderSection::synthesize().payload())
            .expect("write should succeed");
        chunk::write_chunk(&mut out, TAG_INDEX, &index_payload).expect("write should succeed");
        chunk::write_chunk(&mut out, TAG_DATA, &data_payload).expect("write should succeed");
        chunk::write_chunk(&mut out, TAG_HIERARCHY, &hirc_payload)
            .expect("write should succeed");
        out
    }

    #[test]
    fn parse_dispatches_and_splits() {
        let bank = SoundBank::parse(&fixture_bytes()).expect("parse should succeed");

        assert_eq!(bank.index().expect("index present").len(), 2);
        assert_eq!(bank.hierarchy().expect("hierarchy present").entry_count(), 1);

        let resources = bank.resources().expect("payload should be split");
        assert_eq!(resources[0].id, 100);
        assert_eq!(resources[0].bytes, vec![0x01, 0x02, 0x03, 0x04]);
        assert_eq!(resources[1].id, 200);
        assert_eq!(resources[1].bytes, vec![0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn parse_skips_unknown_chunks() {
        let mut bytes = fixture_bytes();
        chunk::write_chunk(&mut bytes, *b"JUNK", &[0xFF; 9]).expect("write should succeed");

        let bank = SoundBank::parse(&bytes).expect("parse should succeed");
        assert_eq!(bank.resources().expect("split").len(), 2);
    }

    #[test]
    fn parse_requires_header() {
        let mut bytes = Vec::new();
        chunk::write_chunk(&mut bytes, TAG_INDEX, &[]).expect("write should succeed");

        let result = SoundBank::parse(&bytes);
        assert!(matches!(result, Err(Error::MissingHeader)));
    }

    #[test]
    fn parse_without_index_leaves_payload_unsplit() {
        let mut bytes = Vec::new();
        chunk::write_chunk(&mut bytes, TAG_HEADER, HeaderSection::synthesize().payload())
            .expect("write should succeed");
        chunk::write_chunk(&mut bytes, TAG_DATA, &[1, 2, 3]).expect("write should succeed");

        let bank = SoundBank::parse(&bytes).expect("parse should succeed");
        assert!(bank.resources().is_none());
        assert!(!bank.data().expect("payload present").is_split());
    }

    #[test]
    fn build_round_trips_sections() {
        let bank = SoundBank::parse(&fixture_bytes()).expect("parse should succeed");
        let rebuilt = bank.build().expect("build should succeed");
        assert_eq!(rebuilt, fixture_bytes());
    }

    #[test]
    fn assemble_sorts_resources_by_id() {
        let bank = SoundBank::assemble(
            vec![
                SubResource::new(500, vec![0x05; 3]),
                SubResource::new(10, vec![0x01; 20]),
            ],
            None,
        )
        .expect("assemble should succeed");

        let ids: Vec<u32> = bank
            .index()
            .expect("index present")
            .entries()
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![10, 500]);
        assert!(bank.hierarchy().is_none());
    }

    #[test]
    fn assemble_without_resources_omits_index_and_payload() {
        let bank = SoundBank::assemble(Vec::new(), Some(HierarchySection::new(1, vec![0x01])))
            .expect("assemble should succeed");

        assert!(bank.index().is_none());
        assert!(bank.data().is_none());
        assert_eq!(
            bank.hierarchy().expect("hierarchy present").entry_count(),
            1
        );
    }

    #[test]
    fn correct_offsets_anchors_payload_at_computed_position() {
        let bank = SoundBank::assemble(
            vec![
                SubResource::new(1, vec![0x11; 5]),
                SubResource::new(2, vec![0x22; 7]),
            ],
            None,
        )
        .expect("assemble should succeed");

        let entries = bank.index().expect("index present").entries().to_vec();
        assert_eq!(entries[0], IndexEntry { id: 1, offset: 0, size: 5 });
        assert_eq!(entries[1], IndexEntry { id: 2, offset: 16, size: 7 });

        // First payload byte sits exactly at the anchor position
        let encoded = bank.build().expect("build should succeed");
        let start_pos = 8 + bank.header().payload().len() + 8 + 2 * RECORD_LEN + 8;
        assert_eq!(encoded[start_pos], 0x11);
    }

    #[test]
    fn merge_unions_ids_with_right_side_winning() {
        let a = SoundBank::assemble(
            vec![
                SubResource::new(1, vec![0xA1; 4]),
                SubResource::new(2, vec![0xA2; 4]),
            ],
            Some(HierarchySection::new(2, vec![0x01, 0x02])),
        )
        .expect("assemble should succeed");
        let b = SoundBank::assemble(
            vec![
                SubResource::new(2, vec![0xB2; 6]),
                SubResource::new(3, vec![0xB3; 4]),
            ],
            Some(HierarchySection::new(1, vec![0x03])),
        )
        .expect("assemble should succeed");

        let merged = SoundBank::merge(&a, &b).expect("merge should succeed");

        let ids: Vec<u32> = merged
            .index()
            .expect("index present")
            .entries()
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let resources = merged.resources().expect("split");
        assert_eq!(resources[1].bytes, vec![0xB2; 6]);

        let hierarchy = merged.hierarchy().expect("hierarchy present");
        assert_eq!(hierarchy.entry_count(), 3);
        assert_eq!(hierarchy.objects(), &[0x01, 0x02, 0x03]);

        // Offsets were recomputed against the merged payload
        let entries = merged.index().expect("index present").entries();
        assert_eq!(entries[0].offset, 0);
        assert_eq!(entries[1].offset, 16);
        assert_eq!(entries[2].offset, 32);

        // Operands are untouched
        assert_eq!(a.resources().expect("split")[1].bytes, vec![0xA2; 4]);
    }

    #[test]
    fn merge_requires_a_hierarchy_somewhere() {
        let a = SoundBank::assemble(vec![SubResource::new(1, vec![1])], None)
            .expect("assemble should succeed");
        let b = SoundBank::assemble(vec![SubResource::new(2, vec![2])], None)
            .expect("assemble should succeed");

        let result = SoundBank::merge(&a, &b);
        assert!(matches!(result, Err(Error::IncompatibleMerge(_))));
    }

    #[test]
    fn merge_propagates_one_sided_sections() {
        let mut hierarchy_only = Vec::new();
        chunk::write_chunk(
            &mut hierarchy_only,
            TAG_HEADER,
            HeaderSection::synthesize().payload(),
        )
        .expect("write should succeed");
        let mut hirc_payload = 2u32.to_le_bytes().to_vec();
        hirc_payload.extend_from_slice(&[0xEE]);
        chunk::write_chunk(&mut hierarchy_only, TAG_HIERARCHY, &hirc_payload)
            .expect("write should succeed");
        let a = SoundBank::parse(&hierarchy_only).expect("parse should succeed");

        let b = SoundBank::parse(&fixture_bytes()).expect("parse should succeed");

        let merged = SoundBank::merge(&a, &b).expect("merge should succeed");
        assert_eq!(merged.resources().expect("split").len(), 2);
        assert_eq!(merged.hierarchy().expect("hierarchy present").entry_count(), 3);
    }

    #[test]
    fn replace_then_correct_offsets_rebuilds_payload() {
        let mut bank = SoundBank::parse(&fixture_bytes()).expect("parse should succeed");

        bank.replace(200, vec![0xEE; 20]).expect("replace should succeed");
        bank.correct_offsets().expect("correct_offsets should succeed");

        let entries = bank.index().expect("index present").entries();
        assert_eq!(entries[1], IndexEntry { id: 200, offset: 16, size: 20 });
        let data = bank.data().expect("payload present");
        assert_eq!(&data.raw()[16..], &[0xEE; 20]);
    }

    #[test]
    fn replace_missing_id() {
        let mut bank = SoundBank::parse(&fixture_bytes()).expect("parse should succeed");
        let result = bank.replace(999, vec![0]);
        assert!(matches!(result, Err(Error::ResourceNotFound(999))));
    }

    #[test]
    fn replace_without_payload() {
        let mut bytes = Vec::new();
        chunk::write_chunk(&mut bytes, TAG_HEADER, HeaderSection::synthesize().payload())
            .expect("write should succeed");
        let mut bank = SoundBank::parse(&bytes).expect("parse should succeed");

        let result = bank.replace(1, vec![0]);
        assert!(matches!(result, Err(Error::PayloadNotSplit)));
    }

    #[test]
    fn archive_name_strips_directory_and_extension() {
        assert_eq!(
            archive_name(Path::new("/tmp/banks/bank.bnk")).expect("name should parse"),
            "bank"
        );
        assert_eq!(
            archive_name(Path::new("noext")).expect("name should parse"),
            "noext"
        );
        assert!(matches!(
            archive_name(Path::new("")),
            Err(Error::InvalidPath(_))
        ));
    }
}

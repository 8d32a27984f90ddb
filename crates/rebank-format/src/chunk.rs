//! Chunk framing for soundbank containers
//!
//! Every section of a soundbank is wrapped in the same envelope:
//!
//! ```text
//! Chunk:
//! ├── Tag (4 bytes, ASCII for all known sections)
//! ├── Length (u32, little-endian)
//! └── Payload (length bytes)
//! ```
//!
//! Chunks repeat back to back until the end of the file. A clean end of
//! archive and a truncated trailing chunk are indistinguishable at this
//! layer: [`read_chunk`] reports both as `Ok(None)` and callers treat that
//! as "archive consumed".

use crate::error::{Error, Result};
use std::io::{ErrorKind, Read, Write};

/// `BKHD` header section tag
pub const TAG_HEADER: [u8; 4] = *b"BKHD";
/// `DIDX` index section tag
pub const TAG_INDEX: [u8; 4] = *b"DIDX";
/// `DATA` payload section tag
pub const TAG_DATA: [u8; 4] = *b"DATA";
/// `HIRC` hierarchy section tag
pub const TAG_HIERARCHY: [u8; 4] = *b"HIRC";

/// Chunk envelope overhead: 4 tag bytes plus the u32 length field.
pub const CHUNK_OVERHEAD: usize = 8;

/// One tag + payload framing unit read from a container stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 4-byte section tag, ASCII for all known sections
    pub tag: [u8; 4],
    /// Raw section payload
    pub payload: Vec<u8>,
}

impl Chunk {
    /// Create a chunk from a tag and payload.
    pub fn new(tag: [u8; 4], payload: Vec<u8>) -> Self {
        Self { tag, payload }
    }

    /// Tag rendered for log and error messages.
    pub fn tag_display(&self) -> String {
        String::from_utf8_lossy(&self.tag).into_owned()
    }
}

/// Read the next chunk from a stream.
///
/// Returns `Ok(None)` once the stream cannot supply a complete chunk,
/// whether the boundary is clean or the final chunk is truncated. IO
/// failures other than end-of-stream are propagated.
pub fn read_chunk<R: Read>(reader: &mut R) -> Result<Option<Chunk>> {
    let mut tag = [0u8; 4];
    if !read_exact_or_eof(reader, &mut tag)? {
        return Ok(None);
    }

    let mut len_buf = [0u8; 4];
    if !read_exact_or_eof(reader, &mut len_buf)? {
        return Ok(None);
    }
    let length = u32::from_le_bytes(len_buf);

    // Size the buffer from the stream, not the declared length.
    let mut payload = Vec::new();
    let copied = reader
        .by_ref()
        .take(u64::from(length))
        .read_to_end(&mut payload)?;
    if copied < length as usize {
        return Ok(None);
    }

    Ok(Some(Chunk { tag, payload }))
}

/// Write one chunk: tag, little-endian length, payload.
pub fn write_chunk<W: Write>(writer: &mut W, tag: [u8; 4], payload: &[u8]) -> Result<()> {
    let length = u32::try_from(payload.len())
        .map_err(|_| Error::PayloadTooLarge(payload.len() as u64))?;

    writer.write_all(&tag)?;
    writer.write_all(&length.to_le_bytes())?;
    writer.write_all(payload)?;
    Ok(())
}

/// Fill `buf` completely, reporting a short stream as `Ok(false)`.
fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<bool> {
    match reader.read_exact(buf) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(false),
        Err(e) => Err(e.into()),
    }
}

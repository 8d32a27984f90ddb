//! Parser and builder for Wwise soundbank (.bnk) containers
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
//! This crate provides symmetric (parser and builder) implementations for
//! the chunked soundbank container format: archives bundling audio
//! sub-resources and auxiliary metadata into a single `.bnk` file.
//!
//! # Supported Sections
//!
//! - **BKHD**: Bank header carrying the 32-bit archive ID
//! - **DIDX**: Data index mapping sub-resource IDs to payload ranges
//! - **DATA**: Concatenated sub-resource payloads, 16-byte aligned
//! - **HIRC**: Object hierarchy, carried opaquely apart from its count
//!
//! # Design Principles
//!
//! Every section implementation follows these principles:
//! - **Symmetric Operations**: Both parsing and building supported
//! - **Type Safety**: Use Rust's type system to enforce invariants
//! - **Round-Trip Guarantee**: parse(build(data)) == data
//! - **Pure Merges**: Combining two banks never mutates either operand

#![warn(missing_docs)]

/// Soundbank container aggregating the four sections
///
/// This module owns loading, saving, extraction, merging, and the offset
/// recomputation that keeps the index consistent with the payload.
pub mod bank;
/// Chunk framing: the `(tag, length, payload)` envelope every section
/// uses on disk
pub mod chunk;
/// `DATA` payload section and sub-resource splitting
pub mod data;
/// Error types for soundbank parsing and building
pub mod error;
/// FNV-1 hash used to derive archive IDs from names
pub mod fnv;
/// `BKHD` bank header section
pub mod header;
/// `HIRC` object hierarchy section
pub mod hierarchy;
/// `DIDX` index section
pub mod index;

pub use bank::{SoundBank, archive_name};
pub use data::{DataSection, SubResource};
pub use error::{Error, Result};
pub use fnv::fnv1;
pub use header::HeaderSection;
pub use hierarchy::HierarchySection;
pub use index::{IndexEntry, IndexSection};

/// Common format trait that all sections and the bank implement
pub trait BnkFormat: Sized {
    /// Parse from bytes
    fn parse(data: &[u8]) -> std::result::Result<Self, Box<dyn std::error::Error>>;

    /// Build to bytes
    fn build(&self) -> std::result::Result<Vec<u8>, Box<dyn std::error::Error>>;

    /// Verify round-trip correctness
    fn verify_round_trip(data: &[u8]) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let parsed = Self::parse(data)?;
        let rebuilt = parsed.build()?;
        if data != rebuilt.as_slice() {
            return Err("Round-trip verification failed".into());
        }
        Ok(())
    }
}

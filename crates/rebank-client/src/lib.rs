//! Soundbank client library
//!
//! This library provides the core functionality for the rebank CLI tool.

pub mod commands;
pub mod output;

// Re-export command handlers
pub use crate::commands::{
    extract::handle as handle_extract, hash::handle as handle_hash,
    info::handle as handle_info, merge::handle as handle_merge, pack::handle as handle_pack,
    replace::handle as handle_replace,
};

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Show the sections and resources of a bank
    Info {
        /// Path to the .bnk file
        bank: PathBuf,
    },

    /// Extract sub-resources or whole sections from a bank
    Extract {
        /// Path to the .bnk file
        bank: PathBuf,

        /// Output directory
        #[arg(long, default_value = ".")]
        output: PathBuf,

        /// Resource IDs to extract (omit to extract everything)
        #[arg(short, long, value_delimiter = ',')]
        ids: Vec<u32>,

        /// File extension for extracted resources
        #[arg(short, long, default_value = "wem")]
        extension: String,

        /// Copy the index, payload, and hierarchy sections verbatim
        /// instead of splitting out resources
        #[arg(short, long)]
        bulk: bool,
    },

    /// Build a bank from a directory of extracted files
    Pack {
        /// Directory holding numbered resource files and optional .hirc sections
        input: PathBuf,

        /// Path of the bank to write
        #[arg(long)]
        output: PathBuf,

        /// File extension of resource files to pick up
        #[arg(short, long, default_value = "wem")]
        extension: String,
    },

    /// Replace one sub-resource and rewrite the bank
    Replace {
        /// Path to the .bnk file
        bank: PathBuf,

        /// Resource ID to replace
        id: u32,

        /// File holding the replacement bytes
        file: PathBuf,

        /// Write the result here instead of overwriting in place
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Merge two banks into one
    Merge {
        /// Left bank (its header carries over)
        left: PathBuf,

        /// Right bank (its resources win on ID collision)
        right: PathBuf,

        /// Path of the merged bank to write
        #[arg(long)]
        output: PathBuf,
    },

    /// Hash a name the way archive IDs are derived
    Hash {
        /// Name to hash (case-insensitive)
        name: String,
    },
}

/// Output format options for the CLI
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    /// Plain text output
    Text,
    /// JSON output
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

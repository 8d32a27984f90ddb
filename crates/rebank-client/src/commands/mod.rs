//! Command handlers for the rebank CLI

pub mod extract;
pub mod hash;
pub mod info;
pub mod merge;
pub mod pack;
pub mod replace;

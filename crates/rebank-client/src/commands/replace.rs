//! Replace one sub-resource and rewrite the bank

use rebank_format::SoundBank;
use std::fs;
use std::path::Path;
use tracing::info;

pub fn handle(
    bank_path: &Path,
    id: u32,
    file: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut bank = SoundBank::load(bank_path)?;
    let bytes = fs::read(file)?;
    let byte_count = bytes.len();

    bank.replace(id, bytes)?;
    bank.correct_offsets()?;

    let destination = output.unwrap_or(bank_path);
    bank.save(destination)?;

    info!("resource {} now carries {} bytes", id, byte_count);
    println!("Replaced resource {} in {}", id, destination.display());
    Ok(())
}

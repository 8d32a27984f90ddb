//! Merge two banks into one

use rebank_format::SoundBank;
use std::path::Path;
use tracing::info;

pub fn handle(
    left: &Path,
    right: &Path,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let a = SoundBank::load(left)?;
    let b = SoundBank::load(right)?;

    let mut merged = SoundBank::merge(&a, &b)?;
    merged.save(output)?;

    let resource_count = merged.resources().map_or(0, |resources| resources.len());
    let hierarchy_entries = merged
        .hierarchy()
        .map_or(0, rebank_format::HierarchySection::entry_count);
    info!(
        "merged {} + {} -> {} resources, {} hierarchy entries",
        left.display(),
        right.display(),
        resource_count,
        hierarchy_entries
    );
    println!(
        "Merged {} resources into {}",
        resource_count,
        output.display()
    );
    Ok(())
}

//! Extract sub-resources or whole sections from a bank

use indicatif::{ProgressBar, ProgressStyle};
use rebank_format::{SoundBank, SubResource, archive_name};
use std::fs;
use std::path::Path;
use tracing::info;

pub fn handle(
    bank_path: &Path,
    output_dir: &Path,
    ids: &[u32],
    extension: &str,
    bulk: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let bank = SoundBank::load(bank_path)?;

    if bulk {
        let name = archive_name(bank_path)?;
        let written = bank.extract_bulk(output_dir, &name)?;
        for path in &written {
            info!("wrote {}", path.display());
        }
        println!(
            "Exported {} sections to {}",
            written.len(),
            output_dir.display()
        );
        return Ok(());
    }

    let resources = bank
        .resources()
        .ok_or("bank has no splittable payload (missing DIDX or DATA section)")?;

    // Resolve the work list up front so a bad ID fails before any file is written
    let selected: Vec<&SubResource> = if ids.is_empty() {
        resources.iter().collect()
    } else {
        ids.iter()
            .map(|&id| {
                resources.iter().find(|r| r.id == id).ok_or_else(|| {
                    format!("resource {id} not found in {}", bank_path.display())
                })
            })
            .collect::<Result<_, _>>()?
    };

    fs::create_dir_all(output_dir)?;
    let pb = ProgressBar::new(selected.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    for resource in &selected {
        let path = output_dir.join(format!("{}.{}", resource.id, extension));
        fs::write(&path, &resource.bytes)?;
        pb.inc(1);
    }
    pb.finish_and_clear();

    println!(
        "Extracted {} resources to {}",
        selected.len(),
        output_dir.display()
    );
    Ok(())
}

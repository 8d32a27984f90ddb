//! Build a bank from a directory of extracted files

use indicatif::{ProgressBar, ProgressStyle};
use rebank_format::chunk::{self, TAG_HIERARCHY};
use rebank_format::{HierarchySection, SoundBank, SubResource};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

pub fn handle(
    input: &Path,
    output: &Path,
    extension: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut resource_paths = Vec::new();
    let mut hierarchy_paths = Vec::new();

    for entry in WalkDir::new(input).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case(extension) => {
                resource_paths.push(path.to_path_buf());
            }
            Some("hirc") => hierarchy_paths.push(path.to_path_buf()),
            _ => debug!("ignoring {}", path.display()),
        }
    }

    if resource_paths.is_empty() && hierarchy_paths.is_empty() {
        return Err(format!(
            "no .{extension} or .hirc files found in {}",
            input.display()
        )
        .into());
    }

    // Deterministic build regardless of directory iteration order
    resource_paths.sort();
    hierarchy_paths.sort();

    let pb = ProgressBar::new(resource_paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut resources = Vec::with_capacity(resource_paths.len());
    for path in &resource_paths {
        let Some(id) = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .and_then(|stem| stem.parse::<u32>().ok())
        else {
            warn!(
                "skipping {}: file stem is not a numeric resource ID",
                path.display()
            );
            pb.inc(1);
            continue;
        };
        resources.push(SubResource::new(id, fs::read(path)?));
        pb.inc(1);
    }
    pb.finish_and_clear();

    let hierarchy = read_hierarchies(&hierarchy_paths)?;

    let resource_count = resources.len();
    let mut bank = SoundBank::assemble(resources, hierarchy)?;
    bank.save(output)?;

    println!(
        "Packed {} resources into {}",
        resource_count,
        output.display()
    );
    Ok(())
}

/// Read `.hirc` section files (chunk form) and fold them into one
/// hierarchy, left to right in path order.
fn read_hierarchies(
    paths: &[PathBuf],
) -> Result<Option<HierarchySection>, Box<dyn std::error::Error>> {
    let mut combined: Option<HierarchySection> = None;

    for path in paths {
        let bytes = fs::read(path)?;
        let mut cursor = Cursor::new(bytes.as_slice());
        let Some(section_chunk) = chunk::read_chunk(&mut cursor)? else {
            return Err(format!("{} holds no chunk", path.display()).into());
        };
        if section_chunk.tag != TAG_HIERARCHY {
            return Err(format!(
                "{} holds a '{}' chunk, expected HIRC",
                path.display(),
                section_chunk.tag_display()
            )
            .into());
        }

        let section = HierarchySection::parse(&section_chunk.payload)?;
        combined = Some(match combined {
            Some(existing) => existing.merge(&section),
            None => section,
        });
    }

    Ok(combined)
}

//! Show the sections and resources of a bank

use crate::OutputFormat;
use crate::output::{
    OutputStyle, create_table, format_count_badge, format_key_value, hash_cell, header_cell,
    numeric_cell,
};
use rebank_format::SoundBank;
use std::path::Path;

pub fn handle(bank_path: &Path, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let bank = SoundBank::load(bank_path)?;

    match format {
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let resources: Vec<serde_json::Value> = bank
                .index()
                .map(|index| {
                    index
                        .entries()
                        .iter()
                        .map(|entry| {
                            serde_json::json!({
                                "id": entry.id,
                                "offset": entry.offset,
                                "size": entry.size,
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();

            let value = serde_json::json!({
                "file": bank_path.display().to_string(),
                "archive_id": format!("{:#010x}", bank.id()),
                "header_bytes": bank.header().payload().len(),
                "index_entries": bank.index().map(rebank_format::IndexSection::len),
                "payload_bytes": bank.data().map(|data| data.raw().len()),
                "hierarchy_entries": bank.hierarchy().map(rebank_format::HierarchySection::entry_count),
                "resources": resources,
            });
            let output = if matches!(format, OutputFormat::JsonPretty) {
                serde_json::to_string_pretty(&value)?
            } else {
                serde_json::to_string(&value)?
            };
            println!("{output}");
        }
        _ => {
            let style = OutputStyle::new();

            println!(
                "{}",
                format_key_value("Bank", &bank_path.display().to_string(), &style)
            );
            println!(
                "{}",
                format_key_value("Archive ID", &format!("{:#010x}", bank.id()), &style)
            );
            println!(
                "{}",
                format_key_value(
                    "Header",
                    &format!("{} bytes", bank.header().payload().len()),
                    &style
                )
            );
            let index_summary = bank.index().map_or_else(
                || "absent".to_string(),
                |index| format!("{} records", index.len()),
            );
            println!("{}", format_key_value("Index", &index_summary, &style));
            let payload_summary = bank.data().map_or_else(
                || "absent".to_string(),
                |data| format!("{} bytes", data.raw().len()),
            );
            println!("{}", format_key_value("Payload", &payload_summary, &style));
            let hierarchy_summary = bank.hierarchy().map_or_else(
                || "absent".to_string(),
                |hierarchy| {
                    format!(
                        "{} entries, {} object bytes",
                        hierarchy.entry_count(),
                        hierarchy.objects().len()
                    )
                },
            );
            println!(
                "{}",
                format_key_value("Hierarchy", &hierarchy_summary, &style)
            );

            if let Some(index) = bank.index() {
                println!();
                println!(
                    "Resources {}",
                    format_count_badge(index.len(), "resource", &style)
                );

                let mut table = create_table(&style);
                table.set_header(vec![
                    header_cell("ID", &style),
                    header_cell("Offset", &style),
                    header_cell("Size", &style),
                ]);
                for entry in index.entries() {
                    table.add_row(vec![
                        hash_cell(&entry.id.to_string(), &style),
                        numeric_cell(&entry.offset.to_string()),
                        numeric_cell(&entry.size.to_string()),
                    ]);
                }
                println!("{table}");
            }
        }
    }

    Ok(())
}

//! Hash names into archive IDs

use crate::OutputFormat;
use rebank_format::fnv1;

pub fn handle(name: &str, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
    let id = fnv1(name);

    match format {
        OutputFormat::Json | OutputFormat::JsonPretty => {
            let value = serde_json::json!({
                "name": name,
                "id": id,
                "hex": format!("{id:#010x}"),
            });
            let output = if matches!(format, OutputFormat::JsonPretty) {
                serde_json::to_string_pretty(&value)?
            } else {
                serde_json::to_string(&value)?
            };
            println!("{output}");
        }
        _ => println!("{id} ({id:#010x})"),
    }

    Ok(())
}

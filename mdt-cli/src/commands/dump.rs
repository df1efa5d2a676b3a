use anyhow::{Context, Result};
use std::fs;
use tracing::info;

pub fn execute(input: &str, output: Option<&str>, strict: bool) -> Result<()> {
    let container = crate::load(input, strict)?;

    info!(
        "Decoded {} frames ({} faulted)",
        container.frames.len(),
        container.faulted().count()
    );

    let json = serde_json::to_string_pretty(&container)
        .with_context(|| "Failed to serialize decoded container")?;

    if let Some(output_path) = output {
        fs::write(output_path, json)
            .with_context(|| format!("Failed to write output file: {}", output_path))?;

        info!("Container written to: {}", output_path);
    } else {
        println!("{}", json);
    }

    Ok(())
}

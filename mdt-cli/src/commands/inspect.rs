use anyhow::Result;
use colored::Colorize;
use mdt_core::{Container, FramePayload, MdaData};
use tracing::{info, warn};

/// One row of the inspect table
#[derive(Debug)]
pub struct FrameSummary {
    pub index: usize,
    pub offset: usize,
    pub size: u32,
    pub kind: String,
    pub version: String,
    pub timestamp: String,
    pub title: String,
    pub content: String,
    pub faulted: bool,
}

/// Describe every frame of a decoded container
pub fn summarize(container: &Container) -> Vec<FrameSummary> {
    container
        .frames
        .iter()
        .enumerate()
        .map(|(index, frame)| FrameSummary {
            index,
            offset: frame.start_offset(),
            size: frame.header.byte_size,
            kind: frame.kind().name().to_string(),
            version: frame.header.version.to_string(),
            timestamp: frame.header.timestamp.to_string(),
            title: frame.title().to_string(),
            content: describe(&frame.payload),
            faulted: frame.fault().is_some(),
        })
        .collect()
}

fn describe(payload: &FramePayload) -> String {
    match payload {
        FramePayload::HeaderOnly => "header only".to_string(),
        FramePayload::Text(text) => format!(
            "text, {} chars, {} chars metadata",
            text.body.chars().count(),
            text.metadata.chars().count()
        ),
        FramePayload::Mda(mda) => match &mda.data {
            MdaData::Grid(grid) if grid.has_values() => format!(
                "scan {}x{}, {:.3e} x {:.3e} {}",
                grid.width, grid.height, grid.x_extent, grid.y_extent, grid.xy_unit
            ),
            MdaData::Grid(grid) => format!("scan {}x{}, no samples", grid.width, grid.height),
            MdaData::Curve(curve) => {
                format!("curve ({:?}), {} points", curve.layout, curve.len())
            }
            MdaData::Empty => format!(
                "{} dimensions, {} measurands, no data",
                mda.dimensions.len(),
                mda.measurands.len()
            ),
        },
        FramePayload::Faulted(err) => format!("fault: {}", err),
    }
}

pub fn execute(input: &str, strict: bool) -> Result<()> {
    let container = crate::load(input, strict)?;
    let rows = summarize(&container);

    info!("Decoded {} frames", rows.len());

    println!("\n=== {} ===", input);
    println!("Payload size:      {} bytes", container.payload_size);
    println!("Frames:            {}", container.frame_count());
    println!("Faulted frames:    {}", container.faulted().count());
    println!();

    println!(
        "{:>4}  {:>10}  {:>10}  {:<13}  {:<7}  {:<19}  {:<20}  {}",
        "#", "offset", "size", "kind", "version", "timestamp", "title", "content"
    );
    for row in &rows {
        let kind = format!("{:<13}", row.kind);
        let content = if row.faulted {
            warn!("Frame #{} is faulted: {}", row.index, row.content);
            row.content.red().to_string()
        } else {
            row.content.clone()
        };
        println!(
            "{:>4}  {:>10}  {:>10}  {}  {:<7}  {:<19}  {:<20}  {}",
            row.index,
            row.offset,
            row.size,
            kind.cyan(),
            row.version,
            row.timestamp,
            row.title,
            content
        );
    }

    Ok(())
}

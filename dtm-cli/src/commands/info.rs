use anyhow::{Context, Result};
use dtm::RasterStore;
use std::io::Write;

use super::RasterSource;

pub fn run(source: &RasterSource) -> Result<()> {
    let store = source.open()?;

    let file_size = std::fs::metadata(store.source_path()?)
        .context("Failed to read raster metadata")?
        .len();

    let stdout = std::io::stdout();
    write_summary(&store, file_size, &mut stdout.lock())
}

/// Write the human-readable raster summary printed by `dtm info`.
fn write_summary<W: Write>(store: &RasterStore, file_size: u64, out: &mut W) -> Result<()> {
    let geometry = store.geometry()?;
    let envelope = geometry.envelope();
    let (pixel_x, pixel_y) = geometry.pixel_size();
    let body = store.body();

    writeln!(out, "Raster: {}", store.source_path()?.display())?;
    writeln!(out, "File size: {}", format_size(file_size))?;
    writeln!(out)?;
    writeln!(out, "Size: {}x{} pixels", geometry.width(), geometry.height())?;
    writeln!(
        out,
        "Envelope: ({}, {}) - ({}, {})",
        envelope.min_x, envelope.min_y, envelope.max_x, envelope.max_y
    )?;
    writeln!(out, "Pixel size: {} x {}", pixel_x, pixel_y)?;
    match store.nodata()? {
        Some(nodata) => writeln!(out, "No-data value: {}", nodata)?,
        None => writeln!(out, "No-data value: none")?,
    }
    writeln!(out)?;
    writeln!(
        out,
        "Body: radius {}, {} per pixel",
        body.radius, body.ground_resolution
    )?;
    writeln!(out)?;
    writeln!(out, "Min elevation: {:.2}m", store.get_min_value()?)?;
    writeln!(out, "Max elevation: {:.2}m", store.get_max_value()?)?;

    Ok(())
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = None;
    for candidate in UNITS {
        if size < 1024.0 {
            break;
        }
        size /= 1024.0;
        unit = Some(candidate);
    }

    match unit {
        Some(unit) => format!("{:.2} {}", size, unit),
        None => format!("{} bytes", bytes),
    }
}

use anyhow::{Context, Result};
use serde::Serialize;

use super::RasterSource;

#[derive(Serialize)]
struct ExtremaResponse {
    min_elevation: f64,
    max_elevation: f64,
}

pub fn run(source: &RasterSource, json: bool) -> Result<()> {
    let store = source.open()?;

    let min_elevation = store.get_min_value().context("Failed to scan raster")?;
    let max_elevation = store.get_max_value().context("Failed to scan raster")?;

    if json {
        let response = ExtremaResponse {
            min_elevation,
            max_elevation,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("Min elevation: {:.2}m", min_elevation);
        println!("Max elevation: {:.2}m", max_elevation);
    }

    Ok(())
}

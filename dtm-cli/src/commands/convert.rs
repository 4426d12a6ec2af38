use anyhow::{Context, Result};
use dtm::Coordinate;
use serde::Serialize;

use super::RasterSource;

#[derive(Serialize)]
struct ConvertResponse {
    x: f64,
    y: f64,
    latitude: f64,
    longitude: f64,
    units: String,
}

pub fn run(source: &RasterSource, x: f64, y: f64, json: bool) -> Result<()> {
    let store = source.open()?;

    let converted = store
        .pixel_to_planetographic(Coordinate::pixels(x, y))
        .context("Failed to convert coordinate")?;

    if json {
        let response = ConvertResponse {
            x,
            y,
            latitude: converted.x(),
            longitude: converted.y(),
            units: converted.units().to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{} {}", converted.x(), converted.y());
    }

    Ok(())
}

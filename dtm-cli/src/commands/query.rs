use anyhow::{Context, Result};
use serde::Serialize;

use super::RasterSource;

#[derive(Serialize)]
struct ElevationResponse {
    x: f64,
    y: f64,
    elevation: f64,
}

pub fn run(source: &RasterSource, x: f64, y: f64, json: bool) -> Result<()> {
    let store = source.open()?;

    let elevation = store
        .get_value(x, y)
        .context("Failed to get elevation")?;

    if json {
        let response = ElevationResponse { x, y, elevation };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", elevation);
    }

    Ok(())
}

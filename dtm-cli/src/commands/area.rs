use anyhow::{Context, Result};
use dtm::AreaRequest;
use serde::Serialize;

use super::RasterSource;

#[derive(Serialize)]
struct AreaResponse {
    origin_x: i64,
    origin_y: i64,
    width: usize,
    height: usize,
    /// Rows ordered bottom to top of the requested rectangle
    elevations: Vec<Vec<f64>>,
}

pub fn run(
    source: &RasterSource,
    x: i64,
    y: i64,
    width: usize,
    height: usize,
    json: bool,
) -> Result<()> {
    let store = source.open()?;

    let elevations = store
        .elevations_in(AreaRequest::new(x, y, width, height))
        .context("Failed to extract area")?;

    if json {
        let response = AreaResponse {
            origin_x: x,
            origin_y: y,
            width,
            height,
            elevations,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        for row in &elevations {
            let line: Vec<String> = row.iter().map(|e| format!("{:.2}", e)).collect();
            println!("{}", line.join(" "));
        }
    }

    Ok(())
}

//! Basic example demonstrating dtm library usage.
//!
//! Run with: cargo run --example basic -- /path/to/dtm.tif

use dtm::{Coordinate, DtmError, RasterStore};
use std::env;

fn main() -> Result<(), DtmError> {
    // Get raster path from command line
    let path = env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cargo run --example basic -- /path/to/dtm.tif");
        std::process::exit(1);
    });

    let store = RasterStore::open(&path)?;
    let (width, height) = (store.width()?, store.height()?);

    println!("{}: {}x{} pixels", path, width, height);
    println!("{:-<50}", "");

    // Sample a few landmarks in pixel space
    let points = [
        ("Top-left corner", 0.0, 0.0),
        ("Centre", width as f64 / 2.0, height as f64 / 2.0),
        ("Bottom-right corner", width as f64, height as f64),
    ];

    for (name, x, y) in &points {
        let elevation = store.get_value(*x, *y)?;
        let latlong = store.pixel_to_planetographic(Coordinate::pixels(*x, *y))?;
        println!(
            "{}: {:.1}m at lat {}, lon {}",
            name,
            elevation,
            latlong.x(),
            latlong.y()
        );
    }

    println!("\nRelief:");
    println!("  Min: {:.1}m", store.get_min_value()?);
    println!("  Max: {:.1}m", store.get_max_value()?);

    Ok(())
}

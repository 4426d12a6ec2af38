use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Log filter used when `RUST_LOG` is unset; covers the library and this binary.
const DEFAULT_LOG_FILTER: &str = "dtm=info";

/// Planetary DTM elevation query tool
#[derive(Parser)]
#[command(name = "dtm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// GeoTIFF (or zipped GeoTIFF) elevation raster
    #[arg(short, long, env = "DTM_RASTER", global = true)]
    raster: Option<PathBuf>,

    /// Ground distance covered by one pixel
    #[arg(long, env = "DTM_GROUND_RESOLUTION", default_value = "5", global = true)]
    ground_resolution: f64,

    /// Body radius, in the same unit as the ground resolution
    #[arg(long, env = "DTM_BODY_RADIUS", default_value = "3396200", global = true)]
    body_radius: f64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query elevation at a single pixel
    Query {
        /// Column, 0 = left edge
        #[arg(long, allow_negative_numbers = true)]
        x: f64,

        /// Row, 0 = top edge
        #[arg(long, allow_negative_numbers = true)]
        y: f64,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Extract elevations inside a rectangle (rows printed bottom to top)
    Area {
        /// Left edge of the rectangle
        #[arg(long, allow_negative_numbers = true)]
        x: i64,

        /// Top edge of the rectangle
        #[arg(long, allow_negative_numbers = true)]
        y: i64,

        /// Number of columns
        #[arg(long)]
        width: usize,

        /// Number of rows
        #[arg(long)]
        height: usize,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Scan the whole raster for its lowest and highest elevation
    Extrema {
        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Convert a pixel to planetographic latitude/longitude
    Convert {
        /// Column, 0 = left edge
        #[arg(long, allow_negative_numbers = true)]
        x: f64,

        /// Row, 0 = top edge
        #[arg(long, allow_negative_numbers = true)]
        y: f64,

        /// Output result as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Display information about the raster
    Info,

    /// Look up elevations for pixel coordinates listed in a CSV file
    Batch {
        /// Input CSV file
        input: PathBuf,

        /// Output file (defaults to <input>_elevation.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Column name for x
        #[arg(long, default_value = "x")]
        x_col: String,

        /// Column name for y
        #[arg(long, default_value = "y")]
        y_col: String,
    },
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let source = commands::RasterSource {
        path: cli.raster,
        ground_resolution: cli.ground_resolution,
        body_radius: cli.body_radius,
    };

    match cli.command {
        Commands::Query { x, y, json } => commands::query::run(&source, x, y, json),
        Commands::Area {
            x,
            y,
            width,
            height,
            json,
        } => commands::area::run(&source, x, y, width, height, json),
        Commands::Extrema { json } => commands::extrema::run(&source, json),
        Commands::Convert { x, y, json } => commands::convert::run(&source, x, y, json),
        Commands::Info => commands::info::run(&source),
        Commands::Batch {
            input,
            output,
            x_col,
            y_col,
        } => commands::batch::run(&source, input, output, x_col, y_col),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_query() {
        let cli = Cli::try_parse_from([
            "dtm", "-r", "jezero.tif", "query", "--x", "10", "--y", "4.5",
        ])
        .unwrap();

        assert_eq!(cli.raster, Some(PathBuf::from("jezero.tif")));
        assert_eq!(cli.ground_resolution, 5.0);
        assert_eq!(cli.body_radius, 3_396_200.0);
        match cli.command {
            Commands::Query { x, y, json } => {
                assert_eq!((x, y), (10.0, 4.5));
                assert!(!json);
            }
            _ => panic!("expected query command"),
        }
    }

    #[test]
    fn test_parse_area_negative_origin() {
        let cli = Cli::try_parse_from([
            "dtm", "area", "--x", "-2", "--y", "3", "--width", "4", "--height", "5", "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Area {
                x,
                y,
                width,
                height,
                json,
            } => {
                assert_eq!((x, y, width, height), (-2, 3, 4, 5));
                assert!(json);
            }
            _ => panic!("expected area command"),
        }
    }

    #[test]
    fn test_parse_global_scale_after_subcommand() {
        let cli = Cli::try_parse_from([
            "dtm",
            "convert",
            "--x",
            "1",
            "--y",
            "2",
            "--ground-resolution",
            "0.25",
        ])
        .unwrap();

        assert_eq!(cli.ground_resolution, 0.25);
    }

    #[test]
    fn test_default_filter_covers_binary_events() {
        // The binary target is named `dtm`, so its events share the library's prefix
        assert!(module_path!().starts_with("dtm::"));
        assert!(tracing_subscriber::EnvFilter::try_new(DEFAULT_LOG_FILTER).is_ok());
    }

    #[test]
    fn test_area_rejects_negative_size() {
        let result = Cli::try_parse_from([
            "dtm", "area", "--x", "0", "--y", "0", "--width", "-4", "--height", "5",
        ]);
        assert!(result.is_err());
    }
}

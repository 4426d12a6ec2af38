use anyhow::{Context, Result};
use dtm::RasterStore;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Written in place of an elevation when the pixel lies outside the raster.
const OUT_OF_BOUNDS: &str = "out_of_bounds";

pub fn run(
    source: &super::RasterSource,
    input: PathBuf,
    output: Option<PathBuf>,
    x_col: String,
    y_col: String,
) -> Result<()> {
    let store = source.open()?;

    let file = File::open(&input).context("Failed to open input file")?;
    let output_path = output.unwrap_or_else(|| default_output_path(&input));
    let output_file = File::create(&output_path).context("Failed to create output file")?;

    let written = process_csv(
        &store,
        BufReader::new(file),
        BufWriter::new(output_file),
        &x_col,
        &y_col,
    )?;

    tracing::info!(rows = written, output = %output_path.display(), "batch complete");
    println!("Output written to: {}", output_path.display());
    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "points".to_string());
    input.with_file_name(format!("{}_elevation.csv", stem))
}

/// Copy every record from `input` to `output`, appending an `elevation` column.
///
/// Returns the number of records written.
fn process_csv<R: Read, W: Write>(
    store: &RasterStore,
    input: R,
    output: W,
    x_col: &str,
    y_col: &str,
) -> Result<u64> {
    let mut reader = csv::Reader::from_reader(input);

    // Find column indices
    let headers = reader.headers()?.clone();
    let x_idx = headers
        .iter()
        .position(|h| h == x_col)
        .with_context(|| format!("Column '{}' not found in CSV", x_col))?;
    let y_idx = headers
        .iter()
        .position(|h| h == y_col)
        .with_context(|| format!("Column '{}' not found in CSV", y_col))?;

    // Collect records for progress bar
    let records: Vec<_> = reader.records().collect::<Result<_, _>>()?;
    let total = records.len() as u64;

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let mut writer = csv::Writer::from_writer(output);

    let mut new_headers: Vec<&str> = headers.iter().collect();
    new_headers.push("elevation");
    writer.write_record(&new_headers)?;

    for record in &records {
        let x: f64 = record
            .get(x_idx)
            .context("Missing x")?
            .trim()
            .parse()
            .context("Invalid x")?;
        let y: f64 = record
            .get(y_idx)
            .context("Missing y")?
            .trim()
            .parse()
            .context("Invalid y")?;

        let elevation = store
            .try_value(x, y)?
            .map(|e| e.to_string())
            .unwrap_or_else(|| OUT_OF_BOUNDS.to_string());

        let mut new_record: Vec<&str> = record.iter().collect();
        new_record.push(&elevation);
        writer.write_record(&new_record)?;

        pb.inc(1);
    }

    pb.finish_with_message("done");
    writer.flush()?;

    Ok(total)
}

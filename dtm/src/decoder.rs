//! Raster decoding.
//!
//! [`RasterDecoder`] is the seam between the elevation store and the file
//! format. [`GeoTiffDecoder`] is the stock implementation, built on the
//! `tiff` crate. It understands:
//!
//! - single-band rasters of any integer or floating-point sample type
//! - `ModelPixelScale` + `ModelTiepoint` georeferencing (pixel space otherwise)
//! - the `GDAL_NODATA` sentinel
//! - `.zip` archives holding a `.tif`/`.tiff` entry

use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use memmap2::Mmap;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::tags::Tag;
use tiff::ColorType;

use crate::error::LoadError;
use crate::geometry::GridGeometry;

// GeoTIFF tag IDs
const GEOTIFF_MODELPIXELSCALE: u16 = 33550;
const GEOTIFF_MODELTIEPOINT: u16 = 33922;
const GDAL_NODATA: u16 = 42113;

/// A decoded single-band raster: geometry plus row-major samples.
#[derive(Debug, Clone)]
pub struct DecodedRaster {
    geometry: GridGeometry,
    samples: Vec<f64>,
    nodata: Option<f64>,
}

impl DecodedRaster {
    /// Wrap decoded samples.
    ///
    /// Returns `None` if `samples` does not hold exactly `width × height` values.
    pub fn new(geometry: GridGeometry, samples: Vec<f64>, nodata: Option<f64>) -> Option<Self> {
        if samples.len() != geometry.width() * geometry.height() {
            return None;
        }
        Some(Self {
            geometry,
            samples,
            nodata,
        })
    }

    /// Returns the grid geometry.
    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Returns the no-data sentinel declared by the file, if any.
    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    /// Sample at `(row, col)`, or `None` outside the grid.
    pub fn sample(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.geometry.height() || col >= self.geometry.width() {
            return None;
        }
        self.samples.get(row * self.geometry.width() + col).copied()
    }

    pub(crate) fn into_parts(self) -> (GridGeometry, Vec<f64>, Option<f64>) {
        (self.geometry, self.samples, self.nodata)
    }
}

/// Turns a raster file into a [`DecodedRaster`].
pub trait RasterDecoder: Send + Sync {
    /// Decode the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the file is missing, unreadable, or not a
    /// raster this decoder supports.
    fn decode(&self, path: &Path) -> Result<DecodedRaster, LoadError>;
}

/// GeoTIFF decoder backed by the `tiff` crate.
///
/// # Example
///
/// ```ignore
/// use dtm::{GeoTiffDecoder, RasterDecoder};
///
/// let raster = GeoTiffDecoder.decode("DTEEC_jezero.tif".as_ref())?;
/// println!("{}x{}", raster.geometry().width(), raster.geometry().height());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct GeoTiffDecoder;

impl RasterDecoder for GeoTiffDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedRaster, LoadError> {
        if !path.exists() {
            return Err(LoadError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        if is_archive(path) {
            let bytes = read_archived_raster(path)?;
            return decode_tiff(Cursor::new(bytes), path);
        }

        let file = File::open(path)?;

        // SAFETY: Memory mapping is safe as long as the file is not modified
        // while mapped. The mapping is read-only and dropped before returning.
        let mmap = unsafe { Mmap::map(&file)? };

        decode_tiff(Cursor::new(&mmap[..]), path)
    }
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("zip"))
        .unwrap_or(false)
}

/// Read the first `.tif`/`.tiff` entry of a zip archive into memory.
fn read_archived_raster(path: &Path) -> Result<Vec<u8>, LoadError> {
    let archive_error = |message: String| LoadError::Archive {
        path: path.to_path_buf(),
        message,
    };

    let file = File::open(path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|e| archive_error(e.to_string()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| archive_error(e.to_string()))?;

        let name = entry.name().to_ascii_lowercase();
        if name.ends_with(".tif") || name.ends_with(".tiff") {
            tracing::debug!(
                archive = %path.display(),
                entry = %entry.name(),
                "Reading archived raster"
            );
            // The declared entry size is untrusted, so the buffer grows as bytes arrive
            let mut bytes = Vec::new();
            std::io::copy(&mut entry, &mut bytes)?;
            return Ok(bytes);
        }
    }

    Err(archive_error("no .tif or .tiff entry found".to_string()))
}

fn decode_tiff<R: Read + Seek>(reader: R, path: &Path) -> Result<DecodedRaster, LoadError> {
    let decode_error = |e: tiff::TiffError| LoadError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    };
    let unsupported = |message: String| LoadError::Unsupported {
        path: path.to_path_buf(),
        message,
    };

    let mut decoder = Decoder::new(reader)
        .map_err(decode_error)?
        .with_limits(Limits::unlimited());

    let (width, height) = decoder.dimensions().map_err(decode_error)?;
    let (width, height) = (width as usize, height as usize);
    if width == 0 || height == 0 {
        return Err(unsupported(format!("empty raster ({}x{})", width, height)));
    }

    match decoder.colortype().map_err(decode_error)? {
        ColorType::Gray(_) => {}
        other => {
            return Err(unsupported(format!(
                "expected a single-band elevation raster, found {:?}",
                other
            )))
        }
    }

    let pixel_scale = find_f64_tag(&mut decoder, GEOTIFF_MODELPIXELSCALE).map_err(decode_error)?;
    let tiepoint = find_f64_tag(&mut decoder, GEOTIFF_MODELTIEPOINT).map_err(decode_error)?;
    let geometry = match (pixel_scale, tiepoint) {
        (Some(scale), Some(tie)) => GridGeometry::from_tiepoint(width, height, &scale, &tie)
            .unwrap_or_else(|| {
                tracing::warn!(
                    path = %path.display(),
                    "Unusable georeferencing tags, falling back to pixel space"
                );
                GridGeometry::pixel_space(width, height)
            }),
        _ => GridGeometry::pixel_space(width, height),
    };

    let nodata = find_nodata(&mut decoder).map_err(decode_error)?;

    let samples = samples_to_f64(decoder.read_image().map_err(decode_error)?);

    tracing::debug!(
        path = %path.display(),
        width,
        height,
        envelope = ?geometry.envelope(),
        nodata = ?nodata,
        "Decoded raster"
    );

    DecodedRaster::new(geometry, samples, nodata).ok_or_else(|| {
        unsupported(format!(
            "sample count does not match {}x{} single-band grid",
            width, height
        ))
    })
}

fn find_f64_tag<R: Read + Seek>(
    decoder: &mut Decoder<R>,
    code: u16,
) -> tiff::TiffResult<Option<Vec<f64>>> {
    decoder
        .find_tag(Tag::from_u16_exhaustive(code))?
        .map(|value| value.into_f64_vec())
        .transpose()
}

fn find_nodata<R: Read + Seek>(decoder: &mut Decoder<R>) -> tiff::TiffResult<Option<f64>> {
    let text = decoder
        .find_tag(Tag::from_u16_exhaustive(GDAL_NODATA))?
        .map(|value| value.into_string())
        .transpose()?;

    Ok(text.and_then(|s| s.trim_matches(|c: char| c == '\0' || c.is_whitespace()).parse().ok()))
}

#[allow(unreachable_patterns)]
fn samples_to_f64(result: DecodingResult) -> Vec<f64> {
    match result {
        DecodingResult::U8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::U64(v) => v.into_iter().map(|s| s as f64).collect(),
        DecodingResult::I8(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I16(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::I64(v) => v.into_iter().map(|s| s as f64).collect(),
        DecodingResult::F32(v) => v.into_iter().map(f64::from).collect(),
        DecodingResult::F64(v) => v,
        // Unknown sample types leave the buffer empty; the length check rejects it.
        _ => Vec::new(),
    }
}

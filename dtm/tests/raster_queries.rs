//! Integration tests for pixel queries against GeoTIFF files on disk.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use dtm::{BodyModel, Coordinate, DtmError, LoadError, RasterStore, RasterStoreBuilder, Units};
use tempfile::TempDir;
use tiff::encoder::{colortype::Gray32Float, TiffEncoder};
use tiff::tags::Tag;

const WIDTH: u32 = 24;
const HEIGHT: u32 = 16;

/// Synthetic crater: elevation drops toward the centre, with one spike.
fn crater_samples() -> Vec<f32> {
    let (cx, cy) = (WIDTH as f32 / 2.0, HEIGHT as f32 / 2.0);
    let mut samples = Vec::with_capacity((WIDTH * HEIGHT) as usize);
    for row in 0..HEIGHT {
        for col in 0..WIDTH {
            let r = ((col as f32 - cx).powi(2) + (row as f32 - cy).powi(2)).sqrt();
            samples.push(-4000.0 + r * 25.0);
        }
    }
    // Central peak
    samples[(3 * WIDTH + 5) as usize] = 1500.0;
    samples
}

/// Write a single-band GeoTIFF, georeferenced to a 5 m grid when `georef` is set.
fn write_dtm(dir: &Path, name: &str, samples: &[f32], georef: bool) -> PathBuf {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor).unwrap();
        let mut image = encoder.new_image::<Gray32Float>(WIDTH, HEIGHT).unwrap();
        if georef {
            let pixel_scale = [5.0, 5.0, 0.0];
            let tiepoint = [0.0, 0.0, 0.0, 4_315_000.0, 1_081_000.0, 0.0];
            image
                .encoder()
                .write_tag(Tag::Unknown(33550), pixel_scale.as_slice())
                .unwrap();
            image
                .encoder()
                .write_tag(Tag::Unknown(33922), tiepoint.as_slice())
                .unwrap();
        }
        image.write_data(samples).unwrap();
    }

    let path = dir.join(name);
    std::fs::write(&path, cursor.into_inner()).unwrap();
    path
}

fn open_crater(georef: bool) -> (TempDir, RasterStore) {
    let dir = TempDir::new().unwrap();
    let path = write_dtm(dir.path(), "crater.tif", &crater_samples(), georef);
    let store = RasterStore::open(path).unwrap();
    (dir, store)
}

#[test]
fn test_in_bounds_values_are_finite() {
    for georef in [false, true] {
        let (_dir, store) = open_crater(georef);

        for y in 0..=HEIGHT {
            for x in 0..=WIDTH {
                let value = store.get_value(x as f64, y as f64).unwrap();
                assert!(value.is_finite(), "({x}, {y}) returned {value}");
            }
        }
    }
}

#[test]
fn test_georeferencing_does_not_move_samples() {
    let (_plain_dir, plain) = open_crater(false);
    let (_geo_dir, geo) = open_crater(true);

    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            assert_eq!(
                plain.get_value(x as f64, y as f64).unwrap(),
                geo.get_value(x as f64, y as f64).unwrap()
            );
        }
    }
    assert_eq!(geo.get_value(5.0, 3.0).unwrap(), 1500.0);
}

#[test]
fn test_out_of_bounds_rejected() {
    let (_dir, store) = open_crater(true);
    let (w, h) = (WIDTH as f64, HEIGHT as f64);

    for (x, y) in [(-1.0, 0.0), (0.0, -0.1), (w + 0.5, 0.0), (0.0, h + 1.0), (w + 1.0, h + 1.0)] {
        assert!(matches!(
            store.get_value(x, y),
            Err(DtmError::OutOfBounds { .. })
        ));
    }
}

#[test]
fn test_extrema_bound_every_sample() {
    let (_dir, store) = open_crater(true);

    let max = store.get_max_value().unwrap();
    let min = store.get_min_value().unwrap();
    assert_eq!(max, 1500.0);

    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            let value = store.get_value(x as f64, y as f64).unwrap();
            assert!(max >= value);
            assert!(min <= value);
        }
    }

    let expected_min = crater_samples()
        .into_iter()
        .map(f64::from)
        .fold(f64::INFINITY, f64::min);
    assert_eq!(min, expected_min);
}

#[test]
fn test_area_shape_and_flip() {
    let (_dir, store) = open_crater(true);

    let area = store
        .get_elevations_in_area(Coordinate::pixels(0.0, 0.0), 7, 5)
        .unwrap();

    assert_eq!(area.len(), 5);
    assert!(area.iter().all(|row| row.len() == 7));
    assert_eq!(area[4][0], store.get_value(0.0, 0.0).unwrap());

    for (dy, row) in area.iter().rev().enumerate() {
        for (dx, &value) in row.iter().enumerate() {
            assert_eq!(value, store.get_value(dx as f64, dy as f64).unwrap());
        }
    }
}

#[test]
fn test_area_past_grid_edge_is_zero_filled() {
    let (_dir, store) = open_crater(false);

    // Starts two columns before the inclusive edge and extends past it
    let area = store
        .get_elevations_in_area(Coordinate::pixels((WIDTH - 2) as f64, 0.0), 5, 2)
        .unwrap();

    assert_eq!(area.len(), 2);
    assert!(area.iter().all(|row| row.len() == 5));
    for row in &area {
        assert_ne!(row[0], 0.0);
        assert_ne!(row[2], 0.0); // x == width, still in bounds
        assert_eq!(row[3], 0.0);
        assert_eq!(row[4], 0.0);
    }
}

#[test]
fn test_area_larger_than_grid() {
    let (_dir, store) = open_crater(false);

    let area = store
        .get_elevations_in_area(Coordinate::pixels(0.0, 0.0), 40, 30)
        .unwrap();

    assert_eq!(area.len(), 30);
    assert!(area.iter().all(|row| row.len() == 40));
    // Source row 0 lands on the last output row
    assert_eq!(area[29][0], store.get_value(0.0, 0.0).unwrap());
    // Only HEIGHT rows are visited; the top output rows stay empty
    assert!(area[0].iter().all(|&v| v == 0.0));
}

#[test]
fn test_conversion_properties() {
    let (_dir, store) = open_crater(true);

    let centre = store
        .pixel_to_planetographic(Coordinate::pixels((WIDTH / 2) as f64, (HEIGHT / 2) as f64))
        .unwrap();
    assert_eq!(centre, Coordinate::lat_long(0.0, 0.0));
    assert_eq!(centre.units(), Units::LatLong);

    let already = Coordinate::lat_long(18.4, 77.5);
    assert_eq!(store.pixel_to_planetographic(already).unwrap(), already);
}

#[test]
fn test_conversion_with_configured_scale() {
    let dir = TempDir::new().unwrap();
    let path = write_dtm(dir.path(), "crater.tif", &crater_samples(), true);

    // One pixel spans one degree of arc
    let body = BodyModel::new(1000.0, 360_000.0 / (2.0 * std::f64::consts::PI));
    let store = RasterStoreBuilder::new().body(body).open(path).unwrap();

    let north_west = store
        .pixel_to_planetographic(Coordinate::pixels(2.5, 1.5))
        .unwrap();
    assert_eq!(north_west, Coordinate::lat_long(-6.0, -9.0));

    let south_east = store
        .pixel_to_planetographic(Coordinate::pixels(20.5, 14.5))
        .unwrap();
    assert_eq!(south_east, Coordinate::lat_long(6.0, 8.0));
}

#[test]
fn test_load_errors() {
    let dir = TempDir::new().unwrap();

    let missing = RasterStore::open(dir.path().join("nope.tif"));
    assert!(matches!(
        missing,
        Err(DtmError::Load(LoadError::FileNotFound { .. }))
    ));

    let text = dir.path().join("notes.tif");
    std::fs::write(&text, "elevation model goes here").unwrap();
    assert!(matches!(
        RasterStore::open(&text),
        Err(DtmError::Load(LoadError::Decode { .. }))
    ));
}

#[test]
fn test_load_from_zip_archive() {
    let dir = TempDir::new().unwrap();
    let tif = write_dtm(dir.path(), "crater.tif", &crater_samples(), true);

    let zip_path = dir.path().join("crater.tif.zip");
    let file = std::fs::File::create(&zip_path).unwrap();
    let mut zip_writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    zip_writer.start_file("crater.tif", options).unwrap();
    zip_writer.write_all(&std::fs::read(&tif).unwrap()).unwrap();
    zip_writer.finish().unwrap();

    let store = RasterStore::open(&zip_path).unwrap();
    assert_eq!(store.width().unwrap(), WIDTH as usize);
    assert_eq!(store.get_value(5.0, 3.0).unwrap(), 1500.0);
    assert_eq!(store.source_path().unwrap(), zip_path.as_path());
}

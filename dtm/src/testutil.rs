//! Fixture builders shared by the unit tests.

use std::io::{Cursor, Write};

use tiff::encoder::{colortype::Gray32Float, TiffEncoder};
use tiff::tags::Tag;

/// GeoTIFF georeferencing tag values.
#[derive(Debug, Clone, Copy)]
pub struct Georef {
    /// ModelPixelScale: [ScaleX, ScaleY, ScaleZ]
    pub pixel_scale: [f64; 3],
    /// ModelTiepoint: [I, J, K, X, Y, Z]
    pub tiepoint: [f64; 6],
}

/// Encode a single-band f32 GeoTIFF in memory.
pub fn geotiff_bytes(
    width: u32,
    height: u32,
    samples: &[f32],
    georef: Option<Georef>,
    nodata: Option<&str>,
) -> Vec<u8> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor).unwrap();
        let mut image = encoder.new_image::<Gray32Float>(width, height).unwrap();

        if let Some(georef) = georef {
            image
                .encoder()
                .write_tag(Tag::Unknown(33550), georef.pixel_scale.as_slice())
                .unwrap();
            image
                .encoder()
                .write_tag(Tag::Unknown(33922), georef.tiepoint.as_slice())
                .unwrap();
        }
        if let Some(nodata) = nodata {
            image
                .encoder()
                .write_tag(Tag::Unknown(42113), nodata)
                .unwrap();
        }

        image.write_data(samples).unwrap();
    }
    cursor.into_inner()
}

/// Build a zip archive holding `(name, contents)` entries.
pub fn zipped(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);

    for (name, contents) in entries {
        writer.start_file(*name, options.clone()).unwrap();
        writer.write_all(contents).unwrap();
    }

    writer.finish().unwrap().into_inner()
}

//! Loading rasters from disk.
//!
//! TIFF/GeoTIFF files are read as scientific rasters: band 1, samples kept at
//! their numeric value. Every other format goes through `image` and is
//! reduced to 8-bit luma. Georeferencing tags are ignored.

use crate::error::{FilterError, FilterResult};
use crate::raster::Raster;
use image::GrayImage;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};

fn is_tiff(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("tif") || ext.eq_ignore_ascii_case("tiff"))
        .unwrap_or(false)
}

/// Opens `path` and converts it to a working-precision raster.
pub fn open_raster(path: &Path) -> FilterResult<Raster> {
    let raster = if is_tiff(path) {
        let file = File::open(path)?;
        read_tiff_band(BufReader::new(file))?
    } else {
        let img = image::open(path)?.into_luma8();
        raster_from_gray_image(&img)?
    };
    let (height, width) = raster.dim();
    log::info!("opened {path:?} ({height}x{width})");
    Ok(raster)
}

/// Widens an 8-bit grayscale image to a raster.
pub fn raster_from_gray_image(img: &GrayImage) -> FilterResult<Raster> {
    let (width, height) = img.dimensions();
    let samples = img.as_raw().iter().map(|&p| f64::from(p)).collect();
    Raster::from_shape_vec(height as usize, width as usize, samples)
}

/// Reads the first band of the first image in a TIFF stream.
///
/// Multi-sample (chunky) layouts are reduced to their first sample per pixel.
pub fn read_tiff_band<R: Read + Seek>(reader: R) -> FilterResult<Raster> {
    let mut decoder = Decoder::new(reader)?;
    let (width, height) = decoder.dimensions()?;
    let (width, height) = (width as usize, height as usize);

    let samples: Vec<f64> = match decoder.read_image()? {
        DecodingResult::U8(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::U16(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::U32(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::U64(data) => data.into_iter().map(|v| v as f64).collect(),
        DecodingResult::I8(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::I16(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::I32(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::I64(data) => data.into_iter().map(|v| v as f64).collect(),
        DecodingResult::F16(data) => data.into_iter().map(|v| v.to_f64()).collect(),
        DecodingResult::F32(data) => data.into_iter().map(f64::from).collect(),
        DecodingResult::F64(data) => data,
    };

    let pixels = width * height;
    if pixels == 0 {
        return Err(FilterError::InvalidDimensions { height, width });
    }
    if samples.len() % pixels != 0 {
        return Err(FilterError::UnsupportedFormat(format!(
            "{} samples do not tile a {height}x{width} image",
            samples.len()
        )));
    }
    let samples_per_pixel = samples.len() / pixels;
    let band = if samples_per_pixel == 1 {
        samples
    } else {
        log::debug!("tiff has {samples_per_pixel} samples per pixel, keeping band 1");
        samples.into_iter().step_by(samples_per_pixel).collect()
    };
    Raster::from_shape_vec(height, width, band)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tiff::encoder::{colortype, TiffEncoder};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("fft_image_filter_{}_{name}", std::process::id()))
    }

    #[test]
    fn reads_float_tiff_band_without_rescaling() {
        let samples: Vec<f32> = vec![-12.5, 0.0, 3.25, 1.0e6, 7.0, -1.0];
        let mut buf = Cursor::new(Vec::new());
        TiffEncoder::new(&mut buf)
            .unwrap()
            .write_image::<colortype::Gray32Float>(3, 2, &samples)
            .unwrap();
        buf.set_position(0);

        let raster = read_tiff_band(buf).unwrap();
        assert_eq!(raster.dim(), (2, 3));
        assert_eq!(raster.get(0, 0), Some(-12.5));
        assert_eq!(raster.get(1, 0), Some(1.0e6));
        assert_eq!(raster.get(1, 2), Some(-1.0));
    }

    #[test]
    fn keeps_first_band_of_rgb_tiff() {
        let samples: Vec<u8> = vec![10, 20, 30, 40, 50, 60];
        let mut buf = Cursor::new(Vec::new());
        TiffEncoder::new(&mut buf)
            .unwrap()
            .write_image::<colortype::RGB8>(2, 1, &samples)
            .unwrap();
        buf.set_position(0);

        let raster = read_tiff_band(buf).unwrap();
        assert_eq!(raster.dim(), (1, 2));
        assert_eq!(raster.as_array().as_slice().unwrap(), &[10.0, 40.0]);
    }

    #[test]
    fn opens_tiff_by_extension_case_insensitively() {
        let path = temp_path("band.TIF");
        let samples: Vec<u16> = vec![0, 1000, 65535, 42];
        let file = File::create(&path).unwrap();
        TiffEncoder::new(file)
            .unwrap()
            .write_image::<colortype::Gray16>(2, 2, &samples)
            .unwrap();

        let raster = open_raster(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(raster.get(1, 0), Some(65535.0));
    }

    #[test]
    fn opens_png_as_grayscale() {
        let path = temp_path("gray.png");
        let img = GrayImage::from_raw(3, 2, vec![0, 50, 100, 150, 200, 250]).unwrap();
        img.save(&path).unwrap();

        let raster = open_raster(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(raster.dim(), (2, 3));
        assert_eq!(raster.get(1, 2), Some(250.0));
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = temp_path("does_not_exist.tiff");
        assert!(matches!(open_raster(&path), Err(FilterError::Io(_))));
        assert!(is_tiff(Path::new("a/b.tiff")));
        assert!(!is_tiff(Path::new("a/b.png")));
    }
}

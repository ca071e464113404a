//! Min/max stretch of a real raster onto the 8-bit display range.
//!
//! Output is for presentation only and never goes back into the transform.

use crate::error::{FilterError, FilterResult};
use crate::raster::Raster;
use image::GrayImage;
use ndarray::ArrayView2;

/// An 8-bit, one-byte-per-pixel, row-major image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayBuffer {
    height: usize,
    width: usize,
    pixels: Vec<u8>,
}

impl DisplayBuffer {
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn dim(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Row-major pixel bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.pixels
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row < self.height && col < self.width {
            Some(self.pixels[row * self.width + col])
        } else {
            None
        }
    }

    /// Copies the buffer into an `image` grayscale buffer for hosts that
    /// present through the `image` crate.
    pub fn to_gray_image(&self) -> FilterResult<GrayImage> {
        let invalid = || FilterError::InvalidDimensions {
            height: self.height,
            width: self.width,
        };
        let width = u32::try_from(self.width).map_err(|_| invalid())?;
        let height = u32::try_from(self.height).map_err(|_| invalid())?;
        GrayImage::from_raw(width, height, self.pixels.clone()).ok_or_else(invalid)
    }
}

/// Stretches `raster` so that its finite minimum maps to 0 and its finite
/// maximum to 255.
///
/// A constant raster (or one without any finite sample) maps to all zeros.
/// Non-finite samples are left out of the min/max scan and map to 0.
pub fn normalize(raster: &Raster) -> DisplayBuffer {
    normalize_view(raster.view())
}

pub(crate) fn normalize_view(view: ArrayView2<'_, f64>) -> DisplayBuffer {
    let (height, width) = view.dim();
    let (min, max) = view
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let range = max - min;
    let pixels = if !(range.is_finite() && range > 0.0) {
        vec![0; height * width]
    } else {
        view.iter()
            .map(|&v| {
                if v.is_finite() {
                    ((v - min) / range * 255.0).round().clamp(0.0, 255.0) as u8
                } else {
                    0
                }
            })
            .collect()
    };

    DisplayBuffer {
        height,
        width,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_map_to_full_range() {
        let raster = Raster::from_fn(7, 9, |(r, c)| (r as f64 - 3.0) * 1e4 + c as f64 * 0.25).unwrap();
        let display = normalize(&raster);
        assert_eq!(display.dim(), (7, 9));
        assert_eq!(display.get(0, 0), Some(0));
        assert_eq!(display.get(6, 8), Some(255));
        let min = display.as_bytes().iter().min().copied();
        let max = display.as_bytes().iter().max().copied();
        assert_eq!((min, max), (Some(0), Some(255)));
    }

    #[test]
    fn midpoint_rounds_half_up() {
        let raster = Raster::from_shape_vec(1, 3, vec![-1.0, 0.0, 1.0]).unwrap();
        assert_eq!(normalize(&raster).as_bytes(), &[0, 128, 255]);
    }

    #[test]
    fn constant_raster_is_all_zero() {
        for k in [0.0, 17.5, -3.0, 1e12] {
            let raster = Raster::from_fn(4, 5, |_| k).unwrap();
            let display = normalize(&raster);
            assert_eq!(display.dim(), (4, 5));
            assert!(display.as_bytes().iter().all(|&p| p == 0));
        }
    }

    #[test]
    fn non_finite_samples_are_excluded_and_zeroed() {
        let raster =
            Raster::from_shape_vec(1, 5, vec![f64::NAN, 2.0, f64::INFINITY, 4.0, f64::NEG_INFINITY])
                .unwrap();
        assert_eq!(normalize(&raster).as_bytes(), &[0, 0, 0, 255, 0]);

        let all_nan = Raster::from_fn(2, 2, |_| f64::NAN).unwrap();
        assert!(normalize(&all_nan).as_bytes().iter().all(|&p| p == 0));
    }

    #[test]
    fn positive_affine_rescale_gives_same_buffer() {
        let a = Raster::from_fn(5, 5, |(r, c)| (r * 5 + c) as f64).unwrap();
        let b = Raster::from_fn(5, 5, |(r, c)| (r * 5 + c) as f64 * 3.0 + 100.0).unwrap();
        assert_eq!(normalize(&a), normalize(&b));
    }

    #[test]
    fn converts_to_gray_image() {
        let raster = Raster::from_shape_vec(2, 3, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        let display = normalize(&raster);
        let img = display.to_gray_image().unwrap();
        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1).0, [255]);
        assert_eq!(img.get_pixel(0, 0).0, [0]);
    }
}

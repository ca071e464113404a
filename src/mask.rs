//! Radial band selection masks.
//!
//! A mask has the same shape as the spectrum it multiplies and is centered on
//! `(height / 2, width / 2)`, the same bin [`fft_shift`](crate::spectral::fft_shift)
//! moves the zero frequency to. A sample at offset `(dy, dx)` from the center
//! lies inside the disk of radius `r` iff `dy² + dx² <= r²` (boundary included).

use crate::error::{FilterError, FilterResult};
use crate::raster::{check_dimensions, Spectrum};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Filter topology together with its radius parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterMode {
    /// Pass everything inside the disk of radius `cutoff`.
    LowPass { cutoff: u32 },
    /// Block everything inside the disk of radius `cutoff`.
    HighPass { cutoff: u32 },
    /// Pass the annulus between the two radii. The order of `low` and `high`
    /// does not matter.
    BandPass { low: u32, high: u32 },
}

impl FilterMode {
    /// Inner and outer radius of a band, with an inverted pair put back in order.
    pub fn band_radii(&self) -> Option<(u32, u32)> {
        match *self {
            FilterMode::BandPass { low, high } => Some((low.min(high), low.max(high))),
            _ => None,
        }
    }
}

/// Binary pass (1) / block (0) mask over shifted frequency coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    data: Array2<u8>,
}

impl Mask {
    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn as_array(&self) -> &Array2<u8> {
        &self.data
    }

    /// Value at `(row, col)`, if in bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.data.get((row, col)).copied()
    }

    /// Number of coefficients the mask lets through.
    pub fn pass_count(&self) -> usize {
        self.data.iter().filter(|&&v| v == 1).count()
    }

    /// Multiplies `spectrum` element-wise by the mask.
    pub fn apply(&self, spectrum: &Spectrum) -> FilterResult<Spectrum> {
        if spectrum.dim() != self.dim() {
            return Err(FilterError::ShapeMismatch {
                expected: self.dim(),
                actual: spectrum.dim(),
            });
        }
        let mut filtered = spectrum.clone();
        filtered.zip_mut_with(&self.data, |c, &m| *c *= f64::from(m));
        Ok(filtered)
    }
}

/// Inclusive disk membership test for an offset from the mask center.
pub fn disk_contains(dy: i64, dx: i64, radius: u32) -> bool {
    let r = i64::from(radius);
    dy * dy + dx * dx <= r * r
}

/// Builds the mask for `mode` over a `height x width` spectrum.
///
/// Radii larger than the half-diagonal saturate: a low-pass becomes all-pass
/// and a high-pass all-block. A band with equal radii blocks everything.
pub fn build_mask(height: usize, width: usize, mode: FilterMode) -> FilterResult<Mask> {
    check_dimensions(height, width)?;
    let center_row = (height / 2) as i64;
    let center_col = (width / 2) as i64;

    let data = Array2::from_shape_fn((height, width), |(r, c)| {
        let dy = r as i64 - center_row;
        let dx = c as i64 - center_col;
        let pass = match mode {
            FilterMode::LowPass { cutoff } => disk_contains(dy, dx, cutoff),
            FilterMode::HighPass { cutoff } => !disk_contains(dy, dx, cutoff),
            FilterMode::BandPass { low, high } => {
                let (inner, outer) = (low.min(high), low.max(high));
                disk_contains(dy, dx, outer) && !disk_contains(dy, dx, inner)
            }
        };
        u8::from(pass)
    });
    Ok(Mask { data })
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex64;

    #[test]
    fn low_and_high_pass_are_complements() {
        for (h, w, cutoff) in [(32, 32, 5), (17, 40, 9), (1, 1, 1), (64, 48, 100)] {
            let low = build_mask(h, w, FilterMode::LowPass { cutoff }).unwrap();
            let high = build_mask(h, w, FilterMode::HighPass { cutoff }).unwrap();
            let sum = low.as_array() + high.as_array();
            assert!(sum.iter().all(|&v| v == 1), "{h}x{w} r={cutoff}");
        }
    }

    #[test]
    fn band_pass_ignores_radius_order() {
        for (low, high) in [(3, 12), (1, 30), (7, 8), (20, 2)] {
            let a = build_mask(40, 50, FilterMode::BandPass { low, high }).unwrap();
            let b = build_mask(40, 50, FilterMode::BandPass { low: high, high: low }).unwrap();
            assert_eq!(a, b);
        }
        assert_eq!(FilterMode::BandPass { low: 9, high: 4 }.band_radii(), Some((4, 9)));
        assert_eq!(FilterMode::LowPass { cutoff: 4 }.band_radii(), None);
    }

    #[test]
    fn equal_band_radii_block_everything() {
        for r in [1, 5, 25, 200] {
            let mask = build_mask(33, 33, FilterMode::BandPass { low: r, high: r }).unwrap();
            assert_eq!(mask.pass_count(), 0);
        }
    }

    #[test]
    fn disk_boundary_is_inclusive() {
        let mask = build_mask(101, 101, FilterMode::LowPass { cutoff: 10 }).unwrap();
        assert_eq!(mask.get(50, 50), Some(1));
        assert_eq!(mask.get(50 + 10, 50), Some(1));
        assert_eq!(mask.get(50 + 11, 50), Some(0));
        assert_eq!(mask.get(50, 50 - 10), Some(1));
        assert_eq!(mask.get(50, 50 - 11), Some(0));
        // (6, 8) has distance exactly 10
        assert_eq!(mask.get(56, 58), Some(1));
        assert_eq!(mask.get(57, 58), Some(0));
    }

    #[test]
    fn center_follows_floor_division() {
        // even: center at (2, 3); odd: center at (2, 3) too
        for (h, w) in [(4, 6), (5, 7)] {
            let mask = build_mask(h, w, FilterMode::LowPass { cutoff: 0 }).unwrap();
            assert_eq!(mask.pass_count(), 1);
            assert_eq!(mask.get(h / 2, w / 2), Some(1));
        }
    }

    #[test]
    fn oversized_radius_saturates() {
        let low = build_mask(20, 30, FilterMode::LowPass { cutoff: 200 }).unwrap();
        assert_eq!(low.pass_count(), 20 * 30);
        let high = build_mask(20, 30, FilterMode::HighPass { cutoff: 200 }).unwrap();
        assert_eq!(high.pass_count(), 0);
    }

    #[test]
    fn band_pass_keeps_only_the_annulus() {
        let mask = build_mask(41, 41, FilterMode::BandPass { low: 5, high: 10 }).unwrap();
        assert_eq!(mask.get(20, 20), Some(0));
        assert_eq!(mask.get(20, 25), Some(0));
        assert_eq!(mask.get(20, 26), Some(1));
        assert_eq!(mask.get(20, 30), Some(1));
        assert_eq!(mask.get(20, 31), Some(0));
    }

    #[test]
    fn rejects_empty_dimensions() {
        assert!(matches!(
            build_mask(0, 10, FilterMode::LowPass { cutoff: 3 }),
            Err(FilterError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn apply_zeroes_blocked_coefficients() {
        let mask = build_mask(3, 3, FilterMode::LowPass { cutoff: 0 }).unwrap();
        let spectrum = Array2::from_elem((3, 3), Complex64::new(2.0, -1.0));
        let filtered = mask.apply(&spectrum).unwrap();
        assert_eq!(filtered[[1, 1]], Complex64::new(2.0, -1.0));
        assert_eq!(filtered[[0, 0]], Complex64::new(0.0, 0.0));

        let wrong = Array2::from_elem((3, 4), Complex64::new(1.0, 0.0));
        assert!(matches!(
            mask.apply(&wrong),
            Err(FilterError::ShapeMismatch { expected: (3, 3), actual: (3, 4) })
        ));
    }
}

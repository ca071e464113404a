//! Working-precision raster and spectrum types.
//!
//! Arrays are indexed `[row, col]`, i.e. `(height, width)`, row-major.

use crate::error::{FilterError, FilterResult};
use ndarray::{Array2, ArrayView2};
use num_complex::Complex64;

/// Complex Fourier coefficients with the zero-frequency bin at `(height / 2, width / 2)`.
pub type Spectrum = Array2<Complex64>;

/// A single-band real-valued raster with non-empty dimensions.
///
/// The sample range is arbitrary (not bounded to `[0, 255]`). A `Raster` is
/// never mutated once built; a new source replaces it wholesale.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    data: Array2<f64>,
}

impl Raster {
    /// Wraps an array, rejecting empty dimensions.
    pub fn new(data: Array2<f64>) -> FilterResult<Self> {
        let (height, width) = data.dim();
        check_dimensions(height, width)?;
        Ok(Self { data })
    }

    /// Builds a raster from row-major samples.
    pub fn from_shape_vec(height: usize, width: usize, samples: Vec<f64>) -> FilterResult<Self> {
        check_dimensions(height, width)?;
        let actual = samples.len();
        let data = Array2::from_shape_vec((height, width), samples).map_err(|_| {
            FilterError::SampleCount {
                expected: height * width,
                actual,
            }
        })?;
        Ok(Self { data })
    }

    /// Builds a raster by evaluating `f(row, col)` for every sample.
    pub fn from_fn<F>(height: usize, width: usize, f: F) -> FilterResult<Self>
    where
        F: FnMut((usize, usize)) -> f64,
    {
        check_dimensions(height, width)?;
        Ok(Self {
            data: Array2::from_shape_fn((height, width), f),
        })
    }

    /// Takes the element-wise magnitude of a complex array.
    ///
    /// Any imaginary residue (rounding, asymmetric masks) is folded into the
    /// magnitude, and the sign of real samples is lost.
    pub fn magnitude(complex: &Array2<Complex64>) -> FilterResult<Self> {
        Self::new(complex.mapv(|c| c.norm()))
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    /// `(height, width)`
    pub fn dim(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn view(&self) -> ArrayView2<'_, f64> {
        self.data.view()
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn into_inner(self) -> Array2<f64> {
        self.data
    }

    /// Sample at `(row, col)`, if in bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get((row, col)).copied()
    }
}

pub(crate) fn check_dimensions(height: usize, width: usize) -> FilterResult<()> {
    if height == 0 || width == 0 {
        return Err(FilterError::InvalidDimensions { height, width });
    }
    Ok(())
}

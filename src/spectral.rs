//! Centered 2D discrete Fourier transform and its inverse.
//!
//! The forward transform runs a row pass followed by a column pass and then
//! moves the zero-frequency coefficient from `(0, 0)` to
//! `(height / 2, width / 2)`. The inverse undoes the shift first and scales by
//! `1 / (height * width)`, so `inverse(forward(x)) == x` up to rounding.
//!
//! NaN and infinite samples are not screened; they spread through the
//! transform like any other value.

use crate::error::FilterResult;
use crate::raster::{check_dimensions, Raster, Spectrum};
use cancellable_loops::for_each_cancellable;
use ndarray::Array2;
use num_complex::Complex64;
use rustfft::{FftDirection, FftPlanner};
use std::fmt;
use std::sync::atomic::AtomicBool;

/// Cyclically shifts an array so that index `(0, 0)` lands on `(height / 2, width / 2)`.
///
/// Equivalent to swapping diagonally opposite quadrants.
pub fn fft_shift<T: Clone>(input: &Array2<T>) -> Array2<T> {
    let (h, w) = input.dim();
    Array2::from_shape_fn((h, w), |(r, c)| {
        input[[(r + h - h / 2) % h, (c + w - w / 2) % w]].clone()
    })
}

/// Exact inverse of [`fft_shift`], also for odd dimensions.
pub fn ifft_shift<T: Clone>(input: &Array2<T>) -> Array2<T> {
    let (h, w) = input.dim();
    Array2::from_shape_fn((h, w), |(r, c)| input[[(r + h / 2) % h, (c + w / 2) % w]].clone())
}

/// Forward/inverse 2D FFT with a reusable plan cache.
pub struct SpectralTransform {
    planner: FftPlanner<f64>,
}

impl Default for SpectralTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SpectralTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectralTransform").finish_non_exhaustive()
    }
}

impl SpectralTransform {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Computes the centered spectrum of `raster`.
    pub fn forward(&mut self, raster: &Raster) -> Spectrum {
        let never = AtomicBool::new(false);
        match self.forward_cancellable(raster, &never) {
            Ok(spectrum) => spectrum,
            Err(_) => unreachable!("nothing can raise a local abort flag"),
        }
    }

    /// Like [`forward`](Self::forward), but gives up with
    /// [`FilterError::Cancelled`](crate::FilterError::Cancelled) once `abort_flag` is raised.
    pub fn forward_cancellable(
        &mut self,
        raster: &Raster,
        abort_flag: &AtomicBool,
    ) -> FilterResult<Spectrum> {
        let (height, width) = raster.dim();
        let mut buffer: Vec<Complex64> = raster
            .view()
            .iter()
            .map(|&v| Complex64::new(v, 0.0))
            .collect();
        self.process_2d(&mut buffer, height, width, FftDirection::Forward, abort_flag)?;
        let unshifted = Array2::from_shape_vec((height, width), buffer)
            .map_err(|_| crate::FilterError::InvalidDimensions { height, width })?;
        Ok(fft_shift(&unshifted))
    }

    /// Recovers the complex spatial-domain raster from a centered spectrum.
    ///
    /// The caller takes the magnitude (see [`Raster::magnitude`]).
    pub fn inverse(&mut self, spectrum: &Spectrum) -> FilterResult<Array2<Complex64>> {
        let never = AtomicBool::new(false);
        self.inverse_cancellable(spectrum, &never)
    }

    pub fn inverse_cancellable(
        &mut self,
        spectrum: &Spectrum,
        abort_flag: &AtomicBool,
    ) -> FilterResult<Array2<Complex64>> {
        let (height, width) = spectrum.dim();
        check_dimensions(height, width)?;

        let mut buffer = ifft_shift(spectrum).into_raw_vec_and_offset().0;
        self.process_2d(&mut buffer, height, width, FftDirection::Inverse, abort_flag)?;

        let scale = 1.0 / (height * width) as f64;
        buffer.iter_mut().for_each(|c| *c *= scale);
        Array2::from_shape_vec((height, width), buffer)
            .map_err(|_| crate::FilterError::InvalidDimensions { height, width })
    }

    /// In-place unnormalized 2D FFT on a row-major buffer.
    fn process_2d(
        &mut self,
        buffer: &mut [Complex64],
        height: usize,
        width: usize,
        direction: FftDirection,
        abort_flag: &AtomicBool,
    ) -> FilterResult<()> {
        let row_fft = self.planner.plan_fft(width, direction);
        let col_fft = self.planner.plan_fft(height, direction);
        let scratch_len = row_fft
            .get_inplace_scratch_len()
            .max(col_fft.get_inplace_scratch_len());
        let mut scratch = vec![Complex64::default(); scratch_len];

        for_each_cancellable(buffer.chunks_exact_mut(width), abort_flag, |row| {
            row_fft.process_with_scratch(row, &mut scratch);
        })?;

        let mut column = vec![Complex64::default(); height];
        for_each_cancellable(0..width, abort_flag, |col| {
            for (r, value) in column.iter_mut().enumerate() {
                *value = buffer[r * width + col];
            }
            col_fft.process_with_scratch(&mut column, &mut scratch);
            for (r, value) in column.iter().enumerate() {
                buffer[r * width + col] = *value;
            }
        })?;
        Ok(())
    }
}

/// `ln(1 + |F|)` of a spectrum, the usual way to look at one.
pub fn log_magnitude(spectrum: &Spectrum) -> FilterResult<Raster> {
    Raster::new(spectrum.mapv(|c| c.norm().ln_1p()))
}

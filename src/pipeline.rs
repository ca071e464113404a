//! One filtering pass: forward transform, mask, inverse transform, magnitude,
//! display stretch.

use crate::config::FilterConfig;
use crate::error::FilterResult;
use crate::mask::{build_mask, Mask};
use crate::normalize::{normalize, DisplayBuffer};
use crate::raster::Raster;
use crate::spectral::SpectralTransform;
use std::sync::atomic::AtomicBool;
use std::time::Instant;

/// Everything a single pass produces.
#[derive(Clone, Debug)]
pub struct FilterOutput {
    pub mask: Mask,
    /// Magnitude of the inverse transform, before the display stretch
    pub reconstructed: Raster,
    pub display: DisplayBuffer,
}

/// Runs filtering passes, reusing FFT plans between calls.
#[derive(Debug, Default)]
pub struct FftFilter {
    transform: SpectralTransform,
}

impl FftFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters `raster` with `config`. The raster is only read.
    pub fn apply(&mut self, raster: &Raster, config: &FilterConfig) -> FilterResult<FilterOutput> {
        let never = AtomicBool::new(false);
        self.apply_cancellable(raster, config, &never)
    }

    /// Like [`apply`](Self::apply), but aborts with
    /// [`FilterError::Cancelled`](crate::FilterError::Cancelled) once
    /// `abort_flag` is raised.
    pub fn apply_cancellable(
        &mut self,
        raster: &Raster,
        config: &FilterConfig,
        abort_flag: &AtomicBool,
    ) -> FilterResult<FilterOutput> {
        let start = Instant::now();
        let (height, width) = raster.dim();
        let mode = config.filter_mode();

        let spectrum = self.transform.forward_cancellable(raster, abort_flag)?;
        let mask = build_mask(height, width, mode)?;
        let filtered = mask.apply(&spectrum)?;
        let complex = self.transform.inverse_cancellable(&filtered, abort_flag)?;
        let reconstructed = Raster::magnitude(&complex)?;
        let display = normalize(&reconstructed);

        log::debug!(
            "filtered {height}x{width} raster with {mode:?} ({} of {} coefficients kept). This took {:?}",
            mask.pass_count(),
            height * width,
            start.elapsed()
        );
        Ok(FilterOutput {
            mask,
            reconstructed,
            display,
        })
    }
}

/// Stateless `(Raster, FilterConfig) -> DisplayBuffer` entry point.
pub fn apply_filter(raster: &Raster, config: &FilterConfig) -> FilterResult<DisplayBuffer> {
    FftFilter::new()
        .apply(raster, config)
        .map(|output| output.display)
}

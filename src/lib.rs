//! Frequency-domain filtering of single-band rasters.
//!
//! A pass computes the centered 2D spectrum of a [`Raster`], multiplies it by
//! a radial [`Mask`] (low-pass, high-pass or band-pass), transforms back,
//! takes the magnitude and stretches the result to an 8-bit
//! [`DisplayBuffer`]:
//!
//! ```no_run
//! use fft_image_filter::{apply_filter, FilterConfig, Raster};
//!
//! let raster = Raster::from_fn(64, 64, |(r, c)| (r * c) as f64).unwrap();
//! let display = apply_filter(&raster, &FilterConfig::low_pass(5)).unwrap();
//! assert_eq!(display.dim(), (64, 64));
//! ```
//!
//! Hosts that keep a raster around use [`Session`]; hosts that want the pass
//! off their UI thread use the worker in [`data_thread`].

pub mod config;
pub mod data_thread;
mod error;
pub mod io;
pub mod mask;
pub mod normalize;
pub mod pipeline;
pub mod raster;
pub mod session;
pub mod spectral;

pub use config::{ConfigCommand, FilterConfig, FilterKind, RadiusRange};
pub use error::{FilterError, FilterResult};
pub use mask::{build_mask, FilterMode, Mask};
pub use normalize::{normalize, DisplayBuffer};
pub use pipeline::{apply_filter, FftFilter, FilterOutput};
pub use raster::{Raster, Spectrum};
pub use session::Session;
pub use spectral::SpectralTransform;

//! Filter settings as a host UI holds them, plus the command set understood
//! by the worker thread.

use crate::error::{FilterError, FilterResult};
use crate::mask::FilterMode;
use crate::raster::Raster;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Which of the three filter topologies is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterKind {
    #[default]
    LowPass,
    HighPass,
    BandPass,
}

impl Display for FilterKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterKind::LowPass => write!(f, "Low-Pass Filter"),
            FilterKind::HighPass => write!(f, "High-Pass Filter"),
            FilterKind::BandPass => write!(f, "Band-Pass Filter"),
        }
    }
}

/// Inclusive slider range for radius controls.
///
/// Restricting radii is a presentation concern: the mask engine accepts any
/// integer, this only exists so hosts share the same bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RadiusRange {
    pub min: u32,
    pub max: u32,
}

impl Default for RadiusRange {
    fn default() -> Self {
        RadiusRange { min: 1, max: 200 }
    }
}

impl RadiusRange {
    pub fn clamp(&self, radius: u32) -> u32 {
        radius.clamp(self.min.min(self.max), self.max.max(self.min))
    }

    pub fn contains(&self, radius: u32) -> bool {
        (self.min..=self.max).contains(&radius)
    }
}

/// The active mode and every radius control.
///
/// All three radii are kept while the mode toggles, so switching back to a
/// mode restores its previous radius.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub kind: FilterKind,
    /// Low-/high-pass radius
    pub cutoff: u32,
    /// Band-pass lower radius
    pub band_low: u32,
    /// Band-pass upper radius
    pub band_high: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            kind: FilterKind::LowPass,
            cutoff: 40,
            band_low: 20,
            band_high: 60,
        }
    }
}

impl FilterConfig {
    pub fn low_pass(cutoff: u32) -> Self {
        FilterConfig {
            kind: FilterKind::LowPass,
            cutoff,
            ..Default::default()
        }
    }

    pub fn high_pass(cutoff: u32) -> Self {
        FilterConfig {
            kind: FilterKind::HighPass,
            cutoff,
            ..Default::default()
        }
    }

    pub fn band_pass(low: u32, high: u32) -> Self {
        FilterConfig {
            kind: FilterKind::BandPass,
            band_low: low,
            band_high: high,
            ..Default::default()
        }
    }

    /// The tagged mode the mask engine works with.
    pub fn filter_mode(&self) -> FilterMode {
        match self.kind {
            FilterKind::LowPass => FilterMode::LowPass {
                cutoff: self.cutoff,
            },
            FilterKind::HighPass => FilterMode::HighPass {
                cutoff: self.cutoff,
            },
            FilterKind::BandPass => FilterMode::BandPass {
                low: self.band_low,
                high: self.band_high,
            },
        }
    }

    /// Checks that the radii used by the active mode are positive.
    ///
    /// An inverted band is not an error; the mask engine reorders it.
    pub fn validate(&self) -> FilterResult<()> {
        let has_zero = match self.kind {
            FilterKind::LowPass | FilterKind::HighPass => self.cutoff == 0,
            FilterKind::BandPass => self.band_low == 0 || self.band_high == 0,
        };
        if has_zero {
            return Err(FilterError::InvalidRadius(0));
        }
        Ok(())
    }

    /// Copy with every radius clamped into `range`.
    pub fn clamped(&self, range: &RadiusRange) -> Self {
        FilterConfig {
            kind: self.kind,
            cutoff: range.clamp(self.cutoff),
            band_low: range.clamp(self.band_low),
            band_high: range.clamp(self.band_high),
        }
    }
}

/// Requests sent to the worker thread.
#[derive(Debug)]
pub enum ConfigCommand {
    OpenFile(PathBuf),
    LoadRaster(Raster),
    SetKind(FilterKind),
    SetCutoff(u32),
    SetBandLow(u32),
    SetBandHigh(u32),
    SetConfig(FilterConfig),
    Quit,
}

impl ConfigCommand {
    /// Applies a parameter command to `config`. Returns `false` for commands
    /// that do not touch the filter settings.
    pub fn update(&self, config: &mut FilterConfig) -> bool {
        match self {
            ConfigCommand::SetKind(kind) => config.kind = *kind,
            ConfigCommand::SetCutoff(r) => config.cutoff = *r,
            ConfigCommand::SetBandLow(r) => config.band_low = *r,
            ConfigCommand::SetBandHigh(r) => config.band_high = *r,
            ConfigCommand::SetConfig(c) => *config = *c,
            ConfigCommand::OpenFile(_) | ConfigCommand::LoadRaster(_) | ConfigCommand::Quit => {
                return false
            }
        }
        true
    }
}

//! The state a host keeps between filtering passes: the loaded raster and the
//! current filter settings.

use crate::config::{ConfigCommand, FilterConfig};
use crate::error::FilterResult;
use crate::io::open_raster;
use crate::normalize::{normalize, DisplayBuffer};
use crate::pipeline::{FftFilter, FilterOutput};
use crate::raster::Raster;
use std::path::Path;
use std::sync::atomic::AtomicBool;

/// Loaded source plus the active [`FilterConfig`].
///
/// Only one raster is live at a time. Loading replaces it wholesale, and a
/// failed load or filter pass leaves the previous one untouched.
#[derive(Debug, Default)]
pub struct Session {
    source: Option<Source>,
    config: FilterConfig,
    filter: FftFilter,
}

#[derive(Debug)]
struct Source {
    raster: Raster,
    display: DisplayBuffer,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FilterConfig) -> Self {
        Session {
            config,
            ..Default::default()
        }
    }

    /// Replaces the current raster and returns its display rendering.
    pub fn load(&mut self, raster: Raster) -> &DisplayBuffer {
        let display = normalize(&raster);
        let source = self.source.insert(Source { raster, display });
        &source.display
    }

    /// Loads a raster from disk. On failure the current raster is kept.
    pub fn open(&mut self, path: &Path) -> FilterResult<&DisplayBuffer> {
        let raster = open_raster(path)?;
        Ok(self.load(raster))
    }

    pub fn raster(&self) -> Option<&Raster> {
        self.source.as_ref().map(|s| &s.raster)
    }

    /// Display rendering of the loaded raster itself.
    pub fn input_display(&self) -> Option<&DisplayBuffer> {
        self.source.as_ref().map(|s| &s.display)
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: FilterConfig) {
        self.config = config;
    }

    /// Applies a parameter command; `true` if the settings were touched.
    pub fn update(&mut self, command: &ConfigCommand) -> bool {
        command.update(&mut self.config)
    }

    /// Filters the loaded raster with the current settings.
    ///
    /// `Ok(None)` if nothing is loaded yet.
    pub fn refresh(&mut self) -> FilterResult<Option<FilterOutput>> {
        let never = AtomicBool::new(false);
        self.refresh_cancellable(&never)
    }

    pub fn refresh_cancellable(
        &mut self,
        abort_flag: &AtomicBool,
    ) -> FilterResult<Option<FilterOutput>> {
        let Some(source) = &self.source else {
            return Ok(None);
        };
        self.filter
            .apply_cancellable(&source.raster, &self.config, abort_flag)
            .map(Some)
    }
}

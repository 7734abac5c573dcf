//! Signal conditioning pipeline
//!
//! Orchestrates the stages on a loaded dataset:
//! 1. Column sanitation (extra named columns, all-zero channels)
//! 2. Min-max normalization
//! 3. Butterworth bandpass design and single-pass filtering
//!
//! Spectra are computed separately per channel, on whichever stage output
//! the caller wants to inspect.

use crate::design::design_bandpass;
use crate::error::{EegError, Result};
use crate::filter::apply_to_dataset;
use crate::normalize::normalize;
use crate::profiling::ProfileScope;
use crate::sanitize::{drop_columns, drop_zero_columns};
use crate::spectral::{periodogram_with, Detrend, PeriodogramConfig, Scaling, WindowKind};
use crate::types::{Dataset, FilterCoefficients, FilterSpec, Spectrum};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for the conditioning pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Low cutoff of the bandpass (Hz)
    #[serde(default = "default_low_cutoff")]
    pub low_cutoff: f64,

    /// High cutoff of the bandpass (Hz)
    #[serde(default = "default_high_cutoff")]
    pub high_cutoff: f64,

    /// Sampling rate the filter is designed for (Hz)
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,

    /// Order of the resulting bandpass filter
    #[serde(default = "default_order")]
    pub order: usize,

    #[serde(default = "default_true")]
    pub normalize: bool,

    #[serde(default = "default_true")]
    pub drop_zero_columns: bool,

    /// Additional columns to remove before normalization
    #[serde(default)]
    pub dropped_columns: Vec<String>,

    /// Sampling rate used for spectral estimates (Hz)
    #[serde(default = "default_spectrum_sample_rate")]
    pub spectrum_sample_rate: f64,

    #[serde(default)]
    pub window: WindowKind,

    #[serde(default)]
    pub scaling: Scaling,

    #[serde(default)]
    pub detrend: Detrend,
}

fn default_low_cutoff() -> f64 {
    0.5
}
fn default_high_cutoff() -> f64 {
    5.0
}
fn default_sample_rate() -> f64 {
    128.0
}
fn default_order() -> usize {
    4
}
fn default_true() -> bool {
    true
}
fn default_spectrum_sample_rate() -> f64 {
    512.0
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            low_cutoff: default_low_cutoff(),
            high_cutoff: default_high_cutoff(),
            sample_rate: default_sample_rate(),
            order: default_order(),
            normalize: true,
            drop_zero_columns: true,
            dropped_columns: Vec::new(),
            spectrum_sample_rate: default_spectrum_sample_rate(),
            window: WindowKind::default(),
            scaling: Scaling::default(),
            detrend: Detrend::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn filter_spec(&self) -> FilterSpec {
        FilterSpec::new(self.low_cutoff, self.high_cutoff, self.sample_rate, self.order)
    }

    pub fn periodogram_config(&self) -> PeriodogramConfig {
        PeriodogramConfig {
            sample_rate: self.spectrum_sample_rate,
            window: self.window,
            scaling: self.scaling,
            detrend: self.detrend,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.filter_spec().validate()?;
        if !self.spectrum_sample_rate.is_finite() || self.spectrum_sample_rate <= 0.0 {
            return Err(EegError::InvalidSpec(format!(
                "Spectrum sampling rate must be positive, got {}",
                self.spectrum_sample_rate
            )));
        }
        Ok(())
    }
}

/// Result of running the pipeline over one dataset
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutput {
    /// Sanitized and normalized channels, before filtering
    pub conditioned: Dataset,
    /// Filtered channels
    pub filtered: Dataset,
    pub coefficients: FilterCoefficients,
    /// Processing time in milliseconds
    pub processing_time_ms: f64,
}

/// Sanitation and normalization stages
pub fn condition(dataset: Dataset, config: &PipelineConfig) -> Result<Dataset> {
    let mut dataset = drop_columns(dataset, &config.dropped_columns[..]);
    if config.drop_zero_columns {
        dataset = drop_zero_columns(dataset);
    }
    if config.normalize {
        dataset = normalize(dataset)?;
    }
    Ok(dataset)
}

/// Run sanitation, normalization and bandpass filtering
pub fn run_pipeline(dataset: Dataset, config: &PipelineConfig) -> Result<PipelineOutput> {
    let scope = ProfileScope::new("run_pipeline");
    config.validate()?;

    let coefficients = design_bandpass(
        config.low_cutoff,
        config.high_cutoff,
        config.sample_rate,
        config.order,
    )?;

    let conditioned = condition(dataset, config)?;
    let filtered = apply_to_dataset(&coefficients, conditioned.clone());

    Ok(PipelineOutput {
        conditioned,
        filtered,
        coefficients,
        processing_time_ms: scope.elapsed_ms(),
    })
}

/// Periodogram of the channel called `name`
pub fn channel_spectrum(dataset: &Dataset, name: &str, config: &PipelineConfig) -> Result<Spectrum> {
    let channel = dataset
        .channel(name)
        .ok_or_else(|| EegError::ChannelNotFound(name.to_string()))?;
    periodogram_with(&channel.samples, &config.periodogram_config())
}

/// Periodogram of every channel, in channel order
pub fn channel_spectra(dataset: &Dataset, config: &PipelineConfig) -> Result<Vec<(String, Spectrum)>> {
    crate::profile_scope!("channel_spectra");
    let periodogram = config.periodogram_config();
    dataset
        .channels()
        .par_iter()
        .map(|c| periodogram_with(&c.samples, &periodogram).map(|s| (c.name.clone(), s)))
        .collect()
}

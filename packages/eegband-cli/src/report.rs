use eegband_rs::{
    run_pipeline, Dataset, DeviceProfile, FilterCoefficients, PipelineConfig, PipelineOutput,
    Recording, Spectrum,
};
use serde::Serialize;
use uuid::Uuid;

/// Filtered recording as written by `filter` and `batch`
#[derive(Debug, Serialize)]
pub struct FilterReport {
    pub id: String,
    pub created_at: String,
    pub source: String,
    pub profile: DeviceProfile,
    pub config: PipelineConfig,
    pub coefficients: FilterCoefficients,
    pub processing_time_ms: f64,
    pub dataset: Dataset,
}

impl FilterReport {
    pub fn new(source: &str, profile: DeviceProfile, config: PipelineConfig, output: PipelineOutput) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            source: source.to_string(),
            profile,
            config,
            coefficients: output.coefficients,
            processing_time_ms: output.processing_time_ms,
            dataset: output.filtered,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChannelSpectrum {
    pub channel: String,
    /// Frequency of the strongest non-DC bin
    pub peak_frequency: Option<f64>,
    pub frequencies: Vec<f64>,
    pub power: Vec<f64>,
}

impl ChannelSpectrum {
    pub fn new(channel: String, spectrum: Spectrum) -> Self {
        Self {
            channel,
            peak_frequency: spectrum.dominant().map(|(f, _)| f),
            frequencies: spectrum.frequencies,
            power: spectrum.power,
        }
    }
}

/// Periodograms written by `spectrum`
#[derive(Debug, Serialize)]
pub struct SpectrumReport {
    pub id: String,
    pub created_at: String,
    pub source: String,
    pub filtered: bool,
    pub config: PipelineConfig,
    pub spectra: Vec<ChannelSpectrum>,
}

impl SpectrumReport {
    pub fn new(source: &str, filtered: bool, config: PipelineConfig, spectra: Vec<ChannelSpectrum>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            source: source.to_string(),
            filtered,
            config,
            spectra,
        }
    }
}

/// Run the pipeline on a loaded recording and wrap the result.
pub fn filter_recording(source: &str, recording: Recording, config: &PipelineConfig) -> Result<FilterReport, String> {
    let profile = recording.profile;
    let output = run_pipeline(recording.dataset, config).map_err(|e| e.to_string())?;
    Ok(FilterReport::new(source, profile, config.clone(), output))
}

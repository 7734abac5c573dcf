use crate::cli::FilterOptions;
use eegband_rs::{load_recording, PipelineConfig, Recording, Scaling, WindowKind};
use std::path::Path;

const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "txt"];

/// Validate a single file path: existence and supported extension.
pub fn validate_file(file_path: &str) -> Result<(), String> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("Input file not found: {}", file_path));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(format!(
            "Unsupported file extension '{}'. Supported: {}",
            ext,
            SUPPORTED_EXTENSIONS.join(", ")
        ));
    }

    Ok(())
}

/// Build the pipeline configuration: defaults, then the config file, then flags.
pub fn resolve_config(options: &FilterOptions) -> Result<PipelineConfig, String> {
    let mut config = match options.config {
        Some(ref path) => PipelineConfig::from_json_file(path)
            .map_err(|e| format!("Failed to load config '{}': {}", path, e))?,
        None => PipelineConfig::default(),
    };

    if let Some(low) = options.low {
        config.low_cutoff = low;
    }
    if let Some(high) = options.high {
        config.high_cutoff = high;
    }
    if let Some(sr) = options.sr {
        config.sample_rate = sr;
    }
    if let Some(order) = options.order {
        config.order = order;
    }
    if options.no_normalize {
        config.normalize = false;
    }

    config.validate().map_err(|e| e.to_string())?;
    log::debug!("Resolved pipeline config: {:?}", config);
    Ok(config)
}

/// Apply spectrum-only overrides on top of a resolved config.
pub fn apply_spectrum_overrides(
    config: &mut PipelineConfig,
    spectrum_sr: Option<f64>,
    window: Option<&str>,
    scaling: Option<&str>,
) -> Result<(), String> {
    if let Some(sr) = spectrum_sr {
        config.spectrum_sample_rate = sr;
    }
    if let Some(name) = window {
        config.window = name.parse::<WindowKind>().map_err(|e| e.to_string())?;
    }
    if let Some(name) = scaling {
        config.scaling = name.parse::<Scaling>().map_err(|e| e.to_string())?;
    }
    config.validate().map_err(|e| e.to_string())
}

/// Validate the path and load the recording behind it.
pub fn open_recording(file_path: &str) -> Result<Recording, String> {
    validate_file(file_path)?;
    load_recording(file_path).map_err(|e| format!("Failed to read '{}': {}", file_path, e))
}

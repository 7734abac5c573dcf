use eegband_rs::Dataset;
use std::io::Write;
use std::path::Path;

/// Write a rendered document to stdout or a file.
pub fn write_output(text: &str, output_path: Option<&str>) -> Result<(), String> {
    match output_path {
        Some(path) => std::fs::write(Path::new(path), text)
            .map_err(|e| format!("Failed to write output file '{}': {}", path, e)),
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(text.as_bytes())
                .and_then(|_| {
                    if text.ends_with('\n') {
                        Ok(())
                    } else {
                        handle.write_all(b"\n")
                    }
                })
                .map_err(|e| format!("Failed to write to stdout: {}", e))
        }
    }
}

/// Serialize a value to JSON (pretty or compact).
pub fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String, String> {
    if compact {
        serde_json::to_string(value).map_err(|e| format!("JSON serialization failed: {}", e))
    } else {
        serde_json::to_string_pretty(value)
            .map_err(|e| format!("JSON serialization failed: {}", e))
    }
}

/// Render a dataset as comma-separated text, one row per sample.
///
/// The time column comes first when the dataset carries one.
pub fn to_csv(dataset: &Dataset, time_header: &str) -> Result<String, String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header: Vec<&str> = Vec::with_capacity(dataset.num_channels() + 1);
    if dataset.time().is_some() {
        header.push(time_header);
    }
    header.extend(dataset.channel_names());
    writer
        .write_record(&header)
        .map_err(|e| format!("CSV serialization failed: {}", e))?;

    for row in 0..dataset.len_samples() {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        if let Some(time) = dataset.time() {
            record.push(time[row].to_string());
        }
        record.extend(dataset.channels().iter().map(|c| c.samples[row].to_string()));
        writer
            .write_record(&record)
            .map_err(|e| format!("CSV serialization failed: {}", e))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| format!("CSV serialization failed: {}", e))?;
    String::from_utf8(bytes).map_err(|e| format!("CSV serialization failed: {}", e))
}

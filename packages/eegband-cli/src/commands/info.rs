use crate::cli::InfoArgs;
use crate::exit_codes;
use crate::output;
use crate::params;
use eegband_rs::DeviceProfile;
use serde::Serialize;

#[derive(Serialize)]
struct InfoOutput {
    cli_version: String,
    file: String,
    profile: DeviceProfile,
    source_columns: Vec<String>,
    channels: Vec<String>,
    dropped_columns: Vec<String>,
    num_samples: usize,
    has_time: bool,
}

pub fn execute(args: InfoArgs) -> i32 {
    let recording = match params::open_recording(&args.file) {
        Ok(r) => r,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    let channels: Vec<String> = recording
        .dataset
        .channel_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let dropped_columns = recording
        .source_columns
        .iter()
        .filter(|c| !recording.dataset.contains(c))
        .cloned()
        .collect();

    let info = InfoOutput {
        cli_version: env!("CARGO_PKG_VERSION").to_string(),
        file: args.file.clone(),
        profile: recording.profile,
        num_samples: recording.dataset.len_samples(),
        has_time: recording.dataset.time().is_some(),
        source_columns: recording.source_columns,
        channels,
        dropped_columns,
    };

    if args.json {
        match output::to_json(&info, false) {
            Ok(json) => {
                if let Err(e) = output::write_output(&json, None) {
                    eprintln!("Error: {}", e);
                    return exit_codes::EXECUTION_ERROR;
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return exit_codes::EXECUTION_ERROR;
            }
        }
    } else {
        println!("File: {}", info.file);
        println!("Profile: {}", info.profile.name());
        println!("Samples: {}", info.num_samples);
        println!();
        println!("Channels ({}): {}", info.channels.len(), info.channels.join(", "));
        if info.dropped_columns.is_empty() {
            println!("Dropped: none");
        } else {
            println!("Dropped: {}", info.dropped_columns.join(", "));
        }
    }

    exit_codes::SUCCESS
}

use crate::cli::{FilterArgs, OutputFormat};
use crate::exit_codes;
use crate::output;
use crate::params;
use crate::report::{self, FilterReport};

pub fn execute(args: FilterArgs) -> i32 {
    let config = match params::resolve_config(&args.filter) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    let recording = match params::open_recording(&args.file) {
        Ok(r) => r,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    if !args.quiet {
        eprintln!(
            "Filtering {} channel(s) of {} ({} profile), {}-{} Hz order {}...",
            recording.dataset.num_channels(),
            args.file,
            recording.profile.name(),
            config.low_cutoff,
            config.high_cutoff,
            config.order
        );
    }

    let report = match report::filter_recording(&args.file, recording, &config) {
        Ok(r) => r,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::EXECUTION_ERROR;
        }
    };

    let rendered = match render(&report, args.format, args.compact) {
        Ok(text) => text,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::EXECUTION_ERROR;
        }
    };

    if let Err(msg) = output::write_output(&rendered, args.output.as_deref()) {
        eprintln!("Error: {}", msg);
        return exit_codes::EXECUTION_ERROR;
    }

    if !args.quiet {
        eprintln!("Done in {:.1}ms", report.processing_time_ms);
    }

    exit_codes::SUCCESS
}

/// Serialize a filter report in the requested format.
pub fn render(report: &FilterReport, format: OutputFormat, compact: bool) -> Result<String, String> {
    match format {
        OutputFormat::Json => output::to_json(report, compact),
        OutputFormat::Csv => {
            let time_header = report.profile.time_column().unwrap_or("time");
            output::to_csv(&report.dataset, time_header)
        }
    }
}

use crate::cli::SpectrumArgs;
use crate::exit_codes;
use crate::output;
use crate::params;
use crate::report::{ChannelSpectrum, SpectrumReport};
use eegband_rs::{channel_spectra, channel_spectrum, run_pipeline, EegError};

pub fn execute(args: SpectrumArgs) -> i32 {
    let mut config = match params::resolve_config(&args.filter) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };
    if let Err(msg) = params::apply_spectrum_overrides(
        &mut config,
        args.spectrum_sr,
        args.window.as_deref(),
        args.scaling.as_deref(),
    ) {
        eprintln!("Error: {}", msg);
        return exit_codes::INPUT_ERROR;
    }

    let recording = match params::open_recording(&args.file) {
        Ok(r) => r,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    let pipeline = match run_pipeline(recording.dataset, &config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    };
    let dataset = if args.raw {
        &pipeline.conditioned
    } else {
        &pipeline.filtered
    };

    let spectra = match args.channel {
        Some(ref name) => channel_spectrum(dataset, name, &config)
            .map(|s| vec![ChannelSpectrum::new(name.clone(), s)]),
        None => channel_spectra(dataset, &config).map(|all| {
            all.into_iter()
                .map(|(name, s)| ChannelSpectrum::new(name, s))
                .collect::<Vec<_>>()
        }),
    };
    let spectra = match spectra {
        Ok(s) => s,
        Err(e @ EegError::ChannelNotFound(_)) => {
            eprintln!("Error: {}", e);
            eprintln!("Available channels: {}", dataset.channel_names().join(", "));
            return exit_codes::INPUT_ERROR;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    };

    let report = SpectrumReport::new(&args.file, !args.raw, config, spectra);
    match output::to_json(&report, args.compact) {
        Ok(json) => {
            if let Err(msg) = output::write_output(&json, args.output.as_deref()) {
                eprintln!("Error: {}", msg);
                return exit_codes::EXECUTION_ERROR;
            }
        }
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::EXECUTION_ERROR;
        }
    }

    exit_codes::SUCCESS
}

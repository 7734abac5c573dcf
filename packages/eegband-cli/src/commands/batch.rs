use crate::cli::{BatchArgs, OutputFormat};
use crate::commands::filter;
use crate::exit_codes;
use crate::output;
use crate::params;
use crate::report;
use eegband_rs::PipelineConfig;
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;

pub fn execute(args: BatchArgs) -> i32 {
    // Resolve file list
    let files = match resolve_files(&args) {
        Ok(f) => f,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    if files.is_empty() {
        eprintln!("Error: No matching files found");
        return exit_codes::INPUT_ERROR;
    }

    // Dry-run mode: print file list and exit
    if args.dry_run {
        for f in &files {
            println!("{}", f);
        }
        if !args.quiet {
            eprintln!("Found {} file(s)", files.len());
        }
        return exit_codes::SUCCESS;
    }

    let config = match params::resolve_config(&args.filter) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    if let Some(ref dir) = args.output_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Error: Failed to create output directory '{}': {}", dir, e);
            return exit_codes::EXECUTION_ERROR;
        }
    }

    let total = files.len();
    let mut succeeded = 0usize;
    let mut failed = 0usize;
    let start_time = Instant::now();

    if args.continue_on_error {
        // Files run in parallel; each worker writes its own output and only
        // the rendered stdout line (if any) is kept until the ordered flush.
        let results: Vec<Result<Option<String>, String>> = files
            .par_iter()
            .map(|file_path| process_and_write(file_path, &config, &args))
            .collect();

        for (i, (file_path, result)) in files.iter().zip(results).enumerate() {
            if !args.quiet {
                eprintln!("[{}/{}] {}...", i + 1, total, file_path);
            }
            match result.and_then(|line| emit(line.as_deref())) {
                Ok(()) => succeeded += 1,
                Err(msg) => {
                    eprintln!("  Error: {}", msg);
                    failed += 1;
                }
            }
        }
    } else {
        for (i, file_path) in files.iter().enumerate() {
            if !args.quiet {
                eprintln!("[{}/{}] {}...", i + 1, total, file_path);
            }
            let result = process_and_write(file_path, &config, &args)
                .and_then(|line| emit(line.as_deref()));
            match result {
                Ok(()) => succeeded += 1,
                Err(msg) => {
                    eprintln!("  Error: {}", msg);
                    failed += 1;
                    break;
                }
            }
        }
    }

    let elapsed = start_time.elapsed();

    if !args.quiet {
        eprintln!(
            "Batch complete: {}/{} succeeded, {}/{} failed, {:.1}s",
            succeeded,
            total,
            failed,
            total,
            elapsed.as_secs_f64()
        );
    }

    if failed == 0 {
        exit_codes::SUCCESS
    } else if succeeded > 0 {
        exit_codes::PARTIAL_FAILURE
    } else {
        exit_codes::EXECUTION_ERROR
    }
}

/// Filter one file. With `--output-dir` the result is written right away and
/// `None` is returned; otherwise the compact JSON line for stdout is returned.
fn process_and_write(
    file_path: &str,
    config: &PipelineConfig,
    args: &BatchArgs,
) -> Result<Option<String>, String> {
    let recording = params::open_recording(file_path)?;
    let report = report::filter_recording(file_path, recording, config)?;

    match args.output_dir {
        Some(ref dir) => {
            let out_path = output_path(dir, file_path, args.format);
            let rendered = filter::render(&report, args.format, false)?;
            output::write_output(&rendered, out_path.to_str())?;
            Ok(None)
        }
        // JSONL to stdout
        None => output::to_json(&report, true).map(Some),
    }
}

fn emit(line: Option<&str>) -> Result<(), String> {
    match line {
        Some(json) => output::write_output(json, None),
        None => Ok(()),
    }
}

fn output_path(dir: &str, file_path: &str, format: OutputFormat) -> std::path::PathBuf {
    let stem = Path::new(file_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let ext = match format {
        OutputFormat::Json => "json",
        OutputFormat::Csv => "csv",
    };
    Path::new(dir).join(format!("{}_filtered.{}", stem, ext))
}

fn resolve_files(args: &BatchArgs) -> Result<Vec<String>, String> {
    if let Some(ref pattern) = args.glob {
        resolve_glob(pattern)
    } else if let Some(ref files) = args.files {
        Ok(files.clone())
    } else {
        Err("One of --glob or --files must be specified".to_string())
    }
}

fn resolve_glob(pattern: &str) -> Result<Vec<String>, String> {
    let paths = glob::glob(pattern)
        .map_err(|e| format!("Invalid glob pattern '{}': {}", pattern, e))?;

    let mut files: Vec<String> = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    if let Some(s) = path.to_str() {
                        files.push(s.to_string());
                    }
                }
            }
            Err(e) => {
                log::warn!("glob error: {}", e);
            }
        }
    }
    files.sort();
    Ok(files)
}

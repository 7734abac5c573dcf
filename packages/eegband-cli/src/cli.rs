use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "eegband",
    version,
    about = "EEG bandpass filtering and spectral inspection tool",
    long_about = "Condition EEG recordings exported as delimited text (CSV/TXT).\n\
                  Drops bookkeeping and all-zero columns, min-max normalizes each channel,\n\
                  applies a causal Butterworth bandpass and reports flat-top periodograms."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Condition and bandpass-filter a recording
    Filter(FilterArgs),
    /// Periodogram of one channel (or every channel)
    Spectrum(SpectrumArgs),
    /// Print Butterworth bandpass coefficients
    Design(DesignArgs),
    /// Show the columns and device profile of a recording
    Info(InfoArgs),
    /// Filter many recordings
    Batch(BatchArgs),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Csv,
}

/// Filter settings shared by `filter`, `spectrum` and `batch`
#[derive(Args, Clone, Default)]
pub struct FilterOptions {
    /// Low cutoff frequency in Hz
    #[arg(long)]
    pub low: Option<f64>,

    /// High cutoff frequency in Hz
    #[arg(long)]
    pub high: Option<f64>,

    /// Sampling rate the filter is designed for, in Hz
    #[arg(long)]
    pub sr: Option<f64>,

    /// Bandpass filter order
    #[arg(long)]
    pub order: Option<usize>,

    /// Pipeline configuration file (JSON)
    #[arg(long, env = "EEGBAND_CONFIG")]
    pub config: Option<String>,

    /// Skip min-max normalization
    #[arg(long, default_value_t = false)]
    pub no_normalize: bool,
}

#[derive(Args)]
pub struct FilterArgs {
    /// Input recording (CSV/TXT, ',' or ';' delimited)
    #[arg(long)]
    pub file: String,

    #[command(flatten)]
    pub filter: FilterOptions,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,

    /// Suppress progress messages on stderr
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct SpectrumArgs {
    /// Input recording (CSV/TXT, ',' or ';' delimited)
    #[arg(long)]
    pub file: String,

    /// Channel name (default: every channel)
    #[arg(long)]
    pub channel: Option<String>,

    #[command(flatten)]
    pub filter: FilterOptions,

    /// Sampling rate used for the frequency axis, in Hz
    #[arg(long)]
    pub spectrum_sr: Option<f64>,

    /// Tapering window (boxcar, hann, hamming, blackman, flattop)
    #[arg(long)]
    pub window: Option<String>,

    /// Scaling of the power values (spectrum, density)
    #[arg(long)]
    pub scaling: Option<String>,

    /// Use the normalized but unfiltered channel
    #[arg(long, default_value_t = false)]
    pub raw: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}

#[derive(Args)]
pub struct DesignArgs {
    /// Low cutoff frequency in Hz
    #[arg(long, default_value_t = 0.5)]
    pub low: f64,

    /// High cutoff frequency in Hz
    #[arg(long, default_value_t = 5.0)]
    pub high: f64,

    /// Sampling rate in Hz
    #[arg(long, default_value_t = 128.0)]
    pub sr: f64,

    /// Bandpass filter order
    #[arg(long, default_value_t = 4)]
    pub order: usize,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args)]
pub struct InfoArgs {
    /// Input recording
    #[arg(long)]
    pub file: String,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern for input files (e.g., "data/*.csv")
    #[arg(long, conflicts_with = "files")]
    pub glob: Option<String>,

    /// Explicit list of input files
    #[arg(long, num_args = 1..)]
    pub files: Option<Vec<String>>,

    #[command(flatten)]
    pub filter: FilterOptions,

    /// Output format of each filtered recording
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Directory for per-file outputs (default: JSON lines on stdout)
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Keep going after a file fails
    #[arg(long, default_value_t = false)]
    pub continue_on_error: bool,

    /// List the matched files without processing them
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Suppress progress messages on stderr
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_filter_args_parse() {
        let cli = Cli::try_parse_from([
            "eegband", "filter", "--file", "rec.csv", "--low", "1", "--high", "30", "--format",
            "csv",
        ])
        .unwrap();
        match cli.command {
            Command::Filter(args) => {
                assert_eq!(args.file, "rec.csv");
                assert_eq!(args.filter.low, Some(1.0));
                assert_eq!(args.filter.high, Some(30.0));
                assert_eq!(args.filter.sr, None);
                assert_eq!(args.format, OutputFormat::Csv);
            }
            _ => panic!("expected filter subcommand"),
        }
    }

    #[test]
    fn test_design_defaults() {
        let cli = Cli::try_parse_from(["eegband", "design"]).unwrap();
        match cli.command {
            Command::Design(args) => {
                assert_eq!(args.low, 0.5);
                assert_eq!(args.high, 5.0);
                assert_eq!(args.sr, 128.0);
                assert_eq!(args.order, 4);
            }
            _ => panic!("expected design subcommand"),
        }
    }

    #[test]
    fn test_verbose_count_is_global() {
        let cli = Cli::try_parse_from(["eegband", "info", "--file", "x.csv", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_batch_glob_conflicts_with_files() {
        let result = Cli::try_parse_from([
            "eegband", "batch", "--glob", "*.csv", "--files", "a.csv",
        ]);
        assert!(result.is_err());
    }
}

pub mod types;
pub mod error;
pub mod sanitize;
pub mod normalize;
pub mod design;
pub mod filter;
pub mod spectral;
pub mod reader;
pub mod pipeline;
pub mod profiling;

pub use types::*;
pub use error::{EegError, Result};
pub use sanitize::{drop_column, drop_columns, drop_zero_columns};
pub use normalize::{normalize, normalize_samples};
pub use design::design_bandpass;
pub use filter::{apply, apply_to_dataset};
pub use spectral::{periodogram, periodogram_with, Detrend, PeriodogramConfig, Scaling, WindowKind};
pub use reader::{
    detect_delimiter, load_recording, parse_csv, prepare_recording, read_csv, DeviceProfile,
    Recording, BOOKKEEPING_COLUMNS,
};
pub use pipeline::{
    channel_spectra, channel_spectrum, condition, run_pipeline, PipelineConfig, PipelineOutput,
};
pub use profiling::ProfileScope;

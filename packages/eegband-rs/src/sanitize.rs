//! Column sanitation
//!
//! Removes columns that carry no signal before normalization: bookkeeping
//! columns named by the caller and channels that never leave zero.

use crate::types::Dataset;

/// Remove the column called `name`. Absent columns are a no-op.
pub fn drop_column(mut dataset: Dataset, name: &str) -> Dataset {
    let before = dataset.channels.len();
    dataset.channels.retain(|c| c.name != name);
    if dataset.channels.len() != before {
        log::debug!("Dropped column '{}'", name);
    }
    dataset
}

/// Remove every listed column that is present
pub fn drop_columns<S: AsRef<str>>(dataset: Dataset, names: &[S]) -> Dataset {
    names
        .iter()
        .fold(dataset, |ds, name| drop_column(ds, name.as_ref()))
}

/// Keep only channels with at least one sample different from exactly 0.0.
/// Relative order of the retained channels is unchanged.
pub fn drop_zero_columns(mut dataset: Dataset) -> Dataset {
    dataset.channels.retain(|c| {
        let keep = c.has_nonzero();
        if !keep {
            log::warn!("Dropping all-zero channel '{}'", c.name);
        }
        keep
    });
    dataset
}

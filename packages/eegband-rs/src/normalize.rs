//! Min-max normalization into [0, 1]

use crate::error::{EegError, Result};
use crate::types::{Channel, Dataset};
use rayon::prelude::*;

/// Rescale `samples` so the minimum maps to 0 and the maximum to 1.
///
/// `name` is only used for the error message. Empty, constant and
/// non-finite inputs fail with [`EegError::DegenerateChannel`].
pub fn normalize_samples(name: &str, samples: &[f64]) -> Result<Vec<f64>> {
    if samples.is_empty() {
        return Err(EegError::DegenerateChannel(format!(
            "'{}' has no samples",
            name
        )));
    }
    if let Some(pos) = samples.iter().position(|x| !x.is_finite()) {
        return Err(EegError::DegenerateChannel(format!(
            "'{}' has a non-finite sample at index {}",
            name, pos
        )));
    }

    let (min, max) = samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
            (lo.min(x), hi.max(x))
        });

    if max <= min {
        return Err(EegError::DegenerateChannel(format!(
            "'{}' is constant ({}), max must exceed min",
            name, min
        )));
    }

    let range = max - min;
    if range.is_finite() {
        return Ok(samples.iter().map(|&x| (x - min) / range).collect());
    }

    // max - min overflows; halve every operand first
    let half_range = max / 2.0 - min / 2.0;
    Ok(samples
        .iter()
        .map(|&x| (x / 2.0 - min / 2.0) / half_range)
        .collect())
}

/// Normalize every channel independently.
///
/// Fails on the first degenerate channel in column order; the input is
/// consumed either way.
pub fn normalize(dataset: Dataset) -> Result<Dataset> {
    let results: Vec<Result<Vec<f64>>> = dataset
        .channels
        .par_iter()
        .map(|c| normalize_samples(&c.name, &c.samples))
        .collect();

    let mut channels = Vec::with_capacity(results.len());
    for (channel, result) in dataset.channels.into_iter().zip(results) {
        channels.push(Channel {
            name: channel.name,
            samples: result?,
        });
    }

    Ok(Dataset {
        channels,
        time: dataset.time,
    })
}

use crate::error::{EegError, Result};
use rustfft::num_complex::Complex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::f64::consts::PI;

/// One named signal trace (e.g. an electrode such as `F3`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    pub name: String,
    pub samples: Vec<f64>,
}

impl Channel {
    pub fn new(name: impl Into<String>, samples: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            samples,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// True when at least one sample is different from exactly 0.0
    pub fn has_nonzero(&self) -> bool {
        self.samples.iter().any(|&x| x != 0.0)
    }
}

/// Multi-channel recording with a common time base.
///
/// Channels keep the column order of the source table. Every channel has
/// the same length, and so does the time vector when it is present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub(crate) channels: Vec<Channel>,
    pub(crate) time: Option<Vec<f64>>,
}

impl Dataset {
    pub fn new(channels: Vec<Channel>, time: Option<Vec<f64>>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(channels.len());
        for channel in &channels {
            if !seen.insert(channel.name.as_str()) {
                return Err(EegError::InvalidInput(format!(
                    "Duplicate channel name '{}'",
                    channel.name
                )));
            }
        }

        let expected = channels
            .first()
            .map(Channel::len)
            .or_else(|| time.as_ref().map(Vec::len));

        if let Some(expected) = expected {
            if let Some(bad) = channels.iter().find(|c| c.len() != expected) {
                return Err(EegError::InvalidInput(format!(
                    "Channel '{}' has {} samples, expected {}",
                    bad.name,
                    bad.len(),
                    expected
                )));
            }
            if let Some(t) = &time {
                if t.len() != expected {
                    return Err(EegError::InvalidInput(format!(
                        "Time vector has {} samples, expected {}",
                        t.len(),
                        expected
                    )));
                }
            }
        }

        Ok(Self { channels, time })
    }

    /// Build a dataset from `(name, samples)` pairs without a time vector
    pub fn from_columns<N, I>(columns: I) -> Result<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Vec<f64>)>,
    {
        let channels = columns
            .into_iter()
            .map(|(name, samples)| Channel::new(name, samples))
            .collect();
        Self::new(channels, None)
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, name: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.name == name)
    }

    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.channels.iter().any(|c| c.name == name)
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel (time vector length for a dataset without channels)
    pub fn len_samples(&self) -> usize {
        self.channels
            .first()
            .map(Channel::len)
            .or_else(|| self.time.as_ref().map(Vec::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn time(&self) -> Option<&[f64]> {
        self.time.as_deref()
    }

    pub fn into_channels(self) -> Vec<Channel> {
        self.channels
    }
}

/// Target bandpass for Butterworth design
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub low: f64,
    pub high: f64,
    pub sample_rate: f64,
    pub order: usize,
}

impl FilterSpec {
    pub fn new(low: f64, high: f64, sample_rate: f64, order: usize) -> Self {
        Self {
            low,
            high,
            sample_rate,
            order,
        }
    }

    pub fn nyquist(&self) -> f64 {
        0.5 * self.sample_rate
    }

    /// Checks `0 < low < high < nyquist` and `order >= 1`
    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(EegError::InvalidSpec(format!(
                "Sampling rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if !self.low.is_finite() || self.low <= 0.0 {
            return Err(EegError::InvalidSpec(format!(
                "Low cutoff must be positive, got {} Hz",
                self.low
            )));
        }
        if !self.high.is_finite() || self.high <= self.low {
            return Err(EegError::InvalidSpec(format!(
                "High cutoff ({} Hz) must be greater than low cutoff ({} Hz)",
                self.high, self.low
            )));
        }
        let nyquist = self.nyquist();
        if self.high >= nyquist {
            return Err(EegError::InvalidSpec(format!(
                "High cutoff ({} Hz) must be less than Nyquist ({} Hz)",
                self.high, nyquist
            )));
        }
        if self.order < 1 {
            return Err(EegError::InvalidSpec(
                "Filter order must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Transfer function coefficients
/// H(z) = (b0 + b1*z^-1 + ... ) / (a0 + a1*z^-1 + ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCoefficients {
    numerator: Vec<f64>,
    denominator: Vec<f64>,
}

impl FilterCoefficients {
    pub fn new(numerator: Vec<f64>, denominator: Vec<f64>) -> Result<Self> {
        if numerator.is_empty() || denominator.is_empty() {
            return Err(EegError::InvalidSpec(
                "Numerator and denominator must both be non-empty".to_string(),
            ));
        }
        if numerator
            .iter()
            .chain(denominator.iter())
            .any(|c| !c.is_finite())
        {
            return Err(EegError::InvalidSpec(
                "Filter coefficients must be finite".to_string(),
            ));
        }
        if denominator[0] == 0.0 {
            return Err(EegError::InvalidSpec(
                "Leading denominator coefficient must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Feedforward taps (b)
    pub fn numerator(&self) -> &[f64] {
        &self.numerator
    }

    /// Feedback taps (a)
    pub fn denominator(&self) -> &[f64] {
        &self.denominator
    }

    /// Highest delay present in either polynomial
    pub fn order(&self) -> usize {
        self.numerator.len().max(self.denominator.len()) - 1
    }

    /// Magnitude |H(e^jw)| at `freq` Hz for a filter running at `sample_rate`
    pub fn frequency_response(&self, freq: f64, sample_rate: f64) -> f64 {
        let w = 2.0 * PI * freq / sample_rate;
        let eval = |coeffs: &[f64]| -> Complex<f64> {
            coeffs
                .iter()
                .enumerate()
                .map(|(k, &c)| Complex::from_polar(c, -w * k as f64))
                .sum()
        };
        (eval(&self.numerator) / eval(&self.denominator)).norm()
    }
}

/// One-sided power spectrum. `frequencies` is strictly increasing and
/// `power` holds one non-negative value per frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    pub frequencies: Vec<f64>,
    pub power: Vec<f64>,
}

impl Spectrum {
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Spacing between adjacent bins in Hz
    pub fn resolution(&self) -> f64 {
        match self.frequencies.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }

    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies
            .iter()
            .copied()
            .zip(self.power.iter().copied())
    }

    /// Bin with the largest power, skipping DC when other bins exist
    pub fn dominant(&self) -> Option<(f64, f64)> {
        let skip = usize::from(self.len() > 1);
        self.pairs()
            .skip(skip)
            .fold(None, |best: Option<(f64, f64)>, (f, p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((f, p)),
            })
    }

    /// Summed power of bins with `low <= f <= high`
    pub fn band_power(&self, low: f64, high: f64) -> f64 {
        self.pairs()
            .filter(|&(f, _)| f >= low && f <= high)
            .map(|(_, p)| p)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_rejects_ragged_channels() {
        let result = Dataset::from_columns(vec![("A", vec![1.0, 2.0]), ("B", vec![1.0])]);
        assert!(matches!(result, Err(EegError::InvalidInput(_))));
    }

    #[test]
    fn test_dataset_rejects_time_length_mismatch() {
        let channels = vec![Channel::new("A", vec![1.0, 2.0, 3.0])];
        let result = Dataset::new(channels, Some(vec![0.0, 1.0]));
        assert!(matches!(result, Err(EegError::InvalidInput(_))));
    }

    #[test]
    fn test_dataset_rejects_duplicate_names() {
        let result = Dataset::from_columns(vec![("A", vec![1.0]), ("A", vec![2.0])]);
        assert!(result.is_err());
    }

    #[test]
    fn test_dataset_accessors() {
        let ds = Dataset::new(
            vec![
                Channel::new("F3", vec![1.0, 2.0]),
                Channel::new("F4", vec![3.0, 4.0]),
            ],
            Some(vec![0.0, 0.5]),
        )
        .unwrap();
        assert_eq!(ds.channel_names(), vec!["F3", "F4"]);
        assert_eq!(ds.len_samples(), 2);
        assert_eq!(ds.channel("F4").unwrap().samples, vec![3.0, 4.0]);
        assert!(ds.channel("O1").is_none());
        assert_eq!(ds.time(), Some(&[0.0, 0.5][..]));
    }

    #[test]
    fn test_filter_spec_nyquist() {
        let spec = FilterSpec::new(0.5, 5.0, 128.0, 4);
        assert_eq!(spec.nyquist(), 64.0);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_coefficients_reject_zero_leading_denominator() {
        let result = FilterCoefficients::new(vec![1.0], vec![0.0, 1.0]);
        assert!(matches!(result, Err(EegError::InvalidSpec(_))));
    }

    #[test]
    fn test_identity_frequency_response() {
        let coeffs = FilterCoefficients::new(vec![1.0], vec![1.0]).unwrap();
        assert!((coeffs.frequency_response(10.0, 128.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_spectrum_dominant_skips_dc() {
        let spectrum = Spectrum {
            frequencies: vec![0.0, 1.0, 2.0, 3.0],
            power: vec![10.0, 0.5, 2.0, 1.0],
        };
        assert_eq!(spectrum.dominant(), Some((2.0, 2.0)));
        assert_eq!(spectrum.resolution(), 1.0);
        assert!((spectrum.band_power(1.0, 2.0) - 2.5).abs() < 1e-12);
    }
}

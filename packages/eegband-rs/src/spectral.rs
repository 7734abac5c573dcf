//! Periodogram power spectrum estimation
//!
//! Detrend, taper with a periodic window, FFT over the full record (no
//! padding), square magnitudes and scale. Only the non-negative half is
//! returned since the input is real.

use crate::error::{EegError, Result};
use crate::types::Spectrum;
use rustfft::{num_complex::Complex, FftPlanner};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Tapering window applied before the FFT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    /// Rectangular window
    Boxcar,
    Hann,
    Hamming,
    Blackman,
    /// Five-term flat-top window; accurate amplitudes for tones
    #[default]
    #[serde(alias = "flat_top")]
    Flattop,
}

impl WindowKind {
    /// General cosine coefficients: w[n] = sum_k a_k cos(k * (2*pi*n/N - pi))
    fn cosine_terms(self) -> &'static [f64] {
        match self {
            WindowKind::Boxcar => &[1.0],
            WindowKind::Hann => &[0.5, 0.5],
            WindowKind::Hamming => &[0.54, 0.46],
            WindowKind::Blackman => &[0.42, 0.50, 0.08],
            WindowKind::Flattop => &[
                0.215_578_95,
                0.416_631_58,
                0.277_263_158,
                0.083_578_947,
                0.006_947_368,
            ],
        }
    }

    /// Periodic window of length `n`. A single-sample window is always 1.
    pub fn coefficients(self, n: usize) -> Vec<f64> {
        if n == 1 {
            return vec![1.0];
        }
        let terms = self.cosine_terms();
        (0..n)
            .map(|i| {
                let x = 2.0 * PI * i as f64 / n as f64 - PI;
                terms
                    .iter()
                    .enumerate()
                    .map(|(k, a)| a * (k as f64 * x).cos())
                    .sum::<f64>()
            })
            .collect()
    }
}

impl std::str::FromStr for WindowKind {
    type Err = EegError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "boxcar" | "rectangular" | "none" => Ok(WindowKind::Boxcar),
            "hann" | "hanning" => Ok(WindowKind::Hann),
            "hamming" => Ok(WindowKind::Hamming),
            "blackman" => Ok(WindowKind::Blackman),
            "flattop" | "flat_top" | "flat-top" => Ok(WindowKind::Flattop),
            other => Err(EegError::InvalidInput(format!(
                "Unknown window '{}'. Supported: boxcar, hann, hamming, blackman, flattop",
                other
            ))),
        }
    }
}

/// Normalization applied to the squared FFT magnitudes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scaling {
    /// Power spectral density in units^2/Hz
    Density,
    /// Power spectrum in units^2; a tone's bin reads its mean-square power
    #[default]
    Spectrum,
}

impl std::str::FromStr for Scaling {
    type Err = EegError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "density" => Ok(Scaling::Density),
            "spectrum" => Ok(Scaling::Spectrum),
            other => Err(EegError::InvalidInput(format!(
                "Unknown scaling '{}'. Supported: density, spectrum",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Detrend {
    None,
    /// Subtract the mean
    #[default]
    Constant,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodogramConfig {
    pub sample_rate: f64,
    #[serde(default)]
    pub window: WindowKind,
    #[serde(default)]
    pub scaling: Scaling,
    #[serde(default)]
    pub detrend: Detrend,
}

impl PeriodogramConfig {
    pub fn new(sample_rate: f64, window: WindowKind, scaling: Scaling) -> Self {
        Self {
            sample_rate,
            window,
            scaling,
            detrend: Detrend::default(),
        }
    }
}

/// One-sided periodogram with mean removal
pub fn periodogram(
    samples: &[f64],
    sample_rate: f64,
    window: WindowKind,
    scaling: Scaling,
) -> Result<Spectrum> {
    periodogram_with(samples, &PeriodogramConfig::new(sample_rate, window, scaling))
}

pub fn periodogram_with(samples: &[f64], config: &PeriodogramConfig) -> Result<Spectrum> {
    if samples.is_empty() {
        return Err(EegError::InvalidInput(
            "Periodogram requires at least one sample".to_string(),
        ));
    }
    if !config.sample_rate.is_finite() || config.sample_rate <= 0.0 {
        return Err(EegError::InvalidSpec(format!(
            "Sampling rate must be positive, got {}",
            config.sample_rate
        )));
    }

    let n = samples.len();
    let offset = match config.detrend {
        Detrend::None => 0.0,
        Detrend::Constant => samples.iter().sum::<f64>() / n as f64,
    };

    let window = config.window.coefficients(n);
    let mut buffer: Vec<Complex<f64>> = samples
        .iter()
        .zip(window.iter())
        .map(|(&x, &w)| Complex::new((x - offset) * w, 0.0))
        .collect();

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    let scale = match config.scaling {
        Scaling::Spectrum => {
            let sum: f64 = window.iter().sum();
            1.0 / (sum * sum)
        }
        Scaling::Density => {
            let energy: f64 = window.iter().map(|w| w * w).sum();
            1.0 / (config.sample_rate * energy)
        }
    };

    let n_bins = n / 2 + 1;
    // DC is never doubled; Nyquist only exists as its own bin for even n
    let doubled_end = if n % 2 == 0 { n_bins - 1 } else { n_bins };

    let power: Vec<f64> = buffer[..n_bins]
        .iter()
        .enumerate()
        .map(|(k, c)| {
            let p = c.norm_sqr() * scale;
            if k > 0 && k < doubled_end {
                2.0 * p
            } else {
                p
            }
        })
        .collect();

    let resolution = config.sample_rate / n as f64;
    let frequencies = (0..n_bins).map(|k| k as f64 * resolution).collect();

    Ok(Spectrum { frequencies, power })
}

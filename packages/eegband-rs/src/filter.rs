//! Causal IIR filtering
//!
//! Single forward pass of the direct-form difference equation with zero
//! initial conditions. The output is phase-delayed relative to the input;
//! no zero-phase (forward-backward) correction is applied.

use crate::types::{Dataset, FilterCoefficients};
use rayon::prelude::*;

/// Filter `samples` through `coefficients`
///
/// y[n] = (sum_i b[i]*x[n-i] - sum_{i>=1} a[i]*y[n-i]) / a[0]
///
/// Unstable coefficients are not guarded against; the output then grows
/// without bound and may reach Inf/NaN.
pub fn apply(coefficients: &FilterCoefficients, samples: &[f64]) -> Vec<f64> {
    let b = coefficients.numerator();
    let a = coefficients.denominator();
    let a0 = a[0];

    let mut output: Vec<f64> = Vec::with_capacity(samples.len());
    for n in 0..samples.len() {
        let feedforward: f64 = b
            .iter()
            .take(n + 1)
            .enumerate()
            .map(|(i, &bi)| bi * samples[n - i])
            .sum();
        let feedback: f64 = a
            .iter()
            .enumerate()
            .skip(1)
            .take(n)
            .map(|(i, &ai)| ai * output[n - i])
            .sum();
        output.push((feedforward - feedback) / a0);
    }
    output
}

/// Filter every channel independently; channels run in parallel
pub fn apply_to_dataset(coefficients: &FilterCoefficients, mut dataset: Dataset) -> Dataset {
    dataset.channels.par_iter_mut().for_each(|channel| {
        channel.samples = apply(coefficients, &channel.samples);
    });
    log::debug!(
        "Filtered {} channel(s) of {} samples",
        dataset.num_channels(),
        dataset.len_samples()
    );
    dataset
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::design_bandpass;
    use crate::types::Channel;
    use std::f64::consts::PI;

    fn rms(x: &[f64]) -> f64 {
        (x.iter().map(|v| v * v).sum::<f64>() / x.len() as f64).sqrt()
    }

    #[test]
    fn test_zero_input_gives_zero_output() {
        let coeffs = design_bandpass(0.5, 5.0, 128.0, 4).unwrap();
        let out = apply(&coeffs, &vec![0.0; 512]);
        assert_eq!(out.len(), 512);
        assert!(out.iter().all(|&y| y == 0.0));
    }

    #[test]
    fn test_output_length_matches_input() {
        let coeffs = design_bandpass(1.0, 10.0, 100.0, 2).unwrap();
        for len in [0, 1, 2, 3, 17, 1000] {
            let input: Vec<f64> = (0..len).map(|i| i as f64).collect();
            assert_eq!(apply(&coeffs, &input).len(), len);
        }
    }

    #[test]
    fn test_fir_moving_sum() {
        let coeffs = FilterCoefficients::new(vec![1.0, 1.0], vec![1.0]).unwrap();
        assert_eq!(apply(&coeffs, &[1.0, 2.0, 3.0]), vec![1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_recursive_with_leading_gain() {
        // 2*y[n] = x[n] + y[n-1]
        let coeffs = FilterCoefficients::new(vec![1.0], vec![2.0, -1.0]).unwrap();
        assert_eq!(apply(&coeffs, &[2.0, 0.0, 0.0]), vec![1.0, 0.5, 0.25]);
    }

    #[test]
    fn test_unstable_coefficients_diverge() {
        // pole at z = 2
        let coeffs = FilterCoefficients::new(vec![1.0], vec![1.0, -2.0]).unwrap();
        let mut impulse = vec![0.0; 2000];
        impulse[0] = 1.0;
        let out = apply(&coeffs, &impulse);
        assert!(out.last().map_or(false, |y| !y.is_finite()));
    }

    #[test]
    fn test_passband_and_stopband() {
        let fs = 128.0;
        let coeffs = design_bandpass(0.5, 5.0, fs, 4).unwrap();
        let tone = |f: f64| -> Vec<f64> {
            (0..4096)
                .map(|i| (2.0 * PI * f * i as f64 / fs).sin())
                .collect()
        };

        let pass = apply(&coeffs, &tone(2.0));
        let stop = apply(&coeffs, &tone(40.0));
        // skip the transient
        assert!(rms(&pass[2048..]) > 0.6);
        assert!(rms(&stop[2048..]) < 0.01);
    }

    #[test]
    fn test_single_pass_introduces_delay() {
        let fs = 128.0;
        let coeffs = design_bandpass(0.5, 5.0, fs, 4).unwrap();
        let mut impulse = vec![0.0; 256];
        impulse[0] = 1.0;
        let out = apply(&coeffs, &impulse);
        let peak = out
            .iter()
            .enumerate()
            .fold((0, 0.0), |(bi, bv), (i, &v)| if v.abs() > bv { (i, v.abs()) } else { (bi, bv) })
            .0;
        assert!(peak > 0, "causal filter should peak after the impulse");
    }

    #[test]
    fn test_apply_to_dataset_matches_per_channel() {
        let coeffs = design_bandpass(0.5, 5.0, 128.0, 4).unwrap();
        let a: Vec<f64> = (0..300).map(|i| (i as f64 * 0.1).sin()).collect();
        let b: Vec<f64> = (0..300).map(|i| (i as f64 * 0.37).cos()).collect();
        let ds = Dataset::new(
            vec![Channel::new("A", a.clone()), Channel::new("B", b.clone())],
            None,
        )
        .unwrap();

        let filtered = apply_to_dataset(&coeffs, ds);
        assert_eq!(filtered.channel_names(), vec!["A", "B"]);
        assert_eq!(filtered.channel("A").unwrap().samples, apply(&coeffs, &a));
        assert_eq!(filtered.channel("B").unwrap().samples, apply(&coeffs, &b));
    }
}

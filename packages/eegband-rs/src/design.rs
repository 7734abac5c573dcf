//! Butterworth bandpass design
//!
//! Analog prototype -> low-pass to band-pass transform -> bilinear transform,
//! carried out on zeros/poles/gain and expanded into transfer function
//! polynomials at the end. Cutoffs are pre-warped with `fs = 2` on the
//! Nyquist-normalized frequencies.

use crate::error::Result;
use crate::types::{FilterCoefficients, FilterSpec};
use rustfft::num_complex::Complex;
use std::f64::consts::PI;

type C64 = Complex<f64>;

/// Zeros, poles and gain of a transfer function
#[derive(Debug, Clone)]
struct Zpk {
    zeros: Vec<C64>,
    poles: Vec<C64>,
    gain: f64,
}

/// Normalized digital sampling rate used for pre-warping and the bilinear map
const DIGITAL_FS: f64 = 2.0;

/// Design a digital Butterworth bandpass of the given order.
///
/// `order` is the order of the resulting filter; numerator and denominator
/// both have `order + 1` taps and `denominator[0] == 1`. Even orders are a
/// pure Butterworth band-pass built from a prototype of order `order / 2`;
/// odd orders add a first-order high-pass section at the low edge and are
/// rescaled to unit gain at the band centre.
///
/// Odd-order edges are not at -3 dB. With `r = w1 / w2` the pre-warped
/// cutoff ratio, the gain is `0.5 * sqrt(1 + r)` at `low` and
/// `sqrt((1 + r) / (2 * (1 + r^2)))` at `high` (about 0.51 and 0.72 for a
/// 1-30 Hz band at 256 Hz).
pub fn design_bandpass(
    low: f64,
    high: f64,
    sample_rate: f64,
    order: usize,
) -> Result<FilterCoefficients> {
    let spec = FilterSpec::new(low, high, sample_rate, order);
    spec.validate()?;

    let nyquist = spec.nyquist();
    let w1 = prewarp(low / nyquist);
    let w2 = prewarp(high / nyquist);
    let wo = (w1 * w2).sqrt();
    let bw = w2 - w1;

    let mut analog = lowpass_to_bandpass(butter_prototype(order / 2), wo, bw);
    let odd = order % 2 == 1;
    if odd {
        // s / (s + w1)
        analog.zeros.push(C64::new(0.0, 0.0));
        analog.poles.push(C64::new(-w1, 0.0));
    }

    let digital = bilinear(analog, DIGITAL_FS);
    let numerator: Vec<f64> = poly(&digital.zeros)
        .into_iter()
        .map(|c| c * digital.gain)
        .collect();
    let denominator = poly(&digital.poles);

    let mut coeffs = FilterCoefficients::new(numerator, denominator)?;
    if odd {
        let center_hz = (2.0 * (wo / (2.0 * DIGITAL_FS)).atan()) / PI * nyquist;
        let gain = coeffs.frequency_response(center_hz, sample_rate);
        let numerator = coeffs.numerator().iter().map(|b| b / gain).collect();
        coeffs = FilterCoefficients::new(numerator, coeffs.denominator().to_vec())?;
    }

    log::debug!(
        "Designed order-{} Butterworth bandpass {}-{} Hz at {} Hz: b={:?} a={:?}",
        order,
        low,
        high,
        sample_rate,
        coeffs.numerator(),
        coeffs.denominator()
    );

    Ok(coeffs)
}

fn prewarp(wn: f64) -> f64 {
    2.0 * DIGITAL_FS * (PI * wn / DIGITAL_FS).tan()
}

/// Analog Butterworth low-pass prototype with unit cutoff
fn butter_prototype(n: usize) -> Zpk {
    let poles = (0..n)
        .map(|i| {
            let m = 2.0 * i as f64 - n as f64 + 1.0;
            -C64::from_polar(1.0, PI * m / (2.0 * n as f64))
        })
        .collect();
    Zpk {
        zeros: Vec::new(),
        poles,
        gain: 1.0,
    }
}

/// Low-pass prototype to band-pass centred at `wo` with bandwidth `bw`
fn lowpass_to_bandpass(proto: Zpk, wo: f64, bw: f64) -> Zpk {
    let degree = proto.poles.len() - proto.zeros.len();
    let wo2 = C64::new(wo * wo, 0.0);

    let split = |roots: &[C64]| -> Vec<C64> {
        let scaled: Vec<C64> = roots.iter().map(|r| *r * (bw / 2.0)).collect();
        let plus = scaled.iter().map(|&r| r + (r * r - wo2).sqrt());
        let minus = scaled.iter().map(|&r| r - (r * r - wo2).sqrt());
        plus.chain(minus).collect()
    };

    let mut zeros = split(&proto.zeros);
    zeros.extend(std::iter::repeat(C64::new(0.0, 0.0)).take(degree));

    Zpk {
        zeros,
        poles: split(&proto.poles),
        gain: proto.gain * bw.powi(degree as i32),
    }
}

/// Bilinear transform s -> 2*fs*(z - 1)/(z + 1); zeros at infinity land on z = -1
fn bilinear(analog: Zpk, fs: f64) -> Zpk {
    let fs2 = C64::new(2.0 * fs, 0.0);
    let degree = analog.poles.len() - analog.zeros.len();

    let map = |r: &C64| (fs2 + *r) / (fs2 - *r);
    let mut zeros: Vec<C64> = analog.zeros.iter().map(map).collect();
    zeros.extend(std::iter::repeat(C64::new(-1.0, 0.0)).take(degree));
    let poles = analog.poles.iter().map(map).collect();

    let num: C64 = analog.zeros.iter().map(|r| fs2 - *r).product();
    let den: C64 = analog.poles.iter().map(|r| fs2 - *r).product();

    Zpk {
        zeros,
        poles,
        gain: analog.gain * (num / den).re,
    }
}

/// Monic polynomial with the given roots, highest power first.
/// Roots come in conjugate pairs so the imaginary parts cancel.
fn poly(roots: &[C64]) -> Vec<f64> {
    let mut coeffs = vec![C64::new(1.0, 0.0)];
    for root in roots {
        let mut next = coeffs.clone();
        next.push(C64::new(0.0, 0.0));
        for (i, c) in coeffs.iter().enumerate() {
            next[i + 1] -= *root * *c;
        }
        coeffs = next;
    }
    coeffs.into_iter().map(|c| c.re).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EegError;
    use crate::filter::apply;

    fn geometric_center(low: f64, high: f64) -> f64 {
        (low * high).sqrt()
    }

    #[test]
    fn test_reference_design_shape() {
        let coeffs = design_bandpass(0.5, 5.0, 128.0, 4).unwrap();
        assert_eq!(coeffs.numerator().len(), 5);
        assert_eq!(coeffs.denominator().len(), 5);
        assert_eq!(coeffs.denominator()[0], 1.0);
    }

    #[test]
    fn test_invalid_specs() {
        let cases = [
            (0.0, 5.0, 128.0, 4),
            (5.0, 5.0, 128.0, 4),
            (0.5, 70.0, 128.0, 4),
            (0.5, 64.0, 128.0, 4),
            (0.5, 5.0, 128.0, 0),
            (-1.0, 5.0, 128.0, 4),
            (0.5, 5.0, -128.0, 4),
        ];
        for (low, high, fs, order) in cases {
            let result = design_bandpass(low, high, fs, order);
            assert!(
                matches!(result, Err(EegError::InvalidSpec(_))),
                "expected InvalidSpec for ({}, {}, {}, {})",
                low,
                high,
                fs,
                order
            );
        }
    }

    #[test]
    fn test_bandpass_gain_profile() {
        let fs = 128.0;
        let coeffs = design_bandpass(0.5, 5.0, fs, 4).unwrap();

        // zeros at z = 1 and z = -1 block DC and Nyquist
        assert!(coeffs.frequency_response(0.0, fs) < 1e-9);
        assert!(coeffs.frequency_response(64.0, fs) < 1e-9);

        let center = coeffs.frequency_response(geometric_center(0.5, 5.0), fs);
        assert!((center - 1.0).abs() < 1e-2, "center gain {}", center);

        // -3 dB at both edges
        let edge = std::f64::consts::FRAC_1_SQRT_2;
        assert!((coeffs.frequency_response(0.5, fs) - edge).abs() < 1e-6);
        assert!((coeffs.frequency_response(5.0, fs) - edge).abs() < 1e-6);

        assert!(coeffs.frequency_response(30.0, fs) < 0.05);
    }

    #[test]
    fn test_even_orders_have_unit_center_gain() {
        for order in [2, 4, 6, 8] {
            let coeffs = design_bandpass(8.0, 13.0, 256.0, order).unwrap();
            assert_eq!(coeffs.numerator().len(), order + 1);
            let gain = coeffs.frequency_response(geometric_center(8.0, 13.0), 256.0);
            assert!((gain - 1.0).abs() < 1e-2, "order {} gain {}", order, gain);
        }
    }

    #[test]
    fn test_odd_orders() {
        for order in [1, 3, 5] {
            let coeffs = design_bandpass(1.0, 30.0, 256.0, order).unwrap();
            assert_eq!(coeffs.numerator().len(), order + 1);
            assert_eq!(coeffs.denominator().len(), order + 1);
            assert_eq!(coeffs.denominator()[0], 1.0);
            assert!(coeffs.frequency_response(0.0, 256.0) < 1e-9);
        }
    }

    #[test]
    fn test_odd_order_edge_gains() {
        let (low, high, fs) = (1.0, 30.0, 256.0);
        let r = prewarp(2.0 * low / fs) / prewarp(2.0 * high / fs);
        let expected_low = 0.5 * (1.0 + r).sqrt();
        let expected_high = ((1.0 + r) / (2.0 * (1.0 + r * r))).sqrt();

        for order in [3, 5] {
            let coeffs = design_bandpass(low, high, fs, order).unwrap();
            let at_low = coeffs.frequency_response(low, fs);
            let at_high = coeffs.frequency_response(high, fs);
            assert!((at_low - expected_low).abs() < 1e-6, "order {} low {}", order, at_low);
            assert!((at_high - expected_high).abs() < 1e-6, "order {} high {}", order, at_high);
        }
        assert!((expected_low - 0.508).abs() < 1e-3);
        assert!((expected_high - 0.718).abs() < 1e-3);
    }

    #[test]
    fn test_design_is_stable() {
        let coeffs = design_bandpass(0.5, 5.0, 128.0, 4).unwrap();
        let mut impulse = vec![0.0; 8192];
        impulse[0] = 1.0;
        let response = apply(&coeffs, &impulse);
        assert!(response.iter().all(|y| y.is_finite()));
        let tail = response[8000..].iter().map(|y| y.abs()).fold(0.0, f64::max);
        assert!(tail < 1e-6, "impulse response tail {}", tail);
    }

    #[test]
    fn test_poly_expands_roots() {
        let roots = [C64::new(1.0, 0.0), C64::new(2.0, 0.0)];
        assert_eq!(poly(&roots), vec![1.0, -3.0, 2.0]);
    }
}

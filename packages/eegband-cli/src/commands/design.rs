use crate::cli::DesignArgs;
use crate::exit_codes;
use crate::output;
use eegband_rs::{design_bandpass, EegError, FilterSpec};
use serde::Serialize;

#[derive(Serialize)]
struct DesignOutput {
    spec: FilterSpec,
    numerator: Vec<f64>,
    denominator: Vec<f64>,
    /// |H| at the low and high cutoff
    cutoff_gain: [f64; 2],
}

pub fn execute(args: DesignArgs) -> i32 {
    let coefficients = match design_bandpass(args.low, args.high, args.sr, args.order) {
        Ok(c) => c,
        Err(e @ EegError::InvalidSpec(_)) => {
            eprintln!("Error: {}", e);
            return exit_codes::INPUT_ERROR;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    };

    let design = DesignOutput {
        spec: FilterSpec::new(args.low, args.high, args.sr, args.order),
        numerator: coefficients.numerator().to_vec(),
        denominator: coefficients.denominator().to_vec(),
        cutoff_gain: [
            coefficients.frequency_response(args.low, args.sr),
            coefficients.frequency_response(args.high, args.sr),
        ],
    };

    if args.json {
        match output::to_json(&design, false) {
            Ok(json) => {
                if let Err(e) = output::write_output(&json, None) {
                    eprintln!("Error: {}", e);
                    return exit_codes::EXECUTION_ERROR;
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return exit_codes::EXECUTION_ERROR;
            }
        }
    } else {
        println!(
            "Butterworth bandpass {}-{} Hz, order {}, fs {} Hz",
            args.low, args.high, args.order, args.sr
        );
        println!();
        println!("b = [{}]", format_coefficients(&design.numerator));
        println!("a = [{}]", format_coefficients(&design.denominator));
        println!();
        println!(
            "Gain at cutoffs: {:.4} / {:.4}",
            design.cutoff_gain[0], design.cutoff_gain[1]
        );
    }

    exit_codes::SUCCESS
}

fn format_coefficients(coeffs: &[f64]) -> String {
    coeffs
        .iter()
        .map(|c| format!("{:.10e}", c))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coefficients() {
        assert_eq!(format_coefficients(&[1.0, -0.5]), "1.0000000000e0, -5.0000000000e-1");
    }
}

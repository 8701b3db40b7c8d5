//! Magnitude response of the designed cascade.

use crate::error::{CliError, validate_order};
use clap::Args;
use lowcut_core::{FilterParameters, design_highpass};

/// Lowest frequency in a response sweep.
const SWEEP_START_HZ: f32 = 10.0;

#[derive(Args)]
pub struct ResponseArgs {
    /// Cutoff frequency in Hz (clamped to 20..20000 and below Nyquist)
    #[arg(long, default_value_t = 1000.0)]
    cutoff: f32,

    /// Filter order (even, up to 8)
    #[arg(long, default_value_t = FilterParameters::DEFAULT_ORDER)]
    order: usize,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 48000.0)]
    sample_rate: f32,

    /// Number of log-spaced frequencies
    #[arg(long, default_value_t = 32)]
    points: usize,
}

pub fn run(args: ResponseArgs) -> anyhow::Result<()> {
    let order = validate_order(args.order)?;
    if args.points < 2 {
        return Err(CliError::TooFewPoints(args.points).into());
    }

    let params = FilterParameters::new(args.cutoff)
        .with_order(order)
        .clamped_for(args.sample_rate);
    let design = design_highpass(params.cutoff_hz, args.sample_rate, params.order)?;

    tracing::info!(
        cutoff_hz = params.cutoff_hz,
        order = params.order,
        sample_rate = args.sample_rate,
        "designed"
    );

    println!(
        "Butterworth high-pass, order {}, cutoff {:.1} Hz @ {} Hz",
        params.order, params.cutoff_hz, args.sample_rate
    );
    println!("\n  Sections:");
    for (i, section) in design.iter().enumerate() {
        println!(
            "    {i}: b = [{:+.6}, {:+.6}, {:+.6}]  a = [1, {:+.6}, {:+.6}]",
            section.b0, section.b1, section.b2, section.a1, section.a2
        );
    }

    println!("\n  {:>10}  {:>9}", "Freq (Hz)", "Gain (dB)");
    for freq in sweep_frequencies(args.sample_rate * 0.5 * 0.999, args.points) {
        println!(
            "  {:>10.1}  {:>9.2}",
            freq,
            design.magnitude_db_at(freq, args.sample_rate)
        );
    }

    Ok(())
}

/// `points` log-spaced frequencies from 10 Hz up to `max_hz`.
fn sweep_frequencies(max_hz: f32, points: usize) -> impl Iterator<Item = f32> {
    let ratio = (max_hz / SWEEP_START_HZ).ln() / (points - 1) as f32;
    (0..points).map(move |i| SWEEP_START_HZ * (ratio * i as f32).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_spans_range() {
        let freqs: Vec<f32> = sweep_frequencies(20000.0, 5).collect();
        assert_eq!(freqs.len(), 5);
        assert!((freqs[0] - 10.0).abs() < 1e-4);
        assert!((freqs[4] - 20000.0).abs() < 1.0);
        assert!(freqs.windows(2).all(|w| w[1] > w[0]));
    }
}

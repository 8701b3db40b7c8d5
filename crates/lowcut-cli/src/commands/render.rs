//! File-based rendering through the low-cut stage.

use crate::error::{CliError, validate_order};
use crate::wav::{read_wav_channels, write_wav_channels};
use clap::Args;
use lowcut_core::{FilterChain, FilterParameters, LowCut, ProcessSpec, design_highpass};
use std::path::PathBuf;

#[derive(Args)]
pub struct RenderArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Cutoff frequency in Hz (clamped to 20..20000 and below Nyquist)
    #[arg(long, default_value_t = FilterParameters::DEFAULT_CUTOFF_HZ)]
    cutoff: f32,

    /// Filter order (even, up to 8)
    #[arg(long, default_value_t = FilterParameters::DEFAULT_ORDER)]
    order: usize,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let order = validate_order(args.order)?;
    if args.block_size == 0 {
        return Err(CliError::InvalidBlockSize.into());
    }

    println!("Reading {}...", args.input.display());
    let (mut channels, spec) = read_wav_channels(&args.input)?;
    let out_spec = spec.with_bit_depth(args.bit_depth)?;
    let sample_rate = spec.sample_rate as f32;
    let frames = channels.first().map_or(0, Vec::len);

    println!(
        "  {} channel(s), {} frames, {} Hz, {:.2}s",
        channels.len(),
        frames,
        spec.sample_rate,
        frames as f32 / sample_rate
    );

    let requested = FilterParameters::new(args.cutoff).with_order(order);
    let params = requested.clamped_for(sample_rate);
    if params.cutoff_hz != requested.cutoff_hz {
        tracing::warn!(
            requested = requested.cutoff_hz,
            used = params.cutoff_hz,
            "cutoff clamped"
        );
    }
    // Surface the designer's error instead of rendering with a bypassed chain.
    design_highpass(params.cutoff_hz, sample_rate, params.order)?;

    let process_spec = ProcessSpec::new(sample_rate, args.block_size, channels.len());
    let mut chains: Vec<FilterChain> = (0..channels.len()).map(|_| FilterChain::new()).collect();
    let mut lowcut = LowCut::new();
    lowcut.prepare(&process_spec, &mut chains);

    tracing::info!(
        cutoff_hz = params.cutoff_hz,
        order = params.order,
        block_size = args.block_size,
        "rendering"
    );

    let input_rms: Vec<f32> = channels.iter().map(|c| rms(c)).collect();

    let mut start = 0;
    while start < frames {
        let end = (start + args.block_size).min(frames);
        let mut block: Vec<&mut [f32]> = channels.iter_mut().map(|c| &mut c[start..end]).collect();
        lowcut.process_block(params, &mut chains, &mut block);
        start = end;
    }

    println!("\nStats:");
    for (i, (channel, in_rms)) in channels.iter().zip(&input_rms).enumerate() {
        println!(
            "  Channel {i}: RMS {:.1} dB -> {:.1} dB",
            linear_to_db(*in_rms),
            linear_to_db(rms(channel))
        );
    }

    println!("\nWriting {}...", args.output.display());
    write_wav_channels(&args.output, &channels, out_spec)?;
    println!("Done.");

    Ok(())
}

fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

fn linear_to_db(linear: f32) -> f32 {
    20.0 * linear.max(1e-10).log10()
}

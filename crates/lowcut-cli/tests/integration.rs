//! Integration tests for lowcut-cli.
//!
//! Tests cover the CLI binary invocation and end-to-end file rendering
//! workflows.

use std::f32::consts::TAU;
use std::path::Path;
use std::process::Command;

/// Helper to get the path to the `lowcut` binary built by cargo.
fn lowcut_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_lowcut"))
}

fn sine(freq: f32, sample_rate: u32, frames: usize, amplitude: f32) -> Vec<f32> {
    (0..frames)
        .map(|n| amplitude * (TAU * freq * n as f32 / sample_rate as f32).sin())
        .collect()
}

fn write_stereo(path: &Path, left: &[f32], right: &[f32], sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for (&l, &r) in left.iter().zip(right) {
        writer.write_sample(l).unwrap();
        writer.write_sample(r).unwrap();
    }
    writer.finalize().unwrap();
}

/// Reads an interleaved WAV back as (spec, per-channel samples).
fn read_channels(path: &Path) -> (hound::WavSpec, Vec<Vec<f32>>) {
    let reader = hound::WavReader::open(path).unwrap();
    let spec = reader.spec();
    let channels = usize::from(spec.channels);
    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.into_samples::<f32>().map(Result::unwrap).collect(),
        hound::SampleFormat::Int => {
            let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.unwrap() as f32 / max)
                .collect()
        }
    };
    let mut out = vec![Vec::new(); channels];
    for frame in samples.chunks_exact(channels) {
        for (c, &s) in frame.iter().enumerate() {
            out[c].push(s);
        }
    }
    (spec, out)
}

fn rms(signal: &[f32]) -> f32 {
    (signal.iter().map(|s| s * s).sum::<f32>() / signal.len() as f32).sqrt()
}

// ---------------------------------------------------------------------------
// CLI binary tests -- `lowcut params` / `lowcut response`
// ---------------------------------------------------------------------------

#[test]
fn cli_params_lists_cutoff() {
    let output = lowcut_bin()
        .arg("params")
        .output()
        .expect("failed to run lowcut params");

    assert!(output.status.success(), "lowcut params failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("LowCut Freq"));
    assert!(stdout.contains("lowcut_freq"));
    assert!(stdout.contains("20 Hz .. 20.00 kHz"));
    assert!(stdout.contains("automatable, stepped"));
}

#[test]
fn cli_response_prints_sweep() {
    let output = lowcut_bin()
        .args(["response", "--cutoff", "1000", "--points", "8"])
        .output()
        .expect("failed to run lowcut response");

    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("order 4"));
    assert!(stdout.contains("Gain (dB)"));
    // Two section lines for order 4.
    assert!(stdout.contains("    0: b = "));
    assert!(stdout.contains("    1: b = "));
    assert!(!stdout.contains("    2: b = "));
}

#[test]
fn cli_response_rejects_odd_order() {
    let output = lowcut_bin()
        .args(["response", "--order", "3"])
        .output()
        .expect("failed to run lowcut response");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid filter order 3"), "stderr: {stderr}");
}

// ---------------------------------------------------------------------------
// End-to-end rendering
// ---------------------------------------------------------------------------

#[test]
fn render_stereo_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let output = dir.path().join("out.wav");

    // Left: 40 Hz rumble. Right: 5 kHz tone.
    let sr = 48000;
    let left = sine(40.0, sr, 48000, 0.5);
    let right = sine(5000.0, sr, 48000, 0.5);
    write_stereo(&input, &left, &right, sr);

    let status = lowcut_bin()
        .arg("render")
        .arg(&input)
        .arg(&output)
        .args(["--cutoff", "1000"])
        .status()
        .expect("failed to run lowcut render");
    assert!(status.success());

    let (spec, channels) = read_channels(&output);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, sr);
    assert_eq!(spec.bits_per_sample, 32);
    assert_eq!(channels[0].len(), 48000);

    // Skip the start-up transient.
    let settled = 4800..;
    assert!(rms(&channels[0][settled.clone()]) < 1e-3, "rumble not removed");
    let kept = rms(&channels[1][settled.clone()]) / rms(&right[settled]);
    assert!((kept - 1.0).abs() < 0.02, "5 kHz gain {kept}");
}

#[test]
fn render_respects_bit_depth_and_block_size() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let a = dir.path().join("a.wav");
    let b = dir.path().join("b.wav");

    let sr = 44100;
    let signal = sine(300.0, sr, 10000, 0.4);
    write_stereo(&input, &signal, &signal, sr);

    for (path, block) in [(&a, "1"), (&b, "4096")] {
        let status = lowcut_bin()
            .arg("render")
            .arg(&input)
            .arg(path)
            .args(["--cutoff", "150", "--bit-depth", "24", "--block-size", block])
            .status()
            .expect("failed to run lowcut render");
        assert!(status.success());
    }

    let (spec_a, out_a) = read_channels(&a);
    let (_, out_b) = read_channels(&b);
    assert_eq!(spec_a.bits_per_sample, 24);
    assert_eq!(spec_a.sample_format, hound::SampleFormat::Int);
    // Block size does not change the result.
    assert_eq!(out_a, out_b);
}

#[test]
fn render_rejects_bad_bit_depth() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.wav");
    let signal = sine(300.0, 48000, 256, 0.4);
    write_stereo(&input, &signal, &signal, 48000);

    let output = lowcut_bin()
        .arg("render")
        .arg(&input)
        .arg(dir.path().join("out.wav"))
        .args(["--bit-depth", "12"])
        .output()
        .expect("failed to run lowcut render");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported bit depth 12"), "stderr: {stderr}");
}

#[test]
fn render_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = lowcut_bin()
        .arg("render")
        .arg(dir.path().join("missing.wav"))
        .arg(dir.path().join("out.wav"))
        .output()
        .expect("failed to run lowcut render");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("WAV file error"), "stderr: {stderr}");
}

// tests/test_run.rs -- End-to-end pipeline: PNG bytes in, PNG bytes out.

use std::io::{self, Write};
use std::path::PathBuf;

use image::Rgb;
use sirds::{
    decode_image, encode_image, run, AllocationError, Channel, DepthChannel, PatternSource,
    PixelBuffer, RandomStyle, RunError, RunOptions, SynthesisParameters,
};

fn depth_png(width: u32, height: u32) -> Vec<u8> {
    let mut buf = PixelBuffer::create(width, height).unwrap();
    for y in 0..height {
        for x in 0..width {
            // Ramp in red, constant in green.
            buf.set(x, y, Rgb([(x * 255 / (width - 1)) as u8, 200, 0]));
        }
    }
    let mut bytes = Vec::new();
    encode_image(&buf, &mut bytes).unwrap();
    bytes
}

fn options(strength: f64) -> RunOptions {
    RunOptions {
        pattern: PatternSource::Random {
            seed: 4,
            style: RandomStyle::Dots,
        },
        params: SynthesisParameters {
            strength,
            ..Default::default()
        },
    }
}

/// A writer that refuses every write.
struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ===== Success =====

#[test]
fn run_writes_a_png_of_the_same_size() {
    let input = depth_png(64, 16);
    let mut output = Vec::new();
    let report = run(input.as_slice(), &mut output, options(0.2)).unwrap();
    assert_eq!((report.width, report.height), (64, 16));
    assert_eq!(report.stats.linked + report.stats.seeded, 64 * 16);

    let out = decode_image(output.as_slice()).unwrap();
    assert_eq!(out.dimensions(), (64, 16));
    // Dots style: black and white only.
    assert!(out
        .pixels()
        .all(|&p| p == Rgb([0, 0, 0]) || p == Rgb([255, 255, 255])));
}

#[test]
fn run_is_deterministic() {
    let input = depth_png(48, 8);
    let mut a = Vec::new();
    let mut b = Vec::new();
    run(input.as_slice(), &mut a, options(0.2)).unwrap();
    run(input.as_slice(), &mut b, options(0.2)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn channel_selection_changes_the_result() {
    let input = depth_png(64, 4);
    let mut lum = Vec::new();
    let mut green = Vec::new();
    run(input.as_slice(), &mut lum, options(0.2)).unwrap();
    let mut opts = options(0.2);
    opts.params.channel = DepthChannel::Explicit(Channel::Green);
    let report = run(input.as_slice(), &mut green, opts).unwrap();
    // A constant green channel is a flat depth map.
    assert_eq!(report.stats.rejected, 0);
    assert_ne!(lum, green);
}

#[test]
fn buffer_pattern_is_tiled() {
    let input = depth_png(32, 4);
    let pattern = PixelBuffer::from_pixels(1, 1, vec![Rgb([10, 20, 30])]).unwrap();
    let opts = RunOptions {
        pattern: PatternSource::Buffer(pattern),
        ..options(0.25)
    };
    let mut output = Vec::new();
    run(input.as_slice(), &mut output, opts).unwrap();
    let out = decode_image(output.as_slice()).unwrap();
    assert!(out.pixels().all(|&p| p == Rgb([10, 20, 30])));
}

// ===== Failure categories =====

#[test]
fn garbage_input_is_a_decode_failure() {
    let mut output = Vec::new();
    let err = run(&b"not a png"[..], &mut output, options(0.2)).unwrap_err();
    assert!(matches!(err, RunError::Decode(_)));
    assert_eq!(err.exit_code(), 1);
    assert!(output.is_empty());
}

#[test]
fn missing_pattern_is_an_allocation_failure() {
    let input = depth_png(16, 4);
    let opts = RunOptions {
        pattern: PatternSource::File(PathBuf::from("/nonexistent/pattern.png")),
        ..options(0.2)
    };
    let mut output = Vec::new();
    let err = run(input.as_slice(), &mut output, opts).unwrap_err();
    assert!(matches!(err, RunError::Allocation(AllocationError::Pattern(_))));
    assert_eq!(err.exit_code(), 2);
    assert!(output.is_empty());
}

#[test]
fn oversized_pattern_is_an_allocation_failure() {
    let input = depth_png(16, 4);
    let pattern = PixelBuffer::create(32, 2).unwrap();
    let opts = RunOptions {
        pattern: PatternSource::Buffer(pattern),
        ..options(0.2)
    };
    let mut output = Vec::new();
    let err = run(input.as_slice(), &mut output, opts).unwrap_err();
    assert!(matches!(
        err,
        RunError::Allocation(AllocationError::PatternTooLarge { .. })
    ));
    assert!(output.is_empty());
}

#[test]
fn zero_strength_is_a_synthesis_failure() {
    let input = depth_png(16, 4);
    let mut output = Vec::new();
    let err = run(input.as_slice(), &mut output, options(0.0)).unwrap_err();
    assert!(matches!(err, RunError::Synthesis(_)));
    assert_eq!(err.exit_code(), 3);
    assert!(output.is_empty());
}

#[test]
fn write_failure_is_an_encode_failure() {
    let input = depth_png(16, 4);
    let err = run(input.as_slice(), BrokenPipe, options(0.2)).unwrap_err();
    assert!(matches!(err, RunError::Encode(_)));
    assert_eq!(err.exit_code(), 4);
}

use std::io::{Read, Write};
use std::path::PathBuf;

use tracing::info;

use crate::codec::{decode_image, encode_image, load_pattern};
use crate::depth::{DepthBuffer, DepthChannel};
use crate::error::{AllocationError, RunError};
use crate::pixel_buffer::PixelBuffer;
use crate::synthesizer::{StereogramSynthesizer, SynthesisParameters, SynthesisStats};
use crate::tile::{RandomStyle, TileSource};

/// Where seed colours come from.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternSource {
    File(PathBuf),
    Buffer(PixelBuffer),
    Random { seed: u64, style: RandomStyle },
}

impl PatternSource {
    /// `random` selects noise, anything else is a pattern image path.
    pub fn from_arg(arg: &str, seed: u64, style: RandomStyle) -> Self {
        if arg.eq_ignore_ascii_case("random") {
            PatternSource::Random { seed, style }
        } else {
            PatternSource::File(PathBuf::from(arg))
        }
    }

    fn into_tile(self) -> Result<TileSource, AllocationError> {
        match self {
            PatternSource::File(path) => {
                let pattern = load_pattern(&path).map_err(AllocationError::Pattern)?;
                info!(path = %path.display(), width = pattern.width(), height = pattern.height(), "loaded pattern");
                Ok(TileSource::from_buffer(pattern))
            }
            PatternSource::Buffer(pattern) => Ok(TileSource::from_buffer(pattern)),
            PatternSource::Random { seed, style } => {
                Ok(TileSource::from_random_with_style(seed, style))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub pattern: PatternSource,
    pub params: SynthesisParameters,
}

impl Default for RunOptions {
    fn default() -> Self {
        RunOptions {
            pattern: PatternSource::Random {
                seed: 0,
                style: RandomStyle::default(),
            },
            params: SynthesisParameters::default(),
        }
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub width: u32,
    pub height: u32,
    pub stats: SynthesisStats,
}

/// Read a depth image from `input` and write its stereogram to `output`.
///
/// Each stage owns its buffers; the first failure is returned and nothing
/// is written to `output` unless every stage before encoding succeeded.
pub fn run<R: Read, W: Write>(
    input: R,
    output: W,
    options: RunOptions,
) -> Result<RunReport, RunError> {
    let mut depth_image = decode_image(input)?;
    let (width, height) = depth_image.dimensions();
    info!(width, height, "decoded depth image");

    let depth = match options.params.channel {
        DepthChannel::Luminance => DepthBuffer::from_luminance(&mut depth_image),
        channel => DepthBuffer::from_buffer(&depth_image, channel),
    };
    drop(depth_image);

    let tile = options.pattern.into_tile()?;
    tile.verify_fits(width, height)?;
    let mut stereogram = PixelBuffer::create(width, height)?;

    let synth = StereogramSynthesizer::new(options.params, tile);
    let stats = synth.apply(&depth, &mut stereogram)?;
    info!(
        linked = stats.linked,
        seeded = stats.seeded,
        rejected = stats.rejected,
        "applied stereogram effect"
    );

    encode_image(&stereogram, output)?;
    info!("wrote stereogram");

    Ok(RunReport {
        width,
        height,
        stats,
    })
}

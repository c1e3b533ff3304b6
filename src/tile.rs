use std::fmt;
use std::str::FromStr;

use image::Rgb;
use rand::RngCore;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;

use crate::error::AllocationError;
use crate::pixel_buffer::{Pixel, PixelBuffer};

/// Look of generated noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RandomStyle {
    /// Independent random channels.
    #[default]
    Color,
    /// One random level copied to all channels.
    Grayscale,
    /// Black or white only.
    Dots,
}

impl FromStr for RandomStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "color" | "colour" => Ok(RandomStyle::Color),
            "gray" | "grey" | "grayscale" | "greyscale" => Ok(RandomStyle::Grayscale),
            "dots" | "mono" => Ok(RandomStyle::Dots),
            other => Err(format!(
                "unknown random style '{other}', expected color, grayscale or dots"
            )),
        }
    }
}

impl fmt::Display for RandomStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RandomStyle::Color => "color",
            RandomStyle::Grayscale => "grayscale",
            RandomStyle::Dots => "dots",
        })
    }
}

/// Supplies the colour of an unlinked pixel.
#[derive(Debug, Clone)]
pub enum TileSource {
    /// A pattern repeated in both directions.
    Pattern(PixelBuffer),
    /// Noise addressed by coordinate; the same `(seed, x, y)` always
    /// yields the same pixel.
    Random { seed: u64, style: RandomStyle },
}

impl TileSource {
    pub fn from_buffer(pattern: PixelBuffer) -> Self {
        TileSource::Pattern(pattern)
    }

    pub fn from_random(seed: u64) -> Self {
        Self::from_random_with_style(seed, RandomStyle::default())
    }

    pub fn from_random_with_style(seed: u64, style: RandomStyle) -> Self {
        TileSource::Random { seed, style }
    }

    /// Reject a pattern that does not fit inside a `width` x `height` output.
    pub fn verify_fits(&self, width: u32, height: u32) -> Result<(), AllocationError> {
        match self {
            TileSource::Pattern(p) if p.width() > width || p.height() > height => {
                Err(AllocationError::PatternTooLarge {
                    pattern_width: p.width(),
                    pattern_height: p.height(),
                    width,
                    height,
                })
            }
            _ => Ok(()),
        }
    }

    #[inline]
    pub fn pixel_at(&self, x: u32, y: u32) -> Pixel {
        match self {
            TileSource::Pattern(p) => p.get(x % p.width(), y % p.height()),
            TileSource::Random { seed, style } => random_pixel(*seed, *style, x, y),
        }
    }
}

// Counter-based lookup: each row is its own ChaCha stream and each column a
// word in it, so any coordinate can be drawn without generating its
// predecessors.
fn random_pixel(seed: u64, style: RandomStyle, x: u32, y: u32) -> Pixel {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(y as u64);
    rng.set_word_pos(x as u128);
    let [r, g, b, _] = rng.next_u32().to_le_bytes();
    match style {
        RandomStyle::Color => Rgb([r, g, b]),
        RandomStyle::Grayscale => Rgb([r, r, r]),
        RandomStyle::Dots => {
            let v = if r & 1 == 1 { 255 } else { 0 };
            Rgb([v, v, v])
        }
    }
}

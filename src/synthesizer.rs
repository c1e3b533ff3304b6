use std::ops::{Add, AddAssign};

use ndarray::ArrayView1;
use rayon::prelude::*;
use tracing::debug;

use crate::depth::{DepthBuffer, DepthChannel};
use crate::error::{RunError, SynthesisError};
use crate::links::LinkMap;
use crate::pixel_buffer::{PixelBuffer, CHANNELS};
use crate::separation::{SeparationRange, DEFAULT_DEPTH_FALLOFF};
use crate::tile::TileSource;

pub const DEFAULT_STRENGTH: f64 = 0.1;
pub const DEFAULT_DRIFT_TOLERANCE: u32 = 1;

/// Knobs of one synthesis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthesisParameters {
    /// Maximum separation as a fraction of the image width.
    pub strength: f64,
    /// Read depth as `1 - depth`.
    pub invert_depth: bool,
    /// Source of depth samples.
    pub channel: DepthChannel,
    /// Minimum separation as a fraction of the maximum one.
    pub depth_falloff: f64,
    /// Largest separation difference tolerated when chaining onto an
    /// already linked pixel.
    pub drift_tolerance: u32,
    /// Synthesize rows on the rayon pool.
    pub parallel: bool,
}

impl Default for SynthesisParameters {
    fn default() -> Self {
        SynthesisParameters {
            strength: DEFAULT_STRENGTH,
            invert_depth: false,
            channel: DepthChannel::Luminance,
            depth_falloff: DEFAULT_DEPTH_FALLOFF,
            drift_tolerance: DEFAULT_DRIFT_TOLERANCE,
            parallel: true,
        }
    }
}

impl SynthesisParameters {
    pub fn validate(&self) -> Result<(), SynthesisError> {
        if !self.strength.is_finite() || self.strength <= 0.0 {
            return Err(SynthesisError::InvalidStrength(self.strength));
        }
        if !(0.0..=1.0).contains(&self.depth_falloff) {
            return Err(SynthesisError::InvalidFalloff(self.depth_falloff));
        }
        Ok(())
    }

    pub fn separation_range(&self, width: u32) -> SeparationRange {
        SeparationRange::new(width, self.strength, self.depth_falloff)
    }
}

/// Pixel counts of one synthesis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SynthesisStats {
    /// Pixels copied from an earlier pixel of the same row.
    pub linked: u64,
    /// Pixels taken from the tile source.
    pub seeded: u64,
    /// Seeded pixels whose link was refused by the drift check.
    pub rejected: u64,
}

impl Add for SynthesisStats {
    type Output = SynthesisStats;

    fn add(self, o: SynthesisStats) -> SynthesisStats {
        SynthesisStats {
            linked: self.linked + o.linked,
            seeded: self.seeded + o.seeded,
            rejected: self.rejected + o.rejected,
        }
    }
}

impl AddAssign for SynthesisStats {
    fn add_assign(&mut self, o: SynthesisStats) {
        *self = *self + o;
    }
}

/// Builds a stereogram from a depth buffer and a tile source.
#[derive(Debug, Clone)]
pub struct StereogramSynthesizer {
    params: SynthesisParameters,
    tile: TileSource,
}

impl StereogramSynthesizer {
    pub fn new(params: SynthesisParameters, tile: TileSource) -> Self {
        StereogramSynthesizer { params, tile }
    }

    /// Fill `output` with the stereogram of `depth`.
    ///
    /// `output` must have the extents of `depth`; every pixel is written.
    pub fn apply(
        &self,
        depth: &DepthBuffer,
        output: &mut PixelBuffer,
    ) -> Result<SynthesisStats, SynthesisError> {
        self.params.validate()?;
        if depth.dimensions() != output.dimensions() {
            return Err(SynthesisError::ExtentMismatch {
                depth: depth.dimensions(),
                output: output.dimensions(),
            });
        }

        let row_len = output.width() as usize * CHANNELS;
        let range = self.params.separation_range(output.width());
        debug!(min = range.min, max = range.max, "separation range");

        let stats = if self.params.parallel {
            output
                .samples_mut()
                .par_chunks_mut(row_len)
                .enumerate()
                .map(|(y, row)| self.synthesize_row(depth.row(y as u32), y as u32, range, row))
                .reduce(SynthesisStats::default, Add::add)
        } else {
            output
                .rows_mut()
                .enumerate()
                .map(|(y, row)| self.synthesize_row(depth.row(y as u32), y as u32, range, row))
                .fold(SynthesisStats::default(), Add::add)
        };

        debug!(
            linked = stats.linked,
            seeded = stats.seeded,
            rejected = stats.rejected,
            "synthesis finished"
        );
        Ok(stats)
    }

    /// Allocate an output of the depth buffer's extents and fill it.
    ///
    /// Returns `RunError` rather than `SynthesisError` because the allocation
    /// can fail too, and callers need to tell the two stages apart.
    pub fn synthesize(&self, depth: &DepthBuffer) -> Result<PixelBuffer, RunError> {
        let (w, h) = depth.dimensions();
        let mut output = PixelBuffer::create(w, h)?;
        self.apply(depth, &mut output)?;
        Ok(output)
    }

    // One left-to-right pass. Pixel x copies the root of the chain at
    // x - separation, unless that pixel's own link disagrees by more than
    // the drift tolerance; unlinked pixels come from the tile.
    fn synthesize_row(
        &self,
        depth_row: ArrayView1<'_, u8>,
        y: u32,
        range: SeparationRange,
        out: &mut [u8],
    ) -> SynthesisStats {
        let width = out.len() / CHANNELS;
        let mut links = LinkMap::new(width);
        let mut stats = SynthesisStats::default();

        for x in 0..width {
            let s = range.at_sample(depth_row[x], self.params.invert_depth);
            let mut linked = false;
            if s > 0 && s as usize <= x {
                let target = x - s as usize;
                let compatible = match links.separation(target) {
                    Some(prev) => prev.abs_diff(s) <= self.params.drift_tolerance,
                    None => true,
                };
                if compatible {
                    let root = links.find(target);
                    links.link(x, root, s);
                    let src = root * CHANNELS;
                    out.copy_within(src..src + CHANNELS, x * CHANNELS);
                    linked = true;
                } else {
                    stats.rejected += 1;
                }
            }
            if linked {
                stats.linked += 1;
            } else {
                let seed = self.tile.pixel_at(x as u32, y);
                out[x * CHANNELS..(x + 1) * CHANNELS].copy_from_slice(&seed.0);
                stats.seeded += 1;
            }
        }
        stats
    }
}

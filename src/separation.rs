/// Default ratio of the far-plane separation to the near-plane one.
pub const DEFAULT_DEPTH_FALLOFF: f64 = 0.8;

/// Integer separation range for one output width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeparationRange {
    pub min: u32,
    pub max: u32,
}

impl SeparationRange {
    /// `max = floor(width * strength)`, `min = floor(max * falloff)`.
    ///
    /// Callers validate `strength > 0` and `falloff` in [0, 1].
    pub fn new(width: u32, strength: f64, falloff: f64) -> Self {
        let max = (width as f64 * strength).floor() as u32;
        let min = (max as f64 * falloff).floor() as u32;
        SeparationRange { min, max }
    }

    /// Separation for a normalized depth in [0, 1], truncated.
    ///
    /// With `invert` the depth is read as `1 - depth`.
    #[inline]
    pub fn at(&self, depth: f64, invert: bool) -> u32 {
        let d = if invert { 1.0 - depth } else { depth };
        let spread = (self.max - self.min) as f64;
        self.min + (spread * d.clamp(0.0, 1.0)).floor() as u32
    }

    /// Separation for a raw 8-bit sample.
    #[inline]
    pub fn at_sample(&self, sample: u8, invert: bool) -> u32 {
        self.at(sample as f64 / 255.0, invert)
    }
}

use std::fmt;
use std::str::FromStr;

use ndarray::{Array2, ArrayView1};
use serde::Deserialize;

use crate::luminance::apply_luminance;
use crate::pixel_buffer::PixelBuffer;

/// A single colour channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }
}

/// Which samples feed the depth buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum DepthChannel {
    Explicit(Channel),
    /// Mean of the three channels.
    Luminance,
}

impl Default for DepthChannel {
    fn default() -> Self {
        DepthChannel::Luminance
    }
}

impl FromStr for DepthChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(DepthChannel::Explicit(Channel::Red)),
            "g" | "green" => Ok(DepthChannel::Explicit(Channel::Green)),
            "b" | "blue" => Ok(DepthChannel::Explicit(Channel::Blue)),
            "l" | "lum" | "luminance" => Ok(DepthChannel::Luminance),
            other => Err(format!(
                "unknown channel '{other}', expected red, green, blue or luminance"
            )),
        }
    }
}

impl TryFrom<String> for DepthChannel {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for DepthChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DepthChannel::Explicit(Channel::Red) => "red",
            DepthChannel::Explicit(Channel::Green) => "green",
            DepthChannel::Explicit(Channel::Blue) => "blue",
            DepthChannel::Luminance => "luminance",
        };
        f.write_str(name)
    }
}

/// Per-pixel depth samples, indexed `[[y, x]]`. 0 is the far plane.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    samples: Array2<u8>,
}

impl DepthBuffer {
    /// Read depth from `channel` of `buf`.
    ///
    /// For [`DepthChannel::Luminance`] the channel mean is computed on the
    /// fly without touching `buf`; the result equals running
    /// [`apply_luminance`] first and reading red.
    pub fn from_buffer(buf: &PixelBuffer, channel: DepthChannel) -> Self {
        let (w, h) = buf.dimensions();
        let samples = match channel {
            DepthChannel::Explicit(c) => {
                let i = c.index();
                Array2::from_shape_fn((h as usize, w as usize), |(y, x)| {
                    buf.get(x as u32, y as u32)[i]
                })
            }
            DepthChannel::Luminance => {
                Array2::from_shape_fn((h as usize, w as usize), |(y, x)| {
                    crate::luminance::luminance_of(buf.get(x as u32, y as u32))
                })
            }
        };
        DepthBuffer { samples }
    }

    /// Collapse `buf` to luminance in place, then read its red channel.
    pub fn from_luminance(buf: &mut PixelBuffer) -> Self {
        apply_luminance(buf);
        Self::from_buffer(buf, DepthChannel::Explicit(Channel::Red))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.samples.ncols() as u32
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.samples.nrows() as u32
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// Raw 8-bit sample.
    #[inline]
    pub fn sample(&self, x: u32, y: u32) -> u8 {
        self.samples[[y as usize, x as usize]]
    }

    /// Sample normalized to [0, 1].
    #[inline]
    pub fn depth(&self, x: u32, y: u32) -> f64 {
        self.sample(x, y) as f64 / 255.0
    }

    pub fn row(&self, y: u32) -> ArrayView1<'_, u8> {
        self.samples.row(y as usize)
    }
}

//! Single-image random-dot stereogram (SIRDS) synthesis.
//!
//! A depth map is read into a [`DepthBuffer`]; every scanline of the output
//! is then built left to right, each pixel copying the pixel one
//! depth-dependent separation to its left, or taking a fresh colour from a
//! [`TileSource`] when no link applies.

pub mod codec;
pub mod config;
pub mod depth;
pub mod error;
mod links;
pub mod luminance;
pub mod pixel_buffer;
pub mod run;
pub mod separation;
pub mod synthesizer;
pub mod tile;

pub use codec::{decode_image, encode_image, load_pattern};
pub use depth::{Channel, DepthBuffer, DepthChannel};
pub use error::{AllocationError, DecodeError, EncodeError, RunError, SynthesisError};
pub use luminance::apply_luminance;
pub use pixel_buffer::{Pixel, PixelBuffer};
pub use run::{run, PatternSource, RunOptions, RunReport};
pub use separation::SeparationRange;
pub use synthesizer::{StereogramSynthesizer, SynthesisParameters, SynthesisStats};
pub use tile::{RandomStyle, TileSource};

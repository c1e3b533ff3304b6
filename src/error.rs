use std::io;

use thiserror::Error;

/// The depth image (or a pattern image) could not be read.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("failed to read image stream: {0}")]
    Io(#[from] io::Error),

    #[error("failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("image has no pixels ({width}x{height})")]
    Empty { width: u32, height: u32 },
}

/// A buffer of the requested extents could not be constructed.
#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("buffer extents must be positive, got {width}x{height}")]
    EmptyExtent { width: u32, height: u32 },

    #[error("buffer of {width}x{height} pixels exceeds addressable memory")]
    TooLarge { width: u32, height: u32 },

    #[error("out of memory allocating {width}x{height} buffer")]
    OutOfMemory { width: u32, height: u32 },

    #[error("expected {expected} pixels, got {got}")]
    PixelCount { expected: usize, got: usize },

    #[error(
        "pattern {pattern_width}x{pattern_height} is larger than the {width}x{height} stereogram"
    )]
    PatternTooLarge {
        pattern_width: u32,
        pattern_height: u32,
        width: u32,
        height: u32,
    },

    #[error("failed to load pattern: {0}")]
    Pattern(#[source] DecodeError),
}

/// Synthesis parameters or extents are unusable.
#[derive(Debug, Error, PartialEq)]
pub enum SynthesisError {
    #[error("depth buffer is {depth:?} but output buffer is {output:?}")]
    ExtentMismatch {
        depth: (u32, u32),
        output: (u32, u32),
    },

    #[error("strength must be a finite value greater than 0, got {0}")]
    InvalidStrength(f64),

    #[error("depth falloff must lie in [0, 1], got {0}")]
    InvalidFalloff(f64),
}

/// The stereogram could not be written.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to write output stream: {0}")]
    Io(#[from] io::Error),
}

/// Failure of a whole [`run`](crate::run::run), tagged with the stage that failed.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to read the depth image: {0}")]
    Decode(#[from] DecodeError),

    #[error("failed to create the stereogram buffer: {0}")]
    Allocation(#[from] AllocationError),

    #[error("failed to apply the stereogram effect: {0}")]
    Synthesis(#[from] SynthesisError),

    #[error("failed to save the stereogram to the output file: {0}")]
    Encode(#[from] EncodeError),
}

impl RunError {
    /// Process exit status for this failure. Later stages give larger codes.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunError::Decode(_) => 1,
            RunError::Allocation(_) => 2,
            RunError::Synthesis(_) => 3,
            RunError::Encode(_) => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_grow_with_stage() {
        let codes = [
            RunError::from(DecodeError::Empty {
                width: 0,
                height: 0,
            })
            .exit_code(),
            RunError::from(AllocationError::EmptyExtent {
                width: 0,
                height: 1,
            })
            .exit_code(),
            RunError::from(SynthesisError::InvalidStrength(0.0)).exit_code(),
            RunError::from(EncodeError::Io(io::Error::new(io::ErrorKind::Other, "x"))).exit_code(),
        ];
        assert_eq!(codes, [1, 2, 3, 4]);
    }

    #[test]
    fn messages_name_the_stage() {
        let err = RunError::from(SynthesisError::ExtentMismatch {
            depth: (20, 20),
            output: (10, 10),
        });
        let msg = err.to_string();
        assert!(msg.starts_with("failed to apply the stereogram effect"));
        assert!(msg.contains("(20, 20)"));
    }
}

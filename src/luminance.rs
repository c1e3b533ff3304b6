use image::Rgb;

use crate::pixel_buffer::{Pixel, PixelBuffer, CHANNELS};

/// Truncating mean of the three channels.
#[inline]
pub fn luminance_of(p: Pixel) -> u8 {
    let Rgb([r, g, b]) = p;
    ((r as u16 + g as u16 + b as u16) / 3) as u8
}

/// Replace every pixel with its channel mean on all three channels.
///
/// Idempotent: once the channels are equal the mean is the channel value.
pub fn apply_luminance(buf: &mut PixelBuffer) {
    for px in buf.samples_mut().chunks_exact_mut(CHANNELS) {
        let m = luminance_of(Rgb([px[0], px[1], px[2]]));
        px.fill(m);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_truncates() {
        // 1 + 1 + 2 = 4, 4 / 3 = 1.33 -> 1
        assert_eq!(luminance_of(Rgb([1, 1, 2])), 1);
        // 2 + 2 + 1 = 5, 5 / 3 = 1.67 -> 1, not 2
        assert_eq!(luminance_of(Rgb([2, 2, 1])), 1);
        assert_eq!(luminance_of(Rgb([255, 255, 255])), 255);
        assert_eq!(luminance_of(Rgb([255, 255, 254])), 254);
    }

    #[test]
    fn applying_twice_equals_once() {
        let pixels = (0..12u8)
            .map(|i| Rgb([i.wrapping_mul(37), i.wrapping_mul(91), 255 - i]))
            .collect();
        let mut once = PixelBuffer::from_pixels(4, 3, pixels).unwrap();
        apply_luminance(&mut once);
        let mut twice = once.clone();
        apply_luminance(&mut twice);
        assert_eq!(once, twice);
        assert!(once.pixels().all(|p| p[0] == p[1] && p[1] == p[2]));
    }
}

use image::buffer::Pixels;
use image::{Rgb, RgbImage};

use crate::error::AllocationError;

/// Three 8-bit channels.
pub type Pixel = Rgb<u8>;

pub const BLACK: Pixel = Rgb([0, 0, 0]);

/// Bytes per pixel in a row slice.
pub const CHANNELS: usize = 3;

/// An `RgbImage` whose extents are both positive.
///
/// Rows are handed out as raw byte slices of `width * 3` interleaved
/// r, g, b samples.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer(RgbImage);

impl PixelBuffer {
    /// Allocate a black buffer.
    pub fn create(width: u32, height: u32) -> Result<Self, AllocationError> {
        if width == 0 || height == 0 {
            return Err(AllocationError::EmptyExtent { width, height });
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(CHANNELS))
            .ok_or(AllocationError::TooLarge { width, height })?;

        let mut data: Vec<u8> = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| AllocationError::OutOfMemory { width, height })?;
        data.resize(len, 0);

        RgbImage::from_raw(width, height, data)
            .map(PixelBuffer)
            .ok_or(AllocationError::TooLarge { width, height })
    }

    /// Build a buffer from `pixels` given row by row.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Pixel>) -> Result<Self, AllocationError> {
        let expected = width as usize * height as usize;
        if width > 0 && height > 0 && pixels.len() != expected {
            return Err(AllocationError::PixelCount {
                expected,
                got: pixels.len(),
            });
        }
        let mut buf = Self::create(width, height)?;
        for (dst, src) in buf.0.pixels_mut().zip(pixels) {
            *dst = src;
        }
        Ok(buf)
    }

    pub fn from_rgb_image(img: RgbImage) -> Result<Self, AllocationError> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(AllocationError::EmptyExtent { width, height });
        }
        Ok(PixelBuffer(img))
    }

    pub fn as_rgb_image(&self) -> &RgbImage {
        &self.0
    }

    pub fn into_rgb_image(self) -> RgbImage {
        self.0
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.0.height()
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    #[inline]
    fn row_len(&self) -> usize {
        self.0.width() as usize * CHANNELS
    }

    /// # Panics
    /// Panics if `y >= height`.
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.height(), "row {y} out of range (height {})", self.height());
        let n = self.row_len();
        let start = y as usize * n;
        &self.0.as_raw()[start..start + n]
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(y < self.height(), "row {y} out of range (height {})", self.height());
        let n = self.row_len();
        let start = y as usize * n;
        let raw: &mut [u8] = &mut self.0;
        &mut raw[start..start + n]
    }

    pub fn rows(&self) -> std::slice::ChunksExact<'_, u8> {
        let n = self.row_len();
        self.0.as_raw().chunks_exact(n)
    }

    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        let n = self.row_len();
        self.0.chunks_exact_mut(n)
    }

    pub fn pixels(&self) -> Pixels<'_, Pixel> {
        self.0.pixels()
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Pixel {
        *self.0.get_pixel(x, y)
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, p: Pixel) {
        self.0.put_pixel(x, y, p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_rejects_empty_extents() {
        assert!(matches!(
            PixelBuffer::create(0, 4),
            Err(AllocationError::EmptyExtent { width: 0, height: 4 })
        ));
        assert!(matches!(
            PixelBuffer::create(4, 0),
            Err(AllocationError::EmptyExtent { .. })
        ));
    }

    #[test]
    fn create_is_black() {
        let buf = PixelBuffer::create(3, 2).unwrap();
        assert_eq!(buf.dimensions(), (3, 2));
        assert!(buf.rows().all(|r| r.len() == 9));
        assert!(buf.pixels().all(|&p| p == BLACK));
    }

    #[test]
    fn huge_request_fails_without_panicking() {
        let res = PixelBuffer::create(u32::MAX, u32::MAX);
        assert!(matches!(
            res,
            Err(AllocationError::TooLarge { .. }) | Err(AllocationError::OutOfMemory { .. })
        ));
    }

    #[test]
    fn wrong_pixel_count_is_an_error() {
        let res = PixelBuffer::from_pixels(2, 2, vec![BLACK]);
        assert!(matches!(
            res,
            Err(AllocationError::PixelCount { expected: 4, got: 1 })
        ));
        let res = PixelBuffer::from_pixels(1, 1, vec![BLACK; 2]);
        assert!(matches!(res, Err(AllocationError::PixelCount { .. })));
    }

    #[test]
    fn rgb_image_is_moved_in_and_out() {
        let img = RgbImage::from_fn(4, 3, |x, y| Rgb([x as u8, y as u8, 7]));
        let buf = PixelBuffer::from_rgb_image(img.clone()).unwrap();
        assert_eq!(buf.get(3, 1), Rgb([3, 1, 7]));
        assert_eq!(&buf.row(2)[..3], &[0, 2, 7]);
        assert_eq!(buf.as_rgb_image(), &img);
        assert_eq!(buf.into_rgb_image(), img);
        assert!(PixelBuffer::from_rgb_image(RgbImage::new(0, 5)).is_err());
    }

    #[test]
    fn row_mut_writes_through() {
        let mut buf = PixelBuffer::create(2, 2).unwrap();
        buf.row_mut(1)[3..6].copy_from_slice(&[9, 8, 7]);
        assert_eq!(buf.get(1, 1), Rgb([9, 8, 7]));
        assert_eq!(buf.get(0, 1), BLACK);
    }

    #[test]
    #[should_panic]
    fn row_out_of_range_panics() {
        let buf = PixelBuffer::create(2, 2).unwrap();
        let _ = buf.row(2);
    }
}

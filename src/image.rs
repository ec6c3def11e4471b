use crate::{Color, Error};

/// Number of bytes taken up by a single pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// An owned raster of premultiplied `RGBA_8888` pixels, stored in row-major
/// order with no padding between rows.
///
/// Premultiplied storage matters for blurring: averaging premultiplied values
/// keeps transparent pixels from bleeding their (meaningless) color into their
/// opaque neighbors.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Image {
	width: u32,
	height: u32,
	pixels: Vec<u8>,
}
impl Image {
	/// Creates an image of the given dimensions, with every pixel set to the
	/// given color.
	pub fn filled(width: u32, height: u32, color: Color) -> Self {
		let pixel = color.to_premultiplied_rgba8();
		let count = width as usize * height as usize;

		let mut pixels = Vec::with_capacity(count * BYTES_PER_PIXEL);
		for _ in 0..count {
			pixels.extend_from_slice(&pixel);
		}

		Self { width, height, pixels }
	}

	/// Creates an image from a buffer of premultiplied `RGBA_8888` pixels.
	pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, Error> {
		let expected = (width as usize)
			.checked_mul(height as usize)
			.and_then(|count| count.checked_mul(BYTES_PER_PIXEL))
			.ok_or(Error::TooLarge { width, height })?;
		if pixels.len() != expected {
			return Err(Error::BufferSize {
				expected,
				actual: pixels.len()
			})
		}

		Ok(Self { width, height, pixels })
	}

	/// Wraps a buffer the caller already knows to be of the right size.
	pub(crate) fn from_raw_unchecked(width: u32, height: u32, pixels: Vec<u8>) -> Self {
		debug_assert_eq!(
			pixels.len(),
			width as usize * height as usize * BYTES_PER_PIXEL);
		Self { width, height, pixels }
	}

	/// Creates an image whose pixels are computed by the given function.
	pub fn from_fn<F>(width: u32, height: u32, mut pixel: F) -> Self
		where F: FnMut(u32, u32) -> [u8; 4] {

		let mut pixels = Vec::with_capacity(width as usize * height as usize * BYTES_PER_PIXEL);
		for y in 0..height {
			for x in 0..width {
				pixels.extend_from_slice(&pixel(x, y));
			}
		}

		Self { width, height, pixels }
	}

	pub fn width(&self) -> u32 {
		self.width
	}

	pub fn height(&self) -> u32 {
		self.height
	}

	/// Whether this image has no pixels at all.
	pub fn is_empty(&self) -> bool {
		self.width == 0 || self.height == 0
	}

	/// The raw pixel data of this image.
	pub fn pixels(&self) -> &[u8] {
		&self.pixels
	}

	/// The pixel at the given location, if it lies inside the image.
	pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
		if x >= self.width || y >= self.height {
			return None
		}

		let index = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
		let mut pixel = [0; 4];
		pixel.copy_from_slice(&self.pixels[index..index + BYTES_PER_PIXEL]);

		Some(pixel)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn raw_buffer_size_is_checked() {
		assert!(Image::from_raw(2, 2, vec![0; 16]).is_ok());
		match Image::from_raw(2, 2, vec![0; 15]) {
			Err(Error::BufferSize { expected: 16, actual: 15 }) => {},
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn pixels_are_row_major() {
		let image = Image::from_fn(3, 2, |x, y| [x as u8, y as u8, 0, 255]);
		assert_eq!(image.pixel(2, 1), Some([2, 1, 0, 255]));
		assert_eq!(image.pixel(0, 1), Some([0, 1, 0, 255]));
		assert_eq!(image.pixel(3, 0), None);
		assert_eq!(image.pixels().len(), 3 * 2 * BYTES_PER_PIXEL);
	}

	#[test]
	fn filled_premultiplies() {
		let image = Image::filled(1, 1, Color::WHITE.with_alpha(0.5));
		assert_eq!(image.pixel(0, 0), Some([128, 128, 128, 128]));
		assert!(Image::filled(0, 4, Color::RED).is_empty());
	}
}

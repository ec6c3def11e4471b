use crate::image::BYTES_PER_PIXEL;
use crate::{Error, Image};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// How many standard deviations away from the center the Gaussian kernel
/// reaches before it is cut off. Weights past this point are below 1.2% of
/// the center weight and make no visible difference on 8-bit channels.
const KERNEL_EXTENT: f64 = 3.0;

/// Maximum number of kernels kept around by the kernel cache.
const KERNEL_CACHE_CAPACITY: usize = 64;

/// Default ceiling on the number of pixels an image may have to be blurred.
const DEFAULT_PIXEL_LIMIT: usize = 1 << 26;

lazy_static::lazy_static! {
	/// Kernels we've already computed, keyed by the bit pattern of the
	/// standard deviation and the half-width they were computed for.
	static ref KERNELS: Mutex<HashMap<(u64, u32), Arc<Vec<f32>>>> = Default::default();
}

/// An image filter stage, as used by the backdrop pipeline.
///
/// Filters must never modify their input, and must produce an image with the
/// same dimensions as their input when they succeed. Failure is not fatal for
/// the pipeline: it falls back to presenting the unfiltered image.
pub trait Filter {
	/// Filters the given image with the given blur strength.
	fn apply(&self, image: &Image, radius: f64) -> Result<Image, Error>;
}

/// A Gaussian blur with clamped edges.
///
/// Taps that fall outside of the image sample the closest pixel along its
/// border instead, as if the border had been extended outward forever. Pixels
/// near the edge thus get averaged against copies of their neighbors instead
/// of against transparent black, and the backdrop doesn't darken towards its
/// edges. The output always has the extent of the input.
///
/// The radius is used as the standard deviation of the Gaussian, in pixels of
/// the input image. A radius of zero copies the image unchanged. The kernel
/// never reaches further than the image is long, since every tap past that
/// point would sample the same border pixel anyway.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct GaussianBlur {
	pixel_limit: usize,
}
impl GaussianBlur {
	pub fn new() -> Self {
		Self { pixel_limit: DEFAULT_PIXEL_LIMIT }
	}

	/// Limits the size, in pixels, of the images this filter will blur.
	/// Bigger images fail with [`Error::TooLarge`].
	pub fn with_pixel_limit(self, pixel_limit: usize) -> Self {
		Self { pixel_limit }
	}
}
impl Default for GaussianBlur {
	fn default() -> Self {
		Self::new()
	}
}
impl Filter for GaussianBlur {
	fn apply(&self, image: &Image, radius: f64) -> Result<Image, Error> {
		if !radius.is_finite() || radius < 0.0 {
			return Err(Error::InvalidRadius(radius))
		}
		if image.is_empty() {
			return Err(Error::EmptyImage)
		}
		if image.width() as usize * image.height() as usize > self.pixel_limit {
			return Err(Error::TooLarge {
				width: image.width(),
				height: image.height()
			})
		}

		let longest = image.width().max(image.height());
		let half = (KERNEL_EXTENT * radius).ceil().min(f64::from(longest)) as u32;
		if half == 0 {
			return Ok(image.clone())
		}

		let kernel = kernel(radius, half);
		Ok(convolve(image, &kernel))
	}
}

/// Retrieves the normalized Gaussian kernel for the given standard deviation,
/// reaching `half` taps to either side of the center, computing it if it
/// isn't cached yet.
fn kernel(sigma: f64, half: u32) -> Arc<Vec<f32>> {
	let key = (sigma.to_bits(), half);

	let mut cache = match KERNELS.lock() {
		Ok(cache) => cache,
		/* The cache holds nothing a panic could have left half-written. */
		Err(poisoned) => poisoned.into_inner()
	};
	if let Some(kernel) = cache.get(&key) {
		return kernel.clone()
	}

	if cache.len() >= KERNEL_CACHE_CAPACITY {
		log::trace!("Gaussian kernel cache is full, dropping {} kernels.", cache.len());
		cache.clear();
	}

	let kernel = Arc::new(gaussian_weights(sigma, half));
	cache.insert(key, kernel.clone());
	kernel
}

/// Computes the `2 * half + 1` weights of a Gaussian kernel with the given
/// standard deviation. The weights always add up to one.
fn gaussian_weights(sigma: f64, half: u32) -> Vec<f32> {
	let denominator = 2.0 * sigma * sigma;
	if half == 0 || denominator <= 0.0 {
		/* Too narrow to be told apart from a single tap. */
		return vec![1.0]
	}

	let half = i64::from(half);
	let weights = (-half..=half)
		.map(|i| {
			let x = i as f64;
			/* Past the range of f64, the denominator turns infinite and the
			 * kernel degenerates into a box, which is the right limit. */
			(-x * x / denominator).exp()
		})
		.collect::<Vec<_>>();
	let sum = weights.iter().sum::<f64>();

	weights.into_iter()
		.map(|weight| (weight / sum) as f32)
		.collect()
}

/// Runs the separable convolution of the given kernel over an image, clamping
/// every tap to the edges of the image.
fn convolve(image: &Image, kernel: &[f32]) -> Image {
	let width = image.width() as usize;
	let height = image.height() as usize;
	let reach = (kernel.len() / 2) as isize;

	let mut horizontal = vec![0u8; image.pixels().len()];
	horizontal_pass(image.pixels(), &mut horizontal, width, height, reach, kernel);

	let mut pixels = vec![0u8; horizontal.len()];
	vertical_pass(&horizontal, &mut pixels, width, height, reach, kernel);

	Image::from_raw_unchecked(width as u32, height as u32, pixels)
}

fn horizontal_pass(
	source: &[u8],
	target: &mut [u8],
	width: usize,
	height: usize,
	reach: isize,
	kernel: &[f32]) {

	let last = width as isize - 1;
	for y in 0..height {
		let row = y * width;
		for x in 0..width {
			let mut accumulator = [0f32; BYTES_PER_PIXEL];
			for (tap, weight) in kernel.iter().enumerate() {
				let sx = (x as isize + tap as isize - reach).clamp(0, last) as usize;
				let index = (row + sx) * BYTES_PER_PIXEL;
				for channel in 0..BYTES_PER_PIXEL {
					accumulator[channel] += weight * f32::from(source[index + channel]);
				}
			}
			store(target, (row + x) * BYTES_PER_PIXEL, &accumulator);
		}
	}
}

fn vertical_pass(
	source: &[u8],
	target: &mut [u8],
	width: usize,
	height: usize,
	reach: isize,
	kernel: &[f32]) {

	let last = height as isize - 1;
	for y in 0..height {
		for x in 0..width {
			let mut accumulator = [0f32; BYTES_PER_PIXEL];
			for (tap, weight) in kernel.iter().enumerate() {
				let sy = (y as isize + tap as isize - reach).clamp(0, last) as usize;
				let index = (sy * width + x) * BYTES_PER_PIXEL;
				for channel in 0..BYTES_PER_PIXEL {
					accumulator[channel] += weight * f32::from(source[index + channel]);
				}
			}
			store(target, (y * width + x) * BYTES_PER_PIXEL, &accumulator);
		}
	}
}

fn store(target: &mut [u8], index: usize, accumulator: &[f32; BYTES_PER_PIXEL]) {
	for channel in 0..BYTES_PER_PIXEL {
		target[index + channel] = accumulator[channel].round().clamp(0.0, 255.0) as u8;
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::Color;

	fn checkerboard(width: u32, height: u32) -> Image {
		Image::from_fn(width, height, |x, y| {
			if (x + y) % 2 == 0 { [255, 255, 255, 255] } else { [0, 0, 0, 255] }
		})
	}

	/// Vertical stripes, three pixels wide.
	fn stripes(width: u32, height: u32) -> Image {
		Image::from_fn(width, height, |x, _| {
			if x % 6 < 3 { [255, 255, 255, 255] } else { [0, 0, 0, 255] }
		})
	}

	#[test]
	fn kernel_is_normalized_and_symmetric() {
		let kernel = gaussian_weights(2.0, 6);
		assert_eq!(kernel.len(), 13);

		let sum = kernel.iter().sum::<f32>();
		assert!((sum - 1.0).abs() < 1e-5);
		for i in 0..kernel.len() / 2 {
			assert_eq!(kernel[i], kernel[kernel.len() - 1 - i]);
		}
		assert!(kernel[6] > kernel[5]);
	}

	#[test]
	fn zero_radius_is_identity() {
		let image = checkerboard(5, 4);
		let blurred = GaussianBlur::new().apply(&image, 0.0).unwrap();
		assert_eq!(blurred, image);
	}

	#[test]
	fn constant_image_stays_constant() {
		/* Thanks to the edge clamp, not even the border pixels darken. */
		let image = Image::filled(6, 3, Color::rgb(0.2, 0.4, 0.6));
		let blurred = GaussianBlur::new().apply(&image, 4.0).unwrap();
		assert_eq!(blurred, image);
	}

	#[test]
	fn blur_keeps_dimensions_and_smooths() {
		let image = checkerboard(8, 8);
		let blurred = GaussianBlur::new().apply(&image, 3.0).unwrap();

		assert_eq!(blurred.width(), 8);
		assert_eq!(blurred.height(), 8);
		let [red, _, _, alpha] = blurred.pixel(4, 4).unwrap();
		assert!(red > 100 && red < 155, "center should be close to gray, got {}", red);
		assert_eq!(alpha, 255);
	}

	#[test]
	fn edges_sample_the_border() {
		/* White on the left half, black on the right. Every tap of the
		 * leftmost pixel lands on white, whether in the image or past it. */
		let image = Image::from_fn(16, 1, |x, _| {
			if x < 8 { [255, 255, 255, 255] } else { [0, 0, 0, 255] }
		});
		let blurred = GaussianBlur::new().apply(&image, 1.0).unwrap();

		assert_eq!(blurred.pixel(0, 0), Some([255, 255, 255, 255]));
		assert_eq!(blurred.pixel(15, 0), Some([0, 0, 0, 255]));
		let [red, _, _, _] = blurred.pixel(8, 0).unwrap();
		assert!(red > 0 && red < 255);
	}

	#[test]
	fn rejects_bad_input() {
		let blur = GaussianBlur::new();
		let image = checkerboard(4, 4);

		assert!(matches!(blur.apply(&image, -1.0), Err(Error::InvalidRadius(_))));
		assert!(matches!(blur.apply(&image, f64::NAN), Err(Error::InvalidRadius(_))));
		assert!(matches!(blur.apply(&image, f64::INFINITY), Err(Error::InvalidRadius(_))));
		assert!(matches!(blur.apply(&Image::filled(0, 0, Color::RED), 2.0), Err(Error::EmptyImage)));
	}

	#[test]
	fn huge_radius_averages_the_image() {
		/* The kernel stops at the size of the image and flattens into a box,
		 * so everything ends up close to the mean. */
		let image = stripes(6, 2);
		let blurred = GaussianBlur::new().apply(&image, 1e300).unwrap();

		assert_eq!((blurred.width(), blurred.height()), (6, 2));
		for x in 0..6 {
			let [red, _, _, alpha] = blurred.pixel(x, 0).unwrap();
			assert!(red > 64 && red < 192, "pixel {} should be close to gray, got {}", x, red);
			assert_eq!(alpha, 255);
		}
	}

	#[test]
	fn pixel_limit_only_looks_at_the_image() {
		let limited = GaussianBlur::new().with_pixel_limit(100);
		assert!(limited.apply(&checkerboard(10, 10), 40.0).is_ok());
		assert!(matches!(
			limited.apply(&checkerboard(11, 10), 1.0),
			Err(Error::TooLarge { width: 11, height: 10 })));
	}

	#[test]
	fn blurs_large_snapshots() {
		/* A 2x snapshot of a 2050x2048 point window. Padded by the kernel's
		 * reach on every side, it would be over 2^24 pixels. */
		let image = stripes(4100, 4096);
		let blurred = GaussianBlur::new().apply(&image, 1.0).unwrap();

		assert_eq!((blurred.width(), blurred.height()), (4100, 4096));
		assert_ne!(blurred.pixel(2, 2048), image.pixel(2, 2048));
		assert_ne!(blurred.pixel(4097, 4095), image.pixel(4097, 4095));
	}

	#[test]
	fn kernels_are_cached() {
		let first = kernel(1.75, 6);
		let second = kernel(1.75, 6);
		assert!(Arc::ptr_eq(&first, &second));
	}
}

/// Points, sizes and rectangles.
mod geometry;
pub use geometry::*;

/// Colors for tinting.
mod color;
pub use color::*;

/// In-memory rasters.
mod image;
pub use image::{Image, BYTES_PER_PIXEL};

/// The filter stage snapshots go through before being presented.
mod filter;
pub use filter::*;

/// Compositing primitives.
mod layer;
pub use layer::*;

/// Interface to the display surfaces views live on.
mod surface;
pub use surface::*;

/// Explicit delivery of geometry changes to views.
mod layout;
pub use layout::*;

/// Construction-time configuration of views.
mod options;
pub use options::*;

/// The frosted glass view itself.
mod view;
pub use view::*;

/// Errors types that may be triggered from frostview functions.
///
/// None of these ever reach users of [`BackdropView`], which degrades to
/// presenting an unblurred backdrop instead. They surface from the lower
/// level building blocks, such as [`Image::from_raw`] and [`Filter::apply`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// This error indicates that a blur radius was negative, infinite or not a
	/// number at all.
	#[error("invalid blur radius: {0}")]
	InvalidRadius(f64),
	/// This error indicates that an image with no pixels was given to an
	/// operation that needs at least one.
	#[error("image has no pixels")]
	EmptyImage,
	/// This error indicates that an image, either given or one that would have
	/// to be created along the way, is too big to be worked with.
	#[error("image of {width}x{height} pixels is too large")]
	TooLarge {
		width: u32,
		height: u32,
	},
	/// This error indicates that a pixel buffer doesn't have the size its
	/// dimensions call for.
	#[error("pixel buffer has {actual} bytes, expected {expected}")]
	BufferSize {
		expected: usize,
		actual: usize,
	},
}

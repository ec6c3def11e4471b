/// A location in a two-dimensional coordinate space, measured in points.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}
impl Point {
	pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// The extent of a rectangle, measured in points.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Size {
	pub width: f64,
	pub height: f64,
}
impl Size {
	pub const ZERO: Self = Self { width: 0.0, height: 0.0 };

	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}
}

/// An axis-aligned rectangle, measured in points.
///
/// Rectangles carry no notion of which coordinate space they're expressed in.
/// That is always given by context: a view's frame lives in the coordinate
/// space of its parent, while its bounds live in its own.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
	pub origin: Point,
	pub size: Size,
}
impl Rect {
	pub const ZERO: Self = Self { origin: Point::ZERO, size: Size::ZERO };

	pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
		Self {
			origin: Point::new(x, y),
			size: Size::new(width, height)
		}
	}

	/// Rectangle with the given size, anchored at the origin.
	pub fn from_size(size: Size) -> Self {
		Self { origin: Point::ZERO, size }
	}

	pub fn x(&self) -> f64 { self.origin.x }
	pub fn y(&self) -> f64 { self.origin.y }
	pub fn width(&self) -> f64 { self.size.width }
	pub fn height(&self) -> f64 { self.size.height }

	/// Whether this rectangle covers no area at all.
	pub fn is_empty(&self) -> bool {
		!(self.size.width > 0.0 && self.size.height > 0.0)
	}

	/// This rectangle, moved by the given amount.
	pub fn offset(&self, dx: f64, dy: f64) -> Self {
		Self::new(self.x() + dx, self.y() + dy, self.width(), self.height())
	}

	/// The smallest whole-pixel rectangle that covers this rectangle once it
	/// has been scaled from points into pixels by the given factor.
	///
	/// Degenerate inputs, be them negative sizes or non-finite coordinates,
	/// produce an empty pixel rectangle instead of wrapping around.
	pub fn to_pixels(&self, scale: f64) -> PixelRect {
		let left = (self.x() * scale).floor();
		let top = (self.y() * scale).floor();
		let right = ((self.x() + self.width()) * scale).ceil();
		let bottom = ((self.y() + self.height()) * scale).ceil();

		if !(left.is_finite() && top.is_finite()
			&& right.is_finite() && bottom.is_finite()) {
			return PixelRect::default()
		}

		PixelRect {
			x: left as i64,
			y: top as i64,
			width: (right - left).max(0.0) as u32,
			height: (bottom - top).max(0.0) as u32,
		}
	}
}

/// A rectangle in whole device pixels.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct PixelRect {
	pub x: i64,
	pub y: i64,
	pub width: u32,
	pub height: u32,
}
impl PixelRect {
	pub fn is_empty(&self) -> bool {
		self.width == 0 || self.height == 0
	}
}

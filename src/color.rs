/// A color with straight (non-premultiplied) alpha.
///
/// Components are expected to lie in `0.0..=1.0`. Nothing enforces this, but
/// conversion into bytes clamps every component into that range first.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
	pub red: f32,
	pub green: f32,
	pub blue: f32,
	pub alpha: f32,
}
impl Color {
	pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
	pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
	pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);

	pub const fn rgba(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
		Self { red, green, blue, alpha }
	}

	pub const fn rgb(red: f32, green: f32, blue: f32) -> Self {
		Self::rgba(red, green, blue, 1.0)
	}

	/// This color, with its alpha replaced.
	pub fn with_alpha(self, alpha: f32) -> Self {
		Self { alpha, ..self }
	}

	/// Encodes this color as a premultiplied `RGBA_8888` pixel, the format
	/// used by [`Image`](crate::Image).
	pub fn to_premultiplied_rgba8(&self) -> [u8; 4] {
		let alpha = self.alpha.clamp(0.0, 1.0);
		let encode = |c: f32| (c.clamp(0.0, 1.0) * alpha * 255.0).round() as u8;

		[
			encode(self.red),
			encode(self.green),
			encode(self.blue),
			(alpha * 255.0).round() as u8,
		]
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn premultiplies_on_encode() {
		assert_eq!(Color::RED.to_premultiplied_rgba8(), [255, 0, 0, 255]);
		assert_eq!(Color::WHITE.with_alpha(0.5).to_premultiplied_rgba8(), [128, 128, 128, 128]);
		assert_eq!(Color::rgba(2.0, -1.0, 0.0, 1.0).to_premultiplied_rgba8(), [255, 0, 0, 255]);
	}
}

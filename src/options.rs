use crate::Color;

/// Styles of native blur effect a host may have applied to a view.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Style {
	ExtraLight,
	Light,
	Dark,
	Regular,
	Prominent,
}

/// A native visual effect occupying the effect slot of a view.
///
/// The backdrop pipeline and a native effect are two different treatments of
/// the same region, and they don't compose. Whenever the pipeline presents a
/// new backdrop, it clears whatever effect is in the slot.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Effect {
	pub style: Style,
}
impl Effect {
	pub fn new(style: Style) -> Self {
		Self { style }
	}
}

/// Initial configuration for a [`BackdropView`](crate::BackdropView).
///
/// The default configuration has no effect and no tint, a tint alpha of zero,
/// a blur radius of zero and a content scale of one.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Options {
	/// Native effect initially occupying the effect slot of the view.
	pub effect: Option<Effect>,
	/// Color the backdrop gets tinted with.
	pub tint_color: Option<Color>,
	/// Opacity of the tint, from `0.0` to `1.0`.
	pub tint_alpha: f64,
	/// Standard deviation of the blur, in snapshot pixels.
	pub blur_radius: f64,
	/// Pixels per point used when taking snapshots.
	pub content_scale: f64,
}
impl Options {
	pub fn with_effect(self, effect: Effect) -> Self {
		Self { effect: Some(effect), ..self }
	}

	pub fn with_tint(self, color: Color, alpha: f64) -> Self {
		Self {
			tint_color: Some(color),
			tint_alpha: alpha,
			..self
		}
	}

	pub fn with_blur_radius(self, radius: f64) -> Self {
		Self { blur_radius: radius, ..self }
	}

	pub fn with_content_scale(self, scale: f64) -> Self {
		Self { content_scale: scale, ..self }
	}
}
impl Default for Options {
	fn default() -> Self {
		Self {
			effect: None,
			tint_color: None,
			tint_alpha: 0.0,
			blur_radius: 0.0,
			content_scale: 1.0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let options = Options::default();
		assert_eq!(options.effect, None);
		assert_eq!(options.tint_color, None);
		assert_eq!(options.tint_alpha, 0.0);
		assert_eq!(options.blur_radius, 0.0);
		assert_eq!(options.content_scale, 1.0);
	}

	#[test]
	fn builders_only_touch_their_fields() {
		let options = Options::default()
			.with_blur_radius(8.0)
			.with_tint(Color::RED, 0.3);
		assert_eq!(options.blur_radius, 8.0);
		assert_eq!(options.tint_color, Some(Color::RED));
		assert_eq!(options.tint_alpha, 0.3);
		assert_eq!(options.content_scale, 1.0);
	}
}

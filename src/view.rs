use crate::{
	Color,
	Effect,
	Filter,
	GaussianBlur,
	Layer,
	LayerId,
	LayoutEvent,
	LayoutObserver,
	Options,
	Rect,
	Surface,
};
use std::rc::Rc;
use std::sync::Arc;

/// A view that shows a live, blurred copy of whatever lies behind it.
///
/// Every time the view changes geometry or blur radius, it snapshots the
/// region of its surface it covers, blurs the snapshot and presents the result
/// on a dedicated backdrop layer, placed under its content layer. The tint
/// lives on the content layer, as its background color and opacity, so that a
/// compositor blends it on top of the blurred backdrop.
///
/// Views don't watch their surroundings by themselves. The host either calls
/// [`set_frame`], [`attach`] and [`detach`] directly, or registers the view
/// with a [`LayoutNotifier`] and sends it [`LayoutEvent`]s.
///
/// [`set_frame`]: Self::set_frame
/// [`attach`]: Self::attach
/// [`detach`]: Self::detach
/// [`LayoutNotifier`]: crate::LayoutNotifier
pub struct BackdropView {
	/// Frame of the view, in the coordinate space of its parent.
	frame: Rect,
	/// Pixels per point used when taking snapshots.
	content_scale: f64,
	/// The blur radius the backdrop was last computed with.
	blur_radius: f64,
	/// Native effect currently occupying the effect slot.
	effect: Option<Effect>,
	/// Background color of the content layer.
	tint_color: Option<Color>,
	/// Opacity of the content layer, already clamped.
	tint_alpha: f64,
	/// The view's own layer. Every other layer of the view is a child of it.
	layer: Layer,
	/// Layer carrying the tint, on top of the backdrop.
	content_layer: LayerId,
	/// Layer presenting the blurred snapshot, created on first use.
	backdrop_layer: Option<LayerId>,
	/// Surface the view currently lives on, if any.
	surface: Option<Rc<dyn Surface>>,
	/// Filter the snapshots go through.
	filter: Box<dyn Filter>,
}
impl BackdropView {
	/// Creates a view with the default configuration and, optionally, a native
	/// effect in its effect slot.
	pub fn new(effect: Option<Effect>) -> Self {
		Self::with_options(Options { effect, ..Options::default() })
	}

	/// Creates a view with the given configuration.
	pub fn with_options(options: Options) -> Self {
		let mut layer = Layer::new();

		let mut content = Layer::new();
		content.set_background(options.tint_color);
		content.set_opacity(options.tint_alpha);
		let content_layer = content.id();
		let tint_color = content.background();
		let tint_alpha = content.opacity();
		layer.add_sublayer(content);

		let content_scale = if is_valid_scale(options.content_scale) {
			options.content_scale
		} else {
			log::warn!("Ignoring invalid content scale {}.", options.content_scale);
			1.0
		};

		Self {
			frame: Rect::ZERO,
			content_scale,
			blur_radius: options.blur_radius,
			effect: options.effect,
			tint_color,
			tint_alpha,
			layer,
			content_layer,
			backdrop_layer: None,
			surface: None,
			filter: Box::new(GaussianBlur::new()),
		}
	}

	/// Replaces the filter snapshots go through before being presented.
	pub fn with_filter<F>(mut self, filter: F) -> Self
		where F: Filter + 'static {

		self.filter = Box::new(filter);
		self
	}

	/// Color the backdrop is tinted with. The default value is `None`.
	pub fn tint_color(&self) -> Option<Color> {
		self.tint_color
	}

	pub fn set_tint_color(&mut self, color: Option<Color>) {
		self.tint_color = color;
		if let Some(content) = self.content_layer_mut() {
			content.set_background(color);
		}
	}

	/// Opacity of the tint, from `0.0` to `1.0`. The default value is `0.0`.
	pub fn tint_alpha(&self) -> f64 {
		self.tint_alpha
	}

	/// Sets the opacity of the tint, clamped into `0.0..=1.0`.
	pub fn set_tint_alpha(&mut self, alpha: f64) {
		self.tint_alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
		let tint_alpha = self.tint_alpha;
		if let Some(content) = self.content_layer_mut() {
			content.set_opacity(tint_alpha);
		}
	}

	/// Standard deviation of the blur, in snapshot pixels. The default value
	/// is `0.0`, which presents the backdrop unblurred.
	pub fn blur_radius(&self) -> f64 {
		self.blur_radius
	}

	/// Sets the blur radius and recomputes the backdrop.
	///
	/// Radii the filter can't work with, such as negative or non-finite ones,
	/// are still recorded, but the backdrop will be presented unblurred.
	pub fn set_blur_radius(&mut self, radius: f64) {
		self.update_blur(radius);
	}

	/// Scale factor mapping points to the pixels of the backdrop snapshot.
	/// The default value is `1.0`.
	pub fn content_scale(&self) -> f64 {
		self.content_scale
	}

	/// Sets the content scale and recomputes the backdrop. Scales that aren't
	/// finite and positive are ignored.
	pub fn set_content_scale(&mut self, scale: f64) {
		if !is_valid_scale(scale) {
			log::warn!("Ignoring invalid content scale {}.", scale);
			return
		}

		self.content_scale = scale;
		self.update_blur(self.blur_radius);
	}

	/// Native effect currently occupying the effect slot of the view.
	pub fn effect(&self) -> Option<Effect> {
		self.effect
	}

	/// Puts a native effect in the effect slot of the view. The effect stays
	/// in place until the backdrop is next recomputed.
	pub fn set_effect(&mut self, effect: Option<Effect>) {
		self.effect = effect;
	}

	/// Frame of the view, in the coordinate space of its parent.
	pub fn frame(&self) -> Rect {
		self.frame
	}

	/// Moves the view to the given frame, resizes the backdrop layer to match
	/// and recomputes the backdrop.
	pub fn set_frame(&mut self, frame: Rect) {
		self.frame = frame;
		self.layer.set_frame(frame);

		let bounds = self.bounds();
		if let Some(content) = self.content_layer_mut() {
			content.set_frame(bounds);
		}
		if let Some(backdrop) = self.backdrop_layer_mut() {
			backdrop.set_frame(bounds);
		}

		self.update_blur(self.blur_radius);
	}

	/// Bounds of the view, in its own coordinate space.
	pub fn bounds(&self) -> Rect {
		Rect::from_size(self.frame.size)
	}

	/// Places the view on the given surface and recomputes the backdrop.
	pub fn attach(&mut self, surface: Rc<dyn Surface>) {
		self.surface = Some(surface);
		self.update_blur(self.blur_radius);
	}

	/// Takes the view off its surface. Whatever backdrop was last presented
	/// stays in place.
	pub fn detach(&mut self) {
		self.surface = None;
	}

	pub fn is_attached(&self) -> bool {
		self.surface.is_some()
	}

	/// The view's own layer, root of all of its other layers.
	pub fn layer(&self) -> &Layer {
		&self.layer
	}

	/// The layer carrying the tint.
	///
	/// The view creates this layer along with itself and never takes it out
	/// of its layer tree, so this only comes back empty if the tree was
	/// tampered with.
	pub fn content_layer(&self) -> Option<&Layer> {
		self.layer.find(self.content_layer)
	}

	/// The layer presenting the blurred backdrop, if it has been created yet.
	pub fn backdrop_layer(&self) -> Option<&Layer> {
		self.backdrop_layer.and_then(|id| self.layer.find(id))
	}

	fn content_layer_mut(&mut self) -> Option<&mut Layer> {
		self.layer.find_mut(self.content_layer)
	}

	fn backdrop_layer_mut(&mut self) -> Option<&mut Layer> {
		let id = self.backdrop_layer?;
		self.layer.find_mut(id)
	}

	/// Recomputes the backdrop with the given blur radius.
	///
	/// None of this can fail. Without a surface, the update is skipped and
	/// the current backdrop stays. When the filter fails, or hands back an
	/// image of a different size, the snapshot is presented as it was taken.
	fn update_blur(&mut self, radius: f64) {
		self.blur_radius = radius;

		if let Some(effect) = self.effect.take() {
			log::debug!("Clearing {:?}, the backdrop replaces it.", effect);
		}

		let surface = match &self.surface {
			Some(surface) => surface.clone(),
			None => {
				log::trace!("Not attached to a surface, skipping backdrop update.");
				return
			}
		};
		let region = surface.convert_to_surface(self.frame);

		let backdrop = match self.backdrop_layer {
			Some(id) => id,
			None => self.create_backdrop_layer()
		};

		/* The backdrop must be hidden before the snapshot is taken, otherwise
		 * the previous blur would end up in the snapshot and get blurred all
		 * over again. */
		self.set_backdrop_hidden(backdrop, true);

		let snapshot = surface.snapshot(region, self.content_scale, &self.layer);
		log::trace!(
			"Took a {}x{} snapshot of {:?}.",
			snapshot.width(),
			snapshot.height(),
			region);

		let image = match self.filter.apply(&snapshot, radius) {
			Ok(blurred) if blurred.width() == snapshot.width()
				&& blurred.height() == snapshot.height() => blurred,
			Ok(blurred) => {
				log::warn!(
					"Blurring the {}x{} backdrop produced a {}x{} image, presenting it unblurred.",
					snapshot.width(),
					snapshot.height(),
					blurred.width(),
					blurred.height());
				snapshot
			},
			Err(what) => {
				log::warn!("Could not blur the backdrop, presenting it unblurred: {}", what);
				snapshot
			}
		};

		if let Some(layer) = self.layer.find_mut(backdrop) {
			layer.set_contents(Some(Arc::new(image)));
			layer.set_hidden(false);
		}
	}

	/// Creates the backdrop layer and places it under the content layer.
	fn create_backdrop_layer(&mut self) -> LayerId {
		let mut layer = Layer::new();
		layer.set_masks_to_bounds(true);
		layer.set_frame(self.bounds());

		let id = layer.id();
		log::debug!("Created backdrop layer {:?}.", id);

		self.layer.insert_sublayer(layer, 0);
		self.backdrop_layer = Some(id);
		id
	}

	fn set_backdrop_hidden(&mut self, id: LayerId, hidden: bool) {
		if let Some(layer) = self.layer.find_mut(id) {
			layer.set_hidden(hidden);
		}
	}
}
/// Whether the given value can be used as a content scale.
fn is_valid_scale(scale: f64) -> bool {
	scale.is_finite() && scale > 0.0
}

impl Default for BackdropView {
	fn default() -> Self {
		Self::new(None)
	}
}
impl LayoutObserver for BackdropView {
	fn layout_changed(&mut self, event: LayoutEvent) {
		match event {
			LayoutEvent::Frame(frame) => self.set_frame(frame),
			LayoutEvent::Attached(surface) => self.attach(surface),
			LayoutEvent::Detached => self.detach(),
		}
	}
}
impl std::fmt::Debug for BackdropView {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.debug_struct("BackdropView")
			.field("frame", &self.frame)
			.field("content_scale", &self.content_scale)
			.field("blur_radius", &self.blur_radius)
			.field("effect", &self.effect)
			.field("layer", &self.layer)
			.field("attached", &self.surface.is_some())
			.finish()
	}
}

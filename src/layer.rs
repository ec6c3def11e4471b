use crate::{Color, Image, Rect};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Source of unique layer identifiers.
static NEXT_LAYER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a layer. No two layers created in the same process share one.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct LayerId(u64);

/// A compositing primitive: a rectangle of pixels that may have a background
/// color, contents and children of its own.
///
/// Layers are plain records. They don't draw anything by themselves; it's up
/// to whoever composites the tree to honor their frame, visibility, opacity
/// and clipping. Children are drawn in order, each on top of the previous one.
#[derive(Debug)]
pub struct Layer {
	id: LayerId,
	frame: Rect,
	hidden: bool,
	masks_to_bounds: bool,
	opacity: f64,
	background: Option<Color>,
	contents: Option<Arc<Image>>,
	sublayers: Vec<Layer>,
}
impl Layer {
	/// Creates a new, visible, fully opaque layer with no contents.
	pub fn new() -> Self {
		Self {
			id: LayerId(NEXT_LAYER_ID.fetch_add(1, Ordering::Relaxed)),
			frame: Rect::ZERO,
			hidden: false,
			masks_to_bounds: false,
			opacity: 1.0,
			background: None,
			contents: None,
			sublayers: Vec::new(),
		}
	}

	pub fn id(&self) -> LayerId {
		self.id
	}

	/// The frame of this layer, in the coordinate space of its parent.
	pub fn frame(&self) -> Rect {
		self.frame
	}

	pub fn set_frame(&mut self, frame: Rect) {
		self.frame = frame;
	}

	pub fn is_hidden(&self) -> bool {
		self.hidden
	}

	pub fn set_hidden(&mut self, hidden: bool) {
		self.hidden = hidden;
	}

	/// Whether contents and children of this layer get clipped to its frame.
	pub fn masks_to_bounds(&self) -> bool {
		self.masks_to_bounds
	}

	pub fn set_masks_to_bounds(&mut self, masks: bool) {
		self.masks_to_bounds = masks;
	}

	/// Opacity of this layer, from `0.0` (invisible) to `1.0` (opaque).
	pub fn opacity(&self) -> f64 {
		self.opacity
	}

	/// Sets the opacity of this layer. The value is clamped into `0.0..=1.0`,
	/// and a NaN is taken to mean fully transparent.
	pub fn set_opacity(&mut self, opacity: f64) {
		self.opacity = if opacity.is_nan() { 0.0 } else { opacity.clamp(0.0, 1.0) };
	}

	pub fn background(&self) -> Option<Color> {
		self.background
	}

	pub fn set_background(&mut self, color: Option<Color>) {
		self.background = color;
	}

	/// The image this layer displays, stretched over its frame.
	pub fn contents(&self) -> Option<&Arc<Image>> {
		self.contents.as_ref()
	}

	/// Replaces the contents of this layer in one step.
	pub fn set_contents(&mut self, contents: Option<Arc<Image>>) {
		self.contents = contents;
	}

	pub fn sublayers(&self) -> &[Layer] {
		&self.sublayers
	}

	/// Appends a child on top of all existing children.
	pub fn add_sublayer(&mut self, layer: Layer) {
		self.sublayers.push(layer);
	}

	/// Inserts a child at the given position in the drawing order, clamped to
	/// the number of existing children.
	pub fn insert_sublayer(&mut self, layer: Layer, index: usize) {
		let index = index.min(self.sublayers.len());
		self.sublayers.insert(index, layer);
	}

	/// Finds the layer with the given identifier in this tree, including this
	/// layer itself.
	pub fn find(&self, id: LayerId) -> Option<&Layer> {
		if self.id == id {
			return Some(self)
		}
		self.sublayers.iter().find_map(|layer| layer.find(id))
	}

	/// Mutable counterpart of [`Layer::find`].
	pub fn find_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
		if self.id == id {
			return Some(self)
		}
		self.sublayers.iter_mut().find_map(|layer| layer.find_mut(id))
	}
}
impl Default for Layer {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn identifiers_are_unique() {
		let a = Layer::new();
		let b = Layer::new();
		assert_ne!(a.id(), b.id());
	}

	#[test]
	fn find_walks_the_tree() {
		let mut root = Layer::new();
		let mut child = Layer::new();
		let grandchild = Layer::new();
		let grandchild_id = grandchild.id();
		child.add_sublayer(grandchild);
		root.add_sublayer(child);

		assert_eq!(root.find(root.id()).map(Layer::id), Some(root.id()));
		root.find_mut(grandchild_id).unwrap().set_hidden(true);
		assert!(root.find(grandchild_id).unwrap().is_hidden());
		assert!(root.find(Layer::new().id()).is_none());
	}

	#[test]
	fn insertion_order_is_drawing_order() {
		let mut root = Layer::new();
		let top = Layer::new();
		let bottom = Layer::new();
		let (top_id, bottom_id) = (top.id(), bottom.id());

		root.add_sublayer(top);
		root.insert_sublayer(bottom, 0);

		let order = root.sublayers().iter().map(Layer::id).collect::<Vec<_>>();
		assert_eq!(order, vec![bottom_id, top_id]);
	}

	#[test]
	fn opacity_is_clamped() {
		let mut layer = Layer::new();
		layer.set_opacity(1.5);
		assert_eq!(layer.opacity(), 1.0);
		layer.set_opacity(-0.5);
		assert_eq!(layer.opacity(), 0.0);
		layer.set_opacity(f64::NAN);
		assert_eq!(layer.opacity(), 0.0);
	}
}

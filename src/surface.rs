use crate::{Image, Layer, Rect};

/// A display surface a view can be attached to, usually a window.
///
/// This is the host's side of the backdrop pipeline. The surface knows where
/// the view sits relative to everything else it displays, and it can rasterize
/// any region of its visual tree into a still image.
pub trait Surface {
	/// Converts the frame of the view, expressed in the coordinate space of the
	/// view's parent, into the coordinate space of this surface.
	fn convert_to_surface(&self, frame: Rect) -> Rect;

	/// Rasterizes the given region of this surface, in surface coordinates,
	/// into an image at the given scale, in pixels per point.
	///
	/// `view` is the layer tree of the view that requested the snapshot. The
	/// surface is expected to composite it where the view sits, skipping any
	/// hidden layers. The backdrop layer is always hidden while this runs,
	/// so that earlier blur output never makes it into a new snapshot.
	///
	/// An empty region produces an empty image.
	fn snapshot(&self, region: Rect, scale: f64, view: &Layer) -> Image;
}

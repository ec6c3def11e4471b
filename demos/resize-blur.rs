use frostview::{BackdropView, Image, Layer, LayoutEvent, LayoutNotifier, Options, Rect, Surface};
use std::cell::RefCell;
use std::rc::Rc;

/// A surface whose contents are a fixed diagonal gradient.
struct Gradient;
impl Surface for Gradient {
	fn convert_to_surface(&self, frame: Rect) -> Rect {
		frame
	}

	fn snapshot(&self, region: Rect, scale: f64, _: &Layer) -> Image {
		let pixels = region.to_pixels(scale);
		Image::from_fn(pixels.width, pixels.height, |x, y| {
			let x = (pixels.x + x as i64) as u8;
			let y = (pixels.y + y as i64) as u8;
			[x, y, x.wrapping_add(y), 255]
		})
	}
}

fn main() {
	let event_loop = winit::event_loop::EventLoop::new();
	let window = winit::window::WindowBuilder::new()
		.with_resizable(true)
		.with_decorations(true)
		.with_inner_size(winit::dpi::PhysicalSize::new(320, 240))
		.build(&event_loop).unwrap();

	let options = Options::default()
		.with_blur_radius(8.0)
		.with_content_scale(window.scale_factor());
	let view = Rc::new(RefCell::new(BackdropView::with_options(options)));

	let mut layout = LayoutNotifier::new();
	let id = layout.register(&view);
	layout.notify(id, LayoutEvent::Attached(Rc::new(Gradient)));

	event_loop.run(move |event, _, flow| {
		*flow = winit::event_loop::ControlFlow::Wait;
		match event {
			winit::event::Event::WindowEvent { window_id, event }
			if window_id == window.id() => match event {

				winit::event::WindowEvent::Resized(size) => {
					let size = size.to_logical::<f64>(window.scale_factor());
					layout.notify(id, LayoutEvent::Frame(Rect::new(0.0, 0.0, size.width, size.height)));

					let view = view.borrow();
					if let Some(contents) = view.backdrop_layer().and_then(Layer::contents) {
						println!(
							"backdrop: {}x{} pixels at radius {}",
							contents.width(),
							contents.height(),
							view.blur_radius());
					}
				},
				winit::event::WindowEvent::CloseRequested =>
					*flow = winit::event_loop::ControlFlow::Exit,
				_ => {}
			},
			_ => {}
		}
	})
}

use crate::{Rect, Surface};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Geometry notifications a host layout system sends to its views.
#[derive(Clone)]
pub enum LayoutEvent {
	/// The view was given a new frame, in the coordinate space of its parent.
	Frame(Rect),
	/// The view was moved onto a display surface.
	Attached(Rc<dyn Surface>),
	/// The view was taken off its display surface.
	Detached,
}
impl std::fmt::Debug for LayoutEvent {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Self::Frame(frame) => f.debug_tuple("Frame").field(frame).finish(),
			Self::Attached(_) => f.write_str("Attached(..)"),
			Self::Detached => f.write_str("Detached"),
		}
	}
}

/// Something that reacts to layout notifications.
pub trait LayoutObserver {
	fn layout_changed(&mut self, event: LayoutEvent);
}

/// Handle to a registration with a [`LayoutNotifier`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ObserverId(u64);

/// Dispatches layout notifications to the observers registered with it.
///
/// The notifier only holds weak references. Registering an observer doesn't
/// keep it alive, and observers that have since been dropped are forgotten
/// the next time a notification goes out.
#[derive(Default)]
pub struct LayoutNotifier {
	next_id: u64,
	observers: Vec<(ObserverId, Weak<RefCell<dyn LayoutObserver>>)>,
}
impl LayoutNotifier {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers an observer, returning the handle it may be addressed by.
	pub fn register<O>(&mut self, observer: &Rc<RefCell<O>>) -> ObserverId
		where O: LayoutObserver + 'static {

		let observer: Rc<RefCell<dyn LayoutObserver>> = observer.clone();
		let id = ObserverId(self.next_id);
		self.next_id += 1;

		self.observers.push((id, Rc::downgrade(&observer)));
		id
	}

	/// Removes a registration. Returns whether it was still present.
	pub fn unregister(&mut self, id: ObserverId) -> bool {
		let before = self.observers.len();
		self.observers.retain(|(current, _)| *current != id);
		self.observers.len() != before
	}

	/// Number of registrations whose observers are still alive.
	pub fn len(&self) -> usize {
		self.observers.iter()
			.filter(|(_, observer)| observer.strong_count() > 0)
			.count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Delivers an event to a single observer. Returns whether it was
	/// delivered.
	pub fn notify(&mut self, id: ObserverId, event: LayoutEvent) -> bool {
		self.prune();

		let observer = match self.observers.iter().find(|(current, _)| *current == id) {
			Some((_, observer)) => observer.upgrade(),
			None => return false
		};
		match observer {
			Some(observer) => deliver(&observer, event),
			None => false
		}
	}

	/// Delivers an event to every registered observer. Returns how many
	/// observers it was delivered to.
	pub fn broadcast(&mut self, event: LayoutEvent) -> usize {
		self.prune();

		/* Collect strong references first, so that observers are free to drop
		 * each other while the event is going around. */
		let observers = self.observers.iter()
			.filter_map(|(_, observer)| observer.upgrade())
			.collect::<Vec<_>>();

		observers.iter()
			.filter(|observer| deliver(observer, event.clone()))
			.count()
	}

	/// Forgets the registrations of observers that have been dropped.
	fn prune(&mut self) {
		self.observers.retain(|(_, observer)| observer.strong_count() > 0);
	}
}
impl std::fmt::Debug for LayoutNotifier {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		f.debug_struct("LayoutNotifier")
			.field("observers", &self.observers.len())
			.finish()
	}
}

/// Hands an event to an observer, unless it's busy handling another one.
fn deliver(observer: &Rc<RefCell<dyn LayoutObserver>>, event: LayoutEvent) -> bool {
	match observer.try_borrow_mut() {
		Ok(mut observer) => {
			observer.layout_changed(event);
			true
		},
		Err(_) => {
			/* A notification raised from within an observer, about that same
			 * observer. Delivering it would mean a second mutable borrow. */
			log::warn!("Dropped {:?} for an observer that is already handling one.", event);
			false
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Default)]
	struct Recorder {
		frames: Vec<Rect>,
		detached: usize,
	}
	impl LayoutObserver for Recorder {
		fn layout_changed(&mut self, event: LayoutEvent) {
			match event {
				LayoutEvent::Frame(frame) => self.frames.push(frame),
				LayoutEvent::Detached => self.detached += 1,
				LayoutEvent::Attached(_) => {}
			}
		}
	}

	#[test]
	fn notify_targets_one_observer() {
		let mut notifier = LayoutNotifier::new();
		let a = Rc::new(RefCell::new(Recorder::default()));
		let b = Rc::new(RefCell::new(Recorder::default()));
		let a_id = notifier.register(&a);
		notifier.register(&b);

		let frame = Rect::new(0.0, 0.0, 10.0, 10.0);
		assert!(notifier.notify(a_id, LayoutEvent::Frame(frame)));

		assert_eq!(a.borrow().frames, vec![frame]);
		assert!(b.borrow().frames.is_empty());
	}

	#[test]
	fn broadcast_reaches_everyone() {
		let mut notifier = LayoutNotifier::new();
		let a = Rc::new(RefCell::new(Recorder::default()));
		let b = Rc::new(RefCell::new(Recorder::default()));
		notifier.register(&a);
		notifier.register(&b);

		assert_eq!(notifier.broadcast(LayoutEvent::Detached), 2);
		assert_eq!(a.borrow().detached, 1);
		assert_eq!(b.borrow().detached, 1);
	}

	#[test]
	fn dropped_observers_are_pruned() {
		let mut notifier = LayoutNotifier::new();
		let a = Rc::new(RefCell::new(Recorder::default()));
		let id = notifier.register(&a);
		assert_eq!(notifier.len(), 1);

		drop(a);
		assert!(notifier.is_empty());
		assert!(!notifier.notify(id, LayoutEvent::Detached));
		assert_eq!(notifier.broadcast(LayoutEvent::Detached), 0);
	}

	#[test]
	fn unregistered_observers_hear_nothing() {
		let mut notifier = LayoutNotifier::new();
		let a = Rc::new(RefCell::new(Recorder::default()));
		let id = notifier.register(&a);

		assert!(notifier.unregister(id));
		assert!(!notifier.unregister(id));
		assert!(!notifier.notify(id, LayoutEvent::Detached));
		assert_eq!(a.borrow().detached, 0);
	}

	#[test]
	fn busy_observers_are_skipped() {
		let mut notifier = LayoutNotifier::new();
		let a = Rc::new(RefCell::new(Recorder::default()));
		let id = notifier.register(&a);

		let _busy = a.borrow_mut();
		assert!(!notifier.notify(id, LayoutEvent::Detached));
	}
}

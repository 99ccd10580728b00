use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

/// Identifies a subscription to [`ColorizationEvents`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SubscriptionId(u64);

/// Observers of changes to the desktop accent color.
///
/// The registry is owned by the host, which creates it once and hands it by
/// reference to whichever components are interested. Notifications carry no
/// payload: observers query [`EffectController::colorization_color`] to get
/// the new color.
///
/// Everything happens on the thread owning the window, so this type is
/// neither `Send` nor `Sync`.
///
/// [`EffectController::colorization_color`]: crate::EffectController::colorization_color
#[derive(Default)]
pub struct ColorizationEvents {
	next: Cell<u64>,
	subscribers: RefCell<Vec<(SubscriptionId, Rc<dyn Fn()>)>>,
}
impl ColorizationEvents {
	pub fn new() -> Self {
		Self::default()
	}

	/// Attaches an observer. It will be called after every observer attached
	/// before it.
	pub fn subscribe<F: Fn() + 'static>(&self, observer: F) -> SubscriptionId {
		let id = SubscriptionId(self.next.get());
		self.next.set(id.0 + 1);

		self.subscribers.borrow_mut().push((id, Rc::new(observer)));
		id
	}

	/// Detaches an observer. Returns whether it was still attached.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		let mut subscribers = self.subscribers.borrow_mut();
		let before = subscribers.len();
		subscribers.retain(|(subscriber, _)| *subscriber != id);
		subscribers.len() != before
	}

	/// The number of attached observers.
	pub fn len(&self) -> usize {
		self.subscribers.borrow().len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Calls every attached observer once, in subscription order, on the
	/// calling thread.
	///
	/// Observers attached or detached while the notification is in flight only
	/// take effect for the next one. A panicking observer is logged and
	/// skipped, the rest still get notified.
	pub fn notify(&self) {
		let observers = self.subscribers
			.borrow()
			.iter()
			.map(|(id, observer)| (*id, Rc::clone(observer)))
			.collect::<Vec<_>>();

		for (id, observer) in observers {
			if catch_unwind(AssertUnwindSafe(|| (*observer)())).is_err() {
				log::error!(
					"Colorization observer {:?} panicked while being notified.",
					id);
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Box<dyn Fn()>) {
		let log = Rc::new(RefCell::new(Vec::new()));
		let handle = Rc::clone(&log);
		let make = move |name: &'static str| {
			let log = Rc::clone(&handle);
			Box::new(move || log.borrow_mut().push(name)) as Box<dyn Fn()>
		};
		(log, make)
	}

	#[test]
	fn observers_run_in_subscription_order() {
		let events = ColorizationEvents::new();
		let (log, make) = recorder();

		let first = make("first");
		let second = make("second");
		events.subscribe(move || first());
		events.subscribe(move || second());

		events.notify();
		assert_eq!(*log.borrow(), vec!["first", "second"]);
	}

	#[test]
	fn unsubscribed_observers_are_not_called() {
		let events = ColorizationEvents::new();
		let (log, make) = recorder();

		let first = make("first");
		let second = make("second");
		let id = events.subscribe(move || first());
		events.subscribe(move || second());

		assert!(events.unsubscribe(id));
		assert!(!events.unsubscribe(id));
		assert_eq!(events.len(), 1);

		events.notify();
		assert_eq!(*log.borrow(), vec!["second"]);
	}

	#[test]
	fn observers_may_detach_while_notified() {
		let events = Rc::new(ColorizationEvents::new());
		let calls = Rc::new(Cell::new(0));

		let id = Rc::new(Cell::new(None));
		let inner = Rc::clone(&events);
		let counter = Rc::clone(&calls);
		let own = Rc::clone(&id);
		id.set(Some(events.subscribe(move || {
			counter.set(counter.get() + 1);
			if let Some(id) = own.get() {
				inner.unsubscribe(id);
			}
		})));

		events.notify();
		events.notify();
		assert_eq!(calls.get(), 1);
		assert!(events.is_empty());
	}

	#[test]
	fn panicking_observer_does_not_stop_the_rest() {
		let events = ColorizationEvents::new();
		let (log, make) = recorder();

		let after = make("after");
		events.subscribe(|| panic!("observer failure"));
		events.subscribe(move || after());

		events.notify();
		assert_eq!(*log.borrow(), vec!["after"]);
	}
}

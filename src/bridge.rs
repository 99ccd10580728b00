use crate::effects::EffectController;
use crate::events::ColorizationEvents;
use crate::platform::{Compositor, WindowHandle};

/// `WM_DWMCOMPOSITIONCHANGED`: desktop composition has been turned on or off.
pub const WM_DWMCOMPOSITIONCHANGED: u32 = 0x031E;
/// `WM_DWMCOLORIZATIONCOLORCHANGED`: the colorization color has changed.
pub const WM_DWMCOLORIZATIONCOLORCHANGED: u32 = 0x0320;

/// What a window message asks of the compositor bridge.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Action {
	/// The message is of no interest.
	NoOp,
	/// Composition changed, the background blur has to be requested again.
	ReapplyBlur,
	/// The accent color changed, observers have to be told.
	NotifyColorChange,
}

/// Decides what, if anything, the given message requires.
pub const fn classify(message: u32) -> Action {
	match message {
		WM_DWMCOMPOSITIONCHANGED => Action::ReapplyBlur,
		WM_DWMCOLORIZATIONCOLORCHANGED => Action::NotifyColorChange,
		_ => Action::NoOp
	}
}

/// Routes compositor notifications arriving at a window into the effects
/// controller and the colorization observers.
///
/// The host feeds every message its window receives through
/// [`window_proc`](Self::window_proc), before or after its own handling.
pub struct CompositorEventBridge<'a, C: Compositor> {
	effects: &'a EffectController<C>,
	events: &'a ColorizationEvents,
}
impl<'a, C: Compositor> CompositorEventBridge<'a, C> {
	pub fn new(effects: &'a EffectController<C>, events: &'a ColorizationEvents) -> Self {
		Self { effects, events }
	}

	pub fn effects(&self) -> &'a EffectController<C> {
		self.effects
	}

	pub fn events(&self) -> &'a ColorizationEvents {
		self.events
	}

	/// Reacts to a message sent to the given window, returning what was done.
	pub fn dispatch(&self, window: WindowHandle, message: u32) -> Action {
		let action = classify(message);
		self.perform(window, action);
		action
	}

	/// Carries out an action for the given window.
	///
	/// After a composition change, blur is turned on wherever the legacy blur
	/// is available and off everywhere else. Whether acrylic is available does
	/// not enter that decision.
	pub fn perform(&self, window: WindowHandle, action: Action) {
		match action {
			Action::NoOp => {},
			Action::ReapplyBlur => {
				log::debug!("Composition changed for window 0x{:x}", window.raw());

				let applied = if self.effects.supports_legacy_blur() {
					self.effects.enable_blur(window)
				} else {
					self.effects.disable_blur(window)
				};
				if !applied {
					/* The next composition change will try again. */
					log::warn!(
						"Could not reapply the blur to window 0x{:x} after a \
						 composition change.",
						window.raw());
				}
			},
			Action::NotifyColorChange => {
				log::debug!("Colorization color changed");
				self.events.notify();
			}
		}
	}

	/// Message hook in the shape of a window procedure.
	///
	/// Only the message identifier is looked at. The result is always zero and
	/// no message is ever reported as handled, so the host must keep running
	/// its own processing for all of them.
	pub fn window_proc(&self, window: WindowHandle, message: u32, _wparam: usize, _lparam: isize) -> isize {
		self.dispatch(window, message);
		0
	}
}

//! A compositor that does nothing but write down what it was asked to do.

use std::cell::{Cell, RefCell};
use crate::capability::OsVersion;
use crate::native::{self, AccentPolicy, BlurBehind, WindowCompositionAttribute, WindowCompositionAttributeData};
use crate::platform::{Compositor, WindowHandle};

/// A single call made into the compositor.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
	CompositionAttribute {
		window: WindowHandle,
		attribute: WindowCompositionAttribute,
		data_size: u32,
		policy: AccentPolicy,
		/// Number of heap blocks alive at the moment of the call.
		live_blocks: usize,
	},
	BlurBehind {
		window: WindowHandle,
		blur: BlurBehind,
	},
	WindowAttribute {
		window: WindowHandle,
		attribute: u32,
		value: u32,
	},
	ColorizationColor,
}

pub struct RecordingCompositor {
	pub version: Cell<Option<OsVersion>>,
	pub accent_accepted: Cell<bool>,
	pub blur_status: Cell<i32>,
	pub colorization: Cell<(u32, bool)>,
	pub calls: RefCell<Vec<Call>>,
}
impl RecordingCompositor {
	pub fn new(version: Option<OsVersion>) -> Self {
		Self {
			version: Cell::new(version),
			accent_accepted: Cell::new(true),
			blur_status: Cell::new(0),
			colorization: Cell::new((0, false)),
			calls: RefCell::new(Vec::new())
		}
	}

	pub fn windows_7() -> Self {
		Self::new(Some(OsVersion::new(6, 1, 7601)))
	}

	pub fn windows_8() -> Self {
		Self::new(Some(OsVersion::new(6, 2, 9200)))
	}

	pub fn windows_10() -> Self {
		Self::new(Some(OsVersion::new(10, 0, 19045)))
	}

	pub fn take(&self) -> Vec<Call> {
		std::mem::take(&mut *self.calls.borrow_mut())
	}
}
impl Compositor for RecordingCompositor {
	fn os_version(&self) -> Option<OsVersion> {
		self.version.get()
	}

	unsafe fn set_window_composition_attribute(
		&self,
		window: WindowHandle,
		request: &mut WindowCompositionAttributeData) -> bool {

		assert_eq!(request.data_size as usize, std::mem::size_of::<AccentPolicy>());
		let policy = (request.data as *const AccentPolicy).read();

		self.calls.borrow_mut().push(Call::CompositionAttribute {
			window,
			attribute: request.attribute,
			data_size: request.data_size,
			policy,
			live_blocks: native::live_blocks()
		});
		self.accent_accepted.get()
	}

	fn enable_blur_behind_window(&self, window: WindowHandle, blur: &BlurBehind) -> i32 {
		self.calls.borrow_mut().push(Call::BlurBehind { window, blur: *blur });
		self.blur_status.get()
	}

	fn set_window_attribute(&self, window: WindowHandle, attribute: u32, value: &u32) -> i32 {
		self.calls.borrow_mut().push(Call::WindowAttribute {
			window,
			attribute,
			value: *value
		});
		0
	}

	fn colorization_color(&self) -> (u32, bool) {
		self.calls.borrow_mut().push(Call::ColorizationColor);
		self.colorization.get()
	}
}

use raw_window_handle::{HasRawWindowHandle, RawWindowHandle, Win32Handle};
use std::ffi::c_void;
use crate::capability::OsVersion;
use crate::native::{BlurBehind, WindowCompositionAttributeData};
use crate::Error;

/// Windows implementation of the compositor interface.
#[cfg(windows)]
pub mod windows;

#[cfg(test)]
pub(crate) mod recording;

/// An opaque handle to a top-level window, as understood by the compositor.
///
/// This is the numeric value of an `HWND`. The handle is never dereferenced by
/// this crate, it is only handed back to the compositor, so keeping it valid
/// is the responsibility of whoever owns the window.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct WindowHandle(usize);
impl WindowHandle {
	/// Wraps the given raw `HWND` value.
	pub const fn from_raw(hwnd: usize) -> Self {
		Self(hwnd)
	}

	/// Wraps the given `HWND` pointer.
	pub fn from_ptr(hwnd: *mut c_void) -> Self {
		Self(hwnd as usize)
	}

	/// Extracts the window handle out of anything exposing a raw window handle.
	///
	/// Only Win32 handles are understood by the compositor. Every other kind of
	/// handle, including UWP core windows, results in [`Error::NotSupported`].
	pub fn from_window<H: HasRawWindowHandle>(window: &H) -> Result<Self, Error> {
		match window.raw_window_handle() {
			RawWindowHandle::Win32(Win32Handle { hwnd, .. }) if !hwnd.is_null() =>
				Ok(Self::from_ptr(hwnd)),
			RawWindowHandle::Win32(_) =>
				Err(Error::NotAvailable("the window has no native handle yet".into())),
			_ =>
				Err(Error::NotSupported)
		}
	}

	/// The raw `HWND` value.
	pub const fn raw(self) -> usize {
		self.0
	}

	/// The raw `HWND` value, as a pointer.
	pub fn as_ptr(self) -> *mut c_void {
		self.0 as *mut c_void
	}
}

/// The set of platform calls the effects controller relies upon.
///
/// Every function here maps one to one onto a compositor entry point. All of
/// the decision making happens outside of implementations of this trait, which
/// should do nothing but forward the request to the system.
pub trait Compositor {
	/// The version of the operating system the process is currently running
	/// under, or `None` if it cannot be determined.
	///
	/// This is queried every time a capability decision is made and must not
	/// be cached by callers.
	fn os_version(&self) -> Option<OsVersion>;

	/// Forwards a composition attribute request for the given window, returning
	/// whether the compositor accepted it.
	///
	/// # Safety
	/// The `data` field of the request must point to `data_size` readable bytes
	/// holding a structure of the kind named by its `attribute`, and must remain
	/// valid for the whole duration of the call.
	unsafe fn set_window_composition_attribute(
		&self,
		window: WindowHandle,
		request: &mut WindowCompositionAttributeData) -> bool;

	/// Enables or disables the legacy blur behind the given window. Returns the
	/// raw `HRESULT` of the call, where zero means success.
	fn enable_blur_behind_window(&self, window: WindowHandle, blur: &BlurBehind) -> i32;

	/// Sets a four byte window attribute. Returns the raw `HRESULT` of the call.
	fn set_window_attribute(&self, window: WindowHandle, attribute: u32, value: &u32) -> i32;

	/// The current colorization color, packed as `0xAARRGGBB`, together with
	/// whether the compositor blends it opaquely.
	fn colorization_color(&self) -> (u32, bool);
}

impl<C: Compositor + ?Sized> Compositor for &C {
	fn os_version(&self) -> Option<OsVersion> {
		(**self).os_version()
	}

	unsafe fn set_window_composition_attribute(
		&self,
		window: WindowHandle,
		request: &mut WindowCompositionAttributeData) -> bool {

		(**self).set_window_composition_attribute(window, request)
	}

	fn enable_blur_behind_window(&self, window: WindowHandle, blur: &BlurBehind) -> i32 {
		(**self).enable_blur_behind_window(window, blur)
	}

	fn set_window_attribute(&self, window: WindowHandle, attribute: u32, value: &u32) -> i32 {
		(**self).set_window_attribute(window, attribute, value)
	}

	fn colorization_color(&self) -> (u32, bool) {
		(**self).colorization_color()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Fake(RawWindowHandle);
	unsafe impl HasRawWindowHandle for Fake {
		fn raw_window_handle(&self) -> RawWindowHandle {
			self.0
		}
	}

	#[test]
	fn win32_handles_are_accepted() {
		let mut handle = Win32Handle::empty();
		handle.hwnd = 0x1234 as *mut c_void;

		let window = WindowHandle::from_window(&Fake(RawWindowHandle::Win32(handle)))
			.unwrap();
		assert_eq!(window.raw(), 0x1234);
		assert_eq!(window.as_ptr(), 0x1234 as *mut c_void);
	}

	#[test]
	fn null_win32_handle_is_not_available() {
		let handle = Win32Handle::empty();
		let result = WindowHandle::from_window(&Fake(RawWindowHandle::Win32(handle)));
		assert!(matches!(result, Err(Error::NotAvailable(_))));
	}

	#[test]
	fn other_handle_kinds_are_not_supported() {
		let handle = raw_window_handle::WinRtHandle::empty();
		let result = WindowHandle::from_window(&Fake(RawWindowHandle::WinRt(handle)));
		assert!(matches!(result, Err(Error::NotSupported)));
	}
}

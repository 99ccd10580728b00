use winapi::shared::minwindef::{BOOL, DWORD, FALSE, HMODULE, LPCVOID};
use winapi::shared::ntdef::{NTSTATUS, ULONG, WCHAR};
use winapi::shared::windef::HWND;
use winapi::um::dwmapi::{DwmEnableBlurBehindWindow, DwmGetColorizationColor, DwmSetWindowAttribute, DWM_BLURBEHIND};
use winapi::um::errhandlingapi::GetLastError;
use winapi::um::libloaderapi::{FreeLibrary, GetProcAddress, LoadLibraryA};
use winapi::um::winbase::{FORMAT_MESSAGE_ALLOCATE_BUFFER, FORMAT_MESSAGE_FROM_SYSTEM, FORMAT_MESSAGE_IGNORE_INSERTS, FormatMessageW, LocalFree};
use winapi::um::winnt::{LANG_NEUTRAL, LPWSTR, MAKELANGID, SUBLANG_NEUTRAL};
use cstr::cstr;
use std::ffi::CStr;
use crate::capability::OsVersion;
use crate::native::{BlurBehind, WindowCompositionAttributeData};
use crate::platform::{Compositor, WindowHandle};

/// Type for a pointer to the `SetWindowCompositionAttribute` function, found in
/// `user32.dll`. This function is responsible for requesting special window
/// composition effects, such as background blur and acrylic.
type __SetWindowCompositionAttribute =
	unsafe extern "system" fn(
		HWND,
		*mut WindowCompositionAttributeData) -> BOOL;

/// Type for a pointer to the `RtlGetVersion` function, found in `ntdll.dll`.
/// Unlike `GetVersionEx`, this function reports the real version of the system
/// regardless of how the executable has been manifested.
type __RtlGetVersion =
	unsafe extern "system" fn(*mut OperatingSystemVersionInfoWide) -> NTSTATUS;

lazy_static::lazy_static! {
	/// The `SetWindowCompositionAttribute` function, if the system has it.
	///
	/// The function is undocumented and has to be looked up by name. The
	/// library it lives in is kept loaded for the rest of the process.
	static ref SET_WINDOW_COMPOSITION_ATTRIBUTE: Result<__SetWindowCompositionAttribute, Error> =
		unsafe {
			let library = Library::load(cstr!("user32.dll"), "user32.dll")?;
			let address = library.function(
				cstr!("SetWindowCompositionAttribute"),
				"user32.dll\\SetWindowCompositionAttribute")?;
			std::mem::forget(library);

			Ok(std::mem::transmute::<usize, __SetWindowCompositionAttribute>(address))
		};
}

/// A loaded dynamic library, released when dropped.
struct Library(HMODULE);
impl Library {
	unsafe fn load(file: &CStr, name: &'static str) -> Result<Self, Error> {
		let module = LoadLibraryA(file.as_ptr());
		if module.is_null() {
			return Err(Error::MissingFunctionality {
				name,
				error: WinError::last()
			})
		}
		Ok(Self(module))
	}

	/// Looks up the address of an exported function.
	unsafe fn function(&self, symbol: &CStr, name: &'static str) -> Result<usize, Error> {
		let address = GetProcAddress(self.0, symbol.as_ptr());
		if address.is_null() {
			return Err(Error::MissingFunctionality {
				name,
				error: WinError::last()
			})
		}
		Ok(address as usize)
	}
}
impl Drop for Library {
	fn drop(&mut self) {
		unsafe {
			FreeLibrary(self.0);
		}
	}
}

/// Asks the system for its version.
///
/// This is done on every call on purpose. It is cheap, and the answer must
/// describe the machine as it is right now.
fn query_version() -> Result<OsVersion, Error> {
	let byte_size = std::mem::size_of::<OperatingSystemVersionInfoWide>() as ULONG;
	let mut version = OperatingSystemVersionInfoWide {
		byte_size,
		major_version: 0,
		minor_version: 0,
		build_number: 0,
		platform_id: 0,
		service_pack: [0; 128]
	};

	unsafe {
		/* Ntdll.dll may not be available in sandboxed environments such as
		 * UWP. */
		let library = Library::load(cstr!("ntdll.dll"), "ntdll.dll")?;
		let address = library.function(cstr!("RtlGetVersion"), "ntdll.dll\\RtlGetVersion")?;

		let function = std::mem::transmute::<usize, __RtlGetVersion>(address);
		let result = function(&mut version as *mut _);
		if result != 0 {
			/* RtlGetVersion is documented as always returning STATUS_SUCCESS. */
			return Err(Error::FailedInvocation {
				call: "RtlGetVersion",
				description: "query the operating system version",
				error: WinError(result as DWORD)
			})
		}
	}

	Ok(OsVersion {
		major: version.major_version,
		minor: version.minor_version,
		build: version.build_number
	})
}

/// The desktop window manager of the running system.
#[derive(Debug, Copy, Clone, Default)]
pub struct WindowsCompositor;
impl WindowsCompositor {
	pub fn new() -> Self {
		Self
	}
}
impl Compositor for WindowsCompositor {
	fn os_version(&self) -> Option<OsVersion> {
		match query_version() {
			Ok(version) => Some(version),
			Err(what) => {
				log::warn!("{}", what);
				None
			}
		}
	}

	unsafe fn set_window_composition_attribute(
		&self,
		window: WindowHandle,
		request: &mut WindowCompositionAttributeData) -> bool {

		let function = match &*SET_WINDOW_COMPOSITION_ATTRIBUTE {
			Ok(function) => *function,
			Err(what) => {
				log::warn!("{}", what);
				return false
			}
		};

		let result = function(window.as_ptr() as HWND, request as *mut _);
		if result == FALSE {
			log::debug!("{}", Error::FailedInvocation {
				call: "SetWindowCompositionAttribute",
				description: "set the composition attribute of the window",
				error: WinError::last()
			});
			return false
		}
		true
	}

	fn enable_blur_behind_window(&self, window: WindowHandle, blur: &BlurBehind) -> i32 {
		/* SAFETY: BlurBehind shares the layout of DWM_BLURBEHIND. */
		unsafe {
			DwmEnableBlurBehindWindow(
				window.as_ptr() as HWND,
				blur as *const BlurBehind as *const DWM_BLURBEHIND)
		}
	}

	fn set_window_attribute(&self, window: WindowHandle, attribute: u32, value: &u32) -> i32 {
		unsafe {
			DwmSetWindowAttribute(
				window.as_ptr() as HWND,
				attribute as DWORD,
				value as *const u32 as LPCVOID,
				std::mem::size_of::<u32>() as DWORD)
		}
	}

	fn colorization_color(&self) -> (u32, bool) {
		let mut color: DWORD = 0;
		let mut opaque: BOOL = FALSE;

		let result = unsafe {
			DwmGetColorizationColor(&mut color as *mut _, &mut opaque as *mut _)
		};
		if result != 0 {
			log::warn!("{}", Error::FailedInvocation {
				call: "DwmGetColorizationColor",
				description: "query the colorization color",
				error: WinError(result as DWORD)
			});
		}

		(color, opaque != FALSE)
	}
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// This error is triggered if required functionality or one of its
	/// dependencies are not available in the system.
	#[error("Could not find \"{name}\": {error}")]
	MissingFunctionality {
		/// The name of the functionality that could not be found.
		name: &'static str,
		/// The error code given by `GetLastError()`.
		error: WinError
	},
	/// This error is triggered if required functionality and all of its
	/// dependencies are present, but in spite of that, the invocation of the
	/// functionality has failed.
	#[error("Could not {description}: call to \"{call}\" failed: {error}")]
	FailedInvocation {
		/// The name of the functionality whose invocation failed.
		call: &'static str,
		/// The description of what was trying to be achieved.
		description: &'static str,
		/// The error code given by the failed call, or `GetLastError()`.
		error: WinError
	}
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct WinError(DWORD);
impl WinError {
	/// The error code of the last failed call made on this thread.
	pub fn last() -> Self {
		Self(unsafe { GetLastError() })
	}

	/// Retrieve the message for this error message from Windows, if available.
	pub fn message(&self) -> Option<String> {
		let mut buffer: LPWSTR = std::ptr::null_mut();
		let size = unsafe {
			FormatMessageW(
				FORMAT_MESSAGE_ALLOCATE_BUFFER
					| FORMAT_MESSAGE_FROM_SYSTEM
					| FORMAT_MESSAGE_IGNORE_INSERTS,
				std::ptr::null_mut(),
				self.0,
				MAKELANGID(LANG_NEUTRAL, SUBLANG_NEUTRAL) as DWORD,
				&mut buffer as *mut LPWSTR as *mut _,
				0,
				std::ptr::null_mut())
		};
		if size == 0 {
			/* No message. */
			return None
		}

		let slice = unsafe {
			std::slice::from_raw_parts(buffer, size as usize)
		};
		let message = std::char::decode_utf16(slice.iter().cloned())
			.map(|c| c.unwrap_or('_'))
			.collect::<String>()
			.trim()
			.to_string();

		/* Free the buffer FormatMessageW allocated for us. */
		unsafe {
			LocalFree(buffer as *mut _);
		}

		Some(message)
	}
}
impl std::fmt::Display for WinError {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self.message() {
			Some(message) =>
				write!(f, "{} (0x{:08x})", message, self.0),
			None =>
				write!(f, "0x{:08x}", self.0),
		}
	}
}
impl std::error::Error for WinError {}

/// The operating system version information, as filled in by `RtlGetVersion`.
#[repr(C)]
struct OperatingSystemVersionInfoWide {
	/// The size of this structure.
	///
	/// This field must be set to the size of the structure, in bytes, before
	/// it's first passed on to any Windows functionality, even if it appears to
	/// be write-only.
	byte_size: ULONG,
	major_version: ULONG,
	minor_version: ULONG,
	build_number: ULONG,
	platform_id: ULONG,
	/// The service-pack version string. Left untouched by Windows if no service
	/// pack is installed.
	service_pack: [WCHAR; 128],
}

use std::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use std::ffi::c_void;
use std::ptr::NonNull;

/// `DWM_BB_ENABLE`: the `enable` field of [`BlurBehind`] has been specified.
pub const DWM_BB_ENABLE: u32 = 0x0000_0001;
/// `DWM_BB_BLURREGION`: the `region` field of [`BlurBehind`] has been specified.
pub const DWM_BB_BLURREGION: u32 = 0x0000_0002;

/// `DWMWA_FLIP3D_POLICY`: how the window is treated by Flip3D.
pub const DWMWA_FLIP3D_POLICY: u32 = 8;
/// `DWMWA_EXCLUDED_FROM_PEEK`: whether the window stays visible during Aero Peek.
pub const DWMWA_EXCLUDED_FROM_PEEK: u32 = 12;

/// `DWMFLIP3D_EXCLUDEBELOW`: Flip3D leaves the window below the flipped stack.
pub const DWMFLIP3D_EXCLUDEBELOW: u32 = 1;

/// Tint handed to the compositor alongside the acrylic accent.
///
/// Fully transparent white. The compositor ignores the color for this state,
/// but it still expects the field to hold a well-formed value.
pub const ACRYLIC_GRADIENT_COLOR: u32 = 0x00FF_FFFF;

/// The structure informing the composition attributes of the window.
///
/// This structure has the same layout and size as the undocumented
/// `WINCOMPATTRDATA` structure, passed on to the
/// `SetWindowCompositionAttribute` function. It may be used in any version of
/// Windows greater than Vista.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct WindowCompositionAttributeData {
	/// The number of the attribute which is intended to be changed or queried.
	pub attribute: WindowCompositionAttribute,
	/// A pointer to the structure containing the data for the attribute.
	pub data: *mut c_void,
	/// The size, in bytes, of the attribute data structure.
	pub data_size: u32,
}

/// The window composition attributes.
///
/// The identification numbers of the known windows composition attributes,
/// which may be changed or queried through use of the
/// `WindowCompositionAttribute` family of functions.
#[repr(i32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum WindowCompositionAttribute {
	/// The accent policy of the window.
	///
	/// This attribute tells the compositor, somewhat counter-intuitively, the
	/// way the background layer of the window should be treated. This treatment
	/// of the background may be used, for instance, to achieve transparency or
	/// a quasi-translucency effect through blurring.
	AccentPolicy = 19
}

/// The data for the accent policy attribute.
///
/// This structure defines the fields expected by the [accent policy attribute],
/// meaning all accesses to which must be done through it. Failure to uphold
/// this requirement may result in undefined behavior.
///
/// [accent policy attribute]: WindowCompositionAttribute::AccentPolicy
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct AccentPolicy {
	/// The state of the accent policy.
	pub state: AccentState,
	/// Extra flags passed on to the accent policy. Unused by this crate.
	pub accent_flags: i32,
	/// The color of the gradient effect, packed as `0xAABBGGRR`.
	///
	/// The use of this field is contextual and its exact meaning is determined
	/// by the state value.
	pub gradient_color: u32,
	/// The identification number of the transition animation. Unused.
	pub animation_id: i32,
}
impl AccentPolicy {
	/// The accent policy used for the modern blur path: acrylic when enabled,
	/// no accent otherwise.
	pub const fn acrylic(enabled: bool) -> Self {
		Self {
			state: if enabled {
				AccentState::AcrylicBlurBehind
			} else {
				AccentState::Disabled
			},
			accent_flags: 0,
			gradient_color: ACRYLIC_GRADIENT_COLOR,
			animation_id: 0
		}
	}
}

/// The states the accent policy may assume.
#[repr(i32)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AccentState {
	/// Disable accenting of the window.
	///
	/// This will instruct the compositor to leave the window as-is when drawing
	/// it on to the desktop.
	Disabled = 0,
	/// Draw a color gradient on the background layer of the window.
	Gradient = 1,
	/// Draw a semitransparent color gradient on the background layer of the window.
	TransparentGradient = 2,
	/// Blur what's behind the window, Aero Glass style.
	BlurBehind = 3,
	/// Blur what's behind the window, Acrylic style.
	///
	/// Not available before Windows 10 1803.
	AcrylicBlurBehind = 4,
}

/// Layout-compatible twin of `DWM_BLURBEHIND`, consumed by
/// `DwmEnableBlurBehindWindow`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BlurBehind {
	/// Which of the other fields have been specified. A combination of
	/// [`DWM_BB_ENABLE`] and [`DWM_BB_BLURREGION`].
	pub flags: u32,
	/// Whether blur behind is being turned on or off. A Win32 `BOOL`.
	pub enable: i32,
	/// The region the blur applies to, or null for the whole client area.
	pub region: *mut c_void,
	/// Whether the window colorization transitions to match maximized windows.
	pub transition_on_maximized: i32,
}
impl BlurBehind {
	/// Request covering the whole window, with an explicitly empty region.
	pub fn whole_window(enabled: bool) -> Self {
		Self {
			flags: DWM_BB_ENABLE | DWM_BB_BLURREGION,
			enable: enabled as i32,
			region: std::ptr::null_mut(),
			transition_on_maximized: 0
		}
	}
}

#[cfg(test)]
thread_local! {
	/// Number of heap blocks currently alive on this thread.
	static LIVE_BLOCKS: std::cell::Cell<usize> = std::cell::Cell::new(0);
}

/// Number of [`HeapBlock`]s allocated and not yet released by this thread.
#[cfg(test)]
pub(crate) fn live_blocks() -> usize {
	LIVE_BLOCKS.with(|count| count.get())
}

/// A single value copied out into memory of its own, outside of any Rust
/// owned structure, so that its address can be handed to the compositor.
///
/// The memory is released when the block is dropped, which means that every
/// exit path out of the scope holding it, including unwinding, frees it.
pub struct HeapBlock<T: Copy> {
	ptr: NonNull<T>,
}
impl<T: Copy> HeapBlock<T> {
	/// Allocates a block and copies the given value into it.
	pub fn new(value: T) -> Self {
		let layout = Layout::new::<T>();
		let ptr = if layout.size() == 0 {
			NonNull::dangling()
		} else {
			/* SAFETY: The layout has a non-zero size. */
			match NonNull::new(unsafe { alloc(layout) } as *mut T) {
				Some(ptr) => ptr,
				None => handle_alloc_error(layout)
			}
		};

		/* SAFETY: The pointer is either freshly allocated for a `T` or a
		 * dangling pointer to a zero-sized type. */
		unsafe { ptr.as_ptr().write(value) };

		#[cfg(test)]
		LIVE_BLOCKS.with(|count| count.set(count.get() + 1));

		Self { ptr }
	}

	/// The address of the block, for handing across the foreign boundary.
	pub fn as_mut_ptr(&self) -> *mut c_void {
		self.ptr.as_ptr() as *mut c_void
	}

	/// The size of the block, in bytes.
	pub fn size(&self) -> u32 {
		std::mem::size_of::<T>() as u32
	}

	/// A copy of the value currently held in the block.
	pub fn get(&self) -> T {
		/* SAFETY: The block always holds an initialized `T`. */
		unsafe { self.ptr.as_ptr().read() }
	}
}
impl<T: Copy> Drop for HeapBlock<T> {
	fn drop(&mut self) {
		let layout = Layout::new::<T>();
		if layout.size() != 0 {
			/* SAFETY: The pointer was allocated in `new` with this very layout
			 * and is released exactly once, here. */
			unsafe { dealloc(self.ptr.as_ptr() as *mut u8, layout) };
		}

		#[cfg(test)]
		LIVE_BLOCKS.with(|count| count.set(count.get() - 1));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::mem::{align_of, offset_of, size_of};

	#[test]
	fn accent_policy_layout() {
		assert_eq!(size_of::<AccentPolicy>(), 16);
		assert_eq!(offset_of!(AccentPolicy, state), 0);
		assert_eq!(offset_of!(AccentPolicy, accent_flags), 4);
		assert_eq!(offset_of!(AccentPolicy, gradient_color), 8);
		assert_eq!(offset_of!(AccentPolicy, animation_id), 12);
		assert_eq!(size_of::<AccentState>(), 4);
	}

	#[test]
	fn composition_attribute_layout() {
		let pointer = size_of::<*mut c_void>();
		assert_eq!(offset_of!(WindowCompositionAttributeData, attribute), 0);
		assert_eq!(offset_of!(WindowCompositionAttributeData, data), pointer);
		assert_eq!(offset_of!(WindowCompositionAttributeData, data_size), 2 * pointer);
		assert_eq!(align_of::<WindowCompositionAttributeData>(), align_of::<*mut c_void>());
		assert_eq!(WindowCompositionAttribute::AccentPolicy as i32, 19);
	}

	#[test]
	fn blur_behind_layout() {
		let pointer = size_of::<*mut c_void>();
		assert_eq!(offset_of!(BlurBehind, flags), 0);
		assert_eq!(offset_of!(BlurBehind, enable), 4);
		assert_eq!(offset_of!(BlurBehind, region), 8);
		assert_eq!(offset_of!(BlurBehind, transition_on_maximized), 8 + pointer);
	}

	#[test]
	fn acrylic_policy_carries_the_transparent_sentinel() {
		let on = AccentPolicy::acrylic(true);
		assert_eq!(on.state, AccentState::AcrylicBlurBehind);
		assert_eq!(on.gradient_color, 0x00FF_FFFF);
		assert_eq!(on.gradient_color >> 24, 0);

		let off = AccentPolicy::acrylic(false);
		assert_eq!(off.state, AccentState::Disabled);
		assert_eq!(off.gradient_color, 0x00FF_FFFF);
	}

	#[test]
	fn whole_window_blur_request() {
		let on = BlurBehind::whole_window(true);
		assert_eq!(on.flags, 0b11);
		assert_eq!(on.enable, 1);
		assert!(on.region.is_null());

		assert_eq!(BlurBehind::whole_window(false).enable, 0);
	}

	#[test]
	fn heap_block_copies_and_releases() {
		let before = live_blocks();
		{
			let block = HeapBlock::new(AccentPolicy::acrylic(true));
			assert_eq!(live_blocks(), before + 1);
			assert_eq!(block.size(), 16);
			assert_eq!(block.get(), AccentPolicy::acrylic(true));
			assert!(!block.as_mut_ptr().is_null());
		}
		assert_eq!(live_blocks(), before);
	}
}
